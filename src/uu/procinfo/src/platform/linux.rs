// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use crate::error::ProcessError;
use crate::parse::{
    live_executable_path, parse_nul_separated, parse_status_name, parse_status_tgid,
    untruncated_name,
};
use crate::platform::{ProcessEntry, ProcessSource};
use crate::record::Pid;

/// Process table backed by the proc filesystem.
///
/// - [The /proc Filesystem](https://docs.kernel.org/filesystems/proc.html#process-specific-subdirectories)
#[derive(Debug, Clone)]
pub struct LinuxProcessSource {
    root: PathBuf,
}

impl Default for LinuxProcessSource {
    fn default() -> Self {
        Self::with_root("/proc")
    }
}

impl LinuxProcessSource {
    /// Read processes from a proc filesystem mounted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pid_file(&self, pid: Pid, file: &str) -> PathBuf {
        let mut path = self.root.join(pid.to_string());
        path.push(file);
        path
    }

    fn is_alive(&self, pid: Pid) -> bool {
        self.root.join(pid.to_string()).is_dir()
    }

    fn exe_basename(&self, pid: Pid) -> Option<String> {
        let target = fs::read_link(self.pid_file(pid, "exe")).ok()?;
        basename(&live_executable_path(target)?)
    }

    fn argv0_basename(&self, pid: Pid) -> Option<String> {
        let cmdline = fs::read(self.pid_file(pid, "cmdline")).ok()?;
        let argv0 = parse_nul_separated(&cmdline).into_iter().next()?;
        // Rewritten titles ("sshd: user [priv]") are not paths
        let program = argv0.split(' ').next()?;
        basename(Path::new(program))
    }
}

fn basename(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

impl ProcessSource for LinuxProcessSource {
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError> {
        let mut pids = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // The proc root itself is unreadable
                Err(err) if err.depth() == 0 => {
                    return Err(match err.io_error() {
                        Some(io_err) => ProcessError::enumeration(io_err),
                        None => ProcessError::EnumerationFailed {
                            code: None,
                            reason: err.to_string(),
                        },
                    });
                }
                // An entry that went away while we were walking
                Err(_) => continue,
            };

            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) {
                pids.push(Pid::from(pid));
            }
        }

        pids.sort_unstable();
        trace!(count = pids.len(), root = %self.root.display(), "listed processes");

        Ok(pids.into_iter().map(ProcessEntry::new).collect())
    }

    fn name(&self, pid: Pid) -> Result<String, ProcessError> {
        let status = fs::read(self.pid_file(pid, "status"))
            .map_err(|err| ProcessError::from_io(pid, &err))?;

        let status = String::from_utf8_lossy(&status);

        // /proc/<tid> exists for every thread, but only the leader is a process
        if parse_status_tgid(&status).is_some_and(|tgid| tgid != pid.as_u32()) {
            return Err(ProcessError::NotFound(pid));
        }

        let comm = parse_status_name(&status)
            .ok_or_else(|| ProcessError::malformed(pid, "status has no Name field"))?;
        let candidates = [self.exe_basename(pid), self.argv0_basename(pid)];
        Ok(untruncated_name(comm, candidates.into_iter().flatten()))
    }

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError> {
        match fs::read_link(self.pid_file(pid, "exe")) {
            Ok(target) => Ok(live_executable_path(target)),
            // Kernel threads have a dangling exe link while very much alive
            Err(err) if err.kind() == io::ErrorKind::NotFound && self.is_alive(pid) => Ok(None),
            Err(err) => Err(ProcessError::from_io(pid, &err)),
        }
    }

    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError> {
        fs::read(self.pid_file(pid, "cmdline"))
            .map(|bytes| parse_nul_separated(&bytes))
            .map_err(|err| ProcessError::from_io(pid, &err))
    }
}
