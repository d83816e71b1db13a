// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use tracing::{debug, trace};

use crate::builder::{build_record, finish_record, read_name, Detail};
use crate::error::ProcessError;
use crate::matcher::{MatchSettings, NameMatcher};
use crate::platform::{NativeProcessSource, ProcessSource};
use crate::record::{Pid, ProcessRecord};

/// Entry point for process lookups over one [`ProcessSource`].
///
/// Every call takes a fresh look at the process table; nothing is cached
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessQuery<S = NativeProcessSource> {
    source: S,
    settings: MatchSettings,
}

impl ProcessQuery<NativeProcessSource> {
    /// Query the process table of the running OS.
    pub fn native() -> Self {
        Self::new(NativeProcessSource::default())
    }
}

impl<S: ProcessSource> ProcessQuery<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            settings: MatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: MatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Every pid currently visible, in the order the platform lists them.
    pub fn list_process_ids(&self) -> Result<Vec<Pid>, ProcessError> {
        Ok(self
            .source
            .list_processes()?
            .into_iter()
            .map(|entry| entry.pid)
            .collect())
    }

    /// All live processes whose name equals `name`.
    ///
    /// Comparison follows [`MatchSettings`] and ignores the platform's
    /// executable suffix on both sides. No match is an empty vector, not an
    /// error.
    pub fn find_processes_by_name(&self, name: &str) -> Result<Vec<ProcessRecord>, ProcessError> {
        let matcher = NameMatcher::new(name, self.source.executable_suffix(), self.settings);
        let entries = self.source.list_processes()?;
        trace!(query = name, candidates = entries.len(), "matching process names");

        let mut found = Vec::new();
        for entry in entries {
            let pid = entry.pid;
            let raw_name = match entry.name_hint {
                Some(hint) => Detail::Read(Some(hint)),
                None => read_name(&self.source, pid)?,
            };

            // Cheap rejection before touching the rest of the process
            match &raw_name {
                Detail::Vanished => continue,
                Detail::Read(Some(raw)) if !matcher.matches_raw(raw) => continue,
                Detail::Read(_) => {}
            }

            if let Some(record) = finish_record(&self.source, pid, raw_name)? {
                if matcher.matches(record.name()) {
                    found.push(record);
                }
            }
        }

        debug!(query = name, matches = found.len(), "name lookup done");
        Ok(found)
    }

    /// The process with id `pid`, if it is alive.
    pub fn find_process_by_pid(
        &self,
        pid: impl Into<Pid>,
    ) -> Result<Option<ProcessRecord>, ProcessError> {
        build_record(&self.source, pid.into())
    }

    /// Command line of `pid`, or `None` when the process is gone or its
    /// command line is not available.
    pub fn get_process_cmdline(&self, pid: impl Into<Pid>) -> Result<Option<String>, ProcessError> {
        Ok(self
            .find_process_by_pid(pid)?
            .and_then(ProcessRecord::into_cmdline))
    }
}

/// Find live processes named `name` on this machine.
pub fn find_processes_by_name(name: &str) -> Result<Vec<ProcessRecord>, ProcessError> {
    ProcessQuery::native().find_processes_by_name(name)
}

/// Look up a live process on this machine by pid.
pub fn find_process_by_pid(pid: u32) -> Result<Option<ProcessRecord>, ProcessError> {
    ProcessQuery::native().find_process_by_pid(pid)
}

/// Command line of a live process on this machine.
pub fn get_process_cmdline(pid: u32) -> Result<Option<String>, ProcessError> {
    ProcessQuery::native().get_process_cmdline(pid)
}

pub fn list_process_ids() -> Result<Vec<Pid>, ProcessError> {
    ProcessQuery::native().list_process_ids()
}
