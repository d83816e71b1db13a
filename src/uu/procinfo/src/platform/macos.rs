// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::io;
use std::mem;
use std::path::PathBuf;
use std::ptr;

use libc::{c_int, c_void, proc_bsdinfo, proc_listallpids, proc_pidinfo, proc_pidpath};
use tracing::trace;

use crate::error::ProcessError;
use crate::parse::parse_procargs2;
use crate::platform::helpers::c_chars_to_string;
use crate::platform::{ProcessEntry, ProcessSource};
use crate::record::Pid;

// macOS libproc constants
const PROC_PIDTBSDINFO: c_int = 3;
const PROC_PIDPATHINFO_MAXSIZE: usize = 4096;

// Processes may be forked between sizing the buffer and filling it
const PID_SLACK: usize = 32;

/// Process table backed by libproc and the `kern.procargs2` sysctl.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacProcessSource;

impl MacProcessSource {
    fn bsd_info(pid: Pid) -> Result<proc_bsdinfo, ProcessError> {
        let mut info: proc_bsdinfo = unsafe { mem::zeroed() };
        let expected = mem::size_of::<proc_bsdinfo>();

        let written = unsafe {
            proc_pidinfo(
                pid.as_u32() as c_int,
                PROC_PIDTBSDINFO,
                0,
                &mut info as *mut _ as *mut c_void,
                expected as c_int,
            )
        };

        match usize::try_from(written) {
            Ok(n) if n == expected => Ok(info),
            Ok(n) if n > 0 => Err(ProcessError::malformed(
                pid,
                format!("short proc_bsdinfo read ({n} of {expected} bytes)"),
            )),
            _ => Err(last_error(pid)),
        }
    }
}

/// Turn `errno` after a failed per-process call into a [`ProcessError`].
fn last_error(pid: Pid) -> ProcessError {
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => ProcessError::NotFound(pid),
        _ => ProcessError::from_io(pid, &err),
    }
}

impl ProcessSource for MacProcessSource {
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError> {
        let estimate = unsafe { proc_listallpids(ptr::null_mut(), 0) };
        if estimate < 0 {
            return Err(ProcessError::enumeration(&io::Error::last_os_error()));
        }

        let mut pids: Vec<c_int> = vec![0; estimate as usize + PID_SLACK];
        let count = unsafe {
            proc_listallpids(
                pids.as_mut_ptr() as *mut c_void,
                (pids.len() * mem::size_of::<c_int>()) as c_int,
            )
        };
        if count < 0 {
            return Err(ProcessError::enumeration(&io::Error::last_os_error()));
        }

        pids.truncate(count as usize);
        trace!(count = pids.len(), "listed processes");

        Ok(pids
            .into_iter()
            .filter(|&pid| pid > 0)
            .map(|pid| ProcessEntry::new(Pid::from(pid as u32)))
            .collect())
    }

    fn name(&self, pid: Pid) -> Result<String, ProcessError> {
        let info = Self::bsd_info(pid)?;

        // pbi_name holds up to 32 characters, pbi_comm is cut at MAXCOMLEN
        let name = c_chars_to_string(&info.pbi_name);
        if name.is_empty() {
            Ok(c_chars_to_string(&info.pbi_comm))
        } else {
            Ok(name)
        }
    }

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError> {
        let mut buffer = vec![0u8; PROC_PIDPATHINFO_MAXSIZE];
        let len = unsafe {
            proc_pidpath(
                pid.as_u32() as c_int,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len() as u32,
            )
        };
        if len <= 0 {
            return Err(last_error(pid));
        }

        buffer.truncate(len as usize);
        Ok(Some(PathBuf::from(
            String::from_utf8_lossy(&buffer).into_owned(),
        )))
    }

    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError> {
        let mut mib = [libc::CTL_KERN, libc::KERN_PROCARGS2, pid.as_u32() as c_int];
        let mut size: libc::size_t = 0;

        let ret = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as libc::c_uint,
                ptr::null_mut(),
                &mut size,
                ptr::null_mut(),
                0,
            )
        };
        if ret == -1 {
            return Err(last_error(pid));
        }

        let mut buffer = vec![0u8; size];
        let ret = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as libc::c_uint,
                buffer.as_mut_ptr() as *mut c_void,
                &mut size,
                ptr::null_mut(),
                0,
            )
        };
        if ret == -1 {
            return Err(last_error(pid));
        }
        buffer.truncate(size);

        parse_procargs2(&buffer).map_err(|reason| ProcessError::malformed(pid, reason))
    }
}
