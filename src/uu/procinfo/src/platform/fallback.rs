// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::path::PathBuf;

use crate::error::ProcessError;
use crate::platform::{ProcessEntry, ProcessSource};
use crate::record::Pid;

/// Stand-in for platforms without a process table implementation.
///
/// Listing fails outright, so name lookups surface the problem instead of
/// quietly returning nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProcessSource;

impl ProcessSource for UnsupportedProcessSource {
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError> {
        Err(ProcessError::EnumerationFailed {
            code: None,
            reason: format!("unsupported platform {}", std::env::consts::OS),
        })
    }

    fn name(&self, pid: Pid) -> Result<String, ProcessError> {
        Err(ProcessError::NotFound(pid))
    }

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError> {
        Err(ProcessError::NotFound(pid))
    }

    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError> {
        Err(ProcessError::NotFound(pid))
    }
}
