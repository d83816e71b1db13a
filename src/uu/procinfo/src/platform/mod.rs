// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

//! Per-platform access to the process table.
//!
//! Every supported OS gets one [`ProcessSource`] implementation, picked at
//! build time and exported as [`NativeProcessSource`].

use std::path::PathBuf;

use crate::error::ProcessError;
use crate::record::Pid;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod fallback;
#[cfg(any(target_os = "macos", target_os = "windows"))]
mod helpers;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub use fallback::UnsupportedProcessSource as NativeProcessSource;
#[cfg(target_os = "linux")]
pub use linux::LinuxProcessSource as NativeProcessSource;
#[cfg(target_os = "macos")]
pub use macos::MacProcessSource as NativeProcessSource;
#[cfg(target_os = "windows")]
pub use windows::WindowsProcessSource as NativeProcessSource;

/// One row of the raw process listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: Pid,
    /// Name straight from the listing API, when it hands one out for free.
    pub name_hint: Option<String>,
}

impl ProcessEntry {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            name_hint: None,
        }
    }

    pub fn with_name(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            pid,
            name_hint: Some(name.into()),
        }
    }
}

/// Capability interface over a platform's process table.
///
/// Accessors report [`ProcessError::NotFound`] only when the process is gone,
/// [`ProcessError::PermissionDenied`] when it exists but is protected, and
/// [`ProcessError::MalformedData`] when the platform answered with something
/// unparsable. `Ok(None)` means the process exists but has no such detail
/// (kernel threads have no executable, for instance).
pub trait ProcessSource: Send + Sync {
    /// List every process visible to the caller right now.
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError>;

    /// Raw, unnormalized process name.
    fn name(&self, pid: Pid) -> Result<String, ProcessError>;

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError>;

    /// Argument vector, argv[0] first. Empty when the OS exposes none.
    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError>;

    /// Suffix executables conventionally carry on this platform.
    fn executable_suffix(&self) -> Option<&'static str> {
        None
    }
}

impl<S: ProcessSource + ?Sized> ProcessSource for &S {
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError> {
        (**self).list_processes()
    }

    fn name(&self, pid: Pid) -> Result<String, ProcessError> {
        (**self).name(pid)
    }

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError> {
        (**self).executable_path(pid)
    }

    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError> {
        (**self).arguments(pid)
    }

    fn executable_suffix(&self) -> Option<&'static str> {
        (**self).executable_suffix()
    }
}
