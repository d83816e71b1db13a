// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::io;

use crate::record::Pid;

/// Errors that can occur when querying process information.
///
/// Only [`ProcessError::EnumerationFailed`] and [`ProcessError::MalformedData`]
/// ever reach callers of the query functions. The other two variants are
/// produced by platform accessors and recovered by the record builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    /// Process with given PID does not exist (any more)
    #[error("process {0} not found")]
    NotFound(Pid),
    /// The process exists but the requested detail is off limits
    #[error("permission denied for process {0}")]
    PermissionDenied(Pid),
    /// The platform's process listing facility itself failed
    #[error("process enumeration failed: {reason}{}", code_suffix(.code))]
    EnumerationFailed { code: Option<i32>, reason: String },
    /// Data read from the platform could not be parsed
    #[error("malformed process data for {pid}: {reason}")]
    MalformedData { pid: Pid, reason: String },
}

fn code_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (os error {c})")).unwrap_or_default()
}

impl ProcessError {
    pub fn malformed(pid: Pid, reason: impl Into<String>) -> Self {
        Self::MalformedData {
            pid,
            reason: reason.into(),
        }
    }

    pub fn enumeration(err: &io::Error) -> Self {
        Self::EnumerationFailed {
            code: err.raw_os_error(),
            reason: err.kind().to_string(),
        }
    }

    /// Classify an I/O error raised while reading details of `pid`.
    ///
    /// Missing entries and `ESRCH` mean the process is gone, `EACCES`/`EPERM`
    /// mean it is protected, and invalid data is a parse failure.
    pub fn from_io(pid: Pid, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(pid),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(pid),
            io::ErrorKind::InvalidData => Self::malformed(pid, err.to_string()),
            _ if is_no_such_process(err) => Self::NotFound(pid),
            // Anything else while reading a single process behaves like a
            // detail we could not get at.
            _ => Self::PermissionDenied(pid),
        }
    }

    /// Whether the error only means the process has gone away.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Errors that must fail the whole query.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EnumerationFailed { .. } | Self::MalformedData { .. }
        )
    }
}

#[cfg(unix)]
fn is_no_such_process(err: &io::Error) -> bool {
    // ESRCH is 3 on every unix we build for
    err.raw_os_error() == Some(3)
}

#[cfg(not(unix))]
fn is_no_such_process(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(
            ProcessError::from_io(Pid::from(7), &err),
            ProcessError::NotFound(Pid::from(7))
        );
    }

    #[test]
    fn test_from_io_permission_denied() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            ProcessError::from_io(Pid::from(7), &err),
            ProcessError::PermissionDenied(Pid::from(7))
        );
    }

    #[test]
    fn test_from_io_invalid_data_is_malformed() {
        let err = io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let result = ProcessError::from_io(Pid::from(7), &err);
        assert!(matches!(result, ProcessError::MalformedData { .. }));
        assert!(result.is_fatal());
    }

    #[test]
    #[cfg(unix)]
    fn test_from_io_esrch() {
        let err = io::Error::from_raw_os_error(3);
        assert!(ProcessError::from_io(Pid::from(7), &err).is_not_found());
    }

    #[test]
    fn test_enumeration_keeps_os_code() {
        let err = io::Error::from_raw_os_error(13);
        let result = ProcessError::enumeration(&err);
        assert!(
            matches!(result, ProcessError::EnumerationFailed { code: Some(13), .. }),
            "{result:?}"
        );
        assert!(result.to_string().ends_with("(os error 13)"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProcessError::NotFound(Pid::from(42)).to_string(),
            "process 42 not found"
        );
        assert_eq!(
            ProcessError::malformed(Pid::from(42), "missing Name field").to_string(),
            "malformed process data for 42: missing Name field"
        );
        let err = ProcessError::EnumerationFailed {
            code: None,
            reason: "unsupported platform".into(),
        };
        assert_eq!(
            err.to_string(),
            "process enumeration failed: unsupported platform"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(!ProcessError::NotFound(Pid::from(1)).is_fatal());
        assert!(!ProcessError::PermissionDenied(Pid::from(1)).is_fatal());
        assert!(ProcessError::malformed(Pid::from(1), "x").is_fatal());
    }
}
