// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

// Turns the raw accessors of a ProcessSource into ProcessRecords

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ProcessError;
use crate::platform::ProcessSource;
use crate::record::{join_cmdline, strip_executable_suffix, Pid, ProcessRecord};

/// Outcome of reading one detail of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Detail<T> {
    /// The process is still there; `None` when the detail is unavailable.
    Read(Option<T>),
    /// The process exited while we were looking at it.
    Vanished,
}

/// Sort an accessor result into a [`Detail`], or fail the query.
fn classify<T>(
    pid: Pid,
    field: &'static str,
    result: Result<Option<T>, ProcessError>,
) -> Result<Detail<T>, ProcessError> {
    match result {
        Ok(value) => Ok(Detail::Read(value)),
        Err(ProcessError::NotFound(_)) => {
            debug!(%pid, field, "process vanished while reading");
            Ok(Detail::Vanished)
        }
        Err(ProcessError::PermissionDenied(_)) => {
            debug!(%pid, field, "permission denied, leaving field empty");
            Ok(Detail::Read(None))
        }
        Err(err) => {
            warn!(%pid, field, error = %err, "failed to read process");
            Err(err)
        }
    }
}

/// Read the raw, unnormalized name of `pid`.
pub(crate) fn read_name<S: ProcessSource + ?Sized>(
    source: &S,
    pid: Pid,
) -> Result<Detail<String>, ProcessError> {
    classify(pid, "name", source.name(pid).map(Some))
}

/// Build the record of `pid` from whatever the platform is willing to share.
///
/// Returns `Ok(None)` when there is no such process, or when it exits half
/// way through. Permission problems only empty out the affected field.
pub fn build_record<S: ProcessSource + ?Sized>(
    source: &S,
    pid: Pid,
) -> Result<Option<ProcessRecord>, ProcessError> {
    let name = read_name(source, pid)?;
    finish_record(source, pid, name)
}

/// Complete a record once its raw name has been read.
pub(crate) fn finish_record<S: ProcessSource + ?Sized>(
    source: &S,
    pid: Pid,
    name: Detail<String>,
) -> Result<Option<ProcessRecord>, ProcessError> {
    let Detail::Read(raw_name) = name else {
        return Ok(None);
    };
    let Detail::Read(executable_path) = classify(pid, "exe", source.executable_path(pid))?
    else {
        return Ok(None);
    };
    let Detail::Read(arguments) = classify(pid, "cmdline", source.arguments(pid).map(Some))?
    else {
        return Ok(None);
    };

    let raw_name = raw_name
        .or_else(|| executable_path.as_deref().and_then(file_name))
        .unwrap_or_default();
    let name = strip_executable_suffix(&raw_name, source.executable_suffix()).to_string();
    let cmdline = arguments.as_deref().and_then(join_cmdline);

    Ok(Some(ProcessRecord::new(pid, name, executable_path, cmdline)))
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
