// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::ffi::c_void;
use std::io;
use std::mem;
use std::path::PathBuf;
use std::ptr::{self, NonNull};

use tracing::trace;
use windows_sys::Wdk::System::Threading::{NtQueryInformationProcess, PROCESSINFOCLASS};
use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, ERROR_NO_MORE_FILES,
    INVALID_HANDLE_VALUE, UNICODE_STRING,
};
use windows_sys::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows_sys::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};

use crate::error::ProcessError;
use crate::parse::utf16_le_to_string;
use crate::platform::helpers::wide_to_string;
use crate::platform::{ProcessEntry, ProcessSource};
use crate::record::Pid;

// Not exported by the SDK headers
const PROCESS_COMMAND_LINE_INFORMATION: PROCESSINFOCLASS = 60;

const STATUS_BUFFER_OVERFLOW: i32 = 0x8000_0005_u32 as i32;
const STATUS_INFO_LENGTH_MISMATCH: i32 = 0xC000_0004_u32 as i32;
const STATUS_BUFFER_TOO_SMALL: i32 = 0xC000_0023_u32 as i32;
const STATUS_ACCESS_DENIED: i32 = 0xC000_0022_u32 as i32;

// Long path limit, in UTF-16 units
const MAX_IMAGE_PATH: usize = 32_768;

/// The System Idle Process cannot be opened but is always there.
const IDLE_PID: u32 = 0;

struct HandleWrapper(NonNull<c_void>);

impl HandleWrapper {
    fn as_raw(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl Drop for HandleWrapper {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.0.as_ptr());
        };
    }
}

/// Process table backed by a Toolhelp snapshot and per-process handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsProcessSource;

impl WindowsProcessSource {
    fn snapshot() -> Result<Vec<PROCESSENTRY32W>, ProcessError> {
        let handle = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if handle == INVALID_HANDLE_VALUE {
            return Err(ProcessError::enumeration(&io::Error::last_os_error()));
        }
        let snapshot = NonNull::new(handle)
            .map(HandleWrapper)
            .ok_or_else(|| ProcessError::enumeration(&io::Error::last_os_error()))?;

        let mut entries = Vec::new();
        let mut entry: PROCESSENTRY32W = unsafe { mem::zeroed() };
        entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

        let mut more = unsafe { Process32FirstW(snapshot.as_raw(), &mut entry) } != 0;
        while more {
            entries.push(entry);
            more = unsafe { Process32NextW(snapshot.as_raw(), &mut entry) } != 0;
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(ERROR_NO_MORE_FILES as i32) {
            return Err(ProcessError::enumeration(&err));
        }

        Ok(entries)
    }

    fn open(pid: Pid) -> Result<HandleWrapper, ProcessError> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid.as_u32()) };
        NonNull::new(handle).map(HandleWrapper).ok_or_else(|| {
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                // OpenProcess reports an unknown pid as a bad parameter
                Some(code) if code == ERROR_INVALID_PARAMETER as i32 => ProcessError::NotFound(pid),
                Some(code) if code == ERROR_ACCESS_DENIED as i32 => {
                    ProcessError::PermissionDenied(pid)
                }
                _ => ProcessError::from_io(pid, &err),
            }
        })
    }
}

impl ProcessSource for WindowsProcessSource {
    fn list_processes(&self) -> Result<Vec<ProcessEntry>, ProcessError> {
        let entries = Self::snapshot()?;
        trace!(count = entries.len(), "listed processes");

        Ok(entries
            .iter()
            .map(|it| {
                ProcessEntry::with_name(Pid::from(it.th32ProcessID), wide_to_string(&it.szExeFile))
            })
            .collect())
    }

    fn name(&self, pid: Pid) -> Result<String, ProcessError> {
        Self::snapshot()?
            .iter()
            .find(|it| it.th32ProcessID == pid.as_u32())
            .map(|it| wide_to_string(&it.szExeFile))
            .ok_or(ProcessError::NotFound(pid))
    }

    fn executable_path(&self, pid: Pid) -> Result<Option<PathBuf>, ProcessError> {
        if pid.as_u32() == IDLE_PID {
            return Ok(None);
        }
        let handle = Self::open(pid)?;

        let mut buffer = vec![0u16; MAX_IMAGE_PATH];
        let mut len = buffer.len() as u32;
        let ok = unsafe {
            QueryFullProcessImageNameW(
                handle.as_raw(),
                PROCESS_NAME_WIN32,
                buffer.as_mut_ptr(),
                &mut len,
            )
        };
        if ok == 0 {
            return Err(ProcessError::PermissionDenied(pid));
        }

        buffer.truncate(len as usize);
        Ok(Some(PathBuf::from(String::from_utf16_lossy(&buffer))))
    }

    /// Windows keeps the command line as one string, handed out as a single
    /// argument.
    fn arguments(&self, pid: Pid) -> Result<Vec<String>, ProcessError> {
        if pid.as_u32() == IDLE_PID {
            return Ok(Vec::new());
        }
        let handle = Self::open(pid)?;

        let mut needed = 0u32;
        let status = unsafe {
            NtQueryInformationProcess(
                handle.as_raw(),
                PROCESS_COMMAND_LINE_INFORMATION,
                ptr::null_mut(),
                0,
                &mut needed,
            )
        };
        match status {
            STATUS_INFO_LENGTH_MISMATCH | STATUS_BUFFER_TOO_SMALL | STATUS_BUFFER_OVERFLOW => {}
            STATUS_ACCESS_DENIED => return Err(ProcessError::PermissionDenied(pid)),
            s if s >= 0 => return Ok(Vec::new()),
            _ => return Err(ProcessError::PermissionDenied(pid)),
        }
        if (needed as usize) < mem::size_of::<UNICODE_STRING>() {
            return Ok(Vec::new());
        }

        // u64 backing keeps the UNICODE_STRING header aligned
        let mut storage = vec![0u64; (needed as usize).div_ceil(mem::size_of::<u64>())];
        let status = unsafe {
            NtQueryInformationProcess(
                handle.as_raw(),
                PROCESS_COMMAND_LINE_INFORMATION,
                storage.as_mut_ptr() as *mut c_void,
                needed,
                &mut needed,
            )
        };
        if status < 0 {
            return Err(ProcessError::PermissionDenied(pid));
        }

        let total = storage.len() * mem::size_of::<u64>();
        let base = storage.as_ptr() as *const u8;
        let header = unsafe { ptr::read(storage.as_ptr() as *const UNICODE_STRING) };
        if header.Buffer.is_null() || header.Length == 0 {
            return Ok(Vec::new());
        }

        let offset = (header.Buffer as usize).wrapping_sub(base as usize);
        let len = header.Length as usize;
        if offset < mem::size_of::<UNICODE_STRING>() || offset.saturating_add(len) > total {
            return Err(ProcessError::malformed(
                pid,
                format!("command line of {len} bytes at offset {offset} exceeds {total} byte buffer"),
            ));
        }

        let bytes = unsafe { std::slice::from_raw_parts(base.add(offset), len) };
        Ok(vec![utf16_le_to_string(bytes)])
    }

    fn executable_suffix(&self) -> Option<&'static str> {
        Some(".exe")
    }
}
