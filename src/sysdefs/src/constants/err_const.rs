#![allow(dead_code)]

use std::sync::OnceLock;

use crate::constants::win_const::{
    ERROR_ACCESS_DENIED, ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_FILE_READ_ONLY,
    ERROR_INVALID_FUNCTION, ERROR_INVALID_HANDLE, ERROR_NOT_ENOUGH_MEMORY, ERROR_OUTOFMEMORY,
    ERROR_PATH_NOT_FOUND, ERROR_SUCCESS,
};

// Verbosity switch for syscall error reporting. Left unset it reads as 0.
pub static VERBOSE: OnceLock<isize> = OnceLock::new();

pub fn verbosity() -> isize {
    *VERBOSE.get_or_init(|| 0)
}

/// Errno values surfaced at the shim boundary.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(i32)]
pub enum Errno {
    EPERM = 1,  // Operation not permitted
    ENOENT = 2, // No such file or directory
    EINTR = 4,  // Interrupted system call
    EIO = 5,    // I/O error
    EBADF = 9,  // Bad file number
    ENOMEM = 12, // Out of memory
    EACCES = 13, // Permission denied
    EFAULT = 14, // Bad address
    EEXIST = 17, // File exists
    EINVAL = 22, // Invalid argument
    ENFILE = 23, // File table overflow
    EMFILE = 24, // Too many open files
    ENAMETOOLONG = 36, // File name too long
}

/// Log (when verbose) and convert an errno into the negative sentinel the
/// syscall boundary returns. Callers must check the sentinel before trusting
/// anything else about the call.
pub fn syscall_error(e: Errno, syscall: &str, message: &str) -> i32 {
    if verbosity() > 0 {
        eprintln!("Error in syscall: {} - {:?}: {}", syscall, e, message);
    }
    -(e as i32)
}

/// Map a native error code onto the errno taxonomy. Every native failure is
/// translated at the point of occurrence; anything unclassified is EINVAL.
pub fn errno_from_native(code: u32) -> Option<Errno> {
    match code {
        ERROR_SUCCESS => None,
        ERROR_ACCESS_DENIED | ERROR_FILE_READ_ONLY => Some(Errno::EACCES),
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Some(Errno::ENOENT),
        ERROR_FILE_EXISTS => Some(Errno::EEXIST),
        ERROR_NOT_ENOUGH_MEMORY | ERROR_OUTOFMEMORY => Some(Errno::ENOMEM),
        ERROR_INVALID_HANDLE => Some(Errno::EBADF),
        ERROR_INVALID_FUNCTION => Some(Errno::EFAULT),
        _ => Some(Errno::EINVAL),
    }
}

/// Boundary form of `errno_from_native`: 0 for native success, the negative
/// errno sentinel otherwise.
pub fn handle_native_error(code: u32, syscall: &str) -> i32 {
    match errno_from_native(code) {
        None => 0,
        Some(e) => syscall_error(e, syscall, "native call failed"),
    }
}
