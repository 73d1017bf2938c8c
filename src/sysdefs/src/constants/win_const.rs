#![allow(dead_code)]

// ===== Namespace Prefixes =====
// A path carrying one of these prefixes is handed to the kernel verbatim,
// bypassing the legacy path-length and path-syntax rules.
pub const WIN32_DEV_NAMESPACE: &str = r"\\.\"; // Win32 device namespace
pub const WIN32_FILE_NAMESPACE: &str = r"\\?\"; // Extended-length file namespace
pub const NT_DEVICE_NAMESPACE: &str = r"\Device\"; // NT object-manager namespace
pub const UNC_PREFIX: &str = r"UNC\"; // Network-share body under \\?\
pub const NETWORK_SHARE: &str = r"\\"; // Plain network-share lead-in

// ===== Desired Access =====
// Source: winnt.h
pub const GENERIC_READ: u32 = 0x80000000;
pub const GENERIC_WRITE: u32 = 0x40000000;
pub const FILE_READ_DATA: u32 = 0x0001;
pub const FILE_WRITE_DATA: u32 = 0x0002;
pub const FILE_APPEND_DATA: u32 = 0x0004;
pub const FILE_READ_EA: u32 = 0x0008;
pub const FILE_WRITE_EA: u32 = 0x0010;
pub const FILE_READ_ATTRIBUTES: u32 = 0x0080;
pub const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
pub const STANDARD_RIGHTS_READ: u32 = 0x00020000;
pub const STANDARD_RIGHTS_WRITE: u32 = 0x00020000;
pub const SYNCHRONIZE: u32 = 0x00100000;

// Composite rights used when a permission mode widens a creating open.
pub const FILE_GENERIC_READ: u32 =
    STANDARD_RIGHTS_READ | FILE_READ_DATA | FILE_READ_ATTRIBUTES | FILE_READ_EA | SYNCHRONIZE;
pub const FILE_GENERIC_WRITE: u32 = STANDARD_RIGHTS_WRITE
    | FILE_WRITE_DATA
    | FILE_WRITE_ATTRIBUTES
    | FILE_WRITE_EA
    | FILE_APPEND_DATA
    | SYNCHRONIZE;

// ===== Share Mode =====
// Source: winnt.h
pub const FILE_SHARE_READ: u32 = 0x1;
pub const FILE_SHARE_WRITE: u32 = 0x2;
pub const FILE_SHARE_DELETE: u32 = 0x4;

// ===== Creation Disposition =====
// Source: fileapi.h. Mutually exclusive; exactly one is passed per open.
pub const CREATE_NEW: u32 = 1; // Fail if the target exists
pub const CREATE_ALWAYS: u32 = 2; // Create, truncating any existing target
pub const OPEN_EXISTING: u32 = 3; // Fail if the target is missing
pub const OPEN_ALWAYS: u32 = 4; // Open, creating the target if missing
pub const TRUNCATE_EXISTING: u32 = 5; // Open existing and truncate to zero

// ===== Attributes and Flags =====
// Source: winnt.h
pub const FILE_ATTRIBUTE_READONLY: u32 = 0x00000001;
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x00000010;
pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x00000080; // Only valid on its own
pub const FILE_ATTRIBUTE_TEMPORARY: u32 = 0x00000100;
pub const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x02000000; // Permits opening directories
pub const FILE_FLAG_DELETE_ON_CLOSE: u32 = 0x04000000;
pub const FILE_FLAG_SEQUENTIAL_SCAN: u32 = 0x08000000;
pub const FILE_FLAG_RANDOM_ACCESS: u32 = 0x10000000;

// ===== Native Error Codes =====
// Source: winerror.h
pub const ERROR_SUCCESS: u32 = 0;
pub const ERROR_INVALID_FUNCTION: u32 = 1;
pub const ERROR_FILE_NOT_FOUND: u32 = 2;
pub const ERROR_PATH_NOT_FOUND: u32 = 3;
pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_INVALID_HANDLE: u32 = 6;
pub const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
pub const ERROR_OUTOFMEMORY: u32 = 14;
pub const ERROR_SHARING_VIOLATION: u32 = 32;
pub const ERROR_FILE_EXISTS: u32 = 80;
pub const ERROR_INVALID_PARAMETER: u32 = 87;
pub const ERROR_NEGATIVE_SEEK: u32 = 131;
pub const ERROR_ALREADY_EXISTS: u32 = 183;
pub const ERROR_FILE_READ_ONLY: u32 = 6009;

// ===== Native Timestamps =====
// FILETIME counts 100-nanosecond ticks since 1601-01-01; POSIX time counts
// seconds since 1970-01-01.
pub const FILETIME_TICKS_PER_SECOND: i64 = 10_000_000;
pub const FILETIME_EPOCH_DIFFERENCE_SECS: i64 = 11_644_473_600;
