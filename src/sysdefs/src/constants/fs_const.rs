#![allow(dead_code)]

// ===== File Access Modes =====
// Source: ucrt fcntl.h
pub const O_RDONLY: i32 = 0x0000; // Open read-only
pub const O_WRONLY: i32 = 0x0001; // Open write-only
pub const O_RDWR: i32 = 0x0002; // Open read-write
pub const O_ACCMODE: i32 = 0x0003; // Mask for file access modes

// ===== File Creation and Status Flags =====
// Source: ucrt fcntl.h
pub const O_APPEND: i32 = 0x0008; // Writes always land at end of file
pub const O_RANDOM: i32 = 0x0010; // Random-access hint
pub const O_SEQUENTIAL: i32 = 0x0020; // Sequential-access hint
pub const O_TEMPORARY: i32 = 0x0040; // Delete file when last descriptor closes
pub const O_NOINHERIT: i32 = 0x0080; // Descriptor is not inherited by children
pub const O_CREAT: i32 = 0x0100; // Create file if it doesn't exist
pub const O_TRUNC: i32 = 0x0200; // Truncate file to zero length
pub const O_EXCL: i32 = 0x0400; // Error if O_CREAT and file exists
pub const O_SHORT_LIVED: i32 = 0x1000; // Avoid flushing to disk if possible

// ===== Translation Modes =====
// Source: ucrt fcntl.h
pub const O_TEXT: i32 = 0x4000; // CRLF text translation
pub const O_BINARY: i32 = 0x8000; // No translation
pub const O_WTEXT: i32 = 0x10000; // UTF-16 text with BOM detection
pub const O_U16TEXT: i32 = 0x20000; // UTF-16 text, no BOM
pub const O_U8TEXT: i32 = 0x40000; // UTF-8 text

// ===== Sharing Flags =====
// Source: ucrt share.h
pub const SH_DENYRW: i32 = 0x10; // Deny read and write access
pub const SH_DENYWR: i32 = 0x20; // Deny write access
pub const SH_DENYRD: i32 = 0x30; // Deny read access
pub const SH_DENYNO: i32 = 0x40; // Deny none

// ===== File Permissions =====
// Source: ucrt sys/stat.h
pub const S_IFMT: u16 = 0xF000; // File type mask
pub const S_IFDIR: u16 = 0x4000; // Directory
pub const S_IFCHR: u16 = 0x2000; // Character special
pub const S_IFIFO: u16 = 0x1000; // Pipe
pub const S_IFREG: u16 = 0x8000; // Regular file
pub const S_IREAD: u16 = 0x0100; // Read permission, owner
pub const S_IWRITE: u16 = 0x0080; // Write permission, owner
pub const S_IEXEC: u16 = 0x0040; // Execute/search permission, owner

// ===== Seek Whence =====
// Source: ucrt stdio.h
pub const SEEK_SET: i32 = 0; // Seek from beginning of file
pub const SEEK_CUR: i32 = 1; // Seek from current position
pub const SEEK_END: i32 = 2; // Seek from end of file
