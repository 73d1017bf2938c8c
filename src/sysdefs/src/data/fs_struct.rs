#![allow(dead_code)]

//derive eq attributes for testing whether the structs equal other records
//coming back from stat/stat64

/// POSIX-shaped stat record, narrow variant. Fields the native metadata
/// cannot faithfully produce (uid/gid, inode, device) stay zeroed; link
/// count is fixed at 1 because hard links are not resolved.
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct StatData {
    pub st_dev: u32,
    pub st_ino: u16,
    pub st_mode: u16,
    pub st_nlink: i16,
    pub st_uid: i16,
    pub st_gid: i16,
    pub st_rdev: u32,
    pub st_size: i32,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

/// Widened stat record. A lossless projection of `StatData`.
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct StatData64 {
    pub st_dev: u32,
    pub st_ino: u16,
    pub st_mode: u16,
    pub st_nlink: i16,
    pub st_uid: i16,
    pub st_gid: i16,
    pub st_rdev: u32,
    pub st_size: i64,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

impl StatData64 {
    pub fn widen(narrow: &StatData) -> StatData64 {
        StatData64 {
            st_dev: narrow.st_dev,
            st_ino: narrow.st_ino,
            st_mode: narrow.st_mode,
            st_nlink: narrow.st_nlink,
            st_uid: narrow.st_uid,
            st_gid: narrow.st_gid,
            st_rdev: narrow.st_rdev,
            st_size: narrow.st_size as i64,
            st_atime: narrow.st_atime,
            st_mtime: narrow.st_mtime,
            st_ctime: narrow.st_ctime,
        }
    }
}

/// Native metadata snapshot, the shape `GetFileAttributesEx` reports:
/// attribute bitset, split 64-bit size, and 100-nanosecond-tick timestamps.
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct AttributeData {
    pub file_attributes: u32,
    pub creation_time: u64,
    pub last_access_time: u64,
    pub last_write_time: u64,
    pub file_size_high: u32,
    pub file_size_low: u32,
}

impl AttributeData {
    pub fn file_size(&self) -> u64 {
        ((self.file_size_high as u64) << 32) + self.file_size_low as u64
    }
}

/// The native creation triple (plus attributes and inheritance) an open
/// request translates into. Pure data; computed once per open.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
#[repr(C)]
pub struct CreateParams {
    pub desired_access: u32,
    pub share_mode: u32,
    pub creation_disposition: u32,
    pub flags_and_attributes: u32,
    pub inherit_handle: bool,
}
