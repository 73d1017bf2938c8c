// The seam to the native file API. The translation pipeline only ever talks
// to a `NativeVolume`; on Windows that is `HostVolume` over the Win32 and
// CRT entry points, everywhere (including the test suite) `MemVolume`
// stands in for the kernel.

use sysdefs::constants::err_const::{errno_from_native, Errno};
use sysdefs::constants::win_const::{ERROR_NOT_ENOUGH_MEMORY, ERROR_OUTOFMEMORY};
use sysdefs::data::fs_struct::{AttributeData, CreateParams};

/// Opaque native file handle. Exclusively owned by whoever holds it; every
/// acquisition must be paired with `close_handle` or a successful descriptor
/// adoption on every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// A native call failure, carrying the raw native error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeError {
    pub code: u32,
}

impl NativeError {
    pub fn new(code: u32) -> NativeError {
        NativeError { code }
    }

    /// Resource exhaustion is the one failure class the path normalizer may
    /// not absorb with a fallback.
    pub fn is_resource_exhaustion(&self) -> bool {
        self.code == ERROR_NOT_ENOUGH_MEMORY || self.code == ERROR_OUTOFMEMORY
    }

    pub fn to_errno(&self) -> Errno {
        errno_from_native(self.code).unwrap_or(Errno::EINVAL)
    }
}

/// Everything the shim needs from the native API: the two path queries the
/// normalizer runs, the open call, the metadata probe, and descriptor
/// adoption. Paths handed to these methods are already in the shim's owned
/// string form; implementations widen to UTF-16 as needed.
pub trait NativeVolume {
    /// Expand legacy short-form (8.3) components to their long names.
    fn long_path_name(&self, path: &str) -> Result<String, NativeError>;

    /// Resolve to an absolute path free of `.` and `..` components.
    fn full_path_name(&self, path: &str) -> Result<String, NativeError>;

    /// The native open call. `path` must already be namespace-qualified.
    fn create_file(&self, path: &str, parms: &CreateParams) -> Result<NativeHandle, NativeError>;

    /// Metadata probe: attributes, split size, timestamps.
    fn query_attributes(&self, path: &str) -> Result<AttributeData, NativeError>;

    /// Whether the target is a loadable binary image.
    fn binary_type(&self, path: &str) -> bool;

    fn close_handle(&self, handle: NativeHandle);

    /// Adopt a native handle into a POSIX-shaped descriptor. On success the
    /// descriptor owns the handle; on failure the caller still owns it.
    fn handle_to_fd(&self, handle: NativeHandle, oflag: i32) -> Result<i32, NativeError>;

    /// Set the text/binary/encoding translation mode of a descriptor.
    /// Returns the previous mode.
    fn set_fd_mode(&self, fd: i32, mode: i32) -> Result<i32, NativeError>;

    /// Close a descriptor (and the handle it owns).
    fn close_fd(&self, fd: i32) -> Result<(), NativeError>;
}

/// Scoped ownership of a native handle: closes on drop unless released into
/// a descriptor. Keeps every early-return path leak-free without goto-style
/// cleanup.
pub struct HandleGuard<'a, V: NativeVolume + ?Sized> {
    vol: &'a V,
    handle: Option<NativeHandle>,
}

impl<'a, V: NativeVolume + ?Sized> HandleGuard<'a, V> {
    pub fn new(vol: &'a V, handle: NativeHandle) -> HandleGuard<'a, V> {
        HandleGuard {
            vol,
            handle: Some(handle),
        }
    }

    /// Hand ownership of the handle to someone else (a freshly adopted
    /// descriptor); the guard stops tracking it.
    pub fn release(mut self) -> NativeHandle {
        self.handle.take().unwrap()
    }
}

impl<'a, V: NativeVolume + ?Sized> Drop for HandleGuard<'a, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.vol.close_handle(handle);
        }
    }
}

#[cfg(windows)]
pub use self::windows_host::HostVolume;

#[cfg(windows)]
mod windows_host {
    use super::{NativeError, NativeHandle, NativeVolume};
    use crate::interface::widestr::{ruststr_to_widebuf, widestr_to_ruststr};
    use sysdefs::constants::win_const::ERROR_INVALID_HANDLE;
    use sysdefs::data::fs_struct::{AttributeData, CreateParams};

    use std::mem;
    use std::os::raw::c_int;

    use windows_sys::Win32::Foundation::{
        CloseHandle, GetLastError, HANDLE, INVALID_HANDLE_VALUE,
    };
    use windows_sys::Win32::Security::SECURITY_ATTRIBUTES;
    use windows_sys::Win32::Storage::FileSystem::{
        CreateFileW, GetBinaryTypeW, GetFileAttributesExW, GetFileExInfoStandard,
        GetFullPathNameW, GetLongPathNameW, WIN32_FILE_ATTRIBUTE_DATA,
    };

    extern "C" {
        #[link_name = "_setmode"]
        fn crt_setmode(fd: c_int, mode: c_int) -> c_int;
    }

    fn last_error() -> NativeError {
        NativeError::new(unsafe { GetLastError() })
    }

    fn filetime_ticks(low: u32, high: u32) -> u64 {
        ((high as u64) << 32) | low as u64
    }

    /// The real native volume: Win32 for path queries, opens and metadata,
    /// the CRT for descriptor adoption.
    pub struct HostVolume;

    impl HostVolume {
        pub fn new() -> HostVolume {
            HostVolume
        }
    }

    impl NativeVolume for HostVolume {
        fn long_path_name(&self, path: &str) -> Result<String, NativeError> {
            let wide = ruststr_to_widebuf(path);
            let needed = unsafe { GetLongPathNameW(wide.as_ptr(), std::ptr::null_mut(), 0) };
            if needed == 0 {
                return Err(last_error());
            }
            let mut buf = vec![0u16; needed as usize];
            let written =
                unsafe { GetLongPathNameW(wide.as_ptr(), buf.as_mut_ptr(), needed) };
            if written == 0 {
                return Err(last_error());
            }
            widestr_to_ruststr(&buf[..written as usize])
                .map_err(|_| NativeError::new(ERROR_INVALID_HANDLE))
        }

        fn full_path_name(&self, path: &str) -> Result<String, NativeError> {
            let wide = ruststr_to_widebuf(path);
            let needed = unsafe {
                GetFullPathNameW(wide.as_ptr(), 0, std::ptr::null_mut(), std::ptr::null_mut())
            };
            if needed == 0 {
                return Err(last_error());
            }
            let mut buf = vec![0u16; needed as usize];
            let written = unsafe {
                GetFullPathNameW(wide.as_ptr(), needed, buf.as_mut_ptr(), std::ptr::null_mut())
            };
            if written == 0 {
                return Err(last_error());
            }
            widestr_to_ruststr(&buf[..written as usize])
                .map_err(|_| NativeError::new(ERROR_INVALID_HANDLE))
        }

        fn create_file(
            &self,
            path: &str,
            parms: &CreateParams,
        ) -> Result<NativeHandle, NativeError> {
            let wide = ruststr_to_widebuf(path);
            let mut security: SECURITY_ATTRIBUTES = unsafe { mem::zeroed() };
            security.nLength = mem::size_of::<SECURITY_ATTRIBUTES>() as u32;
            security.bInheritHandle = parms.inherit_handle as i32;
            let handle = unsafe {
                CreateFileW(
                    wide.as_ptr(),
                    parms.desired_access,
                    parms.share_mode,
                    &security,
                    parms.creation_disposition,
                    parms.flags_and_attributes,
                    std::ptr::null_mut(),
                )
            };
            if handle == INVALID_HANDLE_VALUE {
                return Err(last_error());
            }
            Ok(NativeHandle(handle as u64))
        }

        fn query_attributes(&self, path: &str) -> Result<AttributeData, NativeError> {
            let wide = ruststr_to_widebuf(path);
            let mut finfo: WIN32_FILE_ATTRIBUTE_DATA = unsafe { mem::zeroed() };
            let ok = unsafe {
                GetFileAttributesExW(
                    wide.as_ptr(),
                    GetFileExInfoStandard,
                    &mut finfo as *mut _ as *mut core::ffi::c_void,
                )
            };
            if ok == 0 {
                return Err(last_error());
            }
            Ok(AttributeData {
                file_attributes: finfo.dwFileAttributes,
                creation_time: filetime_ticks(
                    finfo.ftCreationTime.dwLowDateTime,
                    finfo.ftCreationTime.dwHighDateTime,
                ),
                last_access_time: filetime_ticks(
                    finfo.ftLastAccessTime.dwLowDateTime,
                    finfo.ftLastAccessTime.dwHighDateTime,
                ),
                last_write_time: filetime_ticks(
                    finfo.ftLastWriteTime.dwLowDateTime,
                    finfo.ftLastWriteTime.dwHighDateTime,
                ),
                file_size_high: finfo.nFileSizeHigh,
                file_size_low: finfo.nFileSizeLow,
            })
        }

        fn binary_type(&self, path: &str) -> bool {
            let wide = ruststr_to_widebuf(path);
            let mut bin_type: u32 = 0;
            unsafe { GetBinaryTypeW(wide.as_ptr(), &mut bin_type) != 0 }
        }

        fn close_handle(&self, handle: NativeHandle) {
            unsafe {
                CloseHandle(handle.0 as HANDLE);
            }
        }

        fn handle_to_fd(&self, handle: NativeHandle, oflag: i32) -> Result<i32, NativeError> {
            let fd = unsafe { libc::open_osfhandle(handle.0 as libc::intptr_t, oflag) };
            if fd == -1 {
                return Err(last_error());
            }
            Ok(fd)
        }

        fn set_fd_mode(&self, fd: i32, mode: i32) -> Result<i32, NativeError> {
            let previous = unsafe { crt_setmode(fd, mode) };
            if previous == -1 {
                return Err(last_error());
            }
            Ok(previous)
        }

        fn close_fd(&self, fd: i32) -> Result<(), NativeError> {
            // The CRT descriptor owns the underlying handle.
            let ret = unsafe { libc::close(fd) };
            if ret == -1 {
                return Err(NativeError::new(ERROR_INVALID_HANDLE));
            }
            Ok(())
        }
    }
}
