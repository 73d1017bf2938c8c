#![allow(dead_code)]

use sysdefs::constants::err_const::{syscall_error, Errno};
use sysdefs::constants::fs_const::{
    O_APPEND, O_BINARY, O_RDONLY, O_TEXT, O_U16TEXT, O_U8TEXT, O_WTEXT, S_IEXEC, S_IFDIR,
    S_IFREG, S_IREAD, S_IWRITE,
};
use sysdefs::constants::win_const::{
    FILETIME_EPOCH_DIFFERENCE_SECS, FILETIME_TICKS_PER_SECOND, FILE_ATTRIBUTE_DIRECTORY,
    FILE_ATTRIBUTE_READONLY, FILE_FLAG_BACKUP_SEMANTICS, FILE_READ_ATTRIBUTES,
    FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use sysdefs::data::fs_struct::{CreateParams, StatData, StatData64};

use crate::interface::host::{HandleGuard, NativeError, NativeVolume};
use crate::interface::misc::log_verbose;
use crate::interface::widestr::widestr_to_ruststr;
use crate::ntcompat::filesystem::create_device_path;
use crate::ntcompat::openmode::{open_parms, translate_mode};
use crate::ntcompat::shim::FsShim;

// Descriptor flags that survive handle adoption.
const ADOPT_FLAG_MASK: i32 = O_APPEND | O_RDONLY | O_TEXT | O_WTEXT;
// Translation-mode flags applied as the second adoption step.
const SETMODE_MASK: i32 = O_TEXT | O_BINARY | O_U16TEXT | O_U8TEXT | O_WTEXT;

// Translate a native failure at the point of occurrence: exactly one
// taxonomy value, returned immediately, no retries.
fn map_native(err: NativeError, call: &str) -> Errno {
    log_verbose(&format!(
        "native failure in {}: code {} -> {:?}",
        call,
        err.code,
        err.to_errno()
    ));
    err.to_errno()
}

fn filetime_to_posix(ticks: u64) -> i64 {
    // Remove the diff between the 1601 and 1970 epochs, then convert
    // 100-nanosecond ticks to seconds.
    let shifted = ticks as i64 - FILETIME_EPOCH_DIFFERENCE_SECS * FILETIME_TICKS_PER_SECOND;
    shifted / FILETIME_TICKS_PER_SECOND
}

impl<V: NativeVolume> FsShim<V> {
    //------------------------------------OPEN SYSCALLS------------------------------------

    /// Flag-based open, narrow variant. Returns a descriptor on success and
    /// the negative errno sentinel on failure.
    pub fn sopen_syscall(&self, path: &str, oflag: i32, shflag: i32, pmode: i32) -> i32 {
        match self.open_with_flags(path, oflag, shflag, pmode) {
            Ok(fd) => fd,
            Err(e) => syscall_error(e, "sopen", "failed to open file"),
        }
    }

    /// Flag-based open, wide variant.
    pub fn wsopen_syscall(&self, path: &[u16], oflag: i32, shflag: i32, pmode: i32) -> i32 {
        match widestr_to_ruststr(path) {
            Ok(p) => self.sopen_syscall(&p, oflag, shflag, pmode),
            Err(e) => syscall_error(e, "wsopen", "path is not valid UTF-16"),
        }
    }

    /// Mode-string open, narrow variant. The returned stream handle is the
    /// descriptor itself.
    pub fn fopen_syscall(&self, path: &str, mode: &str) -> i32 {
        let oflag = translate_mode(mode);
        match self.open_with_flags(path, oflag, 0, 0) {
            Ok(fd) => fd,
            Err(e) => syscall_error(e, "fopen", "failed to open stream"),
        }
    }

    /// Mode-string open, wide variant.
    pub fn wfopen_syscall(&self, path: &[u16], mode: &[u16]) -> i32 {
        let (path, mode) = match (widestr_to_ruststr(path), widestr_to_ruststr(mode)) {
            (Ok(p), Ok(m)) => (p, m),
            _ => return syscall_error(Errno::EINVAL, "wfopen", "arguments are not valid UTF-16"),
        };
        self.fopen_syscall(&path, &mode)
    }

    pub fn close_syscall(&self, fd: i32) -> i32 {
        match self.volume().close_fd(fd) {
            Ok(()) => 0,
            Err(e) => syscall_error(map_native(e, "close"), "close", "bad file descriptor"),
        }
    }

    // The open pipeline proper: normalize, open natively, adopt the handle
    // into a descriptor, then apply any requested translation mode. The
    // native handle is guard-scoped until the descriptor owns it; a failed
    // mode-set closes the descriptor it was applied to.
    fn open_with_flags(
        &self,
        path: &str,
        oflag: i32,
        shflag: i32,
        pmode: i32,
    ) -> Result<i32, Errno> {
        let parms = open_parms(oflag, shflag, pmode);
        let device_path = create_device_path(self.volume(), path)?;

        let handle = self
            .volume()
            .create_file(&device_path, &parms)
            .map_err(|e| map_native(e, "create_file"))?;
        let guard = HandleGuard::new(self.volume(), handle);

        let fd = self
            .volume()
            .handle_to_fd(handle, oflag & ADOPT_FLAG_MASK)
            .map_err(|e| map_native(e, "handle_to_fd"))?;
        // The descriptor owns the handle from here on.
        let _ = guard.release();

        if oflag & SETMODE_MASK != 0 {
            if let Err(e) = self.volume().set_fd_mode(fd, oflag & SETMODE_MASK) {
                let _ = self.volume().close_fd(fd);
                return Err(map_native(e, "set_fd_mode"));
            }
        }

        Ok(fd)
    }

    //------------------------------------STAT SYSCALLS------------------------------------

    /// stat() will return 0 when success and the negative sentinel when fail.
    pub fn stat_syscall(&self, path: &str, buffer: &mut StatData) -> i32 {
        match self.stat_record(path) {
            Ok(record) => {
                *buffer = record;
                0
            }
            Err(e) => syscall_error(e, "stat", "failed to stat path"),
        }
    }

    pub fn wstat_syscall(&self, path: &[u16], buffer: &mut StatData) -> i32 {
        match widestr_to_ruststr(path) {
            Ok(p) => self.stat_syscall(&p, buffer),
            Err(e) => syscall_error(e, "wstat", "path is not valid UTF-16"),
        }
    }

    /// Widened variant: the same record with size and times carried at full
    /// width.
    pub fn stat64_syscall(&self, path: &str, buffer: &mut StatData64) -> i32 {
        let mut narrow = StatData::default();
        let ret = self.stat_syscall(path, &mut narrow);
        if ret == 0 {
            *buffer = StatData64::widen(&narrow);
        }
        ret
    }

    pub fn wstat64_syscall(&self, path: &[u16], buffer: &mut StatData64) -> i32 {
        match widestr_to_ruststr(path) {
            Ok(p) => self.stat64_syscall(&p, buffer),
            Err(e) => syscall_error(e, "wstat64", "path is not valid UTF-16"),
        }
    }

    // Metadata bridge: open the target metadata-only (full sharing, backup
    // semantics so directories open too), snapshot its attributes, and shape
    // the POSIX record. The probe handle is closed on every exit path.
    fn stat_record(&self, path: &str) -> Result<StatData, Errno> {
        let device_path = create_device_path(self.volume(), path)?;

        let parms = CreateParams {
            desired_access: FILE_READ_ATTRIBUTES,
            share_mode: FILE_SHARE_DELETE | FILE_SHARE_READ | FILE_SHARE_WRITE,
            creation_disposition: OPEN_EXISTING,
            flags_and_attributes: FILE_FLAG_BACKUP_SEMANTICS,
            inherit_handle: false,
        };
        let handle = self
            .volume()
            .create_file(&device_path, &parms)
            .map_err(|e| map_native(e, "create_file"))?;
        let _guard = HandleGuard::new(self.volume(), handle);

        let finfo = self
            .volume()
            .query_attributes(&device_path)
            .map_err(|e| map_native(e, "query_attributes"))?;

        let mut mode: u16 = S_IREAD;
        if finfo.file_attributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
            mode |= S_IFDIR | S_IEXEC;
        } else {
            mode |= S_IFREG;
            if self.volume().binary_type(&device_path) {
                mode |= S_IEXEC;
            }
        }
        // Files are write-permitted unless explicitly read-only.
        if finfo.file_attributes & FILE_ATTRIBUTE_READONLY == 0 {
            mode |= S_IWRITE;
        }

        let mtime = filetime_to_posix(finfo.last_write_time);
        Ok(StatData {
            st_mode: mode,
            st_nlink: 1,
            st_size: finfo.file_size() as i32,
            st_atime: filetime_to_posix(finfo.last_access_time),
            st_mtime: mtime,
            // change time is not independently tracked
            st_ctime: mtime,
            ..StatData::default()
        })
    }
}
