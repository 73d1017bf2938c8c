// Per-context entry object for the shim. Owns nothing but the volume
// backend; every call allocates and releases its own buffers and handles,
// so a single `FsShim` may be used from any number of threads.

pub use sysdefs::constants::err_const::{syscall_error, Errno};

use crate::interface::host::NativeVolume;

pub struct FsShim<V: NativeVolume> {
    vol: V,
}

impl<V: NativeVolume> FsShim<V> {
    pub fn new(vol: V) -> FsShim<V> {
        FsShim { vol }
    }

    pub fn volume(&self) -> &V {
        &self.vol
    }
}
