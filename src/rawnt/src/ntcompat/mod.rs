pub mod filesystem;
pub mod openmode;
pub mod shim;
pub mod syscalls;
