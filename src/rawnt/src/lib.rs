//! rawnt lets code written against POSIX-style file APIs (`fopen`,
//! `open`/`sopen`, `stat`) run over an NT-style native file API. It
//! translates caller paths into namespace-qualified long-path form, POSIX
//! open modes into the native creation triple, and native metadata into
//! POSIX stat records. The native API is reached through the
//! `interface::host::NativeVolume` seam, so the translation pipeline itself
//! is host-independent.

pub mod interface;
pub mod ntcompat;
mod tests;

pub use ntcompat::filesystem::create_device_path;
pub use ntcompat::openmode::{open_parms, translate_mode};
pub use ntcompat::shim::FsShim;
