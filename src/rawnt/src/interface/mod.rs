pub mod host;
pub mod memvol;
pub mod misc;
pub mod widestr;

pub use host::{HandleGuard, NativeError, NativeHandle, NativeVolume};
pub use memvol::MemVolume;
pub use widestr::{ruststr_to_widebuf, widestr_to_ruststr};

#[cfg(windows)]
pub use host::HostVolume;
