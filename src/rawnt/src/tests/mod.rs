// One test module per subsystem. Every test builds its own volume, so there
// is no shared state and no cross-test locking.

#[cfg(test)]
mod fs_tests;
#[cfg(test)]
mod path_tests;

#[cfg(test)]
pub mod setup {
    use crate::interface::MemVolume;
    use crate::FsShim;

    pub fn test_shim() -> FsShim<MemVolume> {
        FsShim::new(MemVolume::new())
    }

    // Everything under the volume's working directory exists up front.
    pub fn homed(name: &str) -> String {
        format!(r"C:\users\shim\{}", name)
    }
}
