pub mod fs_calls;
