pub mod constants;
pub mod data;
