pub mod breathe;
pub mod config;
pub mod meditate;
pub mod patterns;
