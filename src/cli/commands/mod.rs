pub mod config;
pub mod extract;
pub mod scan;
pub mod sync;
