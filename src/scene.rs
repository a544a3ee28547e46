pub mod backend;
pub mod builder;
pub mod cache;
pub mod memory;
