pub mod common;
pub mod config;
pub mod linode;

pub use config::*;
