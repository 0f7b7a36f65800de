pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod mcp;
pub mod models;
pub mod query;
pub mod services;
pub mod session;

pub use error::SomaviewError;
