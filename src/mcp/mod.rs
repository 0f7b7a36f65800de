pub mod error;
pub mod server;
pub mod types;

pub use server::SomaviewServer;
pub use types::*;
