pub mod auth;
pub mod bridge;
pub mod config;
pub mod cookie;
pub mod error;
pub mod preferences;
pub mod push;
pub mod server;
pub mod shortcut;
pub mod view;

// Re-export common error type
pub use error::{Result, YarnlError};
pub use server::ServerConfig;
