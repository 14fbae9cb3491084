//! Durable shell preferences.

pub mod model;
pub mod repository;

pub use model::Preferences;
pub use repository::PreferenceStore;
