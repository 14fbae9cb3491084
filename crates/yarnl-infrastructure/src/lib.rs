pub mod config_service;
pub mod cookie_jar;
pub mod paths;
pub mod preference_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::cookie_jar::PersistentCookieJar;
pub use crate::paths::YarnlPaths;
pub use crate::preference_store::FilePreferenceStore;
