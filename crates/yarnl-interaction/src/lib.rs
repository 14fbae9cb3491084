//! Outbound HTTP: reachability probing, session bootstrap and push registration.

pub mod bootstrap;
pub mod http;
pub mod prober;
pub mod push_registration;

pub use bootstrap::{BootstrapOutcome, SessionBootstrapper};
pub use prober::{ConnectionProber, ProbeOutcome};
pub use push_registration::{PushRegistrar, RegistrationOutcome};
