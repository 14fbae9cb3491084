//! Application layer for the yarnl shell.
//!
//! Coordinates the core state machines with the HTTP components and the
//! collaborator traits a host provides (view, opener, publisher, notifier).

pub mod push_router;
pub mod setup;
pub mod shell;

pub use push_router::PushMessageRouter;
pub use setup::{ServerSetup, SetupOutcome};
pub use shell::{BootstrapTask, LaunchRoute, ShellContext, ShellController, ViewStatus, launch_route};
