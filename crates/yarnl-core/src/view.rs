//! Embedded view host contract.

use crate::bridge::BridgeMessage;
use crate::error::Result;
use crate::server::ServerConfig;

/// Calls the shell makes into the embedded browser view.
///
/// All methods are fire-and-forget and must be invoked from the UI thread.
pub trait ViewHost: Send + Sync {
    fn navigate(&self, url: &str);

    fn reload(&self);

    fn evaluate_script(&self, script: &str);
}

/// Opens URLs outside the shell (system browser, store, other apps).
pub trait ExternalOpener: Send + Sync {
    /// Fails when nothing on the platform can handle `url`.
    fn open(&self, url: &str) -> Result<()>;
}

/// Host lifecycle transitions the shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Resumed,
    Paused,
    Stopped,
}

/// Callbacks from the view host into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    PageStarted { url: String },
    PageFinished { url: String },
    MainFrameError { description: Option<String> },
    Bridge(BridgeMessage),
    Lifecycle(LifecycleEvent),
}

/// Where an intercepted navigation should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Same host as the server: stays in the view.
    InView,
    /// App-dispatch schemes such as `intent:` and `market:`.
    SpecialScheme,
    /// Anything else.
    External,
}

const SPECIAL_SCHEMES: [&str; 2] = ["intent", "market"];

/// Classifies an intercepted navigation against the configured server.
pub fn classify_navigation(server: &ServerConfig, url: &str) -> NavigationTarget {
    if server.is_same_host(url) {
        return NavigationTarget::InView;
    }
    let scheme = url.split_once(':').map(|(scheme, _)| scheme.to_ascii_lowercase());
    match scheme.as_deref() {
        Some(s) if SPECIAL_SCHEMES.contains(&s) => NavigationTarget::SpecialScheme,
        _ => NavigationTarget::External,
    }
}

/// Result of an intercepted navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Let the view load it.
    Allow,
    /// Denied in the view and handed to the external opener.
    OpenedExternally,
    /// Denied in the view and nothing could take it.
    Unhandled { url: String, reason: String },
}

impl NavigationOutcome {
    pub fn allows_view(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
