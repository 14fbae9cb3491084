//! Shell configuration model (`config.toml`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connect/read timeout pair for one class of outbound request.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect_secs: u64,
    pub read_secs: u64,
}

impl Timeouts {
    pub const fn new(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect_secs,
            read_secs,
        }
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// who-am-I, auth-mode and login requests
    #[serde(default = "default_bootstrap_timeouts")]
    pub bootstrap: Timeouts,
    /// user-initiated reachability probe
    #[serde(default = "default_interactive_timeouts")]
    pub probe: Timeouts,
    /// push token registration
    #[serde(default = "default_interactive_timeouts")]
    pub push: Timeouts,
}

fn default_bootstrap_timeouts() -> Timeouts {
    Timeouts::new(5, 5)
}

fn default_interactive_timeouts() -> Timeouts {
    Timeouts::new(10, 10)
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            bootstrap: default_bootstrap_timeouts(),
            probe: default_interactive_timeouts(),
            push: default_interactive_timeouts(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// Appended to the engine's user agent so the server can tell the shell apart.
    #[serde(default = "default_user_agent_suffix")]
    pub user_agent_suffix: String,
    /// Delay between page-finished and the page posting `pageReady`.
    #[serde(default = "default_ready_delay_ms")]
    pub ready_signal_delay_ms: u64,
    /// Delay before an upload shortcut opens the panel after readiness.
    #[serde(default = "default_upload_delay_ms")]
    pub upload_panel_delay_ms: u64,
}

fn default_user_agent_suffix() -> String {
    "YarnlShell/1.0".to_string()
}

fn default_ready_delay_ms() -> u64 {
    300
}

fn default_upload_delay_ms() -> u64 {
    1500
}

impl ViewSettings {
    /// `base` with the shell suffix appended, unless it is already there.
    pub fn user_agent(&self, base: &str) -> String {
        let base = base.trim();
        if self.user_agent_suffix.is_empty() || base.ends_with(&self.user_agent_suffix) {
            return base.to_string();
        }
        if base.is_empty() {
            return self.user_agent_suffix.clone();
        }
        format!("{} {}", base, self.user_agent_suffix)
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            user_agent_suffix: default_user_agent_suffix(),
            ready_signal_delay_ms: default_ready_delay_ms(),
            upload_panel_delay_ms: default_upload_delay_ms(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PushSettings {
    /// Platform tag sent with every token registration.
    #[serde(default = "default_platform")]
    pub platform: String,
}

fn default_platform() -> String {
    "android".to_string()
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            platform: default_platform(),
        }
    }
}

/// Debug settings
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DebugSettings {
    /// Default tracing filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellConfig {
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub push: PushSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}
