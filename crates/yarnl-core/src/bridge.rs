//! Two-way message channel between native code and the hosted page.
//!
//! Page to native: the page posts a JSON envelope through the object named
//! [`BRIDGE_OBJECT_NAME`]. Native to page: a fixed set of [`PageRequest`]s,
//! each rendered into one self-contained script.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, YarnlError};

/// Version stamped on every envelope in both directions.
pub const BRIDGE_PROTOCOL_VERSION: u32 = 1;

/// Global the host injects into the page; exposes `postMessage(string)`.
pub const BRIDGE_OBJECT_NAME: &str = "YarnlApp";

/// Messages the hosted page may send to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeMessage {
    /// The page finished its own startup and can accept requests.
    PageReady,
    /// The page performed the action of a pending shortcut.
    ShortcutHandled,
    /// The page reports the item the user touched most recently.
    RecentItem { id: String, label: String },
}

impl BridgeMessage {
    /// Decodes one raw envelope posted by the page.
    ///
    /// Envelopes with a missing or different version are rejected so that a
    /// newer page cannot drive an older shell with messages it misreads.
    pub fn decode(raw: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(raw)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| YarnlError::protocol("bridge envelope is not an object"))?;

        let version = object
            .remove("version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| YarnlError::protocol("bridge envelope has no version"))?;
        if version != u64::from(BRIDGE_PROTOCOL_VERSION) {
            return Err(YarnlError::protocol(format!(
                "unsupported bridge version {} (expected {})",
                version, BRIDGE_PROTOCOL_VERSION
            )));
        }

        serde_json::from_value(value).map_err(|e| YarnlError::protocol(e.to_string()))
    }

    /// Encodes this message as the page would post it.
    pub fn encode(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("version".to_string(), Value::from(BRIDGE_PROTOCOL_VERSION));
        }
        Ok(value.to_string())
    }
}

/// Requests the shell makes of the hosted page.
///
/// Scripts never return values the shell depends on; anything the page wants
/// to say comes back as a [`BridgeMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Mark the page as authenticated before its own scripts run.
    PrimeAuthFlag,
    /// Hide the login container and post `pageReady` after `delay_ms`.
    AnnounceReadiness { delay_ms: u64 },
    /// Open the upload panel and acknowledge with `shortcutHandled`.
    /// Nothing is posted when the page has no upload panel.
    OpenUploadPanel { delay_ms: u64 },
    /// Look up the most recent item and post it as `recentItem`.
    ReportRecentItem,
}

impl PageRequest {
    /// Renders the request into a script for `evaluate_script`.
    pub fn script(&self) -> String {
        let post = post_helper();
        match self {
            Self::PrimeAuthFlag => {
                "try{localStorage.setItem('authenticated','true')}catch(e){}".to_string()
            }
            Self::AnnounceReadiness { delay_ms } => format!(
                "(function(){{{post}\
                 var lc=document.getElementById('login-container');\
                 if(lc)lc.style.setProperty('display','none','important');\
                 fetch('/api/auth/me').then(function(r){{if(r.ok)localStorage.setItem('authenticated','true')}}).catch(function(){{}});\
                 setTimeout(function(){{post({{type:'pageReady'}});}},{delay_ms});\
                 }})()"
            ),
            Self::OpenUploadPanel { delay_ms } => format!(
                "(function(){{{post}\
                 setTimeout(function(){{\
                 if(typeof showUploadPanel==='function'){{showUploadPanel();post({{type:'shortcutHandled'}});}}\
                 }},{delay_ms});\
                 }})()"
            ),
            Self::ReportRecentItem => format!(
                "(function(){{{post}\
                 fetch('/api/patterns/recent').then(function(r){{return r.json();}})\
                 .then(function(d){{if(d&&d.id){{return fetch('/api/patterns/'+d.id).then(function(r){{return r.json();}})\
                 .then(function(p){{post({{type:'recentItem',id:String(p.id),label:p.name||''}});}});}}}})\
                 .catch(function(){{}});\
                 }})()"
            ),
        }
    }
}

fn post_helper() -> String {
    format!(
        "function post(m){{m.version={version};\
         if(typeof {bridge}!=='undefined'&&{bridge}.postMessage){{{bridge}.postMessage(JSON.stringify(m));}}}}",
        version = BRIDGE_PROTOCOL_VERSION,
        bridge = BRIDGE_OBJECT_NAME,
    )
}
