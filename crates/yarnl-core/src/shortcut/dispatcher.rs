//! Pending-shortcut state machine.
//!
//! One slot, last write wins. The slot lives only in memory, so a restart
//! always starts `Idle`. All transitions happen on the UI thread.

use tracing::debug;

use crate::bridge::PageRequest;
use crate::server::ServerConfig;
use crate::shortcut::action::{Delivery, ShortcutAction};

/// Observable state of the dispatcher. `Delivered` is not a state of its own:
/// delivery empties the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Pending(ShortcutAction),
}

/// What the host has to do to deliver an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCommand {
    Navigate(String),
    RequestPage(PageRequest),
}

pub struct ShortcutDispatcher {
    server: ServerConfig,
    pending: Option<ShortcutAction>,
    page_ready: bool,
    delivery_attempted: bool,
    upload_delay_ms: u64,
}

impl ShortcutDispatcher {
    /// `upload_delay_ms` is how long the page gets to restore its own state
    /// before an upload request issued at readiness runs.
    pub fn new(server: ServerConfig, upload_delay_ms: u64) -> Self {
        Self {
            server,
            pending: None,
            page_ready: false,
            delivery_attempted: false,
            upload_delay_ms,
        }
    }

    pub fn state(&self) -> DispatchState {
        match &self.pending {
            Some(action) => DispatchState::Pending(action.clone()),
            None => DispatchState::Idle,
        }
    }

    pub fn is_page_ready(&self) -> bool {
        self.page_ready
    }

    /// URL for the first navigation of the view.
    ///
    /// A pending direct-navigation action is delivered by this URL and leaves
    /// the slot; an acknowledged action stays pending until readiness.
    pub fn initial_url(&mut self) -> String {
        match self.pending.as_ref().and_then(|a| a.target_url(&self.server)) {
            Some(url) => {
                debug!("[Shortcut] Delivered by initial navigation: {}", url);
                self.pending = None;
                url
            }
            None => self.server.base_url().to_string(),
        }
    }

    /// Accepts an action from a launch signal, replacing any pending one.
    ///
    /// When the page is already showing and ready the action is delivered at
    /// once; otherwise it waits for [`on_page_ready`](Self::on_page_ready).
    pub fn receive(&mut self, action: ShortcutAction) -> Option<DispatchCommand> {
        if let Some(previous) = self.pending.replace(action.clone()) {
            debug!("[Shortcut] {:?} superseded by {:?}", previous, action);
        }
        self.delivery_attempted = false;
        if self.page_ready { self.deliver(0) } else { None }
    }

    /// The page has signalled readiness through the bridge.
    pub fn on_page_ready(&mut self) -> Option<DispatchCommand> {
        self.page_ready = true;
        self.deliver(self.upload_delay_ms)
    }

    /// A new navigation started in the view.
    ///
    /// The page loses readiness. An acknowledged action whose request already
    /// went out and never came back is dropped here.
    pub fn on_navigation_started(&mut self) {
        self.page_ready = false;
        if self.delivery_attempted
            && let Some(action) = self.pending.take()
        {
            debug!("[Shortcut] {:?} never acknowledged, resetting", action);
        }
        self.delivery_attempted = false;
    }

    /// The page confirmed it handled the pending action.
    ///
    /// Returns whether an acknowledged action was actually waiting.
    pub fn acknowledge(&mut self) -> bool {
        match self.pending {
            Some(ShortcutAction::Upload) => {
                self.pending = None;
                self.delivery_attempted = false;
                true
            }
            _ => false,
        }
    }

    fn deliver(&mut self, upload_delay_ms: u64) -> Option<DispatchCommand> {
        let action = self.pending.as_ref()?;
        match action.delivery() {
            Delivery::DirectNavigation => {
                let url = action.target_url(&self.server)?;
                self.pending = None;
                Some(DispatchCommand::Navigate(url))
            }
            Delivery::PageAcknowledged => {
                self.delivery_attempted = true;
                Some(DispatchCommand::RequestPage(PageRequest::OpenUploadPanel {
                    delay_ms: upload_delay_ms,
                }))
            }
        }
    }
}
