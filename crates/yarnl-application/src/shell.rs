//! Shell orchestration for the embedded view.
//!
//! [`ShellController`] lives on the UI thread. It owns the shortcut slot and
//! the view status, reacts to [`ViewEvent`]s, and hands the session bootstrap
//! out as a [`BootstrapTask`] for the host to run in the background.

use std::sync::Arc;

use tracing::{debug, info, warn};
use yarnl_core::auth::has_session_cookie;
use yarnl_core::bridge::{BridgeMessage, PageRequest};
use yarnl_core::config::ShellConfig;
use yarnl_core::cookie::CookieJar;
use yarnl_core::preferences::PreferenceStore;
use yarnl_core::shortcut::{
    DispatchCommand, DispatchState, LaunchSignal, RecentShortcutSync, ShortcutDispatcher,
    ShortcutPublisher,
};
use yarnl_core::view::{
    ExternalOpener, LifecycleEvent, NavigationOutcome, NavigationTarget, ViewEvent, ViewHost,
    classify_navigation,
};
use yarnl_core::{Result, ServerConfig};
use yarnl_interaction::SessionBootstrapper;

/// Shown when the view reports a main-frame error without a description.
pub const MAIN_FRAME_ERROR_FALLBACK: &str = "Could not connect to server";

/// Where a launch lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRoute {
    /// No usable server is stored yet.
    Setup,
    WebView(ServerConfig),
}

/// Picks the first screen from the stored server URL.
pub async fn launch_route(prefs: &dyn PreferenceStore) -> LaunchRoute {
    match prefs.get_server_url().await {
        Some(url) => match ServerConfig::parse(&url) {
            Ok(server) => LaunchRoute::WebView(server),
            Err(_) => {
                warn!("[Shell] Stored server URL is invalid, returning to setup");
                LaunchRoute::Setup
            }
        },
        None => LaunchRoute::Setup,
    }
}

/// Collaborators the host provides.
pub struct ShellContext {
    pub config: ShellConfig,
    pub jar: Arc<dyn CookieJar>,
    pub view: Arc<dyn ViewHost>,
    pub opener: Arc<dyn ExternalOpener>,
    pub publisher: Arc<dyn ShortcutPublisher>,
}

/// What the host shows around the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStatus {
    pub loading: bool,
    pub page_ready: bool,
    pub current_url: Option<String>,
    /// Set after a main-frame error until [`ShellController::retry`].
    pub error: Option<String>,
}

/// Background half of a launch. Resolves to whether a fresh login happened.
pub struct BootstrapTask {
    bootstrapper: SessionBootstrapper,
    server: ServerConfig,
}

impl BootstrapTask {
    pub async fn run(self) -> bool {
        self.bootstrapper.ensure_authenticated(&self.server).await
    }
}

pub struct ShellController {
    server: ServerConfig,
    config: ShellConfig,
    jar: Arc<dyn CookieJar>,
    view: Arc<dyn ViewHost>,
    opener: Arc<dyn ExternalOpener>,
    bootstrapper: SessionBootstrapper,
    dispatcher: ShortcutDispatcher,
    recent: RecentShortcutSync,
    status: ViewStatus,
}

impl ShellController {
    pub fn new(server: ServerConfig, ctx: ShellContext) -> Result<Self> {
        let bootstrapper =
            SessionBootstrapper::new(Arc::clone(&ctx.jar), ctx.config.network.bootstrap)?;
        let dispatcher =
            ShortcutDispatcher::new(server.clone(), ctx.config.view.upload_panel_delay_ms);
        Ok(Self {
            server,
            config: ctx.config,
            jar: ctx.jar,
            view: ctx.view,
            opener: ctx.opener,
            bootstrapper,
            dispatcher,
            recent: RecentShortcutSync::new(ctx.publisher),
            status: ViewStatus::default(),
        })
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Cold start: navigates the view and returns the bootstrap to run.
    ///
    /// The view navigates right away so rendering never waits on the network.
    /// No task is returned when the jar already holds a session cookie; in that
    /// case the page validates the session itself.
    pub fn start(&mut self, signal: &LaunchSignal) -> Option<BootstrapTask> {
        let had_session = has_session_cookie(self.jar.get_cookie(self.server.base_url()).as_deref());

        if let Some(action) = signal.shortcut() {
            self.dispatcher.receive(action);
        }
        let mut initial_url = self.dispatcher.initial_url();
        if initial_url == self.server.base_url()
            && let Some(link) = self.same_host_deep_link(signal)
        {
            initial_url = link;
        }

        info!("[Shell] Loading {}", initial_url);
        self.navigate(&initial_url);

        if had_session {
            debug!("[Shell] Session cookie present, skipping bootstrap");
            return None;
        }
        Some(BootstrapTask {
            bootstrapper: self.bootstrapper.clone(),
            server: self.server.clone(),
        })
    }

    /// Reloads the view only when the bootstrap actually logged in.
    pub fn on_bootstrap_finished(&mut self, fresh_login: bool) {
        if fresh_login {
            info!("[Shell] Fresh login, reloading view");
            self.status.loading = true;
            self.view.reload();
        }
    }

    /// Re-entry while running (shortcut tap or notification tap).
    pub fn on_new_launch(&mut self, signal: &LaunchSignal) {
        if let Some(action) = signal.shortcut() {
            info!("[Shortcut] Received {}", action.kind());
            if let Some(command) = self.dispatcher.receive(action) {
                self.execute(command);
            }
            return;
        }
        if let Some(link) = self.same_host_deep_link(signal) {
            self.navigate(&link);
        }
    }

    pub fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::PageStarted { url } => {
                self.dispatcher.on_navigation_started();
                self.status.loading = true;
                self.status.page_ready = false;
                self.status.current_url = Some(url);
                self.request_page(PageRequest::PrimeAuthFlag);
            }
            ViewEvent::PageFinished { url } => {
                self.status.loading = false;
                self.status.error = None;
                self.status.current_url = Some(url);
                self.request_page(PageRequest::AnnounceReadiness {
                    delay_ms: self.config.view.ready_signal_delay_ms,
                });
                self.request_page(PageRequest::ReportRecentItem);
            }
            ViewEvent::MainFrameError { description } => {
                let message = description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| MAIN_FRAME_ERROR_FALLBACK.to_string());
                warn!("[Shell] Main frame error: {}", message);
                self.status.loading = false;
                self.status.error = Some(message);
            }
            ViewEvent::Bridge(message) => self.handle_bridge(message),
            ViewEvent::Lifecycle(event) => self.handle_lifecycle(event),
        }
    }

    /// Entry point for raw envelopes posted by the page.
    pub fn handle_bridge_raw(&mut self, raw: &str) -> Result<()> {
        match BridgeMessage::decode(raw) {
            Ok(message) => {
                self.handle_bridge(message);
                Ok(())
            }
            Err(e) => {
                warn!("[Shell] Dropping bridge message: {}", e);
                Err(e)
            }
        }
    }

    /// Decides whether the view may follow a link.
    pub fn intercept_navigation(&self, url: &str) -> NavigationOutcome {
        match classify_navigation(&self.server, url) {
            NavigationTarget::InView => NavigationOutcome::Allow,
            NavigationTarget::SpecialScheme | NavigationTarget::External => {
                match self.opener.open(url) {
                    Ok(()) => NavigationOutcome::OpenedExternally,
                    Err(e) => {
                        warn!("[Shell] No handler for {}: {}", url, e);
                        NavigationOutcome::Unhandled {
                            url: url.to_string(),
                            reason: e.user_message(),
                        }
                    }
                }
            }
        }
    }

    /// Clears a main-frame error and reloads.
    pub fn retry(&mut self) {
        self.status.error = None;
        self.status.loading = true;
        self.view.reload();
    }

    fn handle_bridge(&mut self, message: BridgeMessage) {
        match message {
            BridgeMessage::PageReady => {
                self.status.page_ready = true;
                if let Some(command) = self.dispatcher.on_page_ready() {
                    self.execute(command);
                }
            }
            BridgeMessage::ShortcutHandled => {
                if self.dispatcher.acknowledge() {
                    info!("[Shortcut] Page acknowledged pending action");
                }
            }
            BridgeMessage::RecentItem { id, label } => self.recent.on_recent_item(&id, &label),
        }
    }

    fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Paused | LifecycleEvent::Stopped => {
                if let Err(e) = self.jar.flush() {
                    warn!("[Shell] Cookie flush on {:?} failed: {}", event, e);
                }
            }
            LifecycleEvent::Resumed => debug!("[Shell] Resumed"),
        }
    }

    fn execute(&mut self, command: DispatchCommand) {
        match command {
            DispatchCommand::Navigate(url) => {
                info!("[Shortcut] Navigating to {}", url);
                self.navigate(&url);
            }
            DispatchCommand::RequestPage(request) => self.request_page(request),
        }
    }

    fn navigate(&mut self, url: &str) {
        self.status.loading = true;
        self.status.current_url = Some(url.to_string());
        self.view.navigate(url);
    }

    fn request_page(&self, request: PageRequest) {
        self.view.evaluate_script(&request.script());
    }

    /// Deep link of a notification tap, if it belongs to this server.
    fn same_host_deep_link(&self, signal: &LaunchSignal) -> Option<String> {
        let link = signal.deep_link_url.as_deref()?.trim();
        if link.is_empty() {
            return None;
        }
        if self.server.is_same_host(link) {
            Some(link.to_string())
        } else {
            let outcome = self.intercept_navigation(link);
            debug!("[Shell] Foreign deep link {}: {:?}", link, outcome);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use yarnl_core::YarnlError;
    use yarnl_core::shortcut::{DynamicShortcut, ShortcutAction};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ViewCall {
        Navigate(String),
        Reload,
        Script(String),
    }

    #[derive(Default)]
    struct RecordingView {
        calls: Mutex<Vec<ViewCall>>,
    }

    impl RecordingView {
        fn take(&self) -> Vec<ViewCall> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    impl ViewHost for RecordingView {
        fn navigate(&self, url: &str) {
            self.calls.lock().unwrap().push(ViewCall::Navigate(url.to_string()));
        }
        fn reload(&self) {
            self.calls.lock().unwrap().push(ViewCall::Reload);
        }
        fn evaluate_script(&self, script: &str) {
            self.calls.lock().unwrap().push(ViewCall::Script(script.to_string()));
        }
    }

    #[derive(Default)]
    struct Opener {
        refuse: bool,
        opened: Mutex<Vec<String>>,
    }

    impl ExternalOpener for Opener {
        fn open(&self, url: &str) -> Result<()> {
            if self.refuse {
                return Err(YarnlError::unhandled_navigation(url, "no handler"));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Publisher {
        published: Mutex<Vec<DynamicShortcut>>,
    }

    impl ShortcutPublisher for Publisher {
        fn set_dynamic_shortcut(&self, shortcut: &DynamicShortcut) -> Result<()> {
            self.published.lock().unwrap().push(shortcut.clone());
            Ok(())
        }
        fn remove_dynamic_shortcut(&self, _slot_id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryJar {
        header: Mutex<Option<String>>,
        flushes: Mutex<usize>,
    }

    impl CookieJar for MemoryJar {
        fn get_cookie(&self, _url: &str) -> Option<String> {
            self.header.lock().unwrap().clone()
        }
        fn set_cookie(&self, _url: &str, set_cookie: &str) {
            *self.header.lock().unwrap() = Some(set_cookie.to_string());
        }
        fn flush(&self) -> Result<()> {
            *self.flushes.lock().unwrap() += 1;
            Ok(())
        }
        fn clear_for_url(&self, _url: &str) -> Result<()> {
            *self.header.lock().unwrap() = None;
            Ok(())
        }
    }

    struct Fixture {
        view: Arc<RecordingView>,
        opener: Arc<Opener>,
        publisher: Arc<Publisher>,
        jar: Arc<MemoryJar>,
        shell: ShellController,
    }

    fn fixture_with(refuse_links: bool) -> Fixture {
        let view = Arc::new(RecordingView::default());
        let opener = Arc::new(Opener {
            refuse: refuse_links,
            ..Default::default()
        });
        let publisher = Arc::new(Publisher::default());
        let jar = Arc::new(MemoryJar::default());
        let shell = ShellController::new(
            ServerConfig::parse("https://y.example").unwrap(),
            ShellContext {
                config: ShellConfig::default(),
                jar: jar.clone(),
                view: view.clone(),
                opener: opener.clone(),
                publisher: publisher.clone(),
            },
        )
        .unwrap();
        Fixture {
            view,
            opener,
            publisher,
            jar,
            shell,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(false)
    }

    fn shortcut(kind: &str, id: Option<&str>) -> LaunchSignal {
        LaunchSignal {
            shortcut_action: Some(kind.to_string()),
            pattern_id: id.map(str::to_string),
            deep_link_url: None,
        }
    }

    fn load_page(f: &mut Fixture) {
        f.shell.handle_event(ViewEvent::PageStarted {
            url: "https://y.example".to_string(),
        });
        f.shell.handle_event(ViewEvent::PageFinished {
            url: "https://y.example".to_string(),
        });
        f.view.take();
    }

    #[test]
    fn test_cold_start_shortcut_is_initial_url() {
        let mut f = fixture();
        let task = f.shell.start(&shortcut("pattern", Some("42")));
        assert!(task.is_some());
        assert_eq!(
            f.view.take(),
            vec![ViewCall::Navigate("https://y.example#pattern/42".to_string())]
        );
        assert_eq!(f.shell.dispatch_state(), DispatchState::Idle);
        assert_eq!(
            f.shell.status().current_url.as_deref(),
            Some("https://y.example#pattern/42")
        );
    }

    #[test]
    fn test_session_cookie_skips_bootstrap() {
        let mut f = fixture();
        f.jar.set_cookie("https://y.example", "session_id=abc");
        assert!(f.shell.start(&LaunchSignal::default()).is_none());
    }

    #[test]
    fn test_reload_only_after_fresh_login() {
        let mut f = fixture();
        f.shell.start(&LaunchSignal::default());
        f.view.take();

        f.shell.on_bootstrap_finished(false);
        assert!(f.view.take().is_empty());

        f.shell.on_bootstrap_finished(true);
        assert_eq!(f.view.take(), vec![ViewCall::Reload]);
    }

    #[test]
    fn test_upload_shortcut_delivered_after_page_ready_and_acknowledged() {
        let mut f = fixture();
        f.shell.start(&shortcut("upload", None));
        assert_eq!(
            f.view.take(),
            vec![ViewCall::Navigate("https://y.example".to_string())]
        );

        load_page(&mut f);
        f.shell.handle_bridge_raw(r#"{"version":1,"type":"pageReady"}"#).unwrap();
        let calls = f.view.take();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], ViewCall::Script(s) if s.contains("showUploadPanel")));
        assert_eq!(f.shell.dispatch_state(), DispatchState::Pending(ShortcutAction::Upload));

        f.shell
            .handle_bridge_raw(r#"{"version":1,"type":"shortcutHandled"}"#)
            .unwrap();
        assert_eq!(f.shell.dispatch_state(), DispatchState::Idle);
    }

    #[test]
    fn test_page_lifecycle_scripts() {
        let mut f = fixture();
        f.shell.handle_event(ViewEvent::PageStarted {
            url: "https://y.example".to_string(),
        });
        assert!(f.shell.status().loading);
        let calls = f.view.take();
        assert!(matches!(&calls[..], [ViewCall::Script(s)] if s.contains("localStorage")));

        f.shell.handle_event(ViewEvent::PageFinished {
            url: "https://y.example".to_string(),
        });
        let calls = f.view.take();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], ViewCall::Script(s) if s.contains("pageReady")));
        assert!(matches!(&calls[1], ViewCall::Script(s) if s.contains("/api/patterns/recent")));
        assert!(!f.shell.status().loading);
    }

    #[test]
    fn test_reentry_on_ready_page_navigates_at_once() {
        let mut f = fixture();
        f.shell.start(&LaunchSignal::default());
        load_page(&mut f);
        f.shell.handle_event(ViewEvent::Bridge(BridgeMessage::PageReady));
        f.view.take();

        f.shell.on_new_launch(&shortcut("library", None));
        assert_eq!(
            f.view.take(),
            vec![ViewCall::Navigate("https://y.example#library".to_string())]
        );
    }

    #[test]
    fn test_pattern_without_id_is_discarded() {
        let mut f = fixture();
        f.shell.on_new_launch(&shortcut("pattern", None));
        assert_eq!(f.shell.dispatch_state(), DispatchState::Idle);
        assert!(f.view.take().is_empty());
    }

    #[test]
    fn test_recent_item_publishes_shortcut() {
        let mut f = fixture();
        f.shell
            .handle_bridge_raw(r#"{"version":1,"type":"recentItem","id":"7","label":""}"#)
            .unwrap();
        let published = f.publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].short_label, "Recent Pattern");
        assert_eq!(published[0].action, ShortcutAction::Pattern { id: "7".to_string() });
    }

    #[test]
    fn test_bad_bridge_message_is_rejected() {
        let mut f = fixture();
        assert!(f.shell.handle_bridge_raw(r#"{"type":"pageReady"}"#).is_err());
        assert!(!f.shell.status().page_ready);
    }

    #[test]
    fn test_navigation_intercept() {
        let f = fixture();
        assert_eq!(
            f.shell.intercept_navigation("https://y.example/patterns"),
            NavigationOutcome::Allow
        );
        assert_eq!(
            f.shell.intercept_navigation("https://ravelry.com/x"),
            NavigationOutcome::OpenedExternally
        );
        assert_eq!(
            f.opener.opened.lock().unwrap().as_slice(),
            ["https://ravelry.com/x".to_string()]
        );
    }

    #[test]
    fn test_unhandled_navigation_is_explicit() {
        let f = fixture_with(true);
        match f.shell.intercept_navigation("market://details?id=x") {
            NavigationOutcome::Unhandled { url, .. } => assert_eq!(url, "market://details?id=x"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_main_frame_error_and_retry() {
        let mut f = fixture();
        f.shell
            .handle_event(ViewEvent::MainFrameError { description: None });
        assert_eq!(
            f.shell.status().error.as_deref(),
            Some(MAIN_FRAME_ERROR_FALLBACK)
        );

        f.shell.retry();
        assert!(f.shell.status().error.is_none());
        assert_eq!(f.view.take(), vec![ViewCall::Reload]);
    }

    #[test]
    fn test_background_flushes_jar() {
        let mut f = fixture();
        f.shell.handle_event(ViewEvent::Lifecycle(LifecycleEvent::Paused));
        f.shell.handle_event(ViewEvent::Lifecycle(LifecycleEvent::Stopped));
        f.shell.handle_event(ViewEvent::Lifecycle(LifecycleEvent::Resumed));
        assert_eq!(*f.jar.flushes.lock().unwrap(), 2);
    }

    #[test]
    fn test_same_host_deep_link_on_cold_start() {
        let mut f = fixture();
        let signal = LaunchSignal {
            deep_link_url: Some("https://y.example/#current".to_string()),
            ..Default::default()
        };
        f.shell.start(&signal);
        assert_eq!(
            f.view.take(),
            vec![ViewCall::Navigate("https://y.example/#current".to_string())]
        );
    }

    #[test]
    fn test_foreign_deep_link_opens_externally() {
        let mut f = fixture();
        let signal = LaunchSignal {
            deep_link_url: Some("https://elsewhere.example/x".to_string()),
            ..Default::default()
        };
        f.shell.on_new_launch(&signal);
        assert!(f.view.take().is_empty());
        assert_eq!(f.opener.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_launch_route() {
        use tempfile::TempDir;
        use yarnl_infrastructure::FilePreferenceStore;

        let dir = TempDir::new().unwrap();
        let prefs = FilePreferenceStore::open(dir.path().join("preferences.toml"));
        assert_eq!(launch_route(&prefs).await, LaunchRoute::Setup);

        let server = ServerConfig::parse("https://y.example").unwrap();
        prefs.save_server_url(&server).await.unwrap();
        assert_eq!(launch_route(&prefs).await, LaunchRoute::WebView(server));
    }
}
