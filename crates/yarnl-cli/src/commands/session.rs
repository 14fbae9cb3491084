use std::sync::Arc;

use anyhow::Result;
use yarnl_application::{LaunchRoute, ShellContext, ShellController, launch_route};
use yarnl_core::bridge::BridgeMessage;
use yarnl_core::shortcut::LaunchSignal;
use yarnl_core::view::{LifecycleEvent, ViewEvent};
use yarnl_interaction::{BootstrapOutcome, SessionBootstrapper};

use super::AppContext;
use super::push::{describe, registrar};
use crate::host::{HeadlessView, PrintingOpener, PrintingPublisher};

pub async fn bootstrap(ctx: &AppContext) -> Result<()> {
    let server = ctx.server().await?;
    let bootstrapper = SessionBootstrapper::new(ctx.jar.clone(), ctx.config.network.bootstrap)?;

    let message = match bootstrapper.bootstrap(&server).await {
        BootstrapOutcome::SessionValid => "Session already valid".to_string(),
        BootstrapOutcome::LoggedIn => "Logged in automatically".to_string(),
        BootstrapOutcome::AuthModeUnavailable => "Could not read the server's auth mode".to_string(),
        BootstrapOutcome::InteractiveLoginRequired { mode } => {
            format!("Server mode '{}' requires logging in through the page", mode)
        }
        BootstrapOutcome::NoDefaultIdentity => "Single-user server names no default user".to_string(),
        BootstrapOutcome::LoginFailed { reason } => format!("Auto-login failed: {}", reason),
    };
    println!("{}", message);
    Ok(())
}

/// Runs one headless launch: navigation, bootstrap, push refresh, page load,
/// then any bridge messages given on the command line.
pub async fn launch(
    ctx: &AppContext,
    signal: LaunchSignal,
    page_ready: bool,
    bridge: &[String],
) -> Result<()> {
    let server = match launch_route(ctx.prefs.as_ref()).await {
        LaunchRoute::Setup => {
            println!("No server configured. Run `yarnl setup <url>` first.");
            return Ok(());
        }
        LaunchRoute::WebView(server) => server,
    };

    println!(
        "view: user agent {}",
        ctx.config.view.user_agent(concat!("yarnl-cli/", env!("CARGO_PKG_VERSION")))
    );
    let mut shell = ShellController::new(
        server.clone(),
        ShellContext {
            config: ctx.config.clone(),
            jar: ctx.jar.clone(),
            view: Arc::new(HeadlessView),
            opener: Arc::new(PrintingOpener),
            publisher: Arc::new(PrintingPublisher),
        },
    )?;

    let registrar = registrar(ctx)?;
    let bootstrap = shell.start(&signal);
    let (fresh_login, push) = tokio::join!(
        async {
            match bootstrap {
                Some(task) => task.run().await,
                None => false,
            }
        },
        registrar.refresh()
    );
    shell.on_bootstrap_finished(fresh_login);
    if let Some(outcome) = push {
        println!("{}", describe(&outcome));
    }

    let url = shell
        .status()
        .current_url
        .clone()
        .unwrap_or_else(|| server.base_url().to_string());
    shell.handle_event(ViewEvent::PageStarted { url: url.clone() });
    shell.handle_event(ViewEvent::PageFinished { url });

    let ready = if page_ready {
        Some(BridgeMessage::PageReady.encode()?)
    } else {
        None
    };
    for raw in ready.iter().chain(bridge) {
        if let Err(e) = shell.handle_bridge_raw(raw) {
            eprintln!("Ignored bridge message: {}", e);
        }
    }

    shell.handle_event(ViewEvent::Lifecycle(LifecycleEvent::Stopped));
    println!("pending shortcut: {:?}", shell.dispatch_state());
    Ok(())
}
