use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod host;
mod logging;

use commands::AppContext;

#[derive(Parser)]
#[command(name = "yarnl")]
#[command(about = "Yarnl shell - headless host for a self-hosted Yarnl server", long_about = None)]
struct Cli {
    /// Directory holding config.toml, preferences, cookies and logs
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, probe and save the server URL
    Setup { url: String },
    /// Check whether a server answers, without saving anything
    Probe { url: String },
    /// Show stored server, session and push state
    Status,
    /// Run the session bootstrap once and report the outcome
    Bootstrap,
    /// Launch the shell against the saved server
    Launch {
        /// Shortcut kind: library, current, upload or pattern
        #[arg(long)]
        shortcut: Option<String>,
        /// Pattern id for `--shortcut pattern`
        #[arg(long)]
        pattern_id: Option<String>,
        /// Deep link carried by a notification tap
        #[arg(long)]
        deep_link: Option<String>,
        /// Have the page post `pageReady` once it finishes loading
        #[arg(long)]
        page_ready: bool,
        /// Bridge envelopes to feed after the page finishes loading
        #[arg(long = "bridge", value_name = "JSON")]
        bridge: Vec<String>,
    },
    /// Store a push token and register it with the server
    PushToken { token: String },
    /// Route a push payload to the notifier
    PushMessage {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Turn notifications on or off
    Notifications { state: Toggle },
    /// Manage the cookie jar
    Cookies {
        #[command(subcommand)]
        action: CookieAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
enum CookieAction {
    /// Drop every cookie for the saved server
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (paths, config) = AppContext::locate(cli.config_dir)?;
    let _log_guard = logging::init(&paths.logs_dir(), &config.debug.log_level)?;
    let ctx = AppContext::open(paths, config);

    match cli.command {
        Commands::Setup { url } => commands::setup::setup(&ctx, &url).await?,
        Commands::Probe { url } => commands::setup::probe(&ctx, &url).await?,
        Commands::Status => commands::status::status(&ctx).await?,
        Commands::Bootstrap => commands::session::bootstrap(&ctx).await?,
        Commands::Launch {
            shortcut,
            pattern_id,
            deep_link,
            page_ready,
            bridge,
        } => {
            let signal = yarnl_core::shortcut::LaunchSignal {
                shortcut_action: shortcut,
                pattern_id,
                deep_link_url: deep_link,
            };
            commands::session::launch(&ctx, signal, page_ready, &bridge).await?
        }
        Commands::PushToken { token } => commands::push::push_token(&ctx, &token).await?,
        Commands::PushMessage {
            title,
            body,
            kind,
            url,
        } => commands::push::push_message(title, body, kind, url)?,
        Commands::Notifications { state } => {
            commands::push::notifications(&ctx, matches!(state, Toggle::On)).await?
        }
        Commands::Cookies { action } => match action {
            CookieAction::Clear => commands::cookies::clear(&ctx).await?,
        },
    }

    Ok(())
}
