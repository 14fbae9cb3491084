use std::collections::HashMap;

use anyhow::Result;
use yarnl_application::PushMessageRouter;
use yarnl_core::preferences::PreferenceStore;
use yarnl_interaction::{PushRegistrar, RegistrationOutcome};

use super::AppContext;
use crate::host::PrintingNotifier;

pub fn registrar(ctx: &AppContext) -> Result<PushRegistrar> {
    Ok(PushRegistrar::new(
        ctx.jar.clone(),
        ctx.prefs.clone(),
        ctx.config.network.push,
        ctx.config.push.platform.clone(),
    )?)
}

pub async fn push_token(ctx: &AppContext, token: &str) -> Result<()> {
    let outcome = registrar(ctx)?.on_token_issued(token).await;
    println!("{}", describe(&outcome));
    Ok(())
}

pub fn push_message(
    title: Option<String>,
    body: Option<String>,
    kind: Option<String>,
    url: Option<String>,
) -> Result<()> {
    let data: HashMap<String, String> = [("title", title), ("body", body), ("type", kind), ("url", url)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();

    let router = PushMessageRouter::new(std::sync::Arc::new(PrintingNotifier));
    let notification = router.route(&data, None, None)?;
    let signal = PushMessageRouter::tap_signal(&notification);
    if let Some(link) = signal.deep_link_url {
        println!("Tapping launches: yarnl launch --deep-link {}", link);
    }
    Ok(())
}

pub async fn notifications(ctx: &AppContext, enabled: bool) -> Result<()> {
    ctx.prefs.set_notifications_enabled(enabled).await?;
    println!("Notifications {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub fn describe(outcome: &RegistrationOutcome) -> String {
    match outcome {
        RegistrationOutcome::Registered => "Push token registered".to_string(),
        RegistrationOutcome::NoServer => "Token stored; no server configured yet".to_string(),
        RegistrationOutcome::NoSession => "Token stored; not logged in to the server yet".to_string(),
        RegistrationOutcome::Superseded => {
            "Server accepted this token, but a newer one is stored now".to_string()
        }
        RegistrationOutcome::Rejected { status } => {
            format!("Token stored; server answered HTTP {} (will retry next launch)", status)
        }
        RegistrationOutcome::Failed { reason } => {
            format!("Token stored; registration failed: {} (will retry next launch)", reason)
        }
    }
}
