use std::sync::Arc;

use anyhow::{Result, bail};
use yarnl_application::{ServerSetup, SetupOutcome};
use yarnl_interaction::{ConnectionProber, ProbeOutcome};

use super::AppContext;
use crate::host::PrintingPublisher;

pub async fn setup(ctx: &AppContext, url: &str) -> Result<()> {
    let prober = ConnectionProber::new(ctx.config.network.probe)?;
    let mut setup = ServerSetup::new(prober, ctx.prefs.clone(), Arc::new(PrintingPublisher));

    match setup.submit(url).await? {
        SetupOutcome::Saved(server) => {
            println!("Connected. Server saved: {}", server);
            Ok(())
        }
        SetupOutcome::Invalid(message) | SetupOutcome::Unreachable(message) => bail!(message),
    }
}

pub async fn probe(ctx: &AppContext, url: &str) -> Result<()> {
    let prober = ConnectionProber::new(ctx.config.network.probe)?;
    match prober.probe(url).await {
        ProbeOutcome::Success => {
            println!("Reachable: {}", url.trim());
            Ok(())
        }
        ProbeOutcome::Error(message) => bail!(message),
    }
}
