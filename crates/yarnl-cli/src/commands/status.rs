use anyhow::Result;
use yarnl_core::auth::has_session_cookie;
use yarnl_core::cookie::CookieJar;
use yarnl_core::preferences::PreferenceStore;

use super::AppContext;

pub async fn status(ctx: &AppContext) -> Result<()> {
    let prefs = ctx.prefs.snapshot().await;

    println!("config dir:      {}", ctx.paths.config_dir().display());
    match &prefs.server_url {
        Some(url) => {
            let session = has_session_cookie(ctx.jar.get_cookie(url).as_deref());
            println!("server:          {}", url);
            println!("session cookie:  {}", if session { "present" } else { "absent" });
        }
        None => println!("server:          (not configured)"),
    }
    println!(
        "push token:      {}",
        if prefs.push_token.is_some() { "stored" } else { "none" }
    );
    println!("push registered: {}", prefs.push_registered);
    println!("notifications:   {}", if prefs.notifications_enabled { "on" } else { "off" });
    Ok(())
}
