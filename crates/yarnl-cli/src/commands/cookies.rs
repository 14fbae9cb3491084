use anyhow::Result;
use yarnl_core::cookie::CookieJar;

use super::AppContext;

pub async fn clear(ctx: &AppContext) -> Result<()> {
    let server = ctx.server().await?;
    ctx.jar.clear_for_url(server.base_url())?;
    println!("Cookies cleared for {}", server);
    Ok(())
}
