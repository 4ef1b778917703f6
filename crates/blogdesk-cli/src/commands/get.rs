use anyhow::{Context, Result};

use super::context::AppContext;

pub async fn run(ctx: &AppContext, path: &str) -> Result<()> {
    let body = ctx
        .client
        .get_authorized(path, &ctx.session())
        .await
        .with_context(|| format!("GET {} failed", ctx.client.url(path)))?;

    let pretty = serde_json::to_string_pretty(&body).context("Failed to format the response")?;
    println!("{}", pretty);
    Ok(())
}
