use anyhow::{Context, Result};
use blogdesk_core::auth::{AuthError, LoginCredentials, RegisterProfile};
use colored::Colorize;

use super::context::AppContext;

pub async fn login(ctx: &AppContext, email: String, password: String) -> Result<()> {
    let session = ctx
        .manager
        .login(&LoginCredentials::new(email, password))
        .await
        .map_err(retry_hint)
        .context("Login failed")?;

    let who = session
        .user()
        .and_then(|user| user.display_name())
        .unwrap_or("unnamed user");
    println!("{}", format!("Logged in as {}", who).green());
    Ok(())
}

pub async fn register(ctx: &AppContext, name: String, email: String, password: String) -> Result<()> {
    let session = ctx
        .manager
        .register(&RegisterProfile::new(name, email, password))
        .await
        .map_err(retry_hint)
        .context("Registration failed")?;

    let who = session
        .user()
        .and_then(|user| user.display_name())
        .unwrap_or("unnamed user");
    println!("{}", format!("Registered and logged in as {}", who).green());
    Ok(())
}

pub async fn logout(ctx: &AppContext) {
    ctx.manager.logout().await;
    println!("{}", "Logged out".green());
}

pub fn whoami(ctx: &AppContext) {
    let session = ctx.session();
    if !session.is_authenticated() {
        println!("{}", "Not logged in".bright_black());
        return;
    }

    let user = session.user();
    let name = user.and_then(|u| u.name.as_deref()).unwrap_or("-");
    let email = user.and_then(|u| u.email.as_deref()).unwrap_or("-");
    println!("{} {}", "name: ".bright_blue(), name);
    println!("{} {}", "email:".bright_blue(), email);

    if session.permissions().is_empty() {
        println!("{} {}", "perms:".bright_blue(), "(none)".bright_black());
    } else {
        println!("{}", "perms:".bright_blue());
        for permission in session.permissions() {
            println!("  - {}", permission);
        }
    }
}

/// Prints a hint for failures that may clear up on their own.
fn retry_hint(err: AuthError) -> AuthError {
    if err.is_retryable() {
        eprintln!(
            "{}",
            "The API could not complete the request; try again shortly.".bright_yellow()
        );
    }
    err
}
