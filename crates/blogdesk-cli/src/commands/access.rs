use std::process::ExitCode;

use blogdesk_application::navigation_menu;
use blogdesk_core::permission::has_any_permission;
use blogdesk_core::route::{Router, View};
use colored::Colorize;

use super::context::AppContext;

/// Any-of check; the exit code reflects the answer.
pub fn can(ctx: &AppContext, permissions: &[String]) -> ExitCode {
    if has_any_permission(&ctx.session(), permissions) {
        println!("{}", "allowed".green());
        ExitCode::SUCCESS
    } else {
        println!("{}", "denied".red());
        ExitCode::FAILURE
    }
}

/// Resolves `path` through the route table. A guarded route the session
/// cannot see resolves to the not-found view, exactly like an unknown path.
pub fn open(ctx: &AppContext, path: &str) -> ExitCode {
    match Router::new().navigate(path, &ctx.session()) {
        View::NotFound => {
            println!("{}", "404 Not Found".red());
            ExitCode::FAILURE
        }
        view => {
            println!("{}", view.to_string().green());
            ExitCode::SUCCESS
        }
    }
}

pub fn menu(ctx: &AppContext) {
    for link in navigation_menu(&ctx.session()) {
        match link.path() {
            Some(path) => println!("{:<16} {}", link.label(), path.bright_black()),
            None => println!("{:<16} {}", link.label(), "(blogdesk logout)".bright_black()),
        }
    }
}
