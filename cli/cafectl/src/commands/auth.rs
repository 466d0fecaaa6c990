//! Authentication commands.

use anyhow::Result;
use cafe_events::event_names;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::error::CliError;
use crate::guard::ADMIN_HOME;
use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Log in to the admin panel.
    Login(LoginArgs),

    /// Log out.
    Logout,

    /// Show current authentication status.
    Status,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Admin username.
    #[arg(long)]
    username: String,

    /// Password.
    #[arg(long, env = "CAFE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Serialize)]
struct StatusView {
    authenticated: bool,
    username: Option<String>,
    session_file: String,
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(ctx),
            AuthSubcommand::Status => status(ctx),
        }
    }
}

async fn login(mut ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let auth = ctx.auth()?;
    auth.login(&args.username, &args.password)
        .await
        .map_err(CliError::from)?;

    let Some(user) = auth.current_user() else {
        anyhow::bail!("Login response carried no token");
    };

    ctx.navigator.require(ADMIN_HOME)?;
    ctx.bus
        .publish(event_names::APP_INFO, format!("Bienvenido, {user}."));

    if ctx.format == OutputFormat::Json {
        print_single(&serde_json::json!({ "username": user }), ctx.format);
    }
    Ok(())
}

fn logout(ctx: CommandContext) -> Result<()> {
    let auth = ctx.auth()?;
    let was_authenticated = auth.is_authenticated();
    auth.logout().map_err(CliError::from)?;

    if was_authenticated {
        ctx.bus
            .publish(event_names::APP_INFO, "Sesión cerrada.".to_string());
    }
    Ok(())
}

fn status(ctx: CommandContext) -> Result<()> {
    let view = StatusView {
        authenticated: ctx.session.is_authenticated(),
        username: ctx.session.username(),
        session_file: ctx.session_path.display().to_string(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view, ctx.format),
        OutputFormat::Table => {
            if view.authenticated {
                println!("{} Authenticated", "Status:".green().bold());
                if let Some(username) = &view.username {
                    println!("  User: {username}");
                }
            } else {
                println!("{} Not authenticated", "Status:".red().bold());
                println!("\nRun {} to log in.", "cafe auth login".cyan());
            }
        }
    }
    Ok(())
}
