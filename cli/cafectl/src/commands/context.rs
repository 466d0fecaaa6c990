//! Context commands (effective settings and saved defaults).

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Show or change console settings.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the effective settings.
    Show,

    /// Save the API base URL to the config file.
    SetApiUrl(SetApiUrlArgs),
}

#[derive(Debug, Args)]
struct SetApiUrlArgs {
    /// API base URL, including the `/api` prefix.
    url: String,
}

#[derive(Debug, Serialize)]
struct ContextView {
    api_url: String,
    session_file: String,
    user: Option<String>,
}

impl ContextCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(ctx),
            ContextSubcommand::SetApiUrl(args) => set_api_url(ctx, args),
        }
    }
}

fn show(ctx: CommandContext) -> Result<()> {
    let view = ContextView {
        api_url: ctx.config.api_url().to_string(),
        session_file: ctx.session_path.display().to_string(),
        user: ctx.session.username(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view, ctx.format),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("session: {}", view.session_file);
            println!("user: {}", view.user.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}

fn set_api_url(ctx: CommandContext, args: SetApiUrlArgs) -> Result<()> {
    // Start from the file: flag overrides are never persisted.
    let config = Config::load()?.with_api_url(Some(args.url));
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&config, ctx.format),
        OutputFormat::Table => print_success(&format!("API URL set to {}", config.api_url())),
    }

    Ok(())
}
