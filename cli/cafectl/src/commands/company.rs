//! Company-wide settings.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::{print_single, OutputFormat};
use crate::resources::{CompanyConfig, CompanyService};

use super::CommandContext;

/// Company settings commands.
#[derive(Debug, Args)]
pub struct CompanyCommand {
    #[command(subcommand)]
    command: CompanySubcommand,
}

#[derive(Debug, Subcommand)]
enum CompanySubcommand {
    /// Show the company settings.
    Show,

    /// Change the company name.
    Set(SetNameArgs),
}

#[derive(Debug, Args)]
struct SetNameArgs {
    /// New company name.
    name: String,
}

impl CompanyCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;
        let service = CompanyService::new(&client);

        let config = match self.command {
            CompanySubcommand::Show => service.get().await?,
            CompanySubcommand::Set(args) => {
                service
                    .update(&CompanyConfig { name: args.name })
                    .await?
            }
        };

        match ctx.format {
            OutputFormat::Json => print_single(&config, ctx.format),
            OutputFormat::Table => println!("name: {}", config.name),
        }
        Ok(())
    }
}
