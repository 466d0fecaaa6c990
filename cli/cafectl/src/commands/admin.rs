//! Admin panel. Every section is a protected route.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::output::{print_single, OutputFormat};
use crate::resources::DashboardCounts;

use super::categories::CategoriesCommand;
use super::company::CompanyCommand;
use super::news::AdminNewsCommand;
use super::products::ProductsCommand;
use super::reservations::ReservationsCommand;
use super::CommandContext;

/// Admin commands.
#[derive(Debug, Args)]
pub struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Overview of the shop's content.
    Dashboard,

    /// Manage products.
    Products(ProductsCommand),

    /// Manage categories.
    Categories(CategoriesCommand),

    /// Manage reservations.
    Reservations(ReservationsCommand),

    /// Manage news.
    News(AdminNewsCommand),

    /// Company settings.
    Config(CompanyCommand),
}

impl AdminSubcommand {
    fn route(&self) -> &'static str {
        match self {
            AdminSubcommand::Dashboard => "/admin/dashboard",
            AdminSubcommand::Products(_) => "/admin/products",
            AdminSubcommand::Categories(_) => "/admin/categories",
            AdminSubcommand::Reservations(_) => "/admin/reservations",
            AdminSubcommand::News(_) => "/admin/news",
            AdminSubcommand::Config(_) => "/admin/config",
        }
    }
}

impl AdminCommand {
    pub async fn run(self, mut ctx: CommandContext) -> Result<()> {
        ctx.navigator.require(self.command.route())?;

        match self.command {
            AdminSubcommand::Dashboard => dashboard(ctx).await,
            AdminSubcommand::Products(cmd) => cmd.run(ctx).await,
            AdminSubcommand::Categories(cmd) => cmd.run(ctx).await,
            AdminSubcommand::Reservations(cmd) => cmd.run(ctx).await,
            AdminSubcommand::News(cmd) => cmd.run(ctx).await,
            AdminSubcommand::Config(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(Debug, Serialize)]
struct DashboardView {
    user: Option<String>,
    #[serde(flatten)]
    counts: DashboardCounts,
}

async fn dashboard(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let view = DashboardView {
        user: ctx.session.username(),
        counts: DashboardCounts::load(&client).await?,
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view, ctx.format),
        OutputFormat::Table => {
            if let Some(user) = &view.user {
                println!("{} {}\n", "Welcome,".bold(), user.bold());
            }
            println!("Products:     {}", view.counts.products);
            println!("Categories:   {}", view.counts.categories);
            println!("Reservations: {}", view.counts.reservations);
        }
    }
    Ok(())
}
