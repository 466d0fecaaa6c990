//! Admin category management.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, OutputFormat};
use crate::resources::{Category, CategoryInput, CategoryService};

use super::CommandContext;

/// Category commands.
#[derive(Debug, Args)]
pub struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CategoriesSubcommand {
    /// List categories.
    List,

    /// Create a category.
    Create(NameArgs),

    /// Rename a category.
    Update(RenameArgs),

    /// Delete a category.
    Delete(CategoryIdArgs),
}

#[derive(Debug, Args)]
struct CategoryIdArgs {
    /// Category ID.
    id: i64,
}

#[derive(Debug, Args)]
struct NameArgs {
    /// Category name.
    name: String,
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// Category ID.
    id: i64,

    /// New name.
    name: String,
}

#[derive(Debug, Serialize, Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,

    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

impl CategoriesCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            CategoriesSubcommand::List => list_categories(ctx).await,
            CategoriesSubcommand::Create(args) => create_category(ctx, args).await,
            CategoriesSubcommand::Update(args) => rename_category(ctx, args).await,
            CategoriesSubcommand::Delete(args) => delete_category(ctx, args).await,
        }
    }
}

async fn list_categories(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let categories = CategoryService::new(&client).list().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<CategoryRow> = categories.iter().map(CategoryRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&categories, ctx.format),
    }
    Ok(())
}

async fn create_category(ctx: CommandContext, args: NameArgs) -> Result<()> {
    let client = ctx.client()?;
    let category = CategoryService::new(&client)
        .create(&CategoryInput { name: args.name })
        .await?;
    print_single(&category, ctx.format);
    Ok(())
}

async fn rename_category(ctx: CommandContext, args: RenameArgs) -> Result<()> {
    let client = ctx.client()?;
    let category = CategoryService::new(&client)
        .update(args.id, &CategoryInput { name: args.name })
        .await?;
    print_single(&category, ctx.format);
    Ok(())
}

async fn delete_category(ctx: CommandContext, args: CategoryIdArgs) -> Result<()> {
    let client = ctx.client()?;
    CategoryService::new(&client).delete(args.id).await?;
    Ok(())
}
