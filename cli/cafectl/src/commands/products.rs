//! Admin product management.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::error::CliError;
use crate::output::{print_single, OutputFormat};
use crate::resources::{ProductInput, ProductService};

use super::storefront::print_products;
use super::CommandContext;

/// Product commands.
#[derive(Debug, Args)]
pub struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products.
    List,

    /// Get product details.
    Get(ProductIdArgs),

    /// Create a product.
    Create(ProductArgs),

    /// Update a product.
    Update(UpdateProductArgs),

    /// Delete a product.
    Delete(ProductIdArgs),

    /// List products in a category.
    ByCategory(ByCategoryArgs),
}

#[derive(Debug, Args)]
struct ProductIdArgs {
    /// Product ID.
    id: i64,
}

#[derive(Debug, Args)]
struct ByCategoryArgs {
    /// Category ID.
    category_id: i64,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product name.
    #[arg(long)]
    name: String,

    /// Price.
    #[arg(long)]
    price: f64,

    /// Category ID.
    #[arg(long = "category")]
    category_id: i64,

    /// Description.
    #[arg(long)]
    description: Option<String>,

    /// Image URL.
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    /// Product ID.
    id: i64,

    #[command(flatten)]
    fields: ProductArgs,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category_id: args.category_id,
            image_url: args.image_url,
        }
    }
}

impl ProductsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ProductsSubcommand::List => list_products(ctx).await,
            ProductsSubcommand::Get(args) => get_product(ctx, args).await,
            ProductsSubcommand::Create(args) => create_product(ctx, args).await,
            ProductsSubcommand::Update(args) => update_product(ctx, args).await,
            ProductsSubcommand::Delete(args) => delete_product(ctx, args).await,
            ProductsSubcommand::ByCategory(args) => by_category(ctx, args).await,
        }
    }
}

async fn list_products(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let products = ProductService::new(&client).list().await?;
    print_products(&products, ctx.format);
    Ok(())
}

async fn get_product(ctx: CommandContext, args: ProductIdArgs) -> Result<()> {
    let client = ctx.client()?;
    let product = ProductService::new(&client)
        .get(args.id)
        .await
        .map_err(|e| match e {
            CliError::Request(ref req) if req.status() == Some(404) => {
                CliError::NotFound(format!("Product {}", args.id))
            }
            other => other,
        })?;

    match ctx.format {
        OutputFormat::Json => print_single(&product, ctx.format),
        OutputFormat::Table => print_products(std::slice::from_ref(&product), ctx.format),
    }
    Ok(())
}

async fn create_product(ctx: CommandContext, args: ProductArgs) -> Result<()> {
    let client = ctx.client()?;
    let product = ProductService::new(&client).create(&args.into()).await?;
    print_single(&product, ctx.format);
    Ok(())
}

async fn update_product(ctx: CommandContext, args: UpdateProductArgs) -> Result<()> {
    let client = ctx.client()?;
    let product = ProductService::new(&client)
        .update(args.id, &args.fields.into())
        .await?;
    print_single(&product, ctx.format);
    Ok(())
}

async fn delete_product(ctx: CommandContext, args: ProductIdArgs) -> Result<()> {
    let client = ctx.client()?;
    ProductService::new(&client).delete(args.id).await?;
    Ok(())
}

async fn by_category(ctx: CommandContext, args: ByCategoryArgs) -> Result<()> {
    let client = ctx.client()?;
    let products = ProductService::new(&client)
        .by_category(args.category_id)
        .await?;
    print_products(&products, ctx.format);
    Ok(())
}
