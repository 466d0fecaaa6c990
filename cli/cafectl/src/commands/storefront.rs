//! Public storefront: home page, menu and the reservation form.

use anyhow::Result;
use cafe_events::event_names;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{display_option, print_output, print_single, OutputFormat};
use crate::resources::{
    filter_by_category, CategoryService, CompanyService, Product, ProductService,
    ReservationInput, ReservationService,
};

use super::CommandContext;

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: usize = 6;

#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Only show products in this category.
    #[arg(long)]
    category: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ContactArgs {
    /// Name for the reservation.
    #[arg(long)]
    name: String,

    /// Contact email.
    #[arg(long)]
    email: String,

    /// Contact phone.
    #[arg(long)]
    phone: Option<String>,

    /// Date (YYYY-MM-DD).
    #[arg(long)]
    date: String,

    /// Time (HH:MM).
    #[arg(long)]
    time: String,

    /// Party size.
    #[arg(long, default_value = "2")]
    persons: u32,

    /// Anything we should know.
    #[arg(long)]
    message: Option<String>,
}

/// Product row for menu tables.
#[derive(Debug, Serialize, Tabled)]
pub(super) struct ProductRow {
    #[tabled(rename = "ID")]
    id: i64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Category")]
    category: String,

    #[tabled(rename = "Price")]
    price: String,

    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        let category = match &p.category {
            Some(c) => c
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| c.id().to_string()),
            None => "-".to_string(),
        };
        Self {
            id: p.id,
            name: p.name.clone(),
            category,
            price: format!("{:.2}", p.price),
            description: display_option(p.description.as_deref()),
        }
    }
}

pub(super) fn print_products(products: &[Product], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ProductRow> = products.iter().map(ProductRow::from).collect();
            print_output(&rows, format);
        }
        OutputFormat::Json => print_single(&products, format),
    }
}

#[derive(Debug, Serialize)]
struct HomeView {
    company: String,
    featured: Vec<Product>,
}

/// Show the shop name and the first few products.
pub async fn home(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;

    // A failing request must not cancel its sibling.
    let (company, products) = tokio::join!(
        CompanyService::new(&client).get(),
        ProductService::new(&client).list(),
    );
    let (company, products) = (company?, products?);
    let featured: Vec<Product> = products.into_iter().take(FEATURED_PRODUCTS).collect();

    match ctx.format {
        OutputFormat::Json => print_single(
            &HomeView {
                company: company.name,
                featured,
            },
            ctx.format,
        ),
        OutputFormat::Table => {
            println!("{}\n", company.name.bold());
            print_products(&featured, ctx.format);
        }
    }
    Ok(())
}

/// Show the menu, optionally filtered by category.
pub async fn menu(ctx: CommandContext, args: MenuArgs) -> Result<()> {
    let client = ctx.client()?;

    let (products, categories) = tokio::join!(
        ProductService::new(&client).list(),
        CategoryService::new(&client).list(),
    );
    let (products, categories) = (products?, categories?);

    let products = match args.category {
        Some(id) => {
            if !categories.iter().any(|c| c.id == id) {
                ctx.bus.publish(
                    event_names::APP_WARNING,
                    format!("Category {id} does not exist"),
                );
            }
            filter_by_category(products, id)
        }
        None => products,
    };

    if ctx.format == OutputFormat::Table {
        let names: Vec<String> = categories
            .iter()
            .map(|c| format!("{} ({})", c.name, c.id))
            .collect();
        println!("{} {}\n", "Categories:".bold(), names.join(", "));
    }
    print_products(&products, ctx.format);
    Ok(())
}

/// Submit a reservation.
pub async fn contact(ctx: CommandContext, args: ContactArgs) -> Result<()> {
    let client = ctx.client()?;

    let input = ReservationInput {
        name: args.name,
        email: args.email,
        phone: args.phone,
        date: args.date,
        time: args.time,
        persons: args.persons,
        message: args.message,
    };
    let reservation = ReservationService::new(&client).create(&input).await?;

    if ctx.format == OutputFormat::Json {
        print_single(&reservation, ctx.format);
    }
    Ok(())
}
