//! News commands: the public feed and admin management.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{display_option, print_output, print_single, truncate, OutputFormat};
use crate::resources::{News, NewsInput, NewsService};

use super::CommandContext;

/// Public news commands.
#[derive(Debug, Args)]
pub struct NewsCommand {
    #[command(subcommand)]
    command: NewsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NewsSubcommand {
    /// List published articles.
    List,

    /// Read one article.
    Show(NewsIdArgs),
}

/// Admin news commands.
#[derive(Debug, Args)]
pub struct AdminNewsCommand {
    #[command(subcommand)]
    command: AdminNewsSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminNewsSubcommand {
    /// List articles.
    List,

    /// Get article details.
    Get(NewsIdArgs),

    /// Publish an article.
    Create(NewsArgs),

    /// Edit an article.
    Update(UpdateNewsArgs),

    /// Delete an article.
    Delete(NewsIdArgs),
}

#[derive(Debug, Args)]
struct NewsIdArgs {
    /// Article ID.
    id: i64,
}

#[derive(Debug, Args)]
struct NewsArgs {
    /// Headline.
    #[arg(long)]
    title: String,

    /// Article body.
    #[arg(long)]
    content: String,

    /// Image URL.
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateNewsArgs {
    /// Article ID.
    id: i64,

    #[command(flatten)]
    fields: NewsArgs,
}

impl From<NewsArgs> for NewsInput {
    fn from(args: NewsArgs) -> Self {
        Self {
            title: args.title,
            content: args.content,
            image_url: args.image_url,
        }
    }
}

impl NewsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            NewsSubcommand::List => list_news(ctx).await,
            NewsSubcommand::Show(args) => show_news(ctx, args).await,
        }
    }
}

impl AdminNewsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AdminNewsSubcommand::List => list_news(ctx).await,
            AdminNewsSubcommand::Get(args) => get_news(ctx, args).await,
            AdminNewsSubcommand::Create(args) => create_news(ctx, args).await,
            AdminNewsSubcommand::Update(args) => update_news(ctx, args).await,
            AdminNewsSubcommand::Delete(args) => delete_news(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct NewsRow {
    #[tabled(rename = "ID")]
    id: i64,

    #[tabled(rename = "Title")]
    title: String,

    #[tabled(rename = "Published")]
    published: String,

    #[tabled(rename = "Content")]
    content: String,
}

impl From<&News> for NewsRow {
    fn from(n: &News) -> Self {
        Self {
            id: n.id,
            title: n.title.clone(),
            published: display_option(n.publication_date.as_deref()),
            content: truncate(&n.content, 60),
        }
    }
}

async fn list_news(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let news = NewsService::new(&client).list().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<NewsRow> = news.iter().map(NewsRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&news, ctx.format),
    }
    Ok(())
}

async fn fetch_news(ctx: &CommandContext, id: i64) -> Result<News> {
    let client = ctx.client()?;
    let news = NewsService::new(&client)
        .get(id)
        .await
        .map_err(|e| match e {
            CliError::Request(ref req) if req.status() == Some(404) => {
                CliError::NotFound(format!("News article {id}"))
            }
            other => other,
        })?;
    Ok(news)
}

/// Render an article for reading.
async fn show_news(ctx: CommandContext, args: NewsIdArgs) -> Result<()> {
    let news = fetch_news(&ctx, args.id).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&news, ctx.format),
        OutputFormat::Table => {
            println!("{}", news.title.bold());
            if let Some(date) = &news.publication_date {
                println!("{}", format!("Publicado el {date}").dimmed());
            }
            println!("\n{}", news.content);
        }
    }
    Ok(())
}

async fn get_news(ctx: CommandContext, args: NewsIdArgs) -> Result<()> {
    let news = fetch_news(&ctx, args.id).await?;
    print_single(&news, ctx.format);
    Ok(())
}

async fn create_news(ctx: CommandContext, args: NewsArgs) -> Result<()> {
    let client = ctx.client()?;
    let news = NewsService::new(&client).create(&args.into()).await?;
    print_single(&news, ctx.format);
    Ok(())
}

async fn update_news(ctx: CommandContext, args: UpdateNewsArgs) -> Result<()> {
    let client = ctx.client()?;
    let news = NewsService::new(&client)
        .update(args.id, &args.fields.into())
        .await?;
    print_single(&news, ctx.format);
    Ok(())
}

async fn delete_news(ctx: CommandContext, args: NewsIdArgs) -> Result<()> {
    let client = ctx.client()?;
    NewsService::new(&client).delete(args.id).await?;
    Ok(())
}
