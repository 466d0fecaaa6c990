//! Console commands.
//!
//! Public storefront commands run without a session. Everything under
//! `cafe admin` passes through the route guard first.

mod admin;
mod auth;
mod categories;
mod company;
mod context;
mod news;
mod products;
mod reservations;
mod storefront;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use cafe_events::EventBus;
use clap::{Parser, Subcommand};

use crate::auth::AuthService;
use crate::client::ApiClient;
use crate::config::{Config, API_URL_ENV};
use crate::guard::{Navigator, RouteGuard};
use crate::notifications::{NotificationCenter, Presenter};
use crate::output::{present_notification, OutputFormat};
use crate::session::{FileStorage, Session};
use crate::transport::ReqwestTransport;

/// Café console - browse the menu and manage the shop.
#[derive(Debug, Parser)]
#[command(name = "cafe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// API base URL.
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Session file (defaults to the user config directory).
    #[arg(long, global = true, env = "CAFE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the shop name and featured products.
    Home,

    /// Browse the menu.
    Menu(storefront::MenuArgs),

    /// Read the news.
    News(news::NewsCommand),

    /// Book a table.
    Contact(storefront::ContactArgs),

    /// Log in and out of the admin panel.
    Auth(auth::AuthCommand),

    /// Admin panel (requires login).
    Admin(admin::AdminCommand),

    /// Show or change console settings.
    Context(context::ContextCommand),

    /// Show console version.
    Version,
}

impl Cli {
    /// Run the selected command.
    pub async fn run(self) -> Result<()> {
        let format = OutputFormat::parse(&self.format);

        let config = Config::load()?.with_api_url(self.api_url);
        let storage = match self.session_file {
            Some(path) => FileStorage::new(path),
            None => FileStorage::default_location()?,
        };
        let session_path = storage.path().to_path_buf();
        let session = Session::new(Arc::new(storage));

        let bus = Arc::new(EventBus::new());
        let presenter: Presenter = Arc::new(present_notification);
        let notifications = NotificationCenter::mount(Arc::clone(&bus), Some(presenter))?;

        let navigator = Navigator::new(RouteGuard::new(session.clone()), "/");

        let ctx = CommandContext {
            config,
            session,
            session_path,
            bus,
            navigator,
            format,
            _notifications: notifications,
        };

        match self.command {
            Commands::Home => storefront::home(ctx).await,
            Commands::Menu(args) => storefront::menu(ctx, args).await,
            Commands::News(cmd) => cmd.run(ctx).await,
            Commands::Contact(args) => storefront::contact(ctx, args).await,
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Admin(cmd) => cmd.run(ctx).await,
            Commands::Context(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("cafe {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub session: Session,
    pub session_path: PathBuf,
    pub bus: Arc<EventBus<String>>,
    pub navigator: Navigator,
    pub format: OutputFormat,
    // Kept alive so toasts print while the command runs.
    _notifications: NotificationCenter,
}

impl CommandContext {
    /// API client sharing this context's session and bus.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config, self.session.clone(), Arc::clone(&self.bus))
    }

    /// Auth service against the configured backend.
    pub fn auth(&self) -> Result<AuthService> {
        let transport = ReqwestTransport::new(self.config.api_url())?;
        Ok(AuthService::new(Arc::new(transport), self.session.clone()))
    }
}
