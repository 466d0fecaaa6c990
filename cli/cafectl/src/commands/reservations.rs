//! Admin view of table reservations.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{display_option, print_output, print_single, truncate, OutputFormat};
use crate::resources::{Reservation, ReservationService};

use super::CommandContext;

/// Reservation commands.
#[derive(Debug, Args)]
pub struct ReservationsCommand {
    #[command(subcommand)]
    command: ReservationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReservationsSubcommand {
    /// List reservations.
    List,

    /// Delete a reservation.
    Delete(ReservationIdArgs),
}

#[derive(Debug, Args)]
struct ReservationIdArgs {
    /// Reservation ID.
    id: i64,
}

#[derive(Debug, Serialize, Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: i64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Contact")]
    contact: String,

    #[tabled(rename = "When")]
    when: String,

    #[tabled(rename = "Persons")]
    persons: u32,

    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        let contact = match r.phone.as_deref() {
            Some(phone) if !phone.is_empty() => format!("{} / {}", r.email, phone),
            _ => r.email.clone(),
        };
        Self {
            id: r.id,
            name: r.name.clone(),
            contact,
            when: format!("{} {}", r.date, r.time),
            persons: r.persons,
            message: truncate(&display_option(r.message.as_deref()), 30),
        }
    }
}

impl ReservationsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ReservationsSubcommand::List => list_reservations(ctx).await,
            ReservationsSubcommand::Delete(args) => delete_reservation(ctx, args).await,
        }
    }
}

async fn list_reservations(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let reservations = ReservationService::new(&client).list().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ReservationRow> =
                reservations.iter().map(ReservationRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&reservations, ctx.format),
    }
    Ok(())
}

async fn delete_reservation(ctx: CommandContext, args: ReservationIdArgs) -> Result<()> {
    let client = ctx.client()?;
    ReservationService::new(&client).delete(args.id).await?;
    Ok(())
}
