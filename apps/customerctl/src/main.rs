use std::{fs::File, io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use client_core::{
    grid::{SortDirection, DEFAULT_EXPORT_FILE_NAME},
    load_settings, CommandOutcome, CustomerList, GridHandle, GridQuery,
};
use shared::domain::{Customer, CustomerField, Training};
use tracing_subscriber::EnvFilter;

mod prompt;
mod render;

use prompt::TerminalPrompt;

#[derive(Parser, Debug)]
#[command(about = "Manage customers and their trainings")]
struct Cli {
    /// Base url of the customer service, overrides customers.toml and env.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[command(flatten)]
        grid: GridArgs,
        /// Zero-based page of ten rows.
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Print every row instead of one page.
        #[arg(long)]
        all: bool,
    },
    Add {
        #[command(flatten)]
        fields: CustomerFields,
    },
    Edit {
        /// Self link of the customer.
        href: String,
        #[command(flatten)]
        fields: CustomerFields,
    },
    Delete {
        href: String,
        /// Affirm the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    AddTraining {
        href: String,
        #[arg(long)]
        activity: String,
        /// Minutes.
        #[arg(long)]
        duration: u32,
        /// RFC 3339 timestamp, defaults to now.
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    Export {
        #[command(flatten)]
        grid: GridArgs,
        /// Output file, '-' for stdout.
        #[arg(long, default_value = DEFAULT_EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct GridArgs {
    #[arg(long)]
    sort: Option<CustomerField>,
    #[arg(long, requires = "sort")]
    desc: bool,
    /// FIELD=TEXT, case-insensitive contains. Repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(CustomerField, String)>,
}

impl GridArgs {
    fn query(&self) -> GridQuery {
        let mut query = GridQuery::default();
        if let Some(field) = self.sort {
            let direction = if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            query.sort_by(field, direction);
        }
        for (field, text) in &self.filters {
            query.set_filter(*field, text.clone());
        }
        query
    }
}

fn parse_filter(raw: &str) -> Result<(CustomerField, String), String> {
    let (field, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=TEXT, got '{raw}'"))?;
    let field = field.parse::<CustomerField>().map_err(|err| err.to_string())?;
    Ok((field, text.to_string()))
}

#[derive(Args, Debug, Default)]
struct CustomerFields {
    #[arg(long)]
    firstname: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    streetaddress: Option<String>,
    #[arg(long)]
    postcode: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl CustomerFields {
    fn apply(self, customer: &mut Customer) {
        let values = [
            (CustomerField::Firstname, self.firstname),
            (CustomerField::Lastname, self.lastname),
            (CustomerField::Streetaddress, self.streetaddress),
            (CustomerField::Postcode, self.postcode),
            (CustomerField::City, self.city),
            (CustomerField::Email, self.email),
            (CustomerField::Phone, self.phone),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                *customer.field_mut(field) = value;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings().with_base_url(cli.server_url);
    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let list = CustomerList::from_settings(&settings, Arc::new(TerminalPrompt { assume_yes }))?;
    prepare(&list).await;

    let outcome = match cli.command {
        Command::List { grid, page, all } => {
            let view = list.snapshot().await;
            let mut query = grid.query();
            let rows = if all {
                query.displayed(view.customers())
            } else {
                query.set_page(page, query.displayed(view.customers()).len());
                query.page_rows(view.customers())
            };
            let total = query.displayed(view.customers()).len();
            print!("{}", render::table(&rows));
            if !all {
                println!(
                    "page {}/{} ({total} rows)",
                    query.page() + 1,
                    query.page_count(total)
                );
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add { fields } => {
            let mut customer = Customer::default();
            fields.apply(&mut customer);
            list.add_customer(customer).await
        }
        Command::Edit { href, fields } => {
            let mut customer = find_customer(&list, &href).await?;
            fields.apply(&mut customer);
            list.edit_customer(&href, customer).await
        }
        Command::Delete { href, .. } => list.delete_customer(&href).await,
        Command::AddTraining {
            href,
            activity,
            duration,
            date,
        } => {
            let customer = find_customer(&list, &href).await?;
            let training = Training::for_customer(
                &customer,
                date.unwrap_or_else(Utc::now),
                activity,
                duration,
            )?;
            list.add_training(training).await
        }
        Command::Export { grid, output } => {
            let query = grid.query();
            let written = if output.as_os_str() == "-" {
                list.export_csv(&query, io::stdout().lock()).await?
            } else {
                let file = File::create(&output)
                    .with_context(|| format!("failed to create {}", output.display()))?;
                let written = list.export_csv(&query, file).await?;
                eprintln!("exported {written} customers -> {}", output.display());
                written
            };
            tracing::debug!(written, "export finished");
            return Ok(ExitCode::SUCCESS);
        }
    };

    if let Some(message) = render::notification(&list.snapshot().await) {
        println!("{message}");
    }
    Ok(if succeeded(outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the rows and readies the grid. A failed load is logged by the list
/// and leaves it empty; only commands that look up a row fail on that.
async fn prepare(list: &CustomerList) {
    if list.mount().await.is_err() {
        tracing::debug!("continuing without loaded customers");
    }
    list.on_grid_ready(GridHandle::default()).await;
}

async fn find_customer(list: &CustomerList, href: &str) -> Result<Customer> {
    list.snapshot()
        .await
        .find_by_href(href)
        .cloned()
        .ok_or_else(|| anyhow!("no customer with self link '{href}'"))
}

fn succeeded(outcome: CommandOutcome) -> bool {
    match outcome {
        CommandOutcome::Applied | CommandOutcome::Cancelled => true,
        CommandOutcome::Rejected { .. } | CommandOutcome::TransportFailed => false,
    }
}
