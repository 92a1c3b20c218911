use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    export::{download_export, EXPORT_FAILURE_MESSAGE},
    form::{CREATE_FAILURE_MESSAGE, CREATE_SUCCESS_MESSAGE},
    list::DELETE_CONFIRMATION_PROMPT,
    ListAction, OrderForm, OrderListController, PaymentFilter, ServiceOrderClient, StatusFilter,
};
use shared::domain::{OrderStatus, PaymentMethod, ServiceOrderId};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "autoservice", about = "Ordens de serviço da oficina")]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    export_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new service order.
    Create {
        #[arg(long)]
        client_name: String,
        #[arg(long)]
        phone_number: String,
        #[arg(long)]
        car_model: String,
        #[arg(long)]
        service_type: String,
        #[arg(long)]
        service_value: String,
    },
    /// Show one page of the order table.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "all")]
        payment: PaymentFilter,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print the page as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    Status {
        id: i64,
        status: OrderStatus,
    },
    /// Flip an order between pending and completed.
    Toggle {
        id: i64,
    },
    Pay {
        id: i64,
        method: PaymentMethod,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Download the CSV export.
    Export {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn confirm_delete() -> bool {
    print!("{DELETE_CONFIRMATION_PROMPT} [s/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
}

fn print_table(controller: &OrderListController<ServiceOrderClient>) {
    println!("{}", render::render_page(&controller.state().view()));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).with_overrides(cli.api_url, cli.export_url);
    let client = ServiceOrderClient::new(&settings.api_base_url, &settings.export_url)
        .context("invalid service URL configuration")?;
    let mut controller = OrderListController::new(client);

    match cli.command {
        Command::Create {
            client_name,
            phone_number,
            car_model,
            service_type,
            service_value,
        } => {
            let mut form = OrderForm {
                client_name,
                phone_number,
                car_model,
                service_type,
                service_value,
            };
            match form.submit(controller.api()).await {
                Ok(created) => {
                    println!("{CREATE_SUCCESS_MESSAGE} (id={})", created.id);
                }
                Err(err) => {
                    eprintln!("{CREATE_FAILURE_MESSAGE}");
                    return Err(err).context("failed to create service order");
                }
            }
            controller.refresh().await?;
            print_table(&controller);
        }
        Command::List {
            search,
            status,
            payment,
            page,
            json,
        } => {
            controller.refresh().await?;
            controller.dispatch(ListAction::SearchChanged(search));
            controller.dispatch(ListAction::StatusFilterChanged(status));
            controller.dispatch(ListAction::PaymentFilterChanged(payment));
            controller.dispatch(ListAction::GoToPage(page));
            if json {
                let view = controller.state().view();
                println!("{}", serde_json::to_string_pretty(&view.items)?);
            } else {
                print_table(&controller);
            }
        }
        Command::Status { id, status } => {
            controller
                .update_status(ServiceOrderId(id), status)
                .await
                .with_context(|| format!("failed to update status of order {id}"))?;
            print_table(&controller);
        }
        Command::Toggle { id } => {
            controller.refresh().await?;
            let status = controller
                .toggle_status(ServiceOrderId(id))
                .await
                .with_context(|| format!("failed to toggle status of order {id}"))?;
            println!("Ordem {id}: {}", status.label());
            print_table(&controller);
        }
        Command::Pay { id, method } => {
            controller
                .update_payment(ServiceOrderId(id), method)
                .await
                .with_context(|| format!("failed to record payment for order {id}"))?;
            print_table(&controller);
        }
        Command::Delete { id, yes } => {
            let deleted = controller
                .delete(ServiceOrderId(id), || yes || confirm_delete())
                .await
                .with_context(|| format!("failed to delete order {id}"))?;
            if deleted {
                print_table(&controller);
            }
        }
        Command::Export { dir } => {
            let dir = dir.unwrap_or(settings.export_dir);
            match download_export(controller.api(), &dir).await {
                Ok(path) => println!("{}", path.display()),
                Err(err) => {
                    eprintln!("{EXPORT_FAILURE_MESSAGE}");
                    return Err(err).context("failed to export service orders");
                }
            }
        }
    }

    Ok(())
}
