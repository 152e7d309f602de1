mod admin;
mod catalog;
mod invoice;
mod storefront;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vitrina")]
#[command(about = "Storefront catalog, invoice and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the configured catalog source and print its products
    Catalog {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a drive share link into an embeddable thumbnail URL
    Thumbnail {
        url: String,
        /// Thumbnail width in pixels (defaults to `VITRINA_THUMBNAIL_WIDTH`)
        #[arg(long)]
        width: Option<u32>,
    },
    /// Build an invoice for a set of catalog products
    Invoice {
        #[arg(long)]
        customer: String,
        /// Product id to add to the cart; repeat for more items
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        /// Write the invoice here instead of printing it. A directory gets
        /// the default file name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Password-gated catalog maintenance
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCommands {
    /// Edit one product and write the catalog back to its sheet
    Edit {
        #[arg(long)]
        password: String,
        /// Id of the product to edit
        #[arg(long)]
        id: String,
        /// Replacement product code
        #[arg(long)]
        new_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        img: Option<String>,
    },
}

impl Commands {
    /// `thumbnail` with an explicit width is a pure string rewrite and runs
    /// without reading `AppConfig`.
    fn standalone_thumbnail(&self) -> Option<(&str, u32)> {
        match self {
            Self::Thumbnail {
                url,
                width: Some(width),
            } => Some((url.as_str(), *width)),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some((url, width)) = cli.command.standalone_thumbnail() {
        catalog::run_thumbnail(url, width);
        return Ok(());
    }

    // Also loads `.env`.
    let config = vitrina_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Catalog { json } => catalog::run_catalog(&config, json).await?,
        Commands::Thumbnail { url, width } => {
            catalog::run_thumbnail(&url, width.unwrap_or(config.thumbnail_width));
        }
        Commands::Invoice {
            customer,
            items,
            output,
        } => invoice::run_invoice(&config, &customer, &items, output.as_deref()).await?,
        Commands::Admin {
            command:
                AdminCommands::Edit {
                    password,
                    id,
                    new_id,
                    name,
                    price,
                    img,
                },
        } => {
            let edit = vitrina_core::ProductEdit {
                id: new_id,
                name,
                price,
                img,
            };
            admin::run_admin_edit(&config, &password, &id, edit).await?;
        }
    }

    Ok(())
}
