//! Phone Catalog CLI - Command-line access to the phone REST backend.
//!
//! # Usage
//!
//! ```bash
//! # List every phone
//! phone-cli list
//!
//! # Show one phone
//! phone-cli show 42
//!
//! # Create a phone
//! phone-cli create --title "Pixel 9" --price 799 --memory 128 --memory 256 --colour Black --delivery
//!
//! # Change only the price
//! phone-cli update 42 --price 749
//!
//! # Delete a phone
//! phone-cli delete 42
//!
//! # Seed phones from a YAML file
//! phone-cli seed data/phones.yaml
//! ```
//!
//! The backend URL comes from `--api-url` or `PHONE_API_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::phones::{PhoneChanges, PhoneFields};

#[derive(Parser)]
#[command(name = "phone-cli")]
#[command(author, version, about = "Phone catalog CLI tools")]
struct Cli {
    /// Base URL of the phone backend (defaults to `PHONE_API_BASE_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all phones
    List,
    /// Show a single phone
    Show {
        /// Phone id
        id: String,
    },
    /// Create a phone
    Create(PhoneFields),
    /// Update a phone; fields not given keep their current value
    Update {
        /// Phone id
        id: String,

        #[command(flatten)]
        changes: PhoneChanges,
    },
    /// Delete a phone
    Delete {
        /// Phone id
        id: String,
    },
    /// Create phones from a YAML file
    Seed {
        /// Path to a YAML list of phones
        file: String,

        /// Validate the file without creating anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api_url = cli.api_url.as_deref();
    match cli.command {
        Commands::List => commands::phones::list(&commands::client(api_url)?).await?,
        Commands::Show { id } => commands::phones::show(&commands::client(api_url)?, &id).await?,
        Commands::Create(fields) => {
            commands::phones::create(&commands::client(api_url)?, fields).await?;
        }
        Commands::Update { id, changes } => {
            commands::phones::update(&commands::client(api_url)?, &id, changes).await?;
        }
        Commands::Delete { id } => commands::phones::delete(&commands::client(api_url)?, &id).await?,
        Commands::Seed { file, dry_run } => {
            // The whole file is validated before the backend is contacted.
            let phones = commands::seed::load(&file).await?;
            if !dry_run {
                commands::seed::phones(&commands::client(api_url)?, &phones).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "phone-cli",
            "create",
            "--title",
            "Pixel 9",
            "--price",
            "799",
            "--memory",
            "128",
            "--memory",
            "256",
            "--colour",
            "Black",
            "--delivery",
        ])
        .unwrap();

        let Commands::Create(fields) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(fields.title, "Pixel 9");
        assert_eq!(fields.price, "799");
        assert_eq!(fields.memory, vec![128, 256]);
        assert_eq!(fields.colour, vec!["Black"]);
        assert!(fields.delivery);
        assert!(fields.image.is_empty());
    }

    #[test]
    fn test_parse_update_with_global_url() {
        let cli = Cli::try_parse_from([
            "phone-cli",
            "update",
            "7",
            "--price",
            "749",
            "--api-url",
            "http://localhost:3000",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:3000"));
        let Commands::Update { id, changes } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, "7");
        assert_eq!(changes.price.as_deref(), Some("749"));
        assert!(changes.title.is_none());
        assert!(changes.delivery.is_none());
    }

    #[test]
    fn test_create_requires_title_and_price() {
        assert!(Cli::try_parse_from(["phone-cli", "create", "--price", "1"]).is_err());
        assert!(Cli::try_parse_from(["phone-cli", "create", "--title", "A"]).is_err());
    }
}
