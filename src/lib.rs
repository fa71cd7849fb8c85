pub mod checkout;
pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod load_config;
pub mod mirror;
pub mod sanitize;
pub mod scaffold;
pub mod synchronise;
pub mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use checkout::GitCheckout;
use load_config::load_config;
use synchronise::synchronise;

#[derive(Parser)]
#[clap(
    name = "quartz-sync",
    version,
    about = "Mirror external repositories into a Quartz content tree and keep directory indexes in sync"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror all configured sources into the content tree and regenerate indexes
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Create the standard folder skeleton and landing page for a new topic
    Scaffold {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Human-readable topic title; the folder name is derived from it
        title: String,
    },
    /// Write placeholder index pages into content directories that lack one
    FixIndexes {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            println!("Synchronise starting...");
            let report = synchronise(&config, &GitCheckout).await;
            println!("Synchronise complete.\nReport:");
            println!("{report:#?}");
            if report.failed() > 0 {
                anyhow::bail!(
                    "{} of {} sources failed",
                    report.failed(),
                    report.sources.len()
                );
            }
            Ok(())
        }
        Commands::Scaffold { config, title } => {
            let config = load_config(config)?;
            let topic_dir = scaffold::create_topic(&config.content_root, &title)?;
            println!("Created topic skeleton at {}", topic_dir.display());
            Ok(())
        }
        Commands::FixIndexes { config } => {
            let config = load_config(config)?;
            let created = scaffold::fill_missing_indexes(&config.content_root)?;
            println!("Created {created} placeholder index page(s).");
            Ok(())
        }
    }
}
