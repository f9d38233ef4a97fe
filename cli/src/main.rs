mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config_store::{ConfigRepository, ObjectStoreAdapter, RepositoryOptions, StoreConfig};
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cfgstore",
    about = "Versioned configuration store over an object bucket",
    version
)]
struct Cli {
    /// Bucket to operate on; `file://<path>` targets a local directory
    #[arg(long)]
    bucket: String,

    /// Document field carrying the version on put
    #[arg(long, default_value = "version")]
    version_field: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch configs and write them to the current directory
    Get {
        /// Config names, e.g. `myapp` or `myapp.yaml@1.0`
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Publish local config files as new immutable versions
    Put {
        /// Config names; each reads `<base>.<ext>` from the current directory
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Shallow-merge configs in argument order and write the result
    Merge {
        /// Config names, merged left to right (later names win)
        #[arg(required = true)]
        names: Vec<String>,

        /// Output identifier; defaults to a timestamp-derived name
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List all configs, or the versions of the named ones
    List {
        /// Base names to list versions for; none lists every config
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = StoreConfig::from_bucket(&cli.bucket);
    if let StoreConfig::Local { path } = &config {
        std::fs::create_dir_all(path)?;
    }

    let adapter = Arc::new(ObjectStoreAdapter::from_config(config)?);
    let repository = Arc::new(ConfigRepository::new(
        adapter,
        RepositoryOptions {
            version_field: cli.version_field,
            ..RepositoryOptions::default()
        },
    ));

    match cli.command {
        Command::Get { names } => commands::get(&repository, &names).await,
        Command::Put { names } => commands::put(&repository, &names).await,
        Command::Merge { names, output } => {
            commands::merge(repository, &names, output.as_deref()).await
        }
        Command::List { names } => commands::list(&repository, &names).await,
    }
}
