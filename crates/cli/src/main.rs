//! Gantry hook host command line.

mod apps;
mod serve;

use std::process;

use clap::{Parser, Subcommand};

/// Gantry hook host toolchain.
#[derive(Parser)]
#[command(name = "gantry", version, about = "Gantry hook host toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve registered hooks over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8620)]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// List registered apps and hook signatures as JSON
    Hooks {
        /// Restrict the listing to one app
        #[arg(long)]
        app: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let registry = apps::builtin_registry();

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Err(e) = serve::start_server(&bind, port, registry).await {
                tracing::error!("server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Hooks { app } => {
            let listing = match app {
                Some(app) => match registry.signatures(&app) {
                    Some(signatures) => {
                        let hooks: Vec<serde_json::Value> =
                            signatures.iter().map(|s| s.to_json()).collect();
                        serde_json::json!({ "app": app, "hooks": hooks })
                    }
                    None => {
                        eprintln!("unknown app '{}'", app);
                        process::exit(1);
                    }
                },
                None => registry.describe(),
            };
            match serde_json::to_string_pretty(&listing) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("failed to render listing: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
