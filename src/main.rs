//! Parlor CLI entry point

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parlor::adapters::CliChannel;
use parlor::gateway::ResponseGateway;
use parlor::provider::{Availability, ClientProvider};

#[derive(Parser)]
#[command(name = "parlor")]
#[command(about = "💬 Parlor - web chat front-end for a streaming AI agent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize parlor configuration
    Onboard,

    /// Start the web chat front-end
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to $PORT, then $WEBSITES_PORT, then 7860)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the agent from the terminal
    Chat {
        /// Message to send; omit for interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show configuration and agent availability
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard => {
            parlor::config::onboard()?;
            println!("\nRun 'parlor serve' to start the web UI.");
        }

        Commands::Serve { host, port } => {
            run_serve(host, port).await?;
        }

        Commands::Chat { message } => {
            run_chat(message).await?;
        }

        Commands::Status => {
            run_status();
        }
    }

    Ok(())
}

async fn run_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = parlor::config::load()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = Some(port);
    }

    let host = config.host.clone();
    let port = config.resolve_port();
    let eager = config.eager_init;

    let provider = Arc::new(ClientProvider::new(config));

    if eager {
        let state = provider.ensure_ready().await;
        match state.availability {
            Availability::Ready => println!("✓ Agent client ready"),
            _ => println!(
                "⚠️  Agent unavailable: {}",
                state.failure_detail.unwrap_or_default()
            ),
        }
    }

    let gateway = Arc::new(ResponseGateway::new(provider));
    println!("💬 Parlor listening on http://{host}:{port}");
    parlor::adapters::web::serve(gateway, &host, port).await?;

    Ok(())
}

async fn run_chat(message: Option<String>) -> Result<()> {
    let config = parlor::config::load()?;
    let provider = Arc::new(ClientProvider::new(config));
    let gateway = ResponseGateway::new(provider);
    let mut channel = CliChannel::new(gateway);

    match message {
        Some(message) => {
            // Single message mode
            let reply = channel.run_once(&message).await;
            println!("\n{reply}");
        }
        None => {
            // Interactive mode
            println!("💬 Interactive mode (type 'exit' to quit)");
            channel.run_interactive().await?;
        }
    }

    Ok(())
}

fn run_status() {
    let config = match parlor::config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Could not load configuration: {e}");
            return;
        }
    };

    println!("💬 Parlor Status\n");
    println!("Provider: {}", config.provider);
    println!("Model: {}", config.model);
    println!("Init: {}", if config.eager_init { "eager" } else { "lazy" });

    let has_credential = std::env::var(&config.credential_env)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    println!(
        "Credential: {}",
        if has_credential {
            "✓".to_string()
        } else {
            format!("{} not set", config.credential_env)
        }
    );
}
