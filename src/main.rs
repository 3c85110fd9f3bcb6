//! Repoprofile - merged GitHub/Bitbucket organization profiles
//!
//! Main entry point for the profile aggregation server.

use clap::Parser;
use repoprofile::config::ServiceConfig;
use repoprofile::profile::ProfileService;
use repoprofile::server::ProfileServer;
use std::process;

/// Repoprofile - aggregated repository profile server
#[derive(Parser, Debug)]
#[command(name = "repoprofile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// GitHub API base URL
    #[arg(long)]
    github_api_url: Option<String>,

    /// Bitbucket API base URL
    #[arg(long)]
    bitbucket_api_url: Option<String>,

    /// Upper bound on pages fetched per source
    #[arg(long)]
    max_pages: Option<u32>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = repoprofile::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(url) = cli.github_api_url {
        config.github_api_url = url;
    }
    if let Some(url) = cli.bitbucket_api_url {
        config.bitbucket_api_url = url;
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }

    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set; GitHub requests will be unauthenticated");
    }

    let service = match ProfileService::new(config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create profile service");
            process::exit(1);
        }
    };

    if let Err(e) = ProfileServer::new(service).run(&cli.bind).await {
        tracing::error!(error = %e, "Server failed");
        process::exit(1);
    }
}
