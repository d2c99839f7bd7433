use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "usermanager-cli")]
#[command(about = "Inspect a running usermanager service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3550")]
    url: String,

    /// Prefix the system endpoints are mounted at.
    #[arg(long, default_value = "/system")]
    system_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every endpoint the service exposes
    Routes,
    /// Check service liveness
    Health,
    /// Show service name and version
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let prefix = cli.system_prefix.trim_end_matches('/');

    let url = match cli.command {
        Commands::Routes => format!("{}/", base),
        Commands::Health => format!("{}{}/health", base, prefix),
        Commands::Version => format!("{}{}/version", base, prefix),
    };

    let res = client.get(url).send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
