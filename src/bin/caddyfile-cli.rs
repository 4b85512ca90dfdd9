use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "caddyfile-cli")]
#[command(about = "Management CLI for the Caddyfile editor", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current Caddyfile
    Show,
    /// Check a Caddyfile against the control API without applying it
    Validate {
        /// Caddyfile to send
        file: PathBuf,
    },
    /// Apply a Caddyfile and save it on success
    Update {
        /// Caddyfile to send
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Show => {
            client
                .get(format!("{}/api/caddyfile", base))
                .send()
                .await?
        }
        Commands::Validate { file } => {
            let body = tokio::fs::read(&file).await?;
            client
                .post(format!("{}/api/caddyfile/validate", base))
                .body(body)
                .send()
                .await?
        }
        Commands::Update { file } => {
            let body = tokio::fs::read(&file).await?;
            client
                .post(format!("{}/api/caddyfile/update", base))
                .body(body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: editor returned status {}", status);
        eprintln!("{}", text);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", text);
    Ok(ExitCode::SUCCESS)
}
