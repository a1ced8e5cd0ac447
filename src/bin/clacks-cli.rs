use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{Map, Value};

use clacks_overhead::tribute::hex::from_spaced_hex;
use clacks_overhead::tribute::{X_CLACKS_OVERHEAD, X_CLACKS_OVERHEAD_ENCODED};

#[derive(Parser)]
#[command(name = "clacks-cli")]
#[command(about = "Management CLI for the X-Clacks-Overhead tribute", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "CLACKS_ADMIN_KEY", default_value = "admin-secret-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current tribute settings
    Show,
    /// Replace the tribute settings. Omitted flags are saved as off.
    Set {
        /// Send the tribute header
        #[arg(long)]
        enabled: bool,
        /// Also send the hex-encoded header
        #[arg(long)]
        send_hex: bool,
        /// Tribute text (default text when omitted)
        #[arg(long)]
        message: Option<String>,
    },
    /// Print the tribute headers any URL responds with
    Probe {
        /// URL to request
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Show => {
            let res = client.get(format!("{}/admin/settings", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set { enabled, send_hex, message } => {
            let mut raw = Map::new();
            if enabled {
                raw.insert("enabled".into(), Value::from(1));
            }
            if send_hex {
                raw.insert("send_hex".into(), Value::from(1));
            }
            if let Some(message) = message {
                raw.insert("message".into(), Value::from(message));
            }

            let res = client.put(format!("{}/admin/settings", cli.url))
                .headers(headers)
                .json(&raw)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Probe { target } => {
            let res = client.get(&target).send().await?;
            println!("{} {}", res.status(), target);

            for value in res.headers().get_all(X_CLACKS_OVERHEAD.as_str()) {
                println!("X-Clacks-Overhead: {}", String::from_utf8_lossy(value.as_bytes()));
            }
            for value in res.headers().get_all(X_CLACKS_OVERHEAD_ENCODED.as_str()) {
                let encoded = String::from_utf8_lossy(value.as_bytes());
                match from_spaced_hex(&encoded) {
                    Some(bytes) => println!(
                        "X-Clacks-Overhead-Encoded: {} (decodes to \"{}\")",
                        encoded,
                        String::from_utf8_lossy(&bytes)
                    ),
                    None => println!("X-Clacks-Overhead-Encoded: {} (not valid hex)", encoded),
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
