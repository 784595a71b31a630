use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Diagnostics CLI for the relay", long_about = None)]
struct Cli {
    /// Base URL of the relay.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request through the relay and print a summary
    Probe {
        /// Path to request.
        #[arg(default_value = "/")]
        path: String,
    },
    /// Fetch the Prometheus metrics endpoint
    Metrics {
        /// Metrics endpoint URL.
        #[arg(long, default_value = "http://localhost:9090")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Probe { path } => {
            let request_id = uuid::Uuid::new_v4().to_string();
            let mut headers = HeaderMap::new();
            headers.insert("x-request-id", HeaderValue::from_str(&request_id)?);

            let start = Instant::now();
            let res = client
                .get(format!("{}{}", cli.url, path))
                .headers(headers)
                .send()
                .await?;

            let status = res.status().as_u16();
            let upstream_headers: serde_json::Map<String, serde_json::Value> = res
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.to_string(), json!(v)))
                })
                .collect();
            let body = res.text().await?;

            let summary = json!({
                "request_id": request_id,
                "status": status,
                "elapsed_ms": start.elapsed().as_millis() as u64,
                "headers": upstream_headers,
                "body_bytes": body.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Metrics { endpoint } => {
            let res = client.get(endpoint).send().await?;
            if !res.status().is_success() {
                eprintln!("Error: metrics endpoint returned status {}", res.status());
                return Ok(());
            }
            println!("{}", res.text().await?);
        }
    }

    Ok(())
}
