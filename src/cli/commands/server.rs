use std::time::Duration;

use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_error, output_record};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Show server information from the root endpoint")]
    Info {
        #[arg(long, default_value = "http://localhost:8080", help = "Gate base URL")]
        url: String,
    },

    #[command(about = "Check server health from the /health endpoint")]
    Health {
        #[arg(long, default_value = "http://localhost:8080", help = "Gate base URL")]
        url: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (url, path) = match cmd {
        ServerCommands::Info { url } => (url, "/"),
        ServerCommands::Health { url } => (url, "/health"),
    };

    let endpoint = format!("{}{}", url.trim_end_matches('/'), path);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let response = match client.get(&endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            output_error(&output_format, &format!("{} unreachable: {}", endpoint, e), Some("UNREACHABLE"))?;
            anyhow::bail!("server unreachable")
        }
    };

    let status = response.status();
    let body: Value = response.json().await?;
    let data = body.get("data").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        output_record(&output_format, &data)
    } else {
        output_error(&output_format, &format!("{} returned {}", endpoint, status), Some("UNHEALTHY"))?;
        output_record(&output_format, &data)?;
        anyhow::bail!("server unhealthy")
    }
}
