use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_record, token_service};
use crate::cli::OutputFormat;
use crate::policy::{classify, evaluate, normalize_path, Section};

#[derive(Subcommand)]
pub enum GateCommands {
    #[command(about = "Show what the gate would do for a path and token")]
    Check {
        #[arg(help = "Request path, e.g. /owner/receipts")]
        path: String,
        #[arg(long, help = "Session token (omit to check an anonymous request)")]
        token: Option<String>,
        #[arg(long, help = "Verification secret (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },

    #[command(about = "Show the section and allowed roles for a path")]
    Section {
        #[arg(help = "Request path")]
        path: String,
    },
}

pub async fn handle(cmd: GateCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        GateCommands::Check { path, token, secret } => {
            let tokens = token_service(secret.as_deref(), None)?;
            let canonical = normalize_path(&path)?;
            if canonical != path {
                eprintln!("{} is served as {}", path, canonical);
            }
            let outcome = evaluate(&canonical, token.as_deref(), &tokens, Utc::now().timestamp());
            output_record(&output_format, &outcome.report())
        }
        GateCommands::Section { path } => match classify(&normalize_path(&path)?) {
            Some(section) => output_record(&output_format, &section_record(section)),
            None => output_record(&output_format, &json!({ "path": path, "section": null })),
        },
    }
}

fn section_record(section: Section) -> serde_json::Value {
    json!({
        "section": section,
        "kind": section.kind(),
        "allowed_roles": section.allowed_roles(),
    })
}
