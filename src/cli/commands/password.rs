use clap::Subcommand;

use crate::auth::{hash_password_with_cost, verify_password};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PasswordCommands {
    #[command(about = "Hash a password with bcrypt for the users table")]
    Hash {
        #[arg(help = "Plain-text password")]
        password: String,
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST, help = "bcrypt work factor (4-31)")]
        cost: u32,
    },

    #[command(about = "Check a password against a stored hash")]
    Verify {
        #[arg(help = "Plain-text password")]
        password: String,
        #[arg(help = "Stored bcrypt hash ($2b$<cost>$...)")]
        hash: String,
    },
}

pub async fn handle(cmd: PasswordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PasswordCommands::Hash { password, cost } => {
            let hash = hash_password_with_cost(&password, cost)?;
            match output_format {
                OutputFormat::Json => {
                    output_success(&output_format, "Password hashed", Some(serde_json::json!(hash)))
                }
                OutputFormat::Text => {
                    println!("{}", hash);
                    Ok(())
                }
            }
        }
        PasswordCommands::Verify { password, hash } => {
            if verify_password(&password, &hash)? {
                output_success(&output_format, "Password matches", None)
            } else {
                output_error(&output_format, "Password does not match", Some("PASSWORD_MISMATCH"))?;
                anyhow::bail!("password mismatch")
            }
        }
    }
}
