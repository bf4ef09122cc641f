use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{Role, Subject};
use crate::cli::utils::{output_error, output_record, token_service};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a session token for a user")]
    Issue {
        #[arg(long, help = "User id")]
        id: i64,
        #[arg(long, help = "User email")]
        email: String,
        #[arg(long, help = "Role: admin, owner, supplier, superadmin")]
        role: Role,
        #[arg(long, help = "Condominium id")]
        condominium: Option<i64>,
        #[arg(long, help = "Issue the token for a disabled account")]
        disabled: bool,
        #[arg(long, help = "Lifetime in hours (defaults to configured expiry)")]
        ttl_hours: Option<u64>,
        #[arg(long, help = "Signing secret (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "Session token")]
        token: String,
        #[arg(long, help = "Verification secret (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue {
            id,
            email,
            role,
            condominium,
            disabled,
            ttl_hours,
            secret,
        } => {
            let tokens = token_service(secret.as_deref(), ttl_hours)?;
            let subject = Subject {
                id,
                email,
                role,
                condominium_id: condominium,
                authorized: !disabled,
            };
            let issued = tokens.issue(&subject, Utc::now().timestamp())?;

            match output_format {
                OutputFormat::Json => output_record(
                    &output_format,
                    &json!({ "token": issued.token, "claims": issued.claims }),
                ),
                OutputFormat::Text => {
                    println!("{}", issued.token);
                    Ok(())
                }
            }
        }
        TokenCommands::Inspect { token, secret } => {
            let tokens = token_service(secret.as_deref(), None)?;
            match tokens.verify_now(&token) {
                Ok(claims) => {
                    let expires = Utc
                        .timestamp_opt(claims.exp, 0)
                        .single()
                        .map(|t| t.to_rfc3339());
                    output_record(
                        &output_format,
                        &json!({
                            "id": claims.id,
                            "email": claims.email,
                            "role": claims.role,
                            "condominiumId": claims.condominium_id,
                            "authorized": claims.authorized,
                            "expiresAt": expires,
                        }),
                    )
                }
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some("TOKEN_INVALID"))?;
                    anyhow::bail!("token rejected")
                }
            }
        }
    }
}
