use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::TokenService;
use crate::cli::OutputFormat;
use crate::config::config;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a record: JSON as-is, text as aligned `key: value` lines
pub fn output_record<T: Serialize>(output_format: &OutputFormat, record: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(record)?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => match value.as_object() {
            Some(fields) => {
                let width = fields.keys().map(|k| k.len()).max().unwrap_or(0);
                for (key, field) in fields {
                    println!("{:width$}  {}", key, text_value(field), width = width);
                }
            }
            None => println!("{}", text_value(&value)),
        },
    }
    Ok(())
}

fn text_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Token service from `--secret` or the configured JWT secret
pub fn token_service(secret: Option<&str>, ttl_hours: Option<u64>) -> anyhow::Result<TokenService> {
    let config = config();
    let secret = secret.unwrap_or(&config.security.jwt_secret);
    let ttl_hours = ttl_hours.unwrap_or(config.security.jwt_expiry_hours);
    Ok(TokenService::new(secret, ttl_hours)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_value_prints_null_as_dash() {
        assert_eq!(text_value(&Value::Null), "-");
        assert_eq!(text_value(&json!("admin")), "admin");
        assert_eq!(text_value(&json!(7)), "7");
    }

    #[test]
    fn explicit_secret_builds_service() {
        assert!(token_service(Some("cli-secret"), Some(1)).is_ok());
        assert!(token_service(Some(""), Some(1)).is_err());
    }
}
