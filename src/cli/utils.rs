use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::session::{Route, SessionGuard, SessionStore};

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

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error in the appropriate format. Client errors keep their code and field errors.
pub fn output_error(output_format: &OutputFormat, error: &anyhow::Error) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = match error.downcast_ref::<ClientError>() {
                Some(client_error) => client_error.to_json(),
                None => json!({
                    "success": false,
                    "error": error.to_string()
                }),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", error);
            if let Some(fields) = error.downcast_ref::<ClientError>().and_then(ClientError::field_errors) {
                for (field, message) in fields {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Consult the session guard before running a command bound to `route`
pub fn require_route(session: &SessionStore, route: Route) -> anyhow::Result<()> {
    let guard = SessionGuard::new(session).check(route);
    match guard.redirect {
        Some(Route::Login) => Err(ClientError::unauthenticated(format!(
            "{} requires a session, run `pear login <email>` first",
            route
        ))
        .into()),
        Some(other) => Err(anyhow::anyhow!("{} redirects to {}", route, other)),
        None => Ok(()),
    }
}

/// Read one trimmed line from stdin after printing `prompt`
pub fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Interactive yes/no on stdin; anything but y/yes declines
pub fn confirm_on_stdin(prompt: &str) -> bool {
    match prompt_line(&format!("{} [y/N] ", prompt)) {
        Ok(answer) => is_affirmative(&answer),
        Err(e) => {
            tracing::warn!("could not read confirmation: {}", e);
            false
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
