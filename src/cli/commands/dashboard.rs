use serde_json::json;

use crate::api::ApiClient;
use crate::cli::utils::{output_empty_collection, require_route};
use crate::cli::OutputFormat;
use crate::session::Route;

pub async fn handle(api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    require_route(api.session(), Route::Dashboard)?;

    let cards = api.dashboard().await?;
    if cards.is_empty() {
        return output_empty_collection(&output_format, "cards", "Nothing on the dashboard yet.");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "cards": cards }))?);
        }
        OutputFormat::Text => {
            for card in &cards {
                println!("{}", card.title);
                if !card.description.is_empty() {
                    println!("  {}", card.description);
                }
            }
        }
    }
    Ok(())
}
