use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::ApiClient;
use crate::catalog::{CatalogStore, CatalogView, Confirm, Modal};
use crate::cli::utils::{confirm_on_stdin, output_success, require_route};
use crate::cli::OutputFormat;
use crate::models::{FilterCriteria, FilterField, ProductForm, ProductId};
use crate::session::Route;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List one page of products")]
    List {
        #[arg(long, help = "Case-insensitive name search")]
        search: Option<String>,
        #[arg(long = "type", help = "Only products of this type")]
        product_type: Option<String>,
        #[arg(long, help = "Only products from this store")]
        store: Option<String>,
        #[arg(long, default_value_t = 1, help = "Page number (clamped to the available range)")]
        page: usize,
    },

    #[command(about = "Show the distinct types and stores available for filtering")]
    Facets,

    #[command(about = "Add a product")]
    Add(ProductFields),

    #[command(about = "Edit a product; omitted fields keep their current value")]
    Edit {
        #[arg(help = "Product ID")]
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },

    #[command(about = "Delete one or more products")]
    Delete {
        #[arg(required = true, help = "Product IDs")]
        ids: Vec<ProductId>,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

/// Form fields as flags. Validation happens in the catalog store, not here.
#[derive(Args, Debug, Default)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long = "type")]
    pub product_type: Option<String>,
    #[arg(long)]
    pub store: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long, help = "Image URL")]
    pub image: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
}

impl ProductFields {
    /// Overlay the given flags onto `form`
    pub fn apply(self, mut form: ProductForm) -> ProductForm {
        let overlay = |target: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        overlay(&mut form.name, self.name);
        overlay(&mut form.model, self.model);
        overlay(&mut form.product_type, self.product_type);
        overlay(&mut form.store, self.store);
        overlay(&mut form.price, self.price);
        overlay(&mut form.image, self.image);
        overlay(&mut form.stock, self.stock);
        form
    }
}

pub async fn handle(
    cmd: ProductCommands,
    api: ApiClient,
    page_size: usize,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    require_route(api.session(), Route::Products)?;

    let session = api.session().clone();
    let mut store = CatalogStore::new(api, session, page_size);
    store.load().await?;

    match cmd {
        ProductCommands::List {
            search,
            product_type,
            store: store_name,
            page,
        } => {
            store.set_search(search.unwrap_or_default());
            store.set_filter(FilterCriteria::new(
                product_type.unwrap_or_default(),
                store_name.unwrap_or_default(),
            ));
            store.go_to_page(page);
            print_view(&store.view(), &output_format)
        }
        ProductCommands::Facets => {
            let state = store.state();
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "types": state.available_types,
                            "stores": state.available_stores,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Types:  {}", state.available_types.join(", "));
                    println!("Stores: {}", state.available_stores.join(", "));
                }
            }
            Ok(())
        }
        ProductCommands::Add(fields) => {
            store.open_modal(Modal::Add);
            let form = fields.apply(ProductForm::default());
            let product = store.create(&form).await?;
            output_success(
                &output_format,
                &format!("Product '{}' added with ID {}", product.name, product.id),
                Some(json!({ "product": product })),
            )
        }
        ProductCommands::Edit { id, fields } => {
            let current = store
                .state()
                .product(id)
                .ok_or_else(|| anyhow::anyhow!("Product {} not found", id))?;
            let form = fields.apply(ProductForm::from(current));

            store.toggle_select(id);
            store.open_modal(Modal::Edit);
            let product = store.update(id, &form).await?;
            output_success(
                &output_format,
                &format!("Product {} updated", product.id),
                Some(json!({ "product": product })),
            )
        }
        ProductCommands::Delete { ids, yes } => {
            if let Some(missing) = ids.iter().find(|id| store.state().product(**id).is_none()) {
                anyhow::bail!("Product {} not found", missing);
            }
            for id in &ids {
                if !store.state().is_selected(*id) {
                    store.toggle_select(*id);
                }
            }

            let confirm: Box<dyn Confirm> = if yes {
                Box::new(|_: &str| true)
            } else {
                Box::new(confirm_on_stdin)
            };
            let outcome = store.delete_selected(confirm.as_ref()).await;

            if outcome.cancelled {
                return output_success(&output_format, "Deletion cancelled", Some(json!({ "deleted": [] })));
            }
            if !outcome.failed.is_empty() {
                let message = store
                    .view()
                    .alert
                    .map(str::to_string)
                    .unwrap_or_else(|| "Some products could not be deleted".to_string());
                for (id, reason) in &outcome.failed {
                    tracing::warn!(id, "not deleted: {}", reason);
                }
                anyhow::bail!(message);
            }
            output_success(
                &output_format,
                &format!("Deleted {} product(s)", outcome.deleted.len()),
                Some(json!({ "deleted": outcome.deleted })),
            )
        }
    }
}

fn print_view(view: &CatalogView<'_>, output_format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    if !view.active_filters.is_empty() {
        let chips: Vec<String> = view
            .active_filters
            .iter()
            .map(|(field, value)| match field {
                FilterField::Type => format!("type={}", value),
                FilterField::Store => format!("store={}", value),
            })
            .collect();
        println!("Filters: {}", chips.join(" "));
    }

    if let Some(message) = view.empty_message {
        println!("{}", message);
        println!("Use `pear products add` to create one.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<30}  {:<14}  {:<12}  {:<14}  {:>10}  {:>6}",
        "ID", "NAME", "MODEL", "TYPE", "STORE", "PRICE", "STOCK"
    );
    for p in &view.rows {
        println!(
            "{:>6}  {:<30}  {:<14}  {:<12}  {:<14}  {:>10}  {:>6}",
            p.id,
            truncate(&p.name, 30),
            truncate(&p.model, 14),
            truncate(&p.product_type, 12),
            truncate(&p.store, 14),
            p.price.round_dp(2),
            p.stock
        );
    }

    if let Some(showing) = view.showing {
        println!(
            "Showing {} to {} out of {} records (page {} of {})",
            showing.first, showing.last, showing.total, view.current_page, view.page_count
        );
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
