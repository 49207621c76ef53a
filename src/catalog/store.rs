use futures::future::join_all;
use serde::Serialize;

use super::reducer::{reduce, Action, SELECT_ONE_TO_EDIT};
use super::state::{CatalogState, Modal, Operation};
use super::view::CatalogView;
use crate::api::ProductApi;
use crate::error::ClientError;
use crate::models::{FilterCriteria, FilterField, Product, ProductForm, ProductId};
use crate::session::SessionStore;
use crate::validation::validate_product;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete the selected products?";
pub const MISSING_USER: &str = "User information not found. Please log in again.";

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Per-item result of a bulk delete
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteOutcome {
    pub deleted: Vec<ProductId>,
    pub failed: Vec<(ProductId, String)>,
    pub cancelled: bool,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failed.is_empty()
    }
}

/// Owns the catalog state and sequences API calls into reducer actions.
///
/// All mutation goes through [`CatalogStore::dispatch`]; the view is always
/// derived fresh from the current state.
pub struct CatalogStore<A> {
    api: A,
    session: SessionStore,
    state: CatalogState,
}

impl<A: ProductApi> CatalogStore<A> {
    pub fn new(api: A, session: SessionStore, page_size: usize) -> Self {
        Self {
            api,
            session,
            state: CatalogState::new(page_size),
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::derive(&self.state)
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetSearch(text.into()));
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.dispatch(Action::SetFilter(criteria));
    }

    pub fn clear_filter_field(&mut self, field: FilterField) {
        self.dispatch(Action::ClearFilterField(field));
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(Action::ResetFilters);
    }

    pub fn next_page(&mut self) {
        self.dispatch(Action::NextPage);
    }

    pub fn prev_page(&mut self) {
        self.dispatch(Action::PrevPage);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.dispatch(Action::GoToPage(page));
    }

    pub fn toggle_select(&mut self, id: ProductId) {
        self.dispatch(Action::ToggleSelect(id));
    }

    pub fn select_all(&mut self, on: bool) {
        self.dispatch(Action::SelectAll(on));
    }

    /// Fetch the full collection. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.dispatch(Action::Started(Operation::Load));
        match self.api.list_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "products loaded");
                self.dispatch(Action::Loaded(products));
                Ok(())
            }
            Err(e) => {
                tracing::error!("error fetching products: {}", e);
                self.dispatch(Action::Failed {
                    op: Operation::Load,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Validate the add form, attach the session user and POST it
    pub async fn create(&mut self, form: &ProductForm) -> Result<Product, ClientError> {
        let payload = validate_product(form)?;
        let user_id = self
            .session
            .user_id()
            .ok_or_else(|| ClientError::unauthenticated(MISSING_USER))?;
        let payload = payload.with_user(user_id);

        self.dispatch(Action::Started(Operation::Create));
        match self.api.create_product(&payload).await {
            Ok(product) => {
                tracing::info!(id = product.id, "product created");
                self.dispatch(Action::Created(product.clone()));
                Ok(product)
            }
            Err(e) => {
                tracing::error!("error adding product: {}", e);
                self.dispatch(Action::Failed {
                    op: Operation::Create,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// PUT the full edited record for the single selected product
    pub async fn update(&mut self, id: ProductId, form: &ProductForm) -> Result<Product, ClientError> {
        if self.state.single_selection() != Some(id) {
            return Err(ClientError::invalid_field("selection", SELECT_ONE_TO_EDIT));
        }
        let payload = validate_product(form)?;

        self.dispatch(Action::Started(Operation::Update));
        match self.api.update_product(id, &payload).await {
            Ok(product) => {
                tracing::info!(id = product.id, "product updated");
                self.dispatch(Action::Updated(product.clone()));
                Ok(product)
            }
            Err(e) => {
                tracing::error!(id, "error updating product: {}", e);
                self.dispatch(Action::Failed {
                    op: Operation::Update,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Delete every selected product concurrently after confirmation.
    ///
    /// Each id succeeds or fails on its own: confirmed deletions leave the list
    /// and the selection, failed ones stay selected and are reported.
    pub async fn delete_selected(&mut self, confirm: &dyn Confirm) -> DeleteOutcome {
        let ids: Vec<ProductId> = self.state.selected.iter().copied().collect();
        if ids.is_empty() {
            return DeleteOutcome::default();
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome {
                cancelled: true,
                ..DeleteOutcome::default()
            };
        }

        self.dispatch(Action::Started(Operation::Delete));
        let api = &self.api;
        let results = join_all(ids.iter().map(|id| async move { (*id, api.delete_product(*id).await) })).await;

        let mut outcome = DeleteOutcome::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.deleted.push(id),
                Err(e) => {
                    tracing::error!(id, "error deleting product: {}", e);
                    outcome.failed.push((id, e.to_string()));
                }
            }
        }

        self.dispatch(Action::Deleted(outcome.deleted.clone()));
        if !outcome.failed.is_empty() {
            let failed_ids: Vec<String> = outcome.failed.iter().map(|(id, _)| id.to_string()).collect();
            self.dispatch(Action::Failed {
                op: Operation::Delete,
                message: format!(
                    "Failed to delete {} of {} products ({}). Please try again.",
                    outcome.failed.len(),
                    ids.len(),
                    failed_ids.join(", ")
                ),
            });
        }
        outcome
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.dispatch(Action::OpenModal(modal));
    }

    pub fn close_modal(&mut self) {
        self.dispatch(Action::CloseModal);
    }
}
