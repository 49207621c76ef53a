use super::state::{CatalogState, Modal, Operation, OperationState};
use super::view::{clamp_page, page_count, visible_products};
use crate::models::{FilterCriteria, FilterField, Product, ProductId};

pub const SELECT_ONE_TO_EDIT: &str = "Please select exactly one product to edit";

/// Everything that can happen to the catalog, from the user or from the network
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearch(String),
    SetFilter(FilterCriteria),
    /// Remove one active filter chip
    ClearFilterField(FilterField),
    ResetFilters,
    NextPage,
    PrevPage,
    GoToPage(usize),
    ToggleSelect(ProductId),
    SelectAll(bool),
    OpenModal(Modal),
    CloseModal,
    Started(Operation),
    Loaded(Vec<Product>),
    Created(Product),
    Updated(Product),
    /// Ids the server confirmed as deleted
    Deleted(Vec<ProductId>),
    Failed { op: Operation, message: String },
}

/// Pure transition: `(state, action) -> state'`
pub fn reduce(mut state: CatalogState, action: Action) -> CatalogState {
    state.notice = None;
    if state.status.error().is_some() && !matches!(action, Action::Failed { .. }) {
        state.status = OperationState::Idle;
    }

    match action {
        Action::SetSearch(text) => {
            state.search = text;
            state.current_page = 1;
        }
        Action::SetFilter(criteria) => {
            state.filter = criteria;
            state.current_page = 1;
            if state.modal == Modal::Filter {
                state.modal = Modal::None;
            }
        }
        Action::ClearFilterField(field) => {
            state.filter = state.filter.without(field);
            state.current_page = 1;
        }
        Action::ResetFilters => {
            state.filter = FilterCriteria::default();
            state.current_page = 1;
            if state.modal == Modal::Filter {
                state.modal = Modal::None;
            }
        }
        Action::NextPage => {
            let next = state.current_page.saturating_add(1);
            state.current_page = clamp_page(next, visible_page_count(&state));
        }
        Action::PrevPage => {
            let prev = state.current_page.saturating_sub(1);
            state.current_page = clamp_page(prev, visible_page_count(&state));
        }
        Action::GoToPage(page) => {
            state.current_page = clamp_page(page, visible_page_count(&state));
        }
        Action::ToggleSelect(id) => {
            if !state.selected.remove(&id) {
                state.selected.insert(id);
            }
        }
        Action::SelectAll(true) => {
            state.selected = state.products.iter().map(|p| p.id).collect();
        }
        Action::SelectAll(false) => {
            state.selected.clear();
        }
        Action::OpenModal(Modal::Edit) if state.single_selection().is_none() => {
            state.notice = Some(SELECT_ONE_TO_EDIT.to_string());
        }
        Action::OpenModal(modal) => {
            state.modal = modal;
        }
        Action::CloseModal => {
            state.modal = Modal::None;
        }
        Action::Started(op) => {
            state.status = OperationState::Loading { op };
        }
        Action::Loaded(products) => {
            state.products = products;
            state
                .selected
                .retain(|id| state.products.iter().any(|p| p.id == *id));
            state.refresh_facets();
            state.current_page = 1;
            state.status = OperationState::Success { op: Operation::Load };
        }
        Action::Created(product) => {
            state.products.push(product);
            state.refresh_facets();
            if state.modal == Modal::Add {
                state.modal = Modal::None;
            }
            state.status = OperationState::Success { op: Operation::Create };
            reclamp(&mut state);
        }
        Action::Updated(product) => {
            if let Some(existing) = state.products.iter_mut().find(|p| p.id == product.id) {
                *existing = product;
            }
            state.refresh_facets();
            state.selected.clear();
            if state.modal == Modal::Edit {
                state.modal = Modal::None;
            }
            state.status = OperationState::Success { op: Operation::Update };
            reclamp(&mut state);
        }
        Action::Deleted(ids) => {
            state.products.retain(|p| !ids.contains(&p.id));
            for id in &ids {
                state.selected.remove(id);
            }
            state.refresh_facets();
            state.status = OperationState::Success { op: Operation::Delete };
            reclamp(&mut state);
        }
        Action::Failed { op, message } => {
            state.status = OperationState::Error { op, message };
        }
    }

    state
}

fn visible_page_count(state: &CatalogState) -> usize {
    page_count(
        visible_products(&state.products, &state.search, &state.filter).len(),
        state.page_size,
    )
}

/// Pull the current page back in range after the visible list shrank
fn reclamp(state: &mut CatalogState) {
    state.current_page = clamp_page(state.current_page, visible_page_count(state));
}
