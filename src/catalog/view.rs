use serde::Serialize;
use std::ops::Range;

use super::state::{CatalogState, Operation};
use crate::models::{FilterCriteria, FilterField, Product, ProductId};

pub const EMPTY_TABLE_MESSAGE: &str = "No products to display.";

/// Products matching the search text (case-insensitive substring of the name)
/// and every non-empty filter field, in their original order.
pub fn visible_products<'a>(products: &'a [Product], search: &str, filter: &FilterCriteria) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| filter.matches(p))
        .collect()
}

pub fn page_count(visible: usize, page_size: usize) -> usize {
    visible.div_ceil(page_size.max(1))
}

/// Slice bounds for a 1-based page; always within `0..visible`
pub fn page_bounds(page: usize, page_size: usize, visible: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(visible);
    let end = start.saturating_add(page_size).min(visible);
    start..end
}

/// Page number clamped into `[1, max(page_count, 1)]`
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// "Showing X to Y out of Z records"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Showing {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

/// Render model for the catalog table, toolbar and pagination controls
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView<'a> {
    pub rows: Vec<&'a Product>,
    pub visible_count: usize,
    pub page_count: usize,
    pub current_page: usize,
    pub showing: Option<Showing>,
    pub has_prev: bool,
    pub has_next: bool,
    pub show_edit: bool,
    pub show_delete: bool,
    pub all_selected: bool,
    pub active_filters: Vec<(FilterField, &'a str)>,
    pub is_loading: bool,
    /// Page-level panel for a failed load; the table is hidden while set
    pub error_panel: Option<&'a str>,
    /// Blocking alert for a failed create/update/delete, or a notice
    pub alert: Option<&'a str>,
    pub show_table: bool,
    pub empty_message: Option<&'static str>,
}

impl<'a> CatalogView<'a> {
    pub fn derive(state: &'a CatalogState) -> Self {
        let visible = visible_products(&state.products, &state.search, &state.filter);
        let visible_count = visible.len();
        let pages = page_count(visible_count, state.page_size);
        let bounds = page_bounds(state.current_page, state.page_size, visible_count);
        let showing = (!bounds.is_empty()).then(|| Showing {
            first: bounds.start + 1,
            last: bounds.end,
            total: visible_count,
        });
        let rows = visible[bounds].to_vec();

        let (error_panel, failure_alert) = match state.status.error() {
            Some((Operation::Load, message)) => (Some(message), None),
            Some((_, message)) => (None, Some(message)),
            None => (None, None),
        };
        let is_loading = state.status.is_loading();

        let mut active_filters = Vec::new();
        if let Some(t) = state.filter.type_constraint() {
            active_filters.push((FilterField::Type, t));
        }
        if let Some(s) = state.filter.store_constraint() {
            active_filters.push((FilterField::Store, s));
        }

        let show_table = !is_loading && error_panel.is_none();
        let empty_message = (show_table && rows.is_empty()).then_some(EMPTY_TABLE_MESSAGE);

        Self {
            has_prev: state.current_page > 1,
            has_next: state.current_page < pages,
            show_edit: state.selected.len() == 1,
            show_delete: !state.selected.is_empty(),
            all_selected: !state.products.is_empty() && state.selected.len() == state.products.len(),
            rows,
            visible_count,
            page_count: pages,
            current_page: state.current_page,
            showing,
            active_filters,
            is_loading,
            error_panel,
            alert: failure_alert.or(state.notice.as_deref()),
            show_table,
            empty_message,
        }
    }

    pub fn row_ids(&self) -> Vec<ProductId> {
        self.rows.iter().map(|p| p.id).collect()
    }
}
