use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::{FilterCriteria, Product, ProductId};

/// Network operations the catalog performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

/// `idle -> loading -> {success, error}`; an error falls back to idle on the next action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum OperationState {
    #[default]
    Idle,
    Loading { op: Operation },
    Success { op: Operation },
    Error { op: Operation, message: String },
}

impl OperationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, OperationState::Loading { .. })
    }

    pub fn error(&self) -> Option<(Operation, &str)> {
        match self {
            OperationState::Error { op, message } => Some((*op, message.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modal {
    #[default]
    None,
    Add,
    Edit,
    Filter,
}

/// Everything the catalog view is derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub search: String,
    pub filter: FilterCriteria,
    /// 1-based
    pub current_page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<ProductId>,
    pub available_types: Vec<String>,
    pub available_stores: Vec<String>,
    pub modal: Modal,
    pub status: OperationState,
    /// One-shot message for the user, cleared by the next action
    pub notice: Option<String>,
}

impl CatalogState {
    pub fn new(page_size: usize) -> Self {
        Self {
            products: Vec::new(),
            search: String::new(),
            filter: FilterCriteria::default(),
            current_page: 1,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
            available_types: Vec::new(),
            available_stores: Vec::new(),
            modal: Modal::None,
            status: OperationState::Idle,
            notice: None,
        }
    }

    pub fn with_products(page_size: usize, products: Vec<Product>) -> Self {
        let mut state = Self::new(page_size);
        state.products = products;
        state.refresh_facets();
        state
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn is_selected(&self, id: ProductId) -> bool {
        self.selected.contains(&id)
    }

    /// The only selected id, when exactly one is selected
    pub fn single_selection(&self) -> Option<ProductId> {
        match self.selected.len() {
            1 => self.selected.iter().next().copied(),
            _ => None,
        }
    }

    /// Distinct type/store values in first-seen order
    pub(crate) fn refresh_facets(&mut self) {
        self.available_types = distinct(self.products.iter().map(|p| p.product_type.as_str()));
        self.available_stores = distinct(self.products.iter().map(|p| p.store.as_str()));
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
