//! Product catalog: state, the pure reducer, derived view and the async store

pub mod reducer;
pub mod state;
pub mod store;
pub mod view;

pub use reducer::{reduce, Action, SELECT_ONE_TO_EDIT};
pub use state::{CatalogState, Modal, Operation, OperationState};
pub use store::{CatalogStore, Confirm, DeleteOutcome, DELETE_PROMPT};
pub use view::{clamp_page, page_bounds, page_count, visible_products, CatalogView, Showing, EMPTY_TABLE_MESSAGE};
