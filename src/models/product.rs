use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-assigned product identifier
pub type ProductId = i64;

/// Product as returned by `/api/products/`.
///
/// The server sends `price` as decimal text ("19.99"); numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub model: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub store: String,
    pub price: Decimal,
    pub image: String,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
}

/// Raw add/edit form input, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub model: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub store: String,
    pub price: String,
    pub image: String,
    pub stock: String,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            model: product.model.clone(),
            product_type: product.product_type.clone(),
            store: product.store.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            stock: product.stock.to_string(),
        }
    }
}

/// Validated create/update body. Price travels as a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub model: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub store: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
}

impl ProductPayload {
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user = Some(user_id);
        self
    }

    /// The record the server would hold after applying this payload to `id`
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            model: self.model,
            product_type: self.product_type,
            store: self.store,
            price: self.price,
            image: self.image,
            stock: self.stock,
            user: self.user,
        }
    }
}

/// Type/store filter. An empty string places no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub store: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Type,
    Store,
}

impl FilterCriteria {
    pub fn new(product_type: impl Into<String>, store: impl Into<String>) -> Self {
        Self {
            product_type: product_type.into(),
            store: store.into(),
        }
    }

    pub fn type_constraint(&self) -> Option<&str> {
        Some(self.product_type.as_str()).filter(|t| !t.is_empty())
    }

    pub fn store_constraint(&self) -> Option<&str> {
        Some(self.store.as_str()).filter(|s| !s.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.type_constraint().is_some() || self.store_constraint().is_some()
    }

    pub fn without(&self, field: FilterField) -> Self {
        let mut next = self.clone();
        match field {
            FilterField::Type => next.product_type.clear(),
            FilterField::Store => next.store.clear(),
        }
        next
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.type_constraint().map_or(true, |t| product.product_type == t)
            && self.store_constraint().map_or(true, |s| product.store == s)
    }
}
