use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{DashboardCard, Product, ProductId, ProductPayload};

/// Product endpoints the catalog store depends on
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError>;

    async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<Product, ClientError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError>;
}

#[async_trait]
impl ProductApi for ApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_json("/api/products/").await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        self.send_json(Method::POST, "/api/products/", payload).await
    }

    async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<Product, ClientError> {
        self.send_json(Method::PUT, &product_path(id), payload).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &product_path(id), None).await
    }
}

impl ApiClient {
    pub async fn dashboard(&self) -> Result<Vec<DashboardCard>, ClientError> {
        self.get_json("/api/dashboard/").await
    }
}

fn product_path(id: ProductId) -> String {
    format!("/api/products/{}/", id)
}
