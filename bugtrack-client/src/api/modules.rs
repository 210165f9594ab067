//! Project / product / module hierarchy endpoints.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{
    CascadeNode, ModuleForm, ModuleItem, Paginated, Product, ProductForm, Project, ProjectForm,
};
use std::sync::Arc;
use validator::Validate;

pub struct ModulesClient {
    api: Arc<ApiClient>,
}

impl ModulesClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Full project -> product -> module tree for the cascade selector.
    /// Disabled nodes are filtered out server-side.
    pub async fn cascade(&self) -> Result<Vec<CascadeNode>, ApiError> {
        self.api.get("/modules/cascade/").await
    }

    pub async fn list_projects(&self, page: Option<u32>) -> Result<Paginated<Project>, ApiError> {
        self.api
            .get_query("/modules/projects/", &page_query(page))
            .await
    }

    pub async fn create_project(&self, form: &ProjectForm) -> Result<Project, ApiError> {
        form.validate()?;
        self.api.post_json("/modules/projects/", form).await
    }

    pub async fn update_project(&self, id: i64, form: &ProjectForm) -> Result<Project, ApiError> {
        form.validate()?;
        self.api
            .put_json(&format!("/modules/projects/{id}/"), form)
            .await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/modules/projects/{id}/")).await
    }

    pub async fn list_products(&self, page: Option<u32>) -> Result<Paginated<Product>, ApiError> {
        self.api
            .get_query("/modules/products/", &page_query(page))
            .await
    }

    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        form.validate()?;
        self.api.post_json("/modules/products/", form).await
    }

    pub async fn update_product(&self, id: i64, form: &ProductForm) -> Result<Product, ApiError> {
        form.validate()?;
        self.api
            .put_json(&format!("/modules/products/{id}/"), form)
            .await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/modules/products/{id}/")).await
    }

    pub async fn list_modules(&self, page: Option<u32>) -> Result<Paginated<ModuleItem>, ApiError> {
        self.api
            .get_query("/modules/modules/", &page_query(page))
            .await
    }

    pub async fn create_module(&self, form: &ModuleForm) -> Result<ModuleItem, ApiError> {
        form.validate()?;
        self.api.post_json("/modules/modules/", form).await
    }

    pub async fn update_module(&self, id: i64, form: &ModuleForm) -> Result<ModuleItem, ApiError> {
        form.validate()?;
        self.api
            .put_json(&format!("/modules/modules/{id}/"), form)
            .await
    }

    pub async fn delete_module(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/modules/modules/{id}/")).await
    }
}

fn page_query(page: Option<u32>) -> Vec<(&'static str, u32)> {
    page.map(|page| vec![("page", page)]).unwrap_or_default()
}
