use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top level of the project / product / module hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<ProductBrief>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reduced product record nested inside project listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBrief {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub project: i64,
    #[serde(default)]
    pub project_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub modules: Vec<ModuleItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleItem {
    pub id: i64,
    pub product: i64,
    #[serde(default)]
    pub product_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Node of the cascade selector tree (`{value, label, children}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeNode {
    pub value: i64,
    pub label: String,
    #[serde(default)]
    pub children: Vec<CascadeNode>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ProjectForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ProductForm {
    pub project: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ModuleForm {
    pub product: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
}
