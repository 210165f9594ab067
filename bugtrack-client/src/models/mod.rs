pub mod bug;
pub mod module;
pub mod user;

pub use bug::{
    Attachment, AttachmentUpload, BugDetail, BugFilters, BugForm, BugStatus, BugSummary, MyBugs,
    Priority, Severity, StatusChange, StatusUpdate,
};
pub use module::{
    CascadeNode, ModuleForm, ModuleItem, Product, ProductBrief, ProductForm, Project, ProjectForm,
};
pub use user::{
    ChangePasswordForm, LoginResponse, ProfileUpdate, ResetPasswordForm, Role, User,
    UserCreateForm, UserFilters, UserProfile, UserStatus, UserUpdateForm,
};

use serde::{Deserialize, Serialize};

/// Paginated list envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Plain acknowledgement body (`{"detail": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub detail: String,
}
