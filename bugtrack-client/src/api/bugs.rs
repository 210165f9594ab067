//! Bug endpoints. Create and update are sent as multipart form data so
//! attachments can ride along with the fields.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{
    ApiMessage, Attachment, AttachmentUpload, BugDetail, BugFilters, BugForm, BugSummary,
    Paginated, StatusChange, StatusUpdate,
};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use validator::Validate;

pub struct BugsClient {
    api: Arc<ApiClient>,
}

impl BugsClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &BugFilters) -> Result<Paginated<BugSummary>, ApiError> {
        self.api.get_query("/bugs/", filters).await
    }

    pub async fn get(&self, id: i64) -> Result<BugDetail, ApiError> {
        self.api.get(&format!("/bugs/{id}/")).await
    }

    /// The server echoes the write-serializer fields rather than the full
    /// record, so the body is returned untyped.
    pub async fn create(&self, form: &BugForm) -> Result<serde_json::Value, ApiError> {
        form.validate()?;
        self.api.post_multipart("/bugs/", || bug_form(form)).await
    }

    pub async fn update(&self, id: i64, form: &BugForm) -> Result<serde_json::Value, ApiError> {
        form.validate()?;
        self.api
            .put_multipart(&format!("/bugs/{id}/"), || bug_form(form))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/bugs/{id}/")).await
    }

    pub async fn update_status(
        &self,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<StatusChange, ApiError> {
        self.api
            .post_json(&format!("/bugs/{id}/update_status/"), update)
            .await
    }

    pub async fn assign(&self, id: i64, assignee: i64) -> Result<ApiMessage, ApiError> {
        let body = serde_json::json!({ "assignee": assignee });
        self.api
            .post_json(&format!("/bugs/{id}/assign/"), &body)
            .await
    }

    pub async fn upload_attachment(
        &self,
        id: i64,
        upload: &AttachmentUpload,
    ) -> Result<Attachment, ApiError> {
        self.api
            .post_multipart(&format!("/bugs/{id}/upload_attachment/"), || {
                Ok(Form::new().part("file", attachment_part(upload)?))
            })
            .await
    }

    pub async fn delete_attachment(
        &self,
        bug_id: i64,
        attachment_id: i64,
    ) -> Result<ApiMessage, ApiError> {
        self.api
            .delete_json(&format!("/bugs/{bug_id}/attachment/{attachment_id}/"))
            .await
    }

    /// Prefill payload for reporting a copy of an existing bug.
    pub async fn copy(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.api.get(&format!("/bugs/{id}/copy/")).await
    }
}

fn bug_form(form: &BugForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new()
        .text("title", form.title.clone())
        .text("description", form.description.clone())
        .text("severity", form.severity.as_str())
        .text("priority", form.priority.as_str())
        .text("version", form.version.clone());

    if let Some(module) = form.module {
        multipart = multipart.text("module", module.to_string());
    }
    if let Some(assignee) = form.assignee {
        multipart = multipart.text("assignee", assignee.to_string());
    }
    for upload in &form.attachments {
        multipart = multipart.part("attachments", attachment_part(upload)?);
    }

    Ok(multipart)
}

fn attachment_part(upload: &AttachmentUpload) -> Result<Part, ApiError> {
    let part = Part::bytes(upload.bytes.clone())
        .file_name(upload.filename.clone())
        .mime_str(&upload.content_type)?;
    Ok(part)
}
