use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Trivial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Bug workflow states: pending -> processing -> resolved/rejected -> closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    Pending,
    Processing,
    Resolved,
    Rejected,
    Closed,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Trivial => "trivial",
        }
    }
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl BugStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BugStatus::Pending => "pending",
            BugStatus::Processing => "processing",
            BugStatus::Resolved => "resolved",
            BugStatus::Rejected => "rejected",
            BugStatus::Closed => "closed",
        }
    }
}

/// Reduced record used by the bug list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugSummary {
    pub id: i64,
    pub title: String,
    pub severity: Severity,
    #[serde(default)]
    pub severity_display: String,
    pub priority: Priority,
    #[serde(default)]
    pub priority_display: String,
    pub status: BugStatus,
    #[serde(default)]
    pub status_display: String,
    #[serde(default)]
    pub module: Option<i64>,
    #[serde(default)]
    pub module_path: String,
    #[serde(default)]
    pub version: String,
    pub creator: i64,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub assignee: Option<i64>,
    #[serde(default)]
    pub assignee_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub file: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Full record from the bug detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub severity_display: String,
    pub priority: Priority,
    #[serde(default)]
    pub priority_display: String,
    pub status: BugStatus,
    #[serde(default)]
    pub status_display: String,
    #[serde(default)]
    pub module: Option<i64>,
    #[serde(default)]
    pub module_path: String,
    /// `[project_id, product_id, module_id]` when a module is set.
    #[serde(default)]
    pub module_cascade: Vec<i64>,
    #[serde(default)]
    pub version: String,
    pub creator: i64,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub assignee: Option<i64>,
    #[serde(default)]
    pub assignee_name: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub reject_reason: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A file to attach to a bug; sent as a multipart part.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outbound payload for bug create/update. Sent as multipart form data to
/// allow attachments alongside the fields.
#[derive(Debug, Clone, Validate)]
pub struct BugForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub severity: Severity,
    pub priority: Priority,
    pub module: Option<i64>,
    pub version: String,
    pub assignee: Option<i64>,
    pub attachments: Vec<AttachmentUpload>,
}

impl BugForm {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Minor,
            priority: Priority::Medium,
            module: None,
            version: String::new(),
            assignee: None,
            attachments: Vec::new(),
        }
    }
}

/// Query filters for the bug list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BugFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BugStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `created` for bugs I reported, `assigned` for bugs assigned to me.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_bugs: Option<MyBugs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MyBugs {
    Created,
    Assigned,
}

/// Payload for the status transition endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: BugStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

impl StatusUpdate {
    pub fn to(status: BugStatus) -> Self {
        Self {
            status,
            solution: None,
            reject_reason: None,
        }
    }

    pub fn resolved(solution: impl Into<String>) -> Self {
        Self {
            status: BugStatus::Resolved,
            solution: Some(solution.into()),
            reject_reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: BugStatus::Rejected,
            solution: None,
            reject_reason: Some(reason.into()),
        }
    }
}

/// Acknowledgement of a status or assignment change.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    #[serde(default)]
    pub detail: String,
    pub status: BugStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_snake_case() {
        for status in [
            BugStatus::Pending,
            BugStatus::Processing,
            BugStatus::Resolved,
            BugStatus::Rejected,
            BugStatus::Closed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: BugStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn empty_filters_serialize_to_no_params() {
        let query = serde_urlencoded_like(&BugFilters::default());
        assert_eq!(query, "");
    }

    #[test]
    fn filters_serialize_snake_case_values() {
        let filters = BugFilters {
            status: Some(BugStatus::Pending),
            my_bugs: Some(MyBugs::Assigned),
            ..Default::default()
        };
        let query = serde_urlencoded_like(&filters);
        assert!(query.contains("status=pending"));
        assert!(query.contains("my_bugs=assigned"));
    }

    #[test]
    fn bug_form_validates_title_length() {
        use validator::Validate;

        let mut form = BugForm::new("", "steps to reproduce");
        assert!(form.validate().is_err());

        form.title = "crash on save".to_string();
        assert!(form.validate().is_ok());
    }

    fn serde_urlencoded_like<T: Serialize>(value: &T) -> String {
        serde_json::to_value(value)
            .unwrap()
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())))
            .collect::<Vec<_>>()
            .join("&")
    }
}
