use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::{ProjectId, UserId};

/// One hackathon project entry.
///
/// `hackatime_projects` and `hackatime_hours` are derived by the linking
/// resolver and always change together; they are never written directly.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub project_name: String,
    pub project_description: String,
    pub project_type: Option<String>,
    pub attachment_urls: Option<Vec<String>>,
    pub code_url: Option<String>,
    pub live_url: Option<String>,
    pub submission_week: String,
    pub shipped: bool,
    pub github_installation_id: Option<String>,
    pub github_repo_path: Option<String>,
    pub hackatime_projects: Option<Vec<String>>,
    pub hackatime_hours: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Project {
    /// A project counts as code-linked with either a raw URL or a verified
    /// repository path from the GitHub integration. Blank strings count as
    /// absent.
    pub fn has_code_link(&self) -> bool {
        let has_url = self.code_url.as_deref().is_some_and(|url| !url.is_empty());
        let has_repo = self
            .github_repo_path
            .as_deref()
            .is_some_and(|path| !path.is_empty());

        has_url || has_repo
    }

    pub fn linked_hackatime_names(&self) -> &[String] {
        self.hackatime_projects.as_deref().unwrap_or(&[])
    }

    pub fn has_hackatime_link(&self) -> bool {
        !self.linked_hackatime_names().is_empty()
    }

    pub fn hours_or_zero(&self) -> f64 {
        self.hackatime_hours.unwrap_or(0.0)
    }
}

/// Payload for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub user_id: UserId,
    pub project_name: String,
    pub project_description: String,
    pub project_type: Option<String>,
    pub attachment_urls: Option<Vec<String>>,
    pub code_url: Option<String>,
    pub live_url: Option<String>,
    pub submission_week: String,
    pub github_installation_id: Option<String>,
    pub github_repo_path: Option<String>,
}

/// Partial update of a project's user-editable fields. A `None` field is
/// left untouched; the linking resolver owns `hackatime_projects` and
/// `hackatime_hours`, and the submit flow owns `shipped`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub project_type: Option<String>,
    pub attachment_urls: Option<Vec<String>>,
    pub code_url: Option<String>,
    pub live_url: Option<String>,
    pub submission_week: Option<String>,
    pub github_installation_id: Option<String>,
    pub github_repo_path: Option<String>,
}

impl ProjectPatch {
    /// Merge the provided fields into `project`, field by field.
    pub fn apply(self, project: &mut Project) {
        if let Some(project_name) = self.project_name {
            project.project_name = project_name;
        }
        if let Some(project_description) = self.project_description {
            project.project_description = project_description;
        }
        if let Some(project_type) = self.project_type {
            project.project_type = Some(project_type);
        }
        if let Some(attachment_urls) = self.attachment_urls {
            project.attachment_urls = Some(attachment_urls);
        }
        if let Some(code_url) = self.code_url {
            project.code_url = Some(code_url);
        }
        if let Some(live_url) = self.live_url {
            project.live_url = Some(live_url);
        }
        if let Some(submission_week) = self.submission_week {
            project.submission_week = submission_week;
        }
        if let Some(github_installation_id) = self.github_installation_id {
            project.github_installation_id = Some(github_installation_id);
        }
        if let Some(github_repo_path) = self.github_repo_path {
            project.github_repo_path = Some(github_repo_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn project() -> Project {
        Project {
            project_id: ProjectId::new("p1"),
            user_id: UserId::new("u1"),
            project_name: "Robot Arm".to_string(),
            project_description: "A robot arm".to_string(),
            project_type: None,
            attachment_urls: None,
            code_url: None,
            live_url: None,
            submission_week: "week-1".to_string(),
            shipped: false,
            github_installation_id: None,
            github_repo_path: None,
            hackatime_projects: None,
            hackatime_hours: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn code_link_accepts_either_source_and_rejects_blank() {
        let mut p = project();
        assert!(!p.has_code_link());

        p.code_url = Some("".to_string());
        assert!(!p.has_code_link());

        p.code_url = Some("https://github.com/u1/robot-arm".to_string());
        assert!(p.has_code_link());

        p.code_url = None;
        p.github_repo_path = Some("u1/robot-arm".to_string());
        assert!(p.has_code_link());
    }

    #[test]
    fn patch_leaves_missing_fields_untouched() {
        let mut p = project();
        let patch = ProjectPatch {
            project_name: Some("Robot Arm v2".to_string()),
            live_url: Some("https://arm.example.com".to_string()),
            ..Default::default()
        };

        patch.apply(&mut p);

        assert_eq!(p.project_name, "Robot Arm v2");
        assert_eq!(p.live_url.as_deref(), Some("https://arm.example.com"));
        assert_eq!(p.project_description, "A robot arm");
        assert!(p.code_url.is_none());
    }
}
