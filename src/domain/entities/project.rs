use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub repository: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub developer_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProject {
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Must be at most 20 characters"))]
    pub estimated_time: Option<String>,

    #[serde(default)]
    #[validate(length(max = 120, message = "Must be at most 120 characters"))]
    pub repository: Option<String>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    pub developer_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "Must be at most 20 characters"))]
    pub estimated_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "Must be at most 120 characters"))]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<i32>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.estimated_time.is_none()
            && self.repository.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.developer_id.is_none()
    }
}

/// One row of a project read: the project joined with at most one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTechnologyRow {
    pub project_id: i32,
    pub project_name: String,
    pub project_description: Option<String>,
    pub project_estimated_time: Option<String>,
    pub project_repository: Option<String>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
    pub project_developer_id: i32,
    pub technology_id: Option<i32>,
    pub technology_name: Option<String>,
}
