use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Developer {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewDeveloper {
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 50, message = "Must be at most 50 characters")
    )]
    pub email: String,
}

/// PATCH body. Only the fields present are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateDeveloper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 50, message = "Must be at most 50 characters")
    )]
    pub email: Option<String>,
}

impl UpdateDeveloper {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// A developer merged with its (optional) info row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeveloperProfile {
    #[serde(rename = "developerId")]
    pub developer_id: i32,

    #[serde(rename = "developerName")]
    pub developer_name: String,

    #[serde(rename = "developerEmail")]
    pub developer_email: String,

    #[serde(rename = "developerInfoDeveloperSince")]
    pub developer_info_developer_since: Option<chrono::NaiveDate>,

    #[serde(rename = "developerInfoPreferredOS")]
    pub developer_info_preferred_os: Option<String>,
}
