use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Technologies a project may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TechnologyName {
    #[display("JavaScript")]
    JavaScript,
    #[display("Python")]
    Python,
    #[display("React")]
    React,
    #[display("Express.js")]
    ExpressJs,
    #[display("HTML")]
    Html,
    #[display("CSS")]
    Css,
    #[display("Django")]
    Django,
    #[display("PostgreSQL")]
    PostgreSql,
    #[display("MongoDB")]
    MongoDb,
}

impl TechnologyName {
    pub const ALL: [TechnologyName; 9] = [
        TechnologyName::JavaScript,
        TechnologyName::Python,
        TechnologyName::React,
        TechnologyName::ExpressJs,
        TechnologyName::Html,
        TechnologyName::Css,
        TechnologyName::Django,
        TechnologyName::PostgreSql,
        TechnologyName::MongoDb,
    ];

    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(ToString::to_string).collect()
    }
}

impl FromStr for TechnologyName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tech| tech.to_string() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Technology {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachTechnology {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTechnologyInsert {
    pub added_in: NaiveDate,
    pub technology_id: i32,
    pub project_id: i32,
}

impl ProjectTechnologyInsert {
    pub fn today(technology_id: i32, project_id: i32) -> Self {
        ProjectTechnologyInsert {
            added_in: chrono::Utc::now().date_naive(),
            technology_id,
            project_id,
        }
    }
}

/// A technology attached to a project, joined with the project's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyAssociation {
    pub technology_id: i32,
    pub technology_name: String,
    pub added_in: NaiveDate,
    pub project_id: i32,
    pub project_name: String,
    pub project_description: Option<String>,
    pub project_estimated_time: Option<String>,
    pub project_repository: Option<String>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_round_trips_display_names() {
        for tech in TechnologyName::ALL {
            assert_eq!(tech.to_string().parse::<TechnologyName>(), Ok(tech));
        }
        assert_eq!("Express.js".parse::<TechnologyName>(), Ok(TechnologyName::ExpressJs));
        assert!("Rust".parse::<TechnologyName>().is_err());
    }

    #[test]
    fn options_match_the_published_catalog() {
        assert_eq!(
            TechnologyName::options(),
            vec![
                "JavaScript", "Python", "React", "Express.js", "HTML",
                "CSS", "Django", "PostgreSQL", "MongoDB",
            ]
        );
    }

    #[test]
    fn attach_body_accepts_only_the_name() {
        let body: AttachTechnology = serde_json::from_str(r#"{"name":"React"}"#).unwrap();
        assert_eq!(body.name, "React");

        assert!(serde_json::from_str::<AttachTechnology>(r#"{"name":"React","addedIn":"2024-01-01"}"#).is_err());
    }
}
