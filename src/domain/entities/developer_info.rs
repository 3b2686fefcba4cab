use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperatingSystem {
    #[display("Windows")]
    Windows,
    #[display("Linux")]
    Linux,
    #[display("MacOS")]
    MacOS,
}

impl OperatingSystem {
    pub const ALL: [OperatingSystem; 3] = [
        OperatingSystem::Windows,
        OperatingSystem::Linux,
        OperatingSystem::MacOS,
    ];

    /// Catalog names, in the order clients see them in error payloads.
    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(ToString::to_string).collect()
    }
}

impl FromStr for OperatingSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|os| os.to_string() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperInfo {
    pub id: i32,
    pub developer_since: NaiveDate,
    #[serde(rename = "preferredOS")]
    pub preferred_os: String,
    pub developer_id: i32,
}

/// Request body. `preferredOS` stays a raw string so an unknown value can be
/// answered with the list of accepted ones instead of a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDeveloperInfo {
    pub developer_since: NaiveDate,
    #[serde(rename = "preferredOS")]
    pub preferred_os: String,
}

impl NewDeveloperInfo {
    pub fn preferred_os(&self) -> Option<OperatingSystem> {
        self.preferred_os.parse().ok()
    }

    pub fn prepare_for_insert(&self, developer_id: i32, preferred_os: OperatingSystem) -> DeveloperInfoInsert {
        DeveloperInfoInsert {
            developer_id,
            developer_since: self.developer_since,
            preferred_os,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperInfoInsert {
    pub developer_id: i32,
    pub developer_since: NaiveDate,
    pub preferred_os: OperatingSystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_names_exactly() {
        assert_eq!("MacOS".parse::<OperatingSystem>(), Ok(OperatingSystem::MacOS));
        assert!("macos".parse::<OperatingSystem>().is_err());
        assert!("BeOS".parse::<OperatingSystem>().is_err());
    }

    #[test]
    fn options_are_listed_in_catalog_order() {
        assert_eq!(OperatingSystem::options(), vec!["Windows", "Linux", "MacOS"]);
    }

    #[test]
    fn request_uses_camel_case_keys() {
        let body = r#"{"developerSince":"2020-01-15","preferredOS":"Linux"}"#;
        let info: NewDeveloperInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.developer_since, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert_eq!(info.preferred_os(), Some(OperatingSystem::Linux));
    }
}
