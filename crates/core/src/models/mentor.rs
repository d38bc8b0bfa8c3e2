use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorStatus {
    Active,
    Inactive,
}

impl MentorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorStatus::Active => "active",
            MentorStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for MentorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentorStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MentorStatus::Active),
            "inactive" => Ok(MentorStatus::Inactive),
            other => Err(SyncError::Invalid(format!("Unknown mentor status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub status: MentorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMentorRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: i32,
}
