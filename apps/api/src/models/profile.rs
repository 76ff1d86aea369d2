use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student's published directory entry.
/// `id` always equals the auth identity id of the owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub department: String,
    pub year_of_study: YearOfStudy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    /// Absent when the row arrives through a nested projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the profiles table.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub full_name: String,
    pub department: String,
    pub year_of_study: YearOfStudy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl NewProfile {
    /// The profile as it will exist after a successful insert.
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            full_name: self.full_name,
            department: self.department,
            year_of_study: self.year_of_study,
            bio: self.bio,
            email: self.email,
            phone: self.phone,
            linkedin_url: self.linkedin_url,
            created_at: None,
        }
    }
}

/// The six study-year literals accepted by the profiles table enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearOfStudy {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
    Masters,
    PhD,
}
