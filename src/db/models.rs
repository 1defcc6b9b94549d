//! Domain models for the job board stores.
//!
//! These models are storage-agnostic. Stored scalars that may be NULL in
//! the database are exposed as plain values: an absent column reads back
//! as the type's zero value (empty string, `0`, the Unix epoch).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Database-generated integer identity.
pub type Id = i64;

// =============================================================================
// Applicants
// =============================================================================

/// A job seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: Id,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub city_id: Id,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub status: ApplicantStatus,
    pub quote: String,
    pub vk: String,
    pub telegram: String,
    pub facebook: String,
    pub avatar_id: Id,
    #[serde(skip)]
    pub password_hash: Vec<u8>,
    #[serde(skip)]
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register an applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicant {
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update of an applicant. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub city_id: Option<Id>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub status: Option<ApplicantStatus>,
    pub quote: Option<String>,
    pub vk: Option<String>,
    pub telegram: Option<String>,
    pub facebook: Option<String>,
    pub avatar_id: Option<Id>,
    pub password_hash: Option<Vec<u8>>,
    pub password_salt: Option<Vec<u8>>,
}

/// Job search status shown on an applicant's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    #[default]
    ActivelySearching,
    ConsideringOffers,
    StartingSoon,
    NotSearching,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::ActivelySearching => "actively_searching",
            ApplicantStatus::ConsideringOffers => "considering_offers",
            ApplicantStatus::StartingSoon => "starting_soon",
            ApplicantStatus::NotSearching => "not_searching",
        }
    }
}

impl std::fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actively_searching" => Ok(ApplicantStatus::ActivelySearching),
            "considering_offers" => Ok(ApplicantStatus::ConsideringOffers),
            "starting_soon" => Ok(ApplicantStatus::StartingSoon),
            "not_searching" => Ok(ApplicantStatus::NotSearching),
            _ => Err(format!("Invalid applicant status: {}", s)),
        }
    }
}

// =============================================================================
// Employers
// =============================================================================

/// A company posting vacancies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub id: Id,
    pub email: String,
    pub company_name: String,
    pub legal_address: String,
    pub slogan: String,
    pub website: String,
    pub description: String,
    pub vk: String,
    pub telegram: String,
    pub facebook: String,
    pub logo_id: Id,
    #[serde(skip)]
    pub password_hash: Vec<u8>,
    #[serde(skip)]
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register an employer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployer {
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub company_name: String,
    pub legal_address: String,
}

/// Partial update of an employer. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployerPatch {
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub legal_address: Option<String>,
    pub slogan: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub vk: Option<String>,
    pub telegram: Option<String>,
    pub facebook: Option<String>,
    pub logo_id: Option<Id>,
    pub password_hash: Option<Vec<u8>>,
    pub password_salt: Option<Vec<u8>>,
}

// =============================================================================
// Notifications
// =============================================================================

/// What happened: an applicant applied to a vacancy, or an employer
/// downloaded an applicant's resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Apply,
    DownloadResume,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Apply => "apply",
            NotificationType::DownloadResume => "download_resume",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply" => Ok(NotificationType::Apply),
            "download_resume" => Ok(NotificationType::DownloadResume),
            _ => Err(format!("Invalid notification type: {}", s)),
        }
    }
}

/// Kind of user on either end of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Applicant,
    Employer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Applicant => "applicant",
            UserRole::Employer => "employer",
        }
    }

    /// Notification type that lands in this role's inbox.
    pub fn inbox_type(&self) -> NotificationType {
        match self {
            UserRole::Applicant => NotificationType::DownloadResume,
            UserRole::Employer => NotificationType::Apply,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    /// Exact, case-sensitive match on the two known roles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applicant" => Ok(UserRole::Applicant),
            "employer" => Ok(UserRole::Employer),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Id,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub sender_id: Id,
    pub sender_role: UserRole,
    pub receiver_id: Id,
    pub receiver_role: UserRole,
    /// Vacancy id for `apply`, resume id for `download_resume`.
    pub object_id: Id,
    pub resume_id: Id,
    pub is_viewed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a notification. New notifications are unviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub sender_id: Id,
    pub sender_role: UserRole,
    pub receiver_id: Id,
    pub receiver_role: UserRole,
    pub object_id: Id,
    pub resume_id: Option<Id>,
}

/// Notification joined with display names, as shown in an inbox.
///
/// Not stored; the extra fields are resolved at read time and are empty
/// when the referenced row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreview {
    pub id: Id,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub sender_id: Id,
    pub receiver_id: Id,
    pub object_id: Id,
    pub resume_id: Id,
    pub applicant_name: String,
    pub employer_name: String,
    pub title: String,
    pub is_viewed: bool,
    pub created_at: DateTime<Utc>,
}
