use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::manual_verifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    /// pending -> {approved, rejected}; terminal states never revert.
    pub fn can_transition_to(&self, next: VerificationStatus) -> bool {
        matches!(
            (self, next),
            (
                VerificationStatus::Pending,
                VerificationStatus::Approved | VerificationStatus::Rejected
            )
        )
    }
}

impl FromStr for VerificationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(VerificationStatus::Pending),
            "approved" => Ok(VerificationStatus::Approved),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(anyhow::anyhow!("Unknown verification status: {other}")),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = manual_verifications)]
pub struct ManualVerification {
    pub manual_verification_id: Uuid,
    pub user_id: Uuid,
    pub identity_user_id: String,
    pub manual_verification_details: String,
    pub manual_verification_image_url: Option<String>,
    pub manual_verification_requested_email: Option<String>,
    pub manual_verification_status: String,
    pub manual_verification_created_at: DateTime<Utc>,
    pub manual_verification_decided_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = manual_verifications)]
pub struct NewManualVerification<'nv> {
    user_id: &'nv Uuid,
    identity_user_id: &'nv str,
    manual_verification_details: &'nv str,
    manual_verification_image_url: Option<&'nv str>,
    manual_verification_requested_email: Option<&'nv str>,
    manual_verification_status: &'nv str,
    manual_verification_decided_at: Option<DateTime<Utc>>,
}

impl<'nv> NewManualVerification<'nv> {
    pub fn pending(
        user_id: &'nv Uuid,
        identity_user_id: &'nv str,
        details: &'nv str,
        image_url: &'nv str,
        requested_email: &'nv str,
    ) -> Self {
        Self {
            user_id,
            identity_user_id,
            manual_verification_details: details,
            manual_verification_image_url: Some(image_url),
            manual_verification_requested_email: Some(requested_email),
            manual_verification_status: VerificationStatus::Pending.as_str(),
            manual_verification_decided_at: None,
        }
    }

    /// Roster-matched verifications skip the queue but still leave an
    /// audit row behind.
    pub fn auto_approved(
        user_id: &'nv Uuid,
        identity_user_id: &'nv str,
        details: &'nv str,
        requested_email: &'nv str,
    ) -> Self {
        Self {
            user_id,
            identity_user_id,
            manual_verification_details: details,
            manual_verification_image_url: None,
            manual_verification_requested_email: Some(requested_email),
            manual_verification_status: VerificationStatus::Approved.as_str(),
            manual_verification_decided_at: Some(Utc::now()),
        }
    }
}

/// details_text composition shared by the manual and auto flows.
pub fn compose_details(real_name: &str, class_number: Option<&str>) -> String {
    match class_number {
        Some(class_number) => format!("Name: {real_name}, Class: {class_number}"),
        None => format!("Name: {real_name} (roster match)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions_to_both_terminal_states() {
        assert!(VerificationStatus::Pending.can_transition_to(VerificationStatus::Approved));
        assert!(VerificationStatus::Pending.can_transition_to(VerificationStatus::Rejected));
    }

    #[test]
    fn terminal_states_never_revert() {
        for terminal in [VerificationStatus::Approved, VerificationStatus::Rejected] {
            assert!(!terminal.can_transition_to(VerificationStatus::Pending));
            assert!(!terminal.can_transition_to(VerificationStatus::Approved));
            assert!(!terminal.can_transition_to(VerificationStatus::Rejected));
        }
    }

    #[test]
    fn details_mention_the_class_when_present() {
        assert_eq!(
            compose_details("Li Hua", Some("2501")),
            "Name: Li Hua, Class: 2501"
        );
        assert_eq!(compose_details("Li Hua", None), "Name: Li Hua (roster match)");
    }
}
