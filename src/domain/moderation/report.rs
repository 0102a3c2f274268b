use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::reports;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    /// Only a pending report may be decided, and a decision is final.
    pub fn is_valid_resolution(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }
}

impl FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(anyhow::anyhow!("Unknown report status: {other}")),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = reports)]
pub struct Report {
    pub report_id: Uuid,
    pub reporter_user_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub report_reason: String,
    pub report_status: String,
    pub report_created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = reports)]
pub struct NewReport<'nr> {
    reporter_user_id: &'nr Uuid,
    post_id: Option<&'nr Uuid>,
    comment_id: Option<&'nr Uuid>,
    report_reason: &'nr str,
}

impl<'nr> NewReport<'nr> {
    pub fn for_post(reporter_user_id: &'nr Uuid, post_id: &'nr Uuid, reason: &'nr str) -> Self {
        Self {
            reporter_user_id,
            post_id: Some(post_id),
            comment_id: None,
            report_reason: reason,
        }
    }

    pub fn for_comment(
        reporter_user_id: &'nr Uuid,
        comment_id: &'nr Uuid,
        reason: &'nr str,
    ) -> Self {
        Self {
            reporter_user_id,
            post_id: None,
            comment_id: Some(comment_id),
            report_reason: reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statuses() {
        assert_eq!(
            "pending".parse::<ReportStatus>().unwrap(),
            ReportStatus::Pending
        );
        assert_eq!(
            "Resolved".parse::<ReportStatus>().unwrap(),
            ReportStatus::Resolved
        );
        assert!("open".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn pending_is_not_a_resolution() {
        assert!(!ReportStatus::Pending.is_valid_resolution());
        assert!(ReportStatus::Resolved.is_valid_resolution());
        assert!(ReportStatus::Dismissed.is_valid_resolution());
    }
}
