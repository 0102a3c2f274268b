use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::domain::verification::manual_verification::VerificationStatus;

#[derive(Serialize, ToSchema)]
pub struct VerificationStatusResponse {
    /// Latest request status; `null` when the user never filed one.
    pub status: Option<VerificationStatus>,
}
