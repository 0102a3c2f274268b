use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::role::RoleType;

pub const DEFAULT_SESSION_DURATION: chrono::Duration = chrono::Duration::hours(1);

/// Claims cached from the identity provider at session-exchange time.
/// Role and verified flag are refreshed in place when an admin changes
/// them, so gates never act on stale claims.
#[derive(Debug, Clone, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub identity_user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub role: RoleType,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<Utc>,
    pub expires_at: chrono::DateTime<Utc>,
}

impl Session {
    pub fn is_unexpired(&self) -> bool {
        let now = Utc::now();

        self.created_at < now && self.expires_at > now
    }

    pub fn get_user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn get_identity_user_id(&self) -> &str {
        &self.identity_user_id
    }

    pub fn get_user_name(&self) -> &str {
        &self.user_name
    }

    pub fn get_user_email(&self) -> &str {
        &self.user_email
    }

    pub fn get_role(&self) -> RoleType {
        self.role
    }

    pub fn get_is_verified(&self) -> bool {
        self.is_verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(created_offset_secs: i64, expires_offset_secs: i64) -> Session {
        let now = Utc::now();
        Session {
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            identity_user_id: "idn_1".to_string(),
            user_name: "Li Hua".to_string(),
            user_email: "li.hua@hsefz.cn".to_string(),
            role: RoleType::User,
            is_verified: true,
            created_at: now + chrono::Duration::seconds(created_offset_secs),
            expires_at: now + chrono::Duration::seconds(expires_offset_secs),
        }
    }

    #[test]
    fn live_sessions_are_unexpired() {
        assert!(session(-10, 3600).is_unexpired());
    }

    #[test]
    fn expired_and_future_sessions_are_rejected() {
        assert!(!session(-7200, -3600).is_unexpired());
        // A session "created in the future" is as invalid as an expired one.
        assert!(!session(60, 3600).is_unexpired());
    }
}
