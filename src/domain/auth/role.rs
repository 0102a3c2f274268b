use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

/// Role carried in the identity provider's public metadata and mirrored
/// into the local `users.user_role` column. Superadmin is seeded out of
/// band and is never assignable through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    User,
    Admin,
    SuperAdmin,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::User => "user",
            RoleType::Admin => "admin",
            RoleType::SuperAdmin => "superadmin",
        }
    }

    /// Announcement publishing and the moderation surfaces are open to
    /// both admin tiers.
    pub fn is_admin(&self) -> bool {
        matches!(self, RoleType::Admin | RoleType::SuperAdmin)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, RoleType::SuperAdmin)
    }

    /// Roles an admin is allowed to hand out.
    pub fn is_assignable(&self) -> bool {
        matches!(self, RoleType::User | RoleType::Admin)
    }
}

impl FromStr for RoleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(RoleType::User),
            "admin" => Ok(RoleType::Admin),
            "superadmin" => Ok(RoleType::SuperAdmin),
            other => Err(anyhow::anyhow!("Unknown role: {other}")),
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roles_case_insensitively() {
        assert_eq!("user".parse::<RoleType>().unwrap(), RoleType::User);
        assert_eq!("Admin".parse::<RoleType>().unwrap(), RoleType::Admin);
        assert_eq!(
            "SUPERADMIN".parse::<RoleType>().unwrap(),
            RoleType::SuperAdmin
        );
        assert!("moderator".parse::<RoleType>().is_err());
    }

    #[test]
    fn admin_gates_cover_both_tiers() {
        assert!(!RoleType::User.is_admin());
        assert!(RoleType::Admin.is_admin());
        assert!(RoleType::SuperAdmin.is_admin());
        assert!(RoleType::SuperAdmin.is_superadmin());
        assert!(!RoleType::Admin.is_superadmin());
    }

    #[test]
    fn superadmin_is_not_assignable() {
        assert!(RoleType::User.is_assignable());
        assert!(RoleType::Admin.is_assignable());
        assert!(!RoleType::SuperAdmin.is_assignable());
    }

    #[test]
    fn round_trips_through_as_str() {
        for role in [RoleType::User, RoleType::Admin, RoleType::SuperAdmin] {
            assert_eq!(role.as_str().parse::<RoleType>().unwrap(), role);
        }
    }
}
