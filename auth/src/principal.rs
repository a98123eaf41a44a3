use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Role carried by every identity and every token.
///
/// Closed set; checks match exactly, `Admin` does not imply `Staff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role '{0}': expected 'admin' or 'staff'")]
pub struct RoleError(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(RoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified identity extracted from an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub identity_id: Uuid,
    pub tenant_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn new(identity_id: Uuid, tenant_id: i64, role: Role) -> Self {
        Self {
            identity_id,
            tenant_id,
            role,
        }
    }

    /// Whether the principal's role is one of `allowed`.
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("staff".parse::<Role>(), Ok(Role::Staff));
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("yetkili".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_has_any_role_is_exact() {
        let admin = Principal::new(Uuid::new_v4(), 1, Role::Admin);
        assert!(admin.has_any_role(&[Role::Admin]));
        assert!(admin.has_any_role(&[Role::Staff, Role::Admin]));
        assert!(!admin.has_any_role(&[Role::Staff]));
        assert!(!admin.has_any_role(&[]));
    }
}
