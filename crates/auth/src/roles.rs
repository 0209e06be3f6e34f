use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role tag attached to a principal.
///
/// Roles are opaque, case-sensitive strings. Administrators are always
/// [`Role::ADMIN`]; employee roles come verbatim from the stored record, so
/// values other than the two well-known ones can exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const EMPLOYEE: Role = Role(Cow::Borrowed("EMPLOYEE"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Client-facing spelling (`"admin"`, `"employee"`).
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_roles_compare_by_value() {
        assert_eq!(Role::new("ADMIN"), Role::ADMIN);
        assert_eq!(Role::new(String::from("EMPLOYEE")), Role::EMPLOYEE);
        assert_ne!(Role::new("admin"), Role::ADMIN);
        assert_eq!(Role::ADMIN.to_lowercase(), "admin");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::EMPLOYEE).unwrap();
        assert_eq!(json, "\"EMPLOYEE\"");
        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role.as_str(), "MANAGER");
    }
}
