use serde::Serialize;

use hrms_core::{AdminRecord, EmployeeRecord};

use crate::Role;

/// Which namespace a principal was resolved from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Admin,
    Employee,
}

/// An identity that can authenticate: one of two disjoint record kinds.
///
/// Serializes to the wrapped record's public-facing shape (no credential hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Principal {
    Admin(AdminRecord),
    Employee(EmployeeRecord),
}

impl Principal {
    /// Login identifier: admin username or employee number.
    pub fn identifier(&self) -> &str {
        match self {
            Principal::Admin(admin) => &admin.username,
            Principal::Employee(employee) => &employee.emp_id,
        }
    }

    /// Effective role. Administrators are ADMIN regardless of the stored tag;
    /// employees carry whatever their record says.
    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(_) => Role::ADMIN,
            Principal::Employee(employee) => Role::new(employee.role.clone()),
        }
    }

    pub fn credential_hash(&self) -> &str {
        match self {
            Principal::Admin(admin) => &admin.password_hash,
            Principal::Employee(employee) => &employee.password_hash,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Admin(_) => PrincipalKind::Admin,
            Principal::Employee(_) => PrincipalKind::Employee,
        }
    }
}

/// Request-scoped authentication result.
///
/// Lives exactly as long as one request; never persisted or shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationContext {
    principal: Principal,
    roles: Vec<Role>,
}

impl AuthenticationContext {
    pub fn new(principal: Principal) -> Self {
        let roles = vec![principal.role()];
        Self { principal, roles }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn identifier(&self) -> &str {
        self.principal.identifier()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_ignores_stored_tag() {
        let mut record = AdminRecord::new(1, "root", "hash");
        record.role = "EMPLOYEE".to_string();

        let principal = Principal::Admin(record);
        assert_eq!(principal.role(), Role::ADMIN);
        assert_eq!(principal.identifier(), "root");
        assert_eq!(principal.kind(), PrincipalKind::Admin);
    }

    #[test]
    fn employee_role_is_taken_from_record() {
        let record = EmployeeRecord::new(1, "E1001", "Alice", "hash").with_role("MANAGER");
        let principal = Principal::Employee(record);

        assert_eq!(principal.role(), Role::new("MANAGER"));
        assert_eq!(principal.credential_hash(), "hash");
    }

    #[test]
    fn context_grants_principal_role() {
        let principal = Principal::Employee(EmployeeRecord::new(1, "E1001", "Alice", "hash"));
        let ctx = AuthenticationContext::new(principal);

        assert_eq!(ctx.identifier(), "E1001");
        assert!(ctx.has_role(&Role::EMPLOYEE));
        assert!(!ctx.has_role(&Role::ADMIN));
        assert!(ctx.has_any_role(&[Role::ADMIN, Role::EMPLOYEE]));
    }
}
