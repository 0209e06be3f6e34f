//! Credential store abstraction over the two principal namespaces.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use hrms_core::records::validate_identifier;
use hrms_core::{AdminRecord, DomainError, DomainResult, EmployeeRecord, Entity};

use crate::{AuthError, AuthResult};

/// Lookup (and credential update) over administrator and employee records.
///
/// Namespaces are independent: the same identifier may exist in both.
/// Implementations may block on I/O; callers do not cache results.
pub trait CredentialStore: Send + Sync {
    fn find_admin(&self, username: &str) -> AuthResult<Option<AdminRecord>>;
    fn find_employee(&self, emp_id: &str) -> AuthResult<Option<EmployeeRecord>>;
    fn list_admins(&self) -> AuthResult<Vec<AdminRecord>>;
    fn set_admin_password_hash(&self, username: &str, hash: String) -> AuthResult<()>;
    fn set_employee_password_hash(&self, emp_id: &str, hash: String) -> AuthResult<()>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_admin(&self, username: &str) -> AuthResult<Option<AdminRecord>> {
        (**self).find_admin(username)
    }

    fn find_employee(&self, emp_id: &str) -> AuthResult<Option<EmployeeRecord>> {
        (**self).find_employee(emp_id)
    }

    fn list_admins(&self) -> AuthResult<Vec<AdminRecord>> {
        (**self).list_admins()
    }

    fn set_admin_password_hash(&self, username: &str, hash: String) -> AuthResult<()> {
        (**self).set_admin_password_hash(username, hash)
    }

    fn set_employee_password_hash(&self, emp_id: &str, hash: String) -> AuthResult<()> {
        (**self).set_employee_password_hash(emp_id, hash)
    }
}

/// In-memory credential store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    admins: RwLock<HashMap<String, AdminRecord>>,
    employees: RwLock<HashMap<String, EmployeeRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_admin(&self, record: AdminRecord) -> DomainResult<()> {
        validate_identifier(record.id())?;
        let mut admins = self
            .admins
            .write()
            .map_err(|_| DomainError::conflict("admin table lock poisoned"))?;
        if admins.contains_key(record.id()) {
            return Err(DomainError::conflict(format!("admin '{}' already exists", record.id())));
        }
        admins.insert(record.id().clone(), record);
        Ok(())
    }

    pub fn insert_employee(&self, record: EmployeeRecord) -> DomainResult<()> {
        validate_identifier(record.id())?;
        let mut employees = self
            .employees
            .write()
            .map_err(|_| DomainError::conflict("employee table lock poisoned"))?;
        if employees.contains_key(record.id()) {
            return Err(DomainError::conflict(format!(
                "employee '{}' already exists",
                record.id()
            )));
        }
        employees.insert(record.id().clone(), record);
        Ok(())
    }
}

fn poisoned(table: &str) -> AuthError {
    AuthError::store(format!("{table} table lock poisoned"))
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_admin(&self, username: &str) -> AuthResult<Option<AdminRecord>> {
        let admins = self.admins.read().map_err(|_| poisoned("admin"))?;
        Ok(admins.get(username).cloned())
    }

    fn find_employee(&self, emp_id: &str) -> AuthResult<Option<EmployeeRecord>> {
        let employees = self.employees.read().map_err(|_| poisoned("employee"))?;
        Ok(employees.get(emp_id).cloned())
    }

    fn list_admins(&self) -> AuthResult<Vec<AdminRecord>> {
        let admins = self.admins.read().map_err(|_| poisoned("admin"))?;
        let mut list: Vec<AdminRecord> = admins.values().cloned().collect();
        list.sort_by_key(|a| a.id);
        Ok(list)
    }

    fn set_admin_password_hash(&self, username: &str, hash: String) -> AuthResult<()> {
        let mut admins = self.admins.write().map_err(|_| poisoned("admin"))?;
        let admin = admins.get_mut(username).ok_or(AuthError::NotFound)?;
        admin.password_hash = hash;
        Ok(())
    }

    fn set_employee_password_hash(&self, emp_id: &str, hash: String) -> AuthResult<()> {
        let mut employees = self.employees.write().map_err(|_| poisoned("employee"))?;
        let employee = employees.get_mut(emp_id).ok_or(AuthError::NotFound)?;
        employee.password_hash = hash;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_independent() {
        let store = InMemoryCredentialStore::new();
        store.insert_admin(AdminRecord::new(1, "shared", "a-hash")).unwrap();
        store
            .insert_employee(EmployeeRecord::new(1, "shared", "Sam", "e-hash"))
            .unwrap();

        assert_eq!(store.find_admin("shared").unwrap().unwrap().password_hash, "a-hash");
        assert_eq!(store.find_employee("shared").unwrap().unwrap().password_hash, "e-hash");
        assert!(store.find_admin("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_identifier_in_same_namespace_conflicts() {
        let store = InMemoryCredentialStore::new();
        store.insert_employee(EmployeeRecord::new(1, "E1001", "Alice", "h")).unwrap();

        let err = store
            .insert_employee(EmployeeRecord::new(2, "E1001", "Alicia", "h"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let store = InMemoryCredentialStore::new();
        let err = store.insert_admin(AdminRecord::new(1, "", "h")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn password_hash_update() {
        let store = InMemoryCredentialStore::new();
        store.insert_admin(AdminRecord::new(1, "admin1", "old")).unwrap();

        store.set_admin_password_hash("admin1", "new".to_string()).unwrap();
        assert_eq!(store.find_admin("admin1").unwrap().unwrap().password_hash, "new");

        assert_eq!(
            store.set_employee_password_hash("E404", "x".to_string()),
            Err(AuthError::NotFound)
        );
    }

    #[test]
    fn admins_listed_in_id_order() {
        let store = InMemoryCredentialStore::new();
        store.insert_admin(AdminRecord::new(2, "second", "h")).unwrap();
        store.insert_admin(AdminRecord::new(1, "first", "h")).unwrap();

        let names: Vec<String> = store.list_admins().unwrap().into_iter().map(|a| a.username).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
