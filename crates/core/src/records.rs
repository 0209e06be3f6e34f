//! Principal records as held by the credential store.
//!
//! Both record kinds serialize to their public-facing shape: the credential
//! hash is never written out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Entity};

/// Administrator account. Logs in with `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Stored role tag. Informational only: administrators always resolve to ADMIN.
    pub role: String,
}

impl AdminRecord {
    pub fn new(id: i64, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role: "ADMIN".to_string(),
        }
    }
}

impl Entity for AdminRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.username
    }
}

/// Employee record. The employee number doubles as the login name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: i64,
    pub emp_id: String,
    pub name: String,
    pub dept: String,
    pub pos: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Stored role tag, taken verbatim during identity resolution.
    pub role: String,
    pub entry_time: Option<NaiveDate>,
    pub status: String,
}

impl EmployeeRecord {
    pub fn new(
        id: i64,
        emp_id: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            emp_id: emp_id.into(),
            name: name.into(),
            dept: String::new(),
            pos: String::new(),
            password_hash: password_hash.into(),
            role: "EMPLOYEE".to_string(),
            entry_time: None,
            status: "active".to_string(),
        }
    }

    pub fn with_department(mut self, dept: impl Into<String>, pos: impl Into<String>) -> Self {
        self.dept = dept.into();
        self.pos = pos.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl Entity for EmployeeRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.emp_id
    }
}

/// Reject identifiers that can never be used to log in.
pub fn validate_identifier(identifier: &str) -> DomainResult<()> {
    if identifier.is_empty() {
        return Err(DomainError::validation("identifier must not be empty"));
    }
    if identifier.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("identifier must not contain whitespace"));
    }
    Ok(())
}
