use std::sync::Arc;

use crate::{AuthError, AuthResult, CredentialStore, Principal};

/// Maps a login identifier to a principal across both namespaces.
///
/// Lookup order is fixed: administrators first, then employees. An identifier
/// present in both namespaces always resolves to the administrator.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn CredentialStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Resolve `identifier` against live store state.
    ///
    /// Fails with [`AuthError::NotFound`] when neither namespace knows it and
    /// propagates [`AuthError::StoreUnavailable`] from the store.
    pub fn resolve(&self, identifier: &str) -> AuthResult<Principal> {
        if let Some(admin) = self.store.find_admin(identifier)? {
            return Ok(Principal::Admin(admin));
        }
        if let Some(employee) = self.store.find_employee(identifier)? {
            return Ok(Principal::Employee(employee));
        }
        Err(AuthError::NotFound)
    }
}

impl core::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}
