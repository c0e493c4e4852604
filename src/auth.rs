use crate::error::{Error, Result};
use crate::language::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// An authenticated user as handed to us by the identity provider. The id is
/// opaque; the chat core never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub preferred_language: Language,
}

/// Seam for the external identity service.
///
/// A `ChatSession` can only be constructed from a `Principal`, and a
/// `Principal` only comes out of a successful sign-in, so authentication
/// failures prevent session construction by construction.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and its language profile.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        preferred_language: Language,
    ) -> Result<Principal>;

    /// Authenticate with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal>;
}

struct Account {
    principal: Principal,
    password: String,
}

/// In-memory identity provider, standing in for the managed auth service the
/// deployed system delegates to. Accounts live only as long as the process.
#[derive(Default)]
pub struct LocalIdentity {
    accounts: Mutex<HashMap<String, Account>>,
}

impl LocalIdentity {
    const MIN_PASSWORD_LEN: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    fn validate_credentials(email: &str, password: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Authentication(format!(
                "Invalid email address: {}",
                email
            )));
        }
        if password.len() < Self::MIN_PASSWORD_LEN {
            return Err(Error::Authentication(format!(
                "Password should be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        preferred_language: Language,
    ) -> Result<Principal> {
        Self::validate_credentials(email, password)?;
        let email = email.trim().to_lowercase();

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&email) {
            return Err(Error::Authentication(
                "User already registered".to_string(),
            ));
        }

        let principal = Principal {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            preferred_language,
        };
        accounts.insert(
            email,
            Account {
                principal: principal.clone(),
                password: password.to_string(),
            },
        );

        Ok(principal)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal> {
        let email = email.trim().to_lowercase();
        let accounts = self.accounts.lock().unwrap();

        // Same error for unknown email and wrong password, so sign-in does
        // not leak which accounts exist.
        match accounts.get(&email) {
            Some(account) if account.password == password => Ok(account.principal.clone()),
            _ => Err(Error::Authentication(
                "Invalid login credentials".to_string(),
            )),
        }
    }
}
