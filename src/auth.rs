//! Sign-in and registration.
//!
//! [`IdentityProvider`] is the seam for a real identity service.  The only
//! implementation shipped here is [`DemoIdentity`], a stand-in for demos.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::observability::{AUTH_FAILURES, AUTH_SIGN_INS, AUTH_SIGN_UPS};
use crate::types::{Role, SignUp, User};

/// Simulated round trip of the demo provider.
pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(800);

/// Message shown for any rejected credentials.
pub const ACCESS_DENIED: &str = "Access Denied: Invalid Credentials";

/// Something that can authenticate users.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    /// Register a new account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;
}

/// Credentials that the demo provider treats as the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAdmin {
    /// Administrator email.
    pub email: String,
    /// Administrator password.
    pub password: String,
}

/// Demo identity provider.
///
/// This is NOT a security boundary.  It checks only that the email looks like
/// an address and the password is non-empty, then fabricates a user: the
/// configured [`DemoAdmin`] pair (if any) gets [`Role::Admin`], every other
/// pair gets [`Role::Member`].  Registration always reports that confirmation
/// is required and never starts a session.  Replace it with a real
/// [`IdentityProvider`] before handling real accounts.
#[derive(Debug, Clone)]
pub struct DemoIdentity {
    latency: Duration,
    admin: Option<DemoAdmin>,
}

impl DemoIdentity {
    /// Create a demo provider with the default latency and no administrator.
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_AUTH_LATENCY,
            admin: None,
        }
    }

    /// Set the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the administrator credentials.
    pub fn with_admin(mut self, admin: Option<DemoAdmin>) -> Self {
        self.admin = admin;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn is_admin(&self, email: &str, password: &str) -> bool {
        self.admin
            .as_ref()
            .is_some_and(|admin| admin.email.eq_ignore_ascii_case(email) && admin.password == password)
    }
}

impl Default for DemoIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for DemoIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        self.simulate_latency().await;
        let email = check_credentials(email, password)?;
        AUTH_SIGN_INS.click();
        let (prefix, role) = if self.is_admin(email, password) {
            ("admin", Role::Admin)
        } else {
            ("user", Role::Member)
        };
        tracing::debug!(email, %role, "demo sign-in");
        Ok(User {
            id: fabricated_id(prefix),
            email: email.to_string(),
            role,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp> {
        self.simulate_latency().await;
        let email = check_credentials(email, password)?;
        AUTH_SIGN_UPS.click();
        tracing::debug!(email, "demo sign-up");
        Ok(SignUp {
            user: User {
                id: fabricated_id("new-user"),
                email: email.to_string(),
                role: Role::Member,
            },
            confirmation_required: true,
        })
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}

fn check_credentials<'a>(email: &'a str, password: &str) -> Result<&'a str> {
    let email = email.trim();
    let looks_like_address = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !looks_like_address || password.is_empty() {
        AUTH_FAILURES.click();
        return Err(Error::authentication(ACCESS_DENIED));
    }
    Ok(email)
}

fn fabricated_id(prefix: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{prefix}-{millis}")
}
