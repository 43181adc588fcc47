//! Account flows: login, registration, profile and status updates.

use crate::{AuthError, PasswordHasher, Session, SessionStore};
use anihan_market::store::UserStore;
use anihan_market::user::{NewUser, Role, User, UserPatch, VendorStatus};
use anihan_market::{timestamp, MarketError, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A signed-in (or just registered) account and its bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: User,
    /// Absent for registrations that still need approval.
    pub token: Option<String>,
}

/// Self-registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub business_license: String,
    #[serde(default)]
    pub years_in_business: String,
}

/// An account update carrying an optional plain-text password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(flatten)]
    pub patch: UserPatch,
}

/// Authenticates requests and runs the account flows.
#[derive(Debug, Clone)]
pub struct Authenticator {
    users: UserStore,
    sessions: SessionStore,
    hasher: PasswordHasher,
}

impl Authenticator {
    pub fn new(users: UserStore, sessions: SessionStore) -> Self {
        Self {
            users,
            sessions,
            hasher: PasswordHasher::default(),
        }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Verify credentials and start a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        let session = self.sessions.issue(&user)?;
        info!(user_id = %user.id, role = %user.role, "user logged in");
        Ok(LoginResult {
            user,
            token: Some(session.token),
        })
    }

    /// Create an account. Consumers are active and signed in immediately;
    /// every other role waits for an administrator, vendors with a pending
    /// application.
    pub async fn register(&self, registration: Registration) -> Result<LoginResult, AuthError> {
        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(MarketError::DuplicateEmail(registration.email).into());
        }

        let role = registration.role;
        let active = role.active_on_registration();
        let user = self
            .users
            .create(NewUser {
                email: registration.email,
                password_hash: self.hasher.hash(&registration.password)?,
                full_name: registration.full_name,
                role,
                phone: registration.phone,
                address: registration.address,
                is_active: Some(active),
                vendor_status: (role == Role::Vendor).then_some(VendorStatus::Pending),
                business_name: registration.business_name,
                business_type: registration.business_type,
                business_license: registration.business_license,
                years_in_business: registration.years_in_business,
                ..Default::default()
            })
            .await?;

        let token = if active {
            Some(self.sessions.issue(&user)?.token)
        } else {
            None
        };
        info!(user_id = %user.id, role = %role, active, "user registered");
        Ok(LoginResult { user, token })
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NotAuthenticated)?;
        let session = self.sessions.resolve(token)?;

        match self.users.find_by_id(session.user_id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(AuthError::AccountInactive),
            None => {
                self.sessions.revoke(token)?;
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Check that `user` has at least `required` privileges.
    pub fn require_role(&self, user: &User, required: Role) -> Result<(), AuthError> {
        if user.role.includes(required) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// End a session.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.revoke(token)
    }

    /// Update one's own profile. Role, activation and approval fields are ignored.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        let patch = self.with_password(update)?.self_service();
        Ok(self.users.update(user_id, patch).await?)
    }

    /// Update any field of an account.
    pub async fn update_user(&self, id: UserId, update: ProfileUpdate) -> Result<User, AuthError> {
        let patch = self.with_password(update)?;
        let deactivated = patch.is_active == Some(false);
        let user = self.users.update(id, patch).await?;
        if deactivated {
            self.sessions.revoke_user(id)?;
        }
        Ok(user)
    }

    /// Activate, deactivate or review an account. Approving a vendor stamps
    /// `approved_at` when not supplied; deactivating ends its sessions.
    pub async fn update_status(&self, id: UserId, update: UserPatch) -> Result<User, AuthError> {
        let approved_at = match (update.vendor_status, update.approved_at) {
            (Some(VendorStatus::Approved), None) => Some(timestamp()),
            (_, approved_at) => approved_at,
        };
        let patch = UserPatch {
            is_active: update.is_active,
            vendor_status: update.vendor_status,
            approval_notes: update.approval_notes,
            approved_by: update.approved_by,
            approved_at,
            ..Default::default()
        };

        let deactivated = patch.is_active == Some(false);
        let user = self.users.update(id, patch).await?;
        if deactivated {
            let revoked = self.sessions.revoke_user(id)?;
            info!(user_id = %id, revoked, "account deactivated");
        }
        Ok(user)
    }

    /// Delete an account and its sessions.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        self.users.delete(id).await?;
        self.sessions.revoke_user(id)?;
        Ok(())
    }

    /// Start a session for `user` without a password check.
    pub fn issue(&self, user: &User) -> Result<Session, AuthError> {
        self.sessions.issue(user)
    }

    fn with_password(&self, update: ProfileUpdate) -> Result<UserPatch, AuthError> {
        let mut patch = update.patch;
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            patch.password_hash = Some(self.hasher.hash(&password)?);
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anihan_cache::Cache;
    use anihan_db::Db;

    async fn authenticator() -> Authenticator {
        let db = Db::open_in_memory().await.unwrap();
        Authenticator::new(UserStore::new(db), SessionStore::new(Cache::in_memory()))
    }

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            email: email.into(),
            password: "secret123".into(),
            full_name: "Pedro Garcia".into(),
            role,
            phone: String::new(),
            address: "Quezon City".into(),
            business_name: String::new(),
            business_type: String::new(),
            business_license: String::new(),
            years_in_business: String::new(),
        }
    }

    #[tokio::test]
    async fn test_consumer_registration_signs_in() {
        let auth = authenticator().await;
        let result = auth
            .register(registration("user@anihan.com", Role::User))
            .await
            .unwrap();
        assert!(result.user.is_active);
        let token = result.token.unwrap();

        let me = auth.authenticate(Some(&token)).await.unwrap();
        assert_eq!(me.id, result.user.id);

        let login = auth.login("user@anihan.com", "secret123").await.unwrap();
        assert!(login.token.is_some());
    }

    #[tokio::test]
    async fn test_vendor_registration_waits_for_approval() {
        let auth = authenticator().await;
        let result = auth
            .register(registration("vendor@anihan.com", Role::Vendor))
            .await
            .unwrap();
        assert!(!result.user.is_active);
        assert_eq!(result.user.vendor_status, Some(VendorStatus::Pending));
        assert!(result.token.is_none());

        assert!(matches!(
            auth.login("vendor@anihan.com", "secret123").await,
            Err(AuthError::AccountInactive)
        ));

        let approved = auth
            .update_status(
                result.user.id,
                UserPatch {
                    is_active: Some(true),
                    vendor_status: Some(VendorStatus::Approved),
                    approved_by: Some("admin@anihan.com".into()),
                    // ignored by status updates
                    full_name: Some("Someone Else".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(approved.is_approved_vendor());
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.full_name, "Pedro Garcia");

        assert!(auth.login("vendor@anihan.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let auth = authenticator().await;
        auth.register(registration("user@anihan.com", Role::User))
            .await
            .unwrap();

        assert!(matches!(
            auth.login("user@anihan.com", "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@anihan.com", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.register(registration("user@anihan.com", Role::User)).await,
            Err(AuthError::Market(MarketError::DuplicateEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_tokens_and_roles() {
        let auth = authenticator().await;
        assert!(matches!(
            auth.authenticate(None).await,
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(
            auth.authenticate(Some("forged")).await,
            Err(AuthError::InvalidToken)
        ));

        let result = auth
            .register(registration("user@anihan.com", Role::User))
            .await
            .unwrap();
        let token = result.token.unwrap();
        let user = auth.authenticate(Some(&token)).await.unwrap();
        assert!(auth.require_role(&user, Role::User).is_ok());
        assert!(matches!(
            auth.require_role(&user, Role::Admin),
            Err(AuthError::InsufficientPermissions)
        ));

        auth.logout(&token).unwrap();
        assert!(matches!(
            auth.authenticate(Some(&token)).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_profile_update_rehashes_and_strips_role() {
        let auth = authenticator().await;
        let result = auth
            .register(registration("user@anihan.com", Role::User))
            .await
            .unwrap();

        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "full_name": "Pedro G.",
            "password": "newsecret456",
            "role": "admin",
        }))
        .unwrap();
        let user = auth.update_profile(result.user.id, update).await.unwrap();
        assert_eq!(user.full_name, "Pedro G.");
        assert_eq!(user.role, Role::User);

        assert!(auth.login("user@anihan.com", "secret123").await.is_err());
        assert!(auth.login("user@anihan.com", "newsecret456").await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivation_ends_sessions() {
        let auth = authenticator().await;
        let result = auth
            .register(registration("user@anihan.com", Role::User))
            .await
            .unwrap();
        let token = result.token.unwrap();

        auth.update_status(
            result.user.id,
            UserPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            auth.authenticate(Some(&token)).await,
            Err(AuthError::InvalidToken)
        ));

        auth.delete_user(result.user.id).await.unwrap();
        assert!(matches!(
            auth.delete_user(result.user.id).await,
            Err(AuthError::Market(MarketError::NotFound("User")))
        ));
    }
}
