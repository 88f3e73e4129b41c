// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider port.
//!
//! Sign-in itself is handled elsewhere; the engine only needs the current
//! user and a way to hear about changes.

use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;
use tokio::sync::watch;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Receiver notified whenever the signed-in user changes.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    async fn login(&self) -> Result<User, AppError>;

    async fn logout(&self) -> Result<(), AppError>;
}

/// Current user, or [`AppError::SignInRequired`].
pub fn require_user(identity: &dyn IdentityProvider) -> Result<User, AppError> {
    identity.current_user().ok_or(AppError::SignInRequired)
}

/// In-process provider that signs in a fixed account.
pub struct LocalIdentityProvider {
    account: User,
    sender: watch::Sender<Option<User>>,
}

impl LocalIdentityProvider {
    /// Provider for `account`, initially signed out.
    pub fn new(account: User) -> Self {
        let (sender, _) = watch::channel(None);
        Self { account, sender }
    }

    /// Provider for `account`, already signed in.
    pub fn signed_in(account: User) -> Self {
        let (sender, _) = watch::channel(Some(account.clone()));
        Self { account, sender }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn current_user(&self) -> Option<User> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.sender.subscribe()
    }

    async fn login(&self) -> Result<User, AppError> {
        self.sender.send_replace(Some(self.account.clone()));
        tracing::info!(user_id = %self.account.id, "Signed in");
        Ok(self.account.clone())
    }

    async fn logout(&self) -> Result<(), AppError> {
        if let Some(user) = self.sender.send_replace(None) {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }
}
