//! # Session
//!
//! The signed-in user, as far as this crate cares: an opaque id stamped on
//! every record it submits.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::{AppError, AppResult};

/// Shared handle to the current user id. Clones observe the same session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user_id: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// A session with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        let session = Self::default();
        session.sign_in(user_id);
        session
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        info!(user_id = %user_id, "User signed in");
        if let Ok(mut current) = self.current_user_id.write() {
            *current = Some(user_id);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut current) = self.current_user_id.write() {
            if current.take().is_some() {
                info!("User signed out");
            }
        }
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current_user_id.read().ok().and_then(|id| id.clone())
    }

    /// The current user id, or `Unauthenticated`.
    pub fn require_user(&self) -> AppResult<String> {
        self.current_user_id().ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let session = Session::anonymous();
        assert!(matches!(session.require_user(), Err(AppError::Unauthenticated)));

        let shared = session.clone();
        shared.sign_in("user-1");
        assert_eq!(session.require_user().unwrap(), "user-1");

        session.sign_out();
        assert_eq!(shared.current_user_id(), None);
    }
}
