//! Simulated login. Nothing is verified and the password is never stored;
//! logging in only records which identity later reads and writes use.

use crate::error::StoreError;
use crate::identity::Identity;
use crate::kv::KeyValueStore;

pub const CURRENT_USER_KEY: &str = "current_user";

/// Record `username` as the current user.
///
/// # Errors
///
/// Returns [`StoreError::InvalidCredentials`] if either field is blank, or
/// [`StoreError`] if the store cannot be written.
pub fn login<S: KeyValueStore + ?Sized>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<Identity, StoreError> {
    let identity =
        Identity::user(username).ok_or(StoreError::InvalidCredentials("username is required"))?;
    if password.trim().is_empty() {
        return Err(StoreError::InvalidCredentials("password is required"));
    }

    store.set(CURRENT_USER_KEY, &identity.to_string())?;
    tracing::info!(user = %identity, "logged in");
    Ok(identity)
}

/// Return to guest mode. Visited sets are kept.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be written.
pub fn logout<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    store.remove(CURRENT_USER_KEY)?;
    tracing::info!("logged out");
    Ok(())
}

/// The logged-in user, or [`Identity::Guest`].
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be read.
pub fn current_identity<S: KeyValueStore + ?Sized>(store: &S) -> Result<Identity, StoreError> {
    Ok(store
        .get(CURRENT_USER_KEY)?
        .and_then(|name| Identity::user(&name))
        .unwrap_or(Identity::Guest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn starts_as_guest() {
        let store = MemoryStore::new();
        assert_eq!(current_identity(&store).unwrap(), Identity::Guest);
    }

    #[test]
    fn login_then_logout() {
        let store = MemoryStore::new();
        let identity = login(&store, " ana ", "secret").unwrap();
        assert_eq!(identity, Identity::User("ana".into()));
        assert_eq!(current_identity(&store).unwrap(), identity);

        logout(&store).unwrap();
        assert_eq!(current_identity(&store).unwrap(), Identity::Guest);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            login(&store, "  ", "pw"),
            Err(StoreError::InvalidCredentials(_))
        ));
        assert!(matches!(
            login(&store, "ana", ""),
            Err(StoreError::InvalidCredentials(_))
        ));
        assert_eq!(current_identity(&store).unwrap(), Identity::Guest);
    }

    #[test]
    fn password_is_not_persisted() {
        let store = MemoryStore::new();
        login(&store, "ana", "hunter2").unwrap();
        assert_eq!(store.get(CURRENT_USER_KEY).unwrap().as_deref(), Some("ana"));
    }
}
