//! Session and cart state with change notification
//!
//! Each store owns a `watch` channel. Consumers receive the store handle
//! explicitly and call `subscribe` to be told about changes.

use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::value_objects::CountryCode;
use crate::{CartItem, StorefrontError, User};

#[derive(Debug)]
pub struct SessionStore {
    user: watch::Sender<Option<User>>,
    path: Option<PathBuf>,
}

impl Default for SessionStore {
    fn default() -> Self { Self::new() }
}

impl SessionStore {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self { user, path: None }
    }

    /// Store persisted to `path`; a previously saved user is restored.
    pub fn with_file(path: impl AsRef<Path>) -> Result<Self, StorefrontError> {
        let path = path.as_ref().to_path_buf();
        let restored = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(serde_json::from_str::<User>(&raw).map_err(|e| StorefrontError::Storage(e.to_string()))?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(StorefrontError::Storage(e.to_string())),
        };
        debug!(path = %path.display(), restored = restored.is_some(), "opened session store");
        let (user, _) = watch::channel(restored);
        Ok(Self { user, path: Some(path) })
    }

    pub fn current_user(&self) -> Option<User> { self.user.borrow().clone() }
    pub fn is_logged_in(&self) -> bool { self.user.borrow().is_some() }
    pub fn token(&self) -> Option<String> { self.user.borrow().as_ref().map(|u| u.token.clone()) }

    /// The shopper's country, if set and well-formed.
    pub fn user_country(&self) -> Option<CountryCode> {
        let raw = self.user.borrow().as_ref()?.country.clone()?;
        match CountryCode::new(raw) {
            Ok(code) => Some(code),
            Err(e) => { warn!(error = %e, "ignoring malformed user country"); None }
        }
    }

    pub fn login(&self, user: User) -> Result<(), StorefrontError> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string(&user).map_err(|e| StorefrontError::Storage(e.to_string()))?;
            std::fs::write(path, raw).map_err(|e| StorefrontError::Storage(e.to_string()))?;
        }
        self.user.send_replace(Some(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StorefrontError> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorefrontError::Storage(e.to_string())),
            }
        }
        self.user.send_replace(None);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> { self.user.subscribe() }
}

#[derive(Debug)]
pub struct CartStore {
    items: watch::Sender<Vec<CartItem>>,
}

impl Default for CartStore {
    fn default() -> Self { Self::new() }
}

impl CartStore {
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self { items }
    }

    pub fn items(&self) -> Vec<CartItem> { self.items.borrow().clone() }
    pub fn item_count(&self) -> u32 { self.items.borrow().iter().map(|i| i.quantity).sum() }
    pub fn replace(&self, items: Vec<CartItem>) { self.items.send_replace(items); }
    pub fn clear(&self) { self.items.send_replace(Vec::new()); }
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> { self.items.subscribe() }
}
