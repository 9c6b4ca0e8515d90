//! User preferences.
//!
//! [`SettingsStore`] owns the preferences for one session. Dark mode is
//! persisted through a [`KeyValueStore`] on every change; the navigation
//! menu state lives only as long as the session.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key for the dark-mode preference.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Point-in-time view of the preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Dark theme enabled.
    pub dark_mode: bool,
    /// Navigation menu expanded.
    pub menu_open: bool,
}

/// Session preferences backed by a key-value store.
#[derive(Debug)]
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
    dark_mode: bool,
    menu_open: bool,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Load preferences from `store`.
    ///
    /// Only the exact value `"true"` enables dark mode; a missing or
    /// unrecognized value leaves it off.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: S) -> Result<Self> {
        let stored = store.get(DARK_MODE_KEY)?;
        let dark_mode = stored.as_deref() == Some("true");
        debug!(?stored, dark_mode, "Loaded preferences");

        Ok(Self {
            store,
            dark_mode,
            menu_open: false,
        })
    }

    /// Whether dark mode is on.
    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Set dark mode and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. The in-session value
    /// is left unchanged in that case.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
        self.dark_mode = enabled;
        info!(dark_mode = enabled, "Dark mode updated");
        Ok(())
    }

    /// Flip dark mode, persist it, and return the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let enabled = !self.dark_mode;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    /// Whether the navigation menu is open.
    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open or close the navigation menu.
    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    /// Flip the navigation menu and return the new state.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Current preferences.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        Preferences {
            dark_mode: self.dark_mode,
            menu_open: self.menu_open,
        }
    }

    /// Borrow the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the backing store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }
}
