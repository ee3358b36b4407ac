//! Indirection over process-global system state.
//!
//! Components in this crate never consult `std::env` directly. They take a
//! [`SystemAccess`] implementation instead, so production code binds against
//! the live process via [`RealSystem`] while tests supply an in-memory
//! [`SystemSnapshot`] without mutating real process state.

use std::collections::BTreeMap;
use std::env;

/// Property key naming the current user's home directory.
pub const USER_HOME: &str = "user.home";

/// Property key naming the operating system.
pub const OS_NAME: &str = "os.name";

/// Property key naming the process working directory.
pub const USER_DIR: &str = "user.dir";

/// Read access to system properties and environment variables.
pub trait SystemAccess {
    /// All known system properties.
    fn properties(&self) -> BTreeMap<String, String>;

    /// All environment variables.
    fn environment(&self) -> BTreeMap<String, String>;

    /// Look up a single property; `None` when unset.
    fn property(&self, key: &str) -> Option<String>;

    /// Look up a single environment variable; `None` when unset.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Whether replacing a file via temp-file-and-rename is reliable here.
    ///
    /// Renaming over an open target is refused on the Windows family, so
    /// persistence falls back to an in-place overwrite there. The default
    /// implementation inspects the [`OS_NAME`] property; an unset property is
    /// treated as a platform with working rename semantics.
    fn supports_atomic_replace(&self) -> bool {
        !self
            .property(OS_NAME)
            .is_some_and(|name| name.to_lowercase().contains("windows"))
    }
}

/// [`SystemAccess`] backed by the live process.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl SystemAccess for RealSystem {
    fn properties(&self) -> BTreeMap<String, String> {
        [USER_HOME, OS_NAME, USER_DIR]
            .into_iter()
            .filter_map(|key| self.property(key).map(|value| (key.to_owned(), value)))
            .collect()
    }

    fn environment(&self) -> BTreeMap<String, String> {
        env::vars().collect()
    }

    fn property(&self, key: &str) -> Option<String> {
        match key {
            USER_HOME => dirs::home_dir().map(|home| home.to_string_lossy().into_owned()),
            OS_NAME => Some(env::consts::OS.to_owned()),
            USER_DIR => env::current_dir()
                .ok()
                .map(|dir| dir.to_string_lossy().into_owned()),
            _ => None,
        }
    }

    fn env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Immutable in-memory pairing of property and environment mappings.
///
/// A snapshot represents the full system-state view at one point in time.
/// Tests construct one per scenario and pass it wherever a [`SystemAccess`]
/// is expected; switching between snapshots never touches the real process.
///
/// # Examples
///
/// ```
/// use confbind::{SystemAccess, SystemSnapshot, USER_HOME};
///
/// let system = SystemSnapshot::default().with_property(USER_HOME, "/home/john");
/// assert_eq!(system.property(USER_HOME).as_deref(), Some("/home/john"));
/// assert_eq!(system.env_var("PATH"), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SystemSnapshot {
    properties: BTreeMap<String, String>,
    environment: BTreeMap<String, String>,
}

impl SystemSnapshot {
    /// Create a snapshot from complete property and environment mappings.
    #[must_use]
    pub fn new(
        properties: BTreeMap<String, String>,
        environment: BTreeMap<String, String>,
    ) -> Self {
        Self {
            properties,
            environment,
        }
    }

    /// Return the snapshot with `key` set in its property mapping.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Return the snapshot with `key` set in its environment mapping.
    #[must_use]
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

impl SystemAccess for SystemSnapshot {
    fn properties(&self) -> BTreeMap<String, String> {
        self.properties.clone()
    }

    fn environment(&self) -> BTreeMap<String, String> {
        self.environment.clone()
    }

    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.environment.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_os_name_disables_atomic_replace() {
        let system = SystemSnapshot::default().with_property(OS_NAME, "Windows Server 2022");
        assert!(!system.supports_atomic_replace());
    }

    #[test]
    fn non_windows_os_name_keeps_atomic_replace() {
        let system = SystemSnapshot::default().with_property(OS_NAME, "Linux");
        assert!(system.supports_atomic_replace());
    }

    #[test]
    fn missing_os_name_defaults_to_atomic_replace() {
        assert!(SystemSnapshot::default().supports_atomic_replace());
    }

    #[test]
    fn snapshot_lookups_are_isolated_per_mapping() {
        let system = SystemSnapshot::default()
            .with_property("color", "red")
            .with_env_var("COLOR", "blue");
        assert_eq!(system.property("color").as_deref(), Some("red"));
        assert_eq!(system.property("COLOR"), None);
        assert_eq!(system.env_var("COLOR").as_deref(), Some("blue"));
        assert_eq!(system.env_var("color"), None);
    }

    #[test]
    fn real_system_reports_the_compiled_os() {
        assert_eq!(
            RealSystem.property(OS_NAME).as_deref(),
            Some(env::consts::OS)
        );
    }
}
