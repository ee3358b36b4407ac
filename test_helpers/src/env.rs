//! Guarded mutation of real process environment variables.
//!
//! Tests exercising the real-environment system accessor need to set and
//! remove variables in the live process. Each mutation here acquires a
//! global re-entrant mutex and returns an RAII guard that restores the
//! prior state on drop (removing the variable if it was previously absent),
//! re-acquiring the mutex for the restoration. Guards for the same key
//! restore correctly when dropped in LIFO order.
//!
//! # Examples
//!
//! ```
//! use confbind_test_helpers::env;
//!
//! let _guard = env::set_var("CONFBIND_TEST_KEY", "value");
//! // `CONFBIND_TEST_KEY` is set for the lifetime of the guard.
//! ```

use parking_lot::ReentrantMutex;
use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

/// Set an environment variable, returning a guard that restores it.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    let key_name = key.into();
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key_name);
    // SAFETY: mutation happens while `ENV_MUTEX` is held.
    unsafe { env::set_var(&key_name, value.as_ref()) };
    EnvVarGuard {
        key: key_name,
        original,
    }
}

/// Remove an environment variable, returning a guard that restores it.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    let key_name = key.into();
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key_name);
    // SAFETY: mutation happens while `ENV_MUTEX` is held.
    unsafe { env::remove_var(&key_name) };
    EnvVarGuard {
        key: key_name,
        original,
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        if let Some(value) = self.original.take() {
            // SAFETY: restoration happens while `ENV_MUTEX` is held.
            unsafe { env::set_var(&self.key, &value) };
        } else {
            // SAFETY: restoration happens while `ENV_MUTEX` is held.
            unsafe { env::remove_var(&self.key) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_previously_absent_variable() {
        let key = "CONFBIND_HELPER_ABSENT";
        {
            let _guard = set_var(key, "present");
            assert_eq!(env::var(key).as_deref(), Ok("present"));
        }
        assert!(env::var_os(key).is_none());
    }

    #[test]
    fn guard_restores_previous_value() {
        let key = "CONFBIND_HELPER_STACKED";
        let _outer = set_var(key, "outer");
        {
            let _inner = set_var(key, "inner");
            assert_eq!(env::var(key).as_deref(), Ok("inner"));
        }
        assert_eq!(env::var(key).as_deref(), Ok("outer"));
    }

    #[test]
    fn remove_var_round_trips() {
        let key = "CONFBIND_HELPER_REMOVED";
        let _outer = set_var(key, "kept");
        {
            let _inner = remove_var(key);
            assert!(env::var_os(key).is_none());
        }
        assert_eq!(env::var(key).as_deref(), Ok("kept"));
    }
}
