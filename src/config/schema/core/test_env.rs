//! Process environment is global; config tests that touch it hold `ENV_LOCK`
//! and restore every variable through `EnvVarGuard` on drop.

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: callers hold the env lock.
        unsafe { std::env::set_var(key, value) };
        Self { key, previous }
    }

    pub(crate) fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        // SAFETY: callers hold the env lock.
        unsafe { std::env::remove_var(key) };
        Self { key, previous }
    }

    /// Clear every variable the overrides read.
    pub(crate) fn clear_all() -> Vec<Self> {
        super::env_overrides::ENV_KEYS
            .iter()
            .map(|key| Self::unset(key))
            .collect()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: the env lock outlives every guard in a test.
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}
