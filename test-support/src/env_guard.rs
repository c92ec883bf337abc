//! Scoped environment variable changes for tests.
//!
//! `EnvVarGuard` sets or removes a variable and restores the previous value
//! on drop. Callers must run such tests with `#[serial_test::serial]`.

/// Restores one environment variable when dropped.
#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    original: Option<String>,
}

impl EnvVarGuard {
    /// Set an environment variable for the lifetime of the returned guard.
    pub fn set(key: &str, value: &str) -> Self {
        let guard = Self::capture(key);
        set_env_var(key, value);
        guard
    }

    /// Remove an environment variable for the lifetime of the returned guard.
    pub fn remove(key: &str) -> Self {
        let guard = Self::capture(key);
        remove_env_var(key);
        guard
    }

    fn capture(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            original: std::env::var(key).ok(),
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(v) => set_env_var(&self.key, v),
            None => remove_env_var(&self.key),
        }
    }
}

// SAFETY (both helpers): only called from serial test contexts.
fn set_env_var(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

fn remove_env_var(key: &str) {
    unsafe { std::env::remove_var(key) };
}

#[cfg(test)]
mod tests {
    use super::EnvVarGuard;

    #[test]
    #[serial_test::serial]
    fn set_restores_unset_variable() {
        let key = "LINECONF_GUARD_SET";
        drop(EnvVarGuard::remove(key));
        {
            let _guard = EnvVarGuard::set(key, "value");
            assert_eq!(std::env::var(key).unwrap(), "value");
        }
        assert!(std::env::var(key).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn remove_restores_previous_value() {
        let key = "LINECONF_GUARD_REMOVE";
        let _outer = EnvVarGuard::set(key, "original");
        {
            let _guard = EnvVarGuard::remove(key);
            assert!(std::env::var(key).is_err());
        }
        assert_eq!(std::env::var(key).unwrap(), "original");
    }

    #[test]
    #[serial_test::serial]
    fn nested_guards_unwind_in_order() {
        let key = "LINECONF_GUARD_NESTED";
        let _base = EnvVarGuard::set(key, "initial");
        let first = EnvVarGuard::set(key, "first");
        {
            let _second = EnvVarGuard::set(key, "second");
            assert_eq!(std::env::var(key).unwrap(), "second");
        }
        assert_eq!(std::env::var(key).unwrap(), "first");
        drop(first);
        assert_eq!(std::env::var(key).unwrap(), "initial");
    }
}
