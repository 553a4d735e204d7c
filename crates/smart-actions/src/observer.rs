//! Permission check observers
//!
//! Every [`crate::PermissionRegistry::can`] call reports its normalized
//! inputs and result to a [`CheckObserver`]. The default is
//! [`NoopObserver`]; [`TracingObserver`] routes checks to `tracing` for audit
//! and debugging, and any `Fn(&CheckRecord)` closure works for tests.

use crate::normalize::{ActionKey, FormKey};

/// One completed permission check
#[derive(Debug, Clone, Copy)]
pub struct CheckRecord<'a> {
    /// Normalized form the caller asked about
    pub form: &'a FormKey,

    /// Normalized action the caller asked about
    pub action: &'a ActionKey,

    /// Check result
    pub allowed: bool,

    /// Registry generation the check was answered from
    pub generation: u64,
}

/// Sink for permission check diagnostics
pub trait CheckObserver: Send + Sync {
    /// Called once per check, after the result is known
    fn on_check(&self, check: &CheckRecord<'_>);
}

/// Observer that discards every check
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CheckObserver for NoopObserver {
    #[inline]
    fn on_check(&self, _check: &CheckRecord<'_>) {}
}

/// Observer that emits each check as a `tracing` debug event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CheckObserver for TracingObserver {
    fn on_check(&self, check: &CheckRecord<'_>) {
        tracing::debug!(
            target: "smart_actions::check",
            form = %check.form,
            action = %check.action,
            allowed = check.allowed,
            generation = check.generation,
            "permission check"
        );
    }
}

impl<F> CheckObserver for F
where
    F: Fn(&CheckRecord<'_>) + Send + Sync,
{
    fn on_check(&self, check: &CheckRecord<'_>) {
        self(check);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn closure_observer_receives_record() {
        let seen = Mutex::new(Vec::new());
        let observer = |check: &CheckRecord<'_>| {
            seen.lock().push((check.form.to_string(), check.action.to_string(), check.allowed));
        };

        let form = FormKey::new("Employee Master");
        let action = ActionKey::new("Add");
        observer.on_check(&CheckRecord {
            form: &form,
            action: &action,
            allowed: true,
            generation: 1,
        });

        assert_eq!(
            seen.into_inner(),
            vec![("employee-master".to_string(), "add".to_string(), true)]
        );
    }

    #[test]
    fn builtin_observers_accept_checks() {
        let form = FormKey::new("X");
        let action = ActionKey::new("add");
        let record = CheckRecord {
            form: &form,
            action: &action,
            allowed: false,
            generation: 0,
        };
        NoopObserver.on_check(&record);
        TracingObserver.on_check(&record);
    }
}
