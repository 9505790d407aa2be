//! Lock evaluation: does the player hold what a page requires?
//!
//! Two rules exist. [`is_locked`] is the rule pages have always been
//! served with and is order sensitive: only the first used object is ever
//! compared, so callers must keep the order in which the player supplied
//! their objects. [`is_locked_any`] is the subset check, available through
//! [`LockRule::AnyUsed`] for deployments that opt in.

use serde::Deserialize;

use crate::object::GameObject;

/// Which matching rule decides the lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockRule {
    /// Every required object must equal the first used object.
    #[default]
    FirstUsed,
    /// Every required object must equal some used object.
    AnyUsed,
}

impl LockRule {
    /// Evaluates the lock state of a page under this rule.
    #[must_use]
    pub fn evaluate(self, required: &[GameObject], used: &[GameObject]) -> bool {
        let locked = match self {
            Self::FirstUsed => is_locked(required, used),
            Self::AnyUsed => is_locked_any(required, used),
        };
        tracing::debug!(
            rule = ?self,
            required = required.len(),
            used = used.len(),
            locked,
            "evaluated page lock"
        );
        locked
    }
}

/// Returns `true` if the page stays locked for the given used objects.
///
/// - No requirements: never locked.
/// - Requirements but nothing used: locked.
/// - Otherwise each requirement is compared against the used list in order
///   and the first mismatch locks the page. Since the scan stops at the
///   first used entry, a requirement matched only by a later used entry
///   still locks.
#[must_use]
pub fn is_locked(required: &[GameObject], used: &[GameObject]) -> bool {
    if required.is_empty() {
        return false;
    }

    let Some(first) = used.first() else {
        return true;
    };

    required.iter().any(|lock| lock != first)
}

/// Returns `true` unless every required object appears somewhere in `used`.
#[must_use]
pub fn is_locked_any(required: &[GameObject], used: &[GameObject]) -> bool {
    required.iter().any(|lock| !used.contains(lock))
}
