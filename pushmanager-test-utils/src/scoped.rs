//! Temporarily replacing one field of a value.

use std::ops::{Deref, DerefMut};

/// Replaces the field selected by `slot` for as long as the guard lives.
///
/// The previous value is put back when the guard is dropped, which includes unwinding
/// out of a panicking test. The owner stays reachable through `Deref`/`DerefMut` while
/// the override is active.
///
/// ```
/// use pushmanager_test_utils::scoped::ScopedOverride;
///
/// struct Config {
///     retries: u32,
/// }
///
/// fn retries(config: &mut Config) -> &mut u32 {
///     &mut config.retries
/// }
///
/// let mut config = Config { retries: 3 };
/// {
///     let scoped = ScopedOverride::new(&mut config, retries, 0);
///     assert_eq!(scoped.retries, 0);
/// }
/// assert_eq!(config.retries, 3);
/// ```
pub struct ScopedOverride<'a, O, T> {
    owner: &'a mut O,
    slot: fn(&mut O) -> &mut T,
    saved: Option<T>,
}

impl<'a, O, T> ScopedOverride<'a, O, T> {
    /// Swaps `replacement` into the slot, saving the current value
    pub fn new(owner: &'a mut O, slot: fn(&mut O) -> &mut T, replacement: T) -> Self {
        let saved = std::mem::replace(slot(owner), replacement);

        Self {
            owner,
            slot,
            saved: Some(saved),
        }
    }

    /// The value that will be restored
    pub fn saved(&self) -> Option<&T> {
        self.saved.as_ref()
    }
}

impl<O, T> Deref for ScopedOverride<'_, O, T> {
    type Target = O;

    fn deref(&self) -> &O {
        &*self.owner
    }
}

impl<O, T> DerefMut for ScopedOverride<'_, O, T> {
    fn deref_mut(&mut self) -> &mut O {
        &mut *self.owner
    }
}

impl<O, T> Drop for ScopedOverride<'_, O, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *(self.slot)(&mut *self.owner) = saved;
        }
    }
}
