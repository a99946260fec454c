use std::sync::{Arc, PoisonError, RwLock};

use super::{EngineSettings, OutlineChange, OutlineSettings};

/// Source of truth for outline settings.
///
/// Implemented by [`SharedSettings`]; tests substitute their own store to
/// observe writes.
pub trait SettingsStore: Send + Sync {
    /// Snapshot of the current outline settings.
    fn outline(&self) -> OutlineSettings;

    /// Replaces the outline settings.
    fn write_outline(&self, settings: OutlineSettings);

    /// Applies one clamped change as a single atomic edit.
    ///
    /// Returns whether anything was written. Concurrent changes to other
    /// fields are never lost.
    fn apply_outline(&self, change: OutlineChange) -> bool;
}

/// Engine settings shared between the application and the render thread.
///
/// Cloning is cheap and yields a handle to the same settings.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<EngineSettings>>,
}

impl SharedSettings {
    pub fn new(settings: EngineSettings) -> Self {
        Self { inner: Arc::new(RwLock::new(settings)) }
    }

    /// Full copy of the current settings.
    pub fn snapshot(&self) -> EngineSettings {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Mutates the settings in place under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut EngineSettings) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SettingsStore for SharedSettings {
    fn outline(&self) -> OutlineSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .post_processing
            .outline
    }

    fn write_outline(&self, settings: OutlineSettings) {
        self.update(|s| s.post_processing.outline = settings);
    }

    fn apply_outline(&self, change: OutlineChange) -> bool {
        self.update(|s| s.post_processing.outline.apply(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = SharedSettings::default();
        let b = a.clone();
        let mut o = a.outline();
        o.strength = 0.25;
        a.write_outline(o);
        assert_eq!(b.outline().strength, 0.25);
        assert_eq!(b.snapshot().post_processing.outline.strength, 0.25);
    }

    #[test]
    fn apply_outline_reports_writes() {
        let s = SharedSettings::default();
        assert!(s.apply_outline(OutlineChange::Strength(0.5)));
        assert!(!s.apply_outline(OutlineChange::Strength(0.5)));
        assert!(s.apply_outline(OutlineChange::OutlinePixel(100.0)));
        assert_eq!(s.outline().strength, 0.5);
        assert_eq!(s.outline().outline_pixel, 8.0);
    }

    #[test]
    fn concurrent_changes_to_different_fields_are_kept() {
        const ROUNDS: usize = 20_000;
        let s = SharedSettings::default();

        let strength = {
            let s = s.clone();
            std::thread::spawn(move || {
                (0..ROUNDS)
                    .filter(|i| {
                        let value = if i % 2 == 0 { 0.0 } else { 1.0 };
                        !s.apply_outline(OutlineChange::Strength(value))
                    })
                    .count()
            })
        };
        let add_mode = {
            let s = s.clone();
            std::thread::spawn(move || {
                (0..ROUNDS)
                    .filter(|i| !s.apply_outline(OutlineChange::UseAddMode(i % 2 == 0)))
                    .count()
            })
        };

        // Each thread alternates its own field, so every change is a write
        // unless the other thread reverted it.
        assert_eq!(strength.join().unwrap(), 0);
        assert_eq!(add_mode.join().unwrap(), 0);
        assert_eq!(s.outline().strength, 1.0);
        assert!(!s.outline().use_add_mode);
    }

    #[test]
    fn update_returns_closure_result() {
        let s = SharedSettings::default();
        let old = s.update(|e| std::mem::replace(&mut e.post_processing.outline.group_count, 7));
        assert_eq!(old, 4);
        assert_eq!(s.outline().group_count, 7);
    }
}
