//! Cached value slot shared by every constraint kind

use std::cell::Cell;

use super::error::LayoutError;

/// A lazily recomputed value plus its "needs recalculation" flag
///
/// The value is only meaningful while the flag is clear. Resolution goes through
/// [`ConstraintCache::get_or_compute`]; frame advancement goes through
/// [`ConstraintCache::invalidate`].
#[derive(Debug)]
pub struct ConstraintCache<T: Copy> {
    value: Cell<T>,
    recalculate: Cell<bool>,
    computations: Cell<u64>,
}

impl<T: Copy + Default> Default for ConstraintCache<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> ConstraintCache<T> {
    /// A cache that starts invalid
    pub fn new(initial: T) -> Self {
        Self {
            value: Cell::new(initial),
            recalculate: Cell::new(true),
            computations: Cell::new(0),
        }
    }

    /// Return the cached value, computing it first if the flag is set
    ///
    /// A failed computation leaves the flag set so the next read retries.
    pub fn get_or_compute(
        &self,
        compute: impl FnOnce() -> Result<T, LayoutError>,
    ) -> Result<T, LayoutError> {
        if !self.recalculate.get() {
            return Ok(self.value.get());
        }
        let value = compute()?;
        self.store(value);
        Ok(value)
    }

    /// Store a freshly computed value and mark it valid
    pub fn store(&self, value: T) {
        self.value.set(value);
        self.recalculate.set(false);
        self.computations.set(self.computations.get() + 1);
    }

    pub fn invalidate(&self) {
        self.recalculate.set(true);
    }

    pub fn needs_recalculation(&self) -> bool {
        self.recalculate.get()
    }

    /// Last stored value, valid or not
    pub fn peek(&self) -> T {
        self.value.get()
    }

    /// How many times a value has been computed and stored
    pub fn computations(&self) -> u64 {
        self.computations.get()
    }
}

impl<T: Copy> Clone for ConstraintCache<T> {
    /// Clones start invalid so a copied constraint never serves a value computed for another slot
    fn clone(&self) -> Self {
        Self::new(self.value.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_invalid() {
        let cache: ConstraintCache<f64> = ConstraintCache::default();
        assert!(cache.needs_recalculation());
        assert_eq!(cache.computations(), 0);
    }

    #[test]
    fn test_repeated_reads_compute_once() {
        let cache = ConstraintCache::new(0.0);
        for _ in 0..5 {
            assert_eq!(cache.get_or_compute(|| Ok(42.0)), Ok(42.0));
        }
        assert_eq!(cache.computations(), 1);
        assert!(!cache.needs_recalculation());
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let cache = ConstraintCache::new(0.0);
        cache.get_or_compute(|| Ok(1.0)).unwrap();
        cache.invalidate();
        assert!(cache.needs_recalculation());
        assert_eq!(cache.get_or_compute(|| Ok(2.0)), Ok(2.0));
        assert_eq!(cache.computations(), 2);
        assert!(!cache.needs_recalculation());
    }

    #[test]
    fn test_error_leaves_flag_set() {
        let cache = ConstraintCache::new(0.0);
        let result = cache.get_or_compute(|| Err(LayoutError::WindowClosed));
        assert!(result.is_err());
        assert!(cache.needs_recalculation());
        assert_eq!(cache.computations(), 0);
    }
}
