use triomphe::Arc;

use crate::utils::arc_ptr_compare;

/// Atom-style mutation over a single-writer reference cell.
///
/// Every operation is single-shot: functions run exactly once against the value
/// read at call time and nothing is retried. Callers must serialize access
/// themselves, racing writers get last-write-wins.
pub trait Reference<T> {
    /// Error raised by a rejected or failed mutation.
    type Error;

    /// Returns the current value.
    fn read(&self) -> Arc<T>;

    /// Like [`swap`](Reference::swap), but returns both the replaced and the new value.
    ///
    /// # Errors
    ///
    /// Whatever the cell reports for the candidate or its commit.
    fn swap_vals<F>(&self, f: F) -> Result<(Arc<T>, Arc<T>), Self::Error>
    where
        F: FnOnce(&T) -> T;

    /// Like [`reset`](Reference::reset), but returns both the replaced and the new value.
    ///
    /// # Errors
    ///
    /// Whatever the cell reports for the candidate or its commit.
    fn reset_vals(&self, next: impl Into<Arc<T>>) -> Result<(Arc<T>, Arc<T>), Self::Error>;

    /// Sets the value to `next` if the current value is `expected`.
    ///
    /// `expected` is compared by identity, not equality. The candidate is validated
    /// before the comparison, so a rejected candidate fails even when the identity
    /// check would not have matched.
    ///
    /// # Errors
    ///
    /// Whatever the cell reports for the candidate or its commit.
    fn compare_and_set(
        &self,
        expected: &Arc<T>,
        next: impl Into<Arc<T>>,
    ) -> Result<bool, Self::Error>;

    /// Replaces the value with `f(current)` and returns the new value.
    ///
    /// # Errors
    ///
    /// See [`swap_vals`](Reference::swap_vals).
    fn swap<F>(&self, f: F) -> Result<Arc<T>, Self::Error>
    where
        F: FnOnce(&T) -> T,
    {
        self.swap_vals(f).map(|(_, new)| new)
    }

    /// Like [`swap`](Reference::swap), passing `arg` through to `f`.
    ///
    /// Use a tuple for more than one argument, or the [`swap!`](crate::swap) macro.
    ///
    /// # Errors
    ///
    /// See [`swap_vals`](Reference::swap_vals).
    fn swap_with<A, F>(&self, f: F, arg: A) -> Result<Arc<T>, Self::Error>
    where
        F: FnOnce(&T, A) -> T,
    {
        self.swap(|value| f(value, arg))
    }

    /// Unconditionally replaces the value and returns it.
    ///
    /// # Errors
    ///
    /// See [`reset_vals`](Reference::reset_vals).
    fn reset(&self, next: impl Into<Arc<T>>) -> Result<Arc<T>, Self::Error> {
        self.reset_vals(next).map(|(_, new)| new)
    }
}

/// Storage primitives the cells build [`Reference`] on. Only reachable through
/// the helpers below, which always validate before committing.
pub(crate) trait Commit<T> {
    type Error;

    fn load(&self) -> Arc<T>;

    fn validate(&self, candidate: &T) -> Result<(), Self::Error>;

    /// Stores `new`, then runs any post-commit notification with the value it
    /// actually replaced. If notification fails, `new` stays committed.
    fn commit(&self, new: Arc<T>) -> Result<Arc<T>, Self::Error>;
}

pub(crate) fn swap_vals<T, C, F>(cell: &C, f: F) -> Result<(Arc<T>, Arc<T>), C::Error>
where
    C: Commit<T> + ?Sized,
    F: FnOnce(&T) -> T,
{
    let current = cell.load();
    let new = Arc::new(f(&current));
    cell.validate(&new)?;

    let old = cell.commit(Arc::clone(&new))?;
    Ok((old, new))
}

pub(crate) fn reset_vals<T, C>(cell: &C, next: Arc<T>) -> Result<(Arc<T>, Arc<T>), C::Error>
where
    C: Commit<T> + ?Sized,
{
    cell.validate(&next)?;

    let old = cell.commit(Arc::clone(&next))?;
    Ok((old, next))
}

pub(crate) fn compare_and_set<T, C>(
    cell: &C,
    expected: &Arc<T>,
    next: Arc<T>,
) -> Result<bool, C::Error>
where
    C: Commit<T> + ?Sized,
{
    cell.validate(&next)?;

    if !arc_ptr_compare(&cell.load(), expected) {
        return Ok(false);
    }

    cell.commit(next)?;
    Ok(true)
}
