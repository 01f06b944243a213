//! Engine reuse across build cycles.
//!
//! A [`Pool`] hands out engines whose buffers have already grown to fit
//! earlier work, so steady-state templating allocates nothing. Every engine is
//! reset on the way back in; a checked-out engine is owned exclusively by its
//! caller, and only the idle list is shared.
use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard, PoisonError},
    vec::Vec,
};

use tracing::{debug, trace};

use crate::{BatchReplace, PoolOptions};

static DEFAULT_POOL: Pool = Pool::new();

/// Checks an engine out of the process-wide pool.
///
/// The engine starts with an empty source; call
/// [`set_source`](BatchReplace::set_source) before registering pairs, or use
/// [`acquire_with_source`].
#[must_use]
pub fn acquire() -> Pooled<'static> {
    DEFAULT_POOL.acquire()
}

/// Checks an engine out of the process-wide pool and sets its source.
#[must_use]
pub fn acquire_with_source(src: impl AsRef<[u8]>) -> Pooled<'static> {
    DEFAULT_POOL.acquire_with_source(src)
}

/// Returns an engine to the process-wide pool.
pub fn release(engine: BatchReplace) {
    DEFAULT_POOL.release(engine);
}

/// A thread-safe free list of [`BatchReplace`] engines.
///
/// # Examples
///
/// ```rust
/// use batch_replace::Pool;
///
/// let pool = Pool::new();
/// {
///     let mut r = pool.acquire_with_source("Balance of !user: !val !cur");
///     let out = r.replace("!user", "John Ruth").replace_int("!val", 8000).replace("!cur", "USD").commit_string();
///     assert_eq!(out, "Balance of John Ruth: 8000 USD");
/// }
/// assert_eq!(pool.idle(), 1);
/// ```
#[derive(Debug)]
pub struct Pool {
    idle: Mutex<Vec<BatchReplace>>,
    options: PoolOptions,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// An empty pool with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_options(PoolOptions::new())
    }

    /// An empty pool.
    #[must_use]
    pub const fn with_options(options: PoolOptions) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            options,
        }
    }

    /// Checks an engine out; it goes back to the pool when the guard drops.
    pub fn acquire(&self) -> Pooled<'_> {
        let engine = self.take();
        Pooled { pool: self, engine }
    }

    /// Checks an engine out and sets its source.
    pub fn acquire_with_source(&self, src: impl AsRef<[u8]>) -> Pooled<'_> {
        let mut pooled = self.acquire();
        pooled.set_source(src);
        pooled
    }

    /// Checks an engine out without a guard; hand it back with
    /// [`release`](Self::release).
    #[must_use]
    pub fn take(&self) -> BatchReplace {
        if let Some(engine) = self.lock().pop() {
            trace!("reusing idle engine");
            return engine;
        }
        debug!("pool empty, creating engine");
        BatchReplace::with_options(b"", self.options.engine)
    }

    /// Resets `engine` and keeps it for the next caller, unless the pool
    /// already holds `max_idle` engines.
    pub fn release(&self, mut engine: BatchReplace) {
        engine.reset();
        let mut idle = self.lock();
        if self.options.max_idle.is_some_and(|max| idle.len() >= max) {
            trace!("pool full, dropping engine");
            return;
        }
        idle.push(engine);
    }

    /// Engines currently waiting in the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    // Idle engines are always reset, so a panic elsewhere cannot leave the
    // list in a state worth refusing.
    fn lock(&self) -> MutexGuard<'_, Vec<BatchReplace>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An engine checked out of a [`Pool`], returned to it on drop.
#[derive(Debug)]
pub struct Pooled<'a> {
    pool: &'a Pool,
    engine: BatchReplace,
}

impl Pooled<'_> {
    /// Keeps the engine instead of returning it to the pool.
    #[must_use]
    pub fn detach(mut self) -> BatchReplace {
        let engine = core::mem::take(&mut self.engine);
        // The guard now holds an empty engine; there is nothing to give back.
        core::mem::forget(self);
        engine
    }
}

impl Deref for Pooled<'_> {
    type Target = BatchReplace;

    fn deref(&self) -> &BatchReplace {
        &self.engine
    }
}

impl DerefMut for Pooled<'_> {
    fn deref_mut(&mut self) -> &mut BatchReplace {
        &mut self.engine
    }
}

impl Drop for Pooled<'_> {
    fn drop(&mut self) {
        self.pool.release(core::mem::take(&mut self.engine));
    }
}
