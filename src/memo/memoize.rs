//! Memoization Adapters
//!
//! Wrap a deterministic function so repeated calls with equal arguments reuse
//! a cached result. The adapters only call `get` and `set` on the cache they
//! are given; eviction and expiration follow that cache's configuration, so a
//! result may be forgotten and recomputed later.

use std::marker::PhantomData;

use tracing::trace;

use crate::cache::{CacheManager, Clock, SystemClock};
use crate::memo::{MemoArgs, MemoKey};

// == Memoized ==
/// A memoized `FnMut(A) -> R`.
///
/// Recursive calls made inside the wrapped function bypass the cache. Use
/// [`memoize_recursive`] when sub-problems should be memoized too.
#[derive(Debug)]
pub struct Memoized<A, R, F, C = SystemClock> {
    cache: CacheManager<MemoKey, R, C>,
    func: F,
    _args: PhantomData<fn(A)>,
}

/// Wraps `func` so results are stored in `cache`, keyed by argument value.
pub fn memoize<A, R, F, C>(cache: CacheManager<MemoKey, R, C>, func: F) -> Memoized<A, R, F, C>
where
    A: MemoArgs,
    R: Clone,
    F: FnMut(A) -> R,
    C: Clock,
{
    Memoized {
        cache,
        func,
        _args: PhantomData,
    }
}

impl<A, R, F, C> Memoized<A, R, F, C>
where
    A: MemoArgs,
    R: Clone,
    F: FnMut(A) -> R,
    C: Clock,
{
    /// Returns the cached result for `args`, computing it on a miss.
    pub fn call(&mut self, args: A) -> R {
        let key = args.memo_key();
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        trace!("Memo miss, computing");
        let result = (self.func)(args);
        self.cache.set(key, result.clone());
        result
    }

    /// Drops the cached result for `args`. Returns whether one was stored.
    pub fn invalidate(&mut self, args: &A) -> bool {
        self.cache.delete(&args.memo_key())
    }

    pub fn cache(&self) -> &CacheManager<MemoKey, R, C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CacheManager<MemoKey, R, C> {
        &mut self.cache
    }

    pub fn into_cache(self) -> CacheManager<MemoKey, R, C> {
        self.cache
    }
}

// == Recursive Memoized ==
/// A memoized recursive function.
///
/// The wrapped function receives a `recur` handle as its first argument and
/// must call it, not itself, for sub-problems; only then are the
/// intermediate results cached.
///
/// ```
/// use memo_cache::{memoize_recursive, CacheManager};
///
/// let cache = CacheManager::new(128, None).unwrap();
/// let mut fib = memoize_recursive(cache, |recur, n: u64| {
///     if n < 2 { n } else { recur(n - 1) + recur(n - 2) }
/// });
/// assert_eq!(fib.call(80), 23_416_728_348_467_685);
/// ```
#[derive(Debug)]
pub struct RecursiveMemoized<A, R, F, C = SystemClock> {
    cache: CacheManager<MemoKey, R, C>,
    func: F,
    _args: PhantomData<fn(A)>,
}

/// Wraps a recursive `func` so that it and its sub-calls share `cache`.
pub fn memoize_recursive<A, R, F, C>(
    cache: CacheManager<MemoKey, R, C>,
    func: F,
) -> RecursiveMemoized<A, R, F, C>
where
    A: MemoArgs,
    R: Clone,
    F: Fn(&mut dyn FnMut(A) -> R, A) -> R,
    C: Clock,
{
    RecursiveMemoized {
        cache,
        func,
        _args: PhantomData,
    }
}

impl<A, R, F, C> RecursiveMemoized<A, R, F, C>
where
    A: MemoArgs,
    R: Clone,
    F: Fn(&mut dyn FnMut(A) -> R, A) -> R,
    C: Clock,
{
    /// Returns the cached result for `args`, computing it (and any
    /// sub-problems not yet cached) on a miss.
    pub fn call(&mut self, args: A) -> R {
        Self::call_with(&mut self.cache, &self.func, args)
    }

    fn call_with(cache: &mut CacheManager<MemoKey, R, C>, func: &F, args: A) -> R {
        let key = args.memo_key();
        if let Some(hit) = cache.get(&key) {
            return hit;
        }

        trace!("Memo miss, computing");
        let result = {
            let recur: &mut dyn FnMut(A) -> R = &mut |inner: A| Self::call_with(cache, func, inner);
            func(recur, args)
        };
        cache.set(key, result.clone());
        result
    }

    pub fn invalidate(&mut self, args: &A) -> bool {
        self.cache.delete(&args.memo_key())
    }

    pub fn cache(&self) -> &CacheManager<MemoKey, R, C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CacheManager<MemoKey, R, C> {
        &mut self.cache
    }

    pub fn into_cache(self) -> CacheManager<MemoKey, R, C> {
        self.cache
    }
}
