//! Memoization Module
//!
//! Function memoization on top of [`CacheManager`](crate::cache::CacheManager),
//! keyed by a type-tagged encoding of the call arguments.

mod key;
mod memoize;

pub use key::{ArgValue, MemoArg, MemoArgs, MemoKey};
pub use memoize::{memoize, memoize_recursive, Memoized, RecursiveMemoized};
