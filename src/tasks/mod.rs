//! Background Tasks Module
//!
//! Optional tokio tasks that run alongside a shared cache.
//!
//! # Tasks
//! - Sweep: removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::spawn_sweep_task;
