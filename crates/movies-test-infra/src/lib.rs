//! Test infrastructure for the Movies workspace.
//!
//! Disposable database containers for integration tests, plus the
//! [`contract`] checks every [`MoviesStore`](movies_core::MoviesStore)
//! backend has to pass.

pub mod contract;
pub mod error;
pub mod mongo;
pub mod mysql;
pub mod postgres;

pub use error::{Result, TestInfraError};
