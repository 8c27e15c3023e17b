//! Common utilities and shared types for murmur.
//!
//! This crate provides foundational components used across all murmur crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Sessions**: The opaque client identity via [`SessionId`]
//! - **Ratings**: The 1-5 / 0-100 rating scale arithmetic in [`rating`]
//!
//! # Example
//!
//! ```no_run
//! use murmur_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Listening on port {} with id {}", config.server.port, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod rating;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, is_valid_id};
pub use rating::{RatingSummary, ScaledRating};
pub use session::{SESSION_HEADER, SessionId};
