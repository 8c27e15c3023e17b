//! ID generation for posts, comments, ratings and likes.

use ulid::Ulid;

/// ID generator for entities.
///
/// IDs are lowercase ULIDs: 26 characters, and lexicographically ordered by
/// creation time, which lets `id DESC` break ties between rows created in the
/// same timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a new ULID-based ID.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Whether `id` has the shape of an ID produced by [`IdGenerator`].
///
/// Anything else cannot name a stored row, so lookups can answer "not found"
/// without touching the database.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    Ulid::from_string(id).is_ok()
}
