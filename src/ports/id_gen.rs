//! ID generator port for producing unique identifiers.

/// Generates unique identifiers for locally created records such as
/// notification history entries.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
