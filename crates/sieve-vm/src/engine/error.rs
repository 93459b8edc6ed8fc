//! Errors that can occur during matching.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Rule calls nested deeper than the configured limit were pruned, so
    /// the outcome may miss matches.
    #[error("recursion limit of {0} nested calls exceeded")]
    RecursionLimitExceeded(u32),
}
