//! Domain model types (pure).

pub mod calculation;
pub mod error;
pub mod history_entry;
pub mod messages;
pub mod outcome;

// Re-export for convenience
pub use calculation::Calculation;
pub use error::{AppError, HistoryReadError, HistoryWriteError, RoundError};
pub use history_entry::HistoryEntry;
pub use messages::Messages;
pub use outcome::EvaluationOutcome;
