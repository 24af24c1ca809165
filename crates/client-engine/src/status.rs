//! Operation status shared by both stores.

/// Lifecycle phase of the most recent operation against a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpPhase {
    /// No operation outcome pending; new operations start cleanly from here.
    #[default]
    Idle,
    /// An operation is in flight.
    Loading,
    /// The last operation settled successfully.
    Succeeded,
    /// The last operation settled with a failure.
    Failed,
}

/// Status of the most recent async operation, one instance per store.
///
/// After a transition settles, exactly one of Loading/Succeeded/Failed
/// holds; `message` is set only for failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationStatus {
    /// Current phase.
    pub phase: OpPhase,
    /// Human-readable failure message, if any.
    pub message: Option<String>,
}

impl OperationStatus {
    /// Idle status with no message.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Loading status.
    pub fn loading() -> Self {
        Self {
            phase: OpPhase::Loading,
            message: None,
        }
    }

    /// Succeeded status.
    pub fn succeeded() -> Self {
        Self {
            phase: OpPhase::Succeeded,
            message: None,
        }
    }

    /// Failed status with a message for the user.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            phase: OpPhase::Failed,
            message: Some(message.into()),
        }
    }

    /// Whether an operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == OpPhase::Loading
    }

    /// Whether the last operation failed.
    pub fn is_failed(&self) -> bool {
        self.phase == OpPhase::Failed
    }
}
