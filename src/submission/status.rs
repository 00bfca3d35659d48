//! SubmissionStatus and its transition rules.

/// Lifecycle of the current submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    /// Nothing submitted yet, or the last error was cleared.
    #[default]
    Idle,
    /// A request has been dispatched and has not completed.
    InFlight,
    /// The last submission produced a result.
    Succeeded,
    /// The last submission failed.
    Failed { reason: String },
}

/// Inputs that drive [`SubmissionStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Dispatch,
    Succeed,
    Fail(String),
    ClearError,
}

impl SubmissionStatus {
    /// Pure transition function.
    ///
    /// - `Dispatch` moves any state except `InFlight` to `InFlight`.
    /// - `Succeed`/`Fail` apply only while `InFlight`.
    /// - `ClearError` moves `Failed` back to `Idle`.
    ///
    /// Every other combination leaves the state unchanged.
    pub fn transition(&self, event: StatusEvent) -> SubmissionStatus {
        match (self, event) {
            (_, StatusEvent::Dispatch) => SubmissionStatus::InFlight,
            (SubmissionStatus::InFlight, StatusEvent::Succeed) => SubmissionStatus::Succeeded,
            (SubmissionStatus::InFlight, StatusEvent::Fail(reason)) => {
                SubmissionStatus::Failed { reason }
            }
            (SubmissionStatus::Failed { .. }, StatusEvent::ClearError) => SubmissionStatus::Idle,
            (current, _) => current.clone(),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionStatus::InFlight)
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}
