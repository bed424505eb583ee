use crate::api::{ApiError, CmsClient};
use crate::model::{EntityKind, FormMode, Payload};

/// Where a form's submission stands.
///
/// Validation runs synchronously inside the transition out of `Idle`, so it
/// has no state of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Holds the error text shown to the operator.
    Failed(String),
}

impl SubmitState {
    /// `Succeeded` or `Failed`, which wait for a dismiss.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "ready",
            Self::Submitting => "submitting",
            Self::Succeeded => "saved",
            Self::Failed(_) => "failed",
        }
    }
}

/// Why a submission was not sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("a submission is already in progress")]
    InFlight,

    #[error("dismiss the previous result first")]
    Unacknowledged,

    #[error("{0} field(s) need attention")]
    Invalid(usize),

    #[error("{0} is required.")]
    MissingBody(&'static str),
}

/// A validated request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub payload: Payload,
}

impl Submission {
    /// Sends the single POST or PUT for this submission.
    pub async fn send(&self, client: &CmsClient) -> Result<(), ApiError> {
        client.save(self.kind, &self.mode, &self.payload).await
    }
}
