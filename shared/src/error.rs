use thiserror::Error;

use crate::model::Screen;

/// Rejected user input. Never surfaced to the citizen; the update loop logs it
/// and leaves the state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("phone number must have {expected} digits, got {len}")]
    PhoneLength { len: usize, expected: usize },
    #[error("verification code must have {expected} digits, got {len}")]
    OtpLength { len: usize, expected: usize },
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("photo reference rejected: {0}")]
    InvalidPhoto(String),
}

/// A state machine refused an action in its current state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("action `{action}` is not available on {screen:?}")]
    NotOnScreen { action: &'static str, screen: Screen },
    #[error("action `{0}` is not available in the current login step")]
    WrongStep(&'static str),
    #[error("a verification code is already being sent")]
    SendInFlight,
    #[error("resend is locked for another {remaining_secs}s")]
    CooldownActive { remaining_secs: u32 },
    #[error("phone number already verified")]
    AlreadyVerified,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub type PortalResult<T> = Result<T, PortalError>;
