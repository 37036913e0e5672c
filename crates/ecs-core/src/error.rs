use thiserror::Error;

pub type EcsResult<T> = Result<T, EcsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown handle: {what} {id}")]
    UnknownHandle { what: &'static str, id: crate::Id },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
