use thiserror::Error;

pub type AblResult<T> = Result<T, AblError>;

#[derive(Error, Debug)]
pub enum AblError {
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },
}
