use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Incompatible units {left} and {right}")]
    IncompatibleUnit { left: String, right: String },

    #[error("System {system} must have exactly one canonical member, found {found}")]
    NoCanonicalPrefix { system: String, found: usize },

    #[error("{0}")]
    InvalidOperation(String),

    //==================================================
    // Persistence errors
    //==================================================
    #[error("{0}")]
    DecodeError(String),

    #[error("{0}")]
    FileError(String),
}

pub type UnitResult<T> = Result<T, UnitError>;
