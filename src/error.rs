use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("shape error: {0}")]
    Shape(String),

    #[error("numeric domain error in row {row}: {reason}")]
    NumericDomain { row: usize, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;

impl From<ndarray::ShapeError> for GeoError {
    fn from(err: ndarray::ShapeError) -> Self {
        GeoError::Shape(err.to_string())
    }
}
