use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FractalError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width : f64, height : f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<FractalError> for std::io::Error {
    fn from(err : FractalError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string())
    }
}
