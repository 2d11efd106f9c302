use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, RasterError>;
