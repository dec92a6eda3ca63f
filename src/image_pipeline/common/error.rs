use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Invalid DDS header: {0}")]
    InvalidHeader(String),
    
    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),
    
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),
    
    #[error("Image dimensions must be non-zero multiples of 4: width={width}, height={height}")]
    MalformedGeometry { width: usize, height: usize },
    
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    
    #[error("Compressed stream ended early: needed {needed} bytes, {available} available")]
    StreamUnderrun { needed: usize, available: usize },
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
