use std::io;
use thiserror::Error;

//===========================================================================//

/// Errors that can occur while packing or unpacking an ICO file.
#[derive(Error, Debug)]
pub enum IcoError {
    /// A pixel buffer disagrees with its declared dimensions, or the data
    /// uses a pixel format this crate can't handle.
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),
    /// An image dimension can't be stored in the one-byte directory field.
    #[error(
        "Image dimensions out of range (was {width}x{height}, but each side \
         must be between 1 and 256)"
    )]
    DimensionOutOfRange {
        /// The offending image's width, in pixels.
        width: u32,
        /// The offending image's height, in pixels.
        height: u32,
    },
    /// No images were given to encode.
    #[error("Can't encode an ICO file with no images")]
    EmptyInput,
    /// More images were given than the header's count field can hold.
    #[error("Too many images (was {0}, but max is 65535)")]
    TooManyImages(usize),
    /// The ICO header or a directory entry has an invalid sentinel value.
    #[error("Malformed ICO header: {0}")]
    MalformedHeader(String),
    /// The data ends before a declared structure or payload does.
    #[error("Truncated ICO data: {0}")]
    TruncatedData(String),
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for IcoError {
    fn from(error: io::Error) -> IcoError {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            IcoError::TruncatedData(error.to_string())
        } else {
            IcoError::Io(error)
        }
    }
}

/// Result type returned by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, IcoError>;

//===========================================================================//


//===========================================================================//
