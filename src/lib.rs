//! A library for packing RGBA images into Windows ICO files and parsing them
//! back out.
//!
//! Every image is stored as an uncompressed 32-bpp bitmap: a
//! BITMAPINFOHEADER followed by the pixels in bottom-up BGRA order.  Decoding
//! also accepts PNG-compressed entries.
//!
//! # Example
//!
//! ```
//! let red_pixel = [255u8, 0, 0, 255];
//! let pixels = red_pixel.repeat(16 * 16);
//! let image = icopack::DecodedImage::new(16, 16, pixels).unwrap();
//! let data = icopack::encode(&[image.clone()]).unwrap();
//! assert_eq!(&data[0..6], b"\x00\x00\x01\x00\x01\x00");
//! assert_eq!(icopack::decode(&data).unwrap(), vec![image]);
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmpheader;
mod codec;
pub mod convert;
mod error;
mod icondir;
mod image;

pub use crate::bmpheader::{BitmapInfoHeader, BMP_HEADER_LEN};
pub use crate::codec::{decode, encode, read_ico, write_ico};
pub use crate::error::{IcoError, Result};
pub use crate::icondir::{IconDir, IconDirEntry, ICONDIRENTRY_LEN, ICONDIR_LEN};
pub use crate::image::{DecodedImage, RGBA_BYTES_PER_PIXEL};

//===========================================================================//
