use crate::error::Result;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

//===========================================================================//

/// The only pixel layout this crate packs: one byte each of red, green, blue
/// and alpha.
pub const RGBA_BYTES_PER_PIXEL: u32 = 4;

//===========================================================================//

/// A decoded raster image: dimensions plus a raw pixel buffer in row-major
/// order from top to bottom.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DecodedImage {
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Creates a new RGBA image.  `pixels` must have `4 * width * height`
    /// bytes and be in row-major order from top to bottom.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<DecodedImage> {
        DecodedImage::with_bytes_per_pixel(
            width,
            height,
            RGBA_BYTES_PER_PIXEL,
            pixels,
        )
    }

    /// Creates a new image with an arbitrary number of bytes per pixel.  Only
    /// the buffer length is checked here; encoding an image that isn't RGBA
    /// fails later with `IcoError::InvalidFormat`.
    pub fn with_bytes_per_pixel(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        pixels: Vec<u8>,
    ) -> Result<DecodedImage> {
        let image = DecodedImage { width, height, bytes_per_pixel, pixels };
        image.validate()?;
        Ok(image)
    }

    /// Returns the number of bytes `pixels` must have for these dimensions,
    /// or `None` if that number overflows.
    pub(crate) fn expected_len(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
    ) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(bytes_per_pixel as usize)
    }

    /// Checks that the pixel buffer length matches the declared dimensions.
    pub(crate) fn validate(&self) -> Result<()> {
        let expected = DecodedImage::expected_len(
            self.width,
            self.height,
            self.bytes_per_pixel,
        );
        match expected {
            Some(len) if len == self.pixels.len() => {}
            Some(len) => invalid_format!(
                "Invalid pixel data length (was {}, but must be {} for \
                 {}x{} image at {} bytes per pixel)",
                self.pixels.len(),
                len,
                self.width,
                self.height,
                self.bytes_per_pixel
            ),
            None => invalid_format!(
                "Image dimensions {}x{} are too large",
                self.width,
                self.height
            ),
        }
        Ok(())
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of bytes used for each pixel (4 for RGBA).
    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    /// Returns the pixel data, in row-major order from top to bottom.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Decodes an image from a PNG file, converting it to 8-bit RGBA.
    pub fn read_png<R: Read>(reader: R) -> Result<DecodedImage> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => invalid_format!("Malformed PNG data: {}", error),
        };
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = match png_reader.next_frame(&mut buffer) {
            Ok(frame) => frame,
            Err(error) => invalid_format!("Malformed PNG data: {}", error),
        };
        buffer.truncate(frame.buffer_size());
        let rgba = match frame.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
                for rgb in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(rgb);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for pair in buffer.chunks_exact(2) {
                    let (gray, alpha) = (pair[0], pair[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for &gray in buffer.iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                // EXPAND should have resolved the palette already.
                invalid_format!("Unexpanded indexed PNG data");
            }
        };
        DecodedImage::new(frame.width, frame.height, rgba)
    }

    /// Encodes the image as an 8-bit RGBA PNG file.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        if self.bytes_per_pixel != RGBA_BYTES_PER_PIXEL {
            invalid_format!(
                "Only RGBA images can be written as PNG (image has {} bytes \
                 per pixel)",
                self.bytes_per_pixel
            );
        }
        match self.write_png_enc(writer) {
            Ok(()) => Ok(()),
            Err(png::EncodingError::IoError(error)) => Err(error.into()),
            Err(error) => invalid_format!("PNG encoding error: {}", error),
        }
    }

    fn write_png_enc<W: Write>(
        &self,
        writer: W,
    ) -> std::result::Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()
    }
}

//===========================================================================//


//===========================================================================//
