//! Conversion between top-down RGBA buffers and the bottom-up BGRA layout
//! used by the bitmaps embedded in ICO files.

use crate::error::Result;
use crate::image::{DecodedImage, RGBA_BYTES_PER_PIXEL};

//===========================================================================//

/// Converts a top-down, row-major RGBA buffer into a bottom-up BGRA buffer of
/// the same length.  Returns an error if `bytes_per_pixel` isn't 4 or if the
/// buffer length disagrees with the dimensions.
pub fn rgba_to_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
) -> Result<Vec<u8>> {
    flip_and_swap(pixels, width, height, bytes_per_pixel)
}

/// Converts a bottom-up BGRA buffer (as stored in a 32-bpp bitmap) back into
/// a top-down, row-major RGBA buffer.  This undoes `rgba_to_bmp`.
pub fn bmp_to_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
) -> Result<Vec<u8>> {
    // Reversing the rows and swapping red/blue are both their own inverse.
    flip_and_swap(pixels, width, height, bytes_per_pixel)
}

fn flip_and_swap(
    pixels: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
) -> Result<Vec<u8>> {
    if bytes_per_pixel != RGBA_BYTES_PER_PIXEL {
        invalid_format!(
            "Unsupported bytes per pixel (was {}, but must be {})",
            bytes_per_pixel,
            RGBA_BYTES_PER_PIXEL
        );
    }
    let expected_len =
        DecodedImage::expected_len(width, height, bytes_per_pixel);
    if expected_len != Some(pixels.len()) {
        invalid_format!(
            "Invalid pixel data length (was {}, but must be {:?} for {}x{} \
             image)",
            pixels.len(),
            expected_len,
            width,
            height
        );
    }
    let mut output = Vec::<u8>::with_capacity(pixels.len());
    if pixels.is_empty() {
        return Ok(output);
    }
    let row_size = (width as usize) * (bytes_per_pixel as usize);
    for row in pixels.chunks_exact(row_size).rev() {
        for pixel in row.chunks_exact(bytes_per_pixel as usize) {
            let (red, green, blue) = (pixel[0], pixel[1], pixel[2]);
            output.extend_from_slice(&[blue, green, red, pixel[3]]);
        }
    }
    debug_assert_eq!(output.len(), pixels.len());
    Ok(output)
}

//===========================================================================//


//===========================================================================//
