use crate::bmpheader::{BitmapInfoHeader, BMP_HEADER_LEN};
use crate::convert::{bmp_to_rgba, rgba_to_bmp};
use crate::error::{IcoError, Result};
use crate::icondir::{IconDir, IconDirEntry};
use crate::image::{DecodedImage, RGBA_BYTES_PER_PIXEL};
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::io::{Read, Write};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

/// Packs the images into an ICO file, in the order given.  Each image is
/// stored as an uncompressed 32-bpp bitmap.
///
/// Fails with `IcoError::EmptyInput` if `images` is empty,
/// `IcoError::InvalidFormat` if an image isn't RGBA or its pixel buffer
/// disagrees with its dimensions, and `IcoError::DimensionOutOfRange` if a
/// side isn't between 1 and 256 pixels.
pub fn encode(images: &[DecodedImage]) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(IcoError::EmptyInput);
    }
    for image in images.iter() {
        image.validate()?;
    }
    let payloads = convert_all(images)?;
    let bits_per_pixel = (RGBA_BYTES_PER_PIXEL * 8) as u16;
    let dimensions: Vec<(u32, u32)> =
        images.iter().map(|image| (image.width(), image.height())).collect();
    let mut block_sizes = Vec::with_capacity(payloads.len());
    for payload in payloads.iter() {
        match u32::try_from(payload.len()) {
            Ok(len) if len <= u32::MAX - BMP_HEADER_LEN => {
                block_sizes.push(BMP_HEADER_LEN + len)
            }
            _ => invalid_format!("Image data is too large for an ICO file"),
        }
    }
    let icondir = IconDir::layout(&dimensions, bits_per_pixel, &block_sizes)?;
    let total_len = block_sizes.iter().fold(
        icondir.len_in_bytes() as usize,
        |sum, &size| sum + size as usize,
    );
    log::debug!(
        "Encoding {} images into a {}-byte ICO file",
        images.len(),
        total_len
    );

    let mut data = Vec::<u8>::with_capacity(total_len);
    icondir.write(&mut data)?;
    for ((image, payload), entry) in
        images.iter().zip(payloads.iter()).zip(icondir.entries().iter())
    {
        debug_assert_eq!(data.len(), entry.data_offset() as usize);
        let header = BitmapInfoHeader::for_image(
            image.width(),
            image.height(),
            bits_per_pixel,
            payload.len() as u32,
        );
        header.write(&mut data)?;
        data.extend_from_slice(payload);
    }
    debug_assert_eq!(data.len(), total_len);
    Ok(data)
}

/// Converts each image's pixels into the bitmap layout, keeping input order.
#[cfg(feature = "threads")]
fn convert_all(images: &[DecodedImage]) -> Result<Vec<Vec<u8>>> {
    images.par_iter().map(convert_one).collect()
}

/// Converts each image's pixels into the bitmap layout, keeping input order.
#[cfg(not(feature = "threads"))]
fn convert_all(images: &[DecodedImage]) -> Result<Vec<Vec<u8>>> {
    images.iter().map(convert_one).collect()
}

fn convert_one(image: &DecodedImage) -> Result<Vec<u8>> {
    rgba_to_bmp(
        image.pixels(),
        image.width(),
        image.height(),
        image.bytes_per_pixel(),
    )
}

/// Encodes the images (see `encode`) and writes the ICO file out.
pub fn write_ico<W: Write>(
    images: &[DecodedImage],
    mut writer: W,
) -> Result<()> {
    let data = encode(images)?;
    writer.write_all(&data)?;
    Ok(())
}

//===========================================================================//

/// Parses an ICO file back into its images, in directory order.
///
/// Fails with `IcoError::MalformedHeader` if the header sentinels are wrong
/// and `IcoError::TruncatedData` if a declared structure or image block runs
/// past the end of `data`.
pub fn decode(data: &[u8]) -> Result<Vec<DecodedImage>> {
    let icondir = IconDir::read(data)?;
    log::debug!("Decoding {} images from ICO file", icondir.count());
    let mut images = Vec::with_capacity(icondir.count());
    for (index, entry) in icondir.entries().iter().enumerate() {
        let start = entry.data_offset() as usize;
        let end = match start.checked_add(entry.data_size() as usize) {
            Some(end) if end <= data.len() => end,
            _ => truncated_data!(
                "Image {} spans bytes {}..{}+{}, but file has only {} bytes",
                index,
                start,
                start,
                entry.data_size(),
                data.len()
            ),
        };
        let image = decode_entry(entry, &data[start..end])?;
        log::trace!(
            "Decoded image {}: {}x{}",
            index,
            image.width(),
            image.height()
        );
        images.push(image);
    }
    Ok(images)
}

/// Reads an entire ICO file from the reader and decodes it (see `decode`).
pub fn read_ico<R: Read>(mut reader: R) -> Result<Vec<DecodedImage>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode(&data)
}

fn decode_entry(entry: &IconDirEntry, block: &[u8]) -> Result<DecodedImage> {
    let image = if block.starts_with(PNG_SIGNATURE) {
        DecodedImage::read_png(block)?
    } else {
        decode_bmp(block)?
    };
    // A zero byte stands for 256, or for any larger size in newer files, so
    // only nonzero bytes can be checked against the embedded image.
    let width_ok =
        entry.width_byte() == 0 || entry.width() == image.width();
    let height_ok =
        entry.height_byte() == 0 || entry.height() == image.height();
    if !width_ok || !height_ok {
        invalid_format!(
            "Encoded image has wrong dimensions \
             (was {}x{}, but should be {}x{})",
            image.width(),
            image.height(),
            entry.width(),
            entry.height()
        );
    }
    Ok(image)
}

fn decode_bmp(block: &[u8]) -> Result<DecodedImage> {
    let header = BitmapInfoHeader::read(block)?;
    if header.bits_per_pixel != 32 {
        invalid_format!(
            "Unsupported BMP bits-per-pixel (was {}, but must be 32)",
            header.bits_per_pixel
        );
    }
    if header.compression != 0 {
        invalid_format!(
            "Unsupported BMP compression method ({})",
            header.compression
        );
    }
    let width = header.image_width();
    let height = header.image_height();
    let pixel_len = match DecodedImage::expected_len(
        width,
        height,
        RGBA_BYTES_PER_PIXEL,
    ) {
        Some(len) => len,
        None => {
            invalid_format!("BMP dimensions {}x{} are too large", width, height)
        }
    };
    // Anything past the color data (such as an AND mask written by other
    // encoders) is ignored.
    let payload = &block[BMP_HEADER_LEN as usize..];
    if payload.len() < pixel_len {
        truncated_data!(
            "BMP pixel data has {} bytes, but {}x{} image needs {}",
            payload.len(),
            width,
            height,
            pixel_len
        );
    }
    let rgba = bmp_to_rgba(
        &payload[..pixel_len],
        width,
        height,
        RGBA_BYTES_PER_PIXEL,
    )?;
    DecodedImage::new(width, height, rgba)
}

//===========================================================================//


//===========================================================================//
