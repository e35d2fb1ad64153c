use crate::error::{IcoError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const ICONDIR_LEN: u32 = 6;

/// The size of one ICONDIRENTRY struct, in bytes.
pub const ICONDIRENTRY_LEN: u32 = 16;

// The resource type number for icons (cursors would be 2).
const ICON_RESOURCE_TYPE: u16 = 1;

//===========================================================================//

/// The header and directory of an ICO file: everything that precedes the
/// image blocks.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a directory from a list of entries, in file order.
    pub fn new(entries: Vec<IconDirEntry>) -> IconDir {
        IconDir { entries }
    }

    /// Returns the entries in this directory, in file order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Returns the number of images the header declares.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of bytes taken by the header and directory, which
    /// is also the offset of the first image block.
    pub fn len_in_bytes(&self) -> u32 {
        ICONDIR_LEN + ICONDIRENTRY_LEN * self.entries.len() as u32
    }

    /// Lays out a directory for images of the given sizes, each stored as a
    /// block of `block_sizes[i]` bytes directly after the previous one.
    /// `dimensions[i]` is the `(width, height)` of image `i`.
    pub(crate) fn layout(
        dimensions: &[(u32, u32)],
        bits_per_pixel: u16,
        block_sizes: &[u32],
    ) -> Result<IconDir> {
        debug_assert_eq!(dimensions.len(), block_sizes.len());
        if dimensions.len() > (u16::MAX as usize) {
            return Err(IcoError::TooManyImages(dimensions.len()));
        }
        let mut data_offset =
            ICONDIR_LEN + ICONDIRENTRY_LEN * (dimensions.len() as u32);
        let mut entries = Vec::with_capacity(dimensions.len());
        for (&(width, height), &data_size) in
            dimensions.iter().zip(block_sizes.iter())
        {
            let entry = IconDirEntry {
                width: dimension_byte(width, height, width)?,
                height: dimension_byte(width, height, height)?,
                num_colors: 0,
                color_planes: 1,
                bits_per_pixel,
                data_size,
                data_offset,
            };
            log::trace!(
                "Laid out {}x{} entry: {} bytes at offset {}",
                width,
                height,
                data_size,
                data_offset
            );
            data_offset = match data_offset.checked_add(data_size) {
                Some(offset) => offset,
                None => invalid_format!("ICO file would exceed 4 GiB"),
            };
            entries.push(entry);
        }
        Ok(IconDir { entries })
    }

    /// Reads the header and directory of an ICO file, leaving the reader
    /// positioned at the end of the directory.
    pub fn read<R: Read>(mut reader: R) -> Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            malformed_header!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_RESOURCE_TYPE {
            malformed_header!(
                "Invalid resource type (was {}, but must be {})",
                restype,
                ICON_RESOURCE_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width = reader.read_u8()?;
            let height = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                malformed_header!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let entry = IconDirEntry {
                width,
                height,
                num_colors,
                color_planes: reader.read_u16::<LittleEndian>()?,
                bits_per_pixel: reader.read_u16::<LittleEndian>()?,
                data_size: reader.read_u32::<LittleEndian>()?,
                data_offset: reader.read_u32::<LittleEndian>()?,
            };
            entries.push(entry);
        }
        log::debug!("Read ICO directory with {} entries", entries.len());
        Ok(IconDir { entries })
    }

    /// Writes the header and directory.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.entries.len() > (u16::MAX as usize) {
            return Err(IcoError::TooManyImages(self.entries.len()));
        }
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        for entry in self.entries.iter() {
            writer.write_u8(entry.width)?;
            writer.write_u8(entry.height)?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.color_planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            writer.write_u32::<LittleEndian>(entry.data_size)?;
            writer.write_u32::<LittleEndian>(entry.data_offset)?;
        }
        Ok(())
    }
}

// The ICONDIRENTRY struct uses only one byte each for width and height, with
// a byte of zero meaning exactly 256.
fn dimension_byte(width: u32, height: u32, value: u32) -> Result<u8> {
    match value {
        1..=255 => Ok(value as u8),
        256 => Ok(0),
        _ => Err(IcoError::DimensionOutOfRange { width, height }),
    }
}

//===========================================================================//

/// One ICONDIRENTRY: the size, color depth and location of a single image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDirEntry {
    width: u8,
    height: u8,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_size: u32,
    data_offset: u32,
}

impl IconDirEntry {
    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        if self.width == 0 {
            256
        } else {
            self.width as u32
        }
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        if self.height == 0 {
            256
        } else {
            self.height as u32
        }
    }

    /// Returns the raw width byte, where zero stands for 256 (or, in files
    /// written by newer encoders, any size of at least 256).
    pub fn width_byte(&self) -> u8 {
        self.width
    }

    /// Returns the raw height byte; see `width_byte`.
    pub fn height_byte(&self) -> u8 {
        self.height
    }

    /// Returns the number of palette colors, or zero if there's no palette.
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel (color depth) of the image.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the length of the image block, in bytes.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Returns the offset of the image block from the start of the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{IconDir, IconDirEntry};
    use crate::error::IcoError;

    #[test]
    fn read_empty_icon_set() {
        let input: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        let icondir = IconDir::read(input).unwrap();
        assert_eq!(icondir.count(), 0);
    }

    #[test]
    fn write_empty_icon_set() {
        let icondir = IconDir::default();
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn read_cursor_set_is_malformed() {
        let input: &[u8] = b"\x00\x00\x02\x00\x00\x00";
        assert!(matches!(
            IconDir::read(input),
            Err(IcoError::MalformedHeader(_))
        ));
    }

    #[test]
    fn read_nonzero_reserved_is_malformed() {
        let input: &[u8] = b"\x01\x00\x01\x00\x00\x00";
        assert!(matches!(
            IconDir::read(input),
            Err(IcoError::MalformedHeader(_))
        ));
    }

    #[test]
    fn read_truncated_directory() {
        let input: &[u8] = b"\x00\x00\x01\x00\x02\x00\x10\x10\x00\x00";
        assert!(matches!(
            IconDir::read(input),
            Err(IcoError::TruncatedData(_))
        ));
    }

    #[test]
    fn layout_offsets_are_contiguous() {
        let icondir =
            IconDir::layout(&[(16, 16), (32, 32)], 32, &[1064, 4136]).unwrap();
        assert_eq!(icondir.len_in_bytes(), 38);
        let entries = icondir.entries();
        assert_eq!(entries[0].data_offset(), 38);
        assert_eq!(entries[1].data_offset(), 38 + 1064);
        assert_eq!(entries[1].data_size(), 4136);
    }

    #[test]
    fn layout_encodes_256_as_zero() {
        let icondir =
            IconDir::layout(&[(256, 256), (255, 255)], 32, &[40, 40]).unwrap();
        let entries: &[IconDirEntry] = icondir.entries();
        assert_eq!(entries[0].width_byte(), 0);
        assert_eq!(entries[0].height_byte(), 0);
        assert_eq!(entries[0].width(), 256);
        assert_eq!(entries[0].height(), 256);
        assert_eq!(entries[1].width_byte(), 255);
        assert_eq!(entries[1].height_byte(), 255);
    }

    #[test]
    fn layout_rejects_unrepresentable_sizes() {
        for &(width, height) in &[(257, 16), (16, 300), (0, 16), (16, 0)] {
            match IconDir::layout(&[(width, height)], 32, &[40]) {
                Err(IcoError::DimensionOutOfRange { width: w, height: h }) => {
                    assert_eq!((w, h), (width, height));
                }
                other => panic!("Unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn directory_round_trip() {
        let icondir = IconDir::layout(&[(48, 48)], 32, &[9256]).unwrap();
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        assert_eq!(output.len(), 22);
        let expected: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \x30\x30\x00\x00\x01\x00\x20\x00\
            \x28\x24\x00\x00\x16\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
        assert_eq!(IconDir::read(output.as_slice()).unwrap(), icondir);
    }
}

//===========================================================================//
