use crate::error::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

//===========================================================================//

/// The size of a BITMAPINFOHEADER struct, in bytes.
pub const BMP_HEADER_LEN: u32 = 40;

//===========================================================================//

/// The BITMAPINFOHEADER struct that starts each bitmap image block in an ICO
/// file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct BitmapInfoHeader {
    /// Size of this header; always 40.
    pub header_size: u32,
    /// Image width, in pixels.
    pub width: i32,
    /// Twice the image height, counting the rows of both the color data and
    /// the (possibly absent) AND mask.
    pub height: i32,
    /// Number of color planes; always 1.
    pub color_planes: u16,
    /// Color depth of the pixel data.
    pub bits_per_pixel: u16,
    /// Compression method; 0 means uncompressed.
    pub compression: u32,
    /// Length of the pixel data that follows, in bytes.
    pub image_data_size: u32,
    /// Horizontal resolution.
    pub x_pixels_per_meter: i32,
    /// Vertical resolution.
    pub y_pixels_per_meter: i32,
    /// Number of palette colors used.
    pub colors_used: u32,
    /// Number of palette colors that are important.
    pub colors_important: u32,
}

impl BitmapInfoHeader {
    /// Builds the header for an uncompressed image block with the given
    /// logical dimensions.
    pub fn for_image(
        width: u32,
        height: u32,
        bits_per_pixel: u16,
        image_data_size: u32,
    ) -> BitmapInfoHeader {
        BitmapInfoHeader {
            header_size: BMP_HEADER_LEN,
            width: width as i32,
            height: 2 * height as i32,
            color_planes: 1,
            bits_per_pixel,
            compression: 0,
            image_data_size,
            x_pixels_per_meter: 0,
            y_pixels_per_meter: 0,
            colors_used: 0,
            colors_important: 0,
        }
    }

    /// Returns the logical width of the image, in pixels.
    pub fn image_width(&self) -> u32 {
        self.width as u32
    }

    /// Returns the logical height of the image, undoing the doubling.
    pub fn image_height(&self) -> u32 {
        (self.height / 2) as u32
    }

    /// Reads and validates a header.
    pub fn read<R: Read>(mut reader: R) -> Result<BitmapInfoHeader> {
        let header_size = reader.read_u32::<LittleEndian>()?;
        if header_size != BMP_HEADER_LEN {
            invalid_format!(
                "Invalid BMP header size (was {}, must be {})",
                header_size,
                BMP_HEADER_LEN
            );
        }
        let width = reader.read_i32::<LittleEndian>()?;
        if width < 0 {
            invalid_format!("Invalid BMP width (was {})", width);
        }
        let height = reader.read_i32::<LittleEndian>()?;
        if height < 0 || height % 2 != 0 {
            // The height is stored doubled, counting the rows of both the
            // color data and the alpha mask, so it should be divisible by 2.
            invalid_format!(
                "Invalid height field in BMP header \
                 (was {}, but must be non-negative and divisible by 2)",
                height
            );
        }
        let header = BitmapInfoHeader {
            header_size,
            width,
            height,
            color_planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            compression: reader.read_u32::<LittleEndian>()?,
            image_data_size: reader.read_u32::<LittleEndian>()?,
            x_pixels_per_meter: reader.read_i32::<LittleEndian>()?,
            y_pixels_per_meter: reader.read_i32::<LittleEndian>()?,
            colors_used: reader.read_u32::<LittleEndian>()?,
            colors_important: reader.read_u32::<LittleEndian>()?,
        };
        Ok(header)
    }

    /// Writes the header as 40 little-endian bytes.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.header_size)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.image_data_size)?;
        writer.write_i32::<LittleEndian>(self.x_pixels_per_meter)?;
        writer.write_i32::<LittleEndian>(self.y_pixels_per_meter)?;
        writer.write_u32::<LittleEndian>(self.colors_used)?;
        writer.write_u32::<LittleEndian>(self.colors_important)?;
        Ok(())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{BitmapInfoHeader, BMP_HEADER_LEN};
    use crate::error::IcoError;

    #[test]
    fn write_header_for_16x16_image() {
        let header = BitmapInfoHeader::for_image(16, 16, 32, 1024);
        let mut output = Vec::<u8>::new();
        header.write(&mut output).unwrap();
        assert_eq!(output.len(), BMP_HEADER_LEN as usize);
        let expected: &[u8] = b"\
            \x28\x00\x00\x00\x10\x00\x00\x00\x20\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x00\x04\x00\x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn read_header_undoes_height_doubling() {
        let input: &[u8] = b"\
            \x28\x00\x00\x00\x05\x00\x00\x00\x06\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x3c\x00\x00\x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00";
        let header = BitmapInfoHeader::read(input).unwrap();
        assert_eq!(header.image_width(), 5);
        assert_eq!(header.image_height(), 3);
        assert_eq!(header.bits_per_pixel, 32);
        assert_eq!(header.image_data_size, 60);
        assert_eq!(header, BitmapInfoHeader::for_image(5, 3, 32, 60));
    }

    #[test]
    fn read_header_with_wrong_size() {
        let input: &[u8] = b"\x0c\x00\x00\x00\x05\x00\x00\x00\x06\x00\x00\x00";
        assert!(matches!(
            BitmapInfoHeader::read(input),
            Err(IcoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn read_header_with_odd_height() {
        let input: &[u8] = b"\x28\x00\x00\x00\x05\x00\x00\x00\x07\x00\x00\x00";
        assert!(matches!(
            BitmapInfoHeader::read(input),
            Err(IcoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn read_truncated_header() {
        let input: &[u8] = b"\x28\x00\x00\x00\x05\x00\x00\x00\x06\x00\x00\x00";
        assert!(matches!(
            BitmapInfoHeader::read(input),
            Err(IcoError::TruncatedData(_))
        ));
    }
}

//===========================================================================//
