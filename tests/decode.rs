extern crate icopack;

use icopack::{DecodedImage, IcoError};
use std::io::Cursor;

//===========================================================================//

fn patterned_image(width: u32, height: u32) -> DecodedImage {
    let mut pixels = Vec::<u8>::new();
    for index in 0..(width * height) {
        pixels.extend_from_slice(&[
            (index % 251) as u8,
            (index / 251) as u8,
            (index * 3) as u8,
            (255 - index % 256) as u8,
        ]);
    }
    DecodedImage::new(width, height, pixels).unwrap()
}

//===========================================================================//

#[test]
fn round_trip_favicon_sizes() {
    let images: Vec<DecodedImage> = [16, 24, 32, 48, 64, 128, 256]
        .iter()
        .map(|&size| patterned_image(size, size))
        .collect();
    let data = icopack::encode(&images).unwrap();
    let decoded = icopack::decode(&data).unwrap();
    assert_eq!(decoded, images);
}

#[test]
fn round_trip_non_square_images() {
    let images = vec![patterned_image(5, 3), patterned_image(1, 200)];
    let data = icopack::encode(&images).unwrap();
    assert_eq!(icopack::decode(&data).unwrap(), images);
}

#[test]
fn read_ico_from_stream() {
    let images = vec![patterned_image(7, 9)];
    let mut file = Vec::<u8>::new();
    icopack::write_ico(&images, &mut file).unwrap();
    let decoded = icopack::read_ico(Cursor::new(file)).unwrap();
    assert_eq!(decoded, images);
}

#[test]
fn decode_read_bmp_32bpp_icon() {
    // A 2x2 icon from another encoder, with an AND mask after the colors.
    let input: &[u8] = b"\
        \x00\x00\x01\x00\x01\x00\
        \
        \x02\x02\x00\x00\x01\x00\x20\x00\
        \x40\x00\x00\x00\x16\x00\x00\x00\
        \
        \x28\x00\x00\x00\x02\x00\x00\x00\x04\x00\x00\x00\
        \x01\x00\x20\x00\x00\x00\x00\x00\x10\x00\x00\x00\
        \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
        \x00\x00\x00\x00\
        \
        \xff\x00\x00\xff\x00\xff\x00\xff\
        \x00\x00\xff\xff\xff\xff\xff\x00\
        \
        \x40\x00\x00\x00\
        \x00\x00\x00\x00";
    let images = icopack::decode(input).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].width(), 2);
    assert_eq!(images[0].height(), 2);
    let rgba: &[u8] = b"\
        \xff\x00\x00\xff\xff\xff\xff\x00\
        \x00\x00\xff\xff\x00\xff\x00\xff";
    assert_eq!(images[0].pixels(), rgba);
}

#[test]
fn decode_wrong_reserved_field() {
    let mut data = icopack::encode(&[patterned_image(4, 4)]).unwrap();
    data[0] = 1;
    match icopack::decode(&data) {
        Err(IcoError::MalformedHeader(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn decode_cursor_file() {
    let mut data = icopack::encode(&[patterned_image(4, 4)]).unwrap();
    data[2] = 2;
    match icopack::decode(&data) {
        Err(IcoError::MalformedHeader(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn decode_offset_past_end() {
    let mut data = icopack::encode(&[patterned_image(4, 4)]).unwrap();
    data[18] = 0xff; // low byte of the data offset
    match icopack::decode(&data) {
        Err(IcoError::TruncatedData(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn decode_header_only() {
    match icopack::decode(b"\x00\x00\x01") {
        Err(IcoError::TruncatedData(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn decode_missing_directory_entries() {
    let data = icopack::encode(&[patterned_image(4, 4)]).unwrap();
    match icopack::decode(&data[..20]) {
        Err(IcoError::TruncatedData(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn decode_empty_directory() {
    let images = icopack::decode(b"\x00\x00\x01\x00\x00\x00").unwrap();
    assert!(images.is_empty());
}

//===========================================================================//
