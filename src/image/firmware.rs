use super::{Image, HEADER_OFFSET, SEARCH_RTN_OFFSET};
use crate::directive::PageBase;

// EPROM header: the 5 magic bytes identifying the exception EPROM,
// the new-parameters data, and the routine that installs those parameters
pub const HEADER: [u8; 163] = [
    0x80, 0x48, 0x28, 0x58, 0x85, 0xE0, 0x35, 0xE0, //
    0x31, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0xFF, 0xFF, 0x1E, 0x1F, 0x20, 0x21, 0x28, //
    0x29, 0x24, 0x25, 0x22, 0x23, 0x2A, 0x2B, 0x26, //
    0x27, 0x2C, 0x2D, 0x2E, 0x2F, 0x32, 0x33, 0x34, //
    0x35, 0x36, 0xE0, 0x65, 0x78, 0x02, 0x31, 0x8E, //
    0xF1, 0x43, 0xC5, 0xAA, 0x00, 0x09, 0x2D, 0xFF, //
    0xE2, 0x1E, 0xB8, 0xAA, 0x00, 0x23, 0xD5, 0x12, //
    0xD0, 0x13, 0xB9, 0x9B, 0x13, 0xC3, 0xAA, 0x00, //
    0x09, 0x2D, 0xFF, 0xE2, 0x0B, 0xB8, 0xAA, 0x00, //
    0x23, 0xD5, 0x12, 0xD0, 0x13, 0xB9, 0x9B, 0x13, //
    0x5D, 0x16, 0xE6, 0xE9, 0xC3, 0xAA, 0x00, 0x09, //
    0x2D, 0xFF, 0xE2, 0x14, 0xA2, 0x40, 0x11, 0x82, //
    0x11, 0xA2, 0x15, 0x11, 0xC3, 0xAA, 0x00, 0x09, //
    0x82, 0x15, 0xC3, 0xAA, 0x00, 0x09, 0x82, 0x14, //
    0x98, 0x29, 0x03, 0x98, 0x2B, 0x07, 0x22, 0x20, //
    0x9B, 0x03, 0x8E, 0xF7, 0x2B, 0x98, 0x03, 0x05, //
    0x98, 0x07, 0x09, 0x98, 0x03, 0x19, 0x8C, 0xF1, //
    0x00, 0xE0, 0x36,
];

// image addresses within the header that need the page high byte added
const HEADER_RELOCS: [usize; 7] = [0x0044, 0x004C, 0x0057, 0x005F, 0x006E, 0x007E, 0x0084];

// the routine the CTS256 uses to search the exception-word EPROM
pub const SEARCH_RTN: [u8; 186] = [
    0xD8, 0x02, 0xD8, 0x03, 0x98, 0x03, 0x11, 0x8E, //
    0xF7, 0x4B, 0x8E, 0xF7, 0x0F, 0x77, 0x01, 0x0A, //
    0x05, 0x74, 0x80, 0x0B, 0xE0, 0x03, 0x73, 0x7F, //
    0x0B, 0x8E, 0xF3, 0xAF, 0x76, 0x20, 0x0A, 0x0E, //
    0x52, 0x34, 0xAA, 0x00, 0xA3, 0xD0, 0x14, 0xAA, //
    0x00, 0xA4, 0xD0, 0x15, 0xE0, 0x0F, 0xC5, 0x2A, //
    0x41, 0x2C, 0x02, 0xAA, 0x00, 0xA3, 0xD0, 0x14, //
    0xAA, 0x00, 0xA4, 0xD0, 0x15, 0x52, 0x01, 0x8E, //
    0xF4, 0x88, 0x8E, 0xF4, 0xC2, 0x76, 0x10, 0x0A, //
    0x4D, 0x2D, 0xFF, 0xE2, 0x60, 0x98, 0x11, 0x1D, //
    0x73, 0xBF, 0x0A, 0x8E, 0xF5, 0x64, 0x76, 0x10, //
    0x0A, 0x3C, 0x8E, 0xF4, 0x7E, 0x74, 0x40, 0x0A, //
    0x8E, 0xF5, 0x64, 0x76, 0x10, 0x0A, 0x42, 0x48, //
    0x37, 0x34, 0x79, 0x00, 0x33, 0xD5, 0x37, 0x73, //
    0xFD, 0x0B, 0x52, 0x02, 0x8E, 0xF4, 0x88, 0x8E, //
    0xF4, 0x9E, 0x98, 0x0F, 0x03, 0x98, 0x03, 0x11, //
    0x8E, 0xF7, 0x4B, 0x77, 0x80, 0x0B, 0x0A, 0xDB, //
    0x39, 0x8E, 0xF3, 0x47, 0xC9, 0xC9, 0x8C, 0xF1, //
    0x36, 0xC9, 0xC9, 0x8C, 0xF3, 0xF4, 0xD3, 0x15, //
    0xE7, 0x02, 0xD3, 0x14, 0x52, 0x02, 0x8E, 0xF4, //
    0x88, 0x72, 0x01, 0x37, 0x73, 0xFD, 0x0B, 0xE0, //
    0x99, 0x52, 0x03, 0xE0, 0xF1, 0xD9, 0x03, 0xD9, //
    0x02, 0xD5, 0x37, 0x73, 0xFD, 0x0B, 0x8C, 0xF3, //
    0xEE, 0xFF,
];

// image addresses within the search routine that need the page high byte added
const SEARCH_RTN_RELOCS: [usize; 4] = [0x00FC, 0x0101, 0x010D, 0x0112];

// copy both blobs into the image and patch the relocatable bytes
// with the operator's page base
pub fn install(image: &mut Image, page: PageBase) {
    let high = page.high_byte();
    image.write_bytes(HEADER_OFFSET, &HEADER);
    for &addr in HEADER_RELOCS.iter() {
        image.write_byte(addr, image.read_byte(addr).wrapping_add(high));
    }
    image.write_bytes(SEARCH_RTN_OFFSET, &SEARCH_RTN);
    for &addr in SEARCH_RTN_RELOCS.iter() {
        image.write_byte(addr, image.read_byte(addr).wrapping_add(high));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ENTRY_STREAM_OFFSET, ERASED, LETTER_INDEX_OFFSET};

    #[test]
    fn test_relocs_land_inside_their_blobs() {
        for &addr in HEADER_RELOCS.iter() {
            assert!(addr < HEADER.len());
        }
        for &addr in SEARCH_RTN_RELOCS.iter() {
            assert!((SEARCH_RTN_OFFSET..ENTRY_STREAM_OFFSET).contains(&addr));
        }
    }

    #[test]
    fn test_install_patches_page_high_byte() {
        let page = PageBase::from_digit('2').unwrap();
        let mut image = Image::new();
        install(&mut image, page);

        // unpatched bytes are copied verbatim
        assert_eq!(image.read_byte(0), HEADER[0]);
        assert_eq!(image.read_byte(SEARCH_RTN_OFFSET), SEARCH_RTN[0]);

        // patched bytes gain the page high byte
        assert_eq!(image.read_byte(0x44), HEADER[0x44].wrapping_add(0x20));
        assert_eq!(
            image.read_byte(0xFC),
            SEARCH_RTN[0xFC - SEARCH_RTN_OFFSET].wrapping_add(0x20)
        );

        // the letter index region is untouched
        assert_eq!(image.read_byte(LETTER_INDEX_OFFSET), ERASED);
    }
}
