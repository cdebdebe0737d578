use crate::directive::PageBase;

pub mod firmware;

// a 2732-type 4K EPROM
pub const EPROM_LEN: usize = 4096;

// value of an erased EPROM cell; doubles as the letter-class terminator
pub const ERASED: u8 = 0xFF;

// image layout: header blob, letter index, search routine, entry stream
pub const HEADER_OFFSET: usize = 0;
pub const LETTER_INDEX_OFFSET: usize = HEADER_OFFSET + firmware::HEADER.len();
// one slot per letter A-Z plus the symbol class after 'Z'
pub const LETTER_INDEX_SLOTS: usize = 27;
pub const LETTER_INDEX_LEN: usize = 2 * LETTER_INDEX_SLOTS;
pub const SEARCH_RTN_OFFSET: usize = LETTER_INDEX_OFFSET + LETTER_INDEX_LEN;
pub const ENTRY_STREAM_OFFSET: usize = SEARCH_RTN_OFFSET + firmware::SEARCH_RTN.len();

// the full EPROM image under construction
// offsets are image-relative; the page base only enters into the
// values stored in the letter index and the relocation patches
#[derive(Debug)]
pub struct Image {
    bytes: [u8; EPROM_LEN],
}

impl Image {
    // a blank image: every cell erased
    pub fn new() -> Self {
        Image {
            bytes: [ERASED; EPROM_LEN],
        }
    }

    // a blank image with both firmware blobs installed and relocated
    pub fn with_firmware(page: PageBase) -> Self {
        let mut image = Image::new();
        firmware::install(&mut image, page);
        image
    }

    #[inline]
    pub fn read_byte(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    #[inline]
    pub fn read_word(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    #[inline]
    pub fn write_byte(&mut self, offset: usize, val: u8) {
        self.bytes[offset] = val;
    }

    #[inline]
    pub fn write_word(&mut self, offset: usize, val: u16) {
        let [high, low] = val.to_be_bytes();
        self.bytes[offset] = high;
        self.bytes[offset + 1] = low;
    }

    pub fn write_bytes(&mut self, offset: usize, src: &[u8]) {
        self.bytes[offset..offset + src.len()].copy_from_slice(src);
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    // the 27 letter-index words, A through the symbol class
    pub fn letter_index(&self) -> impl Iterator<Item = u16> + '_ {
        self.bytes[LETTER_INDEX_OFFSET..LETTER_INDEX_OFFSET + LETTER_INDEX_LEN]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }
}

impl Default for Image {
    fn default() -> Self {
        Image::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(LETTER_INDEX_OFFSET, 163);
        assert_eq!(SEARCH_RTN_OFFSET, 217);
        assert_eq!(ENTRY_STREAM_OFFSET, 403);
        assert!(ENTRY_STREAM_OFFSET < EPROM_LEN);
    }

    #[test]
    fn test_new_image_is_erased() {
        let image = Image::new();
        assert!(image.as_bytes().iter().all(|&b| b == ERASED));
    }

    #[test]
    fn test_word_writes_are_big_endian() {
        let mut image = Image::new();
        image.write_word(100, 0x1234);
        assert_eq!(image.read_byte(100), 0x12);
        assert_eq!(image.read_byte(101), 0x34);
        assert_eq!(image.read_word(100), 0x1234);
    }
}
