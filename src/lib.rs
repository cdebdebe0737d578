// Compiles a CTS256A-AL2 exception-word dictionary into the binary
// lookup table the chip searches at run time, then serializes the
// 4K EPROM image as Intel hex.
//
// The input format:
//
// BASE n     <-- the 4K page the EPROM will be programmed at (1..9,A-E)
// <[word1]<=[allophone list] ; comment
// <[word2]<=[allophone list] ; words must be in alphabetical order
//    .
// <[wordN]<=[allophone list]

#[macro_use]
extern crate lazy_static;

pub mod allophone;
pub mod compile;
pub mod directive;
pub mod error;
pub mod hex;
pub mod image;

pub use compile::Compiler;
pub use directive::PageBase;
pub use error::{CompileError, ErrorKind, Result};
pub use image::Image;

// compile a complete dictionary source, BASE line included
pub fn compile_dictionary(src: &str) -> Result<Image> {
    let mut lines = src.splitn(2, '\n');
    let base_line = lines.next().unwrap_or("");
    let page = directive::parse_base_line(base_line)
        .ok_or_else(|| CompileError::new(1, ErrorKind::InvalidBase))?;
    let mut compiler = Compiler::new(page);
    compiler.compile(lines.next().unwrap_or("").bytes())?;
    compiler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{END_TAG, START_TAG, TERMINATOR, WORD_DELIMITER};
    use crate::image::{ENTRY_STREAM_OFFSET, EPROM_LEN};

    #[test]
    fn test_missing_base_line() {
        let err = compile_dictionary("<[CAT]<=[KK1 AE TT2]\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ErrorKind::InvalidBase);
        assert_eq!(err.to_string(), "Error in line 1: Invalid BASE declaration");
    }

    #[test]
    fn test_end_to_end_cat() {
        let image = compile_dictionary("BASE 1\n<[CAT]<=[KK1 AE TT2]\n").unwrap();

        // two empty classes (A, B) before CAT's class opens
        let entry = ENTRY_STREAM_OFFSET;
        assert_eq!(
            image.as_bytes()[entry..entry + 9],
            [
                TERMINATOR,
                TERMINATOR,
                WORD_DELIMITER,
                START_TAG + (b'A' - 0x20),
                END_TAG + (b'T' - 0x20),
                WORD_DELIMITER,
                START_TAG + 42, // KK1
                26,             // AE
                END_TAG + 13,   // TT2
            ]
        );
        let index: Vec<u16> = image.letter_index().collect();
        assert_eq!(index[2], 0x1000 + entry as u16 + 2); // C

        // serializer round trip reproduces the image byte for byte
        let text = hex::serialize(image.as_bytes(), 0);
        let (rest, records) = hex::parse::hex_file(&text).unwrap();
        assert!(rest.is_empty());
        assert_eq!(records.len(), EPROM_LEN / hex::RECORD_DATA_LEN);
        assert_eq!(hex::parse::assemble(&records).unwrap(), image.as_bytes());
    }

    #[test]
    fn test_parse_error_reports_dictionary_line() {
        let err = compile_dictionary("BASE 1\n<[CAT]<=[KK1 AE TT2]\n<[DOH]*\n").unwrap_err();
        assert_eq!(err.line, 3);
    }
}
