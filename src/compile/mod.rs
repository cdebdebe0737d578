use arrayvec::ArrayVec;
use log::{debug, info};

use crate::allophone;
use crate::directive::PageBase;
use crate::error::{CompileError, ErrorKind, Result};
use crate::image::{Image, ENTRY_STREAM_OFFSET, EPROM_LEN, ERASED, LETTER_INDEX_OFFSET};

// encoded control bytes (see the CTS256A-AL2 datasheet)
pub const WORD_DELIMITER: u8 = 0x13; // encoded '<'
pub const START_TAG: u8 = 0x40; // encoded '[', tags a run's first byte
pub const END_TAG: u8 = 0x80; // encoded ']', tags a run's last byte
pub const TERMINATOR: u8 = ERASED;

// token ceilings; headwords and suffixes share a limit
const MAX_WORD_LEN: usize = 19;
const MAX_ALLOPHONE_LEN: usize = 3;

// the letter-class cursor starts one letter before 'A'
const BEFORE_A: u8 = b'@';

// scan states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WordStart,      // looking for initial < or [
    StartDefn,      // looking for initial [
    IgnoreToEol,    // inside a ; comment
    InWord,         // accumulating word characters
    EndDefn,        // found trailing ], collecting any suffix
    Separator,      // looking for the = separator
    StartAllosDefn, // looking for the leading [ of the allophone list
    InAllophones,   // processing allophone names
}

// convert a printable ASCII character to its encoded value
// (shifts 0x20-0x7E down to 0x00-0x5E)
#[inline]
fn encode(c: u8) -> u8 {
    c.wrapping_sub(0x20)
}

#[inline]
fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

// the dictionary compiler: a character-at-a-time scanner that encodes
// each entry into the image as soon as its declaration closes, keeping
// the 27-slot letter index current as the alphabet advances
//
// entries must arrive in alphabetical order; an out-of-order entry
// lands in whatever letter class is currently open and the chip's
// search routine will never find it
pub struct Compiler {
    image: Image,
    state: State,
    line: u32,
    base: u16,
    entry_offset: usize,
    index_offset: usize,
    current_letter: u8,
    anchored: bool,
    word: ArrayVec<[u8; MAX_WORD_LEN]>,
    suffix: ArrayVec<[u8; MAX_WORD_LEN]>,
    allophone: ArrayVec<[u8; MAX_ALLOPHONE_LEN]>,
    num_allophones: usize,
    entries: usize,
}

impl Compiler {
    pub fn new(page: PageBase) -> Self {
        Compiler {
            image: Image::with_firmware(page),
            state: State::WordStart,
            // line 1 is the BASE directive, handled before the scan
            line: 2,
            base: page.addr(),
            entry_offset: ENTRY_STREAM_OFFSET,
            index_offset: LETTER_INDEX_OFFSET,
            current_letter: BEFORE_A,
            anchored: false,
            word: ArrayVec::new(),
            suffix: ArrayVec::new(),
            allophone: ArrayVec::new(),
            num_allophones: 0,
            entries: 0,
        }
    }

    // consume the whole character stream; a streaming caller may instead
    // call feed() one character at a time
    pub fn compile(&mut self, input: impl IntoIterator<Item = u8>) -> Result<()> {
        for c in input {
            self.feed(c)?;
        }
        Ok(())
    }

    pub fn feed(&mut self, c: u8) -> Result<()> {
        match self.state {
            State::WordStart => self.word_start(c),
            State::StartDefn => self.start_defn(c),
            State::IgnoreToEol => {
                if c == b'\n' {
                    self.line += 1;
                    self.state = State::WordStart;
                }
                Ok(())
            }
            State::InWord => self.in_word(c),
            State::EndDefn => self.end_defn(c),
            State::Separator => self.separator(c),
            State::StartAllosDefn => self.start_allos_defn(c),
            State::InAllophones => self.in_allophones(c),
        }
    }

    // complete the letter index for any letters never seen,
    // then hand over the finished image
    pub fn finish(mut self) -> Result<Image> {
        while self.current_letter <= b'Z' {
            self.close_letter_class()?;
        }
        info!(
            "{} entries encoded, {} of {} EPROM bytes used",
            self.entries, self.entry_offset, EPROM_LEN
        );
        Ok(self.image)
    }

    fn err(&self, kind: ErrorKind) -> CompileError {
        CompileError::new(self.line, kind)
    }

    fn word_start(&mut self, c: u8) -> Result<()> {
        match c {
            b'<' => {
                // the entry only matches at the start of a word
                self.anchored = true;
                self.state = State::StartDefn;
            }
            b'[' => {
                self.anchored = false;
                self.enter_word();
            }
            b';' => self.state = State::IgnoreToEol,
            _ if is_blank(c) => {}
            _ => {
                return Err(self.err(ErrorKind::Unexpected {
                    found: c as char,
                    expected: "start of word ('<') or start of definition ('[')",
                }))
            }
        }
        Ok(())
    }

    fn start_defn(&mut self, c: u8) -> Result<()> {
        if c == b'[' {
            self.enter_word();
            Ok(())
        } else {
            Err(self.err(ErrorKind::Unexpected {
                found: c as char,
                expected: "start of word definition ('[')",
            }))
        }
    }

    fn enter_word(&mut self) {
        self.word.clear();
        self.suffix.clear();
        self.state = State::InWord;
    }

    fn in_word(&mut self, c: u8) -> Result<()> {
        if c == b']' {
            if self.word.is_empty() {
                return Err(self.err(ErrorKind::EmptyWord));
            }
            self.state = State::EndDefn;
        } else if self.word.is_empty()
            || c.is_ascii_alphanumeric()
            || c == b'\''
            || c == b'('
            || c == b')'
        {
            // the first character is unrestricted; that is how symbol
            // entries like [#] get in
            if self.word.is_full() {
                return Err(self.err(ErrorKind::WordTooLong(self.word_text())));
            }
            self.word.push(c);
        } else {
            return Err(self.err(ErrorKind::BadWordChar(c as char)));
        }
        Ok(())
    }

    fn end_defn(&mut self, c: u8) -> Result<()> {
        if c.is_ascii_alphabetic() {
            // suffix after the bracketed stem
            if self.suffix.is_full() {
                return Err(self.err(ErrorKind::SuffixTooLong(
                    String::from_utf8_lossy(&self.suffix).into_owned(),
                )));
            }
            self.suffix.push(c);
            Ok(())
        } else if c == b'<' || c == b'=' {
            self.close_entry(c)
        } else {
            Err(self.err(ErrorKind::Unexpected {
                found: c as char,
                expected: "end of word definition (']') or separator ('=')",
            }))
        }
    }

    fn separator(&mut self, c: u8) -> Result<()> {
        if c == b'=' {
            self.state = State::StartAllosDefn;
            Ok(())
        } else if is_blank(c) {
            Ok(())
        } else {
            Err(self.err(ErrorKind::Unexpected {
                found: c as char,
                expected: "separator ('=')",
            }))
        }
    }

    fn start_allos_defn(&mut self, c: u8) -> Result<()> {
        if c == b'[' {
            self.allophone.clear();
            self.num_allophones = 0;
            self.state = State::InAllophones;
            Ok(())
        } else if is_blank(c) {
            Ok(())
        } else {
            Err(self.err(ErrorKind::Unexpected {
                found: c as char,
                expected: "end of allophones definition (']')",
            }))
        }
    }

    fn in_allophones(&mut self, c: u8) -> Result<()> {
        if c.is_ascii_alphanumeric() {
            if self.allophone.is_full() {
                return Err(self.err(ErrorKind::AllophoneTooLong(
                    String::from_utf8_lossy(&self.allophone).into_owned(),
                )));
            }
            self.allophone.push(c);
        } else if is_blank(c) || c == b']' {
            if !self.allophone.is_empty() {
                self.emit_allophone()?;
            }
            if c == b']' {
                if self.num_allophones == 0 {
                    // a list that opens and immediately closes reads as a
                    // single empty name
                    return Err(self.err(ErrorKind::UnknownAllophone(String::new())));
                }
                // tag the last allophone of the run
                let last = self.entry_offset - 1;
                let tagged = self.image.read_byte(last).wrapping_add(END_TAG);
                self.image.write_byte(last, tagged);
                self.state = State::IgnoreToEol;
            }
        } else {
            return Err(self.err(ErrorKind::BadAllophoneChar(c as char)));
        }
        Ok(())
    }

    fn emit_allophone(&mut self) -> Result<()> {
        let name = String::from_utf8_lossy(&self.allophone).into_owned();
        let code = allophone::resolve(&name)
            .ok_or_else(|| self.err(ErrorKind::UnknownAllophone(name)))?;
        // the first allophone of the run carries the start tag
        let code = if self.num_allophones == 0 {
            code.wrapping_add(START_TAG)
        } else {
            code
        };
        self.emit(code)?;
        self.num_allophones += 1;
        self.allophone.clear();
        Ok(())
    }

    // a headword or symbol declaration just closed on `c` ('<' or '=');
    // bring the letter index up to date and encode the entry
    fn close_entry(&mut self, c: u8) -> Result<()> {
        let first = self.word[0];
        if first.is_ascii_alphabetic() {
            self.advance_letter_classes(first)?;
        } else {
            // symbols encode into the class after 'Z'
            while self.current_letter <= b'Z' {
                self.close_letter_class()?;
            }
        }

        let start = self.entry_offset;
        if self.anchored {
            self.emit(WORD_DELIMITER)?;
        }

        if first.is_ascii_alphabetic() {
            // the first character is implied by the letter class
            match self.word.len() {
                1 => self.emit(TERMINATOR)?,
                2 => {
                    let b = encode(self.word[1])
                        .wrapping_add(START_TAG)
                        .wrapping_add(END_TAG);
                    self.emit(b)?;
                }
                len => {
                    let b = encode(self.word[1]).wrapping_add(START_TAG);
                    self.emit(b)?;
                    for i in 2..len - 1 {
                        let b = encode(self.word[i]);
                        self.emit(b)?;
                    }
                    let b = encode(self.word[len - 1]).wrapping_add(END_TAG);
                    self.emit(b)?;
                }
            }
            for i in 0..self.suffix.len() {
                let b = encode(self.suffix[i]);
                self.emit(b)?;
            }
        } else {
            if self.word.len() != 1 {
                return Err(self.err(ErrorKind::MultiCharSymbol));
            }
            let b = encode(first).wrapping_add(START_TAG).wrapping_add(END_TAG);
            self.emit(b)?;
            // a symbol's collected suffix is never emitted
        }

        if c == b'<' {
            // explicit end-of-word marker; the separator must follow
            self.emit(WORD_DELIMITER)?;
            self.state = State::Separator;
        } else {
            self.state = State::StartAllosDefn;
        }

        debug!(
            "entry '{}' encoded at {:#06x}",
            self.word_text(),
            start + self.base as usize
        );
        self.entries += 1;
        Ok(())
    }

    // move the letter cursor forward to `target`, closing every class
    // passed over; each close ends the previous class with a terminator
    // (except leaving the before-'A' sentinel) and records where the
    // next class starts in the letter index
    fn advance_letter_classes(&mut self, target: u8) -> Result<()> {
        while target > self.current_letter {
            self.close_letter_class()?;
        }
        Ok(())
    }

    fn close_letter_class(&mut self) -> Result<()> {
        if self.current_letter != BEFORE_A {
            self.emit(TERMINATOR)?;
        }
        let class_start = (self.entry_offset as u16).wrapping_add(self.base);
        self.image.write_word(self.index_offset, class_start);
        self.index_offset += 2;
        self.current_letter += 1;
        Ok(())
    }

    fn emit(&mut self, val: u8) -> Result<()> {
        if self.entry_offset >= EPROM_LEN {
            return Err(self.err(ErrorKind::ImageOverflow));
        }
        self.image.write_byte(self.entry_offset, val);
        self.entry_offset += 1;
        Ok(())
    }

    fn word_text(&self) -> String {
        String::from_utf8_lossy(&self.word).into_owned()
    }
}
