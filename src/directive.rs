use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{anychar, one_of, space0};
use nom::combinator::{eof, map_opt, peek, recognize};
use nom::IResult;

// the 4K page the EPROM image will be programmed at, chosen by the
// BASE directive on line 1; one hex digit 1-9/A-E, so 0x1000-0xE000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBase(u16);

impl PageBase {
    pub fn from_digit(digit: char) -> Option<Self> {
        let digit = digit.to_ascii_uppercase();
        match digit {
            '1'..='9' => Some(PageBase((digit as u16 - '0' as u16) << 12)),
            'A'..='E' => Some(PageBase((digit as u16 - 'A' as u16 + 10) << 12)),
            _ => None,
        }
    }

    #[inline]
    pub fn addr(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn high_byte(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

// `BASE <page>`; anything after the single-character page value is comment
pub fn base_directive(input: &str) -> IResult<&str, PageBase> {
    let (input, _) = tag("BASE")(input)?;
    let (input, _) = space0(input)?;
    let (input, page) = map_opt(anychar, PageBase::from_digit)(input)?;
    // the page value must be a one-character token
    let (input, _) = peek(alt((eof, recognize(one_of(" \t\r\n")))))(input)?;
    Ok((input, page))
}

pub fn parse_base_line(line: &str) -> Option<PageBase> {
    let (_, page) = base_directive(line).ok()?;
    Some(page)
}
