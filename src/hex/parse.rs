use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::line_ending;
use nom::combinator::{map_res, opt};
use nom::error::{Error, ErrorKind};
use nom::multi::{count, many0};
use nom::sequence::terminated;
use nom::Err;
use nom::IResult;

// one Intel hex data record
#[derive(Debug, PartialEq, Eq)]
pub struct Record {
    pub addr: u16,
    pub data: Vec<u8>,
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits| u8::from_str_radix(digits, 16),
    )(input)
}

fn hex_word(input: &str) -> IResult<&str, u16> {
    map_res(
        take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
        |digits| u16::from_str_radix(digits, 16),
    )(input)
}

// a type-00 record with a verified checksum
pub fn data_record(input: &str) -> IResult<&str, Record> {
    let (input, _) = tag(":")(input)?;
    let (input, len) = hex_byte(input)?;
    let (input, addr) = hex_word(input)?;
    let (input, rtype) = hex_byte(input)?;
    if rtype != 0x00 {
        return Err(Err::Error(Error::new(input, ErrorKind::Tag)));
    }
    let (input, data) = count(hex_byte, len as usize)(input)?;
    let (input, checksum) = hex_byte(input)?;

    let sum = data
        .iter()
        .fold(
            len.wrapping_add((addr >> 8) as u8)
                .wrapping_add(addr as u8)
                .wrapping_add(checksum),
            |acc, &b| acc.wrapping_add(b),
        );
    if sum != 0 {
        return Err(Err::Error(Error::new(input, ErrorKind::Verify)));
    }
    Ok((input, Record { addr, data }))
}

// a full hex file: data records terminated by the end-of-file record
pub fn hex_file(input: &str) -> IResult<&str, Vec<Record>> {
    let (input, records) = many0(terminated(data_record, line_ending))(input)?;
    let (input, _) = tag(":00000001FF")(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, records))
}

// rebuild the flat byte image from contiguous records;
// None when the records leave a gap or overlap
pub fn assemble(records: &[Record]) -> Option<Vec<u8>> {
    let mut expected = records.first()?.addr;
    let mut out = Vec::new();
    for record in records {
        if record.addr != expected {
            return None;
        }
        expected = expected.wrapping_add(record.data.len() as u16);
        out.extend_from_slice(&record.data);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_record() {
        let (rest, record) =
            data_record(":1000000000000000000000000000000000000000F0").unwrap();
        assert!(rest.is_empty());
        assert_eq!(record.addr, 0);
        assert_eq!(record.data, vec![0u8; 16]);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        assert!(data_record(":1000000000000000000000000000000000000000F1").is_err());
    }

    #[test]
    fn test_hex_file_round_trip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let text = crate::hex::serialize(&bytes, 0x2000);
        let (rest, records) = hex_file(&text).unwrap();
        assert!(rest.is_empty());
        assert_eq!(records.len(), 16);
        assert_eq!(records[0].addr, 0x2000);
        assert_eq!(assemble(&records).unwrap(), bytes);
    }

    #[test]
    fn test_assemble_rejects_gaps() {
        let records = [
            Record {
                addr: 0,
                data: vec![0; 16],
            },
            Record {
                addr: 0x20,
                data: vec![0; 16],
            },
        ];
        assert!(assemble(&records).is_none());
    }
}
