use std::fmt::Write;

pub mod parse;

// data bytes per record; the image length is a multiple of this by construction
pub const RECORD_DATA_LEN: usize = 16;

const EOF_RECORD: &str = ":00000001FF\n";

// format a byte array as Intel hex records starting at `base`
pub fn serialize(bytes: &[u8], base: u16) -> String {
    debug_assert!(bytes.len() % RECORD_DATA_LEN == 0);
    // ":10aaaa00" + 32 data digits + checksum + newline
    let mut out = String::with_capacity((bytes.len() / RECORD_DATA_LEN + 1) * 44);
    for (i, record) in bytes.chunks_exact(RECORD_DATA_LEN).enumerate() {
        let addr = base.wrapping_add((i * RECORD_DATA_LEN) as u16);
        let _ = write!(out, ":{:02X}{:04X}00", RECORD_DATA_LEN, addr);
        let mut checksum = (RECORD_DATA_LEN as u8)
            .wrapping_add((addr >> 8) as u8)
            .wrapping_add(addr as u8);
        for &val in record {
            checksum = checksum.wrapping_add(val);
            let _ = write!(out, "{:02X}", val);
        }
        let _ = writeln!(out, "{:02X}", checksum.wrapping_neg());
    }
    out.push_str(EOF_RECORD);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record() {
        let bytes = [0u8; 16];
        assert_eq!(
            serialize(&bytes, 0),
            ":1000000000000000000000000000000000000000F0\n:00000001FF\n"
        );
    }

    #[test]
    fn test_checksum_is_twos_complement() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x01;
        // record sum is 0x10 + 0x01; checksum must cancel it mod 256
        let text = serialize(&bytes, 0);
        let line = text.lines().next().unwrap();
        assert!(line.ends_with("EF"));
    }

    #[test]
    fn test_addresses_advance_by_record_length() {
        let bytes = [0xABu8; 48];
        let text = serialize(&bytes, 0x1000);
        let addrs: Vec<&str> = text
            .lines()
            .take(3)
            .map(|line| &line[3..7])
            .collect();
        assert_eq!(addrs, ["1000", "1010", "1020"]);
    }

    #[test]
    fn test_ends_with_eof_record() {
        let text = serialize(&[0u8; 16], 0);
        assert!(text.ends_with(":00000001FF\n"));
    }
}
