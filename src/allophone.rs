use std::collections::HashMap;

// SP0256-AL2 allophone names in numerical order starting at 0;
// an allophone's code is its position in this table
pub static ALLOPHONE_NAMES: [&str; 64] = [
    "PA1", "PA2", "PA3", "PA4", "PA5", "OY", "AY", "EH", //
    "KK3", "PP", "JH", "NN1", "IH", "TT2", "RR1", "AX", //
    "MM", "TT1", "DH1", "IY", "EY", "DD1", "UW1", "AO", //
    "AA", "YY2", "AE", "HH1", "BB1", "TH", "UH", "UW2", //
    "AW", "DD2", "GG3", "VV", "GG1", "SH", "ZH", "RR2", //
    "FF", "KK2", "KK1", "ZZ", "NG", "LL", "WW", "XR", //
    "WH", "YY1", "CH", "ER1", "ER2", "OW", "DH2", "SS", //
    "NN2", "HH2", "OR", "AR", "YR", "GG2", "EL", "BB2",
];

lazy_static! {
    static ref ALLOPHONE_INDEX: HashMap<&'static str, u8> = {
        let mut index = HashMap::with_capacity(ALLOPHONE_NAMES.len());
        for (code, &name) in ALLOPHONE_NAMES.iter().enumerate() {
            index.insert(name, code as u8);
        }
        index
    };
}

// case-sensitive exact match; the grammar only produces uppercase names
#[inline]
pub fn resolve(name: &str) -> Option<u8> {
    ALLOPHONE_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(resolve("PA1"), Some(0));
        assert_eq!(resolve("OY"), Some(5));
        assert_eq!(resolve("AA"), Some(24));
        assert_eq!(resolve("KK1"), Some(42));
        assert_eq!(resolve("BB2"), Some(63));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(resolve("pa1"), None);
        assert_eq!(resolve("Kk1"), None);
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("QQ9"), None);
    }

    #[test]
    fn test_codes_fit_six_bits() {
        for name in ALLOPHONE_NAMES.iter() {
            assert!(resolve(name).unwrap() < 64);
        }
    }
}
