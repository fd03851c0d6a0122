use thiserror::Error;

/// Integer representation of a single base.
///
/// A base and its Watson–Crick complement always sum to zero, so two aligned
/// positions pair iff `a + b == 0`. The value `0` marks an unassigned position.
pub type BaseCode = i32;

pub const UNASSIGNED: BaseCode = 0;

pub const A: BaseCode = -2;
pub const C: BaseCode = -1;
pub const G: BaseCode = 1;
pub const T: BaseCode = 2;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CoderError {
    #[error("Unrecognized base character '{0}' (expected one of A, C, G, T)")]
    InvalidBase(char),
    #[error("Value {0} does not encode a base")]
    InvalidCode(BaseCode),
}

#[inline]
pub fn encode(base: char) -> Result<BaseCode, CoderError> {
    match base {
        'A' => Ok(A),
        'C' => Ok(C),
        'G' => Ok(G),
        'T' => Ok(T),
        other => Err(CoderError::InvalidBase(other)),
    }
}

#[inline]
pub fn decode(code: BaseCode) -> Result<char, CoderError> {
    match code {
        A => Ok('A'),
        C => Ok('C'),
        G => Ok('G'),
        T => Ok('T'),
        other => Err(CoderError::InvalidCode(other)),
    }
}

pub fn encode_sequence(sequence: &str) -> Result<Vec<BaseCode>, CoderError> {
    sequence.chars().map(encode).collect()
}

pub fn decode_sequence(codes: &[BaseCode]) -> Result<String, CoderError> {
    codes.iter().map(|&code| decode(code)).collect()
}

/// Reverse complement: reverses the sequence and negates every value.
pub fn complement(codes: &[BaseCode]) -> Vec<BaseCode> {
    codes.iter().rev().map(|&code| -code).collect()
}

#[inline]
pub fn is_complementary(a: BaseCode, b: BaseCode) -> bool {
    a != UNASSIGNED && a + b == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_maps_each_base_to_its_signed_value() {
        assert_eq!(encode('A'), Ok(-2));
        assert_eq!(encode('C'), Ok(-1));
        assert_eq!(encode('G'), Ok(1));
        assert_eq!(encode('T'), Ok(2));
    }

    #[test]
    fn encode_rejects_unknown_characters() {
        assert_eq!(encode('N'), Err(CoderError::InvalidBase('N')));
        assert_eq!(encode('a'), Err(CoderError::InvalidBase('a')));
        assert!(matches!(
            encode_sequence("ACGU"),
            Err(CoderError::InvalidBase('U'))
        ));
    }

    #[test]
    fn decode_rejects_unassigned_and_placeholder_values() {
        assert_eq!(decode(UNASSIGNED), Err(CoderError::InvalidCode(0)));
        assert_eq!(decode(7), Err(CoderError::InvalidCode(7)));
    }

    #[test]
    fn complement_reverses_and_negates() {
        let codes = encode_sequence("AACG").unwrap();
        assert_eq!(decode_sequence(&complement(&codes)).unwrap(), "CGTT");
    }

    #[test]
    fn acgt_is_its_own_complement() {
        let codes = encode_sequence("ACGT").unwrap();
        assert_eq!(complement(&codes), codes);
    }

    #[test]
    fn unassigned_positions_never_pair() {
        assert!(!is_complementary(UNASSIGNED, UNASSIGNED));
        assert!(is_complementary(A, T));
        assert!(is_complementary(G, C));
        assert!(!is_complementary(A, A));
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(seq in "[ACGT]{0,64}") {
            let codes = encode_sequence(&seq).unwrap();
            prop_assert_eq!(decode_sequence(&codes).unwrap(), seq);
        }

        #[test]
        fn complement_is_an_involution(seq in "[ACGT]{0,64}") {
            let codes = encode_sequence(&seq).unwrap();
            prop_assert_eq!(complement(&complement(&codes)), codes);
        }
    }
}
