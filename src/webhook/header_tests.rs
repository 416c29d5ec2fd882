//! Tests for `SignatureHeader` parsing and formatting.

use super::{SignatureHeader, SignatureHeaderError};

const SIG: &str = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";

mod parsing {
    use super::*;

    #[test]
    fn parses_canonical_header() {
        let header: SignatureHeader = format!("t=1700000000,v1={SIG}").parse().unwrap();

        assert_eq!(header.timestamp, 1_700_000_000);
        assert_eq!(header.signature, SIG);
    }

    #[test]
    fn order_is_not_significant() {
        let header: SignatureHeader = format!("v1={SIG},t=1700000000").parse().unwrap();
        assert_eq!(header, SignatureHeader::new(1_700_000_000, SIG));
    }

    #[test]
    fn unknown_keys_and_whitespace_are_ignored() {
        let header: SignatureHeader = format!(" t=42 , v0=legacy, foo , v1={SIG} ")
            .parse()
            .unwrap();

        assert_eq!(header, SignatureHeader::new(42, SIG));
    }

    #[test]
    fn first_occurrence_of_repeated_key_wins() {
        let header: SignatureHeader = "t=1,t=2,v1=aa,v1=bb".parse().unwrap();
        assert_eq!(header, SignatureHeader::new(1, "aa"));
    }

    #[test]
    fn missing_timestamp_fails() {
        let err = format!("v1={SIG}").parse::<SignatureHeader>().unwrap_err();
        assert_eq!(err, SignatureHeaderError::MissingTimestamp);
    }

    #[test]
    fn missing_signature_fails() {
        let err = "t=1700000000".parse::<SignatureHeader>().unwrap_err();
        assert_eq!(err, SignatureHeaderError::MissingSignature);
    }

    #[test]
    fn non_integer_timestamp_fails() {
        for bad in ["t=abc", "t=1.5", "t=", "t=17e8"] {
            let err = format!("{bad},v1={SIG}")
                .parse::<SignatureHeader>()
                .unwrap_err();
            assert!(
                matches!(err, SignatureHeaderError::InvalidTimestamp(_)),
                "{bad} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn non_canonical_timestamp_fails() {
        for bad in ["t=+1700000000", "t=01700000000", "t=-0", "t=00"] {
            let err = format!("{bad},v1={SIG}")
                .parse::<SignatureHeader>()
                .unwrap_err();
            assert!(
                matches!(err, SignatureHeaderError::InvalidTimestamp(_)),
                "{bad} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn zero_and_negative_timestamps_are_canonical() {
        assert_eq!(format!("t=0,v1={SIG}").parse::<SignatureHeader>().unwrap().timestamp, 0);
        assert_eq!(format!("t=-5,v1={SIG}").parse::<SignatureHeader>().unwrap().timestamp, -5);
    }

    #[test]
    fn empty_string_fails() {
        assert!("".parse::<SignatureHeader>().is_err());
    }
}

mod formatting {
    use super::*;

    #[test]
    fn display_uses_wire_format() {
        let header = SignatureHeader::new(1_700_000_000, SIG);
        assert_eq!(header.to_string(), format!("t=1700000000,v1={SIG}"));
    }

    #[test]
    fn display_output_parses_back() {
        let header = SignatureHeader::new(-5, "00ff");
        assert_eq!(header.to_string().parse::<SignatureHeader>().unwrap(), header);
    }
}
