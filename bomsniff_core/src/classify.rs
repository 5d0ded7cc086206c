//! BOM classification.
//!
//! Two classifiers exist and they deliberately disagree on some inputs:
//!
//! - [`classify_naive`] compares whole signatures as prefixes, needs at least
//!   [`NAIVE_MIN_LEN`] bytes, and tries UTF-16 before UTF-8 and UTF-32. A
//!   buffer starting with `FF FE 00 00` is therefore UTF-16LE.
//! - [`classify_strict`] runs the `is_*_bom` predicates, UTF-8 first. Each
//!   predicate only looks at its own byte positions and only needs as many
//!   bytes as its signature.
//!
//! Callers depend on either behavior, so neither is rewritten in terms of the
//! other.

use tracing::trace;

use crate::signature::{
    BomKind, UTF8_BOM, UTF16BE_BOM, UTF16LE_BOM, UTF32BE_BOM, UTF32LE_BOM,
};

/// Minimum buffer length before [`classify_naive`] will look at it.
///
/// One more than the longest signature needs; existing callers rely on it.
pub const NAIVE_MIN_LEN: usize = 5;

/// Prefix order used by [`classify_naive`]. Order is the tie-break.
pub const NAIVE_ORDER: [(&[u8], BomKind); 5] = [
    (&UTF16LE_BOM, BomKind::Utf16Le),
    (&UTF16BE_BOM, BomKind::Utf16Be),
    (&UTF8_BOM, BomKind::Utf8),
    (&UTF32LE_BOM, BomKind::Utf32Le),
    (&UTF32BE_BOM, BomKind::Utf32Be),
];

/// Predicate order used by [`classify_strict`]. Order is the tie-break.
pub const STRICT_ORDER: [(fn(&[u8]) -> bool, BomKind); 5] = [
    (is_utf8_bom, BomKind::Utf8),
    (is_utf16le_bom, BomKind::Utf16Le),
    (is_utf16be_bom, BomKind::Utf16Be),
    (is_utf32le_bom, BomKind::Utf32Le),
    (is_utf32be_bom, BomKind::Utf32Be),
];

/// Classify by whole-signature prefix comparison.
///
/// Returns `Unknown` for anything shorter than [`NAIVE_MIN_LEN`] bytes.
pub fn classify_naive(buffer: &[u8]) -> BomKind {
    if buffer.len() < NAIVE_MIN_LEN {
        return BomKind::Unknown;
    }

    NAIVE_ORDER
        .iter()
        .find(|(sig, _)| buffer.starts_with(sig))
        .map_or(BomKind::Unknown, |&(_, kind)| kind)
}

/// Classify with the per-encoding predicates, UTF-8 first.
pub fn classify_strict(buffer: &[u8]) -> BomKind {
    STRICT_ORDER
        .iter()
        .find(|(matches, _)| matches(buffer))
        .map_or(BomKind::Unknown, |&(_, kind)| kind)
}

/// Leading bytes to skip to reach the payload, as seen by [`classify_strict`].
///
/// `-1` when no BOM is found.
pub fn bytes_to_skip(buffer: &[u8]) -> isize {
    classify_strict(buffer).skip_len()
}

/// UTF-8 BOM check.
///
/// Compares positions 0, 1 and **3** against the signature; position 2 is
/// never looked at, so `EF BB 00 BF` matches while `EF BB BF` on its own
/// does not. This is long-standing behavior that callers may rely on.
pub fn is_utf8_bom(buffer: &[u8]) -> bool {
    if buffer.len() < UTF8_BOM.len() {
        return false;
    }

    // a 3-byte buffer has no position 3
    buffer[0] == UTF8_BOM[0] && buffer[1] == UTF8_BOM[1] && buffer.get(3) == Some(&UTF8_BOM[2])
}

pub fn is_utf16le_bom(buffer: &[u8]) -> bool {
    if buffer.len() < UTF16LE_BOM.len() {
        return false;
    }

    buffer[0] == UTF16LE_BOM[0] && buffer[1] == UTF16LE_BOM[1]
}

pub fn is_utf16be_bom(buffer: &[u8]) -> bool {
    if buffer.len() < UTF16BE_BOM.len() {
        return false;
    }

    buffer[0] == UTF16BE_BOM[0] && buffer[1] == UTF16BE_BOM[1]
}

/// Either UTF-16 byte order.
pub fn is_utf16_bom(buffer: &[u8]) -> bool {
    is_utf16le_bom(buffer) || is_utf16be_bom(buffer)
}

pub fn is_utf32le_bom(buffer: &[u8]) -> bool {
    if buffer.len() < UTF32LE_BOM.len() {
        return false;
    }

    buffer[..4] == UTF32LE_BOM
}

pub fn is_utf32be_bom(buffer: &[u8]) -> bool {
    if buffer.len() < UTF32BE_BOM.len() {
        return false;
    }

    buffer[..4] == UTF32BE_BOM
}

/// Either UTF-32 byte order.
pub fn is_utf32_bom(buffer: &[u8]) -> bool {
    is_utf32le_bom(buffer) || is_utf32be_bom(buffer)
}

/// Which classifier to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// [`classify_naive`]; matches whole signatures, so it is the one used
    /// for stripping unless asked otherwise
    #[default]
    Naive,
    /// [`classify_strict`], the one [`bytes_to_skip`] uses
    Strict,
}

impl Strategy {
    pub fn classify(self, buffer: &[u8]) -> BomKind {
        match self {
            Strategy::Naive => classify_naive(buffer),
            Strategy::Strict => classify_strict(buffer),
        }
    }

    /// How many leading bytes the strategy looks at.
    pub const fn lookahead(self) -> usize {
        match self {
            Strategy::Naive => NAIVE_MIN_LEN,
            Strategy::Strict => crate::signature::MAX_BOM_LEN,
        }
    }
}

/// Result of BOM detection containing the detected kind and BOM length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Detection {
    pub kind: BomKind,
    /// Bytes to drop; `0` when `kind` is `Unknown`
    pub skip: usize,
}

impl Detection {
    /// The part of `buffer` after the BOM.
    ///
    /// `buffer` should be the one that was classified; a shorter one yields an
    /// empty slice.
    pub fn payload<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        buffer.get(self.skip..).unwrap_or_default()
    }
}

/// Detect the byte order mark at the start of `buffer`.
pub fn detect(buffer: &[u8], strategy: Strategy) -> Detection {
    let kind = strategy.classify(buffer);
    let skip = kind.signature_len().unwrap_or(0);
    trace!(?strategy, %kind, skip, len = buffer.len(), "classified buffer");
    Detection { kind, skip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop, prop_assert_eq, proptest};
    use yare::parameterized;

    const PREDICATES: [fn(&[u8]) -> bool; 7] = [
        is_utf8_bom,
        is_utf16le_bom,
        is_utf16be_bom,
        is_utf16_bom,
        is_utf32le_bom,
        is_utf32be_bom,
        is_utf32_bom,
    ];

    #[parameterized(
        utf8 = { &[0xEF, 0xBB, 0xBF, 0x00, 0x00], BomKind::Utf8 },
        utf16le = { &[0xFF, 0xFE, 0x41, 0x00, 0x42], BomKind::Utf16Le },
        utf16be = { &[0xFE, 0xFF, 0x00, 0x41, 0x00], BomKind::Utf16Be },
        utf32le_shadowed = { &[0xFF, 0xFE, 0x00, 0x00, 0x00], BomKind::Utf16Le },
        utf32be = { &[0x00, 0x00, 0xFE, 0xFF, 0x00], BomKind::Utf32Be },
        plain_ascii = { b"hello", BomKind::Unknown },
        utf8_quirk_not_naive = { &[0xEF, 0xBB, 0x00, 0xBF, 0x00], BomKind::Unknown },
    )]
    fn test_classify_naive_cases(input: &[u8], expected: BomKind) {
        assert_eq!(classify_naive(input), expected);
    }

    #[parameterized(
        utf8 = { &[0xEF, 0xBB, 0xBF, 0xBF], BomKind::Utf8 },
        utf8_quirk = { &[0xEF, 0xBB, 0x00, 0xBF], BomKind::Utf8 },
        utf8_exact_three = { &[0xEF, 0xBB, 0xBF], BomKind::Unknown },
        utf16le = { &[0xFF, 0xFE], BomKind::Utf16Le },
        utf16be = { &[0xFE, 0xFF], BomKind::Utf16Be },
        utf32le_shadowed = { &[0xFF, 0xFE, 0x00, 0x00], BomKind::Utf16Le },
        utf32be = { &[0x00, 0x00, 0xFE, 0xFF], BomKind::Utf32Be },
        utf32be_truncated = { &[0x00, 0x00, 0xFE], BomKind::Unknown },
        plain_ascii = { b"hello", BomKind::Unknown },
    )]
    fn test_classify_strict_cases(input: &[u8], expected: BomKind) {
        assert_eq!(classify_strict(input), expected);
    }

    #[test]
    fn test_utf8_position_two_is_ignored() {
        assert!(is_utf8_bom(&[0xEF, 0xBB, 0x00, 0xBF]));
        assert!(is_utf8_bom(&[0xEF, 0xBB, 0x42, 0xBF, 0x00]));
        assert!(!is_utf8_bom(&[0xEF, 0xBB, 0xBF, 0x00]));
    }

    #[test]
    fn test_utf8_bom_with_payload() {
        let input = [0xEF, 0xBB, 0xBF, 0x00, 0x00];
        assert_eq!(classify_naive(&input), BomKind::Utf8);
        // strict compares byte 3, not byte 2, against 0xBF
        assert_eq!(classify_strict(&input), BomKind::Unknown);

        let input = [0xEF, 0xBB, 0xBF, 0xBF, 0x00];
        assert_eq!(classify_naive(&input), BomKind::Utf8);
        assert_eq!(classify_strict(&input), BomKind::Utf8);
    }

    #[test]
    fn test_utf32le_prefix_resolution() {
        let input = [0xFF, 0xFE, 0x00, 0x00, 0x00];
        assert_eq!(classify_naive(&input), BomKind::Utf16Le);
        assert_eq!(classify_strict(&input), BomKind::Utf16Le);
        assert_eq!(bytes_to_skip(&input), 2);
        assert!(is_utf32le_bom(&input));
        assert!(is_utf16le_bom(&input));
    }

    #[test]
    fn test_naive_and_strict_diverge_on_short_input() {
        let input = [0xFF, 0xFE, 0x00, 0x00];
        assert_eq!(classify_naive(&input), BomKind::Unknown);
        assert_eq!(classify_strict(&input), BomKind::Utf16Le);
        assert_eq!(bytes_to_skip(&input), 2);
    }

    #[test]
    fn test_utf32be() {
        let input = [0x00, 0x00, 0xFE, 0xFF, 0x00];
        assert_eq!(classify_naive(&input), BomKind::Utf32Be);
        assert_eq!(classify_strict(&input), BomKind::Utf32Be);
        assert_eq!(bytes_to_skip(&input), 4);
        assert!(is_utf32_bom(&input));
        assert!(!is_utf16_bom(&input));
    }

    #[test]
    fn test_empty_and_single_byte() {
        for input in [&[][..], &[0xEF][..], &[0xFF][..], &[0x00][..]] {
            for predicate in PREDICATES {
                assert!(!predicate(input));
            }
            assert_eq!(classify_naive(input), BomKind::Unknown);
            assert_eq!(classify_strict(input), BomKind::Unknown);
            assert_eq!(bytes_to_skip(input), -1);
        }
    }

    #[test]
    fn test_combined_predicates() {
        assert!(is_utf16_bom(&UTF16LE_BOM));
        assert!(is_utf16_bom(&UTF16BE_BOM));
        assert!(!is_utf16_bom(&UTF8_BOM));
        assert!(is_utf32_bom(&UTF32LE_BOM));
        assert!(is_utf32_bom(&UTF32BE_BOM));
        assert!(!is_utf32_bom(&UTF16BE_BOM));
    }

    #[test]
    fn test_round_trip_with_payload() {
        let payload = b"\xBFpayload";
        for kind in BomKind::ALL {
            let mut input = kind.signature().unwrap_or_default().to_vec();
            input.extend_from_slice(payload);
            let expected = match kind {
                // UTF-16LE is tried first and is a prefix of UTF-32LE
                BomKind::Utf32Le => BomKind::Utf16Le,
                other => other,
            };
            assert_eq!(classify_strict(&input), expected, "{kind}");
            assert_eq!(bytes_to_skip(&input), expected.skip_len(), "{kind}");
        }
    }

    #[test]
    fn test_strategy_dispatch() {
        let input = [0xFF, 0xFE, 0x00, 0x00];
        assert_eq!(Strategy::Naive.classify(&input), BomKind::Unknown);
        assert_eq!(Strategy::Strict.classify(&input), BomKind::Utf16Le);
        assert_eq!(Strategy::default(), Strategy::Naive);
        assert_eq!(Strategy::Naive.lookahead(), 5);
        assert_eq!(Strategy::Strict.lookahead(), 4);
    }

    #[test]
    fn test_detect_payload() {
        let input = b"\xFE\xFF\x00A";
        let detection = detect(input, Strategy::Strict);
        assert_eq!(detection, Detection { kind: BomKind::Utf16Be, skip: 2 });
        assert_eq!(detection.payload(input), b"\x00A");

        let detection = detect(b"plain", Strategy::Naive);
        assert_eq!(detection.skip, 0);
        assert_eq!(detection.payload(b"plain"), b"plain");
        assert_eq!(detection.payload(b""), b"");
    }

    proptest! {
        #[test]
        fn prop_naive_unknown_below_threshold(input in prop::collection::vec(any::<u8>(), 0..NAIVE_MIN_LEN)) {
            prop_assert_eq!(classify_naive(&input), BomKind::Unknown);
        }

        #[test]
        fn prop_classification_is_idempotent(input in prop::collection::vec(any::<u8>(), 0..16)) {
            prop_assert_eq!(classify_naive(&input), classify_naive(&input));
            prop_assert_eq!(classify_strict(&input), classify_strict(&input));
            prop_assert_eq!(bytes_to_skip(&input), bytes_to_skip(&input));
        }

        #[test]
        fn prop_skip_follows_strict(input in prop::collection::vec(any::<u8>(), 0..16)) {
            prop_assert_eq!(bytes_to_skip(&input), classify_strict(&input).skip_len());
        }

        #[test]
        fn prop_utf32be_round_trip(payload in prop::collection::vec(any::<u8>(), 0..32)) {
            let mut input = UTF32BE_BOM.to_vec();
            input.extend_from_slice(&payload);
            prop_assert_eq!(classify_strict(&input), BomKind::Utf32Be);
            prop_assert_eq!(bytes_to_skip(&input), 4);
        }

        #[test]
        fn prop_utf16_round_trip(payload in prop::collection::vec(any::<u8>(), 0..32)) {
            for (sig, kind) in [(UTF16LE_BOM, BomKind::Utf16Le), (UTF16BE_BOM, BomKind::Utf16Be)] {
                let mut input = sig.to_vec();
                input.extend_from_slice(&payload);
                prop_assert_eq!(classify_strict(&input), kind);
                prop_assert_eq!(bytes_to_skip(&input), 2);
            }
        }
    }
}
