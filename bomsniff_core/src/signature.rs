//! Byte order mark signatures and the kinds they identify.
//!
//! The byte values come from <http://www.unicode.org/faq/utf_bom.html#BOM>.

use std::fmt;

/// UTF-8 byte order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian byte order mark
pub const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian byte order mark
pub const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-32 little-endian byte order mark. Starts with [`UTF16LE_BOM`].
pub const UTF32LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
/// UTF-32 big-endian byte order mark
pub const UTF32BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Length of the longest signature
pub const MAX_BOM_LEN: usize = 4;

/// Which byte order mark a buffer starts with.
///
/// `Unknown` covers both "no signature matched" and "not enough bytes to
/// tell"; it is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BomKind {
    #[default]
    Unknown,
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl BomKind {
    /// Every kind that has a signature.
    pub const ALL: [BomKind; 5] = [
        BomKind::Utf8,
        BomKind::Utf16Le,
        BomKind::Utf16Be,
        BomKind::Utf32Le,
        BomKind::Utf32Be,
    ];

    /// Signature bytes for this kind, `None` for `Unknown`.
    pub const fn signature(self) -> Option<&'static [u8]> {
        match self {
            BomKind::Unknown => None,
            BomKind::Utf8 => Some(&UTF8_BOM),
            BomKind::Utf16Le => Some(&UTF16LE_BOM),
            BomKind::Utf16Be => Some(&UTF16BE_BOM),
            BomKind::Utf32Le => Some(&UTF32LE_BOM),
            BomKind::Utf32Be => Some(&UTF32BE_BOM),
        }
    }

    /// Signature length in bytes, `None` for `Unknown`.
    pub const fn signature_len(self) -> Option<usize> {
        match self.signature() {
            Some(sig) => Some(sig.len()),
            None => None,
        }
    }

    /// Number of leading bytes to discard to reach the payload, `-1` for `Unknown`.
    pub const fn skip_len(self) -> isize {
        match self {
            BomKind::Unknown => -1,
            BomKind::Utf8 => UTF8_BOM.len() as isize,
            BomKind::Utf16Le => UTF16LE_BOM.len() as isize,
            BomKind::Utf16Be => UTF16BE_BOM.len() as isize,
            BomKind::Utf32Le => UTF32LE_BOM.len() as isize,
            BomKind::Utf32Be => UTF32BE_BOM.len() as isize,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, BomKind::Unknown)
    }

    /// Canonical encoding label, e.g. `UTF-16LE`.
    pub const fn encoding_name(self) -> &'static str {
        match self {
            BomKind::Unknown => "unknown",
            BomKind::Utf8 => "UTF-8",
            BomKind::Utf16Le => "UTF-16LE",
            BomKind::Utf16Be => "UTF-16BE",
            BomKind::Utf32Le => "UTF-32LE",
            BomKind::Utf32Be => "UTF-32BE",
        }
    }
}

impl fmt::Display for BomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoding_name())
    }
}
