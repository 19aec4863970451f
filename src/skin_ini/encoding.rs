//! Byte-order marker detection and lossy text codecs for `skin.ini`
//!
//! osu! writes skin.ini either as UTF-16 with a BOM or as a plain
//! single-byte file. Whatever we read, we write back the same way.

/// Text encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-16 little-endian, marked with `FF FE`
    Utf16Le,
    /// UTF-16 big-endian, marked with `FE FF`
    Utf16Be,
    /// ISO-8859-1: every byte maps to the code point of the same value
    #[default]
    Latin1,
}

const BOM_UTF16_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_UTF16_BE: [u8; 2] = [0xFE, 0xFF];

impl TextEncoding {
    /// Detect the encoding from the leading bytes.
    ///
    /// Returns the encoding, the marker bytes exactly as found (empty for
    /// [`TextEncoding::Latin1`]) and the remaining payload.
    pub fn detect(raw: &[u8]) -> (TextEncoding, &[u8], &[u8]) {
        if raw.starts_with(&BOM_UTF16_LE) {
            (TextEncoding::Utf16Le, &raw[..2], &raw[2..])
        } else if raw.starts_with(&BOM_UTF16_BE) {
            (TextEncoding::Utf16Be, &raw[..2], &raw[2..])
        } else {
            (TextEncoding::Latin1, &[], raw)
        }
    }

    /// Decode a payload (marker already stripped).
    ///
    /// Never fails. Unpaired surrogates and a dangling odd byte are dropped.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == TextEncoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                char::decode_utf16(units).filter_map(Result::ok).collect()
            }
        }
    }

    /// Encode text without a marker.
    ///
    /// Never fails. Characters outside Latin-1 are dropped for
    /// [`TextEncoding::Latin1`].
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Latin1 => text
                .chars()
                .filter_map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }
}
