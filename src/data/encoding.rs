//! Text decoding for the loader's encoding fallback chain.

/// Single-byte and UTF-8 encodings tried when reading a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Iso8859_1,
    Cp1252,
}

/// cp1252 mappings for 0x80..=0x9F. `None` marks bytes cp1252 leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl TextEncoding {
    /// Order in which the loader tries encodings.
    pub const FALLBACK_ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Iso8859_1,
        TextEncoding::Cp1252,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Cp1252 => "cp1252",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes).ok()?;
                Some(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
            }
            // Every byte is a valid Latin-1 code point.
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert_eq!(TextEncoding::Utf8.decode(b"Pok\xE9mon"), None);
        assert_eq!(
            TextEncoding::Utf8.decode("Pokémon".as_bytes()).as_deref(),
            Some("Pokémon")
        );
    }

    #[test]
    fn test_utf8_strips_byte_order_mark() {
        let bytes = b"\xEF\xBB\xBFname,rating";
        assert_eq!(
            TextEncoding::Utf8.decode(bytes).as_deref(),
            Some("name,rating")
        );
    }

    #[test]
    fn test_latin1_accepts_any_byte() {
        assert_eq!(
            TextEncoding::Latin1.decode(b"Pok\xE9mon").as_deref(),
            Some("Pokémon")
        );
    }

    #[test]
    fn test_cp1252_maps_high_range() {
        assert_eq!(
            TextEncoding::Cp1252.decode(b"\x93Hi\x94 \x80").as_deref(),
            Some("\u{201C}Hi\u{201D} \u{20AC}")
        );
        assert_eq!(TextEncoding::Cp1252.decode(b"\x81"), None);
    }
}
