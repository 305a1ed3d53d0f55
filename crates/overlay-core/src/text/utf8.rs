//! Permissive UTF-8 decoding.
//!
//! Well-formed sequences decode normally. Anything malformed (bad lead byte,
//! truncated sequence, overlong form, surrogate, out of range) yields
//! U+FFFD and consumes exactly one byte, so decoding always terminates.

/// Iterator over the code points of a byte string
pub struct Utf8Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for Utf8Decoder<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let rest = self.bytes.get(self.pos..).filter(|r| !r.is_empty())?;
        let (ch, consumed) = decode_one(rest);
        self.pos += consumed;
        Some(ch)
    }
}

/// Decode the first code point of a non-empty slice
fn decode_one(bytes: &[u8]) -> (char, usize) {
    let len = match bytes[0] {
        0x00..=0x7F => return (bytes[0] as char, 1),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };

    // from_utf8 rejects overlongs, surrogates and values past U+10FFFF
    match bytes.get(..len).map(std::str::from_utf8) {
        Some(Ok(s)) => match s.chars().next() {
            Some(ch) => (ch, len),
            None => (char::REPLACEMENT_CHARACTER, 1),
        },
        _ => (char::REPLACEMENT_CHARACTER, 1),
    }
}
