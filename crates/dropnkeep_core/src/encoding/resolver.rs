//! First-success-wins encoding resolver.

use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};
use log::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Character encodings the resolver knows how to attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    /// UTF-8, rejecting any invalid byte sequence.
    Utf8,
    /// Shift-JIS; any malformed or unmapped sequence rejects the input so
    /// single-byte text falls through to Windows-1252.
    ShiftJis,
    /// Windows-1252 single-byte decode; total over all byte values.
    Windows1252,
}

impl SourceEncoding {
    /// WHATWG label for this encoding.
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::ShiftJis => "shift_jis",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Attempts one decode. `None` means this candidate rejected the input.
    fn try_decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
            }
            Self::ShiftJis => SHIFT_JIS
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Self::Windows1252 => Some(decode_single_byte(bytes)),
        }
    }
}

/// Text produced by the resolver together with the encoding that won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    text: String,
    encoding: SourceEncoding,
}

impl DecodedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq<&str> for DecodedText {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

/// Seam used by the drop pipeline so decoding can be observed in tests.
pub trait TextResolver {
    fn resolve(&self, bytes: &[u8]) -> DecodedText;
}

/// Ordered decode policy with a guaranteed single-byte terminal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResolver {
    candidates: Vec<SourceEncoding>,
}

impl Default for EncodingResolver {
    /// Strict UTF-8, then strict Shift-JIS, then Windows-1252.
    fn default() -> Self {
        Self::with_candidates(&[SourceEncoding::Utf8, SourceEncoding::ShiftJis])
    }
}

impl EncodingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resolver trying `leading` in order before the terminal
    /// Windows-1252 step.
    pub fn with_candidates(leading: &[SourceEncoding]) -> Self {
        let mut candidates = leading
            .iter()
            .copied()
            .filter(|encoding| *encoding != SourceEncoding::Windows1252)
            .collect::<Vec<_>>();
        candidates.push(SourceEncoding::Windows1252);
        Self { candidates }
    }

    /// Candidate order, terminal step included.
    pub fn candidates(&self) -> &[SourceEncoding] {
        &self.candidates
    }

    /// Decodes `bytes` with the first candidate that accepts them.
    pub fn decode(&self, bytes: &[u8]) -> DecodedText {
        for &encoding in &self.candidates {
            if let Some(text) = encoding.try_decode(bytes) {
                debug!(
                    "event=decode module=encoding status=ok encoding={} bytes={} chars={}",
                    encoding.label(),
                    bytes.len(),
                    text.chars().count()
                );
                return DecodedText { text, encoding };
            }
            debug!(
                "event=decode module=encoding status=rejected encoding={} bytes={}",
                encoding.label(),
                bytes.len()
            );
        }

        DecodedText {
            text: decode_single_byte(bytes),
            encoding: SourceEncoding::Windows1252,
        }
    }
}

impl TextResolver for EncodingResolver {
    fn resolve(&self, bytes: &[u8]) -> DecodedText {
        self.decode(bytes)
    }
}

/// Decodes `bytes` with the default policy.
pub fn resolve(bytes: &[u8]) -> DecodedText {
    EncodingResolver::default().decode(bytes)
}

fn decode_single_byte(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::{resolve, EncodingResolver, SourceEncoding};

    #[test]
    fn empty_buffer_decodes_as_utf8() {
        let decoded = resolve(&[]);
        assert_eq!(decoded, "");
        assert_eq!(decoded.encoding(), SourceEncoding::Utf8);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = resolve(b"\xEF\xBB\xBFhello");
        assert_eq!(decoded, "hello");
        assert_eq!(decoded.encoding(), SourceEncoding::Utf8);
    }

    #[test]
    fn terminal_step_is_always_last_and_unique() {
        let resolver = EncodingResolver::with_candidates(&[
            SourceEncoding::Windows1252,
            SourceEncoding::Utf8,
        ]);
        assert_eq!(
            resolver.candidates(),
            &[SourceEncoding::Utf8, SourceEncoding::Windows1252]
        );
    }

    #[test]
    fn malformed_shift_jis_falls_through_to_single_byte() {
        // 0xE9 is a Shift-JIS lead byte, but nothing valid follows it.
        let decoded = resolve(b"caf\xE9");
        assert_eq!(decoded, "caf\u{e9}");
        assert_eq!(decoded.encoding(), SourceEncoding::Windows1252);
    }

    #[test]
    fn single_byte_step_maps_c1_range() {
        let resolver = EncodingResolver::with_candidates(&[]);
        let decoded = resolver.decode(&[0x80, 0x41]);
        assert_eq!(decoded, "\u{20AC}A");
    }
}
