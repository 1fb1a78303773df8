use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
    #[error("content looks binary (NUL byte at offset {offset})")]
    Binary { offset: usize },
}

/// Decode an uploaded job description into UTF-8 using: BOM -> NUL-byte check -> strict UTF-8 -> chardetng fallback.
pub fn decode_text(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    // UTF-16 files carry NUL bytes, so the BOM has to be checked first.
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(offset) = bytes.iter().position(|b| *b == 0) {
        return Err(DecodeError::Binary { offset });
    }

    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedText, DecodeError> {
    // `decode` strips a matching BOM.
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_is_kept() {
        let decoded = decode_text("Développeur Rust à Pune".as_bytes()).unwrap();
        assert_eq!(decoded.text, "Développeur Rust à Pune");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_text(b"\xEF\xBB\xBFHello").unwrap();
        assert_eq!(decoded.text, "Hello");
    }

    #[test]
    fn utf16_with_bom_is_decoded() {
        let bytes = [0xFF, 0xFE, b'H', 0, b'i', 0];
        let decoded = decode_text(&bytes).unwrap();
        assert_eq!(decoded.text, "Hi");
        assert_eq!(decoded.encoding_label, "UTF-16LE");
    }

    #[test]
    fn latin1_falls_back_to_detection() {
        let decoded =
            decode_text(b"Nous recherchons un d\xe9veloppeur senior \xe0 Lyon, exp\xe9rience requise.")
                .unwrap();
        assert!(decoded.text.contains("veloppeur senior"));
        assert!(!decoded.text.contains('\u{FFFD}'));
    }

    #[test]
    fn binary_content_is_rejected() {
        let err = decode_text(b"%PDF-1.7\x00\x01").unwrap_err();
        assert_eq!(err, DecodeError::Binary { offset: 8 });
    }
}
