//! Content-type sniffing for binary detection.
//!
//! Looks only at the leading `SNIFF_LEN` bytes. Known binary signatures map
//! to their media type, control bytes that never occur in text map to
//! `application/octet-stream`, everything else is `text/plain`.

use mime_guess::mime::{self, Mime};

use crate::git::content::SNIFF_LEN;

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b\x08", "application/gzip"),
    (b"\x00asm", "application/wasm"),
    (b"\x7fELF", "application/x-elf"),
];

pub fn detect_content_type(content: &[u8]) -> Mime {
    let head = &content[..content.len().min(SNIFF_LEN)];

    for (magic, media_type) in SIGNATURES {
        if head.starts_with(magic) {
            if let Ok(parsed) = media_type.parse::<Mime>() {
                return parsed;
            }
        }
    }

    if head.iter().any(|&b| is_binary_byte(b)) {
        mime::APPLICATION_OCTET_STREAM
    } else {
        mime::TEXT_PLAIN_UTF_8
    }
}

pub fn is_binary(content: &[u8]) -> bool {
    detect_content_type(content).type_() != mime::TEXT
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"fn main() {}\n".as_slice(), false)]
    #[case(b"".as_slice(), false)]
    #[case(b"tabs\tand\r\nnewlines\x0c".as_slice(), false)]
    #[case("ünïcödé".as_bytes(), false)]
    #[case(b"\x89PNG\r\n\x1a\n\x00\x00".as_slice(), true)]
    #[case(b"text\x00with nul".as_slice(), true)]
    #[case(b"\x7fELF\x02\x01".as_slice(), true)]
    fn classifies_content(#[case] content: &[u8], #[case] binary: bool) {
        assert_eq!(is_binary(content), binary);
    }

    #[test]
    fn only_the_prefix_is_inspected() {
        let mut content = vec![b'a'; SNIFF_LEN];
        content.push(0);
        assert!(!is_binary(&content));
    }

    #[test]
    fn signatures_name_their_type() {
        assert_eq!(detect_content_type(b"%PDF-1.7").essence_str(), "application/pdf");
        assert_eq!(detect_content_type(b"\x00\x01\x02"), mime::APPLICATION_OCTET_STREAM);
    }
}
