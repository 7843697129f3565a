use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Page text decoded to UTF-8 together with the encoding that was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub html: String,
    pub encoding_label: &'static str,
    /// Malformed sequences were replaced with U+FFFD, as a browser would.
    pub had_errors: bool,
}

/// Decode a response body: BOM, then Content-Type charset, then chardetng.
pub fn decode_document(bytes: &[u8], content_type: Option<&str>) -> DecodedDocument {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_param)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    DecodedDocument {
        html: text.into_owned(),
        encoding_label: used.name(),
        had_errors,
    }
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}
