use crate::error::{DumpOutcome, Result, SnapshotError};
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Finite stand-ins for the non-finite literals the game writes. The JSON
/// parser rejects `Infinity`, so the substitution happens on the text.
pub const NEGATIVE_INFINITY_SENTINEL: f64 = -1e300;
pub const POSITIVE_INFINITY_SENTINEL: f64 = 1e300;

const NEGATIVE_INFINITY_TOKEN: &str = "\": -Infinity";
const NEGATIVE_INFINITY_REPLACEMENT: &str = "\": -1e300";
const POSITIVE_INFINITY_TOKEN: &str = "\": Infinity";
const POSITIVE_INFINITY_REPLACEMENT: &str = "\": 1e300";

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Where to write the cleaned text when parsing fails.
    pub dump_path: Option<PathBuf>,
}

impl DecodeOptions {
    #[must_use]
    pub fn with_dump(path: impl Into<PathBuf>) -> Self {
        Self {
            dump_path: Some(path.into()),
        }
    }
}

/// Read a snapshot file and decode it.
pub async fn decode_file(path: &Path, options: &DecodeOptions) -> Result<Value> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode_bytes(&bytes, options)
}

/// Decompress, clean and parse a snapshot blob.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let raw = decompress(bytes)?;
    let cleaned = clean_text(&raw)?;

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => Ok(value),
        Err(source) => {
            let dump = match &options.dump_path {
                Some(path) => write_dump(path, &cleaned),
                None => DumpOutcome::NotRequested,
            };
            Err(SnapshotError::Parse { source, dump })
        }
    }
}

/// Strip leading garbage, check UTF-8 and substitute non-finite literals.
///
/// Stripping happens on bytes, so a stray prefix that is not valid UTF-8 on
/// its own is dropped before the text is validated.
pub fn clean_text(raw: &[u8]) -> Result<String> {
    let trimmed = strip_leading_garbage(raw);
    if trimmed.is_empty() {
        return Err(SnapshotError::EmptyDocument);
    }
    if trimmed.len() != raw.len() {
        log::debug!(
            "Stripped {} leading bytes before the first '{{'",
            raw.len() - trimmed.len()
        );
    }
    let text = String::from_utf8(trimmed.to_vec())?;
    Ok(replace_non_finite(&text))
}

fn strip_leading_garbage(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|b| *b == b'{').unwrap_or(raw.len());
    &raw[start..]
}

fn replace_non_finite(text: &str) -> String {
    text.replace(NEGATIVE_INFINITY_TOKEN, NEGATIVE_INFINITY_REPLACEMENT)
        .replace(POSITIVE_INFINITY_TOKEN, POSITIVE_INFINITY_REPLACEMENT)
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if bytes.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(bytes)
            .read_to_end(&mut out)
            .map_err(SnapshotError::Decompress)?;
        return Ok(out);
    }
    if looks_like_zlib(bytes) {
        ZlibDecoder::new(bytes)
            .read_to_end(&mut out)
            .map_err(SnapshotError::Decompress)?;
        return Ok(out);
    }
    if looks_like_plain_json(bytes) {
        log::debug!("Snapshot is not compressed; using it as-is");
        return Ok(bytes.to_vec());
    }
    DeflateDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(SnapshotError::Decompress)?;
    Ok(out)
}

fn looks_like_zlib(bytes: &[u8]) -> bool {
    match bytes {
        [cmf, flg, ..] => {
            *cmf & 0x0f == 8 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
        }
        _ => false,
    }
}

fn looks_like_plain_json(bytes: &[u8]) -> bool {
    // Allow a short run of stray bytes before the opening brace.
    bytes.iter().take(8).any(|b| *b == b'{')
}

fn write_dump(path: &Path, text: &str) -> DumpOutcome {
    match std::fs::write(path, text) {
        Ok(()) => {
            log::warn!("Wrote cleaned snapshot text to {}", path.display());
            DumpOutcome::Written(path.to_path_buf())
        }
        Err(err) => {
            log::warn!("Failed to write snapshot dump {}: {err}", path.display());
            DumpOutcome::Failed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).expect("compress");
        encoder.finish().expect("finish")
    }

    #[test]
    fn strips_stray_leading_character() {
        let cleaned = clean_text("\u{feff}{\"a\": 1}".as_bytes()).expect("clean");
        assert_eq!(cleaned, "{\"a\": 1}");
    }

    #[test]
    fn strips_prefix_that_is_not_utf8() {
        let cleaned = clean_text(b"\x80{\"a\": 1}").expect("clean");
        assert_eq!(cleaned, "{\"a\": 1}");
    }

    #[test]
    fn garbage_only_is_empty_document() {
        let err = clean_text(b"xyz").unwrap_err();
        assert!(matches!(err, SnapshotError::EmptyDocument));
    }

    #[test]
    fn substitutes_non_finite_literals() {
        let cleaned = clean_text(b"{\"lo\": -Infinity, \"hi\": Infinity}").expect("clean");
        assert_eq!(cleaned, "{\"lo\": -1e300, \"hi\": 1e300}");
        let value: Value = serde_json::from_str(&cleaned).expect("parse");
        assert_eq!(value["lo"].as_f64(), Some(NEGATIVE_INFINITY_SENTINEL));
        assert_eq!(value["hi"].as_f64(), Some(POSITIVE_INFINITY_SENTINEL));
    }

    #[test]
    fn gzip_zlib_and_plain_inputs_decode_alike() {
        let doc = "{\"gamestates\": {}}";
        let expected: Value = serde_json::from_str(doc).expect("parse");

        let mut zlib = flate2::write::ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(doc.as_bytes()).expect("compress");
        let zlib = zlib.finish().expect("finish");

        let opts = DecodeOptions::default();
        assert_eq!(decode_bytes(&gzip(doc), &opts).expect("gzip"), expected);
        assert_eq!(decode_bytes(&zlib, &opts).expect("zlib"), expected);
        assert_eq!(decode_bytes(doc.as_bytes(), &opts).expect("plain"), expected);
    }

    #[test]
    fn corrupt_gzip_is_a_decompress_error() {
        // Valid gzip header followed by a deflate block with the reserved type.
        let blob = [
            0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xde, 0xad, 0xbe, 0xef,
        ];
        let err = decode_bytes(&blob, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::Decompress(_)), "got {err:?}");
    }

    #[test]
    fn sentinel_arithmetic_saturates_only_multiplicatively() {
        // The sentinel survives additive aggregation but not products.
        let sum = POSITIVE_INFINITY_SENTINEL + POSITIVE_INFINITY_SENTINEL;
        assert!(sum.is_finite());
        assert!((POSITIVE_INFINITY_SENTINEL * POSITIVE_INFINITY_SENTINEL).is_infinite());
        assert_eq!(NEGATIVE_INFINITY_SENTINEL + POSITIVE_INFINITY_SENTINEL, 0.0);
    }
}
