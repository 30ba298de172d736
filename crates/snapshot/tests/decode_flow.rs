use flate2::write::GzEncoder;
use flate2::Compression;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use strategist_snapshot::{decode_bytes, decode_file, DecodeOptions, DumpOutcome, SnapshotError};
use tempfile::TempDir;

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("compress");
    encoder.finish().expect("finish")
}

fn sample_document() -> Value {
    json!({
        "currentID": {"value": 42},
        "gamestates": {
            "PavonisInteractive.TerraInvicta.TIFactionState": [
                {"Key": {"value": 1}, "Value": {"displayName": "Resistance", "hate": 0.5}}
            ]
        }
    })
}

proptest! {
    #[test]
    fn one_stray_prefix_byte_decodes_like_the_clean_document(prefix in any::<u8>().prop_filter("not a brace", |b| *b != b'{')) {
        let text = serde_json::to_vec(&sample_document()).expect("serialize");
        let mut prefixed = vec![prefix];
        prefixed.extend_from_slice(&text);

        let opts = DecodeOptions::default();
        let clean = decode_bytes(&gzip(&text), &opts).expect("clean decode");
        let dirty = decode_bytes(&gzip(&prefixed), &opts).expect("prefixed decode");
        prop_assert_eq!(clean, dirty);
    }
}

#[test]
fn non_json_text_is_a_parse_failure() {
    let blob = gzip(b"{ this is not json");
    let err = decode_bytes(&blob, &DecodeOptions::default()).unwrap_err();
    match err {
        SnapshotError::Parse { dump, .. } => assert_eq!(dump, DumpOutcome::NotRequested),
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn text_without_any_object_is_an_empty_document() {
    let blob = gzip(b"definitely not a save");
    let err = decode_bytes(&blob, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::EmptyDocument), "got {err:?}");
}

#[test]
fn parse_failure_dumps_cleaned_text_when_requested() {
    let temp = TempDir::new().expect("tempdir");
    let dump_path = temp.path().join("cleaned.json");
    let blob = gzip(b"#{\"hi\": Infinity,");

    let err = decode_bytes(&blob, &DecodeOptions::with_dump(&dump_path)).unwrap_err();
    match err {
        SnapshotError::Parse { dump, .. } => {
            assert_eq!(dump, DumpOutcome::Written(dump_path.clone()));
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
    let written = std::fs::read_to_string(&dump_path).expect("dump exists");
    assert_eq!(written, "{\"hi\": 1e300,");
}

#[test]
fn failed_dump_does_not_mask_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    let dump_path = temp.path().join("missing-dir").join("cleaned.json");
    let blob = gzip(b"{broken");

    let err = decode_bytes(&blob, &DecodeOptions::with_dump(&dump_path)).unwrap_err();
    match &err {
        SnapshotError::Parse { dump, .. } => {
            assert!(matches!(dump, DumpOutcome::Failed { path, .. } if path == &dump_path));
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
    assert!(err.to_string().contains("could not write cleaned text"));
}

#[tokio::test]
async fn decode_file_reports_the_path_on_io_failure() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("nope.gz");
    let err = decode_file(&path, &DecodeOptions::default()).await.unwrap_err();
    match &err {
        SnapshotError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected io failure, got {other:?}"),
    }
    assert!(err.to_string().contains("nope.gz"));
}

#[tokio::test]
async fn decode_file_reads_gzip_from_disk() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("save.gz");
    let text = serde_json::to_vec(&sample_document()).expect("serialize");
    tokio::fs::write(&path, gzip(&text)).await.expect("write");

    let value = decode_file(&path, &DecodeOptions::default())
        .await
        .expect("decode");
    assert_eq!(value, sample_document());
}
