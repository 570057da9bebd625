use qr_reader::{ConfigError, ScanConfig, Symbology, VideoGravity};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_without_file_uses_defaults() {
    let cfg = ScanConfig::load(None).unwrap();
    assert_eq!(cfg.symbologies, vec![Symbology::Qr]);
    assert_eq!(cfg.corner_radius, 4.0);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
corner_radius = 12.0
gravity = "resize"
symbologies = ["qr", "aztec"]

[labels]
acknowledge = "Got it"
"#
    )
    .unwrap();

    let cfg = ScanConfig::load(Some(file.path())).unwrap();
    assert_eq!(cfg.corner_radius, 12.0);
    assert_eq!(cfg.gravity, VideoGravity::Resize);
    assert_eq!(cfg.symbologies, vec![Symbology::Qr, Symbology::Aztec]);
    assert_eq!(cfg.labels.acknowledge, "Got it");
    assert_eq!(cfg.labels.confirm_title, "QR Code");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScanConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_rejects_bad_values() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "overlay_opacity = -0.1").unwrap();
    let err = ScanConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
