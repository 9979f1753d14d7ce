//! End-to-end tests of `prepare` over a complete, valid settings set.

use hyperiso_schema::{
    parse_settings_str, prepare, ConfigError, ErrorKind, RawSettings, ValidationOutcome,
    BUILD_NAME_KEY,
};
use std::path::PathBuf;

fn test_settings() -> RawSettings {
    RawSettings::new()
        .with("iso_checksum", "foo")
        .with("iso_checksum_type", "md5")
        .with("iso_url", "http://example.test")
        .with("shutdown_command", "yes")
        .with("ssh_username", "foo")
        .with("ram_size", 64)
        .with("disk_size", 256)
        .with("disk_block_size", 1)
        .with("guest_additions_mode", "none")
        .with(BUILD_NAME_KEY, "foo")
}

fn expect_valid(outcome: ValidationOutcome) -> (hyperiso_schema::ResolvedConfig, Vec<String>) {
    match outcome {
        ValidationOutcome::Valid { config, warnings } => (config, warnings),
        ValidationOutcome::Invalid { errors, .. } => panic!("should not have error: {errors}"),
    }
}

fn expect_invalid(outcome: &ValidationOutcome) -> Vec<ErrorKind> {
    assert!(outcome.warnings().is_empty(), "failure must carry no warnings");
    outcome
        .errors()
        .unwrap_or_else(|| panic!("should have error: {:?}", outcome.config()))
        .kinds()
}

#[test]
fn defaults_derive_vm_name() {
    let (config, warnings) = expect_valid(prepare(&test_settings()));
    assert!(warnings.is_empty(), "bad: {warnings:?}");
    assert_eq!(config.vm_name, "packer-foo");
    assert_eq!(config.output_directory, "output-foo");
    assert_eq!(config.ram_size, 64);
    assert_eq!(config.shutdown_command.as_deref(), Some("yes"));
}

#[test]
fn disk_size_defaults_when_missing_or_zero() {
    let mut raw = test_settings();
    raw.remove("disk_size");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.disk_size, 40 * 1024);

    raw.set("disk_size", 0);
    let (config, _) = expect_valid(prepare(&raw));
    assert_eq!(config.disk_size, 40 * 1024);

    raw.set("disk_size", 256);
    let (config, _) = expect_valid(prepare(&raw));
    assert_eq!(config.disk_size, 256);
}

#[test]
fn disk_block_size_defaults_and_range() {
    let mut raw = test_settings();
    raw.remove("disk_block_size");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.disk_block_size, 32);

    for size in [0_i64, 1, 32, 256, 512, 1024, 32 * 1024] {
        raw.set("disk_block_size", size);
        let outcome = prepare(&raw);
        if size > 256 {
            assert_eq!(
                expect_invalid(&outcome),
                vec![ErrorKind::Range],
                "disk_block_size={size} outside [1, 256]"
            );
        } else {
            let (config, warnings) = expect_valid(outcome);
            assert!(warnings.is_empty());
            let expected = if size == 0 { 32 } else { size as u64 };
            assert_eq!(config.disk_block_size, expected);
        }
    }
}

#[test]
fn floppy_files_absent_resolve_to_empty() {
    let (config, warnings) = expect_valid(prepare(&test_settings()));
    assert!(warnings.is_empty());
    assert!(config.floppy_files.is_empty());
}

#[test]
fn floppy_files_are_kept_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let bar = dir.path().join("bar.bat");
    let foo = dir.path().join("foo.ps1");
    std::fs::write(&bar, "echo bar").unwrap();
    std::fs::write(&foo, "Write-Host foo").unwrap();

    let files = vec![
        foo.to_string_lossy().into_owned(),
        bar.to_string_lossy().into_owned(),
    ];
    let raw = test_settings().with("floppy_files", files);
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.floppy_files, vec![foo, bar]);
}

#[test]
fn missing_floppies_report_one_error_each() {
    let raw = test_settings().with("floppy_files", vec!["nonexistent.bat", "nonexistent.ps1"]);
    let outcome = prepare(&raw);
    assert_eq!(
        expect_invalid(&outcome),
        vec![ErrorKind::Reference, ErrorKind::Reference]
    );

    let paths: Vec<PathBuf> = outcome
        .errors()
        .into_iter()
        .flatten()
        .filter_map(|e| match e {
            ConfigError::UnreadableFile { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("nonexistent.bat"),
            PathBuf::from("nonexistent.ps1")
        ]
    );
}

#[test]
fn unknown_key_is_schema_error() {
    let raw = test_settings().with("i_should_not_be_valid", true);
    let outcome = prepare(&raw);
    assert_eq!(expect_invalid(&outcome), vec![ErrorKind::Schema]);
    assert!(outcome
        .errors()
        .unwrap()
        .to_string()
        .contains("i_should_not_be_valid"));
}

#[test]
fn iso_checksum_required_and_lowercased() {
    let raw = test_settings().with("iso_checksum", "");
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::RequiredField]
    );

    let raw = test_settings().with("iso_checksum", "FOo");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.iso_checksum, "foo");
}

#[test]
fn iso_checksum_type_rules() {
    let raw = test_settings().with("iso_checksum_type", "");
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::RequiredField]
    );

    let raw = test_settings().with("iso_checksum_type", "mD5");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.iso_checksum_type, "md5");

    let raw = test_settings().with("iso_checksum_type", "unknown-algo");
    assert_eq!(expect_invalid(&prepare(&raw)), vec![ErrorKind::Enum]);

    let raw = test_settings().with("iso_checksum_type", "none");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert_eq!(warnings.len(), 1);
    assert_eq!(config.iso_checksum_type, "none");
}

#[test]
fn none_checksum_type_allows_empty_checksum() {
    let raw = test_settings()
        .with("iso_checksum", "")
        .with("iso_checksum_type", "none");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert_eq!(warnings.len(), 1);
    assert!(config.iso_checksum.is_empty());
}

#[test]
fn iso_url_forms() {
    let mut raw = test_settings();
    raw.remove("iso_url");

    raw.set("iso_url", "");
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::RequiredField]
    );

    raw.set("iso_url", "http://example.test");
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.iso_urls, vec!["http://example.test"]);

    raw.set("iso_urls", vec!["http://example.test"]);
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::MutualExclusion]
    );

    raw.remove("iso_url");
    raw.set(
        "iso_urls",
        vec!["http://example.test", "http://mirror.example.test"],
    );
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(
        config.iso_urls,
        vec!["http://example.test", "http://mirror.example.test"]
    );
}

#[test]
fn blank_iso_urls_entries_are_rejected() {
    let mut raw = test_settings();
    raw.remove("iso_url");
    raw.set("iso_urls", vec!["", "http://a.test"]);
    let outcome = prepare(&raw);
    assert_eq!(expect_invalid(&outcome), vec![ErrorKind::RequiredField]);
    assert_eq!(
        outcome.errors().map(|e| e.as_slice().to_vec()),
        Some(vec![ConfigError::BlankListEntry {
            field: "iso_urls",
            index: 0,
        }])
    );

    raw.set("iso_urls", vec!["  http://a.test  "]);
    let (config, _) = expect_valid(prepare(&raw));
    assert_eq!(config.iso_urls, vec!["http://a.test"]);
}

#[test]
fn independent_problems_are_all_reported() {
    let raw = RawSettings::new()
        .with("iso_url", "http://example.test")
        .with("iso_urls", vec!["http://mirror.example.test"])
        .with("iso_checksum", "")
        .with("iso_checksum_type", "crc32")
        .with("disk_block_size", 1024)
        .with("floppy_files", vec!["nonexistent.bat"])
        .with("bogus", 1);
    let kinds = expect_invalid(&prepare(&raw));
    assert_eq!(
        kinds,
        vec![
            ErrorKind::Schema,
            ErrorKind::MutualExclusion,
            ErrorKind::Enum,
            ErrorKind::RequiredField,
            ErrorKind::Range,
            ErrorKind::Reference,
        ]
    );
}

#[test]
fn wrong_value_type_does_not_hide_other_errors() {
    let raw = test_settings()
        .with("disk_size", "huge")
        .with("iso_checksum_type", "fake");
    let outcome = prepare(&raw);
    assert_eq!(
        expect_invalid(&outcome),
        vec![ErrorKind::Schema, ErrorKind::Enum]
    );
    assert_eq!(outcome.config().disk_size, 40 * 1024);
}

#[test]
fn supplemental_ranges_and_enums() {
    let raw = test_settings()
        .with("ram_size", 16)
        .with("disk_size", 100)
        .with("generation", 3);
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::Range, ErrorKind::Range, ErrorKind::Enum]
    );

    let raw = test_settings().with("generation", 2).with("cpus", 4);
    let (config, _) = expect_valid(prepare(&raw));
    assert_eq!(config.generation, 2);
    assert_eq!(config.cpus, 4);
}

#[test]
fn guest_additions_attach_requires_existing_iso() {
    let raw = test_settings().with("guest_additions_mode", "attach");
    assert_eq!(
        expect_invalid(&prepare(&raw)),
        vec![ErrorKind::RequiredField]
    );

    let dir = tempfile::tempdir().unwrap();
    let iso = dir.path().join("vmguest.iso");
    std::fs::write(&iso, b"iso").unwrap();
    let raw = raw.with("guest_additions_path", iso.to_string_lossy().into_owned());
    let (config, _) = expect_valid(prepare(&raw));
    assert_eq!(config.guest_additions_path, Some(iso));
}

#[test]
fn prepare_is_idempotent() {
    let raw = test_settings()
        .with("iso_checksum_type", "NONE")
        .with("floppy_files", vec!["nonexistent.bat"]);
    assert_eq!(prepare(&raw), prepare(&raw));

    let raw = test_settings().with("iso_checksum", "ABC");
    assert_eq!(prepare(&raw), prepare(&raw));
}

#[test]
fn settings_file_feeds_prepare() {
    let raw = parse_settings_str(
        r#"
packer_build_name = "win2022"
iso_urls = ["http://example.test/a.iso", "http://example.test/b.iso"]
iso_checksum = "DEADBEEF"
iso_checksum_type = "SHA256"
disk_block_size = 0
"#,
    )
    .unwrap();
    let (config, warnings) = expect_valid(prepare(&raw));
    assert!(warnings.is_empty());
    assert_eq!(config.vm_name, "packer-win2022");
    assert_eq!(config.iso_checksum, "deadbeef");
    assert_eq!(config.iso_checksum_type, "sha256");
    assert_eq!(config.disk_block_size, 32);
    assert_eq!(config.iso_urls.len(), 2);
}
