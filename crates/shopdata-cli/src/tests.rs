use std::path::{Path, PathBuf};

use super::*;

#[test]
fn parses_extract_command() {
    let cli = Cli::try_parse_from(["shopdata", "extract", "raw.json", "-o", "out.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Extract { ref input, ref output }
            if input == Path::new("raw.json") && output == Path::new("out.json")
    ));
}

#[test]
fn extract_requires_output() {
    assert!(Cli::try_parse_from(["shopdata", "extract", "raw.json"]).is_err());
}

#[test]
fn parses_process_with_defaults() {
    let cli = Cli::try_parse_from(["shopdata", "process", "data/phones.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Process {
            json_out: None,
            csv_out: None,
            report_out: None,
            ..
        }
    ));
}

#[test]
fn process_outputs_derive_from_input() {
    let outputs =
        process::ProcessOutputs::resolve(Path::new("data/phones.json"), None, None, None);
    assert_eq!(outputs.json, PathBuf::from("data/phones.processed.json"));
    assert_eq!(outputs.csv, PathBuf::from("data/phones.processed.csv"));
    assert_eq!(outputs.report, PathBuf::from("data/phones.report.json"));
}

#[test]
fn process_outputs_keep_explicit_paths() {
    let outputs = process::ProcessOutputs::resolve(
        Path::new("phones.json"),
        Some(PathBuf::from("out/p.json")),
        None,
        None,
    );
    assert_eq!(outputs.json, PathBuf::from("out/p.json"));
    assert_eq!(outputs.csv, PathBuf::from("phones.processed.csv"));
}

#[test]
fn parses_upload_with_category_name() {
    let cli = Cli::try_parse_from([
        "shopdata",
        "upload",
        "processed.json",
        "--category",
        "tablets",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Upload {
            category: Some(ProductCategory::Tablet),
            category_id: None,
            limit: None,
            ..
        }
    ));
}

#[test]
fn parses_upload_with_category_id_and_limit() {
    let cli = Cli::try_parse_from([
        "shopdata",
        "upload",
        "processed.json",
        "--category-id",
        "9",
        "--limit",
        "1",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Upload {
            category: None,
            category_id: Some(9),
            limit: Some(1),
            ..
        }
    ));
}

#[test]
fn upload_category_and_category_id_conflict() {
    let result = Cli::try_parse_from([
        "shopdata",
        "upload",
        "processed.json",
        "--category",
        "phone",
        "--category-id",
        "2",
    ]);
    assert!(result.is_err());
}

#[test]
fn upload_rejects_unknown_category() {
    let result = Cli::try_parse_from([
        "shopdata",
        "upload",
        "processed.json",
        "--category",
        "toaster",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_strip_fields_with_repeated_field() {
    let cli = Cli::try_parse_from([
        "shopdata",
        "strip-fields",
        "processed.json",
        "--field",
        "color",
        "-f",
        "storageOptions",
        "--no-backup",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::StripFields { ref fields, no_backup: true, .. }
            if fields == &["color".to_string(), "storageOptions".to_string()]
    ));
}

#[test]
fn strip_fields_requires_a_field() {
    assert!(Cli::try_parse_from(["shopdata", "strip-fields", "processed.json"]).is_err());
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["shopdata"]).is_err());
}

#[test]
fn process_command_writes_all_sinks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("phones.json");
    std::fs::write(
        &input,
        r#"{"data": {"products": [
            {"name": "Xiaomi 14T", "price": "12.990.000₫", "images": ["x-1-.jpg"]},
            {"name": "Redmi Note 13", "price": ""}
        ]}}"#,
    )
    .unwrap();

    let outputs = process::ProcessOutputs::resolve(&input, None, None, None);
    process::run_process(&input, &outputs).expect("process should succeed");

    let products = shopdata_normalize::read_products(&outputs.json).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price.numeric, 12_990_000);
    assert!(outputs.csv.exists());
    let report = shopdata_normalize::read_json_value(&outputs.report).unwrap();
    assert_eq!(report["totalProducts"], 2);
    assert_eq!(report["coverage"]["withPrice"], 1);
}

#[test]
fn process_command_fails_on_unreadable_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("missing.json");
    let outputs = process::ProcessOutputs::resolve(&input, None, None, None);
    assert!(process::run_process(&input, &outputs).is_err());
    assert!(!outputs.json.exists());
}
