use std::{fs, path::PathBuf};

use tempfile::tempdir;

use elkjson_cli::{Args, CliError, run};
use elkjson_core::model::GraphElement;
use elkjson_parser::error::ErrorCode;

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Samples live at the workspace root, not in the crate
fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("samples")
}

fn args_for(input: impl Into<String>) -> Args {
    Args {
        input: input.into(),
        config: None,
        log_level: "off".to_string(),
        no_recovery: false,
        generate_ids: false,
    }
}

/// An empty configuration file, so a config in the user's environment does
/// not leak into the test.
fn default_config(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    path.to_string_lossy().to_string()
}

#[test]
fn e2e_smoke_test_valid_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);

    let valid_samples = collect_json_files(samples_dir());
    assert!(!valid_samples.is_empty(), "No valid samples found in samples/");

    let mut failed_samples = Vec::new();

    for sample_path in &valid_samples {
        let args = Args {
            config: Some(config.clone()),
            ..args_for(sample_path.to_string_lossy())
        };

        if let Err(e) = run(&args) {
            failed_samples.push((sample_path.clone(), e));
        }
    }

    if !failed_samples.is_empty() {
        eprintln!("\nValid samples that failed:");
        for (path, err) in &failed_samples {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid sample(s) failed unexpectedly", failed_samples.len());
    }
}

#[test]
fn e2e_smoke_test_error_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);

    let error_samples = collect_json_files(samples_dir().join("errors"));
    assert!(
        !error_samples.is_empty(),
        "No error samples found in samples/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for sample_path in &error_samples {
        let args = Args {
            config: Some(config.clone()),
            ..args_for(sample_path.to_string_lossy())
        };

        match run(&args) {
            Err(CliError::Parse { err, .. }) => {
                assert!(
                    !err.diagnostics().is_empty(),
                    "{} failed without diagnostics",
                    sample_path.display()
                );
            }
            Err(other) => panic!("{}: unexpected error {other}", sample_path.display()),
            Ok(_) => unexpectedly_succeeded.push(sample_path.clone()),
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError samples that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error sample(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_summary_counts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);
    let args = Args {
        config: Some(config),
        ..args_for(samples_dir().join("hierarchy.json").to_string_lossy())
    };

    let report = run(&args).expect("hierarchy sample should parse");
    let summary = report.summary;

    assert_eq!(summary.nodes, 5);
    assert_eq!(summary.ports, 1);
    assert_eq!(summary.edges, 4);
    assert_eq!(summary.labels, 2);
    assert_eq!(summary.unresolved, 0);
    assert_eq!(summary.hyperedges, 1);
    assert_eq!(summary.generated_ids, None);
    assert!(report.warnings.is_empty());
    assert!(summary.to_string().contains("nodes:        5"));
}

#[test]
fn e2e_recovery_reports_every_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);
    let input = samples_dir().join("errors").join("missing_comma.json");

    let args = Args {
        config: Some(config.clone()),
        ..args_for(input.to_string_lossy())
    };
    let Err(CliError::Parse { err, .. }) = run(&args) else {
        panic!("Expected parse error");
    };
    assert_eq!(err.diagnostics().len(), 2);

    let args = Args {
        config: Some(config),
        no_recovery: true,
        ..args_for(input.to_string_lossy())
    };
    let Err(CliError::Parse { err, .. }) = run(&args) else {
        panic!("Expected parse error");
    };
    assert_eq!(err.diagnostics().len(), 1);
}

#[test]
fn e2e_config_file_controls_duplicates() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("duplicates.json");
    fs::write(&input, r#"{ children: [ { id: "a" }, { id: "a" } ] }"#).unwrap();

    let warn_config = default_config(&temp_dir);
    let args = Args {
        config: Some(warn_config),
        ..args_for(input.to_string_lossy())
    };
    let report = run(&args).expect("duplicates are only a warning by default");
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code(), Some(ErrorCode::E202));

    let error_config = temp_dir.path().join("strict.toml");
    fs::write(&error_config, "[parser]\nduplicate_ids = \"error\"\n").unwrap();
    let args = Args {
        config: Some(error_config.to_string_lossy().to_string()),
        ..args_for(input.to_string_lossy())
    };
    assert!(matches!(run(&args), Err(CliError::Parse { .. })));
}

#[test]
fn e2e_generate_ids() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);
    let input = temp_dir.path().join("anonymous.json");
    fs::write(
        &input,
        r#"{ children: [ { ports: [ {} ] }, { id: "N1" } ], edges: [ {} ] }"#,
    )
    .unwrap();

    let args = Args {
        config: Some(config),
        generate_ids: true,
        ..args_for(input.to_string_lossy())
    };
    let report = run(&args).expect("document should parse");
    let doc = &report.document;
    let root = doc.node(doc.root());

    assert_eq!(report.summary.generated_ids, Some(4));
    assert_eq!(root.identifier(), Some("G1"));
    assert_eq!(doc.node(root.children()[0]).identifier(), Some("N2"));
    assert_eq!(doc.node(root.children()[1]).identifier(), Some("N1"));
    assert!(doc.edges().all(|(_, edge)| edge.identifier().is_some()));
    assert!(doc.ports().all(|(_, port)| port.identifier().is_some()));
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = default_config(&temp_dir);
    let args = Args {
        config: Some(config),
        ..args_for(temp_dir.path().join("absent.json").to_string_lossy())
    };

    assert!(matches!(run(&args), Err(CliError::Io(_))));
}

#[test]
fn e2e_missing_config_is_config_error() {
    let args = Args {
        config: Some("/nonexistent/elkjson/config.toml".to_string()),
        ..args_for(samples_dir().join("minimal.json").to_string_lossy())
    };

    assert!(matches!(run(&args), Err(CliError::Config(_))));
}
