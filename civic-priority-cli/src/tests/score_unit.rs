//! Focused unit tests covering score CLI configuration and request loading.

use super::helpers::{NEW_DELHI_REQUEST, StubClientBuilder, Workspace, write_utf8};
use super::*;
use crate::score::{ScoreConfig, config_from_layers_for_test};
use civic_priority_core::{PriorityLevel, PrivacyLevel};
use civic_priority_data::places::DEFAULT_BASE_URL;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;

fn flag_args() -> ScoreArgs {
    ScoreArgs {
        latitude: Some(28.6139),
        longitude: Some(77.209),
        api_key: Some("test-key".to_owned()),
        ..ScoreArgs::default()
    }
}

#[rstest]
fn converting_without_api_key_errors() {
    let args = ScoreArgs {
        api_key: None,
        ..flag_args()
    };
    let err = ScoreConfig::try_from(args).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_API_KEY);
            assert_eq!(env, ENV_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::no_latitude(None, Some(77.209), ARG_LATITUDE, ENV_LATITUDE)]
#[case::no_longitude(Some(28.6139), None, ARG_LONGITUDE, ENV_LONGITUDE)]
fn converting_without_position_or_request_errors(
    #[case] latitude: Option<f64>,
    #[case] longitude: Option<f64>,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let args = ScoreArgs {
        latitude,
        longitude,
        ..flag_args()
    };
    let err = ScoreConfig::try_from(args).expect_err("missing position should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn request_file_makes_position_optional() {
    let args = ScoreArgs {
        request_path: Some("request.json".into()),
        api_key: Some("test-key".to_owned()),
        ..ScoreArgs::default()
    };
    let config = ScoreConfig::try_from(args).expect("config should build");
    assert_eq!(config.places_base_url, DEFAULT_BASE_URL);
    assert_eq!(config.overrides.latitude, None);
}

#[rstest]
fn flags_override_request_file() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    write_utf8(&request_path, NEW_DELHI_REQUEST.as_bytes());
    let args = ScoreArgs {
        request_path: Some(request_path),
        complaint_type: Some("sewage_overflow".to_owned()),
        privacy_level: Some(PrivacyLevel::Area),
        api_key: Some("test-key".to_owned()),
        ..ScoreArgs::default()
    };

    let request = ScoreConfig::try_from(args)
        .expect("config should build")
        .load_request()
        .expect("request should load");

    assert_eq!(request.latitude, 28.6139);
    assert_eq!(request.complaint_type, "sewage_overflow");
    assert_eq!(request.location_meta.privacy_level, PrivacyLevel::Area);
    assert_eq!(request.location_meta.radius_m, 20.0);
}

#[rstest]
fn invalid_request_json_is_reported() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    write_utf8(&request_path, b"{ not valid json");
    let config = ScoreConfig::try_from(ScoreArgs {
        request_path: Some(request_path.clone()),
        ..flag_args()
    })
    .expect("config should build");

    let err = config.load_request().expect_err("invalid json should error");
    match err {
        CliError::ParseInput { field, path, .. } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
#[case::request(ARG_REQUEST)]
#[case::catalog(ARG_CATALOG)]
fn validate_sources_reports_missing_files(#[case] expected_field: &'static str) {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    let catalog_path = workspace.path("catalog.json");
    if expected_field != ARG_REQUEST {
        write_utf8(&request_path, NEW_DELHI_REQUEST.as_bytes());
    }
    let config = ScoreConfig::try_from(ScoreArgs {
        request_path: Some(request_path),
        catalog: Some(catalog_path),
        ..flag_args()
    })
    .expect("config should build");

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    std::fs::create_dir(request_path.as_std_path()).expect("request directory");
    let config = ScoreConfig::try_from(ScoreArgs {
        request_path: Some(request_path.clone()),
        ..flag_args()
    })
    .expect("config should build");

    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "latitude": "north" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "latitude": 19.076,
            "longitude": 72.8777,
            "places_base_url": "http://from-file:8080/place",
        }),
        None,
    );
    composer.push_environment(json!({
        "api_key": "from-env",
        "latitude": 12.9716,
    }));
    composer.push_cli(json!({ "longitude": 77.5946 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.api_key, "from-env");
    assert_eq!(config.overrides.latitude, Some(12.9716));
    assert_eq!(config.overrides.longitude, Some(77.5946));
    assert_eq!(config.places_base_url, "http://from-file:8080/place");
}

#[rstest]
fn scoring_writes_result_json() {
    let mut stdout = Vec::new();
    run_score_with(
        ScoreArgs {
            complaint_type: Some("pothole".to_owned()),
            ..flag_args()
        },
        &StubClientBuilder,
        &mut stdout,
    )
    .expect("score should succeed");

    let output: serde_json::Value = serde_json::from_slice(&stdout).expect("JSON output");
    let score = output["priorityScore"].as_f64().expect("numeric score");
    assert!((0.0..=1.0).contains(&score));
    let hospital = output["perType"]["hospital"]["score"]
        .as_f64()
        .expect("hospital analysis");
    assert!(hospital > 0.0);
    assert!(output.get("error").is_none());
    assert_eq!(
        output["priorityLevel"],
        json!(PriorityLevel::from_score(score).as_str())
    );
}

#[rstest]
fn scoring_out_of_area_prints_fallback() {
    let mut stdout = Vec::new();
    run_score_with(
        ScoreArgs {
            latitude: Some(45.0),
            longitude: Some(10.0),
            ..flag_args()
        },
        &StubClientBuilder,
        &mut stdout,
    )
    .expect("fallback is still a successful run");

    let output: serde_json::Value = serde_json::from_slice(&stdout).expect("JSON output");
    assert_eq!(output["priorityScore"], json!(0.5));
    assert_eq!(output["error"]["kind"], json!("invalid_coordinate"));
    assert_eq!(output["error"]["status"], json!(400));
    assert!(output["error"].get("retryAfterSecs").is_none());
}
