//! Test helpers for staging CLI inputs on disk and stubbing the directory.

use camino::{Utf8Path, Utf8PathBuf};
use civic_priority_core::test_support::{StaticPlacesClient, place_north_of};
use civic_priority_core::{Coordinate, FacilityQueryClient};
use civic_priority_scorer::EngineConfig;
use std::time::Duration;
use tempfile::TempDir;

use crate::CliError;
use crate::score::{ScoreClientBuilder, ScoreConfig};

/// Temporary directory with a UTF-8 root.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test input");
}

pub(super) const NEW_DELHI_REQUEST: &str = r#"{
    "latitude": 28.6139,
    "longitude": 77.209,
    "complaintType": "pothole",
    "locationMeta": {"privacyLevel": "street", "radiusM": 20.0}
}"#;

/// Directory stub with one hospital 500 m north of New Delhi's centre.
#[derive(Debug, Default)]
pub(super) struct StubClientBuilder;

impl ScoreClientBuilder for StubClientBuilder {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig::default().with_intervals(Duration::ZERO, Duration::ZERO)
    }

    fn build(
        &self,
        _config: &ScoreConfig,
        _engine: &EngineConfig,
    ) -> Result<Box<dyn FacilityQueryClient>, CliError> {
        let origin = Coordinate::new(28.6139, 77.209).expect("valid coordinate");
        let hospital = place_north_of(&origin, 500.0, "Lok Nayak Hospital", "h-1")
            .with_types(&["hospital", "health"]);
        Ok(Box::new(
            StaticPlacesClient::default().with_places("hospital", vec![hospital]),
        ))
    }
}
