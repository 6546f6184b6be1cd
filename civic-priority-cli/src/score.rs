//! Score command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use civic_priority_core::{FacilityQueryClient, PriorityRequest, PrivacyLevel};
use civic_priority_data::places::{DEFAULT_BASE_URL, HttpPlacesClient, HttpPlacesClientConfig};
use civic_priority_scorer::{EngineConfig, PriorityEngine};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::catalog::load_catalog_or_default;
use crate::fs::{read_json, require_existing};
use crate::{
    ARG_ACCURACY_M, ARG_API_KEY, ARG_CATALOG, ARG_COMPLAINT_TYPE, ARG_LATITUDE, ARG_LONGITUDE,
    ARG_PLACES_BASE_URL, ARG_PRIVACY_LEVEL, ARG_REQUEST, CliError, ENV_API_KEY, ENV_LATITUDE,
    ENV_LONGITUDE, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Score a complaint location by the critical infrastructure \
                 around it. The request can come from a JSON-encoded \
                 PriorityRequest file, from flags, or from both, in which \
                 case flags override the file.",
    about = "Score one complaint location",
    allow_negative_numbers = true
)]
#[ortho_config(prefix = "CIVIC_PRIORITY")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing a PriorityRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Reported latitude in decimal degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees")]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Reported longitude in decimal degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees")]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Complaint category, e.g. "pothole".
    #[arg(long = ARG_COMPLAINT_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) complaint_type: Option<String>,
    /// Privacy tier the reporter chose (exact, street, area, unknown).
    #[arg(long = ARG_PRIVACY_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) privacy_level: Option<PrivacyLevel>,
    /// Declared location accuracy in metres.
    #[arg(long = ARG_ACCURACY_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) accuracy_m: Option<f64>,
    /// Places directory API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Places directory endpoint, without the `nearbysearch/json` suffix.
    #[arg(long = ARG_PLACES_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_base_url: Option<String>,
    /// Path to a JSON facility catalog replacing the standard types.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Request fields supplied directly rather than through a request file.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct RequestOverrides {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
    pub(crate) complaint_type: Option<String>,
    pub(crate) privacy_level: Option<PrivacyLevel>,
    pub(crate) accuracy_m: Option<f64>,
}

impl RequestOverrides {
    fn apply(self, request: &mut PriorityRequest) {
        if let Some(latitude) = self.latitude {
            request.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            request.longitude = longitude;
        }
        if let Some(complaint_type) = self.complaint_type {
            request.complaint_type = complaint_type;
        }
        if let Some(privacy_level) = self.privacy_level {
            request.location_meta.privacy_level = privacy_level;
        }
        if let Some(accuracy_m) = self.accuracy_m {
            request.location_meta.radius_m = accuracy_m;
        }
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Path to the JSON request file, if one was given.
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Request fields that override the file.
    pub(crate) overrides: RequestOverrides,
    /// Places directory API key.
    pub(crate) api_key: String,
    /// Places directory endpoint.
    pub(crate) places_base_url: String,
    /// Path to a replacement facility catalog.
    pub(crate) catalog: Option<Utf8PathBuf>,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(path) = &self.request_path {
            require_existing(path, ARG_REQUEST)?;
        }
        if let Some(path) = &self.catalog {
            require_existing(path, ARG_CATALOG)?;
        }
        Ok(())
    }

    /// Build the request: the file contents, if any, overridden by flags.
    pub(crate) fn load_request(&self) -> Result<PriorityRequest, CliError> {
        let mut request = match &self.request_path {
            Some(path) => read_json(path, ARG_REQUEST)?,
            None => PriorityRequest::default(),
        };
        self.overrides.clone().apply(&mut request);
        Ok(request)
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_API_KEY,
        })?;
        if args.request_path.is_none() {
            if args.latitude.is_none() {
                return Err(CliError::MissingArgument {
                    field: ARG_LATITUDE,
                    env: ENV_LATITUDE,
                });
            }
            if args.longitude.is_none() {
                return Err(CliError::MissingArgument {
                    field: ARG_LONGITUDE,
                    env: ENV_LONGITUDE,
                });
            }
        }
        let places_base_url = args
            .places_base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Self {
            request_path: args.request_path,
            overrides: RequestOverrides {
                latitude: args.latitude,
                longitude: args.longitude,
                complaint_type: args.complaint_type,
                privacy_level: args.privacy_level,
                accuracy_m: args.accuracy_m,
            },
            api_key,
            places_base_url,
            catalog: args.catalog,
        })
    }
}

/// Builds the places client for the current score invocation.
pub(crate) trait ScoreClientBuilder {
    /// Engine tunables used for this invocation.
    fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Build a client for `config`, honouring `engine`'s request timeout.
    fn build(
        &self,
        config: &ScoreConfig,
        engine: &EngineConfig,
    ) -> Result<Box<dyn FacilityQueryClient>, CliError>;
}

pub(crate) struct DefaultScoreClientBuilder;

impl ScoreClientBuilder for DefaultScoreClientBuilder {
    fn build(
        &self,
        config: &ScoreConfig,
        engine: &EngineConfig,
    ) -> Result<Box<dyn FacilityQueryClient>, CliError> {
        let client_config = HttpPlacesClientConfig::new(config.places_base_url.clone())
            .with_api_key(config.api_key.clone())
            .with_timeout(engine.request_timeout);
        let client = HttpPlacesClient::with_config(client_config).map_err(|source| {
            CliError::BuildPlacesClient {
                base_url: config.places_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(client))
    }
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    builder: &dyn ScoreClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_score_config(args)?;
    let request = config.load_request()?;
    let catalog = load_catalog_or_default(config.catalog.as_deref())?;
    let engine_config = builder.engine_config();
    let client = builder.build(&config, &engine_config)?;
    let engine = PriorityEngine::new(client, catalog, engine_config);
    let result = engine.calculate(&request);
    info!(
        "scored '{}' as {} ({})",
        request.complaint_type, result.priority_level, result.priority_score
    );
    write_json(writer, &result)
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
