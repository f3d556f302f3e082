//! Cube manifests as published by CubeCobra

#![allow(clippy::result_large_err)]

use std::time::Duration;

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::http::{build_client, ensure_success, from_reqwest};

pub const DEFAULT_CUBECOBRA_BASE_URL: &str = "https://cubecobra.com";

/// Tag marking a manifest entry as a custom card
pub const CUSTOM_TAG: &str = "custom";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeCobraCube {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cards: CubeCobraCards,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeCobraCards {
    #[serde(default)]
    pub mainboard: Vec<CubeCobraCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeCobraCardDetails {
    #[serde(default)]
    pub scryfall_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeCobraCard {
    #[serde(rename = "cardID", default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub details: Option<CubeCobraCardDetails>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "imgUrl", default)]
    pub img_url: Option<String>,
}

impl CubeCobraCard {
    pub fn is_custom(&self) -> bool {
        self.tags.iter().any(|t| t == CUSTOM_TAG)
    }

    /// Catalog id: `details.scryfall_id`, else `cardID`
    pub fn catalog_id(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.scryfall_id.as_deref())
            .or(self.card_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.img_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Where cube manifests come from
pub trait ManifestSource {
    /// # Errors
    ///
    /// `ExternalService`/`Timeout` on transport failure, `InvalidManifest`
    /// when the body is not a manifest.
    fn fetch_manifest(&self, cube_id: &str) -> Result<CubeCobraCube>;
}

/// Parse a manifest body
pub fn parse_manifest(cube_id: &str, body: &str) -> Result<CubeCobraCube> {
    serde_json::from_str(body).map_err(|e| {
        ExError::new(ExErrorKind::InvalidManifest)
            .with_op("parse_manifest")
            .with_entity_id(cube_id)
            .with_message(e.to_string())
    })
}

pub struct CubeCobraHttpSource {
    client: Client,
    base_url: Url,
}

impl CubeCobraHttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_CUBECOBRA_BASE_URL, timeout)
    }

    /// # Errors
    ///
    /// `InvalidInput` when `base_url` cannot serve as a base URL.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("manifest_source")
                    .with_entity_id(base_url.as_str())
                    .with_message("Manifest base URL is not a valid base URL")
            })?;
        Ok(Self {
            client: build_client(timeout)?,
            base_url: parsed,
        })
    }

    /// `{base}/cube/api/cubeJSON/{cube_id}` with `cube_id` as one encoded segment
    pub fn manifest_url(&self, cube_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["cube", "api", "cubeJSON"])
                .push(cube_id);
        }
        url
    }
}

impl ManifestSource for CubeCobraHttpSource {
    fn fetch_manifest(&self, cube_id: &str) -> Result<CubeCobraCube> {
        const OP: &str = "fetch_manifest";
        let url = self.manifest_url(cube_id);
        let response = self.client.get(url).send().map_err(|e| from_reqwest(OP, e))?;
        let body = ensure_success(OP, response)?
            .text()
            .map_err(|e| from_reqwest(OP, e))?;
        parse_manifest(cube_id, &body)
    }
}
