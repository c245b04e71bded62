//! Route request configuration, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides.  With no file at all the demo routes from Halte Margaasih to
//! Universitas Komputer Indonesia.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use rr_core::{BoundingBox, GeoPoint};

/// A named point of interest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    pub lon:  f64,
    pub lat:  f64,
}

impl Place {
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Region bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BboxConfig {
    pub north: f64,
    pub south: f64,
    pub east:  f64,
    pub west:  f64,
}

/// Output backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Geojson,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub start:       Place,
    pub end:         Place,
    pub bbox:        BboxConfig,
    pub output_dir:  PathBuf,
    pub format:      OutputFormat,
    /// Abandon the search after this many milliseconds.
    pub deadline_ms: Option<u64>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            start: Place {
                name: "Halte Margaasih".to_owned(),
                lon:  107.539303,
                lat:  -6.934878,
            },
            end: Place {
                name: "Universitas Komputer Indonesia".to_owned(),
                lon:  107.615148,
                lat:  -6.887135,
            },
            bbox: BboxConfig { north: -6.85, south: -6.99, east: 107.65, west: 107.50 },
            output_dir:  PathBuf::from("output"),
            format:      OutputFormat::Csv,
            deadline_ms: None,
        }
    }
}

impl RouteConfig {
    /// Read a config file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validated bounding box.
    pub fn bbox(&self) -> Result<BoundingBox> {
        let b = self.bbox;
        Ok(BoundingBox::new(b.north, b.south, b.east, b.west)?)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
