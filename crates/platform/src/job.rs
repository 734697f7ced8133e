//! Export jobs and the opaque handles the platform hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use raster_expr::{FeatureTable, Image, ImageExpr};
use verdant_common::Geometry;

/// The five artifacts exported for every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Main,
    Class,
    ObsCount,
    Stats,
    Thumbnail,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Main,
            ArtifactKind::Class,
            ArtifactKind::ObsCount,
            ArtifactKind::Stats,
            ArtifactKind::Thumbnail,
        ]
    }

    /// File-name suffix, without the leading underscore.
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Main => "main",
            ArtifactKind::Class => "class",
            ArtifactKind::ObsCount => "obs_count",
            ArtifactKind::Stats => "stats",
            ArtifactKind::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    GeoTiff,
    Csv,
}

/// What an export job writes out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportPayload {
    Raster {
        image: ImageExpr,
        bands: Vec<String>,
        region: Geometry,
        scale: f64,
        /// Output projection; `None` keeps the platform default.
        crs: Option<String>,
        max_pixels: f64,
    },
    Table { table: FeatureTable },
}

/// A request to write one artifact to a destination folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub id: Uuid,
    pub artifact: ArtifactKind,
    /// Task description and file-name prefix.
    pub name: String,
    pub folder: String,
    pub payload: ExportPayload,
    pub format: FileFormat,
    pub created_at: DateTime<Utc>,
}

impl ExportJob {
    #[allow(clippy::too_many_arguments)]
    pub fn raster(
        artifact: ArtifactKind,
        name: impl Into<String>,
        folder: impl Into<String>,
        image: &Image,
        region: Geometry,
        scale: f64,
        crs: Option<String>,
        max_pixels: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            artifact,
            name: name.into(),
            folder: folder.into(),
            payload: ExportPayload::Raster {
                image: image.expr().clone(),
                bands: image.band_names().to_vec(),
                region,
                scale,
                crs,
                max_pixels,
            },
            format: FileFormat::GeoTiff,
            created_at: Utc::now(),
        }
    }

    pub fn table(
        artifact: ArtifactKind,
        name: impl Into<String>,
        folder: impl Into<String>,
        table: FeatureTable,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            artifact,
            name: name.into(),
            folder: folder.into(),
            payload: ExportPayload::Table { table },
            format: FileFormat::Csv,
            created_at: Utc::now(),
        }
    }

    /// Scale of a raster job.
    pub fn scale(&self) -> Option<f64> {
        match &self.payload {
            ExportPayload::Raster { scale, .. } => Some(*scale),
            ExportPayload::Table { .. } => None,
        }
    }
}

/// Opaque identifier of a submitted job. Only meaningful to the platform
/// that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_job_serialization() {
        let image = Image::constant(0.5, "indicator").to_float();
        let job = ExportJob::raster(
            ArtifactKind::Main,
            "Mineral2019Faridpur_main",
            "GEE_Exports",
            &image,
            Geometry::point(89.8, 23.6),
            500.0,
            Some("EPSG:4326".to_string()),
            1e13,
        );

        let json = serde_json::to_string(&job).unwrap();
        let parsed: ExportJob = serde_json::from_str(&json).unwrap();

        assert_eq!(job.id, parsed.id);
        assert_eq!(parsed.artifact, ArtifactKind::Main);
        assert_eq!(parsed.scale(), Some(500.0));
        assert_eq!(parsed.format, FileFormat::GeoTiff);
    }

    #[test]
    fn test_handle_is_transparent() {
        let handle = JobHandle::new("TASK-1");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"TASK-1\"");
        assert_eq!(handle.to_string(), "TASK-1");
    }
}
