#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Geography dataset for the City Quiz.
//!
//! Regions ship compiled into the crate and can be extended or overridden
//! by a TOML catalog. A catalog document lists regions under `[[regions]]`,
//! each with its own `[[regions.points]]` table:
//!
//! ```toml
//! [[regions]]
//! code = "lv"
//! name = "Latvia"
//! snap_threshold_km = 50.0
//! center = { lat = 56.88, lng = 24.60 }
//! zoom = 7
//!
//! [[regions.points]]
//! id = 1
//! name = "Riga"
//! lat = 56.9496
//! lng = 24.1052
//! ```

mod builtin;

use std::{
    fs,
    path::{Path, PathBuf},
};

use city_quiz_core::{LatLng, Point, PointId, Region, RegionError, SnapThreshold, Viewport};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Problems encountered while assembling a region catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read region catalog at {}", .path.display())]
    Io {
        /// Location of the catalog.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog document is not valid TOML or does not match the schema.
    #[error("failed to parse region catalog")]
    Parse(#[from] toml::de::Error),
    /// A region declares a snap threshold that is not a positive distance.
    #[error("region `{code}` needs a positive snap threshold")]
    InvalidThreshold {
        /// Region code.
        code: String,
    },
    /// Two regions in one document share a code.
    #[error("region `{code}` is defined more than once")]
    DuplicateRegion {
        /// Repeated region code.
        code: String,
    },
    /// A region failed validation.
    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Ordered collection of regions addressable by code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    regions: Vec<Region>,
}

impl Catalog {
    /// Regions compiled into the quiz: Estonia (`ee`) and Ukraine (`ua`).
    pub fn builtin() -> Result<Self, CatalogError> {
        let regions = builtin::ALL
            .iter()
            .map(builtin::RegionData::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { regions })
    }

    /// Parses a catalog from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(contents)?;
        let mut catalog = Self::default();
        for entry in document.regions {
            let region = entry.into_region()?;
            if catalog.get(region.code()).is_some() {
                return Err(CatalogError::DuplicateRegion {
                    code: region.code().to_owned(),
                });
            }
            catalog.regions.push(region);
        }
        Ok(catalog)
    }

    /// Reads and parses a catalog from the TOML file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        debug!("loaded {} region(s) from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Combines two catalogs; regions in `overrides` replace regions with the same code.
    #[must_use]
    pub fn merge(mut self, overrides: Catalog) -> Self {
        for region in overrides.regions {
            match self
                .regions
                .iter_mut()
                .find(|existing| existing.code() == region.code())
            {
                Some(existing) => *existing = region,
                None => self.regions.push(region),
            }
        }
        self
    }

    /// Looks up a region by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.code() == code)
    }

    /// Regions in declaration order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Reports whether the catalog holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default)]
    regions: Vec<RegionDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionDocument {
    code: String,
    name: String,
    snap_threshold_km: f64,
    center: LatLng,
    zoom: u8,
    #[serde(default)]
    points: Vec<PointDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PointDocument {
    id: u32,
    name: String,
    lat: f64,
    lng: f64,
}

impl RegionDocument {
    fn into_region(self) -> Result<Region, CatalogError> {
        let Some(threshold) = SnapThreshold::from_kilometers(self.snap_threshold_km) else {
            return Err(CatalogError::InvalidThreshold { code: self.code });
        };
        let points = self
            .points
            .into_iter()
            .map(|point| {
                Point::new(
                    PointId::new(point.id),
                    point.name,
                    LatLng::new(point.lat, point.lng),
                )
            })
            .collect();
        let viewport = Viewport::new(self.center, self.zoom);
        Ok(Region::new(self.code, self.name, points, viewport, threshold)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATVIA: &str = r#"
        [[regions]]
        code = "lv"
        name = "Latvia"
        snap_threshold_km = 50.0
        center = { lat = 56.88, lng = 24.60 }
        zoom = 7

        [[regions.points]]
        id = 1
        name = "Riga"
        lat = 56.9496
        lng = 24.1052

        [[regions.points]]
        id = 2
        name = "Daugavpils"
        lat = 55.8747
        lng = 26.5362
    "#;

    #[test]
    fn builtin_catalog_has_estonia_and_ukraine() {
        let catalog = Catalog::builtin().expect("built-in data is valid");
        let codes: Vec<&str> = catalog.regions().iter().map(Region::code).collect();
        assert_eq!(codes, vec!["ee", "ua"]);

        let estonia = catalog.get("ee").expect("estonia");
        assert_eq!(estonia.points().len(), 20);
        assert_eq!(estonia.snap_threshold().meters(), 50_000.0);
        assert_eq!(estonia.viewport().zoom(), 7);

        let ukraine = catalog.get("ua").expect("ukraine");
        assert_eq!(ukraine.points().len(), 22);
        assert_eq!(ukraine.snap_threshold().meters(), 75_000.0);
        assert_eq!(ukraine.viewport().zoom(), 6);
    }

    #[test]
    fn parses_toml_region() {
        let catalog = Catalog::from_toml_str(LATVIA).expect("valid catalog");
        let latvia = catalog.get("lv").expect("latvia");
        assert_eq!(latvia.name(), "Latvia");
        assert_eq!(latvia.points().len(), 2);
        assert_eq!(latvia.points()[1].name(), "Daugavpils");
        assert_eq!(latvia.viewport().center(), LatLng::new(56.88, 24.60));
    }

    #[test]
    fn threshold_is_read_in_kilometers() {
        let document = r#"
            [[regions]]
            code = "ee"
            name = "Estonia"
            snap_threshold_km = 50.0
            center = { lat = 58.59, lng = 25.01 }
            zoom = 7

            [[regions.points]]
            id = 1
            name = "Tallinn"
            lat = 59.437
            lng = 24.7536
        "#;
        let catalog = Catalog::from_toml_str(document).expect("valid catalog");
        let estonia = catalog.get("ee").expect("estonia");
        assert_eq!(estonia.snap_threshold().meters(), 50_000.0);

        let in_meters = document.replace("snap_threshold_km = 50.0", "snap_threshold_m = 50000.0");
        assert!(matches!(
            Catalog::from_toml_str(&in_meters),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn rejects_region_without_points() {
        let document = r#"
            [[regions]]
            code = "zz"
            name = "Empty"
            snap_threshold_km = 10.0
            center = { lat = 0.0, lng = 0.0 }
            zoom = 5
        "#;
        let error = Catalog::from_toml_str(document).expect_err("empty region");
        assert!(matches!(
            error,
            CatalogError::Region(RegionError::Empty { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let document = LATVIA.replace("snap_threshold_km = 50.0", "snap_threshold_km = 0.0");
        let error = Catalog::from_toml_str(&document).expect_err("zero threshold");
        assert!(matches!(error, CatalogError::InvalidThreshold { code } if code == "lv"));
    }

    #[test]
    fn rejects_duplicate_region_codes() {
        let first = LATVIA.split("[[regions.points]]").next().unwrap_or_default();
        let document = format!(
            "{first}\n[[regions.points]]\nid = 1\nname = \"Riga\"\nlat = 56.9\nlng = 24.1\n{first}\n[[regions.points]]\nid = 1\nname = \"Riga\"\nlat = 56.9\nlng = 24.1\n"
        );
        let error = Catalog::from_toml_str(&document).expect_err("duplicate code");
        assert!(matches!(error, CatalogError::DuplicateRegion { .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let document = LATVIA.replace("zoom = 7", "zoom = 7\nthreshold = 3");
        assert!(matches!(
            Catalog::from_toml_str(&document),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn merge_overrides_matching_codes() {
        let builtin = Catalog::builtin().expect("built-in data is valid");
        let overrides = Catalog::from_toml_str(&LATVIA.replace("code = \"lv\"", "code = \"ee\""))
            .expect("valid catalog");
        let merged = builtin.merge(overrides).merge(Catalog::from_toml_str(LATVIA).expect("valid"));

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("ee").map(Region::name), Some("Latvia"));
        assert!(merged.get("lv").is_some());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = Catalog::from_path("/nonexistent/regions.toml").expect_err("missing");
        assert!(error.to_string().contains("/nonexistent/regions.toml"));
    }
}
