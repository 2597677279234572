//! Altitude → zoom and resolution → scale quantization
//!
//! Both quantizers are total: whatever the input, the answer is one of the
//! discrete values of their calibration table.

use crate::{
    core::constants::{
        DEFAULT_ZOOM, LEGACY_PRINT_SCALES, LEGACY_ZOOM_TO_ALTITUDE, METERS_PER_INCH,
        METERS_PER_PIXEL, PRINT_SCALES, VIEWER_DPI, ZOOM_TO_ALTITUDE,
    },
    Error, Result,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub static CURRENT_ZOOM_TABLE: Lazy<ZoomTable> =
    Lazy::new(|| ZoomTable::from_trusted(&ZOOM_TO_ALTITUDE));

pub static LEGACY_ZOOM_TABLE: Lazy<ZoomTable> =
    Lazy::new(|| ZoomTable::from_trusted(&LEGACY_ZOOM_TO_ALTITUDE));

pub static PRINT_SCALE_TABLE: Lazy<ScaleTable> =
    Lazy::new(|| ScaleTable(PRINT_SCALES.to_vec()));

pub static LEGACY_PRINT_SCALE_TABLE: Lazy<ScaleTable> =
    Lazy::new(|| ScaleTable(LEGACY_PRINT_SCALES.to_vec()));

/// Zoom level → altitude threshold, ordered by zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, f64>")]
pub struct ZoomTable(BTreeMap<u8, f64>);

impl TryFrom<BTreeMap<u8, f64>> for ZoomTable {
    type Error = Error;

    fn try_from(table: BTreeMap<u8, f64>) -> Result<Self> {
        let entries: Vec<(u8, f64)> = table.into_iter().collect();
        Self::new(&entries)
    }
}

impl ZoomTable {
    /// Builds a table, checking that thresholds shrink as the zoom grows
    pub fn new(entries: &[(u8, f64)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("zoom table is empty".to_string()));
        }

        let table: BTreeMap<u8, f64> = entries.iter().copied().collect();
        if table.len() != entries.len() {
            return Err(Error::Config("zoom table has duplicate levels".to_string()));
        }
        if table.values().any(|altitude| !altitude.is_finite()) {
            return Err(Error::Config("zoom table has a non-finite altitude".to_string()));
        }
        let decreasing = table
            .values()
            .zip(table.values().skip(1))
            .all(|(lower_zoom, higher_zoom)| higher_zoom < lower_zoom);
        if !decreasing {
            return Err(Error::Config(
                "zoom table altitudes must decrease as zoom increases".to_string(),
            ));
        }

        Ok(Self(table))
    }

    fn from_trusted(entries: &[(u8, f64)]) -> Self {
        Self(entries.iter().copied().collect())
    }

    /// Lowest zoom in the table, returned when no threshold applies
    pub fn default_zoom(&self) -> u8 {
        self.0.keys().next().copied().unwrap_or(DEFAULT_ZOOM)
    }

    pub fn min_zoom(&self) -> u8 {
        self.default_zoom()
    }

    pub fn max_zoom(&self) -> u8 {
        self.0.keys().next_back().copied().unwrap_or(DEFAULT_ZOOM)
    }

    pub fn threshold(&self, zoom: u8) -> Option<f64> {
        self.0.get(&zoom).copied()
    }

    /// Entries in ascending zoom order
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0.iter().map(|(zoom, altitude)| (*zoom, *altitude))
    }
}

/// How an altitude is matched against the calibration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomPolicy {
    /// Highest zoom whose threshold is strictly above the altitude
    StrictlyExceeds,
    /// Zoom whose threshold is closest to the altitude
    Nearest,
}

/// A zoom table paired with the policy it was calibrated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomCalibration {
    pub table: ZoomTable,
    pub policy: ZoomPolicy,
}

impl ZoomCalibration {
    pub fn new(table: ZoomTable, policy: ZoomPolicy) -> Self {
        Self { table, policy }
    }

    pub fn current() -> Self {
        Self::new(CURRENT_ZOOM_TABLE.clone(), ZoomPolicy::StrictlyExceeds)
    }

    pub fn legacy() -> Self {
        Self::new(LEGACY_ZOOM_TABLE.clone(), ZoomPolicy::Nearest)
    }

    /// Maps a camera altitude (meters, non-negative) to a zoom level.
    ///
    /// Altitudes above every threshold give the table's lowest zoom under both
    /// policies; altitudes below every threshold give the highest.
    pub fn zoom_for(&self, altitude: f64) -> u8 {
        let zoom = match self.policy {
            ZoomPolicy::StrictlyExceeds => {
                let mut zoom = self.table.default_zoom();
                for (level, threshold) in self.table.iter() {
                    if altitude < threshold {
                        zoom = level;
                    }
                }
                zoom
            }
            ZoomPolicy::Nearest => {
                let mut zoom = self.table.default_zoom();
                let mut smallest_diff = f64::INFINITY;
                for (level, threshold) in self.table.iter() {
                    let diff = (altitude - threshold).abs();
                    if diff < smallest_diff {
                        smallest_diff = diff;
                        zoom = level;
                    }
                }
                zoom
            }
        };

        log::trace!("altitude {} m -> zoom {} ({:?})", altitude, zoom, self.policy);
        zoom
    }
}

impl Default for ZoomCalibration {
    fn default() -> Self {
        Self::current()
    }
}

/// Ascending list of scale denominators (1:N)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>")]
pub struct ScaleTable(Vec<u32>);

impl TryFrom<Vec<u32>> for ScaleTable {
    type Error = Error;

    fn try_from(scales: Vec<u32>) -> Result<Self> {
        Self::new(scales)
    }
}

impl ScaleTable {
    pub fn new(scales: Vec<u32>) -> Result<Self> {
        if scales.is_empty() {
            return Err(Error::Config("scale table is empty".to_string()));
        }
        if scales.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(Error::Config(
                "scale table must be strictly ascending".to_string(),
            ));
        }
        Ok(Self(scales))
    }

    pub fn scales(&self) -> &[u32] {
        &self.0
    }

    pub fn contains(&self, scale: u32) -> bool {
        self.0.binary_search(&scale).is_ok()
    }

    /// Nearest entry by absolute difference; on a tie the earlier entry wins
    pub fn nearest(&self, ratio: f64) -> u32 {
        self.0
            .iter()
            .copied()
            .reduce(|prev, curr| {
                if (curr as f64 - ratio).abs() < (prev as f64 - ratio).abs() {
                    curr
                } else {
                    prev
                }
            })
            .unwrap_or_default()
    }
}

/// How a resolution is turned into a raw scale ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ScaleMethod {
    /// Screen-DPI based, ignores latitude
    Dpi { dpi: f64 },
    /// Compensates Mercator distortion with `1 / cos(latitude)`
    LatitudeCorrected { meters_per_pixel: f64 },
}

impl ScaleMethod {
    pub fn scale_ratio(&self, resolution: f64, latitude: Option<f64>) -> f64 {
        match *self {
            Self::Dpi { dpi } => {
                let meter_per_pixel_at_scale_1 = METERS_PER_INCH / dpi;
                resolution / meter_per_pixel_at_scale_1
            }
            Self::LatitudeCorrected { meters_per_pixel } => {
                let latitude = latitude.unwrap_or(0.0);
                let corrected = resolution * (1.0 / latitude.to_radians().cos());
                corrected / meters_per_pixel
            }
        }
    }
}

/// Picks the standard print scale closest to the current map resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleQuantizer {
    pub table: ScaleTable,
    pub method: ScaleMethod,
}

impl ScaleQuantizer {
    pub fn new(table: ScaleTable, method: ScaleMethod) -> Self {
        Self { table, method }
    }

    pub fn current() -> Self {
        Self::new(
            PRINT_SCALE_TABLE.clone(),
            ScaleMethod::LatitudeCorrected {
                meters_per_pixel: METERS_PER_PIXEL,
            },
        )
    }

    pub fn legacy() -> Self {
        Self::new(
            LEGACY_PRINT_SCALE_TABLE.clone(),
            ScaleMethod::Dpi { dpi: VIEWER_DPI },
        )
    }

    /// Scale denominator for a resolution in meters per pixel.
    ///
    /// A NaN ratio compares false everywhere and so yields the first entry.
    pub fn scale_for(&self, resolution: f64, latitude: Option<f64>) -> u32 {
        let ratio = self.method.scale_ratio(resolution, latitude);
        let scale = self.table.nearest(ratio);
        log::trace!("resolution {} -> ratio {:.1} -> 1:{}", resolution, ratio, scale);
        scale
    }
}

impl Default for ScaleQuantizer {
    fn default() -> Self {
        Self::current()
    }
}
