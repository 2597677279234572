//! Calibration tables and portal conventions.
//! Keeping them in a single place makes it easier to follow portal revisions.

/// Zoom level → camera altitude threshold (meters), current revision.
///
/// Thresholds decrease strictly as the zoom increases.
pub const ZOOM_TO_ALTITUDE: [(u8, f64); 11] = [
    (9, 190_000.0),
    (10, 100_000.0),
    (11, 70_000.0),
    (12, 40_000.0),
    (13, 25_000.0),
    (14, 10_000.0),
    (15, 6_000.0),
    (16, 3_500.0),
    (17, 1_900.0),
    (18, 900.0),
    (19, 600.0),
];

/// Zoom level → camera altitude (meters) used by the nearest-altitude lookup
/// of the first portal revision.
pub const LEGACY_ZOOM_TO_ALTITUDE: [(u8, f64); 11] = [
    (9, 350_000.0),
    (10, 180_000.0),
    (11, 100_000.0),
    (12, 40_000.0),
    (13, 18_000.0),
    (14, 9_000.0),
    (15, 6_000.0),
    (16, 3_500.0),
    (17, 1_900.0),
    (18, 900.0),
    (19, 600.0),
];

/// Zoom returned when no calibration threshold applies.
pub const DEFAULT_ZOOM: u8 = 9;

/// Print scales on a 1-2.5-5 progression.
pub const PRINT_SCALES: [u32; 18] = [
    100, 250, 500, 1_000, 2_500, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000,
    1_000_000, 2_500_000, 5_000_000, 10_000_000, 25_000_000, 50_000_000,
];

/// Print scales offered by the first print revision.
pub const LEGACY_PRINT_SCALES: [u32; 51] = [
    100, 250, 500, 1_000, 1_500, 2_000, 2_500, 3_000, 3_500, 4_000, 4_500, 5_000, 5_500, 6_000,
    6_500, 7_000, 7_500, 8_000, 8_500, 9_000, 9_500, 10_000, 15_000, 20_000, 25_000, 30_000,
    35_000, 40_000, 45_000, 50_000, 55_000, 60_000, 65_000, 70_000, 75_000, 80_000, 85_000,
    90_000, 95_000, 100_000, 125_000, 200_000, 250_000, 300_000, 400_000, 500_000, 600_000,
    700_000, 800_000, 900_000, 1_000_000,
];

/// Screen DPI assumed by the 3D viewer.
pub const VIEWER_DPI: f64 = 96.0;

/// Meters per inch.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Physical size of a screen pixel (meters) used by the latitude-corrected
/// scale computation: a 96 DPI pixel, 0.0254 / 96.
pub const METERS_PER_PIXEL: f64 = 0.000_264_58;

/// Version flag expected by the 2D geoportal.
pub const PORTAL_VERSION: u32 = 3;

/// Background layer token when no baselayer is active.
pub const BLANK_BACKGROUND: &str = "blank";

/// Browsing context used when no tab name is configured.
pub const DEFAULT_TARGET: &str = "_blank";

/// Separator between layer ids and opacities in the portal query.
pub const LIST_SEPARATOR: &str = "-";

/// proj4 definition of EPSG:2169 (Luxembourg 1930 / Gauss, LUREF).
pub const LUREF_PROJ4: &str = "+proj=tmerc +lat_0=49.8333333333333 +lon_0=6.16666666666667 \
+k=1 +x_0=80000 +y_0=100000 +ellps=intl \
+towgs84=-189.681,18.3463,-42.7695,-0.33746,-3.09264,2.53861,0.4598 +units=m +no_defs";
