//! Portal query parameters assembled from a 3D viewpoint
//!
//! Both query strings are part of the portals' public link format and are
//! built byte for byte, without percent-encoding.

use crate::{
    core::{
        constants::PORTAL_VERSION,
        crs::Crs,
        quantize::{ScaleQuantizer, ZoomCalibration},
        viewpoint::Viewpoint,
    },
    layers::{base::LayerDescriptor, manager::PortalLayers},
    traits::{Projection, ResolutionProvider},
    Result,
};

/// Parameters of the equivalent 2D geoportal view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParameters {
    /// Projected easting, rounded
    pub x: i64,
    /// Projected northing, rounded
    pub y: i64,
    pub zoom: u8,
    /// Radians, opposite sign to the 3D heading
    pub rotation: f64,
    pub layers: PortalLayers,
    pub locale: String,
}

impl ViewParameters {
    /// Maps a viewpoint onto the 2D portal.
    ///
    /// Returns `Ok(None)` when the viewpoint has no camera position: the zoom
    /// needs the camera altitude.
    pub fn assemble(
        viewpoint: &Viewpoint,
        layers: &[LayerDescriptor],
        locale: &str,
        projection: &dyn Projection,
        calibration: &ZoomCalibration,
    ) -> Result<Option<Self>> {
        let (position, altitude) = match (viewpoint.active_position(), viewpoint.camera_altitude())
        {
            (Some(position), Some(altitude)) => (position, altitude),
            _ => return Ok(None),
        };

        let projected = projection.transform(&Crs::Wgs84, &Crs::WebMercator, position.as_point())?;
        let (x, y) = projected.round_half_up();

        Ok(Some(Self {
            x,
            y,
            zoom: calibration.zoom_for(altitude),
            rotation: viewpoint.rotation(),
            layers: PortalLayers::select(layers),
            locale: locale.to_string(),
        }))
    }

    pub fn to_query(&self) -> String {
        format!(
            "X={}&Y={}&zoom={}&rotation={}&lang={}&version={}&layers={}&opacities={}&bgLayer={}",
            self.x,
            self.y,
            self.zoom,
            format_js_number(self.rotation),
            self.locale,
            PORTAL_VERSION,
            self.layers.layers_param(),
            self.layers.opacities_param(),
            self.layers.background,
        )
    }

    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.to_query())
    }
}

/// Parameters of a print order centred on the viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintParameters {
    pub easting: i64,
    pub northing: i64,
    /// Scale denominator (1:N)
    pub scale: u32,
}

impl PrintParameters {
    /// Maps a viewpoint onto the print grid `target`.
    ///
    /// Returns `Ok(None)` when neither a ground nor a camera position is
    /// known, or when the viewer cannot tell the resolution there.
    pub fn assemble(
        viewpoint: &Viewpoint,
        target: &Crs,
        projection: &dyn Projection,
        resolution: &dyn ResolutionProvider,
        quantizer: &ScaleQuantizer,
    ) -> Result<Option<Self>> {
        let position = match viewpoint.active_position() {
            Some(position) => position,
            None => return Ok(None),
        };
        let meters_per_pixel = match resolution.resolution_at(position) {
            Some(meters_per_pixel) => meters_per_pixel,
            None => return Ok(None),
        };

        let projected = projection.transform(&Crs::Wgs84, target, position.as_point())?;
        let (easting, northing) = projected.round_half_up();

        Ok(Some(Self {
            easting,
            northing,
            scale: quantizer.scale_for(meters_per_pixel, Some(position.lat)),
        }))
    }

    pub fn to_query(&self) -> String {
        format!(
            "easting={}&northing={}&scale={}",
            self.easting, self.northing, self.scale
        )
    }

    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.to_query())
    }
}

/// Formats a number the way a browser does when interpolating it into a string.
///
/// Decimal notation between 1e-6 and 1e21, exponent notation outside, `0`
/// for both signed zeros.
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{crs::Proj4Projection, geo::LonLat};

    struct Fixed(Option<f64>);

    impl ResolutionProvider for Fixed {
        fn resolution_at(&self, _position: LonLat) -> Option<f64> {
            self.0
        }
    }

    fn luxembourg() -> Viewpoint {
        Viewpoint::from_camera(6.13, 49.61, 9000.0)
    }

    #[test]
    fn test_assemble_view_parameters() {
        let layers = vec![
            LayerDescriptor::new("roads").with_lux_id("359").active(),
            LayerDescriptor::new("topo")
                .with_lux_id("basemap_2015_global")
                .baselayer()
                .active(),
        ];

        let params = ViewParameters::assemble(
            &luxembourg(),
            &layers,
            "fr",
            &Proj4Projection,
            &ZoomCalibration::current(),
        )
        .unwrap()
        .unwrap();

        assert_eq!((params.x, params.y), (682_388, 6_379_007));
        assert_eq!(params.zoom, 14);
        assert_eq!(
            params.to_url("https://map.geoportail.lu/theme/main"),
            "https://map.geoportail.lu/theme/main?X=682388&Y=6379007&zoom=14&rotation=0&lang=fr\
&version=3&layers=359&opacities=1&bgLayer=basemap_2015_global"
        );
    }

    #[test]
    fn test_empty_layers_query() {
        let params = ViewParameters::assemble(
            &luxembourg().with_heading(90.0),
            &[],
            "en",
            &Proj4Projection,
            &ZoomCalibration::current(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            params.to_query(),
            "X=682388&Y=6379007&zoom=14&rotation=-1.5707963267948966&lang=en&version=3\
&layers=&opacities=&bgLayer=blank"
        );
    }

    #[test]
    fn test_missing_camera_produces_nothing() {
        let viewpoint = Viewpoint::default().with_ground_position(6.13, 49.61);
        let params = ViewParameters::assemble(
            &viewpoint,
            &[],
            "en",
            &Proj4Projection,
            &ZoomCalibration::current(),
        )
        .unwrap();
        assert!(params.is_none());
    }

    #[test]
    fn test_ground_position_is_preferred() {
        let viewpoint = luxembourg().with_ground_position(6.0, 49.5);
        let params = ViewParameters::assemble(
            &viewpoint,
            &[],
            "en",
            &Proj4Projection,
            &ZoomCalibration::current(),
        )
        .unwrap()
        .unwrap();

        let expected = LonLat::new(6.0, 49.5).to_mercator().round_half_up();
        assert_eq!((params.x, params.y), expected);
        // zoom still follows the camera altitude
        assert_eq!(params.zoom, 14);
    }

    #[test]
    fn test_assemble_print_parameters() {
        let params = PrintParameters::assemble(
            &luxembourg(),
            &Crs::luref(),
            &Proj4Projection,
            &Fixed(Some(10.0)),
            &ScaleQuantizer::current(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(params.easting, 77_245);
        assert_eq!(params.northing, 75_042);
        // (10 / cos(49.61°)) / 0.00026458 ≈ 58_340
        assert_eq!(params.scale, 50_000);
        assert_eq!(
            params.to_url("https://shop.geoportail.lu/print"),
            "https://shop.geoportail.lu/print?easting=77245&northing=75042&scale=50000"
        );
    }

    #[test]
    fn test_print_from_ground_position_only() {
        let viewpoint = Viewpoint::default().with_ground_position(6.13, 49.61);
        let params = PrintParameters::assemble(
            &viewpoint,
            &Crs::luref(),
            &Proj4Projection,
            &Fixed(Some(10.0)),
            &ScaleQuantizer::current(),
        )
        .unwrap()
        .unwrap();
        assert_eq!((params.easting, params.northing), (77_245, 75_042));

        let nothing = PrintParameters::assemble(
            &Viewpoint::default(),
            &Crs::luref(),
            &Proj4Projection,
            &Fixed(Some(10.0)),
            &ScaleQuantizer::current(),
        )
        .unwrap();
        assert!(nothing.is_none());
    }

    #[test]
    fn test_print_without_resolution_produces_nothing() {
        let params = PrintParameters::assemble(
            &luxembourg(),
            &Crs::luref(),
            &Proj4Projection,
            &Fixed(None),
            &ScaleQuantizer::current(),
        )
        .unwrap();
        assert!(params.is_none());
    }

    #[test]
    fn test_format_js_number() {
        assert_eq!(format_js_number(1.0), "1");
        assert_eq!(format_js_number(-0.0), "0");
        assert_eq!(format_js_number(-0.7853981633974483), "-0.7853981633974483");
        assert_eq!(format_js_number(0.000001), "0.000001");
        assert_eq!(format_js_number(1.5e-7), "1.5e-7");
        assert_eq!(format_js_number(2e21), "2e+21");
        assert_eq!(format_js_number(f64::NAN), "NaN");
    }
}
