use crate::core::geo::LonLat;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A WGS84 position as reported by the 3D viewer: `[lon, lat]` or `[lon, lat, alt]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Cartographic {
    pub lon: f64,
    pub lat: f64,
    /// Height above the ellipsoid in meters
    pub alt: Option<f64>,
}

impl Cartographic {
    pub fn new(lon: f64, lat: f64, alt: Option<f64>) -> Self {
        Self { lon, lat, alt }
    }

    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.lon, self.lat)
    }
}

impl TryFrom<Vec<f64>> for Cartographic {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values[..] {
            [lon, lat] => Ok(Self::new(lon, lat, None)),
            [lon, lat, alt] => Ok(Self::new(lon, lat, Some(alt))),
            _ => Err(format!(
                "expected [lon, lat] or [lon, lat, alt], got {} values",
                values.len()
            )),
        }
    }
}

impl From<Cartographic> for Vec<f64> {
    fn from(position: Cartographic) -> Self {
        match position.alt {
            Some(alt) => vec![position.lon, position.lat, alt],
            None => vec![position.lon, position.lat],
        }
    }
}

/// Snapshot of the 3D camera pose
///
/// Supplied by the host for a single action run; never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewpoint {
    /// Camera location; absent when the viewer is not in a 3D mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<Cartographic>,
    /// Point on the ground the camera looks at, if picked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_position: Option<Cartographic>,
    /// Heading in degrees, clockwise from north
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl Viewpoint {
    pub fn from_camera(lon: f64, lat: f64, alt: f64) -> Self {
        Self {
            camera_position: Some(Cartographic::new(lon, lat, Some(alt))),
            ..Self::default()
        }
    }

    pub fn with_ground_position(mut self, lon: f64, lat: f64) -> Self {
        self.ground_position = Some(Cartographic::new(lon, lat, None));
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Whether the viewpoint locates anything: a ground or a camera position
    pub fn is_applicable(&self) -> bool {
        self.active_position().is_some()
    }

    /// The ground position if present, else the camera's horizontal position
    pub fn active_position(&self) -> Option<LonLat> {
        self.ground_position
            .or(self.camera_position)
            .map(|position| position.lon_lat())
    }

    /// Absolute camera altitude in meters (0 when the camera reports none)
    pub fn camera_altitude(&self) -> Option<f64> {
        self.camera_position
            .map(|camera| camera.alt.unwrap_or(0.0).abs())
    }

    /// 2D rotation in radians; the portal turns the opposite way to the heading
    pub fn rotation(&self) -> f64 {
        let heading = self.heading.unwrap_or(0.0);
        let rotation = -(heading * PI / 180.0);
        // normalise -0.0 so it prints as "0"
        rotation + 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewpoint_deserialization() {
        let viewpoint: Viewpoint = serde_json::from_str(
            r#"{"cameraPosition":[6.13,49.61,9000.0],"groundPosition":[6.14,49.62],"heading":90}"#,
        )
        .unwrap();

        assert_eq!(
            viewpoint.camera_position,
            Some(Cartographic::new(6.13, 49.61, Some(9000.0)))
        );
        assert_eq!(viewpoint.active_position(), Some(LonLat::new(6.14, 49.62)));
        assert_eq!(viewpoint.camera_altitude(), Some(9000.0));
    }

    #[test]
    fn test_bad_position_is_rejected() {
        let result: Result<Viewpoint, _> = serde_json::from_str(r#"{"cameraPosition":[6.13]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_active_position_falls_back_to_camera() {
        let viewpoint = Viewpoint::from_camera(6.13, 49.61, 1200.0);
        assert_eq!(viewpoint.active_position(), Some(LonLat::new(6.13, 49.61)));
    }

    #[test]
    fn test_ground_only_viewpoint() {
        let viewpoint = Viewpoint::default().with_ground_position(6.13, 49.61);
        assert!(viewpoint.is_applicable());
        assert_eq!(viewpoint.active_position(), Some(LonLat::new(6.13, 49.61)));
        assert_eq!(viewpoint.camera_altitude(), None);
    }

    #[test]
    fn test_empty_viewpoint_is_not_applicable() {
        let viewpoint = Viewpoint::default().with_heading(30.0);
        assert!(!viewpoint.is_applicable());
        assert_eq!(viewpoint.active_position(), None);
    }

    #[test]
    fn test_altitude_is_absolute() {
        let viewpoint = Viewpoint::from_camera(6.13, 49.61, -350.0);
        assert_eq!(viewpoint.camera_altitude(), Some(350.0));
    }

    #[test]
    fn test_rotation_flips_heading() {
        assert_eq!(Viewpoint::default().rotation().to_string(), "0");
        let quarter_turn = Viewpoint::default().with_heading(90.0).rotation();
        assert!((quarter_turn + std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!(Viewpoint::default().with_heading(-45.0).rotation() > 0.0);
    }
}
