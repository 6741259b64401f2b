//! Receiver initial state and motion
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::{
    lenient,
    types::{PositionType, TrajectoryType, VelocityType},
};

/// Default velocity unit
const MPS: &str = "mps";

/// Default angle unit
const DEGREE: &str = "degree";

/// Receiver initial position
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPosition")]
pub enum PositionConfig {
    /// Geodetic coordinates
    LLA {
        /// Angle notation, "d" for decimal degrees
        format: String,
        longitude: f64,
        latitude: f64,
        /// Altitude in meters
        altitude: f64,
    },
    /// Earth centered, Earth fixed coordinates, in meters
    ECEF { x: f64, y: f64, z: f64 },
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self::lla(0.0, 0.0, 0.0)
    }
}

impl PositionConfig {
    /// Builds a geodetic position, in decimal degrees
    pub fn lla(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::LLA {
            format: "d".to_string(),
            longitude,
            latitude,
            altitude,
        }
    }
    pub fn kind(&self) -> PositionType {
        match self {
            Self::LLA { .. } => PositionType::LLA,
            Self::ECEF { .. } => PositionType::ECEF,
        }
    }
}

impl Serialize for PositionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind())?;
        match self {
            Self::LLA {
                format,
                longitude,
                latitude,
                altitude,
            } => {
                map.serialize_entry("format", format)?;
                map.serialize_entry("longitude", longitude)?;
                map.serialize_entry("latitude", latitude)?;
                map.serialize_entry("altitude", altitude)?;
            },
            Self::ECEF { x, y, z } => {
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
                map.serialize_entry("z", z)?;
            },
        }
        map.end()
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawPosition {
    #[serde(rename = "type", deserialize_with = "lenient::variant")]
    kind: Option<PositionType>,
    format: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    longitude: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    altitude: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    x: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    y: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    z: Option<f64>,
}

impl From<RawPosition> for PositionConfig {
    fn from(raw: RawPosition) -> Self {
        match raw.kind.unwrap_or_default() {
            PositionType::LLA => Self::LLA {
                format: raw.format.unwrap_or_else(|| "d".to_string()),
                longitude: raw.longitude.unwrap_or_default(),
                latitude: raw.latitude.unwrap_or_default(),
                altitude: raw.altitude.unwrap_or_default(),
            },
            PositionType::ECEF => Self::ECEF {
                x: raw.x.unwrap_or_default(),
                y: raw.y.unwrap_or_default(),
                z: raw.z.unwrap_or_default(),
            },
        }
    }
}

/// Receiver initial velocity. Each frame carries its own units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawVelocity")]
pub enum VelocityConfig {
    /// Speed, Course, Up
    SCU {
        speed: f64,
        course: f64,
        up: f64,
        /// Horizontal and vertical speed unit
        speed_unit: String,
        /// Course unit
        angle_unit: String,
    },
    /// East, North, Up
    ENU {
        east: f64,
        north: f64,
        up: f64,
        east_unit: String,
        north_unit: String,
        up_unit: String,
    },
    ECEF {
        x: f64,
        y: f64,
        z: f64,
        x_unit: String,
        y_unit: String,
        z_unit: String,
    },
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self::scu(0.0, 0.0, 0.0)
    }
}

impl VelocityConfig {
    /// Builds a speed/course/up velocity in m/s and degrees
    pub fn scu(speed: f64, course: f64, up: f64) -> Self {
        Self::SCU {
            speed,
            course,
            up,
            speed_unit: MPS.to_string(),
            angle_unit: DEGREE.to_string(),
        }
    }
    /// Builds an east/north/up velocity in m/s
    pub fn enu(east: f64, north: f64, up: f64) -> Self {
        Self::ENU {
            east,
            north,
            up,
            east_unit: MPS.to_string(),
            north_unit: MPS.to_string(),
            up_unit: MPS.to_string(),
        }
    }
    /// Builds an ECEF velocity in m/s
    pub fn ecef(x: f64, y: f64, z: f64) -> Self {
        Self::ECEF {
            x,
            y,
            z,
            x_unit: MPS.to_string(),
            y_unit: MPS.to_string(),
            z_unit: MPS.to_string(),
        }
    }
    pub fn kind(&self) -> VelocityType {
        match self {
            Self::SCU { .. } => VelocityType::SCU,
            Self::ENU { .. } => VelocityType::ENU,
            Self::ECEF { .. } => VelocityType::ECEF,
        }
    }
}

impl Serialize for VelocityConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind())?;
        match self {
            Self::SCU {
                speed,
                course,
                up,
                speed_unit,
                angle_unit,
            } => {
                map.serialize_entry("speed", speed)?;
                map.serialize_entry("course", course)?;
                map.serialize_entry("up", up)?;
                map.serialize_entry("speedUnit", speed_unit)?;
                map.serialize_entry("angleUnit", angle_unit)?;
            },
            Self::ENU {
                east,
                north,
                up,
                east_unit,
                north_unit,
                up_unit,
            } => {
                map.serialize_entry("up", up)?;
                map.serialize_entry("east", east)?;
                map.serialize_entry("north", north)?;
                map.serialize_entry("eastUnit", east_unit)?;
                map.serialize_entry("northUnit", north_unit)?;
                map.serialize_entry("upUnit", up_unit)?;
            },
            Self::ECEF {
                x,
                y,
                z,
                x_unit,
                y_unit,
                z_unit,
            } => {
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
                map.serialize_entry("z", z)?;
                map.serialize_entry("xUnit", x_unit)?;
                map.serialize_entry("yUnit", y_unit)?;
                map.serialize_entry("zUnit", z_unit)?;
            },
        }
        map.end()
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawVelocity {
    #[serde(rename = "type", deserialize_with = "lenient::variant")]
    kind: Option<VelocityType>,
    #[serde(deserialize_with = "lenient::number")]
    speed: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    course: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    up: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    east: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    north: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    x: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    y: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    z: Option<f64>,
    speed_unit: Option<String>,
    angle_unit: Option<String>,
    east_unit: Option<String>,
    north_unit: Option<String>,
    up_unit: Option<String>,
    x_unit: Option<String>,
    y_unit: Option<String>,
    z_unit: Option<String>,
}

impl From<RawVelocity> for VelocityConfig {
    fn from(raw: RawVelocity) -> Self {
        let unit = |u: Option<String>| u.map(lenient::speed_unit).unwrap_or_else(|| MPS.to_string());
        match raw.kind.unwrap_or_default() {
            VelocityType::SCU => Self::SCU {
                speed: raw.speed.unwrap_or_default(),
                course: raw.course.unwrap_or_default(),
                up: raw.up.unwrap_or_default(),
                speed_unit: unit(raw.speed_unit),
                angle_unit: raw
                    .angle_unit
                    .map(lenient::angle_unit)
                    .unwrap_or_else(|| DEGREE.to_string()),
            },
            VelocityType::ENU => Self::ENU {
                east: raw.east.unwrap_or_default(),
                north: raw.north.unwrap_or_default(),
                up: raw.up.unwrap_or_default(),
                east_unit: raw.east_unit.unwrap_or_else(|| MPS.to_string()),
                north_unit: raw.north_unit.unwrap_or_else(|| MPS.to_string()),
                up_unit: raw.up_unit.unwrap_or_else(|| MPS.to_string()),
            },
            VelocityType::ECEF => Self::ECEF {
                x: raw.x.unwrap_or_default(),
                y: raw.y.unwrap_or_default(),
                z: raw.z.unwrap_or_default(),
                x_unit: raw.x_unit.unwrap_or_else(|| MPS.to_string()),
                y_unit: raw.y_unit.unwrap_or_else(|| MPS.to_string()),
                z_unit: raw.z_unit.unwrap_or_else(|| MPS.to_string()),
            },
        }
    }
}

/// One leg of the receiver trajectory.
/// Which optional parameters apply depends on the motion model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectorySegment {
    #[serde(
        rename = "type",
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<TrajectoryType>,
    /// Duration in seconds
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Default for TrajectorySegment {
    fn default() -> Self {
        Self {
            kind: Some(TrajectoryType::Const),
            time: 1.0,
            acceleration: None,
            speed: None,
            rate: None,
            angle: None,
            radius: None,
        }
    }
}

impl TrajectorySegment {
    /// Builds a segment of given motion model and duration
    pub fn new(kind: TrajectoryType, time: f64) -> Self {
        Self {
            kind: Some(kind),
            time,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrajectoryConfig {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    pub init_position: PositionConfig,
    pub init_velocity: VelocityConfig,
    pub trajectory_list: Vec<TrajectorySegment>,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            name: "Default Trajectory".to_string(),
            init_position: PositionConfig::default(),
            init_velocity: VelocityConfig::default(),
            trajectory_list: Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_groups() {
        let lla = PositionConfig::lla(39.9042, 116.4074, 50.0);
        assert_eq!(
            serde_json::to_value(&lla).unwrap(),
            json!({"type": "LLA", "format": "d", "longitude": 116.4074, "latitude": 39.9042, "altitude": 50.0})
        );
        let ecef = PositionConfig::ECEF {
            x: -2148744.0,
            y: 4426641.0,
            z: 4044655.0,
        };
        let value = serde_json::to_value(&ecef).unwrap();
        assert_eq!(
            value,
            json!({"type": "ECEF", "x": -2148744.0, "y": 4426641.0, "z": 4044655.0})
        );
        assert_eq!(serde_json::from_value::<PositionConfig>(value).unwrap(), ecef);
    }

    #[test]
    fn velocity_pruning() {
        let enu = VelocityConfig::enu(1.0, 2.0, 3.0);
        let value = serde_json::to_value(&enu).unwrap();
        let keys = value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(
            keys,
            ["type", "up", "east", "north", "eastUnit", "northUnit", "upUnit"]
        );
        assert!(value.get("speed").is_none());

        let scu = VelocityConfig::scu(5.0, 90.0, 0.0);
        let value = serde_json::to_value(&scu).unwrap();
        assert_eq!(value["speed"], json!(5.0));
        assert!(value.get("east").is_none());
        assert!(value.get("north").is_none());
        assert!(value.get("xUnit").is_none());

        for velocity in [enu, scu, VelocityConfig::ecef(0.5, -0.5, 1.5)] {
            let value = serde_json::to_value(&velocity).unwrap();
            assert_eq!(serde_json::from_value::<VelocityConfig>(value).unwrap(), velocity);
        }
    }

    #[test]
    fn inactive_group_dropped() {
        let velocity: VelocityConfig = serde_json::from_value(json!({
            "type": "ENU", "east": 1.0, "north": 2.0, "up": 3.0, "speed": 99.0
        }))
        .unwrap();
        assert_eq!(velocity, VelocityConfig::enu(1.0, 2.0, 3.0));
    }

    #[test]
    fn mistyped_values() {
        let position: PositionConfig = serde_json::from_value(json!({
            "type": "ECEF", "x": "far", "y": 2.0, "z": null
        }))
        .unwrap();
        assert_eq!(
            position,
            PositionConfig::ECEF {
                x: 0.0,
                y: 2.0,
                z: 0.0
            }
        );
        let velocity: VelocityConfig = serde_json::from_value(json!({
            "type": "ENU", "east": 1.0, "north": true, "up": 3
        }))
        .unwrap();
        assert_eq!(velocity, VelocityConfig::enu(1.0, 0.0, 3.0));
    }

    #[test]
    fn legacy_units() {
        let velocity: VelocityConfig = serde_json::from_value(json!({
            "type": "SCU", "speed": 10.0, "course": 45.0, "up": 0.0,
            "speedUnit": "km/h", "angleUnit": "deg"
        }))
        .unwrap();
        match velocity {
            VelocityConfig::SCU {
                speed_unit,
                angle_unit,
                ..
            } => {
                assert_eq!(speed_unit, "kph");
                assert_eq!(angle_unit, "degree");
            },
            other => panic!("unexpected velocity {:?}", other),
        }
    }

    #[test]
    fn segments() {
        let mut turn = TrajectorySegment::new(TrajectoryType::HorizontalTurn, 30.0);
        turn.rate = Some(3.0);
        assert_eq!(
            serde_json::to_value(&turn).unwrap(),
            json!({"type": "HorizontalTurn", "time": 30.0, "rate": 3.0})
        );

        let segment: TrajectorySegment =
            serde_json::from_value(json!({"type": "Teleport", "speed": 3.0})).unwrap();
        assert_eq!(segment.kind, None);
        assert_eq!(segment.time, 1.0);
        assert_eq!(segment.speed, Some(3.0));
        assert_eq!(serde_json::to_value(&segment).unwrap(), json!({"time": 1.0, "speed": 3.0}));
    }

    #[test]
    fn defaults() {
        let trajectory: TrajectoryConfig = serde_json::from_value(json!({"unknown": 1})).unwrap();
        assert_eq!(trajectory, TrajectoryConfig::default());
        assert_eq!(trajectory.name, "Default Trajectory");
        assert_eq!(trajectory.init_position.kind(), PositionType::LLA);
        assert_eq!(trajectory.init_velocity.kind(), VelocityType::SCU);
    }
}
