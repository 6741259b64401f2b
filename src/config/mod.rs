//! Signal simulator configuration document.
//!
//! The document is a tree of entities exchanged as JSON, with lower camel
//! case field names and enums as their wire identifiers. Fields that do not
//! apply to the current state of the document are not written:
//! - excluded ephemeris files
//! - sampling parameters when not producing IF data
//! - output interval when producing IF data
//! - fields of the inactive position, velocity and time representations
//!
//! Reading is permissive: unknown fields are ignored, missing fields take
//! their default value and unknown enum values leave the field absent.
//! Mistyped numbers of the time, position and velocity representations
//! are dropped the same way. Other mistyped values reject the document.
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

mod lenient;
mod output;
mod power;
mod timing;
mod trajectory;
mod types;

pub use output::{
    default_system_select, OutputConfig, OutputSettings, SatelliteMask, Svid, SystemSelect,
};
pub use power::{PowerConfig, SignalPower, SignalPowerConfig, SignalPowerValue};
pub use timing::TimeConfig;
pub use trajectory::{PositionConfig, TrajectoryConfig, TrajectorySegment, VelocityConfig};
pub use types::{
    ConstellationType, EphemerisType, OutputFormat, OutputType, PositionType, TrajectoryType,
    VelocityType,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("unknown {kind} \"{value}\"")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Ephemeris file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    #[serde(
        rename = "type",
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<EphemerisType>,
    /// File path
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Only included files are written to the document
    #[serde(skip)]
    pub include: bool,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            kind: Some(EphemerisType::RINEX),
            name: String::new(),
            include: true,
        }
    }
}

impl EphemerisConfig {
    /// Included file of given type
    pub fn new(kind: EphemerisType, name: &str) -> Self {
        Self {
            kind: Some(kind),
            name: name.to_string(),
            include: true,
        }
    }
}

/// Almanac file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlmanacConfig {
    #[serde(
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub system: Option<ConstellationType>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

/// Writes the included ephemeris files only, in order
fn included_only<S: Serializer>(
    ephemeris: &[EphemerisConfig],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(ephemeris.iter().filter(|e| e.include))
}

/// Signal simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: f64,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub comment: String,
    /// Simulation start time
    pub time: TimeConfig,
    pub trajectory: TrajectoryConfig,
    #[serde(serialize_with = "included_only")]
    pub ephemeris: Vec<EphemerisConfig>,
    pub output: OutputSettings,
    pub power: SignalPowerConfig,
    pub almanac: Vec<AlmanacConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1.0,
            description: "GNSSSignalSim Configuration".to_string(),
            comment: String::new(),
            time: TimeConfig::default(),
            trajectory: TrajectoryConfig::default(),
            ephemeris: Vec::new(),
            output: OutputSettings::default(),
            power: SignalPowerConfig::default(),
            almanac: Vec::new(),
        }
    }
}

impl Config {
    /// Document representation
    pub fn to_value(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self)?)
    }
    /// Builds a [Config] from its document representation
    pub fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }
    /// Pretty JSON document
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn from_json(content: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(content)?)
    }
    /// Loads a JSON document
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        info!("configuration loaded from {}", path.display());
        Ok(config)
    }
    /// Saves as a JSON document
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!("configuration saved to {}", path.display());
        Ok(())
    }
    /// Included ephemeris files
    pub fn included_ephemeris(&self) -> impl Iterator<Item = &EphemerisConfig> + '_ {
        self.ephemeris.iter().filter(|e| e.include)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::time::{GlonassTime, WeekTime};
    use serde_json::json;

    fn ephemeris(name: &str, include: bool) -> EphemerisConfig {
        EphemerisConfig {
            include,
            ..EphemerisConfig::new(EphemerisType::RINEX, name)
        }
    }

    fn populated() -> Config {
        let mut config = Config {
            description: "test".to_string(),
            comment: "populated".to_string(),
            time: TimeConfig::GLONASS(GlonassTime::new(28, 61, 84600.0)),
            ephemeris: vec![ephemeris("A.rnx", true), ephemeris("B.rnx", true)],
            almanac: vec![AlmanacConfig {
                system: Some(ConstellationType::GPS),
                name: "gps.alm".to_string(),
            }],
            ..Default::default()
        };
        config.trajectory.init_position = PositionConfig::lla(45.5, -73.6, 35.0);
        config.trajectory.init_velocity = VelocityConfig::enu(1.0, 2.0, 3.0);
        config
            .trajectory
            .trajectory_list
            .push(TrajectorySegment::new(TrajectoryType::ConstAcc, 10.0));
        config.output.kind = Some(OutputType::Observation);
        config.output.format = Some(OutputFormat::RINEX3);
        config.output.system_select = default_system_select();
        config.output.config.mask_out.push(SatelliteMask {
            system: Some(ConstellationType::BDS),
            svid: Svid::List(vec![1, 2]),
        });
        config
    }

    #[test]
    fn default_document() {
        let value = Config::default().to_value().unwrap();
        let keys = value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                "version",
                "description",
                "comment",
                "time",
                "trajectory",
                "ephemeris",
                "output",
                "power",
                "almanac"
            ]
        );
        assert_eq!(value["version"], json!(1.0));
        assert_eq!(value["time"]["type"], json!("UTC"));
        assert_eq!(value["trajectory"]["initPosition"]["type"], json!("LLA"));
        assert_eq!(value["output"]["sampleFreq"], json!(20.0));
        assert!(value["output"].get("interval").is_none());
    }

    #[test]
    fn round_trip() {
        let config = populated();
        let value = config.to_value().unwrap();
        assert_eq!(Config::from_value(value).unwrap(), config);

        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn ephemeris_filter() {
        let config = Config {
            ephemeris: vec![
                ephemeris("A.rnx", true),
                ephemeris("B.rnx", false),
                ephemeris("C.rnx", true),
            ],
            ..Default::default()
        };
        let value = config.to_value().unwrap();
        assert_eq!(
            value["ephemeris"],
            json!([{"type": "RINEX", "name": "A.rnx"}, {"type": "RINEX", "name": "C.rnx"}])
        );
        assert_eq!(config.included_ephemeris().count(), 2);

        let parsed = Config::from_value(value).unwrap();
        assert_eq!(parsed.ephemeris.len(), 2);
        assert!(parsed.ephemeris.iter().all(|e| e.include));
    }

    #[test]
    fn inactive_branches_pruned() {
        let mut config = populated();
        config.trajectory.init_velocity = VelocityConfig::enu(1.0, 2.0, 3.0);
        let value = config.to_value().unwrap();
        let velocity = &value["trajectory"]["initVelocity"];
        assert!(velocity.get("speed").is_none());
        assert_eq!(velocity["east"], json!(1.0));

        config.trajectory.init_velocity = VelocityConfig::scu(5.0, 0.0, 0.0);
        let value = config.to_value().unwrap();
        let velocity = &value["trajectory"]["initVelocity"];
        assert!(velocity.get("east").is_none());
        assert!(velocity.get("north").is_none());
        assert_eq!(velocity["speed"], json!(5.0));

        let output = &value["output"];
        assert!(output.get("sampleFreq").is_none());
        assert!(output.get("centerFreq").is_none());
        assert_eq!(output["interval"], json!(1.0));
        assert_eq!(value["time"], json!({"type": "GLONASS", "day": 61, "second": 84600.0, "leapYear": 28}));
    }

    #[test]
    fn permissive_reading() {
        let config = Config::from_value(json!({
            "version": 2.0,
            "generator": "some other tool",
            "time": {"type": "GPS", "week": 2190, "second": 259200.0},
            "trajectory": {
                "initVelocity": {"type": "SCU", "speed": 10.0, "speedUnit": "m/s", "angleUnit": "deg"},
                "trajectoryList": [{"type": "Warp", "time": 5.0}]
            },
            "ephemeris": [{"type": "SP3", "name": "orbits.sp3"}],
            "output": {"type": "video", "format": "IQ4", "systemSelect": [{"system": "GPS", "signal": "L5"}]},
            "almanac": [{"system": "NavIC", "name": "navic.alm"}]
        }))
        .unwrap();
        assert_eq!(config.version, 2.0);
        assert_eq!(config.description, "GNSSSignalSim Configuration");
        assert_eq!(config.time, TimeConfig::GPS(WeekTime::new(2190, 259200.0)));
        match &config.trajectory.init_velocity {
            VelocityConfig::SCU {
                speed,
                speed_unit,
                angle_unit,
                ..
            } => {
                assert_eq!(*speed, 10.0);
                assert_eq!(speed_unit, "mps");
                assert_eq!(angle_unit, "degree");
            },
            other => panic!("unexpected velocity {:?}", other),
        }
        assert_eq!(config.trajectory.trajectory_list[0].kind, None);
        assert_eq!(config.trajectory.trajectory_list[0].time, 5.0);
        assert_eq!(config.ephemeris[0].kind, None);
        assert_eq!(config.output.kind, None);
        assert_eq!(config.output.format, Some(OutputFormat::IQ4));
        assert!(config.output.system_select[0].enable);
        assert_eq!(config.almanac[0].system, None);

        let value = config.to_value().unwrap();
        assert_eq!(value["ephemeris"], json!([{"name": "orbits.sp3"}]));
        assert!(value["output"].get("type").is_none());
        assert_eq!(value["almanac"], json!([{"name": "navic.alm"}]));
    }

    #[test]
    fn invalid_documents() {
        assert!(matches!(Config::from_json("{"), Err(Error::Json(_))));
        assert!(matches!(
            Config::from_json(r#"{"version": "one"}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            Config::load("/does/not/exist.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn load_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = populated();
        config.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"version\": 1.0,"));
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
