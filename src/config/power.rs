//! Signal power levels
use serde::{Deserialize, Serialize};

use super::{lenient, output::Svid, types::ConstellationType};

/// Default carrier to noise density unit
const DBHZ: &str = "dBHz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    #[serde(deserialize_with = "lenient::string")]
    pub unit: String,
    pub value: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            unit: DBHZ.to_string(),
            value: 45.0,
        }
    }
}

/// Power level applying from given instant onwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalPowerValue {
    /// Seconds since simulation start
    pub time: f64,
    #[serde(deserialize_with = "lenient::string")]
    pub unit: String,
    pub value: f64,
}

impl Default for SignalPowerValue {
    fn default() -> Self {
        Self {
            time: 0.0,
            unit: DBHZ.to_string(),
            value: 45.0,
        }
    }
}

/// Power profile of designated satellites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalPower {
    #[serde(
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub system: Option<ConstellationType>,
    pub svid: Svid,
    pub power_value: Vec<SignalPowerValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalPowerConfig {
    /// Noise floor, in dBm/Hz
    pub noise_floor: f64,
    /// Power of satellites without a specific profile
    pub init_power: PowerConfig,
    /// Adjust power with satellite elevation
    pub elevation_adjust: bool,
    pub signal_power: Vec<SignalPower>,
}

impl Default for SignalPowerConfig {
    fn default() -> Self {
        Self {
            noise_floor: -174.0,
            init_power: PowerConfig::default(),
            elevation_adjust: false,
            signal_power: Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_document() {
        assert_eq!(
            serde_json::to_value(SignalPowerConfig::default()).unwrap(),
            json!({
                "noiseFloor": -174.0,
                "initPower": {"unit": "dBHz", "value": 45.0},
                "elevationAdjust": false,
                "signalPower": []
            })
        );
    }

    #[test]
    fn satellite_profiles() {
        let power: SignalPowerConfig = serde_json::from_value(json!({
            "noiseFloor": -170.0,
            "signalPower": [{
                "system": "Galileo",
                "svid": [11, 12],
                "powerValue": [
                    {"time": 0.0, "unit": "dBHz", "value": 40.0},
                    {"time": 60.0, "unit": "dBHz", "value": 35.0}
                ]
            }]
        }))
        .unwrap();
        assert_eq!(power.noise_floor, -170.0);
        assert_eq!(power.init_power, PowerConfig::default());
        let profile = &power.signal_power[0];
        assert_eq!(profile.system, Some(ConstellationType::Galileo));
        assert_eq!(profile.svid, Svid::List(vec![11, 12]));
        assert_eq!(profile.power_value[1].time, 60.0);
        assert_eq!(profile.power_value[1].value, 35.0);

        let value = serde_json::to_value(&power).unwrap();
        assert_eq!(serde_json::from_value::<SignalPowerConfig>(value).unwrap(), power);
    }
}
