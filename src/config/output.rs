//! Simulator output and signal selection
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::{
    lenient,
    types::{ConstellationType, OutputFormat, OutputType},
};

/// Satellite identifier(s): a single id or a list of ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Svid {
    Single(u32),
    List(Vec<u32>),
}

impl Default for Svid {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Svid {
    /// Iterates the designated ids
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        let ids: &[u32] = match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::List(ids) => ids,
        };
        ids.iter().copied()
    }
}

/// Satellites excluded from the simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteMask {
    #[serde(
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub system: Option<ConstellationType>,
    pub svid: Svid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    /// Elevation mask, in degrees
    pub elevation_mask: f64,
    pub mask_out: Vec<SatelliteMask>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            elevation_mask: 5.0,
            mask_out: Vec::new(),
        }
    }
}

/// Enables (or disables) one signal of one constellation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemSelect {
    #[serde(deserialize_with = "lenient::variant")]
    pub system: Option<ConstellationType>,
    /// Signal name, may be left empty
    #[serde(deserialize_with = "lenient::string")]
    pub signal: String,
    pub enable: bool,
}

impl Default for SystemSelect {
    fn default() -> Self {
        Self {
            system: None,
            signal: String::new(),
            enable: true,
        }
    }
}

impl SystemSelect {
    pub fn new(system: ConstellationType, signal: &str, enable: bool) -> Self {
        Self {
            system: Some(system),
            signal: signal.to_string(),
            enable,
        }
    }
    /// Signal written to the document: an empty signal is
    /// replaced by the constellation's default signal.
    pub fn wire_signal(&self) -> &str {
        if !self.signal.is_empty() {
            &self.signal
        } else {
            self.system
                .map(|system| system.default_signal())
                .unwrap_or(ConstellationType::GPS.default_signal())
        }
    }
}

impl Serialize for SystemSelect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(system) = &self.system {
            map.serialize_entry("system", system)?;
        }
        map.serialize_entry("signal", self.wire_signal())?;
        map.serialize_entry("enable", &self.enable)?;
        map.end()
    }
}

/// Signal selection of a new document: every known signal,
/// only GPS L1CA is enabled.
pub fn default_system_select() -> Vec<SystemSelect> {
    [
        ConstellationType::GPS,
        ConstellationType::BDS,
        ConstellationType::Galileo,
        ConstellationType::GLONASS,
    ]
    .into_iter()
    .flat_map(|system| {
        system.signals().iter().map(move |signal| {
            let enable = system == ConstellationType::GPS && *signal == "L1CA";
            SystemSelect::new(system, signal, enable)
        })
    })
    .collect()
}

/// What the simulator produces. Sampling parameters only apply to
/// IF data, the output interval only applies to position and observations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSettings {
    #[serde(rename = "type", deserialize_with = "lenient::variant")]
    pub kind: Option<OutputType>,
    #[serde(deserialize_with = "lenient::variant")]
    pub format: Option<OutputFormat>,
    /// Sampling frequency, in MHz
    pub sample_freq: f64,
    /// Center frequency, in MHz
    pub center_freq: f64,
    /// Output interval, in seconds
    pub interval: f64,
    /// Output file name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    pub config: OutputConfig,
    pub system_select: Vec<SystemSelect>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            kind: Some(OutputType::IFdata),
            format: Some(OutputFormat::IQ8),
            sample_freq: 20.0,
            center_freq: 1575.42,
            interval: 1.0,
            name: "output.bin".to_string(),
            config: OutputConfig::default(),
            system_select: Vec::new(),
        }
    }
}

impl OutputSettings {
    /// Enabled constellations, in order of first appearance
    pub fn enabled_systems(&self) -> Vec<ConstellationType> {
        let mut systems = Vec::new();
        for system in self
            .system_select
            .iter()
            .filter(|s| s.enable)
            .filter_map(|s| s.system)
        {
            if !systems.contains(&system) {
                systems.push(system);
            }
        }
        systems
    }
}

impl Serialize for OutputSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(kind) = &self.kind {
            map.serialize_entry("type", kind)?;
        }
        if let Some(format) = &self.format {
            map.serialize_entry("format", format)?;
        }
        if self.kind == Some(OutputType::IFdata) {
            map.serialize_entry("sampleFreq", &self.sample_freq)?;
            map.serialize_entry("centerFreq", &self.center_freq)?;
        }
        if self.kind.is_some_and(|kind| kind.has_interval()) {
            map.serialize_entry("interval", &self.interval)?;
        }
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("config", &self.config)?;
        map.serialize_entry("systemSelect", &self.system_select)?;
        map.end()
    }
}
