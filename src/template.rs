//! Configuration templates: built-in scenarios and
//! custom templates stored as `{name}.json` files.
use std::path::{Path, PathBuf};

use log::{error, info};
use thiserror::Error;

use crate::config::{
    default_system_select, Config, ConstellationType, PositionConfig, SystemSelect,
    VelocityConfig,
};

const EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("template \"{0}\" is built-in")]
    BuiltIn(String),
    #[error("template \"{0}\" not found")]
    NotFound(String),
    #[error("invalid template name \"{0}\"")]
    InvalidName(String),
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("configuration error")]
    Config(#[from] crate::config::Error),
}

/// Template description
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInfo {
    pub name: String,
    pub description: String,
    pub comment: String,
    pub built_in: bool,
}

/// Template store
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
    built_ins: Vec<(&'static str, Config)>,
}

impl TemplateStore {
    /// Opens the store, custom templates live in `dir`
    /// which is created if need be.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            info!("created templates directory: {}", dir.display());
        }
        Ok(Self {
            dir,
            built_ins: built_ins(),
        })
    }
    /// Custom templates directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
    /// All template names, built-in templates first
    pub fn names(&self) -> Vec<String> {
        self.built_ins
            .iter()
            .map(|(name, _)| name.to_string())
            .chain(self.custom_names())
            .collect()
    }
    /// Custom template names, sorted
    pub fn custom_names(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("error reading templates directory: {}", e);
                return Vec::new();
            },
        };
        let mut names = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| Some(path.file_stem()?.to_string_lossy().to_string()))
            .filter(|name| !self.is_built_in(name))
            .collect::<Vec<_>>();
        names.sort();
        names
    }
    pub fn is_built_in(&self, name: &str) -> bool {
        self.built_ins.iter().any(|(n, _)| *n == name)
    }
    /// Template file path. Names must stay within the store directory.
    fn path(&self, name: &str) -> Result<PathBuf, Error> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            error!("invalid template name \"{}\"", name);
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }
    /// Returns a copy of the desired template
    pub fn get(&self, name: &str) -> Result<Config, Error> {
        if let Some((_, config)) = self.built_ins.iter().find(|(n, _)| *n == name) {
            return Ok(config.clone());
        }
        let path = self.path(name)?;
        if !path.exists() {
            return Err(Error::NotFound(name.to_string()));
        }
        Config::load(&path).map_err(|e| {
            error!("error loading template \"{}\": {}", name, e);
            Error::Config(e)
        })
    }
    /// Saves `config` as a custom template. Built-in templates
    /// may not be overwritten.
    pub fn save(&self, name: &str, config: &Config) -> Result<(), Error> {
        if self.is_built_in(name) {
            return Err(Error::BuiltIn(name.to_string()));
        }
        config.save(self.path(name)?)?;
        info!("template \"{}\" saved", name);
        Ok(())
    }
    /// Deletes a custom template
    pub fn delete(&self, name: &str) -> Result<(), Error> {
        if self.is_built_in(name) {
            error!("cannot delete built-in template \"{}\"", name);
            return Err(Error::BuiltIn(name.to_string()));
        }
        let path = self.path(name)?;
        if !path.exists() {
            return Err(Error::NotFound(name.to_string()));
        }
        std::fs::remove_file(path)?;
        info!("template \"{}\" deleted", name);
        Ok(())
    }
    pub fn info(&self, name: &str) -> Result<TemplateInfo, Error> {
        let config = self.get(name)?;
        Ok(TemplateInfo {
            name: name.to_string(),
            description: config.description,
            comment: config.comment,
            built_in: self.is_built_in(name),
        })
    }
}

/// Scenario of a vehicle moving along a constant course
fn scenario(
    description: &str,
    comment: &str,
    vehicle: &str,
    (latitude, longitude, altitude): (f64, f64, f64),
    (speed, course): (f64, f64),
) -> Config {
    let mut config = Config {
        description: description.to_string(),
        comment: comment.to_string(),
        ..Default::default()
    };
    config.trajectory.name = vehicle.to_string();
    config.trajectory.init_position = PositionConfig::lla(latitude, longitude, altitude);
    config.trajectory.init_velocity = VelocityConfig::scu(speed, course, 0.0);
    config
}

fn enabled(signals: &[(ConstellationType, &str)]) -> Vec<SystemSelect> {
    signals
        .iter()
        .map(|(system, signal)| SystemSelect::new(*system, signal, true))
        .collect()
}

fn built_ins() -> Vec<(&'static str, Config)> {
    use ConstellationType::{Galileo, BDS, GLONASS, GPS};

    let mut urban = scenario(
        "Urban Navigation Scenario",
        "Multi-constellation configuration for urban navigation with typical signal conditions",
        "Urban Vehicle",
        (37.7749, -122.4194, 50.0),
        (15.0, 45.0),
    );
    urban.output.config.elevation_mask = 10.0;
    urban.power.noise_floor = -170.0;
    urban.output.system_select = enabled(&[
        (GPS, "L1CA"),
        (GPS, "L5"),
        (Galileo, "E1"),
        (Galileo, "E5a"),
        (BDS, "B1C"),
        (BDS, "B2a"),
    ]);

    let mut rural = scenario(
        "Rural Open Sky Scenario",
        "High-precision configuration for rural/open sky environments",
        "Rural Vehicle",
        (40.7128, -74.0060, 100.0),
        (25.0, 0.0),
    );
    rural.output.config.elevation_mask = 5.0;
    rural.power.noise_floor = -174.0;
    rural.output.system_select = default_system_select();
    for select in rural.output.system_select.iter_mut() {
        if ["L1CA", "L5", "E1", "E5a", "B1C", "B2a", "G1"].contains(&select.signal.as_str()) {
            select.enable = true;
        }
    }

    let mut aviation = scenario(
        "Aviation Scenario",
        "High-altitude aviation configuration with SBAS signals",
        "Aircraft",
        (51.4700, -0.4543, 10000.0),
        (250.0, 90.0),
    );
    aviation.output.config.elevation_mask = 0.0;
    aviation.power.noise_floor = -174.0;
    aviation.power.elevation_adjust = true;
    aviation.output.system_select = enabled(&[
        (GPS, "L1CA"),
        (GPS, "L1C"),
        (GPS, "L5"),
        (Galileo, "E1"),
        (Galileo, "E5a"),
    ]);

    let mut maritime = scenario(
        "Maritime Navigation Scenario",
        "Marine navigation configuration with moderate dynamics",
        "Vessel",
        (35.6762, 139.6503, 0.0),
        (10.0, 180.0),
    );
    maritime.output.config.elevation_mask = 5.0;
    maritime.power.noise_floor = -172.0;
    maritime.output.system_select = enabled(&[
        (GPS, "L1CA"),
        (GPS, "L2C"),
        (GLONASS, "G1"),
        (BDS, "B1I"),
        (Galileo, "E1"),
    ]);

    let mut testing = scenario(
        "Testing and Validation Scenario",
        "Minimal configuration for testing and validation purposes",
        "Test Scenario",
        (0.0, 0.0, 0.0),
        (0.0, 0.0),
    );
    testing.output.config.elevation_mask = 5.0;
    testing.power.noise_floor = -174.0;
    testing.output.system_select = enabled(&[(GPS, "L1CA")]);

    vec![
        ("Urban Navigation", urban),
        ("Rural Open Sky", rural),
        ("Aviation", aviation),
        ("Maritime", maritime),
        ("Testing", testing),
    ]
}
