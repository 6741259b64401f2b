//! Configuration sanity checks, run prior to handing a
//! document over to the signal simulator.
use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};

use crate::{
    config::{Config, EphemerisType},
    rinex::{is_valid_rinex_file, quick_validity, ValidityRange},
};

/// Noise floors above this level (dBm/Hz) are reported
const NOISE_FLOOR_WARNING: f64 = -100.0;

/// Enabling more constellations than this is reported
const MAX_CONSTELLATIONS: usize = 4;

/// Issue severity, most severe first
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    FileAccess,
    DataFormat,
    TimeRange,
    SignalCompatibility,
    TrajectoryPhysics,
    OutputFormat,
    Completeness,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::FileAccess => write!(f, "file_access"),
            Self::DataFormat => write!(f, "data_format"),
            Self::TimeRange => write!(f, "time_range"),
            Self::SignalCompatibility => write!(f, "signal_compatibility"),
            Self::TrajectoryPhysics => write!(f, "trajectory_physics"),
            Self::OutputFormat => write!(f, "output_format"),
            Self::Completeness => write!(f, "configuration_completeness"),
        }
    }
}

/// Reported issue
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// How to resolve this issue
    pub suggestion: String,
    /// Document fields involved
    pub fields: Vec<&'static str>,
}

impl Issue {
    fn new(category: Category, severity: Severity, title: &str, message: String) -> Self {
        Self {
            category,
            severity,
            title: title.to_string(),
            message,
            suggestion: String::new(),
            fields: Vec::new(),
        }
    }
    fn with_suggestion(mut self, suggestion: impl ToString) -> Self {
        self.suggestion = suggestion.to_string();
        self
    }
    fn with_fields(mut self, fields: &[&'static str]) -> Self {
        self.fields = fields.to_vec();
        self
    }
}

/// Issues of one document, most severe first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub issues: Vec<Issue>,
}

/// Statistics of a [Report]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<Category, usize>,
    /// Titles of the critical issues
    pub critical: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
    /// True if no issue prevents running the simulation
    pub fn is_valid(&self) -> bool {
        self.issues.iter().all(|i| i.severity > Severity::Error)
    }
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.issues.len(),
            ..Default::default()
        };
        for issue in self.issues.iter() {
            *summary.by_severity.entry(issue.severity).or_default() += 1;
            *summary.by_category.entry(issue.category).or_default() += 1;
            if issue.severity == Severity::Critical {
                summary.critical.push(issue.title.clone());
            }
            if !issue.suggestion.is_empty() {
                summary.recommendations.push(issue.suggestion.clone());
            }
        }
        summary
    }
}

/// Validates a configuration document
pub fn validate(config: &Config) -> Report {
    let mut issues = Vec::new();
    basic_info(config, &mut issues);
    ephemeris_files(config, &mut issues);
    time_range(config, &mut issues);
    trajectory(config, &mut issues);
    signals(config, &mut issues);
    power(config, &mut issues);
    output(config, &mut issues);
    cross_dependencies(config, &mut issues);

    // stable: keeps the check order within a severity level
    issues.sort_by_key(|i| i.severity);
    info!("validation complete: {} issue(s) found", issues.len());
    Report { issues }
}

fn basic_info(config: &Config, issues: &mut Vec<Issue>) {
    if config.description.trim().is_empty() {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Info,
                "Missing Project Description",
                "No project description provided".to_string(),
            )
            .with_suggestion("Add a description to help identify this configuration")
            .with_fields(&["description"]),
        );
    }
    if config.version == 0.0 {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Info,
                "Missing Version Information",
                "No version specified for this configuration".to_string(),
            )
            .with_suggestion("Consider adding version information for tracking")
            .with_fields(&["version"]),
        );
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn ephemeris_files(config: &Config, issues: &mut Vec<Issue>) {
    if config.included_ephemeris().next().is_none() {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Critical,
                "No Ephemeris Files",
                "No ephemeris files configured".to_string(),
            )
            .with_suggestion("Add RINEX ephemeris files")
            .with_fields(&["ephemeris"]),
        );
        return;
    }

    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    for ephemeris in config.included_ephemeris() {
        let path = Path::new(&ephemeris.name);
        if !path.exists() {
            missing.push(file_name(&ephemeris.name));
        } else if ephemeris.kind == Some(EphemerisType::RINEX) && !is_valid_rinex_file(path) {
            invalid.push(file_name(&ephemeris.name));
        }
    }

    if !missing.is_empty() {
        issues.push(
            Issue::new(
                Category::FileAccess,
                Severity::Error,
                "Ephemeris Files Not Found",
                format!(
                    "{} ephemeris file(s) not found: {}",
                    missing.len(),
                    missing.join(", ")
                ),
            )
            .with_suggestion("Check file paths and ensure files exist")
            .with_fields(&["ephemeris"]),
        );
    }
    if !invalid.is_empty() {
        issues.push(
            Issue::new(
                Category::DataFormat,
                Severity::Error,
                "Invalid RINEX Files",
                format!(
                    "{} file(s) are not valid RINEX: {}",
                    invalid.len(),
                    invalid.join(", ")
                ),
            )
            .with_suggestion("Ensure files are valid RINEX navigation files")
            .with_fields(&["ephemeris"]),
        );
    }
}

/// Merged validity range of the readable RINEX files
fn ephemeris_validity(config: &Config) -> Option<ValidityRange> {
    config
        .included_ephemeris()
        .filter(|e| e.kind == Some(EphemerisType::RINEX))
        .filter(|e| Path::new(&e.name).exists())
        .filter_map(|e| quick_validity(&e.name))
        .reduce(|a, b| a.merge(&b))
}

fn time_range(config: &Config, issues: &mut Vec<Issue>) {
    let Some(validity) = ephemeris_validity(config) else {
        return;
    };
    let t = match config.time.to_utc() {
        Ok(t) => t,
        Err(e) => {
            debug!("time range not validated: {}", e);
            return;
        },
    };
    if validity.contains(t) {
        return;
    }
    let hours = (t - validity.start)
        .abs()
        .to_seconds()
        .min((t - validity.end).abs().to_seconds())
        / 3600.0;
    let (start, end) = (validity.start.to_gregorian_utc(), validity.end.to_gregorian_utc());
    issues.push(
        Issue::new(
            Category::TimeRange,
            Severity::Error,
            "Time Outside Ephemeris Range",
            format!("Simulation time is {:.1} hours outside ephemeris validity", hours),
        )
        .with_suggestion(format!(
            "Set time between {:04}-{:02}-{:02} {:02}:{:02} and {:04}-{:02}-{:02} {:02}:{:02}",
            start.0, start.1, start.2, start.3, start.4, end.0, end.1, end.2, end.3, end.4,
        ))
        .with_fields(&["time"]),
    );
}

fn trajectory(config: &Config, issues: &mut Vec<Issue>) {
    for (index, segment) in config.trajectory.trajectory_list.iter().enumerate() {
        if segment.time <= 0.0 {
            issues.push(
                Issue::new(
                    Category::TrajectoryPhysics,
                    Severity::Error,
                    "Invalid Trajectory Duration",
                    format!(
                        "Trajectory segment {} has invalid duration: {}",
                        index + 1,
                        segment.time
                    ),
                )
                .with_suggestion("Set positive duration values for all trajectory segments")
                .with_fields(&["trajectory", "trajectoryList"]),
            );
        }
    }
}

fn signals(config: &Config, issues: &mut Vec<Issue>) {
    if config.output.system_select.is_empty() {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Error,
                "No Signal Configuration",
                "No signal selection configured".to_string(),
            )
            .with_suggestion("Configure the signal selection")
            .with_fields(&["output", "systemSelect"]),
        );
        return;
    }
    if !config.output.system_select.iter().any(|s| s.enable) {
        issues.push(
            Issue::new(
                Category::SignalCompatibility,
                Severity::Error,
                "No Signals Enabled",
                "No signals are currently enabled for simulation".to_string(),
            )
            .with_suggestion("Enable at least one signal")
            .with_fields(&["output", "systemSelect"]),
        );
        return;
    }
    let constellations = config.output.enabled_systems().len();
    if constellations > MAX_CONSTELLATIONS {
        issues.push(
            Issue::new(
                Category::SignalCompatibility,
                Severity::Warning,
                "Many Constellations Selected",
                format!("{} different constellations enabled", constellations),
            )
            .with_suggestion("Consider if all constellations are needed for your simulation")
            .with_fields(&["output", "systemSelect"]),
        );
    }
}

fn power(config: &Config, issues: &mut Vec<Issue>) {
    if config.power.noise_floor > NOISE_FLOOR_WARNING {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Warning,
                "High Noise Floor",
                format!(
                    "Noise floor is quite high: {} dBm/Hz",
                    config.power.noise_floor
                ),
            )
            .with_suggestion("Verify noise floor value is appropriate for your simulation")
            .with_fields(&["power", "noiseFloor"]),
        );
    }
}

fn output(config: &Config, issues: &mut Vec<Issue>) {
    let name = config.output.name.as_str();
    if name.is_empty() {
        issues.push(
            Issue::new(
                Category::Completeness,
                Severity::Error,
                "No Output File Specified",
                "Output file path not configured".to_string(),
            )
            .with_suggestion("Set the output file")
            .with_fields(&["output", "name"]),
        );
        return;
    }
    let path = Path::new(name);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            issues.push(
                Issue::new(
                    Category::FileAccess,
                    Severity::Warning,
                    "Output Directory Missing",
                    format!("Output directory does not exist: {}", dir.display()),
                )
                .with_suggestion("Create the directory or choose an existing location")
                .with_fields(&["output", "name"]),
            );
        }
    }
    if path.extension().is_none() {
        issues.push(
            Issue::new(
                Category::OutputFormat,
                Severity::Info,
                "No File Extension",
                "Output file has no extension".to_string(),
            )
            .with_suggestion("Consider adding appropriate file extension (.bin, .dat, etc.)")
            .with_fields(&["output", "name"]),
        );
    }
}

fn cross_dependencies(config: &Config, issues: &mut Vec<Issue>) {
    if config.included_ephemeris().next().is_none() {
        return;
    }
    let systems = config.output.enabled_systems().len();
    if systems > 1 {
        issues.push(
            Issue::new(
                Category::SignalCompatibility,
                Severity::Info,
                "Multi-Constellation Setup",
                format!("Using {} different satellite systems", systems),
            )
            .with_suggestion("Ensure ephemeris files contain data for all selected systems")
            .with_fields(&["ephemeris", "output"]),
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{
        default_system_select, ConstellationType, EphemerisConfig, SystemSelect, TrajectorySegment,
        TrajectoryType,
    };

    fn titles(report: &Report) -> Vec<&str> {
        report.issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn default_document() {
        let report = validate(&Config::default());
        assert_eq!(
            titles(&report),
            ["No Ephemeris Files", "No Signal Configuration"]
        );
        assert!(!report.is_valid());
        assert_eq!(report.count(Severity::Critical), 1);

        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_severity[&Severity::Critical], 1);
        assert_eq!(summary.by_severity[&Severity::Error], 1);
        assert_eq!(summary.by_category[&Category::Completeness], 2);
        assert_eq!(summary.critical, ["No Ephemeris Files"]);
        assert_eq!(summary.recommendations.len(), 2);
    }

    #[test]
    fn document_issues() {
        let mut config = Config {
            description: "  ".to_string(),
            version: 0.0,
            ephemeris: vec![EphemerisConfig::new(
                EphemerisType::RINEX,
                "/does/not/exist/brdc0010.22n",
            )],
            ..Default::default()
        };
        config.output.name = "/does/not/exist/output".to_string();
        config.output.system_select = default_system_select();
        for select in config.output.system_select.iter_mut() {
            select.enable = true;
        }
        config.output.system_select.push(SystemSelect::new(ConstellationType::QZSS, "", true));
        config.power.noise_floor = -90.0;
        config
            .trajectory
            .trajectory_list
            .push(TrajectorySegment::new(TrajectoryType::Const, 0.0));

        let report = validate(&config);
        assert_eq!(
            titles(&report),
            [
                "Ephemeris Files Not Found",
                "Invalid Trajectory Duration",
                "Many Constellations Selected",
                "High Noise Floor",
                "Output Directory Missing",
                "Missing Project Description",
                "Missing Version Information",
                "No File Extension",
                "Multi-Constellation Setup",
            ]
        );
        assert_eq!(
            report.issues[0].message,
            "1 ephemeris file(s) not found: brdc0010.22n"
        );
        assert_eq!(report.issues[2].message, "5 different constellations enabled");
    }

    #[test]
    fn no_signal_enabled() {
        let mut config = Config::default();
        config.output.system_select = default_system_select();
        config.output.system_select[0].enable = false;
        let report = validate(&config);
        assert!(titles(&report).contains(&"No Signals Enabled"));
        assert!(!titles(&report).contains(&"Many Constellations Selected"));
    }

    #[test]
    fn excluded_ephemeris() {
        let mut config = Config::default();
        config.output.system_select = default_system_select();
        config.ephemeris.push(EphemerisConfig {
            include: false,
            ..EphemerisConfig::new(EphemerisType::RINEX, "/does/not/exist.rnx")
        });
        let report = validate(&config);
        assert_eq!(titles(&report), ["No Ephemeris Files"]);
    }

    #[test]
    fn severity_order() {
        assert!(Severity::Critical < Severity::Error);
        assert!(Severity::Warning < Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Category::Completeness.to_string(), "configuration_completeness");
    }
}
