#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod config;
pub mod rinex;
pub mod template;
pub mod time;
pub mod validation;


// prelude
pub mod prelude {
    pub use crate::config::{
        Config, ConstellationType, EphemerisConfig, OutputSettings, PositionConfig, SystemSelect,
        TimeConfig, TrajectoryConfig, VelocityConfig,
    };
    pub use crate::rinex::{EphemerisRecord, Header, NavigationFile, ValidityRange};
    pub use crate::template::{TemplateInfo, TemplateStore};
    pub use crate::time::{
        CalendarTime, GlonassTime, SystemTime, TimeConversion, TimeSystem, WeekTime,
    };
    pub use crate::validation::{validate, Issue, Report, Severity};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}
