//! Enumerated values of the configuration document
use super::Error;

/// Declares an enum along with its wire identifiers
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Wire identifier
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self, Error> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(Error::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Initial position coordinates
    #[derive(Default)]
    pub enum PositionType {
        #[default]
        LLA => "LLA",
        ECEF => "ECEF",
    }
}

wire_enum! {
    /// Initial velocity frame
    #[derive(Default)]
    pub enum VelocityType {
        /// Speed, Course, Up
        #[default]
        SCU => "SCU",
        ENU => "ENU",
        ECEF => "ECEF",
    }
}

wire_enum! {
    /// Trajectory segment motion model
    #[derive(Default)]
    pub enum TrajectoryType {
        #[default]
        Const => "Const",
        ConstAcc => "ConstAcc",
        VerticalAcc => "VerticalAcc",
        Jerk => "Jerk",
        HorizontalTurn => "HorizontalTurn",
    }
}

wire_enum! {
    /// Ephemeris file format
    #[derive(Default)]
    pub enum EphemerisType {
        #[default]
        RINEX => "RINEX",
        YUMA => "YUMA",
        XML => "XML",
    }
}

wire_enum! {
    /// Kind of data the simulator produces
    #[derive(Default)]
    pub enum OutputType {
        /// Sampled intermediate frequency signal
        #[default]
        IFdata => "IFdata",
        Position => "position",
        Observation => "observation",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum OutputFormat {
        #[default]
        IQ8 => "IQ8",
        IQ4 => "IQ4",
        RINEX3 => "RINEX3",
        KML => "KML",
        NMEA0183 => "NMEA0183",
        ECEF => "ECEF",
        LLA => "LLA",
    }
}

wire_enum! {
    /// Satellite constellations the simulator generates signals for
    pub enum ConstellationType {
        GPS => "GPS",
        BDS => "BDS",
        Galileo => "Galileo",
        GLONASS => "GLONASS",
        QZSS => "QZSS",
        IRNSS => "IRNSS",
    }
}

impl OutputType {
    /// True if the simulator runs at a fixed output interval
    pub const fn has_interval(&self) -> bool {
        matches!(self, Self::Position | Self::Observation)
    }
}

impl ConstellationType {
    /// Signals that may be generated for this constellation
    pub const fn signals(&self) -> &'static [&'static str] {
        match self {
            Self::GPS => &["L1CA", "L1C", "L2C", "L2P", "L5"],
            Self::BDS => &["B1C", "B1I", "B2I", "B3I", "B2a", "B2b"],
            Self::Galileo => &["E1", "E5a", "E5b", "E5", "E6"],
            Self::GLONASS => &["G1", "G2"],
            Self::QZSS | Self::IRNSS => &[],
        }
    }
    /// Signal selected when none is specified
    pub const fn default_signal(&self) -> &'static str {
        match self {
            Self::BDS => "B1C",
            Self::Galileo => "E1",
            Self::GLONASS => "G1",
            _ => "L1CA",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_identifiers() {
        assert_eq!(OutputType::from_str("position").unwrap(), OutputType::Position);
        assert_eq!(OutputType::IFdata.to_string(), "IFdata");
        assert_eq!(ConstellationType::from_str("Galileo").unwrap(), ConstellationType::Galileo);
        assert!(ConstellationType::from_str("GALILEO").is_err());
        assert!(matches!(
            TrajectoryType::from_str("Spiral"),
            Err(Error::UnknownVariant { kind: "TrajectoryType", .. })
        ));
        assert_eq!(
            serde_json::to_value(OutputFormat::NMEA0183).unwrap(),
            serde_json::json!("NMEA0183")
        );
    }

    #[test]
    fn signal_catalogue() {
        for system in [
            ConstellationType::GPS,
            ConstellationType::BDS,
            ConstellationType::Galileo,
            ConstellationType::GLONASS,
        ] {
            assert_eq!(system.signals()[0], system.default_signal());
        }
        assert!(ConstellationType::QZSS.signals().is_empty());
        assert_eq!(ConstellationType::IRNSS.default_signal(), "L1CA");
    }
}
