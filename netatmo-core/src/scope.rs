use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Permission requested when exchanging credentials for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Weather station data (getstationsdata, getmeasure).
    ReadStation,
    ReadThermostat,
    WriteThermostat,
    ReadCamera,
    WriteCamera,
    /// Camera videos and live stream.
    AccessCamera,
    ReadPresence,
    AccessPresence,
    ReadSmokeDetector,
    /// Indoor air quality monitor (gethomecoachsdata).
    ReadHomeCoach,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scope '{0}'")]
pub struct UnknownScope(pub String);

impl Scope {
    /// What the server grants when a token request names no scope.
    pub const DEFAULT: Scope = Scope::ReadStation;

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ReadStation => "read_station",
            Scope::ReadThermostat => "read_thermostat",
            Scope::WriteThermostat => "write_thermostat",
            Scope::ReadCamera => "read_camera",
            Scope::WriteCamera => "write_camera",
            Scope::AccessCamera => "access_camera",
            Scope::ReadPresence => "read_presence",
            Scope::AccessPresence => "access_presence",
            Scope::ReadSmokeDetector => "read_smokedetector",
            Scope::ReadHomeCoach => "read_homecoach",
        }
    }

    pub const fn all() -> &'static [Scope] {
        &[
            Scope::ReadStation,
            Scope::ReadThermostat,
            Scope::WriteThermostat,
            Scope::ReadCamera,
            Scope::WriteCamera,
            Scope::AccessCamera,
            Scope::ReadPresence,
            Scope::AccessPresence,
            Scope::ReadSmokeDetector,
            Scope::ReadHomeCoach,
        ]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();

        Scope::all()
            .iter()
            .find(|scope| scope.as_str() == wanted)
            .copied()
            .ok_or_else(|| UnknownScope(value.to_string()))
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_as_str_roundtrip() {
        for scope in Scope::all() {
            let parsed: Scope = scope.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*scope, parsed);
        }
    }

    #[test]
    fn parse_is_lenient_about_case_and_padding() {
        assert_eq!(" READ_SMOKEDETECTOR ".parse(), Ok(Scope::ReadSmokeDetector));
        assert_eq!("Read_HomeCoach".parse(), Ok(Scope::ReadHomeCoach));
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = "read_everything".parse::<Scope>().unwrap_err();
        assert_eq!(err, UnknownScope("read_everything".into()));
        assert!(err.to_string().contains("unknown scope"));
    }

    #[test]
    fn default_scope_is_read_station() {
        assert_eq!(Scope::DEFAULT.to_string(), "read_station");
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&[Scope::ReadStation, Scope::AccessPresence]).unwrap();
        assert_eq!(json, r#"["read_station","access_presence"]"#);

        let back: Vec<Scope> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Scope::ReadStation, Scope::AccessPresence]);

        assert!(serde_json::from_str::<Scope>(r#""bogus""#).is_err());
    }
}
