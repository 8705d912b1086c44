//! Payload of `GET /api/getstationsdata`.
//!
//! Field names mirror the Netatmo wire format. Scalar metadata missing from a
//! payload decodes to its default, but module measurements are optional: a
//! module only reports the readings its sensor type supports, and a reading of
//! zero is kept distinct from a reading that was never sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDataResponse {
    pub status: String,
    #[serde(default)]
    pub time_exec: f64,
    #[serde(default)]
    pub time_server: i64,
    pub body: StationData,
}

impl StationDataResponse {
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.body.devices.iter().find(|d| d.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationData {
    pub devices: Vec<Device>,
    pub user: User,
}

/// A base station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    pub station_name: String,
    pub date_setup: i64,
    pub last_setup: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub last_status_store: i64,
    pub module_name: String,
    pub firmware: i64,
    pub last_upgrade: i64,
    pub wifi_status: i64,
    pub reachable: bool,
    pub co2_calibrating: bool,
    pub data_type: Vec<String>,
    pub place: Place,
    pub home_id: String,
    pub home_name: String,
    /// Absent while the station is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_data: Option<DeviceDashboardData>,
    pub modules: Vec<Module>,
}

impl Device {
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub altitude: i64,
    pub city: String,
    pub country: String,
    pub timezone: String,
    /// `[longitude, latitude]`
    pub location: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceDashboardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_utc: Option<i64>,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "CO2")]
    pub co2: i64,
    #[serde(rename = "Humidity")]
    pub humidity: i64,
    #[serde(rename = "Noise")]
    pub noise: i64,
    #[serde(rename = "Pressure")]
    pub pressure: f64,
    #[serde(rename = "AbsolutePressure")]
    pub absolute_pressure: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub date_max_temp: i64,
    pub date_min_temp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_trend: Option<Trend>,
}

impl DeviceDashboardData {
    pub fn measured_at(&self) -> Option<DateTime<Utc>> {
        self.time_utc.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// A sensor module paired with a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    #[serde(rename = "_id")]
    pub id: String,
    /// `NAModule1` outdoor, `NAModule2` wind, `NAModule3` rain, `NAModule4` indoor.
    #[serde(rename = "type")]
    pub kind: String,
    pub module_name: String,
    pub last_setup: i64,
    pub data_type: Vec<String>,
    pub battery_percent: i64,
    pub reachable: bool,
    pub firmware: i64,
    pub last_message: i64,
    pub last_seen: i64,
    pub rf_status: i64,
    pub battery_vp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_data: Option<ModuleDashboardData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDashboardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_utc: Option<i64>,
    #[serde(rename = "Temperature", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(rename = "Humidity", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_max_temp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_min_temp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_trend: Option<Trend>,
    #[serde(rename = "Rain", skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_rain_1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_rain_24: Option<f64>,
    #[serde(rename = "CO2", skip_serializing_if = "Option::is_none")]
    pub co2: Option<i64>,
    #[serde(rename = "WindStrength", skip_serializing_if = "Option::is_none")]
    pub wind_strength: Option<i64>,
    #[serde(rename = "WindAngle", skip_serializing_if = "Option::is_none")]
    pub wind_angle: Option<i64>,
    #[serde(rename = "GustStrength", skip_serializing_if = "Option::is_none")]
    pub gust_strength: Option<i64>,
    #[serde(rename = "GustAngle", skip_serializing_if = "Option::is_none")]
    pub gust_angle: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wind_str: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wind_angle: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_max_wind_str: Option<i64>,
}

impl ModuleDashboardData {
    pub fn measured_at(&self) -> Option<DateTime<Utc>> {
        self.time_utc.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub mail: String,
    pub administrative: Administrative,
}

/// Locale and unit preferences of the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Administrative {
    pub lang: String,
    pub reg_locale: String,
    pub country: String,
    /// 0 metric, 1 imperial.
    pub unit: i64,
    pub windunit: i64,
    pub pressureunit: i64,
    pub feel_like_algo: i64,
}
