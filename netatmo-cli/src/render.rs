use std::fmt;

use chrono::{DateTime, Utc};
use netatmo_core::{
    StationDataResponse,
    model::{Device, DeviceDashboardData, Module, ModuleDashboardData, Trend},
};

/// Human-readable overview of every station and its modules.
pub fn summary(data: &StationDataResponse) -> String {
    Summary(data).to_string()
}

struct Summary<'a>(&'a StationDataResponse);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let devices = &self.0.body.devices;
        if devices.is_empty() {
            return writeln!(f, "No stations found.");
        }

        for device in devices {
            write_device(f, device)?;
        }
        Ok(())
    }
}

fn write_device(f: &mut fmt::Formatter<'_>, device: &Device) -> fmt::Result {
    write!(f, "{} [{}]", device.station_name, device.id)?;
    if !device.place.city.is_empty() {
        write!(f, " {}, {}", device.place.city, device.place.country)?;
    }
    writeln!(f)?;

    match device.dashboard_data.as_ref() {
        Some(dash) => {
            writeln!(f, "  {}", format_time(dash.measured_at()))?;
            writeln!(f, "  {}", device_readings(dash).join(", "))?;
        }
        None => writeln!(f, "  no data (station unreachable)")?,
    }

    for module in &device.modules {
        write_module(f, module)?;
    }
    Ok(())
}

fn write_module(f: &mut fmt::Formatter<'_>, module: &Module) -> fmt::Result {
    write!(
        f,
        "  {} [{}] battery {}%",
        module.module_name, module.kind, module.battery_percent
    )?;
    if !module.reachable {
        write!(f, ", unreachable")?;
    }
    writeln!(f)?;

    let readings = module
        .dashboard_data
        .as_ref()
        .map(module_readings)
        .unwrap_or_default();
    if readings.is_empty() {
        writeln!(f, "    no data")
    } else {
        writeln!(f, "    {}", readings.join(", "))
    }
}

fn device_readings(dash: &DeviceDashboardData) -> Vec<String> {
    vec![
        format!(
            "Temperature {} °C{}",
            dash.temperature,
            trend_suffix(dash.temp_trend)
        ),
        format!("Humidity {} %", dash.humidity),
        format!("CO2 {} ppm", dash.co2),
        format!("Noise {} dB", dash.noise),
        format!(
            "Pressure {} mbar{}",
            dash.pressure,
            trend_suffix(dash.pressure_trend)
        ),
    ]
}

/// Only the readings the module actually reported.
fn module_readings(dash: &ModuleDashboardData) -> Vec<String> {
    let mut readings = Vec::new();

    if let Some(t) = dash.temperature {
        readings.push(format!("Temperature {t} °C{}", trend_suffix(dash.temp_trend)));
    }
    if let Some(h) = dash.humidity {
        readings.push(format!("Humidity {h} %"));
    }
    if let Some(co2) = dash.co2 {
        readings.push(format!("CO2 {co2} ppm"));
    }
    if let Some(rain) = dash.rain {
        readings.push(format!("Rain {rain} mm"));
    }
    if let Some(rain) = dash.sum_rain_24 {
        readings.push(format!("Rain 24h {rain} mm"));
    }
    if let Some(speed) = dash.wind_strength {
        let angle = dash.wind_angle.map(|a| format!(" from {a}°")).unwrap_or_default();
        readings.push(format!("Wind {speed} km/h{angle}"));
    }
    if let Some(speed) = dash.gust_strength {
        let angle = dash.gust_angle.map(|a| format!(" from {a}°")).unwrap_or_default();
        readings.push(format!("Gust {speed} km/h{angle}"));
    }

    readings
}

fn trend_suffix(trend: Option<Trend>) -> &'static str {
    match trend {
        Some(Trend::Up) => " (up)",
        Some(Trend::Down) => " (down)",
        Some(Trend::Stable) => " (stable)",
        Some(Trend::Unknown) | None => "",
    }
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => format!("measured {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "measured at an unknown time".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "status": "ok",
        "time_server": 1555677755,
        "body": {
            "devices": [{
                "_id": "70:ee:50:00:00:14",
                "station_name": "Home",
                "type": "NAMain",
                "reachable": true,
                "place": {"city": "Lyon", "country": "FR"},
                "dashboard_data": {
                    "time_utc": 1555677739,
                    "Temperature": 21.5,
                    "CO2": 500,
                    "Humidity": 40,
                    "Noise": 35,
                    "Pressure": 1012.3,
                    "temp_trend": "up"
                },
                "modules": [
                    {
                        "_id": "05:00:00:00:00:02",
                        "type": "NAModule3",
                        "module_name": "Rain gauge",
                        "battery_percent": 90,
                        "reachable": true,
                        "dashboard_data": {"time_utc": 1555677734, "Rain": 0}
                    },
                    {
                        "_id": "06:00:00:00:00:03",
                        "type": "NAModule2",
                        "module_name": "Wind gauge",
                        "battery_percent": 5,
                        "reachable": false
                    }
                ]
            }],
            "user": {"mail": "someone@example.com"}
        }
    }"#;

    fn parse() -> StationDataResponse {
        serde_json::from_str(RESPONSE).expect("test response must parse")
    }

    #[test]
    fn summary_lists_station_and_modules() {
        let text = summary(&parse());

        assert!(text.starts_with("Home [70:ee:50:00:00:14] Lyon, FR\n"));
        assert!(text.contains("measured 2019-04-19 12:42 UTC"));
        assert!(text.contains("Temperature 21.5 °C (up)"));
        assert!(text.contains("Pressure 1012.3 mbar"));
        assert!(text.contains("Wind gauge [NAModule2] battery 5%, unreachable\n    no data\n"));
    }

    #[test]
    fn zero_rain_is_shown_but_missing_readings_are_not() {
        let data = parse();
        let rain = &data.body.devices[0].modules[0];

        let readings = module_readings(rain.dashboard_data.as_ref().unwrap());
        assert_eq!(readings, vec!["Rain 0 mm".to_string()]);
    }

    #[test]
    fn empty_account_says_so() {
        let mut data = parse();
        data.body.devices.clear();
        assert_eq!(summary(&data), "No stations found.\n");
    }

    #[test]
    fn unreachable_station_and_unknown_time_are_reported() {
        let mut data = parse();
        let device = &mut data.body.devices[0];
        device.dashboard_data.as_mut().unwrap().time_utc = None;

        let text = summary(&data);
        assert!(text.contains("\n  measured at an unknown time\n"));

        data.body.devices[0].dashboard_data = None;
        let text = summary(&data);
        assert!(text.contains("Lyon, FR\n  no data (station unreachable)\n  Rain gauge"));
    }
}
