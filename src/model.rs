use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, StandardNormal};
use std::f64::consts::PI;

const BASE_TEMPERATURE_C: f64 = 12.0;
const DIURNAL_AMPLITUDE_C: f64 = 6.0;
const DIURNAL_PHASE_HOUR: f64 = 15.0;

const GUST_SHAPE: f64 = 2.0;
const GUST_SCALE: f64 = 1.2;
const WIND_INERTIA: f64 = 0.92;
const WIND_GUST_WEIGHT: f64 = 0.08;

/// One multi-quantity reading tagged with its timestamp and station.
///
/// Humidity is held to [10, 100], pressure to [980, 1045] hPa, wind
/// speed to [0, 20] m/s and wind direction to [0, 360). Temperature is
/// deliberately unclamped.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub ts: DateTime<Utc>,
    pub station_id: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub wind_dir_deg: i32,
}

/// Seeded stochastic weather state machine.
///
/// Produces temporally correlated readings: a diurnal temperature
/// cycle, humidity inversely tracking temperature, pressure as a
/// bounded random walk, wind speed smoothed against gamma-distributed
/// gusts and wind direction drifting on the circle. Reproducible for a
/// fixed seed and timestamp sequence; there is no other source of
/// randomness.
#[derive(Debug, Clone)]
pub struct WeatherModel {
    pressure_hpa: f64,
    wind_speed_mps: f64,
    wind_dir_deg: i32,
    gust: Gamma<f64>,
    rng: StdRng,
}

impl WeatherModel {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gust = Gamma::new(GUST_SHAPE, GUST_SCALE).expect("gamma parameters are constant");
        let pressure_hpa = 1013.0 + gauss(&mut rng, 1.5);
        let wind_speed_mps = gust.sample(&mut rng).max(0.2);
        let wind_dir_deg = rng.gen_range(0..360);
        Self {
            pressure_hpa,
            wind_speed_mps,
            wind_dir_deg,
            gust,
            rng,
        }
    }

    /// Advance the model one step and emit the reading for `now`.
    pub fn sample(&mut self, now: DateTime<Utc>, station_id: &str) -> WeatherSample {
        let hour = fractional_hour_utc(now);

        let temperature_c = diurnal_temperature(hour) + gauss(&mut self.rng, 0.4);

        let humidity_pct = (75.0 - 1.8 * (temperature_c - BASE_TEMPERATURE_C)
            + gauss(&mut self.rng, 2.5))
        .clamp(10.0, 100.0);

        self.pressure_hpa = (self.pressure_hpa + gauss(&mut self.rng, 0.08)).clamp(980.0, 1045.0);

        self.wind_speed_mps = (WIND_INERTIA * self.wind_speed_mps
            + WIND_GUST_WEIGHT * self.gust.sample(&mut self.rng))
        .clamp(0.0, 20.0);

        let drift = gauss(&mut self.rng, 8.0).round() as i32;
        self.wind_dir_deg = (self.wind_dir_deg + drift).rem_euclid(360);

        WeatherSample {
            ts: now,
            station_id: station_id.to_string(),
            temperature_c,
            humidity_pct,
            pressure_hpa: self.pressure_hpa,
            wind_speed_mps: self.wind_speed_mps,
            wind_dir_deg: self.wind_dir_deg,
        }
    }
}

/// Noise-free diurnal mean: a 6 C sine around the 12 C base, anchored
/// so the curve crosses the base at 15:00 UTC.
fn diurnal_temperature(hour: f64) -> f64 {
    BASE_TEMPERATURE_C + DIURNAL_AMPLITUDE_C * (2.0 * PI * (hour - DIURNAL_PHASE_HOUR) / 24.0).sin()
}

fn fractional_hour_utc(ts: DateTime<Utc>) -> f64 {
    ts.hour() as f64 + ts.minute() as f64 / 60.0 + ts.second() as f64 / 3600.0
}

fn gauss(rng: &mut StdRng, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    sigma * z
}
