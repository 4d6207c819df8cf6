//! Telemetry feeds for the demo host: a mock engine and a line parser for
//! values piped on stdin.

use rand::Rng;

use crate::error::{HostError, Result};
use crate::gauge::Snapshot;

const TANK_LITERS: f64 = 45.0;
/// Simulated seconds of driving per step.
const STEP_SECONDS: f64 = 0.12;

/// Smoothly oscillating engine with a fuel tank that drains with distance.
#[derive(Debug, Clone)]
pub struct MockEngine {
    t: f64,
    fuel_percent: f64,
    km_since_full: f64,
    liters_since_full: f64,
    speed_limit_kph: Option<i32>,
    jitter: f64,
}

impl MockEngine {
    pub fn new(speed_limit_kph: Option<i32>) -> Self {
        Self {
            t: 0.0,
            fuel_percent: Snapshot::default().fuel_percent,
            km_since_full: 0.0,
            liters_since_full: 0.0,
            speed_limit_kph,
            jitter: 0.0,
        }
    }

    /// Adds uniform noise of up to `amplitude` km/h (and proportional rpm).
    pub fn with_jitter(mut self, amplitude: f64) -> Self {
        self.jitter = amplitude.abs();
        self
    }

    /// Average consumption since the last fill, in l/100 km.
    pub fn average_consumption(&self) -> f64 {
        if self.km_since_full > 0.001 {
            self.liters_since_full / self.km_since_full * 100.0
        } else {
            0.0
        }
    }

    /// Range left at the current average consumption.
    pub fn remaining_km(&self) -> f64 {
        let liters = self.fuel_percent / 100.0 * TANK_LITERS;
        liters / self.average_consumption().max(0.1) * 100.0
    }

    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Snapshot {
        self.t += 0.15;
        let t = self.t;
        let noise = if self.jitter > 0.0 {
            rng.random_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };

        let speed = (110.0 + 90.0 * t.sin() + noise).clamp(0.0, 260.0);
        let rpm = (2100.0 + 1800.0 * (t + 0.7).sin() + noise * 20.0).clamp(600.0, 7000.0);
        let coolant = (88.0 + 6.0 * (t / 4.0).sin()).clamp(70.0, 110.0);

        let d_km = speed * STEP_SECONDS / 3600.0;
        self.km_since_full += d_km;
        let instant_l100 = (4.8 + rpm / 7000.0 * 3.2 + 0.8 * (t + 1.1).sin()).clamp(3.5, 11.5);
        let d_liters = instant_l100 * d_km / 100.0;
        self.liters_since_full += d_liters;

        let liters = self.fuel_percent / 100.0 * TANK_LITERS - d_liters;
        self.fuel_percent = (liters / TANK_LITERS * 100.0).clamp(0.0, 100.0);

        Snapshot {
            speed_kmh: speed,
            rpm,
            fuel_percent: self.fuel_percent,
            coolant_c: coolant,
            speed_limit_kph: self.speed_limit_kph,
            remaining_km: Some(self.remaining_km() as i32),
            date: None,
        }
    }
}

/// Parses `speed rpm fuel coolant [limit]`; a limit of `-` means none.
pub fn parse_line(line: &str) -> Result<Snapshot> {
    let bad = |reason: String| HostError::BadTelemetry {
        line: line.to_string(),
        reason,
    };
    let fields: Vec<&str> = line.split_whitespace().collect();
    if !(4..=5).contains(&fields.len()) {
        return Err(bad(format!("expected 4 or 5 fields, got {}", fields.len())));
    }
    let mut values = [0.0f64; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = field
            .parse()
            .map_err(|e| bad(format!("{field:?}: {e}")))?;
    }
    let speed_limit_kph = match fields.get(4) {
        None | Some(&"-") => None,
        Some(field) => Some(
            field
                .parse()
                .map_err(|e| bad(format!("limit {field:?}: {e}")))?,
        ),
    };
    Ok(Snapshot {
        speed_kmh: values[0],
        rpm: values[1],
        fuel_percent: values[2],
        coolant_c: values[3],
        speed_limit_kph,
        remaining_km: None,
        date: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mock_engine_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = MockEngine::new(Some(50)).with_jitter(5.0);
        for _ in 0..2_000 {
            let s = engine.step(&mut rng);
            assert!((0.0..=260.0).contains(&s.speed_kmh));
            assert!((600.0..=7000.0).contains(&s.rpm));
            assert!((70.0..=110.0).contains(&s.coolant_c));
            assert!((0.0..=100.0).contains(&s.fuel_percent));
            assert_eq!(s.speed_limit_kph, Some(50));
        }
    }

    #[test]
    fn fuel_drains_while_driving() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = MockEngine::new(None);
        let first = engine.step(&mut rng).fuel_percent;
        let mut last = first;
        for _ in 0..500 {
            last = engine.step(&mut rng).fuel_percent;
        }
        assert!(last < first);
        assert!(engine.average_consumption() > 3.0);
        assert!(engine.remaining_km() > 0.0);
    }

    #[test]
    fn steps_report_truncated_remaining_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = MockEngine::new(None);
        for _ in 0..50 {
            let s = engine.step(&mut rng);
            assert_eq!(s.remaining_km, Some(engine.remaining_km() as i32));
            assert!(s.date.is_none());
        }
    }

    #[test]
    fn parse_line_with_and_without_limit() {
        let s = parse_line("195 2400 55.5 90").unwrap();
        assert_eq!(s.speed_kmh, 195.0);
        assert_eq!(s.fuel_percent, 55.5);
        assert_eq!(s.speed_limit_kph, None);

        let s = parse_line("  80 1800 40 85 50 ").unwrap();
        assert_eq!(s.speed_limit_kph, Some(50));

        let s = parse_line("80 1800 40 85 -").unwrap();
        assert_eq!(s.speed_limit_kph, None);
    }

    #[test]
    fn parse_line_rejects_garbage() {
        assert!(matches!(
            parse_line("fast 1800 40 85"),
            Err(HostError::BadTelemetry { .. })
        ));
        assert!(parse_line("1 2 3").is_err());
        assert!(parse_line("1 2 3 4 5 6").is_err());
        assert!(parse_line("1 2 3 4 fifty").is_err());
    }
}
