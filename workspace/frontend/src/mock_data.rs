use chrono::{DateTime, Duration, NaiveTime, Utc};
use common::{ExplanationEntry, ExplanationSet, ForecastPayload, Kpi, SeriesPoint, TimeUnit};

pub const SERIES_KEY: &str = "machine_1";
const HISTORY_POINTS: i64 = 24;
const FORECAST_POINTS: i64 = 8;
const FEATURES: [&str; 5] = ["temperature", "load", "hour_of_day", "humidity", "maintenance"];

fn step(time_unit: TimeUnit) -> Duration {
    match time_unit {
        TimeUnit::Minute => Duration::minutes(1),
        TimeUnit::Hour => Duration::hours(1),
        TimeUnit::Day => Duration::days(1),
        TimeUnit::Week => Duration::weeks(1),
        TimeUnit::Month => Duration::days(30),
        TimeUnit::Year => Duration::days(365),
    }
}

fn energy(i: i64) -> f64 {
    let x = i as f64;
    120.0 + 15.0 * (x / 3.0).sin() + 0.8 * x
}

fn explanation(i: i64) -> ExplanationSet {
    FEATURES
        .iter()
        .enumerate()
        .map(|(rank, feature)| {
            let x = (i * 7 + rank as i64 * 3) as f64;
            let importance = (x.sin() * 10.0 / (rank as f64 + 1.0) * 100.0).round() / 100.0;
            ExplanationEntry::new(*feature, importance)
        })
        .collect()
}

/// Energy consumption of one machine around today, in steps of `time_unit`.
///
/// The last historical point is today; one explanation set is produced per
/// prediction.
pub fn generate_forecast_payload(time_unit: TimeUnit) -> ForecastPayload {
    let today: DateTime<Utc> = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    generate_forecast_payload_at(today, time_unit)
}

pub fn generate_forecast_payload_at(today: DateTime<Utc>, time_unit: TimeUnit) -> ForecastPayload {
    let step = step(time_unit);

    let past_data = (0..HISTORY_POINTS)
        .map(|i| {
            let timestamp = today - step * (HISTORY_POINTS - 1 - i) as i32;
            SeriesPoint::new(timestamp, SERIES_KEY, energy(i))
        })
        .collect();

    let future_data = (1..=FORECAST_POINTS)
        .map(|i| {
            let timestamp = today + step * i as i32;
            SeriesPoint::new(timestamp, SERIES_KEY, energy(HISTORY_POINTS - 1 + i))
                .with_confidence(95.0 - 4.5 * i as f64)
        })
        .collect();

    ForecastPayload {
        series_key: Some(SERIES_KEY.to_string()),
        past_data,
        future_data,
        kpi: Some(Kpi {
            id: Some("energy".to_string()),
            name: Some("Energy Consumption".to_string()),
            unit: "kWh".to_string(),
        }),
        time_unit,
        explanation_data: (0..FORECAST_POINTS).map(explanation).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use compute::default_chart;

    #[test]
    fn test_mock_payload_puts_today_at_breakpoint() {
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let payload = generate_forecast_payload_at(today, TimeUnit::Week);
        let chart = default_chart(&payload).unwrap();

        assert_eq!(chart.timeline().breakpoint(), HISTORY_POINTS as isize - 1);
        assert_eq!(chart.today_marker().unwrap().timestamp, today);
        assert_eq!(chart.explanations().len(), payload.future_data.len());
        assert_eq!(chart.unit(), "kWh");
    }

    #[test]
    fn test_mock_payload_steps_by_time_unit() {
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let payload = generate_forecast_payload_at(today, TimeUnit::Hour);
        assert_eq!(payload.future_data[0].timestamp, today + Duration::hours(1));
        assert_eq!(payload.past_data[0].timestamp, today - Duration::hours(HISTORY_POINTS - 1));
    }
}
