use tracing::{instrument, trace};

use crate::timeline::Timeline;

/// Derives the upper/lower envelope drawn around predicted values.
///
/// The envelope is a fixed +/-20% display placeholder. It is not derived from
/// the model's confidence and does not represent forecast uncertainty.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundSynthesizer;

impl BoundSynthesizer {
    pub const UPPER_FACTOR: f64 = 1.2;
    pub const LOWER_FACTOR: f64 = 0.8;

    /// `(upper, lower)` envelope for a single value.
    pub fn envelope(value: f64) -> (f64, f64) {
        (value * Self::UPPER_FACTOR, value * Self::LOWER_FACTOR)
    }

    /// Sets bounds on every point at or after the breakpoint and clears them before it.
    #[instrument(skip_all, fields(points = timeline.len(), breakpoint = timeline.breakpoint()))]
    pub fn synthesize(&self, timeline: &mut Timeline) {
        let breakpoint = timeline.breakpoint();
        for (index, point) in timeline.points_mut().iter_mut().enumerate() {
            if index as isize >= breakpoint {
                let (upper, lower) = Self::envelope(point.value);
                point.upper_bound = Some(upper);
                point.lower_bound = Some(lower);
            } else {
                point.upper_bound = None;
                point.lower_bound = None;
            }
        }
        trace!("Synthesized bounds from index {}", breakpoint.max(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineMerger;
    use chrono::{TimeZone, Utc};
    use common::TimePoint;

    const EPSILON: f64 = 1e-9;

    fn series(values: &[f64]) -> Vec<TimePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap();
                TimePoint::new(ts, *v)
            })
            .collect()
    }

    fn synthesized(past: &[f64], future: &[f64]) -> Timeline {
        let mut timeline = TimelineMerger::merge("v", &series(past), &series(future));
        BoundSynthesizer.synthesize(&mut timeline);
        timeline
    }

    #[test]
    fn test_bounds_start_at_breakpoint() {
        let timeline = synthesized(&[10.0, 12.0], &[14.0, 16.0]);

        let first = &timeline.points()[0];
        assert_eq!(first.upper_bound, None);
        assert_eq!(first.lower_bound, None);

        for point in &timeline.points()[1..] {
            let upper = point.upper_bound.unwrap();
            let lower = point.lower_bound.unwrap();
            assert!((upper - point.value * 1.2).abs() < EPSILON);
            assert!((lower - point.value * 0.8).abs() < EPSILON);
        }
    }

    #[test]
    fn test_bounds_scenario_values() {
        let timeline = synthesized(&[10.0, 12.0], &[14.0, 16.0]);
        let point = &timeline.points()[2];

        assert!((point.upper_bound.unwrap() - 16.8).abs() < EPSILON);
        assert!((point.lower_bound.unwrap() - 11.2).abs() < EPSILON);
    }

    #[test]
    fn test_zero_value_has_zero_bounds() {
        let timeline = synthesized(&[5.0], &[0.0]);
        let point = &timeline.points()[1];

        assert_eq!(point.upper_bound, Some(0.0));
        assert_eq!(point.lower_bound, Some(0.0));
    }

    #[test]
    fn test_all_points_bounded_without_history() {
        let timeline = synthesized(&[], &[1.0, 2.0]);
        assert!(timeline.points().iter().all(|p| p.upper_bound.is_some() && p.lower_bound.is_some()));
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let once = synthesized(&[1.0, 2.0, 3.0], &[4.0, 5.0]);
        let mut twice = once.clone();
        BoundSynthesizer.synthesize(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(once, synthesized(&[1.0, 2.0, 3.0], &[4.0, 5.0]));
    }

    #[test]
    fn test_envelope() {
        let (upper, lower) = BoundSynthesizer::envelope(-10.0);
        assert!((upper + 12.0).abs() < EPSILON);
        assert!((lower + 8.0).abs() < EPSILON);
    }
}
