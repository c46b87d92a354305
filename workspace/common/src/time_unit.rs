use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation unit of the timeline, used to format timestamp labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    /// strftime pattern used for labels of this unit.
    pub fn pattern(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "%Y-%m-%d %H:%M",
            TimeUnit::Hour => "%Y-%m-%d %H:00",
            TimeUnit::Day => "%Y-%m-%d",
            TimeUnit::Week => "%G-W%V",
            TimeUnit::Month => "%Y-%m",
            TimeUnit::Year => "%Y",
        }
    }

    /// Formats a timestamp as an axis or tooltip label.
    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format(self.pattern()).to_string()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown time unit '{}', expected one of: minute, hour, day, week, month, year",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 37, 0).unwrap()
    }

    #[test]
    fn test_default_is_day() {
        assert_eq!(TimeUnit::default(), TimeUnit::Day);
        assert_eq!(TimeUnit::Day.format(&sample()), "2024-03-05");
    }

    #[test]
    fn test_format_per_unit() {
        let ts = sample();
        assert_eq!(TimeUnit::Minute.format(&ts), "2024-03-05 14:37");
        assert_eq!(TimeUnit::Hour.format(&ts), "2024-03-05 14:00");
        assert_eq!(TimeUnit::Week.format(&ts), "2024-W10");
        assert_eq!(TimeUnit::Month.format(&ts), "2024-03");
        assert_eq!(TimeUnit::Year.format(&ts), "2024");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Hour".parse::<TimeUnit>(), Ok(TimeUnit::Hour));
        assert_eq!(" week ".parse::<TimeUnit>(), Ok(TimeUnit::Week));
        assert!("fortnight".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TimeUnit::Month).unwrap();
        assert_eq!(json, "\"month\"");
        let unit: TimeUnit = serde_json::from_str("\"year\"").unwrap();
        assert_eq!(unit, TimeUnit::Year);
    }
}
