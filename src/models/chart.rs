//! Burndown chart input models

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::format::{default_trendline_format, FormatBag};

/// One named line of day -> outstanding points observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurndownSeries {
    pub name: String,
    pub data: BTreeMap<NaiveDate, i64>,
    #[serde(default)]
    pub format: FormatBag,
}

impl BurndownSeries {
    pub fn new(name: impl Into<String>, data: impl IntoIterator<Item = (NaiveDate, i64)>) -> Self {
        BurndownSeries {
            name: name.into(),
            data: data.into_iter().collect(),
            format: FormatBag::default(),
        }
    }

    pub fn with_format(mut self, format: FormatBag) -> Self {
        self.format = format;
        self
    }
}

fn default_points_label() -> String {
    "Outstanding Points".to_string()
}

/// Everything needed to render one sprint's burndown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub sprint_name: String,
    pub utc_chart_start: DateTime<Utc>,
    pub utc_chart_end: DateTime<Utc>,
    pub utc_sprint_start: DateTime<Utc>,
    pub utc_sprint_end: DateTime<Utc>,
    pub total_points: f64,
    #[serde(default)]
    pub series: Vec<BurndownSeries>,
    #[serde(default = "default_points_label")]
    pub points_label: String,
    #[serde(default = "default_trendline_format")]
    pub ideal_trendline_format: FormatBag,
}

impl ChartData {
    /// Create chart data, normalizing all four bounds to UTC
    pub fn new<Tz: TimeZone>(
        sprint_name: impl Into<String>,
        chart_window: (DateTime<Tz>, DateTime<Tz>),
        sprint_window: (DateTime<Tz>, DateTime<Tz>),
        total_points: f64,
    ) -> Self {
        ChartData {
            sprint_name: sprint_name.into(),
            utc_chart_start: chart_window.0.with_timezone(&Utc),
            utc_chart_end: chart_window.1.with_timezone(&Utc),
            utc_sprint_start: sprint_window.0.with_timezone(&Utc),
            utc_sprint_end: sprint_window.1.with_timezone(&Utc),
            total_points,
            series: Vec::new(),
            points_label: default_points_label(),
            ideal_trendline_format: default_trendline_format(),
        }
    }

    pub fn with_series(mut self, series: BurndownSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_points_label(mut self, label: impl Into<String>) -> Self {
        self.points_label = label.into();
        self
    }

    pub fn with_trendline_format(mut self, format: FormatBag) -> Self {
        self.ideal_trendline_format = format;
        self
    }

    /// Whole days between sprint start and end; zero or negative means no trendline
    pub fn sprint_days(&self) -> i64 {
        (self.utc_sprint_end - self.utc_sprint_start).num_days()
    }

    pub fn title(&self) -> String {
        format!("{}: Burndown Chart", self.sprint_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_new_normalizes_to_utc() {
        let tz = FixedOffset::east_opt(10 * 3600).unwrap();
        let start = tz.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let end = tz.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let data = ChartData::new("Sprint 1", (start, end), (start, end), 40.0);

        assert_eq!(data.utc_chart_start, Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap());
        assert_eq!(data.sprint_days(), 14);
        assert_eq!(data.points_label, "Outstanding Points");
        assert_eq!(data.title(), "Sprint 1: Burndown Chart");
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{
            "sprint_name": "Sprint 7",
            "utc_chart_start": "2024-01-01T00:00:00Z",
            "utc_chart_end": "2024-01-14T00:00:00Z",
            "utc_sprint_start": "2024-01-01T00:00:00Z",
            "utc_sprint_end": "2024-01-14T00:00:00Z",
            "total_points": 100,
            "series": [{"name": "Remaining", "data": {"2024-01-01": 100, "2024-01-08": 50}}]
        }"#;
        let data: ChartData = serde_json::from_str(json).unwrap();

        assert_eq!(data.total_points, 100.0);
        assert_eq!(data.series[0].data.len(), 2);
        assert!(data.series[0].format.is_empty());
        assert_eq!(data.ideal_trendline_format, default_trendline_format());
    }
}
