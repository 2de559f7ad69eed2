//! Click analytics for a single link

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::wire::{lenient, lenient_vec, WireInt};

/// Reporting window for analytics queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Period {
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::SevenDays => "7d",
            Period::ThirtyDays => "30d",
            Period::NinetyDays => "90d",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::SevenDays),
            "30d" => Ok(Period::ThirtyDays),
            "90d" => Ok(Period::NinetyDays),
            other => Err(format!("unknown period '{other}', expected 7d, 30d or 90d")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest<'a> {
    pub link_id: &'a str,
    pub period: Period,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAnalyticsRequest<'a> {
    pub link_id: &'a str,
    pub period: Period,
    /// 0 lets the server pick
    pub limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsMessage {
    #[serde(deserialize_with = "lenient")]
    pub total_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub unique_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub ios_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub android_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub web_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub other_clicks: WireInt,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_countries: Vec<CountryStatsMessage>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_referrers: Vec<ReferrerStatsMessage>,
}

/// Overview counters for a link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub ios_clicks: i64,
    pub android_clicks: i64,
    pub web_clicks: i64,
    pub other_clicks: i64,
    pub top_countries: Vec<CountryStats>,
    pub top_referrers: Vec<ReferrerStats>,
}

impl From<StatsMessage> for Stats {
    fn from(raw: StatsMessage) -> Self {
        Self {
            total_clicks: raw.total_clicks.count(),
            unique_clicks: raw.unique_clicks.count(),
            ios_clicks: raw.ios_clicks.count(),
            android_clicks: raw.android_clicks.count(),
            web_clicks: raw.web_clicks.count(),
            other_clicks: raw.other_clicks.count(),
            top_countries: raw.top_countries.into_iter().map(CountryStats::from).collect(),
            top_referrers: raw.top_referrers.into_iter().map(ReferrerStats::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeseriesPointMessage {
    #[serde(deserialize_with = "lenient")]
    pub date: String,
    #[serde(deserialize_with = "lenient")]
    pub clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub unique_clicks: WireInt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeseriesPoint {
    /// Day label as sent by the server, e.g. `2024-05-01`
    pub date: String,
    pub clicks: i64,
    pub unique_clicks: i64,
}

impl From<TimeseriesPointMessage> for TimeseriesPoint {
    fn from(raw: TimeseriesPointMessage) -> Self {
        Self {
            date: raw.date,
            clicks: raw.clicks.count(),
            unique_clicks: raw.unique_clicks.count(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeseriesMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub points: Vec<TimeseriesPointMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformStatsMessage {
    #[serde(deserialize_with = "lenient")]
    pub platform: String,
    #[serde(deserialize_with = "lenient")]
    pub clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub platform: String,
    pub clicks: i64,
    pub percentage: f64,
}

impl From<PlatformStatsMessage> for PlatformStats {
    fn from(raw: PlatformStatsMessage) -> Self {
        Self {
            platform: raw.platform,
            clicks: raw.clicks.count(),
            percentage: raw.percentage,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformsMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub platforms: Vec<PlatformStatsMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountryStatsMessage {
    #[serde(deserialize_with = "lenient")]
    pub country_code: String,
    #[serde(deserialize_with = "lenient")]
    pub country_name: String,
    #[serde(deserialize_with = "lenient")]
    pub clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub country_code: String,
    pub country_name: String,
    pub clicks: i64,
    pub percentage: f64,
}

impl From<CountryStatsMessage> for CountryStats {
    fn from(raw: CountryStatsMessage) -> Self {
        Self {
            country_code: raw.country_code,
            country_name: raw.country_name,
            clicks: raw.clicks.count(),
            percentage: raw.percentage,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CountriesMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub countries: Vec<CountryStatsMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferrerStatsMessage {
    #[serde(deserialize_with = "lenient")]
    pub referrer: String,
    #[serde(deserialize_with = "lenient")]
    pub clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferrerStats {
    pub referrer: String,
    pub clicks: i64,
    pub percentage: f64,
}

impl From<ReferrerStatsMessage> for ReferrerStats {
    fn from(raw: ReferrerStatsMessage) -> Self {
        Self {
            referrer: raw.referrer,
            clicks: raw.clicks.count(),
            percentage: raw.percentage,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferrersMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub referrers: Vec<ReferrerStatsMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_coerce_nested_breakdowns() {
        let raw: StatsMessage = serde_json::from_value(json!({
            "totalClicks": "1500",
            "uniqueClicks": "900",
            "iosClicks": "700",
            "androidClicks": "bogus",
            "topCountries": [
                {"countryCode": "GE", "countryName": "Georgia", "clicks": "1200", "percentage": 80.0}
            ]
        }))
        .unwrap();

        let stats = Stats::from(raw);
        assert_eq!(stats.total_clicks, 1500);
        assert_eq!(stats.unique_clicks, 900);
        assert_eq!(stats.ios_clicks, 700);
        assert_eq!(stats.android_clicks, 0);
        assert_eq!(stats.web_clicks, 0);
        assert_eq!(stats.top_countries.len(), 1);
        assert_eq!(stats.top_countries[0].clicks, 1200);
        assert_eq!(stats.top_countries[0].percentage, 80.0);
        assert!(stats.top_referrers.is_empty());
    }

    #[test]
    fn percentages_default_to_zero() {
        let raw: PlatformStatsMessage =
            serde_json::from_value(json!({"platform": "ios", "clicks": 3, "percentage": "lots"}))
                .unwrap();
        let platform = PlatformStats::from(raw);
        assert_eq!(platform.clicks, 3);
        assert_eq!(platform.percentage, 0.0);
    }

    #[test]
    fn period_round_trips_through_text() {
        assert_eq!("30d".parse::<Period>().unwrap(), Period::ThirtyDays);
        assert_eq!(Period::default().to_string(), "7d");
        assert!("1y".parse::<Period>().is_err());
        assert_eq!(serde_json::to_value(Period::NinetyDays).unwrap(), json!("90d"));
    }
}
