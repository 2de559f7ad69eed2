use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::analytics::{
    AnalyticsRequest, CountriesMessage, CountryStats, Period, PlatformStats, PlatformsMessage,
    RankedAnalyticsRequest, ReferrerStats, ReferrersMessage, Stats, StatsMessage,
    TimeseriesMessage, TimeseriesPoint,
};
use crate::transport::{Method, Transport};

const SERVICE: &str = "analytics.v1.AnalyticsService";

const GET_STATS: Method = Method::new(SERVICE, "GetStats");
const GET_TIMESERIES: Method = Method::new(SERVICE, "GetTimeseries");
const GET_PLATFORMS: Method = Method::new(SERVICE, "GetPlatforms");
const GET_COUNTRIES: Method = Method::new(SERVICE, "GetCountries");
const GET_REFERRERS: Method = Method::new(SERVICE, "GetReferrers");

/// Click analytics for individual links.
///
/// Every query covers a [`Period`]; pass `Period::default()` for the last 7 days.
#[derive(Clone)]
pub struct AnalyticsService {
    transport: Arc<dyn Transport>,
}

impl AnalyticsService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_stats(&self, link_id: &str, period: Period) -> Result<Stats, Go2Error> {
        let request = AnalyticsRequest { link_id, period };
        invoke(&*self.transport, GET_STATS, &request, |raw: StatsMessage| {
            Stats::from(raw)
        })
        .await
    }

    /// Daily click counts, oldest first
    pub async fn get_timeseries(
        &self,
        link_id: &str,
        period: Period,
    ) -> Result<Vec<TimeseriesPoint>, Go2Error> {
        let request = AnalyticsRequest { link_id, period };
        invoke(
            &*self.transport,
            GET_TIMESERIES,
            &request,
            |raw: TimeseriesMessage| raw.points.into_iter().map(TimeseriesPoint::from).collect(),
        )
        .await
    }

    pub async fn get_platforms(
        &self,
        link_id: &str,
        period: Period,
    ) -> Result<Vec<PlatformStats>, Go2Error> {
        let request = AnalyticsRequest { link_id, period };
        invoke(
            &*self.transport,
            GET_PLATFORMS,
            &request,
            |raw: PlatformsMessage| raw.platforms.into_iter().map(PlatformStats::from).collect(),
        )
        .await
    }

    /// Top countries by clicks. A `limit` of `None` lets the server decide.
    pub async fn get_countries(
        &self,
        link_id: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<CountryStats>, Go2Error> {
        let request = RankedAnalyticsRequest {
            link_id,
            period,
            limit: limit.unwrap_or(0),
        };
        invoke(
            &*self.transport,
            GET_COUNTRIES,
            &request,
            |raw: CountriesMessage| raw.countries.into_iter().map(CountryStats::from).collect(),
        )
        .await
    }

    /// Top referrers by clicks. A `limit` of `None` lets the server decide.
    pub async fn get_referrers(
        &self,
        link_id: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<ReferrerStats>, Go2Error> {
        let request = RankedAnalyticsRequest {
            link_id,
            period,
            limit: limit.unwrap_or(0),
        };
        invoke(
            &*self.transport,
            GET_REFERRERS,
            &request,
            |raw: ReferrersMessage| raw.referrers.into_iter().map(ReferrerStats::from).collect(),
        )
        .await
    }
}
