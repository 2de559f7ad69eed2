//! Bulk campaigns: one trackable link per recipient

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::wire::{
    count_map, format_timestamp, lenient, lenient_map, lenient_vec, non_empty, parse_timestamp,
    WireInt,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
    Archived,
    /// A status this client does not know yet
    Other(String),
}

impl CampaignStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Archived => "archived",
            CampaignStatus::Other(other) => other,
        }
    }

    /// `None` for an empty wire value
    pub fn from_wire(raw: String) -> Option<Self> {
        let status = match raw.to_ascii_lowercase().as_str() {
            "" => return None,
            "active" => CampaignStatus::Active,
            "paused" => CampaignStatus::Paused,
            "completed" => CampaignStatus::Completed,
            "archived" => CampaignStatus::Archived,
            _ => CampaignStatus::Other(raw),
        };
        Some(status)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::from_wire(s.to_string()).ok_or_else(|| "empty campaign status".to_string())
    }
}

impl Serialize for CampaignStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignMessage {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub destination_url: String,
    #[serde(deserialize_with = "lenient")]
    pub pass_recipient_id: bool,
    #[serde(deserialize_with = "lenient")]
    pub recipient_param_name: String,
    #[serde(deserialize_with = "lenient")]
    pub total_recipients: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub total_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub unique_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub updated_at: String,
    #[serde(deserialize_with = "lenient")]
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub destination_url: String,
    /// Append the recipient id to the destination as `recipient_param_name`
    pub pass_recipient_id: bool,
    pub recipient_param_name: String,
    pub total_recipients: i64,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub status: Option<CampaignStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CampaignMessage> for Campaign {
    fn from(raw: CampaignMessage) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id,
            name: raw.name,
            description: non_empty(raw.description),
            destination_url: raw.destination_url,
            pass_recipient_id: raw.pass_recipient_id,
            recipient_param_name: raw.recipient_param_name,
            total_recipients: raw.total_recipients.count(),
            total_clicks: raw.total_clicks.count(),
            unique_clicks: raw.unique_clicks.count(),
            status: CampaignStatus::from_wire(raw.status),
            created_at: parse_timestamp(&raw.created_at),
            updated_at: parse_timestamp(&raw.updated_at),
            expires_at: parse_timestamp(&raw.expires_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignLinkMessage {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub campaign_id: String,
    #[serde(deserialize_with = "lenient")]
    pub slug: String,
    #[serde(deserialize_with = "lenient")]
    pub recipient_id: String,
    #[serde(deserialize_with = "lenient")]
    pub recipient_name: String,
    #[serde(deserialize_with = "lenient_map")]
    pub recipient_metadata: HashMap<String, String>,
    #[serde(deserialize_with = "lenient")]
    pub clicked: bool,
    #[serde(deserialize_with = "lenient")]
    pub first_clicked_at: String,
    #[serde(deserialize_with = "lenient")]
    pub last_clicked_at: String,
    #[serde(deserialize_with = "lenient")]
    pub click_count: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub first_click_platform: String,
    #[serde(deserialize_with = "lenient")]
    pub first_click_country: String,
    #[serde(deserialize_with = "lenient")]
    pub first_click_city: String,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub short_url: String,
}

/// The link generated for one campaign recipient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignLink {
    pub id: String,
    pub campaign_id: String,
    pub slug: String,
    pub recipient_id: String,
    pub recipient_name: Option<String>,
    pub recipient_metadata: HashMap<String, String>,
    pub clicked: bool,
    pub first_clicked_at: Option<DateTime<Utc>>,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub first_click_platform: Option<String>,
    pub first_click_country: Option<String>,
    pub first_click_city: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub short_url: String,
}

impl From<CampaignLinkMessage> for CampaignLink {
    fn from(raw: CampaignLinkMessage) -> Self {
        Self {
            id: raw.id,
            campaign_id: raw.campaign_id,
            slug: raw.slug,
            recipient_id: raw.recipient_id,
            recipient_name: non_empty(raw.recipient_name),
            recipient_metadata: raw.recipient_metadata,
            clicked: raw.clicked,
            first_clicked_at: parse_timestamp(&raw.first_clicked_at),
            last_clicked_at: parse_timestamp(&raw.last_clicked_at),
            click_count: raw.click_count.count(),
            first_click_platform: non_empty(raw.first_click_platform),
            first_click_country: non_empty(raw.first_click_country),
            first_click_city: non_empty(raw.first_click_city),
            created_at: parse_timestamp(&raw.created_at),
            short_url: raw.short_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub id: String,
    pub name: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientMessage<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub metadata: &'a HashMap<String, String>,
}

impl<'a> From<&'a Recipient> for RecipientMessage<'a> {
    fn from(recipient: &'a Recipient) -> Self {
        Self {
            id: &recipient.id,
            name: recipient.name.as_deref().unwrap_or(""),
            metadata: &recipient.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinksRequest<'a> {
    pub campaign_id: &'a str,
    pub recipients: Vec<RecipientMessage<'a>>,
}

impl<'a> GenerateLinksRequest<'a> {
    pub fn new(campaign_id: &'a str, recipients: &'a [Recipient]) -> Self {
        Self {
            campaign_id,
            recipients: recipients.iter().map(RecipientMessage::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateCampaignParams {
    pub name: String,
    pub description: Option<String>,
    pub destination_url: String,
    pub pass_recipient_id: Option<bool>,
    pub recipient_param_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub destination_url: &'a str,
    pub pass_recipient_id: bool,
    pub recipient_param_name: &'a str,
    pub expires_at: String,
}

impl<'a> From<&'a CreateCampaignParams> for CreateCampaignRequest<'a> {
    fn from(params: &'a CreateCampaignParams) -> Self {
        Self {
            name: &params.name,
            description: params.description.as_deref().unwrap_or(""),
            destination_url: &params.destination_url,
            pass_recipient_id: params.pass_recipient_id.unwrap_or(false),
            recipient_param_name: params
                .recipient_param_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or("rid"),
            expires_at: params
                .expires_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// Fields to change on a campaign; the server ignores empty values
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaignParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub destination_url: Option<String>,
    pub pass_recipient_id: Option<bool>,
    pub recipient_param_name: Option<String>,
    pub status: Option<CampaignStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub destination_url: &'a str,
    pub pass_recipient_id: bool,
    pub recipient_param_name: &'a str,
    pub status: &'a str,
    pub expires_at: String,
}

impl<'a> UpdateCampaignRequest<'a> {
    pub fn new(id: &'a str, params: &'a UpdateCampaignParams) -> Self {
        Self {
            id,
            name: params.name.as_deref().unwrap_or(""),
            description: params.description.as_deref().unwrap_or(""),
            destination_url: params.destination_url.as_deref().unwrap_or(""),
            pass_recipient_id: params.pass_recipient_id.unwrap_or(false),
            recipient_param_name: params.recipient_param_name.as_deref().unwrap_or(""),
            status: params.status.as_ref().map(CampaignStatus::as_str).unwrap_or(""),
            expires_at: params
                .expires_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// Paging and filters for listing campaigns. Defaults to the first 20.
#[derive(Debug, Clone, Default)]
pub struct CampaignQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub status: Option<CampaignStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCampaignsRequest<'a> {
    pub limit: u32,
    pub offset: u32,
    pub status: &'a str,
    pub search: &'a str,
}

impl<'a> From<&'a CampaignQuery> for ListCampaignsRequest<'a> {
    fn from(query: &'a CampaignQuery) -> Self {
        Self {
            limit: query.limit.unwrap_or(20),
            offset: query.offset.unwrap_or(0),
            status: query.status.as_ref().map(CampaignStatus::as_str).unwrap_or(""),
            search: query.search.as_deref().unwrap_or(""),
        }
    }
}

/// Paging and filters for a campaign's links. Defaults to the first 50.
#[derive(Debug, Clone, Default)]
pub struct CampaignLinkQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub clicked_only: bool,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignLinksRequest<'a> {
    pub campaign_id: &'a str,
    pub limit: u32,
    pub offset: u32,
    pub clicked_only: bool,
    pub search: &'a str,
}

impl<'a> ListCampaignLinksRequest<'a> {
    pub fn new(campaign_id: &'a str, query: &'a CampaignLinkQuery) -> Self {
        Self {
            campaign_id,
            limit: query.limit.unwrap_or(50),
            offset: query.offset.unwrap_or(0),
            clicked_only: query.clicked_only,
            search: query.search.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignIdRequest<'a> {
    pub campaign_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLinksRequest<'a> {
    pub campaign_id: &'a str,
    pub format: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListCampaignsMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub campaigns: Vec<CampaignMessage>,
    #[serde(deserialize_with = "lenient")]
    pub total: WireInt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    pub total: i64,
}

impl From<ListCampaignsMessage> for CampaignPage {
    fn from(raw: ListCampaignsMessage) -> Self {
        Self {
            campaigns: raw.campaigns.into_iter().map(Campaign::from).collect(),
            total: raw.total.count(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListCampaignLinksMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub links: Vec<CampaignLinkMessage>,
    #[serde(deserialize_with = "lenient")]
    pub total: WireInt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignLinkPage {
    pub links: Vec<CampaignLink>,
    pub total: i64,
}

impl From<ListCampaignLinksMessage> for CampaignLinkPage {
    fn from(raw: ListCampaignLinksMessage) -> Self {
        Self {
            links: raw.links.into_iter().map(CampaignLink::from).collect(),
            total: raw.total.count(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportLinksMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub links: Vec<CampaignLinkMessage>,
}

impl From<ExportLinksMessage> for Vec<CampaignLink> {
    fn from(raw: ExportLinksMessage) -> Self {
        raw.links.into_iter().map(CampaignLink::from).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateLinksMessage {
    #[serde(deserialize_with = "lenient")]
    pub campaign_id: String,
    #[serde(deserialize_with = "lenient")]
    pub links_created: WireInt,
    #[serde(deserialize_with = "lenient_vec")]
    pub sample_links: Vec<CampaignLinkMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateLinksResult {
    pub campaign_id: String,
    pub links_created: i64,
    /// A few of the created links, not the full set
    pub sample_links: Vec<CampaignLink>,
}

impl From<GenerateLinksMessage> for GenerateLinksResult {
    fn from(raw: GenerateLinksMessage) -> Self {
        Self {
            campaign_id: raw.campaign_id,
            links_created: raw.links_created.count(),
            sample_links: raw.sample_links.into_iter().map(CampaignLink::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignStatsMessage {
    #[serde(deserialize_with = "lenient")]
    pub campaign_id: String,
    #[serde(deserialize_with = "lenient")]
    pub total_recipients: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub total_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub unique_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub click_rate: f64,
    #[serde(deserialize_with = "lenient_map")]
    pub clicks_by_platform: HashMap<String, WireInt>,
    #[serde(deserialize_with = "lenient_map")]
    pub clicks_by_country: HashMap<String, WireInt>,
    #[serde(deserialize_with = "lenient_map")]
    pub clicks_by_day: HashMap<String, WireInt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignStats {
    pub campaign_id: String,
    pub total_recipients: i64,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    /// Share of recipients who clicked, as reported by the server
    pub click_rate: f64,
    pub clicks_by_platform: HashMap<String, i64>,
    pub clicks_by_country: HashMap<String, i64>,
    pub clicks_by_day: HashMap<String, i64>,
}

impl From<CampaignStatsMessage> for CampaignStats {
    fn from(raw: CampaignStatsMessage) -> Self {
        Self {
            campaign_id: raw.campaign_id,
            total_recipients: raw.total_recipients.count(),
            total_clicks: raw.total_clicks.count(),
            unique_clicks: raw.unique_clicks.count(),
            click_rate: raw.click_rate,
            clicks_by_platform: count_map(raw.clicks_by_platform),
            clicks_by_country: count_map(raw.clicks_by_country),
            clicks_by_day: count_map(raw.clicks_by_day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn campaign_status_passes_unknown_values_through() {
        let raw: CampaignMessage = serde_json::from_value(json!({
            "id": "cmp_1",
            "status": "scheduled",
            "totalClicks": "77",
            "expiresAt": ""
        }))
        .unwrap();
        let campaign = Campaign::from(raw);
        assert_eq!(
            campaign.status,
            Some(CampaignStatus::Other("scheduled".to_string()))
        );
        assert_eq!(campaign.total_clicks, 77);
        assert_eq!(campaign.expires_at, None);
        assert_eq!(campaign.description, None);

        let campaign = Campaign::from(CampaignMessage::default());
        assert_eq!(campaign.status, None);
    }

    #[test]
    fn empty_link_listing_is_an_empty_page() {
        let raw: ListCampaignLinksMessage =
            serde_json::from_value(json!({"links": [], "total": 0})).unwrap();
        let page = CampaignLinkPage::from(raw);
        assert!(page.links.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn recipient_metadata_keeps_keys_with_bad_values() {
        let raw: CampaignLinkMessage = serde_json::from_value(json!({
            "id": "cl_1",
            "recipientMetadata": {"tier": "gold", "age": 42}
        }))
        .unwrap();

        let link = CampaignLink::from(raw);
        assert_eq!(link.recipient_metadata.len(), 2);
        assert_eq!(link.recipient_metadata["tier"], "gold");
        assert_eq!(link.recipient_metadata["age"], "");
    }

    #[test]
    fn stats_maps_keep_every_label() {
        let raw: CampaignStatsMessage = serde_json::from_value(json!({
            "campaignId": "cmp_1",
            "totalClicks": "49",
            "clickRate": 0.35,
            "clicksByPlatform": {"ios": "42", "android": "7"}
        }))
        .unwrap();
        let stats = CampaignStats::from(raw);
        assert_eq!(stats.total_clicks, 49);
        assert_eq!(stats.click_rate, 0.35);
        assert_eq!(stats.clicks_by_platform.len(), 2);
        assert_eq!(stats.clicks_by_platform["ios"], 42);
        assert_eq!(stats.clicks_by_platform["android"], 7);
        assert!(stats.clicks_by_day.is_empty());
    }

    #[test]
    fn create_request_fills_in_defaults() {
        let params = CreateCampaignParams {
            name: "Spring sale".to_string(),
            destination_url: "https://shop.example".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(CreateCampaignRequest::from(&params)).unwrap(),
            json!({
                "name": "Spring sale",
                "description": "",
                "destinationUrl": "https://shop.example",
                "passRecipientId": false,
                "recipientParamName": "rid",
                "expiresAt": ""
            })
        );
    }

    #[test]
    fn update_request_blanks_unset_fields() {
        let params = UpdateCampaignParams {
            status: Some(CampaignStatus::Paused),
            expires_at: Some(Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(UpdateCampaignRequest::new("cmp_1", &params)).unwrap(),
            json!({
                "id": "cmp_1",
                "name": "",
                "description": "",
                "destinationUrl": "",
                "passRecipientId": false,
                "recipientParamName": "",
                "status": "paused",
                "expiresAt": "2025-06-30T23:59:59.000Z"
            })
        );
    }

    #[test]
    fn recipients_default_name_and_metadata() {
        let recipients = vec![Recipient::new("r1")];
        let request = GenerateLinksRequest::new("cmp_1", &recipients);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "campaignId": "cmp_1",
                "recipients": [{"id": "r1", "name": "", "metadata": {}}]
            })
        );
    }

    #[test]
    fn campaign_link_optional_fields() {
        let raw: CampaignLinkMessage = serde_json::from_value(json!({
            "id": "cl_1",
            "recipientName": "",
            "recipientMetadata": {"tier": "gold"},
            "clicked": true,
            "firstClickedAt": "2024-02-01T08:00:00Z",
            "clickCount": "3",
            "firstClickCountry": "GE"
        }))
        .unwrap();
        let link = CampaignLink::from(raw);
        assert_eq!(link.recipient_name, None);
        assert_eq!(link.recipient_metadata["tier"], "gold");
        assert!(link.first_clicked_at.is_some());
        assert_eq!(link.last_clicked_at, None);
        assert_eq!(link.click_count, 3);
        assert_eq!(link.first_click_country.as_deref(), Some("GE"));
        assert_eq!(link.first_click_city, None);
    }
}
