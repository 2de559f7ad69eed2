use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{lenient, lenient_vec, non_empty, parse_timestamp, WireInt};

/// Link as received from the link service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkMessage {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient")]
    pub slug: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub ios_url: String,
    #[serde(deserialize_with = "lenient")]
    pub android_url: String,
    #[serde(deserialize_with = "lenient")]
    pub web_url: String,
    #[serde(deserialize_with = "lenient")]
    pub fallback_url: String,
    #[serde(deserialize_with = "lenient")]
    pub huawei_url: String,
    #[serde(deserialize_with = "lenient")]
    pub amazon_url: String,
    #[serde(deserialize_with = "lenient")]
    pub windows_url: String,
    #[serde(deserialize_with = "lenient")]
    pub macos_url: String,
    #[serde(deserialize_with = "lenient")]
    pub app_name: String,
    #[serde(deserialize_with = "lenient")]
    pub app_icon_url: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub is_active: bool,
    #[serde(deserialize_with = "lenient")]
    pub total_clicks: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub updated_at: String,
}

/// A smart link with per-platform destinations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub slug: String,
    pub title: String,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub web_url: Option<String>,
    pub fallback_url: Option<String>,
    pub huawei_url: Option<String>,
    pub amazon_url: Option<String>,
    pub windows_url: Option<String>,
    pub macos_url: Option<String>,
    pub app_name: Option<String>,
    pub app_icon_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub total_clicks: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<LinkMessage> for Link {
    fn from(raw: LinkMessage) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id,
            slug: raw.slug,
            title: raw.title,
            ios_url: non_empty(raw.ios_url),
            android_url: non_empty(raw.android_url),
            web_url: non_empty(raw.web_url),
            fallback_url: non_empty(raw.fallback_url),
            huawei_url: non_empty(raw.huawei_url),
            amazon_url: non_empty(raw.amazon_url),
            windows_url: non_empty(raw.windows_url),
            macos_url: non_empty(raw.macos_url),
            app_name: non_empty(raw.app_name),
            app_icon_url: non_empty(raw.app_icon_url),
            description: non_empty(raw.description),
            is_active: raw.is_active,
            total_clicks: raw.total_clicks.count(),
            created_at: parse_timestamp(&raw.created_at),
            updated_at: parse_timestamp(&raw.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListLinksMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub links: Vec<LinkMessage>,
    #[serde(deserialize_with = "lenient")]
    pub total: WireInt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub total: i64,
}

impl From<ListLinksMessage> for LinkPage {
    fn from(raw: ListLinksMessage) -> Self {
        Self {
            links: raw.links.into_iter().map(Link::from).collect(),
            total: raw.total.count(),
        }
    }
}

/// Pagination for listing links. Unset fields use page 1 and 20 per page.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinksRequest {
    pub page: u32,
    pub per_page: u32,
}

impl From<&LinkQuery> for ListLinksRequest {
    fn from(query: &LinkQuery) -> Self {
        Self {
            page: query.page.unwrap_or(1),
            per_page: query.per_page.unwrap_or(20),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkParams {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub huawei_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macos_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields to change on a link; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateLinkRequest<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub params: &'a UpdateLinkParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckSlugMessage {
    #[serde(deserialize_with = "lenient")]
    pub available: bool,
    #[serde(deserialize_with = "lenient")]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugAvailability {
    pub available: bool,
    pub slug: String,
}

impl SlugAvailability {
    /// The server may omit the slug; fall back to the one that was asked about
    pub fn from_message(raw: CheckSlugMessage, requested: &str) -> Self {
        Self {
            available: raw.available,
            slug: non_empty(raw.slug).unwrap_or_else(|| requested.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_coercion_applies_field_rules() {
        let raw: LinkMessage = serde_json::from_value(json!({
            "id": "lnk_1",
            "userId": "usr_1",
            "slug": "myapp",
            "title": "My App",
            "iosUrl": "https://apps.apple.com/app",
            "androidUrl": "",
            "isActive": true,
            "totalClicks": "12345",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": ""
        }))
        .unwrap();

        let link = Link::from(raw);
        assert_eq!(link.slug, "myapp");
        assert_eq!(link.ios_url.as_deref(), Some("https://apps.apple.com/app"));
        assert_eq!(link.android_url, None);
        assert_eq!(link.web_url, None);
        assert!(link.is_active);
        assert_eq!(link.total_clicks, 12345);
        assert!(link.created_at.is_some());
        assert_eq!(link.updated_at, None);
    }

    #[test]
    fn link_coercion_survives_an_empty_message() {
        let link = Link::from(LinkMessage::default());
        assert_eq!(link.id, "");
        assert_eq!(link.total_clicks, 0);
        assert!(!link.is_active);
        assert_eq!(link.created_at, None);
    }

    #[test]
    fn malformed_list_entry_keeps_its_neighbours() {
        let raw: ListLinksMessage = serde_json::from_value(json!({
            "links": [{"id": "a", "totalClicks": "5"}, null, {"id": "b"}],
            "total": "3"
        }))
        .unwrap();

        let page = LinkPage::from(raw);
        assert_eq!(page.total, 3);
        assert_eq!(page.links.len(), 3);
        assert_eq!(page.links[0].id, "a");
        assert_eq!(page.links[0].total_clicks, 5);
        assert_eq!(page.links[1].id, "");
        assert_eq!(page.links[2].id, "b");
    }

    #[test]
    fn update_request_sends_only_set_fields() {
        let params = UpdateLinkParams {
            title: Some("New".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let request = UpdateLinkRequest {
            id: "lnk_1",
            params: &params,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": "lnk_1", "title": "New", "isActive": false})
        );
    }

    #[test]
    fn slug_falls_back_to_requested() {
        let availability = SlugAvailability::from_message(
            CheckSlugMessage {
                available: true,
                slug: String::new(),
            },
            "promo",
        );
        assert_eq!(availability.slug, "promo");
        assert!(availability.available);
    }
}
