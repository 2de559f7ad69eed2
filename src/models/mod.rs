//! Wire messages, domain records and request payloads.
//!
//! Each entity has a `*Message` type mirroring the loose wire shape and a
//! domain type built from it with `From`. Request payloads borrow from the
//! caller's parameters and apply the documented defaults.

pub mod analytics;
pub mod campaign;
pub mod domain;
pub mod integration;
pub mod link;
pub mod qr;

use serde::{Deserialize, Serialize};

use crate::wire::lenient;

pub use analytics::{CountryStats, Period, PlatformStats, ReferrerStats, Stats, TimeseriesPoint};
pub use campaign::{
    Campaign, CampaignLink, CampaignLinkPage, CampaignLinkQuery, CampaignPage, CampaignQuery,
    CampaignStats, CampaignStatus, CreateCampaignParams, GenerateLinksResult, Recipient,
    UpdateCampaignParams,
};
pub use domain::{CreatedDomain, DnsRecord, Domain, DomainStatus, SslStatus};
pub use integration::{
    ConfigField, CreateIntegrationParams, Integration, IntegrationCatalog, IntegrationConfig,
    IntegrationTestResult, IntegrationType, IntegrationTypeInfo, RawIntegrationSettings,
    UpdateIntegrationParams,
};
pub use link::{CreateLinkParams, Link, LinkPage, LinkQuery, SlugAvailability, UpdateLinkParams};
pub use qr::{GenerateQrParams, QrCode, QrFormat};

/// Request addressing a single resource by id
#[derive(Debug, Clone, Serialize)]
pub struct IdRequest<'a> {
    pub id: &'a str,
}

/// Response of every delete operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteMessage {
    #[serde(deserialize_with = "lenient")]
    pub success: bool,
}

impl From<DeleteMessage> for bool {
    fn from(raw: DeleteMessage) -> Self {
        raw.success
    }
}
