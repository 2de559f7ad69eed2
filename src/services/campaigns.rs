use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::campaign::{
    Campaign, CampaignIdRequest, CampaignLink, CampaignLinkPage, CampaignLinkQuery,
    CampaignMessage, CampaignPage, CampaignQuery, CampaignStats, CampaignStatsMessage,
    CreateCampaignParams, CreateCampaignRequest, ExportLinksMessage, ExportLinksRequest,
    GenerateLinksMessage, GenerateLinksRequest, GenerateLinksResult, ListCampaignLinksMessage,
    ListCampaignLinksRequest, ListCampaignsMessage, ListCampaignsRequest, Recipient,
    UpdateCampaignParams, UpdateCampaignRequest,
};
use crate::models::{DeleteMessage, IdRequest};
use crate::transport::{Method, Transport};

const SERVICE: &str = "campaigns.v1.CampaignService";

const LIST_CAMPAIGNS: Method = Method::new(SERVICE, "ListCampaigns");
const CREATE_CAMPAIGN: Method = Method::new(SERVICE, "CreateCampaign");
const GET_CAMPAIGN: Method = Method::new(SERVICE, "GetCampaign");
const UPDATE_CAMPAIGN: Method = Method::new(SERVICE, "UpdateCampaign");
const DELETE_CAMPAIGN: Method = Method::new(SERVICE, "DeleteCampaign");
const GENERATE_LINKS: Method = Method::new(SERVICE, "GenerateLinks");
const LIST_CAMPAIGN_LINKS: Method = Method::new(SERVICE, "ListCampaignLinks");
const GET_CAMPAIGN_STATS: Method = Method::new(SERVICE, "GetCampaignStats");
const EXPORT_LINKS: Method = Method::new(SERVICE, "ExportLinks");

/// Campaigns that hand out one trackable link per recipient
#[derive(Clone)]
pub struct CampaignsService {
    transport: Arc<dyn Transport>,
}

impl CampaignsService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: &CampaignQuery) -> Result<CampaignPage, Go2Error> {
        let request = ListCampaignsRequest::from(query);
        invoke(
            &*self.transport,
            LIST_CAMPAIGNS,
            &request,
            |raw: ListCampaignsMessage| CampaignPage::from(raw),
        )
        .await
    }

    pub async fn create(&self, params: &CreateCampaignParams) -> Result<Campaign, Go2Error> {
        let request = CreateCampaignRequest::from(params);
        invoke(&*self.transport, CREATE_CAMPAIGN, &request, |raw: CampaignMessage| {
            Campaign::from(raw)
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Campaign, Go2Error> {
        invoke(&*self.transport, GET_CAMPAIGN, &IdRequest { id }, |raw: CampaignMessage| {
            Campaign::from(raw)
        })
        .await
    }

    pub async fn update(
        &self,
        id: &str,
        params: &UpdateCampaignParams,
    ) -> Result<Campaign, Go2Error> {
        let request = UpdateCampaignRequest::new(id, params);
        invoke(&*self.transport, UPDATE_CAMPAIGN, &request, |raw: CampaignMessage| {
            Campaign::from(raw)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, Go2Error> {
        invoke(
            &*self.transport,
            DELETE_CAMPAIGN,
            &IdRequest { id },
            |raw: DeleteMessage| bool::from(raw),
        )
        .await
    }

    /// Create links for `recipients` in a single request.
    ///
    /// The server accepts up to 100,000 recipients per call; larger batches
    /// are rejected by the server, not split here.
    pub async fn generate_links(
        &self,
        campaign_id: &str,
        recipients: &[Recipient],
    ) -> Result<GenerateLinksResult, Go2Error> {
        let request = GenerateLinksRequest::new(campaign_id, recipients);
        invoke(
            &*self.transport,
            GENERATE_LINKS,
            &request,
            |raw: GenerateLinksMessage| GenerateLinksResult::from(raw),
        )
        .await
    }

    pub async fn list_links(
        &self,
        campaign_id: &str,
        query: &CampaignLinkQuery,
    ) -> Result<CampaignLinkPage, Go2Error> {
        let request = ListCampaignLinksRequest::new(campaign_id, query);
        invoke(
            &*self.transport,
            LIST_CAMPAIGN_LINKS,
            &request,
            |raw: ListCampaignLinksMessage| CampaignLinkPage::from(raw),
        )
        .await
    }

    pub async fn get_stats(&self, campaign_id: &str) -> Result<CampaignStats, Go2Error> {
        invoke(
            &*self.transport,
            GET_CAMPAIGN_STATS,
            &CampaignIdRequest { campaign_id },
            |raw: CampaignStatsMessage| CampaignStats::from(raw),
        )
        .await
    }

    /// Every link of the campaign, unpaginated
    pub async fn export_links(&self, campaign_id: &str) -> Result<Vec<CampaignLink>, Go2Error> {
        let request = ExportLinksRequest {
            campaign_id,
            format: "json",
        };
        invoke(
            &*self.transport,
            EXPORT_LINKS,
            &request,
            |raw: ExportLinksMessage| Vec::<CampaignLink>::from(raw),
        )
        .await
    }
}
