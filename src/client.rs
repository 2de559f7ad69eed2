use anyhow::Context;
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::ConfigError;
use crate::services::{
    AnalyticsService, CampaignsService, DomainsService, IntegrationsService, LinksService,
    QrService,
};
use crate::transport::{HttpTransport, Transport};

/// Entry point of the SDK.
///
/// One connection is opened at construction and shared by every service. It
/// stays open until [`close`](Self::close) is called.
///
/// ```no_run
/// # async fn run() -> anyhow::Result<()> {
/// use go2::{ClientOptions, Go2Client, LinkQuery};
///
/// let client = Go2Client::new(ClientOptions::new("my-api-key"))?;
/// let page = client.links().list(&LinkQuery::default()).await?;
/// println!("{} links", page.total);
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Go2Client {
    transport: Arc<dyn Transport>,
    links: LinksService,
    analytics: AnalyticsService,
    integrations: IntegrationsService,
    domains: DomainsService,
    qr: QrService,
    campaigns: CampaignsService,
}

impl Go2Client {
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&options)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Build a client from `GO2_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let options = ClientOptions::from_env()?;
        Self::new(options).context("Failed to create Go2 client")
    }

    /// Build a client on top of an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            links: LinksService::new(transport.clone()),
            analytics: AnalyticsService::new(transport.clone()),
            integrations: IntegrationsService::new(transport.clone()),
            domains: DomainsService::new(transport.clone()),
            qr: QrService::new(transport.clone()),
            campaigns: CampaignsService::new(transport.clone()),
            transport,
        }
    }

    pub fn links(&self) -> &LinksService {
        &self.links
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    pub fn integrations(&self) -> &IntegrationsService {
        &self.integrations
    }

    pub fn domains(&self) -> &DomainsService {
        &self.domains
    }

    pub fn qr(&self) -> &QrService {
        &self.qr
    }

    pub fn campaigns(&self) -> &CampaignsService {
        &self.campaigns
    }

    /// Close the shared connection. Safe to call more than once.
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}
