use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::domain::{
    CreateDomainMessage, CreateDomainRequest, CreatedDomain, Domain, DomainMessage,
    ListDomainsMessage,
};
use crate::models::{DeleteMessage, IdRequest};
use crate::transport::{Method, Transport};

const SERVICE: &str = "domains.v1.DomainService";

const LIST_DOMAINS: Method = Method::new(SERVICE, "ListDomains");
const CREATE_DOMAIN: Method = Method::new(SERVICE, "CreateDomain");
const GET_DOMAIN: Method = Method::new(SERVICE, "GetDomain");
const VERIFY_DOMAIN: Method = Method::new(SERVICE, "VerifyDomain");
const DELETE_DOMAIN: Method = Method::new(SERVICE, "DeleteDomain");

/// Custom domain management
#[derive(Clone)]
pub struct DomainsService {
    transport: Arc<dyn Transport>,
}

impl DomainsService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Domain>, Go2Error> {
        invoke(
            &*self.transport,
            LIST_DOMAINS,
            &serde_json::Map::new(),
            |raw: ListDomainsMessage| raw.domains.into_iter().map(Domain::from).collect(),
        )
        .await
    }

    /// Register a domain. The returned DNS records must be published before
    /// [`verify`](Self::verify) can succeed.
    pub async fn create(&self, domain: &str) -> Result<CreatedDomain, Go2Error> {
        invoke(
            &*self.transport,
            CREATE_DOMAIN,
            &CreateDomainRequest { domain },
            |raw: CreateDomainMessage| CreatedDomain::from(raw),
        )
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Domain, Go2Error> {
        invoke(&*self.transport, GET_DOMAIN, &IdRequest { id }, |raw: DomainMessage| {
            Domain::from(raw)
        })
        .await
    }

    pub async fn verify(&self, id: &str) -> Result<Domain, Go2Error> {
        invoke(&*self.transport, VERIFY_DOMAIN, &IdRequest { id }, |raw: DomainMessage| {
            Domain::from(raw)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, Go2Error> {
        invoke(&*self.transport, DELETE_DOMAIN, &IdRequest { id }, |raw: DeleteMessage| {
            bool::from(raw)
        })
        .await
    }
}
