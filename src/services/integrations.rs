use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::integration::{
    CreateIntegrationParams, CreateIntegrationRequest, Integration, IntegrationCatalog,
    IntegrationMessage, IntegrationTestResult, IntegrationTypesMessage, ListIntegrationsMessage,
    TestIntegrationMessage, UpdateIntegrationParams, UpdateIntegrationRequest,
};
use crate::models::{DeleteMessage, IdRequest};
use crate::transport::{Method, Transport};

const SERVICE: &str = "integrations.v1.IntegrationService";

const LIST_INTEGRATIONS: Method = Method::new(SERVICE, "ListIntegrations");
const CREATE_INTEGRATION: Method = Method::new(SERVICE, "CreateIntegration");
const GET_INTEGRATION: Method = Method::new(SERVICE, "GetIntegration");
const UPDATE_INTEGRATION: Method = Method::new(SERVICE, "UpdateIntegration");
const DELETE_INTEGRATION: Method = Method::new(SERVICE, "DeleteIntegration");
const TEST_INTEGRATION: Method = Method::new(SERVICE, "TestIntegration");
const GET_INTEGRATION_TYPES: Method = Method::new(SERVICE, "GetIntegrationTypes");

/// Notification integrations fired on link events
#[derive(Clone)]
pub struct IntegrationsService {
    transport: Arc<dyn Transport>,
}

impl IntegrationsService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Integration>, Go2Error> {
        invoke(
            &*self.transport,
            LIST_INTEGRATIONS,
            &serde_json::Map::new(),
            |raw: ListIntegrationsMessage| {
                raw.integrations.into_iter().map(Integration::from).collect()
            },
        )
        .await
    }

    pub async fn create(&self, params: &CreateIntegrationParams) -> Result<Integration, Go2Error> {
        let request = CreateIntegrationRequest::from(params);
        invoke(
            &*self.transport,
            CREATE_INTEGRATION,
            &request,
            |raw: IntegrationMessage| Integration::from(raw),
        )
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Integration, Go2Error> {
        invoke(
            &*self.transport,
            GET_INTEGRATION,
            &IdRequest { id },
            |raw: IntegrationMessage| Integration::from(raw),
        )
        .await
    }

    /// Only the fields set in `params` are sent
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateIntegrationParams,
    ) -> Result<Integration, Go2Error> {
        let request = UpdateIntegrationRequest::new(id, params);
        invoke(
            &*self.transport,
            UPDATE_INTEGRATION,
            &request,
            |raw: IntegrationMessage| Integration::from(raw),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, Go2Error> {
        invoke(
            &*self.transport,
            DELETE_INTEGRATION,
            &IdRequest { id },
            |raw: DeleteMessage| bool::from(raw),
        )
        .await
    }

    /// Ask the server to send a test notification through the integration
    pub async fn test(&self, id: &str) -> Result<IntegrationTestResult, Go2Error> {
        invoke(
            &*self.transport,
            TEST_INTEGRATION,
            &IdRequest { id },
            |raw: TestIntegrationMessage| IntegrationTestResult::from(raw),
        )
        .await
    }

    pub async fn get_types(&self) -> Result<IntegrationCatalog, Go2Error> {
        invoke(
            &*self.transport,
            GET_INTEGRATION_TYPES,
            &serde_json::Map::new(),
            |raw: IntegrationTypesMessage| IntegrationCatalog::from(raw),
        )
        .await
    }
}
