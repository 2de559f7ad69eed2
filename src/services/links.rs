use serde::Serialize;
use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::link::{
    CheckSlugMessage, CreateLinkParams, Link, LinkMessage, LinkPage, LinkQuery, ListLinksMessage,
    ListLinksRequest, SlugAvailability, UpdateLinkParams, UpdateLinkRequest,
};
use crate::models::{DeleteMessage, IdRequest};
use crate::transport::{Method, Transport};

const SERVICE: &str = "links.v1.LinkService";

const LIST_LINKS: Method = Method::new(SERVICE, "ListLinks");
const CREATE_LINK: Method = Method::new(SERVICE, "CreateLink");
const GET_LINK: Method = Method::new(SERVICE, "GetLink");
const UPDATE_LINK: Method = Method::new(SERVICE, "UpdateLink");
const DELETE_LINK: Method = Method::new(SERVICE, "DeleteLink");
const CHECK_SLUG: Method = Method::new(SERVICE, "CheckSlug");

#[derive(Serialize)]
struct CheckSlugRequest<'a> {
    slug: &'a str,
}

/// Smart link management
#[derive(Clone)]
pub struct LinksService {
    transport: Arc<dyn Transport>,
}

impl LinksService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: &LinkQuery) -> Result<LinkPage, Go2Error> {
        let request = ListLinksRequest::from(query);
        invoke(&*self.transport, LIST_LINKS, &request, |raw: ListLinksMessage| {
            LinkPage::from(raw)
        })
        .await
    }

    pub async fn create(&self, params: &CreateLinkParams) -> Result<Link, Go2Error> {
        invoke(&*self.transport, CREATE_LINK, params, |raw: LinkMessage| {
            Link::from(raw)
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Link, Go2Error> {
        invoke(&*self.transport, GET_LINK, &IdRequest { id }, |raw: LinkMessage| {
            Link::from(raw)
        })
        .await
    }

    pub async fn update(&self, id: &str, params: &UpdateLinkParams) -> Result<Link, Go2Error> {
        let request = UpdateLinkRequest { id, params };
        invoke(&*self.transport, UPDATE_LINK, &request, |raw: LinkMessage| {
            Link::from(raw)
        })
        .await
    }

    /// Resolves to the server's `success` flag
    pub async fn delete(&self, id: &str) -> Result<bool, Go2Error> {
        invoke(&*self.transport, DELETE_LINK, &IdRequest { id }, |raw: DeleteMessage| {
            bool::from(raw)
        })
        .await
    }

    pub async fn check_slug(&self, slug: &str) -> Result<SlugAvailability, Go2Error> {
        invoke(
            &*self.transport,
            CHECK_SLUG,
            &CheckSlugRequest { slug },
            |raw: CheckSlugMessage| SlugAvailability::from_message(raw, slug),
        )
        .await
    }
}
