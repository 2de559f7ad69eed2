//! One wrapper per remote service. Every operation is a single unary call
//! through [`invoke`], followed by coercion of the response message.

mod analytics;
mod campaigns;
mod domains;
mod integrations;
mod links;
mod qr;

pub use analytics::AnalyticsService;
pub use campaigns::CampaignsService;
pub use domains::DomainsService;
pub use integrations::IntegrationsService;
pub use links::LinksService;
pub use qr::QrService;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Go2Error;
use crate::transport::{Code, Method, Status, Transport};

/// Encode `request`, issue one call, decode the response message and coerce it.
///
/// Every failure, including an undecodable response, comes back as a
/// normalized [`Go2Error`].
pub(crate) async fn invoke<Req, Msg, Out, F>(
    transport: &dyn Transport,
    method: Method,
    request: &Req,
    coerce: F,
) -> Result<Out, Go2Error>
where
    Req: Serialize + ?Sized,
    Msg: DeserializeOwned,
    F: FnOnce(Msg) -> Out,
{
    let request = serde_json::to_value(request).map_err(|e| {
        Status::new(
            Code::INTERNAL,
            format!("failed to encode {method} request: {e}"),
        )
    })?;

    let response = transport.unary(method, request).await?;
    let message = decode_message::<Msg>(method, response)?;
    Ok(coerce(message))
}

fn decode_message<Msg: DeserializeOwned>(method: Method, response: Value) -> Result<Msg, Status> {
    let response = match response {
        Value::Null => Value::Object(Default::default()),
        Value::Object(_) => response,
        _ => {
            return Err(Status::new(
                Code::INTERNAL,
                format!("malformed {method} response: expected a message object"),
            ))
        }
    };

    serde_json::from_value(response).map_err(|e| {
        Status::new(
            Code::INTERNAL,
            format!("malformed {method} response: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeleteMessage;
    use serde_json::json;

    const DELETE: Method = Method::new("test.v1.TestService", "Delete");

    #[test]
    fn null_response_decodes_as_empty_message() {
        let message: DeleteMessage = decode_message(DELETE, Value::Null).unwrap();
        assert!(!message.success);
    }

    #[test]
    fn non_object_response_is_internal() {
        let status = decode_message::<DeleteMessage>(DELETE, json!([1, 2])).unwrap_err();
        assert_eq!(status.code(), Code::INTERNAL);
        assert!(status.message().contains("malformed test.v1.TestService/Delete response"));
    }
}
