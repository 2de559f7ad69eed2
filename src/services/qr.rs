use std::sync::Arc;

use super::invoke;
use crate::error::Go2Error;
use crate::models::qr::{GenerateQrParams, GenerateQrRequest, QrCode, QrMessage};
use crate::transport::{Method, Transport};

const GENERATE_QR: Method = Method::new("qr.v1.QRService", "GenerateQR");

#[derive(Clone)]
pub struct QrService {
    transport: Arc<dyn Transport>,
}

impl QrService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn generate(&self, params: &GenerateQrParams) -> Result<QrCode, Go2Error> {
        let request = GenerateQrRequest::from(params);
        invoke(&*self.transport, GENERATE_QR, &request, |raw: QrMessage| {
            QrCode::from(raw)
        })
        .await
    }
}
