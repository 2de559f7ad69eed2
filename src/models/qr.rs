use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::wire::{lenient, non_empty, WireInt};

pub const DEFAULT_QR_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

impl QrFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            QrFormat::Png => "png",
            QrFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for QrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(QrFormat::Png),
            "svg" => Ok(QrFormat::Svg),
            other => Err(format!("unknown QR format '{other}', expected png or svg")),
        }
    }
}

/// Parameters for rendering a QR code. Unset fields fall back to a 256px
/// black-on-white PNG without a logo.
#[derive(Debug, Clone, Default)]
pub struct GenerateQrParams {
    pub link_id: String,
    /// Edge length in pixels; the server accepts 128, 256, 512 and 1024
    pub size: Option<u32>,
    pub format: Option<QrFormat>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub logo_url: Option<String>,
}

impl GenerateQrParams {
    pub fn new(link_id: impl Into<String>) -> Self {
        Self {
            link_id: link_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest<'a> {
    pub link_id: &'a str,
    pub size: u32,
    pub format: QrFormat,
    pub foreground_color: &'a str,
    pub background_color: &'a str,
    pub logo_url: &'a str,
}

impl<'a> From<&'a GenerateQrParams> for GenerateQrRequest<'a> {
    fn from(params: &'a GenerateQrParams) -> Self {
        Self {
            link_id: &params.link_id,
            size: params
                .size
                .filter(|size| *size != 0)
                .unwrap_or(DEFAULT_QR_SIZE),
            format: params.format.unwrap_or_default(),
            foreground_color: params
                .foreground_color
                .as_deref()
                .filter(|color| !color.is_empty())
                .unwrap_or("#000000"),
            background_color: params
                .background_color
                .as_deref()
                .filter(|color| !color.is_empty())
                .unwrap_or("#FFFFFF"),
            logo_url: params.logo_url.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QrMessage {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub size: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub format: String,
}

/// A rendered QR code hosted by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrCode {
    pub url: String,
    pub size: u32,
    pub format: String,
}

impl From<QrMessage> for QrCode {
    fn from(raw: QrMessage) -> Self {
        let size = u32::try_from(raw.size.count())
            .ok()
            .filter(|size| *size != 0)
            .unwrap_or(DEFAULT_QR_SIZE);
        Self {
            url: raw.url,
            size,
            format: non_empty(raw.format).unwrap_or_else(|| QrFormat::Png.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_fills_in_defaults() {
        let params = GenerateQrParams {
            size: Some(0),
            ..GenerateQrParams::new("lnk_1")
        };
        assert_eq!(
            serde_json::to_value(GenerateQrRequest::from(&params)).unwrap(),
            json!({
                "linkId": "lnk_1",
                "size": 256,
                "format": "png",
                "foregroundColor": "#000000",
                "backgroundColor": "#FFFFFF",
                "logoUrl": ""
            })
        );
    }

    #[test]
    fn request_keeps_explicit_values() {
        let params = GenerateQrParams {
            size: Some(512),
            format: Some(QrFormat::Svg),
            foreground_color: Some("#112233".to_string()),
            ..GenerateQrParams::new("lnk_2")
        };
        let request = GenerateQrRequest::from(&params);
        assert_eq!(request.size, 512);
        assert_eq!(request.format, QrFormat::Svg);
        assert_eq!(request.foreground_color, "#112233");
        assert_eq!(request.background_color, "#FFFFFF");
    }

    #[test]
    fn response_defaults_size_and_format() {
        let raw: QrMessage =
            serde_json::from_value(json!({"url": "https://cdn.go2.ge/qr/1.png", "size": 0}))
                .unwrap();
        let qr = QrCode::from(raw);
        assert_eq!(qr.url, "https://cdn.go2.ge/qr/1.png");
        assert_eq!(qr.size, 256);
        assert_eq!(qr.format, "png");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("SVG".parse::<QrFormat>().unwrap(), QrFormat::Svg);
        assert!("gif".parse::<QrFormat>().is_err());
    }
}
