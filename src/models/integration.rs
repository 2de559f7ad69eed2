//! Third-party notification integrations (Slack, Discord, Telegram, ...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{
    lenient, lenient_vec, non_empty, parse_timestamp, ClosedEnum, RawEnum, WireEnum, WireInt,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    #[default]
    Unspecified,
    Slack,
    Discord,
    Telegram,
    Segment,
    Zapier,
    Unrecognized(RawEnum),
}

impl IntegrationType {
    /// The tag sent in request messages
    pub fn to_raw(&self) -> RawEnum {
        match self {
            IntegrationType::Unspecified => RawEnum::Number(0),
            IntegrationType::Slack => RawEnum::Number(1),
            IntegrationType::Discord => RawEnum::Number(2),
            IntegrationType::Telegram => RawEnum::Number(3),
            IntegrationType::Segment => RawEnum::Number(4),
            IntegrationType::Zapier => RawEnum::Number(5),
            IntegrationType::Unrecognized(raw) => raw.clone(),
        }
    }
}

impl ClosedEnum for IntegrationType {
    const NAME_PREFIX: &'static str = "INTEGRATION_TYPE_";

    fn from_number(number: i64) -> Option<Self> {
        match number {
            0 => Some(IntegrationType::Unspecified),
            1 => Some(IntegrationType::Slack),
            2 => Some(IntegrationType::Discord),
            3 => Some(IntegrationType::Telegram),
            4 => Some(IntegrationType::Segment),
            5 => Some(IntegrationType::Zapier),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "UNSPECIFIED" => Some(IntegrationType::Unspecified),
            "SLACK" => Some(IntegrationType::Slack),
            "DISCORD" => Some(IntegrationType::Discord),
            "TELEGRAM" => Some(IntegrationType::Telegram),
            "SEGMENT" => Some(IntegrationType::Segment),
            "ZAPIER" => Some(IntegrationType::Zapier),
            _ => None,
        }
    }

    fn unrecognized(raw: RawEnum) -> Self {
        IntegrationType::Unrecognized(raw)
    }
}

/// Flat configuration block shared by every integration type on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationConfigMessage {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub webhook_url: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub bot_token: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub chat_id: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub write_key: String,
}

/// Settings of an integration whose type this SDK does not model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawIntegrationSettings {
    pub webhook_url: Option<String>,
    pub channel: Option<String>,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub write_key: Option<String>,
}

/// Type-specific integration settings.
///
/// The variant determines the integration type, so a config can never
/// disagree with the type it is sent under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationConfig {
    Slack {
        webhook_url: String,
        channel: Option<String>,
    },
    Discord {
        webhook_url: String,
    },
    Telegram {
        bot_token: String,
        chat_id: String,
    },
    Segment {
        write_key: String,
    },
    Zapier {
        webhook_url: String,
    },
    Other {
        kind: IntegrationType,
        settings: RawIntegrationSettings,
    },
}

impl IntegrationConfig {
    pub fn integration_type(&self) -> IntegrationType {
        match self {
            IntegrationConfig::Slack { .. } => IntegrationType::Slack,
            IntegrationConfig::Discord { .. } => IntegrationType::Discord,
            IntegrationConfig::Telegram { .. } => IntegrationType::Telegram,
            IntegrationConfig::Segment { .. } => IntegrationType::Segment,
            IntegrationConfig::Zapier { .. } => IntegrationType::Zapier,
            IntegrationConfig::Other { kind, .. } => kind.clone(),
        }
    }

    /// Pick the fields relevant to `kind` out of the flat wire block
    pub fn from_message(kind: IntegrationType, raw: IntegrationConfigMessage) -> Self {
        match kind {
            IntegrationType::Slack => IntegrationConfig::Slack {
                webhook_url: raw.webhook_url,
                channel: non_empty(raw.channel),
            },
            IntegrationType::Discord => IntegrationConfig::Discord {
                webhook_url: raw.webhook_url,
            },
            IntegrationType::Telegram => IntegrationConfig::Telegram {
                bot_token: raw.bot_token,
                chat_id: raw.chat_id,
            },
            IntegrationType::Segment => IntegrationConfig::Segment {
                write_key: raw.write_key,
            },
            IntegrationType::Zapier => IntegrationConfig::Zapier {
                webhook_url: raw.webhook_url,
            },
            kind => IntegrationConfig::Other {
                kind,
                settings: RawIntegrationSettings {
                    webhook_url: non_empty(raw.webhook_url),
                    channel: non_empty(raw.channel),
                    bot_token: non_empty(raw.bot_token),
                    chat_id: non_empty(raw.chat_id),
                    write_key: non_empty(raw.write_key),
                },
            },
        }
    }

    pub fn to_message(&self) -> IntegrationConfigMessage {
        match self {
            IntegrationConfig::Slack {
                webhook_url,
                channel,
            } => IntegrationConfigMessage {
                webhook_url: webhook_url.clone(),
                channel: channel.clone().unwrap_or_default(),
                ..Default::default()
            },
            IntegrationConfig::Discord { webhook_url } | IntegrationConfig::Zapier { webhook_url } => {
                IntegrationConfigMessage {
                    webhook_url: webhook_url.clone(),
                    ..Default::default()
                }
            }
            IntegrationConfig::Telegram { bot_token, chat_id } => IntegrationConfigMessage {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
                ..Default::default()
            },
            IntegrationConfig::Segment { write_key } => IntegrationConfigMessage {
                write_key: write_key.clone(),
                ..Default::default()
            },
            IntegrationConfig::Other { settings, .. } => IntegrationConfigMessage {
                webhook_url: settings.webhook_url.clone().unwrap_or_default(),
                channel: settings.channel.clone().unwrap_or_default(),
                bot_token: settings.bot_token.clone().unwrap_or_default(),
                chat_id: settings.chat_id.clone().unwrap_or_default(),
                write_key: settings.write_key.clone().unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationMessage {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub user_id: String,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub integration_type: WireEnum,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub config: IntegrationConfigMessage,
    #[serde(deserialize_with = "lenient_vec")]
    pub events: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_active: bool,
    #[serde(deserialize_with = "lenient")]
    pub last_triggered_at: String,
    #[serde(deserialize_with = "lenient")]
    pub trigger_count: WireInt,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Integration {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub config: IntegrationConfig,
    /// Subscribed event names, e.g. `link.clicked`
    pub events: Vec<String>,
    pub is_active: bool,
    pub last_triggered_at: Option<DateTime<Utc>>,
    pub trigger_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Integration {
    pub fn integration_type(&self) -> IntegrationType {
        self.config.integration_type()
    }
}

impl From<IntegrationMessage> for Integration {
    fn from(raw: IntegrationMessage) -> Self {
        let kind: IntegrationType = raw.integration_type.decode();
        Self {
            id: raw.id,
            user_id: raw.user_id,
            name: raw.name,
            config: IntegrationConfig::from_message(kind, raw.config),
            events: raw.events,
            is_active: raw.is_active,
            last_triggered_at: parse_timestamp(&raw.last_triggered_at),
            trigger_count: raw.trigger_count.count(),
            created_at: parse_timestamp(&raw.created_at),
            updated_at: parse_timestamp(&raw.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListIntegrationsMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub integrations: Vec<IntegrationMessage>,
}

#[derive(Debug, Clone)]
pub struct CreateIntegrationParams {
    pub name: String,
    pub config: IntegrationConfig,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateIntegrationRequest<'a> {
    #[serde(rename = "type")]
    pub integration_type: RawEnum,
    pub name: &'a str,
    pub config: IntegrationConfigMessage,
    pub events: &'a [String],
}

impl<'a> From<&'a CreateIntegrationParams> for CreateIntegrationRequest<'a> {
    fn from(params: &'a CreateIntegrationParams) -> Self {
        Self {
            integration_type: params.config.integration_type().to_raw(),
            name: &params.name,
            config: params.config.to_message(),
            events: &params.events,
        }
    }
}

/// Fields to change on an integration; unset fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateIntegrationParams {
    pub name: Option<String>,
    pub config: Option<IntegrationConfig>,
    pub events: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntegrationRequest<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<IntegrationConfigMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl<'a> UpdateIntegrationRequest<'a> {
    pub fn new(id: &'a str, params: &'a UpdateIntegrationParams) -> Self {
        Self {
            id,
            name: params.name.as_deref(),
            config: params.config.as_ref().map(IntegrationConfig::to_message),
            events: params.events.as_deref(),
            is_active: params.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestIntegrationMessage {
    #[serde(deserialize_with = "lenient")]
    pub success: bool,
    #[serde(deserialize_with = "lenient")]
    pub message: String,
}

/// Outcome of sending a test notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationTestResult {
    pub success: bool,
    pub message: String,
}

impl From<TestIntegrationMessage> for IntegrationTestResult {
    fn from(raw: TestIntegrationMessage) -> Self {
        Self {
            success: raw.success,
            message: raw.message,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFieldMessage {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub field_type: String,
    #[serde(deserialize_with = "lenient")]
    pub required: bool,
    #[serde(deserialize_with = "lenient")]
    pub placeholder: String,
    #[serde(deserialize_with = "lenient")]
    pub help_text: String,
}

/// Describes one input of an integration's setup form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
    pub placeholder: String,
    pub help_text: String,
}

impl From<ConfigFieldMessage> for ConfigField {
    fn from(raw: ConfigFieldMessage) -> Self {
        Self {
            name: raw.name,
            label: raw.label,
            field_type: raw.field_type,
            required: raw.required,
            placeholder: raw.placeholder,
            help_text: raw.help_text,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationTypeInfoMessage {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub integration_type: WireEnum,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub icon: String,
    #[serde(deserialize_with = "lenient")]
    pub available: bool,
    #[serde(deserialize_with = "lenient_vec")]
    pub config_fields: Vec<ConfigFieldMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationTypeInfo {
    pub integration_type: IntegrationType,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub available: bool,
    pub config_fields: Vec<ConfigField>,
}

impl From<IntegrationTypeInfoMessage> for IntegrationTypeInfo {
    fn from(raw: IntegrationTypeInfoMessage) -> Self {
        Self {
            integration_type: raw.integration_type.decode(),
            name: raw.name,
            description: raw.description,
            icon: raw.icon,
            available: raw.available,
            config_fields: raw.config_fields.into_iter().map(ConfigField::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntegrationTypesMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub types: Vec<IntegrationTypeInfoMessage>,
    #[serde(deserialize_with = "lenient_vec")]
    pub events: Vec<String>,
}

/// Available integration types and the event names they can subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationCatalog {
    pub types: Vec<IntegrationTypeInfo>,
    pub events: Vec<String>,
}

impl From<IntegrationTypesMessage> for IntegrationCatalog {
    fn from(raw: IntegrationTypesMessage) -> Self {
        Self {
            types: raw.types.into_iter().map(IntegrationTypeInfo::from).collect(),
            events: raw.events,
        }
    }
}
