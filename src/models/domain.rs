use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{lenient, lenient_vec, parse_timestamp, ClosedEnum, RawEnum, WireEnum};

/// Verification state of a custom domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    #[default]
    Unspecified,
    Pending,
    Verifying,
    Active,
    Failed,
    Unrecognized(RawEnum),
}

impl ClosedEnum for DomainStatus {
    const NAME_PREFIX: &'static str = "DOMAIN_STATUS_";

    fn from_number(number: i64) -> Option<Self> {
        match number {
            0 => Some(DomainStatus::Unspecified),
            1 => Some(DomainStatus::Pending),
            2 => Some(DomainStatus::Verifying),
            3 => Some(DomainStatus::Active),
            4 => Some(DomainStatus::Failed),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "UNSPECIFIED" => Some(DomainStatus::Unspecified),
            "PENDING" => Some(DomainStatus::Pending),
            "VERIFYING" => Some(DomainStatus::Verifying),
            "ACTIVE" => Some(DomainStatus::Active),
            "FAILED" => Some(DomainStatus::Failed),
            _ => None,
        }
    }

    fn unrecognized(raw: RawEnum) -> Self {
        DomainStatus::Unrecognized(raw)
    }
}

/// Certificate provisioning state of a custom domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SslStatus {
    #[default]
    Unspecified,
    Pending,
    Provisioning,
    Active,
    Failed,
    Unrecognized(RawEnum),
}

impl ClosedEnum for SslStatus {
    const NAME_PREFIX: &'static str = "SSL_STATUS_";

    fn from_number(number: i64) -> Option<Self> {
        match number {
            0 => Some(SslStatus::Unspecified),
            1 => Some(SslStatus::Pending),
            2 => Some(SslStatus::Provisioning),
            3 => Some(SslStatus::Active),
            4 => Some(SslStatus::Failed),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "UNSPECIFIED" => Some(SslStatus::Unspecified),
            "PENDING" => Some(SslStatus::Pending),
            "PROVISIONING" => Some(SslStatus::Provisioning),
            "ACTIVE" => Some(SslStatus::Active),
            "FAILED" => Some(SslStatus::Failed),
            _ => None,
        }
    }

    fn unrecognized(raw: RawEnum) -> Self {
        SslStatus::Unrecognized(raw)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainMessage {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient")]
    pub domain: String,
    #[serde(deserialize_with = "lenient")]
    pub status: WireEnum,
    #[serde(deserialize_with = "lenient")]
    pub verification_token: String,
    #[serde(deserialize_with = "lenient")]
    pub verified_at: String,
    #[serde(deserialize_with = "lenient")]
    pub ssl_status: WireEnum,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub updated_at: String,
}

/// A custom domain attached to the account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    pub id: String,
    pub user_id: String,
    pub domain: String,
    pub status: DomainStatus,
    pub verification_token: String,
    /// Set once verification has succeeded
    pub verified_at: Option<DateTime<Utc>>,
    pub ssl_status: SslStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<DomainMessage> for Domain {
    fn from(raw: DomainMessage) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id,
            domain: raw.domain,
            status: raw.status.decode(),
            verification_token: raw.verification_token,
            verified_at: parse_timestamp(&raw.verified_at),
            ssl_status: raw.ssl_status.decode(),
            created_at: parse_timestamp(&raw.created_at),
            updated_at: parse_timestamp(&raw.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListDomainsMessage {
    #[serde(deserialize_with = "lenient_vec")]
    pub domains: Vec<DomainMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DnsRecordMessage {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub record_type: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub value: String,
}

/// A DNS record the owner must publish to verify a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub record_type: String,
    pub name: String,
    pub value: String,
}

impl From<DnsRecordMessage> for DnsRecord {
    fn from(raw: DnsRecordMessage) -> Self {
        Self {
            record_type: raw.record_type,
            name: raw.name,
            value: raw.value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDomainMessage {
    #[serde(deserialize_with = "lenient")]
    pub domain: DomainMessage,
    #[serde(deserialize_with = "lenient_vec")]
    pub dns_records: Vec<DnsRecordMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedDomain {
    pub domain: Domain,
    pub dns_records: Vec<DnsRecord>,
}

impl From<CreateDomainMessage> for CreatedDomain {
    fn from(raw: CreateDomainMessage) -> Self {
        Self {
            domain: Domain::from(raw.domain),
            dns_records: raw.dns_records.into_iter().map(DnsRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDomainRequest<'a> {
    pub domain: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_status_is_unspecified_and_numeric_ssl_status_maps() {
        let raw: DomainMessage = serde_json::from_value(json!({
            "id": "dom_1",
            "domain": "go.example.com",
            "sslStatus": 3
        }))
        .unwrap();

        let domain = Domain::from(raw);
        assert_eq!(domain.status, DomainStatus::Unspecified);
        assert_eq!(domain.ssl_status, SslStatus::Active);
        assert_eq!(domain.verified_at, None);
    }

    #[test]
    fn status_names_are_accepted_with_or_without_prefix() {
        let status: DomainStatus = WireEnum::Name("DOMAIN_STATUS_VERIFYING".into()).decode();
        assert_eq!(status, DomainStatus::Verifying);
        let status: DomainStatus = WireEnum::Name("failed".into()).decode();
        assert_eq!(status, DomainStatus::Failed);
    }

    #[test]
    fn unknown_status_values_pass_through() {
        let status: DomainStatus = WireEnum::Number(9).decode();
        assert_eq!(status, DomainStatus::Unrecognized(RawEnum::Number(9)));

        let ssl: SslStatus = WireEnum::Name("SSL_STATUS_REVOKED".into()).decode();
        assert_eq!(
            ssl,
            SslStatus::Unrecognized(RawEnum::Name("SSL_STATUS_REVOKED".into()))
        );
    }

    #[test]
    fn odd_status_shapes_are_unrecognized_not_unspecified() {
        let raw: DomainMessage =
            serde_json::from_value(json!({"id": "dom_3", "status": true, "sslStatus": 2.5}))
                .unwrap();
        let domain = Domain::from(raw);
        assert_eq!(
            domain.status,
            DomainStatus::Unrecognized(RawEnum::Name("true".into()))
        );
        assert_eq!(
            domain.ssl_status,
            SslStatus::Unrecognized(RawEnum::Name("2.5".into()))
        );

        let raw: DomainMessage = serde_json::from_value(json!({"status": 3.0})).unwrap();
        assert_eq!(Domain::from(raw).status, DomainStatus::Active);
    }

    #[test]
    fn created_domain_keeps_dns_records_in_order() {
        let raw: CreateDomainMessage = serde_json::from_value(json!({
            "domain": {"id": "dom_2", "status": 1, "verifiedAt": "2024-06-01T00:00:00Z"},
            "dnsRecords": [
                {"type": "TXT", "name": "_go2", "value": "token"},
                {"type": "CNAME", "name": "go", "value": "custom.go2.ge"}
            ]
        }))
        .unwrap();

        let created = CreatedDomain::from(raw);
        assert_eq!(created.domain.status, DomainStatus::Pending);
        assert!(created.domain.verified_at.is_some());
        assert_eq!(created.dns_records[0].record_type, "TXT");
        assert_eq!(created.dns_records[1].value, "custom.go2.ge");
    }
}
