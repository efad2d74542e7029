use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::store::{
    FIELD_ADDRESS, FIELD_BODY, RECEIVED_TYPE_CODE, UNKNOWN_CONTACT_NAME,
};
use crate::errors::IngestionError;
use crate::utils::{normalize_inline_whitespace, normalize_partner_id};

pub use crate::types::{DisplayName, PartnerId, ReadableDate, TypeCode};

/// One archive element before validation. Every field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Phone-style (or handle) address of the other party.
    pub address: Option<String>,
    /// Human-readable timestamp.
    pub readable_date: Option<ReadableDate>,
    /// Direction code (`1` received, anything else sent).
    #[serde(rename = "type")]
    pub type_code: Option<TypeCode>,
    /// Message text.
    pub body: Option<String>,
    /// Contact name attached by the backup tool.
    pub contact_name: Option<String>,
    /// Epoch milliseconds, when the backup tool records them.
    pub date: Option<String>,
}

impl RawEntry {
    /// Convenience constructor for a well-formed entry.
    pub fn new(address: &str, type_code: &str, body: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            type_code: Some(type_code.to_string()),
            body: Some(body.to_string()),
            ..Self::default()
        }
    }

    /// Attach a contact name.
    pub fn with_contact_name(mut self, name: &str) -> Self {
        self.contact_name = Some(name.to_string());
        self
    }

    /// Attach a readable timestamp.
    pub fn with_readable_date(mut self, readable_date: &str) -> Self {
        self.readable_date = Some(readable_date.to_string());
        self
    }
}

/// Message direction relative to the archive owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Written by the partner.
    Received,
    /// Written by the archive owner.
    Sent,
}

impl Direction {
    /// `"1"` is received; every other code (including unknown sentinels) is sent.
    pub fn from_type_code(code: &str) -> Self {
        if code.trim() == RECEIVED_TYPE_CODE {
            Direction::Received
        } else {
            Direction::Sent
        }
    }
}

/// Validated, immutable message record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Normalized partner identity.
    pub partner_id: PartnerId,
    /// Opaque readable timestamp (empty when the archive had none).
    pub timestamp: ReadableDate,
    /// Instant parsed from the archive's epoch-millisecond `date`, when present.
    pub sent_at: Option<DateTime<Utc>>,
    /// Derived direction.
    pub direction: Direction,
    /// Direction code exactly as read; empty when the archive had none.
    pub type_code: TypeCode,
    /// Message text, possibly empty.
    pub body: String,
    /// Contact name, or the raw address when the archive had no usable name.
    pub display_name: DisplayName,
}

impl TryFrom<RawEntry> for MessageRecord {
    type Error = IngestionError;

    fn try_from(entry: RawEntry) -> Result<Self, Self::Error> {
        let address = entry
            .address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .ok_or(IngestionError::MissingField(FIELD_ADDRESS))?;
        let body = entry.body.ok_or(IngestionError::MissingField(FIELD_BODY))?;
        let type_code = entry.type_code.unwrap_or_default();
        let display_name = entry
            .contact_name
            .map(normalize_inline_whitespace)
            .filter(|name| !name.is_empty() && name != UNKNOWN_CONTACT_NAME)
            .unwrap_or_else(|| address.clone());
        let sent_at = entry
            .date
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        Ok(Self {
            partner_id: normalize_partner_id(&address),
            timestamp: entry.readable_date.unwrap_or_default(),
            sent_at,
            direction: Direction::from_type_code(&type_code),
            type_code,
            body,
            display_name,
        })
    }
}

/// A training pair emitted by the class balancer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    /// Message body.
    pub text: String,
    /// Partner that wrote (or received) it.
    pub partner_id: PartnerId,
}
