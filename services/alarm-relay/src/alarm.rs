//! Alarm payload types received on `/send_alarm`

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder rendered for absent fields
pub const NOT_AVAILABLE: &str = "N/A";

/// A JSON value that may arrive either as a string or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// True for `""` and for a numeric zero
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

/// Conveyor lane of a reading, usually `["A", "1"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lane {
    Parts(Vec<Scalar>),
    Raw(Scalar),
}

/// One alarm event within a batched payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmReading {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lane: Option<Lane>,
    #[serde(default)]
    pub value: Option<serde_json::Number>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub send_date: Option<String>,
    #[serde(default)]
    pub location: Option<Scalar>,
}

impl AlarmReading {
    /// True when `value` is below zero
    pub fn is_negative(&self) -> bool {
        self.value
            .as_ref()
            .and_then(serde_json::Number::as_f64)
            .is_some_and(|v| v < 0.0)
    }
}

/// A chat recipient of alarm notifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chat_id: Option<Scalar>,
}

impl Recipient {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// The chat address, if present and non-empty
    pub fn chat_id(&self) -> Option<String> {
        self.chat_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
    }
}

/// The inbound request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEvent {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub device_data: Vec<AlarmReading>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

fn default_site_name() -> String {
    NOT_AVAILABLE.to_string()
}

/// Accept `device_data` as an array or as a single reading object
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<AlarmReading>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<AlarmReading>),
        One(AlarmReading),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(readings) => readings,
        OneOrMany::One(reading) => vec![reading],
    })
}
