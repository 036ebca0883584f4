//! Inbound payload validation, independent of the HTTP transport

use serde_json::Value;

use crate::alarm::AlarmEvent;
use crate::error::ClientInputError;

/// Validate a raw request body into an [`AlarmEvent`].
///
/// Rejects the body when it is absent, when `device_data` is absent or empty,
/// or when `recipients` is absent or empty. No outbound call is made here.
pub fn validate_request(body: &[u8]) -> Result<AlarmEvent, ClientInputError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ClientInputError::NoData);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ClientInputError::Malformed(e.to_string()))?;

    let fields = match &value {
        Value::Null => return Err(ClientInputError::NoData),
        Value::Object(fields) if fields.is_empty() => return Err(ClientInputError::NoData),
        Value::Object(fields) => fields,
        _ => {
            return Err(ClientInputError::Malformed(
                "expected a JSON object".to_string(),
            ))
        }
    };

    if is_blank(fields.get("device_data")) {
        return Err(ClientInputError::NoDeviceData);
    }
    if is_blank(fields.get("recipients")) {
        return Err(ClientInputError::NoRecipients);
    }

    let event: AlarmEvent =
        serde_json::from_value(value).map_err(|e| ClientInputError::Malformed(e.to_string()))?;

    tracing::debug!(
        "Validated alarm for site '{}': {} reading(s), {} recipient(s)",
        event.site_name,
        event.device_data.len(),
        event.recipients.len()
    );
    Ok(event)
}

fn is_blank(field: Option<&Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
        Some(_) => false,
    }
}
