//! Decoding of model output into structured request/response items.
//!
//! Models answer in one of four shapes: a JSON array keyed by
//! number/text fields, a JSON array whose keys are the literal label
//! strings, a JSON object wrapping an items array, or plain labelled
//! text. Shape detection runs once and picks one decoder; decoders are
//! parameterized by the discovery type's label strings so all four
//! document types share them.

use casedraft_core::DiscoveryKind;
use serde_json::Value;
use tracing::{debug, warn};

use crate::response::number_and_rest;
use crate::{AiError, Result};

/// One request/response pair decoded from model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedItem {
    pub number: String,
    pub text: String,
    pub subparts: Vec<String>,
    pub response: Option<String>,
}

const NUMBER_FIELDS: [&str; 4] = [
    "number",
    "request_number",
    "interrogatory_number",
    "admission_number",
];
const TEXT_FIELDS: [&str; 5] = [
    "text",
    "request_text",
    "interrogatory_text",
    "admission_text",
    "request",
];
const RESPONSE_FIELDS: [&str; 3] = ["response", "response_data", "answer"];
const WRAPPER_FIELDS: [&str; 4] = ["requests", "interrogatories", "admissions", "items"];

/// Decode raw model output into items, whatever shape it arrived in.
///
/// Individual malformed items are logged and skipped; only decoding
/// nothing at all is an error.
pub fn decode_model_output(raw: &str, kind: DiscoveryKind) -> Result<Vec<DecodedItem>> {
    let stripped = strip_code_fence(raw);

    let items = match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Array(array)) => {
            if array.iter().any(|v| is_label_keyed(v, kind)) {
                debug!("Decoding label-keyed JSON array");
                decode_label_keyed(&array, kind)
            } else {
                debug!("Decoding field-keyed JSON array");
                decode_field_keyed(&array)
            }
        }
        Ok(Value::Object(object)) => {
            let wrapped = WRAPPER_FIELDS
                .iter()
                .find_map(|field| object.get(*field).and_then(Value::as_array));
            match wrapped {
                Some(array) => {
                    debug!("Decoding wrapped JSON array");
                    decode_field_keyed(array)
                }
                None => {
                    warn!("JSON object without a recognized items array, treating as text");
                    decode_plain_text(raw, kind)
                }
            }
        }
        _ => {
            debug!("Model output is not JSON, decoding as labelled text");
            decode_plain_text(raw, kind)
        }
    };

    if items.is_empty() {
        return Err(AiError::Decode(
            "no request/response items could be decoded from the model output".to_string(),
        ));
    }
    Ok(items)
}

/// Remove a surrounding markdown code fence, which models frequently
/// wrap JSON in.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
        return body.trim_end().trim_end_matches("```").trim_end();
    }
    trimmed
}

fn is_label_keyed(value: &Value, kind: DiscoveryKind) -> bool {
    value
        .as_object()
        .map(|obj| obj.keys().any(|k| k.contains(kind.request_label())))
        .unwrap_or(false)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field<'a>(object: &'a serde_json::Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// Array of objects with number/text/response fields (or the per-type
/// synonyms), optionally with subparts.
fn decode_field_keyed(array: &[Value]) -> Vec<DecodedItem> {
    let mut items = Vec::new();
    for value in array {
        let Some(object) = value.as_object() else {
            warn!("Skipping non-object array element in model output");
            continue;
        };
        let Some(number) = field(object, &NUMBER_FIELDS).map(value_to_text) else {
            warn!("Skipping model output item without a number field");
            continue;
        };
        let text = field(object, &TEXT_FIELDS).map(value_to_text).unwrap_or_default();
        let response = field(object, &RESPONSE_FIELDS).map(value_to_text);
        let subparts = object
            .get("subparts")
            .and_then(Value::as_array)
            .map(|parts| parts.iter().map(value_to_text).collect())
            .unwrap_or_default();

        items.push(DecodedItem {
            number: number.trim().to_string(),
            text,
            subparts,
            response,
        });
    }
    items
}

/// Array of objects whose keys are the literal label strings, e.g.
/// `{"REQUEST FOR PRODUCTION NO.1": "...", "RESPONSE TO ... NO.1": "..."}`.
fn decode_label_keyed(array: &[Value], kind: DiscoveryKind) -> Vec<DecodedItem> {
    let request_label = kind.request_label();
    let response_label = kind.response_label();

    let mut order: Vec<String> = Vec::new();
    let mut texts: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    let mut responses: std::collections::HashMap<String, String> =
        std::collections::HashMap::new();

    for value in array {
        let Some(object) = value.as_object() else {
            continue;
        };
        for (key, val) in object {
            let is_response = key.contains(response_label);
            let is_request = !is_response && key.contains(request_label);
            if !is_response && !is_request {
                continue;
            }
            let Some((number, _)) = number_and_rest(key) else {
                warn!(key = %key, "Skipping label key without an extractable number");
                continue;
            };
            if !order.contains(&number) {
                order.push(number.clone());
            }
            if is_response {
                responses.insert(number, value_to_text(val));
            } else {
                texts.insert(number, value_to_text(val));
            }
        }
    }

    order
        .into_iter()
        .map(|number| DecodedItem {
            text: texts.remove(&number).unwrap_or_default(),
            response: responses.remove(&number),
            subparts: Vec::new(),
            number,
        })
        .collect()
}

#[derive(PartialEq)]
enum TextState {
    Request,
    Response,
}

/// Plain text in the `"<LABEL> NO.<n>:" ... "RESPONSE TO <LABEL> NO.<n>:"`
/// convention, parsed line by line with a two-state machine.
fn decode_plain_text(raw: &str, kind: DiscoveryKind) -> Vec<DecodedItem> {
    let request_label = kind.request_label();
    let response_label = kind.response_label();

    let mut items: Vec<DecodedItem> = Vec::new();
    let mut state = TextState::Request;

    fn trimmed(items: Vec<DecodedItem>) -> Vec<DecodedItem> {
        items
            .into_iter()
            .map(|mut item| {
                item.text = item.text.trim().to_string();
                item.response = item
                    .response
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty());
                item
            })
            .filter(|item| !item.text.is_empty() || item.response.is_some())
            .collect()
    }

    for line in raw.lines() {
        if line.contains(response_label) {
            let Some((number, rest)) = number_and_rest(line) else {
                warn!(line = %line, "Skipping response label without a number");
                continue;
            };
            if items.last().map(|i| i.number != number).unwrap_or(true) {
                items.push(DecodedItem {
                    number,
                    text: String::new(),
                    subparts: Vec::new(),
                    response: None,
                });
            }
            if let Some(item) = items.last_mut() {
                let mut body = rest.unwrap_or_default();
                if !body.is_empty() {
                    body.push('\n');
                }
                item.response = Some(body);
            }
            state = TextState::Response;
        } else if line.contains(request_label) {
            let Some((number, rest)) = number_and_rest(line) else {
                warn!(line = %line, "Skipping request label without a number");
                continue;
            };
            let mut text = rest.unwrap_or_default();
            if !text.is_empty() {
                text.push('\n');
            }
            items.push(DecodedItem {
                number,
                text,
                subparts: Vec::new(),
                response: None,
            });
            state = TextState::Request;
        } else if let Some(item) = items.last_mut() {
            match state {
                TextState::Request => {
                    item.text.push_str(line);
                    item.text.push('\n');
                }
                TextState::Response => {
                    if let Some(response) = item.response.as_mut() {
                        response.push_str(line);
                        response.push('\n');
                    }
                }
            }
        }
    }

    trimmed(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIND: DiscoveryKind = DiscoveryKind::RequestsForProduction;

    #[test]
    fn test_field_keyed_array() {
        let raw = r#"[
            {"request_number": "1", "request_text": "All contracts.", "response": "Objection."},
            {"request_number": "2", "request_text": "All invoices.", "response_data": "Will comply."}
        ]"#;
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].number, "1");
        assert_eq!(items[1].response.as_deref(), Some("Will comply."));
    }

    #[test]
    fn test_interrogatory_synonyms() {
        let raw = r#"[{"interrogatory_number": 6.4, "interrogatory_text": "State facts.", "answer": "See records."}]"#;
        let items = decode_model_output(raw, DiscoveryKind::FormInterrogatories).unwrap();
        assert_eq!(items[0].number, "6.4");
        assert_eq!(items[0].text, "State facts.");
    }

    #[test]
    fn test_label_keyed_array() {
        let raw = r#"[
            {"REQUEST FOR PRODUCTION NO.1": "All contracts.",
             "RESPONSE TO REQUEST FOR PRODUCTION NO.1": "Objection; will comply."},
            {"REQUEST FOR PRODUCTION NO.2": "All invoices.",
             "RESPONSE TO REQUEST FOR PRODUCTION NO.2": "No responsive documents."}
        ]"#;
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "All contracts.");
        assert_eq!(items[0].response.as_deref(), Some("Objection; will comply."));
        assert_eq!(items[1].number, "2");
    }

    #[test]
    fn test_wrapped_object() {
        let raw = r#"{"requests": [{"number": "1", "text": "All contracts.", "subparts": ["dates", "parties"], "response": "Objection."}]}"#;
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items[0].subparts, vec!["dates", "parties"]);
    }

    #[test]
    fn test_plain_text_convention() {
        let raw = "REQUEST FOR PRODUCTION NO.1: All contracts\nand amendments.\n\
                   RESPONSE TO REQUEST FOR PRODUCTION NO.1: Objection, overbroad.\n\
                   Subject to and without waiving, responsive documents will be produced.\n\
                   REQUEST FOR PRODUCTION NO.2: All invoices.\n\
                   RESPONSE TO REQUEST FOR PRODUCTION NO.2: No responsive documents.";
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "All contracts\nand amendments.");
        assert!(items[0].response.as_deref().unwrap().contains("Subject to and without waiving"));
        assert_eq!(items[1].response.as_deref(), Some("No responsive documents."));
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n[{\"request_number\": \"1\", \"request_text\": \"t\", \"response\": \"r\"}]\n```";
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_malformed_items_skipped_not_fatal() {
        let raw = r#"[
            {"request_number": "1", "request_text": "ok", "response": "ok"},
            {"unrelated": true},
            42
        ]"#;
        let items = decode_model_output(raw, KIND).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_total_failure_is_descriptive_error() {
        let err = decode_model_output("I am sorry, I cannot help with that.", KIND).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
