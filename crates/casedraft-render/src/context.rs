//! Render-context assembly.
//!
//! The context keys are burned into the Office template files, so they
//! form a fixed external contract: renaming one here breaks every
//! deployed template.

use casedraft_core::CaseDetails;
use serde_json::{Map, Value};

use crate::richtext::ResponseDocument;

/// Flat mapping merged into a document template, consumed once.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    fields: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the context with the standard case-identification fields.
    pub fn from_case(case: &CaseDetails) -> Self {
        let mut context = Self::new();
        context.set("case_name", case.case_name());
        context.set("case_number", case.case_number());
        context.set("court", case.court());
        context.set("plaintiff", case.plaintiff());
        context.set("defendant", case.defendant());
        context.set("propounding_party", case.propounding_party());
        context.set("responding_party", case.responding_party());
        context
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn set_value(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    /// Attach the rich-formatted response block under the `responses`
    /// template field.
    pub fn set_responses(&mut self, document: &ResponseDocument) {
        self.fields.insert(
            "responses".to_string(),
            serde_json::to_value(document).unwrap_or(Value::Null),
        );
        // Plain-text mirror for templates without rich-text support.
        self.fields.insert(
            "responses_text".to_string(),
            Value::String(document.to_plain_text()),
        );
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}
