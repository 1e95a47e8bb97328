//! Template renderer boundary.

use std::path::Path;
use tracing::debug;

use crate::context::RenderContext;
use crate::{RenderError, Result};

/// Merges a context into a document template and returns the bytes.
///
/// Production deployments plug in an Office Open XML implementation; the
/// pipeline only depends on this seam.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_path: &Path, context: &RenderContext) -> Result<Vec<u8>>;
}

/// Plain-text renderer substituting `{{key}}` placeholders.
///
/// The default implementation for tests and local development; string
/// values substitute directly, the rich `responses` field substitutes as
/// its plain-text form.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextTemplateRenderer;

impl TextTemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TextTemplateRenderer {
    fn render(&self, template_path: &Path, context: &RenderContext) -> Result<Vec<u8>> {
        let template = std::fs::read_to_string(template_path).map_err(|err| {
            RenderError::RenderingFailed(format!(
                "could not read template {}: {}",
                template_path.display(),
                err
            ))
        })?;

        let mut output = template;
        for (key, value) in context.as_map() {
            let placeholder = format!("{{{{{}}}}}", key);
            if !output.contains(&placeholder) {
                continue;
            }
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            output = output.replace(&placeholder, &replacement);
        }

        debug!(
            template = %template_path.display(),
            bytes = output.len(),
            "Rendered template"
        );
        Ok(output.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedraft_core::CaseDetails;
    use std::io::Write;

    #[test]
    fn test_placeholder_substitution() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Case: {{{{case_name}}}} ({{{{case_number}}}})").unwrap();

        let case = CaseDetails {
            case_name: Some("Doe v. Acme".to_string()),
            case_number: Some("23STCV01234".to_string()),
            ..Default::default()
        };
        let context = RenderContext::from_case(&case);
        let bytes = TextTemplateRenderer::new().render(file.path(), &context).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Case: Doe v. Acme (23STCV01234)"
        );
    }

    #[test]
    fn test_missing_template_is_rendering_error() {
        let context = RenderContext::new();
        let err = TextTemplateRenderer::new()
            .render(Path::new("/nonexistent/template.txt"), &context)
            .unwrap_err();
        assert!(matches!(err, RenderError::RenderingFailed(_)));
    }
}
