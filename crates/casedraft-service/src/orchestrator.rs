//! Pipeline orchestration.
//!
//! `DiscoveryService` sequences the two-step workflow: `respond` turns an
//! uploaded document into a [`ParseResult`] with drafted responses, and
//! `render` turns a merged context into document bytes. Between the two
//! steps the result lives in the transient parse store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use casedraft_ai::{AssistedParser, ModelClient, PromptBuilder};
use casedraft_core::{parse_result_key, CaseDetails, ParseResult, ParseStore};
use casedraft_parse::RequestParser;
use casedraft_render::{RenderContext, TemplateRenderer};

use crate::extract::TextExtractor;
use crate::registry::{lookup, DiscoveryTypeConfig, ParserKind};
use crate::{Result, ServiceError};

const UNREADABLE_DOCUMENT: &str =
    "could not read the uploaded document; please try a different file";
const NO_QUESTIONS: &str =
    "no questions were recognized in the document; please verify the file and discovery type";
const NO_RESPONSES: &str = "the model output contained no recognizable responses";

/// Orchestrates parsing, drafting, storage and rendering.
///
/// All collaborators sit behind traits so the HTTP layer, tests and
/// local development can swap implementations freely.
pub struct DiscoveryService {
    model: Arc<dyn ModelClient>,
    extractor: Arc<dyn TextExtractor>,
    renderer: Arc<dyn TemplateRenderer>,
    store: Arc<dyn ParseStore>,
    templates_dir: PathBuf,
}

impl DiscoveryService {
    pub fn new(
        model: Arc<dyn ModelClient>,
        extractor: Arc<dyn TextExtractor>,
        renderer: Arc<dyn TemplateRenderer>,
        store: Arc<dyn ParseStore>,
        templates_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model,
            extractor,
            renderer,
            store,
            templates_dir: templates_dir.into(),
        }
    }

    /// Parse an uploaded discovery document and draft responses.
    ///
    /// Returns `Err` only for an unknown `type_key`. Every downstream
    /// failure (unreadable file, zero questions, model error) is folded
    /// into the returned [`ParseResult`] as `ai_error`, so the caller
    /// always has something to show the user.
    pub async fn respond(
        &self,
        type_key: &str,
        document_path: &Path,
        case: &CaseDetails,
        objection_sheet: &str,
    ) -> Result<ParseResult> {
        let config = lookup(type_key)?;
        info!(
            discovery_type = type_key,
            path = %document_path.display(),
            "Parsing discovery document"
        );

        let text = match self.extractor.extract(document_path).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                return Ok(ParseResult::failed(config.kind, UNREADABLE_DOCUMENT));
            }
            Err(err) => {
                error!(discovery_type = type_key, error = %err, "Text extraction failed");
                return Ok(ParseResult::failed(config.kind, UNREADABLE_DOCUMENT));
            }
        };

        let result = match config.parser {
            ParserKind::AiAssisted => self.assisted_pass(config, &text, case, objection_sheet).await,
            ParserKind::Structured => self.structured_pass(config, &text, case, objection_sheet).await,
        };

        if let Some(err) = &result.ai_error {
            warn!(discovery_type = type_key, error = %err, "Parse completed with error");
        } else {
            info!(
                discovery_type = type_key,
                questions = result.questions.len(),
                "Parse completed"
            );
        }
        Ok(result)
    }

    async fn assisted_pass(
        &self,
        config: &DiscoveryTypeConfig,
        text: &str,
        case: &CaseDetails,
        objection_sheet: &str,
    ) -> ParseResult {
        let case_json = serde_json::to_string(case).ok();
        let objections: Vec<String> = objection_sheet
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let parser = AssistedParser::new(config.kind, Arc::clone(&self.model));
        let parse = parser
            .parse(text, case_json.as_deref(), &objections)
            .await;

        let mut result = ParseResult::new(config.kind);
        result.questions = parse.questions;
        result.prompt = parse.prompt;
        result.ai_response = parse.raw_response;
        result.ai_error = parse.error;
        result
    }

    async fn structured_pass(
        &self,
        config: &DiscoveryTypeConfig,
        text: &str,
        case: &CaseDetails,
        objection_sheet: &str,
    ) -> ParseResult {
        let questions = RequestParser::new(config.kind).parse(text);
        if questions.is_empty() {
            return ParseResult::failed(config.kind, NO_QUESTIONS);
        }
        debug!(
            discovery_type = config.key(),
            questions = questions.len(),
            "Structured parse extracted questions"
        );

        let mut result = ParseResult::new(config.kind);
        result.prompt = PromptBuilder::new(config.kind).build(&questions, case, objection_sheet);

        let raw = match self.model.generate(&result.prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                error!(discovery_type = config.key(), error = %err, "Drafting call failed");
                result.questions = questions;
                result.ai_error = Some(format!("response generation failed: {}", err));
                return result;
            }
        };

        let responses = casedraft_ai::parse_responses(&raw, config.kind);
        if responses.is_empty() {
            result.ai_error = Some(NO_RESPONSES.to_string());
        }
        result.questions = questions
            .into_iter()
            .map(|mut question| {
                if let Some(response) = responses.get(&question.number) {
                    question.attach_response(response.clone());
                }
                question
            })
            .collect();
        result.ai_response = Some(raw);
        result
    }

    /// Render the response document for a type from a prepared context.
    ///
    /// Returns the document bytes and a suggested download filename.
    pub fn render(
        &self,
        type_key: &str,
        context: &RenderContext,
        case_display_id: &str,
    ) -> Result<(Vec<u8>, String)> {
        let config = lookup(type_key)?;
        let template_path = self.templates_dir.join(config.template_file);
        if !template_path.exists() {
            return Err(ServiceError::TemplateMissing(
                config.template_file.to_string(),
            ));
        }

        let bytes = self.renderer.render(&template_path, context)?;
        let filename = suggested_filename(case_display_id, config.display_name());
        info!(
            discovery_type = type_key,
            bytes = bytes.len(),
            filename = %filename,
            "Rendered response document"
        );
        Ok((bytes, filename))
    }

    /// Hold a parse result between the parse and generate steps.
    pub async fn stash(
        &self,
        session_id: &str,
        case_id: &str,
        user_id: &str,
        result: ParseResult,
    ) -> Result<()> {
        let key = parse_result_key(session_id, case_id, user_id);
        self.store.put(&key, result).await?;
        Ok(())
    }

    /// Take a stashed parse result back out. Each stash is consumed by
    /// exactly one reclaim; a second call returns `None`.
    pub async fn reclaim(
        &self,
        session_id: &str,
        case_id: &str,
        user_id: &str,
    ) -> Result<Option<ParseResult>> {
        let key = parse_result_key(session_id, case_id, user_id);
        let result = self.store.get(&key).await?;
        if result.is_some() {
            self.store.delete(&key).await?;
        }
        Ok(result)
    }
}

/// Download filename for a rendered document. Path separators in the
/// case identifier would corrupt the client-side save path.
fn suggested_filename(case_display_id: &str, display_name: &str) -> String {
    let sanitized: String = case_display_id
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("{} - {}.docx", sanitized.trim(), display_name)
}
