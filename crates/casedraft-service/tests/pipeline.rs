//! End-to-end pipeline tests over in-process fakes: scripted model,
//! plain-text extractor, text template renderer, in-memory store.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use casedraft_ai::{parse_responses, ModelClient, ScriptedModelClient};
use casedraft_core::{
    CaseDetails, DiscoveryKind, MemoryParseStore, MemoryStoreConfig, ParseResult,
};
use casedraft_render::{RenderContext, SelectionMerger, TextTemplateRenderer};
use casedraft_service::{DiscoveryService, PlainTextExtractor, ServiceError};

const RFP_DOCUMENT: &str = "\
SMITH v. JONES CONSTRUCTION\n\
REQUESTS FOR PRODUCTION OF DOCUMENTS, SET ONE\n\
\n\
REQUEST FOR PRODUCTION NO. 1: All contracts between the parties.\n\
\n\
REQUEST FOR PRODUCTION NO. 2: All communications concerning the incident.\n\
\n\
REQUEST FOR PRODUCTION NO. 3: All photographs of the work site.\n\
\n\
DATED: January 5, 2024\n";

const RFP_MODEL_OUTPUT: &str = "\
RESPONSE TO REQUEST FOR PRODUCTION NO.1: Objection, overbroad. Subject to and without waiving \
the foregoing objections, responding party will comply.\n\
RESPONSE TO REQUEST FOR PRODUCTION NO.2: Objection, vague as to \"communications\".\n\
RESPONSE TO REQUEST FOR PRODUCTION NO.3: No objection.\n";

fn sample_case() -> CaseDetails {
    CaseDetails {
        case_name: Some("Smith v. Jones Construction".to_string()),
        case_number: Some("23STCV01234".to_string()),
        court: Some("Superior Court of California, County of Los Angeles".to_string()),
        plaintiff: Some("Ana Smith".to_string()),
        defendant: Some("Jones Construction".to_string()),
        propounding_party: Some("Defendant".to_string()),
        responding_party: Some("Plaintiff".to_string()),
        ..Default::default()
    }
}

fn write_document(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", contents).unwrap();
    path
}

fn service_with(model: Arc<dyn ModelClient>, templates_dir: &Path) -> DiscoveryService {
    DiscoveryService::new(
        model,
        Arc::new(PlainTextExtractor::new()),
        Arc::new(TextTemplateRenderer::new()),
        Arc::new(MemoryParseStore::new(MemoryStoreConfig {
            cleanup_interval: None,
            ..Default::default()
        })),
        templates_dir,
    )
}

#[tokio::test]
async fn test_structured_parse_and_draft() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "rfp.txt", RFP_DOCUMENT);
    let service = service_with(
        Arc::new(ScriptedModelClient::replying(RFP_MODEL_OUTPUT)),
        dir.path(),
    );

    let result = service
        .respond(
            "requests_for_production",
            &document,
            &sample_case(),
            "Objection: the request is overbroad and unduly burdensome.",
        )
        .await
        .unwrap();

    assert!(result.ai_error.is_none());
    assert_eq!(result.questions.len(), 3);
    assert_eq!(result.questions[0].number, "1");
    assert_eq!(
        result.questions[0].text,
        "All contracts between the parties."
    );
    // Trailer after DATED: must not leak into the last question.
    assert!(!result.questions[2].text.contains("January"));
    assert!(result.questions[1]
        .response
        .as_deref()
        .unwrap()
        .contains("vague"));
    assert!(result.prompt.contains("Smith v. Jones Construction"));
    assert!(result.prompt.contains("RESPONSE TO REQUEST FOR PRODUCTION NO."));
}

#[tokio::test]
async fn test_full_parse_select_render_round() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "rfp.txt", RFP_DOCUMENT);
    write_document(
        &dir,
        "requests_for_production_response.docx",
        "Case: {{case_name}}\nCourt: {{court}}\n\n{{responses_text}}\n",
    );
    let case = sample_case();
    let service = service_with(
        Arc::new(ScriptedModelClient::replying(RFP_MODEL_OUTPUT)),
        dir.path(),
    );

    let result = service
        .respond("requests_for_production", &document, &case, "")
        .await
        .unwrap();
    let responses = parse_responses(
        result.ai_response.as_deref().unwrap(),
        DiscoveryKind::RequestsForProduction,
    );

    let mut selections = HashMap::new();
    selections.insert("q_1".to_string(), "will_provide".to_string());
    selections.insert("q_3".to_string(), "no_responsive_documents".to_string());

    let merged = SelectionMerger::new(DiscoveryKind::RequestsForProduction).merge(
        &result.questions,
        &responses,
        &selections,
    );
    let mut context = RenderContext::from_case(&case);
    context.set_responses(&merged);

    let (bytes, filename) = service
        .render("requests_for_production", &context, &case.display_id())
        .unwrap();
    let rendered = String::from_utf8(bytes).unwrap();

    assert!(rendered.contains("Case: Smith v. Jones Construction"));
    assert!(rendered.contains("REQUEST FOR PRODUCTION NO.1"));
    assert!(rendered.contains("Plaintiff will produce responsive documents."));
    assert!(rendered.contains("Subject to and without waiving"));
    assert_eq!(
        filename,
        "Smith v. Jones Construction - Requests for Production.docx"
    );
}

#[tokio::test]
async fn test_assisted_parse_for_form_interrogatories() {
    let dir = TempDir::new().unwrap();
    let document = write_document(
        &dir,
        "frogs.txt",
        "FORM INTERROGATORIES - GENERAL\n\
         6.4 State the name of each physician who treated you.\n\
         6.5 State the total medical expenses to date.\n",
    );
    let output = r#"[
        {"number": "6.4", "text": "State the name of each physician who treated you.", "response": "Dr. Lee, Mercy Hospital."},
        {"number": "6.5", "text": "State the total medical expenses to date.", "response": "$14,250."}
    ]"#;
    let service = service_with(Arc::new(ScriptedModelClient::replying(output)), dir.path());

    let result = service
        .respond("form_interrogatories", &document, &sample_case(), "")
        .await
        .unwrap();

    assert!(result.ai_error.is_none());
    assert_eq!(result.questions.len(), 2);
    assert_eq!(result.questions[0].number, "6.4");
    assert_eq!(
        result.questions[1].response.as_deref(),
        Some("$14,250.")
    );
    assert!(result.ai_response.is_some());
}

#[tokio::test]
async fn test_unknown_type_is_an_error() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "doc.txt", RFP_DOCUMENT);
    let service = service_with(
        Arc::new(ScriptedModelClient::replying("unused")),
        dir.path(),
    );

    let err = service
        .respond("bogus_type", &document, &sample_case(), "")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UnsupportedType(_)));
    assert!(err.to_string().contains("bogus_type"));
}

#[tokio::test]
async fn test_unreadable_document_reported_in_result() {
    let dir = TempDir::new().unwrap();
    let service = service_with(
        Arc::new(ScriptedModelClient::replying("unused")),
        dir.path(),
    );

    let result = service
        .respond(
            "requests_for_production",
            Path::new("/nonexistent/upload.pdf"),
            &sample_case(),
            "",
        )
        .await
        .unwrap();
    assert!(!result.has_questions());
    assert!(result.ai_error.as_deref().unwrap().contains("could not read"));
}

#[tokio::test]
async fn test_document_without_requests_sets_ai_error() {
    // Readable file, but nothing in it matches a heading or a numbered
    // item; the model is never called.
    let dir = TempDir::new().unwrap();
    let document = write_document(
        &dir,
        "letter.txt",
        "Dear counsel,\n\nPlease find enclosed our meet and confer correspondence.\n\nRegards,\n",
    );
    let service = service_with(
        Arc::new(ScriptedModelClient::failing("must not be reached")),
        dir.path(),
    );

    let result = service
        .respond("requests_for_production", &document, &sample_case(), "")
        .await
        .unwrap();
    assert!(!result.has_questions());
    assert!(result
        .ai_error
        .as_deref()
        .unwrap()
        .contains("no questions were recognized"));
}

#[tokio::test]
async fn test_model_failure_keeps_parsed_questions() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "rfp.txt", RFP_DOCUMENT);
    let service = service_with(
        Arc::new(ScriptedModelClient::failing("upstream timeout")),
        dir.path(),
    );

    let result = service
        .respond("requests_for_production", &document, &sample_case(), "")
        .await
        .unwrap();
    assert_eq!(result.questions.len(), 3);
    assert!(result
        .ai_error
        .as_deref()
        .unwrap()
        .contains("response generation failed"));
    assert!(result.ai_response.is_none());
}

#[tokio::test]
async fn test_unrecognizable_model_output_flagged() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "rfp.txt", RFP_DOCUMENT);
    let service = service_with(
        Arc::new(ScriptedModelClient::replying(
            "I am unable to help with that request.",
        )),
        dir.path(),
    );

    let result = service
        .respond("requests_for_production", &document, &sample_case(), "")
        .await
        .unwrap();
    assert_eq!(result.questions.len(), 3);
    assert!(result
        .ai_error
        .as_deref()
        .unwrap()
        .contains("no recognizable responses"));
}

#[tokio::test]
async fn test_stash_is_reclaimed_exactly_once() {
    let dir = TempDir::new().unwrap();
    let service = service_with(
        Arc::new(ScriptedModelClient::replying("unused")),
        dir.path(),
    );
    let mut result = ParseResult::new(DiscoveryKind::RequestsForAdmission);
    result.prompt = "draft prompt".to_string();

    service
        .stash("sess-1", "case-9", "user-4", result)
        .await
        .unwrap();

    let first = service.reclaim("sess-1", "case-9", "user-4").await.unwrap();
    assert_eq!(first.unwrap().prompt, "draft prompt");

    let second = service.reclaim("sess-1", "case-9", "user-4").await.unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_missing_template_is_an_error() {
    let dir = TempDir::new().unwrap();
    let service = service_with(
        Arc::new(ScriptedModelClient::replying("unused")),
        dir.path(),
    );

    let context = RenderContext::from_case(&sample_case());
    let err = service
        .render("requests_for_admission", &context, "Smith")
        .unwrap_err();
    assert!(matches!(err, ServiceError::TemplateMissing(_)));
    assert!(err
        .to_string()
        .contains("requests_for_admission_response.docx"));
}

#[tokio::test]
async fn test_questions_without_drafts_use_defaults() {
    // A structured parse where the model only answered one of three
    // requests still renders every request, falling back per question.
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "rfp.txt", RFP_DOCUMENT);
    let service = service_with(
        Arc::new(ScriptedModelClient::replying(
            "RESPONSE TO REQUEST FOR PRODUCTION NO.2: Objection, vague.",
        )),
        dir.path(),
    );

    let result = service
        .respond("requests_for_production", &document, &sample_case(), "")
        .await
        .unwrap();
    let merged = SelectionMerger::new(DiscoveryKind::RequestsForProduction).merge(
        &result.questions,
        &BTreeMap::new(),
        &HashMap::new(),
    );
    let text = merged.to_plain_text();
    assert!(text.contains("No objections found for this request."));
    assert!(text.contains("Objection, vague."));
}
