//! Summary Generator
//!
//! Turns a program transcript into a [`SummaryResult`] via one chat
//! completion. Model output is untrusted: anything that does not parse into
//! the three expected fields becomes a labelled fallback instead of an error.
//! Transport and service errors are returned to the caller.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::llm::LLMAdapter;
use crate::models::SummaryResult;
use crate::types::{AppResult, LLMMessage, LLMRequest};

pub const TRUNCATION_MARKER: &str = "...\n[Text truncated for API limits]";

/// Outcome of summarizing one program
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// Parsed from the model response
    Generated(SummaryResult),
    /// Placeholder used when the response could not be parsed
    Fallback(SummaryResult),
}

impl SummaryOutcome {
    pub fn result(&self) -> &SummaryResult {
        match self {
            SummaryOutcome::Generated(result) | SummaryOutcome::Fallback(result) => result,
        }
    }

    pub fn into_result(self) -> SummaryResult {
        match self {
            SummaryOutcome::Generated(result) | SummaryOutcome::Fallback(result) => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SummaryOutcome::Fallback(_))
    }
}

/// Strict shape of the model's JSON answer
#[derive(Debug, Deserialize)]
struct SummaryLLMResponse {
    current_vision: String,
    future_vision: String,
    key_policies: Vec<String>,
}

pub struct SummaryGenerator {
    llm: Arc<dyn LLMAdapter>,
    provider: String,
    model: String,
    max_chars: usize,
}

impl SummaryGenerator {
    pub fn new(
        llm: Arc<dyn LLMAdapter>,
        provider: impl Into<String>,
        model: impl Into<String>,
        max_chars: usize,
    ) -> Self {
        Self {
            llm,
            provider: provider.into(),
            model: model.into(),
            max_chars,
        }
    }

    /// Summarize one party program
    pub async fn summarize(&self, transcript: &str, party_name: &str) -> AppResult<SummaryOutcome> {
        let transcript = truncate_transcript(transcript, self.max_chars);
        if matches!(transcript, Cow::Owned(_)) {
            info!(party = %party_name, max_chars = self.max_chars, "Program text truncated");
        }

        let prompt = build_prompt(party_name, &transcript);
        debug!(party = %party_name, prompt_chars = prompt.chars().count(), "Sending summary prompt");

        let request = LLMRequest {
            provider: self.provider.clone(),
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: None,
            temperature: None,
        };

        let response = self.llm.create_chat_completion(&request).await?;
        info!(
            party = %party_name,
            response_len = response.content.len(),
            total_tokens = response.usage.total_tokens,
            "Received summary response"
        );

        Ok(parse_summary(&response.content, party_name))
    }
}

/// Cut `text` to `max_chars` characters and append the truncation marker;
/// shorter texts are returned untouched
pub fn truncate_transcript(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

/// Build the (Dutch) summary instruction for one party
pub fn build_prompt(party_name: &str, program_text: &str) -> String {
    format!(
        r#"Analyseer het volgende partijprogramma van {party_name} en geef drie onderdelen:

1. "current_vision": Hoe deze partij Nederland NU ziet (problemen, uitdagingen, huidige staat)
2. "future_vision": Hun visie voor de TOEKOMST van Nederland (doelen, oplossingen, ambities)
3. "key_policies": De 5 kernpunten van de partij

Elke samenvatting moet:
- 1 pagina zijn (ongeveer 300 woorden)
- Neutraal en feitelijk zijn, zonder de partij te steunen of te bekritiseren
- In de Nederlandse taal
- De kernpunten van de partij weergeven

Partijprogramma tekst:
{program_text}

Geef je antwoord in dit JSON formaat (ALLEEN het JSON object):
{{
    "current_vision": "...",
    "future_vision": "...",
    "key_policies": ["...", "...", "...", "...", "..."]
}}"#,
        party_name = party_name,
        program_text = program_text,
    )
}

/// Parse the model response; never fails, falls back to placeholders
pub fn parse_summary(response: &str, party_name: &str) -> SummaryOutcome {
    // Only unwrap a fence when the raw reply is not already a valid answer
    let parsed = serde_json::from_str::<SummaryLLMResponse>(response.trim())
        .or_else(|_| serde_json::from_str::<SummaryLLMResponse>(strip_code_fence(response)));

    match parsed {
        Ok(parsed) => SummaryOutcome::Generated(SummaryResult {
            current_vision: parsed.current_vision,
            future_vision: parsed.future_vision,
            key_policies: parsed.key_policies,
        }),
        Err(e) => {
            warn!(party = %party_name, error = %e, "Failed to parse AI response as JSON, using fallback");
            SummaryOutcome::Fallback(fallback_summary(party_name))
        }
    }
}

/// Placeholder summary naming the party in every field
pub fn fallback_summary(party_name: &str) -> SummaryResult {
    SummaryResult {
        current_vision: format!(
            "Kon geen samenvatting genereren voor {} (JSON parse error)",
            party_name
        ),
        future_vision: format!(
            "Kon geen toekomstvisie genereren voor {} (JSON parse error)",
            party_name
        ),
        key_policies: vec![format!(
            "Kon geen kernpunten genereren voor {} (JSON parse error)",
            party_name
        )],
    }
}

fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(response)
            .trim()
    } else if response.contains("```") {
        response.split("```").nth(1).unwrap_or(response).trim()
    } else {
        response.trim()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{AppError, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Adapter returning canned content and recording the prompts it saw
    pub(crate) struct ScriptedLLM {
        pub reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLLM {
        pub(crate) fn replying(content: &str) -> Self {
            Self {
                reply: Ok(content.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMAdapter for ScriptedLLM {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            match &self.reply {
                Ok(content) => Ok(LLMResponse {
                    content: content.clone(),
                    finish_reason: "stop".to_string(),
                    usage: TokenUsage::default(),
                }),
                Err(message) => Err(AppError::LLMApi(message.clone())),
            }
        }
    }

    const VALID: &str = r#"{
        "current_vision": "Nederland staat onder druk.",
        "future_vision": "Een efficiënte overheid.",
        "key_policies": ["Één", "Twee", "Drie", "Vier", "Vijf"]
    }"#;

    #[test]
    fn test_short_transcript_is_not_truncated() {
        let text = "kort programma";
        let result = truncate_transcript(text, 100);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, text);

        assert_eq!(truncate_transcript("abc", 3), "abc");
    }

    #[test]
    fn test_long_transcript_is_cut_at_budget_plus_marker() {
        let text = "é".repeat(50);
        let result = truncate_transcript(&text, 10);
        assert_eq!(result, format!("{}{}", "é".repeat(10), TRUNCATION_MARKER));
        assert_eq!(
            result.chars().count(),
            10 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_prompt_embeds_party_and_text() {
        let prompt = build_prompt("SGP", "Het programma");
        assert!(prompt.contains("partijprogramma van SGP"));
        assert!(prompt.contains("Het programma"));
        assert!(prompt.contains("\"key_policies\""));
        assert!(prompt.contains("Neutraal en feitelijk"));
    }

    #[test]
    fn test_valid_response_is_returned_unchanged() {
        let outcome = parse_summary(VALID, "VVD");
        assert!(!outcome.is_fallback());

        let result = outcome.into_result();
        assert_eq!(result.current_vision, "Nederland staat onder druk.");
        assert_eq!(result.future_vision, "Een efficiënte overheid.");
        assert_eq!(result.key_policies, vec!["Één", "Twee", "Drie", "Vier", "Vijf"]);
    }

    #[test]
    fn test_fenced_response_is_accepted() {
        let fenced = format!("Hier is het resultaat:\n```json\n{}\n```", VALID);
        assert!(!parse_summary(&fenced, "VVD").is_fallback());
    }

    #[test]
    fn test_valid_response_with_backticks_in_values_is_kept() {
        let response = r#"{"current_vision": "Zie ```json blok```", "future_vision": "b", "key_policies": ["c"]}"#;
        let outcome = parse_summary(response, "VVD");
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.result().current_vision, "Zie ```json blok```");
        assert_eq!(outcome.result().key_policies, vec!["c"]);
    }

    #[test]
    fn test_unparseable_response_falls_back() {
        for response in ["Sorry, ik kan dit niet.", "{\"current_vision\": \"alleen dit\"}", ""] {
            let outcome = parse_summary(response, "PVV");
            assert!(outcome.is_fallback());

            let result = outcome.result();
            assert!(result.current_vision.contains("PVV"));
            assert!(result.future_vision.contains("PVV"));
            assert!(result.key_policies.iter().all(|p| p.contains("PVV")));
        }
    }

    #[tokio::test]
    async fn test_summarize_sends_truncated_prompt() {
        let llm = Arc::new(ScriptedLLM::replying(VALID));
        let generator = SummaryGenerator::new(llm.clone(), "openai", "gpt-5-mini", 5);

        let outcome = generator.summarize("abcdefghij", "D66").await.unwrap();
        assert!(!outcome.is_fallback());

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&format!("abcde{}", TRUNCATION_MARKER)));
        assert!(!prompts[0].contains("abcdef"));
    }

    #[tokio::test]
    async fn test_summarize_propagates_service_errors() {
        let generator = SummaryGenerator::new(
            Arc::new(ScriptedLLM::failing("connection reset")),
            "openai",
            "gpt-5-mini",
            100,
        );

        let err = generator.summarize("tekst", "BBB").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_summarize_soft_fails_on_bad_json() {
        let generator = SummaryGenerator::new(
            Arc::new(ScriptedLLM::replying("not json")),
            "openai",
            "gpt-5-mini",
            100,
        );

        let outcome = generator.summarize("tekst", "BBB").await.unwrap();
        assert_eq!(outcome, SummaryOutcome::Fallback(fallback_summary("BBB")));
    }
}
