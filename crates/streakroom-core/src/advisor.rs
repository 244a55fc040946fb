//! Optional remote advisor over an OpenAI-compatible chat-completion API.
//!
//! The advisor is never on the check-in path. Callers ask for advice after
//! their mutation has committed and substitute [`fallback_advice`] or
//! [`fallback_analysis`] when a request fails.

use std::collections::BTreeMap;
use std::time::Duration;

use indoc::{formatdoc, indoc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AdvisorError;
use crate::record::CheckInEvent;
use crate::storage::{keyring_store, AdvisorConfig};

/// Most recent events included in an analysis prompt.
pub const ANALYSIS_EVENT_LIMIT: usize = 30;

const COMPLETIONS_PATH: &str = "v1/chat/completions";

const ANALYSIS_SYSTEM_PROMPT: &str = indoc! {"
    You are a health coaching assistant. Using the user's check-in history,
    give professional, warm and practical advice.

    Consider:
    1. Whether the frequency is moderate
    2. Whether the timing is regular
    3. Whether it affects daily life
    4. Mental well-being

    Reply with a JSON object with these fields:
    - assessment: overall assessment
    - suggestions: list of suggestions
    - riskWarnings: list of risk warnings (may be empty)
    - encouragement: a short encouraging sentence
"};

const ADVICE_SYSTEM_PROMPT: &str =
    "You are a health coaching assistant. Give short, warm, professional advice.";

/// Structured result of a health analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAnalysis {
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub risk_warnings: Vec<String>,
    #[serde(default)]
    pub encouragement: String,
}

fn default_suggestions() -> Vec<String> {
    vec![
        "Keep a regular daily routine".to_string(),
        "Exercise in moderation".to_string(),
        "Stay positive and kind to yourself".to_string(),
    ]
}

/// Canned one-liner used when the advisor is unavailable.
pub fn fallback_advice(has_record_today: bool) -> String {
    if has_record_today {
        "Today's check-in is done. Keep up the steady rhythm!".to_string()
    } else {
        "No check-in yet today. Take a moment to look after yourself.".to_string()
    }
}

/// Canned analysis used when the advisor is unavailable.
pub fn fallback_analysis() -> HealthAnalysis {
    HealthAnalysis {
        assessment: "Still collecting data. Keep logging for a more accurate analysis.".to_string(),
        suggestions: default_suggestions(),
        risk_warnings: Vec::new(),
        encouragement: "Persistence wins!".to_string(),
    }
}

/// Parse the model's reply. Accepts a bare JSON object or one wrapped in
/// prose or code fences; anything else becomes a plain-text assessment.
pub fn parse_analysis(content: &str) -> HealthAnalysis {
    let json = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&content[start..=end]),
        _ => None,
    };
    if let Some(parsed) = json.and_then(|j| serde_json::from_str::<HealthAnalysis>(j).ok()) {
        return parsed;
    }

    tracing::debug!("advisor reply was not JSON; using plain-text assessment");
    HealthAnalysis {
        assessment: content.trim().chars().take(100).collect(),
        suggestions: default_suggestions(),
        risk_warnings: Vec::new(),
        encouragement: String::new(),
    }
}

/// Summary numbers the analysis prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub total_count: u64,
    pub current_streak: u32,
    pub peak_hour: Option<u32>,
    /// ISO weekday, 1 = Monday.
    pub peak_weekday: Option<u32>,
    pub average_mood: Option<f64>,
}

impl AnalysisInput {
    /// Summarise the newest [`ANALYSIS_EVENT_LIMIT`] events. `events` newest first.
    pub fn from_events(events: &[CheckInEvent], total_count: u64, current_streak: u32) -> Self {
        let recent = &events[..events.len().min(ANALYSIS_EVENT_LIMIT)];

        let mut hours: BTreeMap<u32, usize> = BTreeMap::new();
        let mut weekdays: BTreeMap<u32, usize> = BTreeMap::new();
        for e in recent {
            *hours.entry(e.hour).or_default() += 1;
            *weekdays.entry(e.weekday).or_default() += 1;
        }
        let peak = |m: &BTreeMap<u32, usize>| {
            m.iter()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
                .map(|(k, _)| *k)
        };

        let average_mood = (!recent.is_empty()).then(|| {
            recent.iter().map(|e| f64::from(e.mood)).sum::<f64>() / recent.len() as f64
        });

        Self {
            total_count,
            current_streak,
            peak_hour: peak(&hours),
            peak_weekday: peak(&weekdays),
            average_mood,
        }
    }

    fn prompt(&self) -> String {
        let peak_hour = self
            .peak_hour
            .map_or_else(|| "no data yet".to_string(), |h| format!("{h:02}:00"));
        let peak_weekday = self
            .peak_weekday
            .and_then(weekday_name)
            .unwrap_or("no data yet");
        let mood = self
            .average_mood
            .map_or_else(|| "no data yet".to_string(), |m| format!("{m:.1}"));

        formatdoc! {"
            Please analyse the following check-in data and give advice.

            Basic statistics:
            - Total check-ins: {total}
            - Current streak: {streak} days
            - Average mood (1-5): {mood}

            Activity timing:
            - Peak hour: {peak_hour}
            - Most active weekday: {peak_weekday}

            Cover the following (reply as JSON):
            1. Overall assessment
            2. Regularity of timing
            3. Three suggestions
            4. Risk warnings, if any
            ",
            total = self.total_count,
            streak = self.current_streak,
        }
    }
}

fn weekday_name(weekday: u32) -> Option<&'static str> {
    const NAMES: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    NAMES.get(weekday.checked_sub(1)? as usize).copied()
}

fn advice_prompt(hour: u32, has_record_today: bool) -> String {
    if has_record_today {
        format!(
            "It is {hour}:00 and today's check-in is already done. \
             Give one short sentence of encouragement or a health reminder (under 50 words)."
        )
    } else {
        format!(
            "It is {hour}:00 and there is no check-in yet today. \
             Give one gentle reminder (under 50 words) encouraging today's goal."
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the chat-completion endpoint.
pub struct Advisor {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f64,
    analysis_max_tokens: u32,
    advice_max_tokens: u32,
}

impl Advisor {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &AdvisorConfig, api_key: impl Into<String>) -> Result<Self, AdvisorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdvisorError::NotConfigured);
        }

        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join(COMPLETIONS_PATH)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            analysis_max_tokens: config.analysis_max_tokens,
            advice_max_tokens: config.advice_max_tokens,
        })
    }

    /// Build from config with the key from the environment or keyring.
    ///
    /// # Errors
    /// [`AdvisorError::NotConfigured`] when the advisor is disabled or no key
    /// is stored.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        if !config.enabled {
            return Err(AdvisorError::NotConfigured);
        }
        let key = keyring_store::api_key().ok_or(AdvisorError::NotConfigured)?;
        Self::new(config, key)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn complete(
        &self,
        system: &str,
        user: String,
        max_tokens: u32,
    ) -> Result<String, AdvisorError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "advisor request");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(AdvisorError::EmptyResponse)
    }

    /// One short line of advice for the current hour.
    pub async fn daily_advice(
        &self,
        hour: u32,
        has_record_today: bool,
    ) -> Result<String, AdvisorError> {
        self.complete(
            ADVICE_SYSTEM_PROMPT,
            advice_prompt(hour, has_record_today),
            self.advice_max_tokens,
        )
        .await
    }

    pub async fn analyze_health(
        &self,
        input: &AnalysisInput,
    ) -> Result<HealthAnalysis, AdvisorError> {
        let content = self
            .complete(
                ANALYSIS_SYSTEM_PROMPT,
                input.prompt(),
                self.analysis_max_tokens,
            )
            .await?;
        Ok(parse_analysis(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(base_url: &str) -> AdvisorConfig {
        AdvisorConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..AdvisorConfig::default()
        }
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn endpoint_is_joined_onto_base() {
        let advisor = Advisor::new(&config("https://api.example.com"), "k").unwrap();
        assert_eq!(
            advisor.endpoint().as_str(),
            "https://api.example.com/v1/chat/completions"
        );
        let advisor = Advisor::new(&config("https://proxy.example.com/openai/"), "k").unwrap();
        assert_eq!(
            advisor.endpoint().as_str(),
            "https://proxy.example.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(matches!(
            Advisor::new(&config("https://api.example.com/"), "  "),
            Err(AdvisorError::NotConfigured)
        ));
    }

    #[test]
    fn disabled_advisor_is_not_configured() {
        let cfg = AdvisorConfig {
            enabled: false,
            ..AdvisorConfig::default()
        };
        assert!(matches!(
            Advisor::from_config(&cfg),
            Err(AdvisorError::NotConfigured)
        ));
    }

    #[test]
    fn parse_analysis_reads_fenced_json() {
        let reply = "Here you go:\n```json\n{\"assessment\":\"Steady\",\"suggestions\":[\"Sleep\"],\"riskWarnings\":[],\"encouragement\":\"Go\"}\n```";
        let parsed = parse_analysis(reply);
        assert_eq!(parsed.assessment, "Steady");
        assert_eq!(parsed.suggestions, ["Sleep"]);
        assert_eq!(parsed.encouragement, "Go");
    }

    #[test]
    fn parse_analysis_falls_back_to_text() {
        let parsed = parse_analysis("You are doing fine.");
        assert_eq!(parsed.assessment, "You are doing fine.");
        assert_eq!(parsed.suggestions.len(), 3);
        assert!(parsed.risk_warnings.is_empty());
    }

    #[test]
    fn analysis_input_summarises_recent_events() {
        let input = AnalysisInput::from_events(&[], 0, 0);
        assert_eq!(input.peak_hour, None);
        assert_eq!(input.average_mood, None);
        assert!(input.prompt().contains("Peak hour: no data yet"));
    }

    #[tokio::test]
    async fn daily_advice_posts_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 100
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion("  Drink some water.  "))
            .create_async()
            .await;

        let advisor = Advisor::new(&config(&server.url()), "test-key").unwrap();
        let advice = advisor.daily_advice(14, true).await.unwrap();
        assert_eq!(advice, "Drink some water.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn analyze_health_parses_json_reply() {
        let mut server = mockito::Server::new_async().await;
        let reply = r#"{"assessment":"Regular","suggestions":["a","b"],"riskWarnings":["late nights"],"encouragement":"Nice"}"#;
        server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({ "max_tokens": 500 })))
            .with_status(200)
            .with_body(completion(reply))
            .create_async()
            .await;

        let advisor = Advisor::new(&config(&server.url()), "k").unwrap();
        let input = AnalysisInput {
            total_count: 42,
            current_streak: 3,
            peak_hour: Some(22),
            peak_weekday: Some(5),
            average_mood: Some(3.5),
        };
        let analysis = advisor.analyze_health(&input).await.unwrap();
        assert_eq!(analysis.assessment, "Regular");
        assert_eq!(analysis.risk_warnings, ["late nights"]);
    }

    #[tokio::test]
    async fn http_error_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let advisor = Advisor::new(&config(&server.url()), "k").unwrap();
        match advisor.daily_advice(9, false).await {
            Err(AdvisorError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"id":"x","choices":[]}"#)
            .create_async()
            .await;

        let advisor = Advisor::new(&config(&server.url()), "k").unwrap();
        assert!(matches!(
            advisor.daily_advice(9, false).await,
            Err(AdvisorError::EmptyResponse)
        ));
    }
}
