use chrono::Duration;

use crate::ai_provider::CompletionClient;
use crate::core::{export_calendar, AppState, CalendarResult, ExportOptions, GenerationResult};
use crate::notify::{NotificationQueue, DEFAULT_NOTICE_MS};
use crate::synthesizer::Synthesizer;

pub const SYNTHESIS_FAILED: &str = "Strategic synthesis failed. Check your connection.";

/// Transient view state: the latest results and whatever went wrong getting them.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub result: Option<GenerationResult>,
    pub calendar: Option<CalendarResult>,
    pub error: Option<String>,
    pub reply: Option<String>,
    pub notifications: NotificationQueue,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications
            .push(message, Duration::milliseconds(DEFAULT_NOTICE_MS));
    }

    /// Replace the current result with a fresh generation. On failure the
    /// dashboard holds no result and a single error message.
    pub async fn run_generation<C: CompletionClient>(&mut self, synth: &Synthesizer<C>, state: &AppState) {
        self.result = None;
        self.calendar = None;
        self.error = None;

        match synth.generate_content(state).await {
            Ok(result) => {
                tracing::info!(topic = %state.topic, drafts = result.original_posts.len(), "content generated");
                self.result = Some(result);
            }
            Err(e) => {
                tracing::error!(error = %e, topic = %state.topic, "content generation failed");
                self.error = Some(SYNTHESIS_FAILED.to_string());
            }
        }
    }

    /// Replace the calendar with a freshly planned one. The content result is
    /// a separate panel and stays as it was, whether or not planning succeeds.
    pub async fn run_calendar<C: CompletionClient>(&mut self, synth: &Synthesizer<C>, state: &AppState) {
        self.calendar = None;
        self.error = None;

        match synth.generate_calendar(state).await {
            Ok(calendar) => self.calendar = Some(calendar),
            Err(e) => {
                tracing::error!(error = %e, "calendar generation failed");
                self.error = Some(SYNTHESIS_FAILED.to_string());
            }
        }
    }

    /// Draft a reply to `inquiry`. Blank inquiries are ignored; failures
    /// produce the canned apology instead of an error.
    pub async fn run_reply<C: CompletionClient>(
        &mut self,
        synth: &Synthesizer<C>,
        state: &AppState,
        inquiry: &str,
    ) {
        if inquiry.trim().is_empty() {
            return;
        }
        let reply = match synth
            .generate_reply(inquiry, &state.knowledge_base, &state.brand)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "smart reply failed");
                state.language.fallback_reply().to_string()
            }
        };
        self.reply = Some(reply);
    }

    /// Lay the current drafts out on a calendar. Returns false when there is
    /// no result to export.
    pub fn export_calendar(&mut self, options: &ExportOptions) -> bool {
        match &self.result {
            Some(result) => {
                self.calendar = Some(export_calendar(result, options));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RequestCompiler;
    use crate::synthesizer::tests::{ScriptedClient, CONTENT_REPLY};
    use chrono::NaiveDate;

    fn synth(client: ScriptedClient) -> Synthesizer<ScriptedClient> {
        Synthesizer::new(RequestCompiler::default(), client)
    }

    #[tokio::test]
    async fn test_failed_generation_shows_one_error_and_no_result() {
        let mut dashboard = Dashboard::new();
        let state = AppState::default();

        dashboard.run_generation(&synth(ScriptedClient::ok(CONTENT_REPLY)), &state).await;
        assert!(dashboard.result.is_some());

        dashboard.run_generation(&synth(ScriptedClient::failing()), &state).await;
        assert!(dashboard.result.is_none());
        assert_eq!(dashboard.error.as_deref(), Some(SYNTHESIS_FAILED));
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let mut dashboard = Dashboard::new();
        dashboard.error = Some("old".to_string());
        dashboard.run_generation(&synth(ScriptedClient::ok(CONTENT_REPLY)), &AppState::default()).await;
        assert!(dashboard.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_reply_uses_fallback() {
        let mut dashboard = Dashboard::new();
        dashboard
            .run_reply(&synth(ScriptedClient::failing()), &AppState::default(), "How much?")
            .await;
        assert_eq!(
            dashboard.reply.as_deref(),
            Some("တောင်းပန်ပါသည်။ ပြန်လည်ဖြေကြားရန် အဆင်မပြေဖြစ်နေပါသည်။")
        );
        assert!(dashboard.error.is_none());
    }

    #[tokio::test]
    async fn test_blank_inquiry_is_skipped() {
        let client = ScriptedClient::ok("should not be used");
        let synth = synth(client);
        let mut dashboard = Dashboard::new();
        dashboard.run_reply(&synth, &AppState::default(), "   ").await;
        assert!(dashboard.reply.is_none());
    }

    #[tokio::test]
    async fn test_failed_calendar() {
        let mut dashboard = Dashboard::new();
        dashboard.run_calendar(&synth(ScriptedClient::failing()), &AppState::default()).await;
        assert!(dashboard.calendar.is_none());
        assert_eq!(dashboard.error.as_deref(), Some(SYNTHESIS_FAILED));
    }

    #[tokio::test]
    async fn test_calendar_failure_leaves_content_result() {
        let mut dashboard = Dashboard::new();
        let state = AppState::default();
        dashboard.run_generation(&synth(ScriptedClient::ok(CONTENT_REPLY)), &state).await;

        dashboard.run_calendar(&synth(ScriptedClient::failing()), &state).await;
        assert!(dashboard.calendar.is_none());
        assert_eq!(dashboard.error.as_deref(), Some(SYNTHESIS_FAILED));
        assert_eq!(dashboard.result.as_ref().unwrap().original_posts.len(), 2);
    }

    #[tokio::test]
    async fn test_export_from_current_result() {
        let mut dashboard = Dashboard::new();
        let options = ExportOptions {
            start: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            increment: 1,
            topic: "Visa Extension".to_string(),
            format: "Facebook Post".to_string(),
            goal: "Trust-building".to_string(),
        };
        assert!(!dashboard.export_calendar(&options));

        dashboard.run_generation(&synth(ScriptedClient::ok(CONTENT_REPLY)), &AppState::default()).await;
        assert!(dashboard.export_calendar(&options));
        let calendar = dashboard.calendar.as_ref().unwrap();
        assert_eq!(calendar.entries.len(), 2);
        assert_eq!(calendar.entries[1].date.as_deref(), Some("2026-10-17"));
        assert_eq!(calendar.entries[1].topic, "Guide");
    }
}
