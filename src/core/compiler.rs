//! Turns application state into fully specified completion requests.
//!
//! Three kinds of request exist: content generation (structured), smart
//! reply (free text) and calendar planning (structured). Compilation is pure
//! and never fails.

use serde::{Deserialize, Serialize};

use super::knowledge::{select_facts, RelevancePolicy};
use super::schema::{calendar_schema, generation_result_schema, SchemaNode};
use super::state::AppState;
use super::types::{ContentFormat, KnowledgeEntry, Language, Tone, CATEGORIES};

pub const PATTERN_COUNT: usize = 3;
pub const DRAFT_COUNT: usize = 3;
pub const TONE_VARIANT_COUNT: usize = 3;
pub const STYLE_VARIANT_COUNT: usize = 2;
pub const CALENDAR_DAYS: usize = 30;
/// Copied texts fed back as style preferences.
pub const PREFERENCE_SAMPLES: usize = 3;
pub const REPLY_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Content,
    Reply,
    Calendar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    pub kind: RequestKind,
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    /// Expected reply shape; `None` means plain text.
    pub schema: Option<SchemaNode>,
    pub temperature: Option<f32>,
}

/// Model identifiers per request weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    /// Used for content generation.
    pub primary: String,
    /// Used for replies and calendar planning.
    pub fast: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            primary: "gemini-3-pro-preview".to_string(),
            fast: "gemini-3-flash-preview".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestCompiler {
    policy: RelevancePolicy,
    models: ModelSelection,
}

impl RequestCompiler {
    pub fn new(policy: RelevancePolicy, models: ModelSelection) -> Self {
        Self { policy, models }
    }

    pub fn policy(&self) -> RelevancePolicy {
        self.policy
    }

    /// Content generation request: patterns, drafts and variants for the current topic.
    pub fn compile_content(&self, state: &AppState) -> CompiledRequest {
        let facts = select_facts(&state.topic, &state.knowledge_base, self.policy);

        let mut system = String::new();
        system.push_str(&format!(
            "You are a world-class {} language editor and expert content strategist for {}.\n\n",
            state.language.market(),
            state.brand
        ));
        system.push_str(&isolation_section(&state.topic));
        system.push_str(&knowledge_section(&state.topic, &facts));
        if let Some(anchor) = style_anchor_section(&state.topic, state.training_for(&state.topic)) {
            system.push_str(&anchor);
        }
        if let Some(feedback) = preference_section(&state.copy_history) {
            system.push_str(&feedback);
        }
        system.push_str(&format!(
            "EMOJI SET:\n- Incorporate these emojis naturally: {}\n\n",
            state.selected_emoji_set
        ));
        system.push_str(&tone_section(state.tone, state.language));
        system.push_str(&format_section(state.format, state.language));
        system.push_str(
            "READABILITY & FLOW:\n\
             - Use short paragraphs and clear line breaks (\\n\\n).\n\
             - Ensure text is scannable.\n\n",
        );
        system.push_str(&format!(
            "LENGTH:\n- Each draft body must be {} ({}). Enforce this strictly.\n\n",
            state.content_length.directive(),
            state.content_length
        ));
        system.push_str(&hashtag_section(state.language));

        let competitors = if state.competitors.trim().is_empty() {
            "None. Rely on internal logic."
        } else {
            state.competitors.trim()
        };

        let prompt = format!(
            "Generate content for:\n\
             Topic: {topic}\n\
             Format: {format}\n\
             Tone: {tone}\n\
             Intent: {intent}\n\
             Length: {length}\n\
             Audience: {audience}\n\
             Language: {language}\n\n\
             Competitor Patterns to mimic (if any): {competitors}\n\n\
             YOUR TASK:\n\
             - Exactly {patterns} Patterns: Analyze the structural logic of this service.\n\
             - Exactly {drafts} Original Drafts: ad-ready content, each with a unique id.\n\
             - Exactly {tones} tone variants and exactly {styles} style variants of the core message.\n",
            topic = state.topic,
            format = state.format,
            tone = state.tone,
            intent = state.intent,
            length = state.content_length,
            audience = state.audience,
            language = state.language,
            competitors = competitors,
            patterns = PATTERN_COUNT,
            drafts = DRAFT_COUNT,
            tones = TONE_VARIANT_COUNT,
            styles = STYLE_VARIANT_COUNT,
        );

        CompiledRequest {
            kind: RequestKind::Content,
            model: self.models.primary.clone(),
            system_instruction: system,
            prompt,
            schema: Some(generation_result_schema()),
            temperature: None,
        }
    }

    /// Smart inbox reply grounded only in the knowledge bank.
    pub fn compile_reply(&self, inquiry: &str, knowledge: &[KnowledgeEntry], brand: &str) -> CompiledRequest {
        let system = format!(
            "You are a professional assistant for {}. Answer based ONLY on verified facts. \
             Do not speculate or invent prices, durations or requirements. \
             Reuse the facts literally rather than paraphrasing creatively. \
             If the facts do not cover the question, say so politely.",
            brand
        );
        let facts = knowledge
            .iter()
            .map(|k| format!("Fact: {} - {}", k.keyword, k.fact))
            .collect::<Vec<_>>()
            .join("\n");

        CompiledRequest {
            kind: RequestKind::Reply,
            model: self.models.fast.clone(),
            system_instruction: system,
            prompt: format!("FACTS:\n{}\n\nQUESTION: \"{}\"", facts, inquiry.trim()),
            schema: None,
            temperature: Some(REPLY_TEMPERATURE),
        }
    }

    /// A fixed-length content calendar for the brand.
    pub fn compile_calendar(&self, state: &AppState) -> CompiledRequest {
        let prompt = format!(
            "Plan {days} days of strategic content for {brand}.\n\
             Return exactly {days} entries, numbered by day from 1 to {days}.\n\
             Spread the plan across these services: {categories}.\n\
             Write hooks in {language}.",
            days = CALENDAR_DAYS,
            brand = state.brand,
            categories = CATEGORIES.join(", "),
            language = state.language,
        );

        CompiledRequest {
            kind: RequestKind::Calendar,
            model: self.models.fast.clone(),
            system_instruction: "You are a senior content planner.".to_string(),
            prompt,
            schema: Some(calendar_schema()),
            temperature: None,
        }
    }
}

fn isolation_section(topic: &str) -> String {
    format!(
        "CRITICAL: SERVICE ISOLATION PROTOCOL\n\
         - You must strictly isolate the current topic: \"{topic}\".\n\
         - DO NOT mix services. If the topic is \"Airport Assistant\", DO NOT mention TM30 or Visa Extensions unless explicitly requested.\n\
         - Treat each service as a distinct business vertical.\n\
         - Ignore mismatched facts from the Knowledge Bank. If a fact keyword is \"TM30\" and the topic is \"Airport\", DISCARD that fact.\n\n"
    )
}

fn knowledge_section(topic: &str, facts: &[&KnowledgeEntry]) -> String {
    let mut section = format!(
        "KNOWLEDGE BANK INTEGRATION:\n\
         - ONLY integrate the following facts if they are SEMANTICALLY RELEVANT to \"{}\":\n",
        topic
    );
    if facts.is_empty() {
        section.push_str("(No verified facts available for this topic. Do not invent any.)\n");
    }
    for fact in facts {
        section.push_str(&format!("[Fact for {}]: {}\n", fact.keyword, fact.fact));
    }
    section.push('\n');
    section
}

fn style_anchor_section(topic: &str, samples: &[String]) -> Option<String> {
    let samples: Vec<&String> = samples.iter().filter(|s| !s.trim().is_empty()).collect();
    if samples.is_empty() {
        return None;
    }
    let joined = samples
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Sample {}:\n{}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n---\n");
    Some(format!(
        "SPECIFIC CATEGORY STYLE ANCHOR (Replicate this exact rhythm for {}):\n{}\n\n\
         MANDATORY STYLE REPLICATION:\n\
         1. Replicate emoji density and placement.\n\
         2. Replicate the specific level of technicality/politeness.\n\
         3. Replicate the typical persuasive flow.\n\n",
        topic, joined
    ))
}

fn preference_section(history: &[String]) -> Option<String> {
    if history.is_empty() {
        return None;
    }
    let start = history.len().saturating_sub(PREFERENCE_SAMPLES);
    let samples = history[start..]
        .iter()
        .map(|text| format!("Sample:\n{}", text))
        .collect::<Vec<_>>()
        .join("\n---\n");
    Some(format!(
        "USER PREFERENCE FEEDBACK (texts the user chose to copy; lean toward this style):\n{}\n\n",
        samples
    ))
}

fn tone_section(tone: Tone, language: Language) -> String {
    let mut section = format!("TONE SPECIALIZATION:\n- Base Tone: {}.\n", tone);
    if tone == Tone::Authoritative {
        let markers = language
            .legal_markers()
            .iter()
            .map(|m| format!("\"{}\"", m))
            .collect::<Vec<_>>()
            .join(", ");
        section.push_str(&format!(
            "- MANDATORY formal legal register: use highly formal, precise {} legal terminology (e.g., {}).\n\
             - Avoid conversational particles and casual discourse markers.\n",
            language, markers
        ));
    }
    section.push('\n');
    section
}

fn format_section(format: ContentFormat, language: Language) -> String {
    let mut section = format!("FORMAT SPECIALIZATION:\n- Base Format: {}.\n", format);
    match format {
        ContentFormat::Article | ContentFormat::Whitepaper => section.push_str(
            "- MANDATORY STRUCTURE, expressed inside the `body` field:\n\
             1. Title (also set the `title` field).\n\
             2. Lead paragraph that frames the problem.\n\
             3. 2-3 subheadings, each marking a distinct section with a line starting \"## \".\n\
             4. Body content under every subheading.\n\
             5. Closing summary under a final \"## Conclusion\" marker.\n",
        ),
        ContentFormat::PressRelease => section.push_str(&format!(
            "- Use the standard press release structure: [City], [Date] - [Headline], [Body], [Media Contact/Boilerplate].\n\
             - Use diplomatic {} prose.\n",
            language
        )),
        ContentFormat::Carousel => section.push_str(
            "- Split the body into exactly 5 slides, each starting with \"Slide n:\".\n",
        ),
        ContentFormat::AdCopy => section.push_str(
            "- Label the body sections \"Primary text:\", \"Headline:\" and \"Description:\".\n",
        ),
        _ => {}
    }
    section.push('\n');
    section
}

fn hashtag_section(language: Language) -> String {
    let mix = match language {
        Language::English => "English".to_string(),
        other => format!("{} and English", other),
    };
    format!("HASHTAG STRATEGY:\n- Generate 5-8 relevant hashtags mixing {}.\n", mix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Action;
    use crate::core::types::ContentLength;

    fn compiler(policy: RelevancePolicy) -> RequestCompiler {
        RequestCompiler::new(policy, ModelSelection::default())
    }

    #[test]
    fn test_strict_policy_excludes_other_services() {
        let state = AppState::default().reduce(Action::SelectTopic("Visa Extension".to_string()));
        let request = compiler(RelevancePolicy::Strict).compile_content(&state);
        assert!(request.system_instruction.contains("[Fact for TR Visa Extension Price]"));
        assert!(!request.system_instruction.contains("[Fact for TM30 Service]"));
        assert!(!request.system_instruction.contains("[Fact for Letter Service]"));
    }

    #[test]
    fn test_advisory_policy_keeps_facts_with_isolation_rule() {
        let state = AppState::default();
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        assert!(request.system_instruction.contains("[Fact for TM30 Service]"));
        assert!(request.system_instruction.contains("SERVICE ISOLATION PROTOCOL"));
        assert!(request.system_instruction.contains("\"Visa Extension\""));
    }

    #[test]
    fn test_long_article_structure() {
        let state = AppState::default()
            .reduce(Action::SetFormat(ContentFormat::Article))
            .reduce(Action::SetLength(ContentLength::Long));
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        let system = &request.system_instruction;
        assert!(system.contains("Title"));
        assert!(system.contains("Lead paragraph"));
        assert!(system.contains("2-3 subheadings"));
        assert!(system.contains("Body content"));
        assert!(system.contains("Conclusion"));
        assert!(system.contains("`body` field"));
        assert!(system.contains("4 or more paragraphs"));
    }

    #[test]
    fn test_short_form_has_no_section_template() {
        let request = compiler(RelevancePolicy::Advisory).compile_content(&AppState::default());
        assert!(!request.system_instruction.contains("MANDATORY STRUCTURE"));
        assert!(request.system_instruction.contains("2-3 paragraphs"));
    }

    #[test]
    fn test_style_anchor_omitted_without_samples() {
        let state = AppState::default().reduce(Action::AddTrainingSample {
            category: "TM30 Service".to_string(),
            sample: "other category sample".to_string(),
        });
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        assert!(!request.system_instruction.contains("STYLE ANCHOR"));
        assert!(!request.system_instruction.contains("other category sample"));
    }

    #[test]
    fn test_style_anchor_includes_samples_verbatim() {
        let state = AppState::default()
            .reduce(Action::AddTrainingSample {
                category: "Visa Extension".to_string(),
                sample: "🛂 ၃၀ ရက် ထပ်တိုး".to_string(),
            })
            .reduce(Action::AddTrainingSample {
                category: "Visa Extension".to_string(),
                sample: "✅ second".to_string(),
            });
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        let system = &request.system_instruction;
        assert!(system.contains("Sample 1:\n🛂 ၃၀ ရက် ထပ်တိုး\n---\nSample 2:\n✅ second"));
        assert!(system.contains("emoji density"));
    }

    #[test]
    fn test_preference_feedback_uses_last_three() {
        let mut state = AppState::default();
        for i in 1..=5 {
            state = state.reduce(Action::RecordCopy(format!("copied-{}", i)));
        }
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        let system = &request.system_instruction;
        assert!(system.contains("USER PREFERENCE FEEDBACK"));
        assert!(!system.contains("copied-2"));
        assert!(system.contains("copied-3"));
        assert!(system.contains("copied-5"));

        let request = compiler(RelevancePolicy::Advisory).compile_content(&AppState::default());
        assert!(!request.system_instruction.contains("USER PREFERENCE FEEDBACK"));
    }

    #[test]
    fn test_legal_tone_uses_native_markers() {
        let state = AppState::default().reduce(Action::SetTone(Tone::Authoritative));
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        assert!(request.system_instruction.contains("ဥပဒေအရ"));
        assert!(request.system_instruction.contains("conversational particles"));

        let calm = compiler(RelevancePolicy::Advisory).compile_content(&AppState::default());
        assert!(!calm.system_instruction.contains("legal register"));
    }

    #[test]
    fn test_content_prompt_counts_and_schema() {
        let state = AppState::default().reduce(Action::SetCompetitors("Rival: cheap visas!".to_string()));
        let request = compiler(RelevancePolicy::Advisory).compile_content(&state);
        assert_eq!(request.kind, RequestKind::Content);
        assert_eq!(request.model, "gemini-3-pro-preview");
        assert!(request.prompt.contains("Exactly 3 Patterns"));
        assert!(request.prompt.contains("Exactly 3 Original Drafts"));
        assert!(request.prompt.contains("Exactly 3 tone variants"));
        assert!(request.prompt.contains("exactly 2 style variants"));
        assert!(request.prompt.contains("Rival: cheap visas!"));
        assert_eq!(request.schema, Some(generation_result_schema()));
        assert!(request.system_instruction.contains("5-8 relevant hashtags mixing Burmese and English"));
        assert!(request.system_instruction.contains(&state.selected_emoji_set));
        assert!(request.system_instruction.contains("Thailand Easy Pass"));
    }

    #[test]
    fn test_reply_request() {
        let state = AppState::default();
        let request = compiler(RelevancePolicy::Strict).compile_reply(
            "  How much is a visa extension? ",
            &state.knowledge_base,
            &state.brand,
        );
        assert_eq!(request.kind, RequestKind::Reply);
        assert!(request.schema.is_none());
        assert_eq!(request.temperature, Some(REPLY_TEMPERATURE));
        assert_eq!(request.model, "gemini-3-flash-preview");
        assert!(request.system_instruction.contains("ONLY on verified facts"));
        assert!(request.prompt.contains("Fact: TR Visa Extension Price - TR Visa extension costs 1,900 THB"));
        assert!(request.prompt.ends_with("QUESTION: \"How much is a visa extension?\""));
    }

    #[test]
    fn test_calendar_request() {
        let request = compiler(RelevancePolicy::Advisory).compile_calendar(&AppState::default());
        assert_eq!(request.kind, RequestKind::Calendar);
        assert!(request.prompt.starts_with("Plan 30 days of strategic content for Thailand Easy Pass"));
        assert_eq!(request.schema, Some(calendar_schema()));
        assert_eq!(request.system_instruction, "You are a senior content planner.");
    }
}
