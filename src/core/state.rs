use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{
    is_category, ContentFormat, ContentLength, GeneratedPost, Intent, KnowledgeEntry, Language,
    Tone, CATEGORIES, EMOJI_SETS,
};

/// Most recent copied texts kept as preference signals.
pub const COPY_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub brand: String,
    pub audience: String,
    pub competitors: String,
    pub topic: String,
    pub format: ContentFormat,
    pub content_length: ContentLength,
    pub tone: Tone,
    pub intent: Intent,
    pub language: Language,
    pub top_categories: Vec<String>,
    pub knowledge_base: Vec<KnowledgeEntry>,
    pub copy_history: Vec<String>,
    pub copy_count: u64,
    pub category_training: BTreeMap<String, Vec<String>>,
    pub saved_drafts: Vec<GeneratedPost>,
    pub selected_emoji_set: String,
}

fn default_knowledge() -> Vec<KnowledgeEntry> {
    let seed = [
        ("1", "TR Visa Extension Price", "TR Visa extension costs 1,900 THB for the official fee. Service fee is additional depending on document support."),
        ("2", "Extension Duration", "A Tourist Visa (TR) can usually be extended for an additional 30 days."),
        ("3", "Documents Needed", "Requires Passport, TM6 (if applicable), TM30 notification, and a 4x6 photo."),
        ("4", "TDAC Registration", "TDAC registration is required for workers. We assist in the submission process to ensure correct data entry."),
        ("5", "TM30 Service", "TM30 Form အမြန်ရရှိရေး ဝန်ဆောင်မှု။ ၁၅ မိနစ်အတွင်း အပြီးအစီး ဆောင်ရွက်ပေးသည်။ ဝန်ဆောင်ခ ၁၅၀ ဘတ် (150 THB) သာ ကျသင့်မည်။ လိုအပ်သော စာရွက်စာတမ်းများမှာ - အိမ်ရှင်၏ ID၊ အိမ်လိပ်စာ အပြည့်အစုံ နှင့် အိမ်လိပ်စာချုပ် (House Contract) တို့ ဖြစ်ပါသည်။"),
        ("6", "Letter Service", "သံရုံးထောက်ခံစာ (Embassy Letter) နှင့် အခြား လိုအပ်သော ထောက်ခံစာများအား ကျွမ်းကျင်စွာ စီစဉ်ဆောင်ရွက်ပေးပါသည်။"),
    ];
    seed.iter()
        .map(|(id, keyword, fact)| KnowledgeEntry {
            id: id.to_string(),
            keyword: keyword.to_string(),
            fact: fact.to_string(),
        })
        .collect()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            brand: "Thailand Easy Pass / Easy Visa For Myanmar".to_string(),
            audience: "Myanmar travelers to Thailand".to_string(),
            competitors: String::new(),
            topic: CATEGORIES[0].to_string(),
            format: ContentFormat::Facebook,
            content_length: ContentLength::Medium,
            tone: Tone::Calm,
            intent: Intent::Trust,
            language: Language::Burmese,
            top_categories: vec![
                "Visa Extension".to_string(),
                "TDAC Registration".to_string(),
                "TR Visa Support".to_string(),
                "Airport Assistant".to_string(),
                "Knowledge Post".to_string(),
            ],
            knowledge_base: default_knowledge(),
            copy_history: Vec::new(),
            copy_count: 0,
            category_training: BTreeMap::new(),
            saved_drafts: Vec::new(),
            selected_emoji_set: EMOJI_SETS[0].1.to_string(),
        }
    }
}

/// One user action against the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTopic(String),
    SetFormat(ContentFormat),
    SetLength(ContentLength),
    SetTone(Tone),
    SetIntent(Intent),
    SetLanguage(Language),
    SetBrand(String),
    SetCompetitors(String),
    SelectEmojiSet(String),
    AddKnowledge { keyword: String, fact: String },
    RemoveKnowledge(String),
    AddTrainingSample { category: String, sample: String },
    RemoveTrainingSample { category: String, index: usize },
    SaveDraft(GeneratedPost),
    DeleteDraft(String),
    RecordCopy(String),
    /// Clears the form back to defaults while keeping learned data.
    ResetWorkspace,
}

impl AppState {
    /// Apply `action` and return the next state. Guarded inputs (blank text,
    /// unknown category or index) leave the state as it was.
    pub fn reduce(mut self, action: Action) -> AppState {
        match action {
            Action::SelectTopic(topic) => {
                if !topic.trim().is_empty() {
                    self.topic = topic;
                }
            }
            Action::SetFormat(format) => self.format = format,
            Action::SetLength(length) => self.content_length = length,
            Action::SetTone(tone) => self.tone = tone,
            Action::SetIntent(intent) => self.intent = intent,
            Action::SetLanguage(language) => self.language = language,
            Action::SetBrand(brand) => {
                if !brand.trim().is_empty() {
                    self.brand = brand;
                }
            }
            Action::SetCompetitors(text) => self.competitors = text,
            Action::SelectEmojiSet(set) => {
                if !set.trim().is_empty() {
                    self.selected_emoji_set = set;
                }
            }
            Action::AddKnowledge { keyword, fact } => {
                if !keyword.trim().is_empty() && !fact.trim().is_empty() {
                    self.knowledge_base.push(KnowledgeEntry::new(keyword, fact));
                }
            }
            Action::RemoveKnowledge(id) => self.knowledge_base.retain(|k| k.id != id),
            Action::AddTrainingSample { category, sample } => {
                if is_category(&category) && !sample.trim().is_empty() {
                    self.category_training.entry(category).or_default().push(sample);
                }
            }
            Action::RemoveTrainingSample { category, index } => {
                if let Some(samples) = self.category_training.get_mut(&category) {
                    if index < samples.len() {
                        samples.remove(index);
                    }
                    if samples.is_empty() {
                        self.category_training.remove(&category);
                    }
                }
            }
            Action::SaveDraft(post) => {
                if !self.saved_drafts.iter().any(|d| d.id == post.id) {
                    self.saved_drafts.insert(0, post);
                }
            }
            Action::DeleteDraft(id) => self.saved_drafts.retain(|d| d.id != id),
            Action::RecordCopy(text) => {
                self.copy_count += 1;
                if !self.copy_history.contains(&text) {
                    self.copy_history.push(text);
                }
                if self.copy_history.len() > COPY_HISTORY_LIMIT {
                    let excess = self.copy_history.len() - COPY_HISTORY_LIMIT;
                    self.copy_history.drain(..excess);
                }
            }
            Action::ResetWorkspace => {
                let defaults = AppState::default();
                self.topic = defaults.topic;
                self.competitors = defaults.competitors;
                self.format = defaults.format;
                self.content_length = defaults.content_length;
                self.tone = defaults.tone;
                self.intent = defaults.intent;
            }
        }
        self
    }

    pub fn training_for(&self, category: &str) -> &[String] {
        self.category_training
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> GeneratedPost {
        GeneratedPost {
            id: id.to_string(),
            title: None,
            hook: format!("hook {}", id),
            body: "body".to_string(),
            cta: "cta".to_string(),
            emojis: "✅".to_string(),
            hashtags: "#visa".to_string(),
        }
    }

    #[test]
    fn test_copy_history_is_idempotent() {
        let mut state = AppState::default();
        for _ in 0..5 {
            state = state.reduce(Action::RecordCopy("same text".to_string()));
        }
        assert_eq!(state.copy_history, vec!["same text".to_string()]);
        assert_eq!(state.copy_count, 5);
    }

    #[test]
    fn test_copy_history_evicts_oldest() {
        let mut state = AppState::default();
        for i in 0..11 {
            state = state.reduce(Action::RecordCopy(format!("text {}", i)));
        }
        assert_eq!(state.copy_history.len(), COPY_HISTORY_LIMIT);
        assert_eq!(state.copy_history.first().map(String::as_str), Some("text 1"));
        assert_eq!(state.copy_history.last().map(String::as_str), Some("text 10"));
        assert_eq!(state.copy_count, 11);
    }

    #[test]
    fn test_save_draft_dedupes_and_prepends() {
        let state = AppState::default()
            .reduce(Action::SaveDraft(post("a")))
            .reduce(Action::SaveDraft(post("b")))
            .reduce(Action::SaveDraft(post("a")));
        let ids: Vec<&str> = state.saved_drafts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let state = state.reduce(Action::DeleteDraft("b".to_string()));
        assert_eq!(state.saved_drafts.len(), 1);
    }

    #[test]
    fn test_knowledge_add_remove() {
        let state = AppState::default();
        let before = state.knowledge_base.len();
        let state = state.reduce(Action::AddKnowledge {
            keyword: "Airport Pickup".to_string(),
            fact: "Meet and greet at BKK arrivals.".to_string(),
        });
        assert_eq!(state.knowledge_base.len(), before + 1);
        let id = state.knowledge_base.last().unwrap().id.clone();

        let blank = state.clone().reduce(Action::AddKnowledge {
            keyword: "  ".to_string(),
            fact: "ignored".to_string(),
        });
        assert_eq!(blank, state);

        let state = state.reduce(Action::RemoveKnowledge(id));
        assert_eq!(state.knowledge_base.len(), before);
    }

    #[test]
    fn test_training_guards_category_and_text() {
        let state = AppState::default()
            .reduce(Action::AddTrainingSample {
                category: "Visa Extension".to_string(),
                sample: "✅ Sample one".to_string(),
            })
            .reduce(Action::AddTrainingSample {
                category: "Not A Category".to_string(),
                sample: "ignored".to_string(),
            })
            .reduce(Action::AddTrainingSample {
                category: "Visa Extension".to_string(),
                sample: "   ".to_string(),
            });
        assert_eq!(state.training_for("Visa Extension").len(), 1);
        assert!(!state.category_training.contains_key("Not A Category"));

        let state = state.reduce(Action::RemoveTrainingSample {
            category: "Visa Extension".to_string(),
            index: 0,
        });
        assert!(state.training_for("Visa Extension").is_empty());
        assert!(state.category_training.is_empty());
    }

    #[test]
    fn test_reset_workspace_keeps_learned_data() {
        let state = AppState::default()
            .reduce(Action::SelectTopic("TM30 Service".to_string()))
            .reduce(Action::SetTone(Tone::Urgent))
            .reduce(Action::SetCompetitors("competitor copy".to_string()))
            .reduce(Action::RecordCopy("kept".to_string()))
            .reduce(Action::ResetWorkspace);
        assert_eq!(state.topic, "Visa Extension");
        assert_eq!(state.tone, Tone::Calm);
        assert!(state.competitors.is_empty());
        assert_eq!(state.copy_count, 1);
    }
}
