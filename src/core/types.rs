use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EngineError;

/// Service categories offered by the brand. Topics and training keys come from here.
pub const CATEGORIES: [&str; 11] = [
    "Visa Extension",
    "TDAC Registration",
    "TM30 Service",
    "Letter Service",
    "TR Visa Support",
    "Airport Assistant",
    "Knowledge Post",
    "Document Checklist",
    "Health Insurance",
    "Elite VIP Service",
    "Arrival Tips",
];

/// Named emoji palettes the user can pick from.
pub const EMOJI_SETS: [(&str, &str); 5] = [
    ("travel", "✈️🛂📄✅"),
    ("trust", "🤝🛡️✅📌"),
    ("urgent", "⏰⚠️📢🔥"),
    ("luxury", "💎✨🥂👑"),
    ("friendly", "😊🙏💬🌸"),
];

/// Resolve user input to a canonical category name (case-insensitive).
pub fn resolve_category(input: &str) -> Option<&'static str> {
    let needle = input.trim();
    CATEGORIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(needle))
}

pub fn is_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

pub fn emoji_set(name: &str) -> Option<&'static str> {
    EMOJI_SETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, set)| *set)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentFormat {
    #[serde(rename = "Facebook Post")]
    Facebook,
    #[serde(rename = "TikTok Caption")]
    TikTok,
    #[serde(rename = "Carousel Script (5 slides)")]
    Carousel,
    #[serde(rename = "Reply to Comment")]
    Reply,
    #[serde(rename = "DM Auto-Reply")]
    Dm,
    #[serde(rename = "Ad Copy (Primary + Headline + Description)")]
    AdCopy,
    #[serde(rename = "Detailed Article")]
    Article,
    #[serde(rename = "Whitepaper Guide")]
    Whitepaper,
    #[serde(rename = "Formal Press Release")]
    PressRelease,
}

impl ContentFormat {
    pub fn all() -> [ContentFormat; 9] {
        [
            ContentFormat::Facebook,
            ContentFormat::TikTok,
            ContentFormat::Carousel,
            ContentFormat::Reply,
            ContentFormat::Dm,
            ContentFormat::AdCopy,
            ContentFormat::Article,
            ContentFormat::Whitepaper,
            ContentFormat::PressRelease,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentFormat::Facebook => "Facebook Post",
            ContentFormat::TikTok => "TikTok Caption",
            ContentFormat::Carousel => "Carousel Script (5 slides)",
            ContentFormat::Reply => "Reply to Comment",
            ContentFormat::Dm => "DM Auto-Reply",
            ContentFormat::AdCopy => "Ad Copy (Primary + Headline + Description)",
            ContentFormat::Article => "Detailed Article",
            ContentFormat::Whitepaper => "Whitepaper Guide",
            ContentFormat::PressRelease => "Formal Press Release",
        }
    }

    /// Article-style formats that carry a sectioned body.
    pub fn is_long_form(&self) -> bool {
        matches!(self, ContentFormat::Article | ContentFormat::Whitepaper)
    }
}

impl FromStr for ContentFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facebook" | "fb" | "facebook post" => Ok(ContentFormat::Facebook),
            "tiktok" | "tiktok caption" => Ok(ContentFormat::TikTok),
            "carousel" | "carousel script (5 slides)" => Ok(ContentFormat::Carousel),
            "reply" | "comment" | "reply to comment" => Ok(ContentFormat::Reply),
            "dm" | "dm auto-reply" => Ok(ContentFormat::Dm),
            "ad" | "ad-copy" | "ads" => Ok(ContentFormat::AdCopy),
            "article" | "detailed article" => Ok(ContentFormat::Article),
            "whitepaper" | "whitepaper guide" => Ok(ContentFormat::Whitepaper),
            "press" | "press-release" | "formal press release" => Ok(ContentFormat::PressRelease),
            _ => Err(EngineError::Parse(format!(
                "Unknown format: {}. Use: facebook, tiktok, carousel, reply, dm, ad, article, whitepaper, press",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentLength {
    #[serde(rename = "Short (Snappy & Concise)")]
    Short,
    #[serde(rename = "Medium (Balanced & Informative)")]
    Medium,
    #[serde(rename = "Long (Detailed & Comprehensive)")]
    Long,
}

impl ContentLength {
    pub fn label(&self) -> &'static str {
        match self {
            ContentLength::Short => "Short (Snappy & Concise)",
            ContentLength::Medium => "Medium (Balanced & Informative)",
            ContentLength::Long => "Long (Detailed & Comprehensive)",
        }
    }

    /// Size the generator must keep each draft to.
    pub fn directive(&self) -> &'static str {
        match self {
            ContentLength::Short => "3-4 sentences",
            ContentLength::Medium => "2-3 paragraphs",
            ContentLength::Long => "4 or more paragraphs",
        }
    }
}

impl FromStr for ContentLength {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "s" => Ok(ContentLength::Short),
            "medium" | "m" => Ok(ContentLength::Medium),
            "long" | "l" => Ok(ContentLength::Long),
            _ => Err(EngineError::Parse(format!(
                "Unknown length: {}. Use: short, medium, long",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Calm,
    #[serde(rename = "Luxury VIP")]
    Luxury,
    Friendly,
    Professional,
    Urgent,
    Serious,
    #[serde(rename = "Authoritative/Legal")]
    Authoritative,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Calm => "Calm",
            Tone::Luxury => "Luxury VIP",
            Tone::Friendly => "Friendly",
            Tone::Professional => "Professional",
            Tone::Urgent => "Urgent",
            Tone::Serious => "Serious",
            Tone::Authoritative => "Authoritative/Legal",
        }
    }
}

impl FromStr for Tone {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Tone::Calm),
            "luxury" | "vip" | "luxury vip" => Ok(Tone::Luxury),
            "friendly" => Ok(Tone::Friendly),
            "professional" | "pro" => Ok(Tone::Professional),
            "urgent" => Ok(Tone::Urgent),
            "serious" => Ok(Tone::Serious),
            "authoritative" | "legal" | "authoritative/legal" => Ok(Tone::Authoritative),
            _ => Err(EngineError::Parse(format!(
                "Unknown tone: {}. Use: calm, luxury, friendly, professional, urgent, serious, legal",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Awareness,
    #[serde(rename = "Lead Generation")]
    Lead,
    #[serde(rename = "Trust-building")]
    Trust,
    #[serde(rename = "FAQ/Educational")]
    Faq,
    #[serde(rename = "Establishing Authority")]
    Authority,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Awareness => "Awareness",
            Intent::Lead => "Lead Generation",
            Intent::Trust => "Trust-building",
            Intent::Faq => "FAQ/Educational",
            Intent::Authority => "Establishing Authority",
        }
    }
}

impl FromStr for Intent {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "awareness" => Ok(Intent::Awareness),
            "lead" | "leads" | "lead generation" => Ok(Intent::Lead),
            "trust" | "trust-building" => Ok(Intent::Trust),
            "faq" | "educational" | "faq/educational" => Ok(Intent::Faq),
            "authority" | "establishing authority" => Ok(Intent::Authority),
            _ => Err(EngineError::Parse(format!(
                "Unknown intent: {}. Use: awareness, lead, trust, faq, authority",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Burmese,
    Thai,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Burmese => "Burmese",
            Language::Thai => "Thai",
        }
    }

    /// Editor persona qualifier, e.g. "Myanmar (Burmese)".
    pub fn market(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Burmese => "Myanmar (Burmese)",
            Language::Thai => "Thai",
        }
    }

    /// Native formal markers used for the legal register.
    pub fn legal_markers(&self) -> &'static [&'static str] {
        match self {
            Language::English => &["pursuant to", "in accordance with the regulations"],
            Language::Burmese => &["ဥပဒေအရ", "စည်းမျဉ်းစည်းကမ်းနှင့်အညီ"],
            Language::Thai => &["ตามกฎหมาย", "ตามระเบียบข้อบังคับ"],
        }
    }

    /// Canned apology shown when a reply cannot be drafted.
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            Language::English => "We apologize. We are unable to respond to your inquiry right now.",
            Language::Burmese => "တောင်းပန်ပါသည်။ ပြန်လည်ဖြေကြားရန် အဆင်မပြေဖြစ်နေပါသည်။",
            Language::Thai => "ขออภัย ขณะนี้ไม่สามารถตอบกลับได้",
        }
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "burmese" | "myanmar" | "my" => Ok(Language::Burmese),
            "thai" | "th" => Ok(Language::Thai),
            _ => Err(EngineError::Parse(format!(
                "Unknown language: {}. Use: english, burmese, thai",
                s
            ))),
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(ContentFormat, ContentLength, Tone, Intent, Language);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub keyword: String,
    pub fact: String,
}

impl KnowledgeEntry {
    pub fn new(keyword: impl Into<String>, fact: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            keyword: keyword.into(),
            fact: fact.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub hook: String,
    pub body: String,
    pub cta: String,
    pub emojis: String,
    pub hashtags: String,
}

impl GeneratedPost {
    /// Hook, body and call to action, as copied from a draft card.
    pub fn full_text(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.hook, self.body, self.cta)
    }

    /// Complete post including title and hashtags.
    pub fn share_text(&self) -> String {
        let title = self
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("{}\n\n", t))
            .unwrap_or_default();
        format!(
            "{}{}\n\n{}\n\n{}\n\n{}",
            title, self.hook, self.body, self.cta, self.hashtags
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneVariant {
    pub tone: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleVariant {
    pub style: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub patterns: Vec<Pattern>,
    pub original_posts: Vec<GeneratedPost>,
    pub tone_variants: Vec<ToneVariant>,
    pub style_variants: Vec<StyleVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub topic: String,
    pub format: String,
    pub hook: String,
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResult {
    pub month_name: String,
    pub entries: Vec<CalendarEntry>,
}
