use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::EngineError;
use super::types::{KnowledgeEntry, CATEGORIES};

/// Words that appear across many service names and say nothing about which
/// service a fact belongs to.
const GENERIC_WORDS: [&str; 9] = [
    "service", "support", "post", "assistant", "the", "and", "for", "of", "a",
];

/// How knowledge-bank facts are narrowed before they reach a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevancePolicy {
    /// Every fact is passed along; the generator is told to discard mismatches.
    #[default]
    Advisory,
    /// Facts whose keyword does not name the topic are dropped before compiling.
    Strict,
}

impl fmt::Display for RelevancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevancePolicy::Advisory => write!(f, "advisory"),
            RelevancePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for RelevancePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" | "loose" => Ok(RelevancePolicy::Advisory),
            "strict" => Ok(RelevancePolicy::Strict),
            _ => Err(EngineError::Parse(format!(
                "Unknown relevance policy: {}. Use: advisory, strict",
                s
            ))),
        }
    }
}

fn significant_tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !GENERIC_WORDS.contains(&t.as_str()))
        .collect()
}

/// Whether a fact's keyword names the given topic.
///
/// The keyword either contains the whole topic phrase or shares a significant
/// token with it. A keyword that names a different category is never
/// relevant, even when the two names share a word such as "visa".
pub fn is_relevant(topic: &str, entry: &KnowledgeEntry) -> bool {
    let topic = topic.trim();
    if topic.is_empty() {
        return false;
    }
    let topic_lower = topic.to_lowercase();
    let keyword = entry.keyword.to_lowercase();
    if keyword.contains(&topic_lower) {
        return true;
    }
    let names_other_service = CATEGORIES
        .iter()
        .map(|c| c.to_lowercase())
        .any(|c| c != topic_lower && keyword.contains(&c));
    if names_other_service {
        return false;
    }
    let topic_tokens = significant_tokens(topic);
    significant_tokens(&entry.keyword)
        .iter()
        .any(|t| topic_tokens.contains(t))
}

/// Facts admissible as context for `topic`, in knowledge-base order.
pub fn select_facts<'a>(
    topic: &str,
    knowledge: &'a [KnowledgeEntry],
    policy: RelevancePolicy,
) -> Vec<&'a KnowledgeEntry> {
    match policy {
        RelevancePolicy::Advisory => knowledge.iter().collect(),
        RelevancePolicy::Strict => knowledge
            .iter()
            .filter(|entry| is_relevant(topic, entry))
            .collect(),
    }
}

/// Case-insensitive search over keywords and facts. A blank term matches all.
pub fn search_knowledge<'a>(knowledge: &'a [KnowledgeEntry], term: &str) -> Vec<&'a KnowledgeEntry> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return knowledge.iter().collect();
    }
    knowledge
        .iter()
        .filter(|k| k.keyword.to_lowercase().contains(&term) || k.fact.to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, keyword: &str, fact: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            id: id.to_string(),
            keyword: keyword.to_string(),
            fact: fact.to_string(),
        }
    }

    fn sample_bank() -> Vec<KnowledgeEntry> {
        vec![
            entry("1", "TR Visa Extension Price", "Extension costs 1,900 THB."),
            entry("2", "TM30 Service", "TM30 done in 15 minutes for 150 THB."),
            entry("3", "Letter Service", "Embassy letters arranged."),
            entry("4", "Extension Duration", "Extended for 30 more days."),
        ]
    }

    #[test]
    fn test_strict_isolates_topic() {
        let bank = sample_bank();
        let facts = select_facts("Visa Extension", &bank, RelevancePolicy::Strict);
        let ids: Vec<&str> = facts.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_categories_sharing_a_word_stay_apart() {
        let bank = vec![
            entry("1", "TR Visa Support", "TR visa paperwork handled end to end."),
            entry("2", "Visa Extension", "Extension costs 1,900 THB."),
            entry("3", "Visa Fees", "Government fees are paid separately."),
        ];
        let ids = |topic: &str| -> Vec<String> {
            select_facts(topic, &bank, RelevancePolicy::Strict)
                .iter()
                .map(|k| k.id.clone())
                .collect()
        };
        assert_eq!(ids("Visa Extension"), vec!["2", "3"]);
        assert_eq!(ids("TR Visa Support"), vec!["1", "3"]);
    }

    #[test]
    fn test_generic_words_do_not_match() {
        let bank = sample_bank();
        let facts = select_facts("Letter Service", &bank, RelevancePolicy::Strict);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].id, "3");
    }

    #[test]
    fn test_advisory_keeps_everything() {
        let bank = sample_bank();
        let facts = select_facts("Airport Assistant", &bank, RelevancePolicy::Advisory);
        assert_eq!(facts.len(), bank.len());
    }

    #[test]
    fn test_unknown_topic_passes_through() {
        let bank = vec![entry("9", "Crypto Tips", "Not financial advice.")];
        assert_eq!(select_facts("Crypto Tips", &bank, RelevancePolicy::Strict).len(), 1);
        assert!(select_facts("", &bank, RelevancePolicy::Strict).is_empty());
    }

    #[test]
    fn test_search_knowledge() {
        let bank = sample_bank();
        assert_eq!(search_knowledge(&bank, "").len(), 4);
        assert_eq!(search_knowledge(&bank, "thb").len(), 2);
        assert_eq!(search_knowledge(&bank, "EMBASSY").len(), 1);
        assert!(search_knowledge(&bank, "insurance").is_empty());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("STRICT".parse::<RelevancePolicy>().unwrap(), RelevancePolicy::Strict);
        assert!("fuzzy".parse::<RelevancePolicy>().is_err());
    }
}
