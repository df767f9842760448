use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::error::Result;
use super::state::{Action, AppState};
use super::types::{is_category, GeneratedPost, KnowledgeEntry};

pub const SNAPSHOT_FILE: &str = "authority_engine_state.json";

/// The persisted subset of `AppState`. Every field is optional so that older
/// or partial snapshots still load; absent fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<Vec<KnowledgeEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_training: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_drafts: Option<Vec<GeneratedPost>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_emoji_set: Option<String>,
}

impl Snapshot {
    pub fn capture(state: &AppState) -> Self {
        Self {
            knowledge_base: Some(state.knowledge_base.clone()),
            category_training: Some(state.category_training.clone()),
            saved_drafts: Some(state.saved_drafts.clone()),
            copy_count: Some(state.copy_count),
            copy_history: Some(state.copy_history.clone()),
            selected_emoji_set: Some(state.selected_emoji_set.clone()),
        }
    }

    /// Overlay the persisted fields on `base`. Training keys outside the
    /// category list and repeated knowledge ids (after the first) are dropped.
    pub fn merge_into(self, mut base: AppState) -> AppState {
        if let Some(knowledge) = self.knowledge_base {
            let mut seen = HashSet::new();
            base.knowledge_base = knowledge
                .into_iter()
                .filter(|k| seen.insert(k.id.clone()))
                .collect();
        }
        if let Some(training) = self.category_training {
            base.category_training = training
                .into_iter()
                .filter(|(category, _)| {
                    let known = is_category(category);
                    if !known {
                        tracing::warn!(category = %category, "dropping training for unknown category");
                    }
                    known
                })
                .collect();
        }
        if let Some(drafts) = self.saved_drafts {
            base.saved_drafts = drafts;
        }
        if let Some(count) = self.copy_count {
            base.copy_count = count;
        }
        if let Some(history) = self.copy_history {
            base.copy_history = history;
        }
        if let Some(set) = self.selected_emoji_set {
            base.selected_emoji_set = set;
        }
        base
    }
}

/// Application state plus the file it is snapshotted to.
pub struct StateStore {
    path: PathBuf,
    state: AppState,
}

impl StateStore {
    /// Hydrate from `<data_dir>/authority_engine_state.json`, merged over `defaults`.
    pub fn open(data_dir: &Path, defaults: AppState) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(SNAPSHOT_FILE);
        let state = Self::load(&path, defaults);
        Ok(Self { path, state })
    }

    /// Read a snapshot file. Missing or unreadable snapshots yield `defaults`.
    pub fn load(path: &Path, defaults: AppState) -> AppState {
        if !path.exists() {
            return defaults;
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read snapshot, using defaults");
                return defaults;
            }
        };
        if raw.trim().is_empty() {
            return defaults;
        }
        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) => snapshot.merge_into(defaults),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt snapshot, using defaults");
                defaults
            }
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reduce `action` into the state and re-snapshot.
    pub fn dispatch(&mut self, action: Action) -> Result<&AppState> {
        let current = std::mem::take(&mut self.state);
        self.state = current.reduce(action);
        self.save()?;
        Ok(&self.state)
    }

    /// Apply transient form actions without writing the snapshot.
    pub fn apply_transient(&mut self, actions: impl IntoIterator<Item = Action>) -> &AppState {
        for action in actions {
            let current = std::mem::take(&mut self.state);
            self.state = current.reduce(action);
        }
        &self.state
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&Snapshot::capture(&self.state))?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
