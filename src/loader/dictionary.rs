//! Localized message text for run logs

use rustc_hash::FxHashMap;

/// Localization provider
///
/// Maps message keys to display text. Missing keys fall back to the key
/// itself so a partial dictionary never breaks a run.
pub trait Dictionary: Send + Sync {
    /// Language tag, e.g. "en"
    fn lang(&self) -> &str;

    fn get(&self, key: &str) -> Option<&str>;

    fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }
}

/// Built-in English dictionary
#[derive(Debug, Clone)]
pub struct EnglishDictionary {
    entries: FxHashMap<&'static str, &'static str>,
}

const EN_ENTRIES: &[(&str, &str)] = &[
    ("run.started", "Simulation started"),
    ("run.finished", "Simulation finished"),
    ("outcome.victory", "Victory: every creep base was destroyed"),
    ("outcome.defeat", "Defeat: every colony was destroyed"),
    ("outcome.draw", "Draw: the last colony and the last creep base fell together"),
    ("outcome.tick_limit", "Tick limit reached"),
    ("colony.destroyed", "Colony destroyed"),
    ("creep_base.destroyed", "Creep base destroyed"),
];

impl EnglishDictionary {
    pub fn new() -> Self {
        EnglishDictionary {
            entries: EN_ENTRIES.iter().copied().collect(),
        }
    }
}

impl Default for EnglishDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for EnglishDictionary {
    fn lang(&self) -> &str {
        "en"
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).copied()
    }
}
