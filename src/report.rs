//! Per-asset outcomes aggregated over one processing run

use serde::Serialize;

/// What happened to a single asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AssetOutcome {
    /// Rewritten
    Success,
    /// Present and already in the wanted state
    Unchanged,
    /// Optional asset not present
    SkippedOptional,
    /// Best-effort step failed; the run carried on
    FailedBestEffort(String),
    /// Step failed; the run carried on with the next asset
    Failed(String),
}

/// One entry of a [`BatchReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub file: String,
    #[serde(flatten)]
    pub outcome: AssetOutcome,
}

/// Everything a run did, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Directory that was actually processed (the copy, if one was made)
    pub directory: Option<String>,
    pub assets: Vec<AssetRecord>,
    /// Hi-res files that were removed
    pub deleted: Vec<String>,
    /// Compositing stopped early (missing overlay)
    pub aborted: Option<String>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file: impl Into<String>, outcome: AssetOutcome) {
        self.assets.push(AssetRecord { file: file.into(), outcome });
    }

    /// Outcome recorded for `file`, if any (the latest one wins)
    pub fn outcome(&self, file: &str) -> Option<&AssetOutcome> {
        self.assets.iter().rev().find(|r| r.file == file).map(|r| &r.outcome)
    }

    pub fn count(&self, pred: impl Fn(&AssetOutcome) -> bool) -> usize {
        self.assets.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Number of assets rewritten
    pub fn succeeded(&self) -> usize {
        self.count(|o| *o == AssetOutcome::Success)
    }

    /// Whether anything failed hard enough to warrant a failing exit status
    pub fn has_failures(&self) -> bool {
        self.aborted.is_some() || self.count(|o| matches!(o, AssetOutcome::Failed(_))) > 0
    }
}
