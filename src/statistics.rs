use crate::detection::{AnalysisResult, RiskLevel};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Url,
    Message,
}

impl CheckKind {
    /// Label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Message => "Message",
        }
    }

    /// Type tag written to audit log entries.
    pub fn audit_tag(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Message => "MESSAGE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user: String,
    pub total_checks: u64,
    pub threats_detected: u64,
    pub first_check: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
}

impl UserStats {
    fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            total_checks: 0,
            threats_detected: 0,
            first_check: None,
            last_active: None,
        }
    }

    pub fn safe_checks(&self) -> u64 {
        self.total_checks.saturating_sub(self.threats_detected)
    }

    /// Share of checks that raised a threat, as a percentage rounded to two
    /// decimals. Zero when nothing has been checked.
    pub fn success_rate(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        let pct = self.threats_detected as f64 / self.total_checks as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    }
}

/// One submitted URL or message and its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub user: String,
    pub kind: CheckKind,
    pub content: String,
    pub risk_level: RiskLevel,
    pub is_suspicious: bool,
    pub flags: Vec<String>,
    pub date_checked: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsData {
    #[serde(default)]
    users: BTreeMap<String, UserStats>,
    #[serde(default)]
    history: VecDeque<CheckRecord>,
}

/// Per-user counters and submission history, persisted as JSON.
pub struct StatisticsStore {
    path: PathBuf,
    max_history: usize,
    data: StatsData,
}

impl StatisticsStore {
    /// Open the store at `path`; a missing file starts an empty store.
    pub fn open<P: AsRef<Path>>(path: P, max_history: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read statistics: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse statistics: {}", path.display()))?
        } else {
            StatsData::default()
        };

        Ok(Self {
            path,
            max_history,
            data,
        })
    }

    pub fn record(
        &mut self,
        user: &str,
        kind: CheckKind,
        content: &str,
        result: &AnalysisResult,
    ) -> Result<()> {
        self.record_at(Utc::now(), user, kind, content, result)
    }

    pub fn record_at(
        &mut self,
        now: DateTime<Utc>,
        user: &str,
        kind: CheckKind,
        content: &str,
        result: &AnalysisResult,
    ) -> Result<()> {
        let stats = self
            .data
            .users
            .entry(user.to_string())
            .or_insert_with(|| UserStats::new(user));

        stats.total_checks += 1;
        if result.is_threat() {
            stats.threats_detected += 1;
        }
        stats.first_check.get_or_insert(now);
        stats.last_active = Some(now);

        self.data.history.push_back(CheckRecord {
            user: user.to_string(),
            kind,
            content: content.to_string(),
            risk_level: result.level,
            is_suspicious: result.is_threat(),
            flags: result.flags.clone(),
            date_checked: now,
        });
        while self.data.history.len() > self.max_history {
            self.data.history.pop_front();
        }

        self.save()
    }

    pub fn user_stats(&self, user: &str) -> Option<&UserStats> {
        self.data.users.get(user)
    }

    /// All users, ordered by name.
    pub fn all_users(&self) -> impl Iterator<Item = &UserStats> {
        self.data.users.values()
    }

    /// Newest-first history, optionally restricted to one user.
    pub fn history(&self, user: Option<&str>, limit: usize) -> Vec<&CheckRecord> {
        self.data
            .history
            .iter()
            .rev()
            .filter(|record| user.map_or(true, |u| record.user == u))
            .take(limit)
            .collect()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.data = StatsData::default();
        self.save()
    }

    /// Write to a sibling temp file and rename over the target.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create stats directory: {}", parent.display())
                })?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write statistics: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace statistics: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn result(level: RiskLevel) -> AnalysisResult {
        AnalysisResult {
            level,
            flags: if level == RiskLevel::Safe {
                vec![]
            } else {
                vec!["flag".to_string()]
            },
        }
    }

    #[test]
    fn test_success_rate_and_safe_checks() {
        let mut stats = UserStats::new("alice");
        assert_eq!(stats.success_rate(), 0.0);

        stats.total_checks = 3;
        stats.threats_detected = 1;
        assert_eq!(stats.success_rate(), 33.33);
        assert_eq!(stats.safe_checks(), 2);
    }

    #[test]
    fn test_record_counts_threats_including_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = StatisticsStore::open(dir.path().join("stats.json"), 100).unwrap();

        store
            .record("alice", CheckKind::Url, "https://example.com", &result(RiskLevel::Safe))
            .unwrap();
        store
            .record("alice", CheckKind::Url, "http://x.tk", &result(RiskLevel::Suspicious))
            .unwrap();
        store
            .record("alice", CheckKind::Url, "http://[::1", &result(RiskLevel::Error))
            .unwrap();

        let stats = store.user_stats("alice").unwrap();
        assert_eq!(stats.total_checks, 3);
        assert_eq!(stats.threats_detected, 2);
        assert!(store.user_stats("bob").is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");

        {
            let mut store = StatisticsStore::open(&path, 100).unwrap();
            store
                .record("bob", CheckKind::Message, "ssn please", &result(RiskLevel::Dangerous))
                .unwrap();
        }

        let store = StatisticsStore::open(&path, 100).unwrap();
        let stats = store.user_stats("bob").unwrap();
        assert_eq!(stats.threats_detected, 1);
        let history = store.history(None, 10);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, CheckKind::Message);
        assert!(history[0].is_suspicious);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_history_is_newest_first_filtered_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = StatisticsStore::open(dir.path().join("stats.json"), 3).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for (i, user) in ["a", "b", "a", "b", "a"].iter().enumerate() {
            store
                .record_at(
                    start + Duration::minutes(i as i64),
                    user,
                    CheckKind::Url,
                    &format!("https://example.com/{i}"),
                    &result(RiskLevel::Safe),
                )
                .unwrap();
        }

        let all: Vec<_> = store
            .history(None, 10)
            .iter()
            .map(|r| r.content.clone())
            .collect();
        assert_eq!(
            all,
            vec![
                "https://example.com/4",
                "https://example.com/3",
                "https://example.com/2"
            ]
        );

        let only_a = store.history(Some("a"), 1);
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].content, "https://example.com/4");

        // Counters are not affected by history eviction.
        assert_eq!(store.user_stats("a").unwrap().total_checks, 3);
        assert_eq!(store.user_stats("a").unwrap().first_check, Some(start));
    }

    #[test]
    fn test_reset_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let mut store = StatisticsStore::open(&path, 10).unwrap();
        store
            .record("alice", CheckKind::Url, "http://x.tk", &result(RiskLevel::Suspicious))
            .unwrap();

        store.reset().unwrap();
        assert_eq!(store.all_users().count(), 0);

        let reopened = StatisticsStore::open(&path, 10).unwrap();
        assert!(reopened.history(None, 10).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StatisticsStore::open(&path, 10).err().unwrap();
        assert!(err.to_string().contains("Failed to parse statistics"));
    }
}
