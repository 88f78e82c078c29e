use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time repository metadata captured during one collection run.
///
/// Never mutated after creation; a later run supersedes it with a fresh
/// snapshot carrying a newer `collected_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub full_name: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When this snapshot was taken, also the ordering key for
    /// "latest wins" dataset selection.
    pub collected_at: DateTime<Utc>,
}

impl StatSnapshot {
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.collected_at
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({} stars, {} forks, {} open issues)",
            self.full_name, self.stars, self.forks, self.open_issues
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> StatSnapshot {
        StatSnapshot {
            full_name: "tensorflow/tensorflow".to_string(),
            stars: 185_000,
            forks: 74_000,
            watchers: 185_000,
            open_issues: 2_100,
            language: Some("C++".to_string()),
            description: Some("An ML framework".to_string()),
            created_at: Utc.with_ymd_and_hms(2015, 11, 7, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            collected_at: Utc.with_ymd_and_hms(2026, 8, 2, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_includes_headline_counts() {
        let s = snapshot().summary();
        assert!(s.contains("tensorflow/tensorflow"));
        assert!(s.contains("185000 stars"));
    }

    #[test]
    fn roundtrips_through_json() {
        let s = snapshot();
        let json = serde_json::to_string(&s).unwrap();
        let back: StatSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
