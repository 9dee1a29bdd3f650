//! Hunt data types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::Tier;

/// One result snippet from the search provider.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl SearchHit {
    /// Title and snippet joined; the text the classifier and extractor
    /// see.
    pub fn text(&self) -> String {
        match (&self.title, &self.snippet) {
            (Some(title), Some(snippet)) => format!("{title} {snippet}"),
            (Some(title), None) => title.clone(),
            (None, Some(snippet)) => snippet.clone(),
            (None, None) => String::new(),
        }
    }

    /// Host of the result URL, if it parses.
    pub fn domain(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()?
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
    }
}

/// How deep a hunt digs per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntMode {
    Standard,
    Deep,
}

impl HuntMode {
    /// Results requested per query.
    pub fn results_per_query(self) -> u32 {
        match self {
            HuntMode::Standard => 10,
            HuntMode::Deep => 20,
        }
    }
}

impl std::fmt::Display for HuntMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HuntMode::Standard => write!(f, "standard"),
            HuntMode::Deep => write!(f, "deep"),
        }
    }
}

impl std::str::FromStr for HuntMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" => Ok(HuntMode::Standard),
            "deep" => Ok(HuntMode::Deep),
            other => Err(format!("invalid hunt mode: {other}")),
        }
    }
}

/// What to hunt for, where, and on whose behalf.
#[derive(Debug, Clone)]
pub struct HuntPlan {
    pub intent: String,
    pub city: String,
    pub user_id: Uuid,
    pub mode: HuntMode,
}

/// A qualifying phone discovered during a hunt.
#[derive(Debug, Clone)]
pub struct LeadCandidate {
    /// Normalized 11-digit number; the store's natural key.
    pub phone: String,
    pub tier: Tier,
    /// The snippet text that qualified the number.
    pub snippet: String,
    pub source_domain: Option<String>,
    /// The intent phrase of the run that found this lead.
    pub intent: String,
    /// Staff user who started the run.
    pub user_id: Uuid,
}

/// Write-once summary of a completed run.
#[derive(Debug, Clone)]
pub struct HuntSummary {
    pub hunt_id: Uuid,
    pub intent: String,
    pub city: String,
    pub queries_executed: u32,
    pub results_scanned: u32,
    pub leads_found: u32,
    /// Distinct result domains, in discovery order.
    pub domains: Vec<String>,
    pub duration: Duration,
    pub mode: HuntMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_text_joins_title_and_snippet() {
        let hit = SearchHit {
            url: "https://facebook.com/p/1".into(),
            title: Some("مطلوب شقة".into()),
            snippet: Some("01012345678".into()),
        };
        assert_eq!(hit.text(), "مطلوب شقة 01012345678");
    }

    #[test]
    fn hit_domain_strips_www() {
        let hit = SearchHit {
            url: "https://www.olx.com.eg/ad/123".into(),
            title: None,
            snippet: None,
        };
        assert_eq!(hit.domain().as_deref(), Some("olx.com.eg"));
    }

    #[test]
    fn hit_domain_tolerates_garbage_urls() {
        let hit = SearchHit {
            url: "not a url".into(),
            title: None,
            snippet: None,
        };
        assert!(hit.domain().is_none());
    }

    #[test]
    fn mode_round_trips_through_strings() {
        let mode: HuntMode = "deep".parse().unwrap();
        assert_eq!(mode, HuntMode::Deep);
        assert_eq!(mode.to_string(), "deep");
        assert!("turbo".parse::<HuntMode>().is_err());
    }
}
