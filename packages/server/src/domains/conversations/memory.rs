//! Best-effort per-lead conversation memory.
//!
//! Holds the most recent turn notes in process, capped at 100 per lead
//! with oldest-first eviction. The durable audit trail lives in
//! `conversation_turns`; this cache only serves trend analysis.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::agent::Sentiment;

/// Cap on remembered turns per lead.
const MAX_TURNS_PER_LEAD: usize = 100;

/// The slice of a turn that trend analysis needs.
#[derive(Debug, Clone)]
pub struct TurnNote {
    pub at: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub opportunity_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    High,
    Medium,
    Low,
}

/// Conversation trajectory over a recent window.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub trend: Trend,
    pub avg_opportunity_score: f64,
    pub positive_ratio: f64,
    pub engagement: Engagement,
    pub total_turns: usize,
}

impl TrendReport {
    fn empty() -> Self {
        Self {
            trend: Trend::NoData,
            avg_opportunity_score: 0.0,
            positive_ratio: 0.0,
            engagement: Engagement::Low,
            total_turns: 0,
        }
    }
}

/// In-process turn cache keyed by lead id.
#[derive(Default)]
pub struct ConversationMemory {
    inner: Mutex<HashMap<Uuid, VecDeque<TurnNote>>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a turn, evicting the oldest past the cap.
    pub fn push(&self, lead_id: Uuid, note: TurnNote) {
        let mut inner = self.inner.lock().expect("memory mutex poisoned");
        let turns = inner.entry(lead_id).or_default();
        turns.push_back(note);
        while turns.len() > MAX_TURNS_PER_LEAD {
            turns.pop_front();
        }
    }

    pub fn turn_count(&self, lead_id: Uuid) -> usize {
        self.inner
            .lock()
            .expect("memory mutex poisoned")
            .get(&lead_id)
            .map(|t| t.len())
            .unwrap_or(0)
    }

    /// Number of leads with any remembered turns.
    pub fn active_leads(&self) -> usize {
        self.inner.lock().expect("memory mutex poisoned").len()
    }

    /// Opportunity trajectory over the last `days` of remembered turns:
    /// compares the second half of the window against the first.
    pub fn trend(&self, lead_id: Uuid, days: i64) -> TrendReport {
        let inner = self.inner.lock().expect("memory mutex poisoned");
        let Some(turns) = inner.get(&lead_id) else {
            return TrendReport::empty();
        };

        let cutoff = Utc::now() - Duration::days(days);
        let recent: Vec<&TurnNote> = turns.iter().filter(|t| t.at >= cutoff).collect();
        if recent.is_empty() {
            return TrendReport::empty();
        }

        let scores: Vec<f64> = recent
            .iter()
            .map(|t| t.opportunity_score as f64)
            .collect();
        let avg = scores.iter().sum::<f64>() / scores.len() as f64;

        let trend = if scores.len() >= 2 {
            let mid = scores.len() / 2;
            let first = scores[..mid].iter().sum::<f64>() / mid as f64;
            let second = scores[mid..].iter().sum::<f64>() / (scores.len() - mid) as f64;
            if second > first + 10.0 {
                Trend::Improving
            } else if second < first - 10.0 {
                Trend::Declining
            } else {
                Trend::Stable
            }
        } else {
            Trend::Stable
        };

        let positive = recent
            .iter()
            .filter(|t| t.sentiment == Sentiment::Positive)
            .count();
        let positive_ratio = positive as f64 / recent.len() as f64;

        let engagement = match recent.len() {
            0..=1 => Engagement::Low,
            2..=4 => Engagement::Medium,
            _ => Engagement::High,
        };

        TrendReport {
            trend,
            avg_opportunity_score: (avg * 10.0).round() / 10.0,
            positive_ratio: (positive_ratio * 100.0).round() / 100.0,
            engagement,
            total_turns: recent.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(score: u8, sentiment: Sentiment, minutes_ago: i64) -> TurnNote {
        TurnNote {
            at: Utc::now() - Duration::minutes(minutes_ago),
            sentiment,
            opportunity_score: score,
        }
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let memory = ConversationMemory::new();
        let lead_id = Uuid::now_v7();
        for i in 0..120 {
            memory.push(lead_id, note(i as u8, Sentiment::Neutral, 120 - i));
        }
        assert_eq!(memory.turn_count(lead_id), 100);

        // The survivors are the most recent 100.
        let report = memory.trend(lead_id, 7);
        assert_eq!(report.total_turns, 100);
        assert!(report.avg_opportunity_score > 19.0);
    }

    #[test]
    fn no_turns_means_no_data() {
        let memory = ConversationMemory::new();
        let report = memory.trend(Uuid::now_v7(), 7);
        assert_eq!(report.trend, Trend::NoData);
        assert_eq!(report.total_turns, 0);
    }

    #[test]
    fn rising_scores_read_as_improving() {
        let memory = ConversationMemory::new();
        let lead_id = Uuid::now_v7();
        for (i, score) in [20u8, 25, 30, 70, 80, 90].iter().enumerate() {
            memory.push(lead_id, note(*score, Sentiment::Positive, 60 - i as i64));
        }
        let report = memory.trend(lead_id, 7);
        assert_eq!(report.trend, Trend::Improving);
        assert_eq!(report.engagement, Engagement::High);
        assert_eq!(report.positive_ratio, 1.0);
    }

    #[test]
    fn falling_scores_read_as_declining() {
        let memory = ConversationMemory::new();
        let lead_id = Uuid::now_v7();
        for (i, score) in [90u8, 85, 80, 30, 25, 20].iter().enumerate() {
            memory.push(lead_id, note(*score, Sentiment::Hesitant, 60 - i as i64));
        }
        assert_eq!(memory.trend(lead_id, 7).trend, Trend::Declining);
    }

    #[test]
    fn old_turns_fall_out_of_the_window() {
        let memory = ConversationMemory::new();
        let lead_id = Uuid::now_v7();
        memory.push(
            lead_id,
            TurnNote {
                at: Utc::now() - Duration::days(30),
                sentiment: Sentiment::Positive,
                opportunity_score: 90,
            },
        );
        let report = memory.trend(lead_id, 7);
        assert_eq!(report.trend, Trend::NoData);
    }
}
