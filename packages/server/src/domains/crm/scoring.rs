//! Initial lead scoring.
//!
//! The first score comes from data completeness plus source quality;
//! conversation-driven deltas take over from there.

use crate::domains::leads::models::{clamp_score, LeadSource};

/// Inputs the initial score is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub company: Option<&'a str>,
    pub source: LeadSource,
}

/// Compute the initial score in [0, 5]: name on file earns 1.0, email
/// 0.5, company 0.3, and the source adds 2.0 for historically strong
/// channels or 1.0 otherwise.
pub fn initial_score(inputs: ScoreInputs<'_>) -> f64 {
    let mut score = 0.0;
    if inputs.name.is_some_and(|n| !n.trim().is_empty()) {
        score += 1.0;
    }
    if inputs.email.is_some_and(|e| !e.trim().is_empty()) {
        score += 0.5;
    }
    if inputs.company.is_some_and(|c| !c.trim().is_empty()) {
        score += 0.3;
    }
    score += if inputs.source.is_high_quality() {
        2.0
    } else {
        1.0
    };
    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_profile_from_referral_scores_high() {
        let score = initial_score(ScoreInputs {
            name: Some("أحمد علي"),
            email: Some("ahmed@example.com"),
            company: Some("النور للعقارات"),
            source: LeadSource::Referral,
        });
        assert_eq!(score, 3.8);
    }

    #[test]
    fn bare_phone_from_hunt_scores_low() {
        let score = initial_score(ScoreInputs {
            name: None,
            email: None,
            company: None,
            source: LeadSource::Hunt,
        });
        assert_eq!(score, 1.0);
    }

    #[test]
    fn blank_strings_do_not_count_as_data() {
        let score = initial_score(ScoreInputs {
            name: Some("  "),
            email: None,
            company: None,
            source: LeadSource::Manual,
        });
        assert_eq!(score, 1.0);
    }

    #[test]
    fn score_never_exceeds_the_band() {
        let score = initial_score(ScoreInputs {
            name: Some("a"),
            email: Some("a@b.c"),
            company: Some("c"),
            source: LeadSource::GoogleAd,
        });
        assert!(score <= 5.0);
    }
}
