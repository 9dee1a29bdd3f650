//! Snippet quality classification.
//!
//! Ordered rule evaluation, first match wins. The blacklist is checked
//! before anything else: promotional language next to buyer vocabulary
//! still means a seller wrote the post, and a false positive costs more
//! than a dropped lead.

use serde::{Deserialize, Serialize};

/// Quality tier of a discovered snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Reject,
    Good,
    Excellent,
}

impl Tier {
    /// Whether a snippet at this tier becomes a lead.
    pub fn is_lead(self) -> bool {
        self > Tier::Reject
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Reject => write!(f, "reject"),
            Tier::Good => write!(f, "good"),
            Tier::Excellent => write!(f, "excellent"),
        }
    }
}

/// Seller / promotional / broker vocabulary. Overrides everything.
const BLACKLIST: [&str; 12] = [
    "للبيع",
    "عرض",
    "سمسار",
    "فرصة",
    "وسيط",
    "عمولة",
    "تقسيط",
    "for sale",
    "special offer",
    "broker",
    "commission",
    "installment",
];

/// Buyer-intent vocabulary.
const BUYER_INTENT: [&str; 11] = [
    "مطلوب",
    "شراء",
    "أبحث عن",
    "محتاج",
    "كاش",
    "matloob",
    "wanted",
    "looking for",
    "need",
    "cash",
    "buying",
];

/// Inquiry vocabulary: interest without a stated purchase intent.
const INQUIRY: [&str; 8] = [
    "سعر",
    "بكام",
    "كام",
    "تفاصيل",
    "price",
    "details",
    "how much",
    "متاح",
];

/// Classify a snippet by case-insensitive substring matching.
pub fn classify(text: &str) -> Tier {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, &BLACKLIST) {
        return Tier::Reject;
    }
    if contains_any(&lowered, &BUYER_INTENT) {
        return Tier::Excellent;
    }
    if contains_any(&lowered, &INQUIRY) {
        return Tier::Good;
    }
    Tier::Reject
}

fn contains_any(lowered: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| lowered.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buyer_intent_is_excellent() {
        assert_eq!(classify("مطلوب شقة في التجمع الخامس"), Tier::Excellent);
        assert_eq!(classify("looking for a 3-bedroom flat"), Tier::Excellent);
    }

    #[test]
    fn inquiry_is_good() {
        assert_eq!(classify("بكام المتر في المعادي؟"), Tier::Good);
        assert_eq!(classify("send me the price details"), Tier::Good);
    }

    #[test]
    fn blacklist_wins_over_buyer_intent() {
        // Both "للبيع" (blacklist) and "مطلوب" (buyer) present
        assert_eq!(classify("للبيع شقة مطلوب جاد فقط"), Tier::Reject);
        assert_eq!(classify("wanted? no - FOR SALE, great unit"), Tier::Reject);
    }

    #[test]
    fn seller_snippet_rejected() {
        assert_eq!(classify("للبيع شقة فرصة 01099998888"), Tier::Reject);
    }

    #[test]
    fn unmatched_text_rejected() {
        assert_eq!(classify("صباح الخير يا جماعة"), Tier::Reject);
        assert_eq!(classify(""), Tier::Reject);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("MATLOOB apartment"), classify("matloob apartment"));
        assert_eq!(classify("MATLOOB apartment"), Tier::Excellent);
        assert_eq!(classify("FOR SALE villa"), Tier::Reject);
    }

    #[test]
    fn tier_ordering_marks_leads() {
        assert!(!Tier::Reject.is_lead());
        assert!(Tier::Good.is_lead());
        assert!(Tier::Excellent.is_lead());
    }
}
