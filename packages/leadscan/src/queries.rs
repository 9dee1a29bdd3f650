//! Search query generation.
//!
//! Per sub-area: site-restricted variants for the channels Egyptian
//! buyers actually post on, plus one generic buyer-intent phrasing.

/// Sites worth restricting a hunt to.
const HUNT_SITES: [&str; 3] = ["facebook.com", "olx.com.eg", "dubizzle.com.eg"];

/// Build the fixed query set for one intent/area pair. Ordering is
/// deterministic; the hunt loop depends on that.
pub fn build_queries(intent: &str, area: &str) -> Vec<String> {
    let mut queries: Vec<String> = HUNT_SITES
        .iter()
        .map(|site| format!("site:{site} \"{intent}\" \"{area}\""))
        .collect();
    queries.push(format!("مطلوب {intent} {area}"));
    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_site_variants_plus_generic() {
        let queries = build_queries("شقة للإيجار", "المعادي");
        assert_eq!(queries.len(), HUNT_SITES.len() + 1);
        assert!(queries[0].starts_with("site:facebook.com"));
        assert_eq!(queries.last().unwrap(), "مطلوب شقة للإيجار المعادي");
    }

    #[test]
    fn ordering_is_deterministic() {
        assert_eq!(
            build_queries("فيلا", "الشيخ زايد"),
            build_queries("فيلا", "الشيخ زايد")
        );
    }
}
