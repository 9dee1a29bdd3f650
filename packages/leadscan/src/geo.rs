//! City to sub-area expansion.
//!
//! Buyer posts name neighbourhoods, not governorates, so a hunt fans a
//! city out into its known sub-areas. Unknown cities fall back to the
//! city name itself.

/// Expand a city into its search areas.
pub fn expand_city(city: &str) -> Vec<String> {
    let areas: &[&str] = match city.trim() {
        "القاهرة" | "cairo" | "Cairo" => &[
            "التجمع الخامس",
            "مدينة نصر",
            "المعادي",
            "مصر الجديدة",
            "الزمالك",
            "وسط البلد",
        ],
        "الجيزة" | "giza" | "Giza" => &[
            "المهندسين",
            "الدقي",
            "الشيخ زايد",
            "6 أكتوبر",
            "فيصل",
            "الهرم",
        ],
        "الإسكندرية" | "الاسكندرية" | "alexandria" | "Alexandria" => &[
            "سموحة",
            "سيدي جابر",
            "ميامي",
            "العصافرة",
            "المنتزه",
        ],
        _ => return vec![city.trim().to_string()],
    };
    areas.iter().map(|a| a.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_expands_to_sub_areas() {
        let areas = expand_city("القاهرة");
        assert!(areas.len() > 1);
        assert!(areas.contains(&"التجمع الخامس".to_string()));
    }

    #[test]
    fn latin_aliases_expand_too() {
        assert_eq!(expand_city("cairo"), expand_city("القاهرة"));
    }

    #[test]
    fn unknown_city_falls_back_to_itself() {
        assert_eq!(expand_city("أسوان"), vec!["أسوان"]);
    }

    #[test]
    fn fallback_trims_whitespace() {
        assert_eq!(expand_city("  طنطا "), vec!["طنطا"]);
    }
}
