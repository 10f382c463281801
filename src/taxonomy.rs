//! Query → category mapping and brand recognition.
//!
//! Both tables are intentionally coarse. They only feed display fields
//! (`category`, `brand`), never sourcing decisions.

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "mobile",
        &[
            "phone", "mobile", "smartphone", "redmi", "iphone", "samsung", "oneplus", "realme",
            "vivo", "oppo",
        ],
    ),
    (
        "laptop",
        &["laptop", "computer", "pc", "macbook", "dell", "hp", "lenovo", "asus"],
    ),
    (
        "electronics",
        &["tv", "television", "headphone", "speaker", "camera", "tablet"],
    ),
    (
        "fashion",
        &["shirt", "clothing", "fashion", "dress", "shoe", "watch", "bag"],
    ),
    (
        "home",
        &["refrigerator", "washing machine", "ac", "microwave", "furniture"],
    ),
    ("books", &["book", "novel", "textbook", "education"]),
];

const KNOWN_BRANDS: &[&str] = &[
    "Samsung", "Apple", "Xiaomi", "OnePlus", "Realme", "Vivo", "Oppo", "Nokia", "Motorola",
    "Sony", "Dell", "HP", "Lenovo", "Asus", "Acer", "MSI",
];

pub fn category_for_query(query: &str) -> &'static str {
    let query_lower = query.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| query_lower.contains(kw)) {
            return category;
        }
    }
    "general"
}

/// First recognizable brand token in the title, else the title's first
/// word, else a literal placeholder.
pub fn brand_from_title(title: &str) -> String {
    let title_upper = title.to_uppercase();
    for brand in KNOWN_BRANDS {
        if title_upper.contains(&brand.to_uppercase()) {
            return (*brand).to_string();
        }
    }
    title
        .split_whitespace()
        .next()
        .unwrap_or("Brand")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_map_to_expected_categories() {
        assert_eq!(category_for_query("redmi note 13"), "mobile");
        assert_eq!(category_for_query("gaming LAPTOP under 60000"), "laptop");
        assert_eq!(category_for_query("noise cancelling headphone"), "electronics");
        assert_eq!(category_for_query("garden hose"), "general");
    }

    #[test]
    fn brand_match_beats_first_word() {
        assert_eq!(brand_from_title("Galaxy M34 by SAMSUNG (Blue)"), "Samsung");
        assert_eq!(brand_from_title("boAt Airdopes 141"), "boAt");
        assert_eq!(brand_from_title(""), "Brand");
    }
}
