//! Static lookup tables for the keyword classifier.

use phf::{phf_map, phf_ordered_map};

/// What a known merchant keyword predicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordRule {
    pub category: &'static str,
    pub confidence: f64,
    pub tokens: &'static [&'static str],
}

/// Merchant keywords in lookup order. Fuzzy matching and the merchant
/// substring fallback both walk this order, so it must stay stable.
pub static KEYWORDS: phf::OrderedMap<&'static str, KeywordRule> = phf_ordered_map! {
    "starbucks" => KeywordRule { category: "Dining", confidence: 0.96, tokens: &["starbucks", "coffee"] },
    "shell" => KeywordRule { category: "Fuel", confidence: 0.94, tokens: &["shell", "petrol", "gas"] },
    "netflix" => KeywordRule { category: "Entertainment", confidence: 0.93, tokens: &["netflix", "subscription"] },
    "walmart" => KeywordRule { category: "Shopping", confidence: 0.89, tokens: &["walmart"] },
    "amazon" => KeywordRule { category: "Shopping", confidence: 0.78, tokens: &["amazon", "marketplace", "purchase"] },
    "whole foods" => KeywordRule { category: "Groceries", confidence: 0.72, tokens: &["whole", "foods", "market"] },
    "cvs" => KeywordRule { category: "Healthcare", confidence: 0.69, tokens: &["cvs", "pharmacy"] },
    "uber" => KeywordRule { category: "Transport", confidence: 0.58, tokens: &["uber", "ride"] },
    "electric" => KeywordRule { category: "Bills", confidence: 0.52, tokens: &["electric", "bill", "payment"] },
    "target" => KeywordRule { category: "Shopping", confidence: 0.86, tokens: &["target"] },
    "chipotle" => KeywordRule { category: "Dining", confidence: 0.91, tokens: &["chipotle", "restaurant"] },
    "gas" => KeywordRule { category: "Fuel", confidence: 0.88, tokens: &["gas", "station"] },
    "grocery" => KeywordRule { category: "Groceries", confidence: 0.75, tokens: &["grocery", "market"] },
    "movie" => KeywordRule { category: "Entertainment", confidence: 0.63, tokens: &["movie", "cinema", "theater"] },
    "pizza" => KeywordRule { category: "Dining", confidence: 0.82, tokens: &["pizza", "restaurant"] },
};

pub const FALLBACK_CATEGORY: &str = "Other";
pub const FALLBACK_CATEGORY_ID: i64 = 9;

/// Ids of the seeded default categories.
static CATEGORY_IDS: phf::Map<&'static str, i64> = phf_map! {
    "Groceries" => 1,
    "Dining" => 2,
    "Fuel" => 3,
    "Shopping" => 4,
    "Bills" => 5,
    "Entertainment" => 6,
    "Transport" => 7,
    "Healthcare" => 8,
    "Other" => 9,
};

pub fn category_id(category: &str) -> i64 {
    CATEGORY_IDS
        .get(category)
        .copied()
        .unwrap_or(FALLBACK_CATEGORY_ID)
}

/// First word → category for the explanation endpoint.
pub static EXPLAIN_WORDS: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "starbucks" => "Dining",
    "shell" => "Fuel",
    "amazon" => "Shopping",
    "whole" => "Groceries",
    "netflix" => "Entertainment",
    "uber" => "Transport",
    "electric" => "Bills",
    "cvs" => "Healthcare",
};

/// Words that count as influences for each explained category.
pub static INFLUENCES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "Dining" => &["restaurant", "cafe", "food", "coffee", "pizza"],
    "Fuel" => &["gas", "petrol", "fuel", "station", "shell"],
    "Shopping" => &["shop", "amazon", "store", "purchase", "mall"],
    "Groceries" => &["grocery", "market", "food", "whole", "foods"],
    "Entertainment" => &["netflix", "movie", "cinema", "entertainment", "prime"],
    "Transport" => &["uber", "lyft", "taxi", "transport", "ride"],
    "Bills" => &["electric", "bill", "payment", "utility", "water"],
    "Healthcare" => &["pharmacy", "medical", "health", "cvs", "doctor"],
};
