//! Deterministic spending-category rules over counterparty text.
//!
//! No ML, no LLM: an ordered keyword table covers the common merchants, a
//! high-value fallback catches untagged rent/EMI transfers, everything else
//! lands in Others.

use crate::transaction::Category;

/// Keyword groups in priority order. The table is a priority LIST: when a
/// counterparty matches keywords from two groups, the first-declared group
/// wins ("uber eats" is Food & Dining even though "uber" alone would be
/// Transportation).
const KEYWORD_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::FoodDining,
        &[
            "swiggy", "zomato", "uber eats", "food", "restaurant", "cafe", "dominos", "kfc",
            "mcdonald",
        ],
    ),
    (
        Category::Transportation,
        &["uber", "ola", "metro", "bus", "taxi", "petrol", "fuel", "irctc"],
    ),
    (
        Category::Shopping,
        &["amazon", "flipkart", "myntra", "ajio", "shopping", "mall", "store"],
    ),
    (
        Category::Entertainment,
        &["netflix", "amazon prime", "hotstar", "spotify", "movie", "cinema", "bookmyshow"],
    ),
    (
        Category::Utilities,
        &["electricity", "gas", "water", "internet", "mobile", "recharge", "bill"],
    ),
    (
        Category::Healthcare,
        &["pharma", "medicine", "hospital", "clinic", "doctor", "health"],
    ),
];

/// Transactions above this with no keyword hit are assumed to be rent,
/// EMI or similar large transfers.
pub const HIGH_VALUE_THRESHOLD: f64 = 10_000.0;

/// Categorize a cleaned counterparty string. First keyword group with a
/// substring hit wins; no hit plus a high amount falls back to EMI/Rent.
pub fn categorize(counterparty: &str, amount: f64) -> Category {
    let lower = counterparty.to_lowercase();

    for (category, keywords) in KEYWORD_GROUPS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *category;
        }
    }

    if amount > HIGH_VALUE_THRESHOLD {
        return Category::EmiRent;
    }

    Category::Others
}
