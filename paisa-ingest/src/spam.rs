//! Promotional/phishing noise filter.
//!
//! One deny-term hit drops the message, even when it also looks like a
//! valid transaction. Precision over recall: importing spam as a
//! transaction is worse than missing a real one.

/// Fixed deny-list of marketing/phishing terms. Matched case-insensitively
/// as plain substrings, no scoring.
const SPAM_KEYWORDS: &[&str] = &[
    "won",
    "winner",
    "lottery",
    "prize",
    "congratulations",
    "lucky",
    "claim",
    "reward",
    "gift",
    "free",
    "bonus",
    "cashback",
    "offer expires",
    "limited time",
    "act now",
    "urgent",
    "verify",
    "suspended",
    "blocked",
    "update",
    "click here",
    "download app",
    "install now",
    "register",
    "subscribe",
];

/// True when the body contains any deny-list term.
pub fn is_spam(body: &str) -> bool {
    let lower = body.to_lowercase();
    SPAM_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
