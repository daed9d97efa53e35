//! Field normalization: raw capture text into typed, validated fields.

use anyhow::Result;
use regex::Regex;

use paisa_core::Direction;

use crate::patterns::RawCapture;

/// Validated fields ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    pub amount: f64,
    pub direction: Direction,
    pub counterparty: String,
    /// Raw payment handle, kept when the pre-truncation capture has '@'.
    pub upi_id: Option<String>,
}

/// Parse a locale-formatted amount ("5,320.00"). `None` on anything that
/// is not a strictly positive finite number.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let amount: f64 = cleaned.trim().parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Binary direction classifier over free text. "debited", "Debit", "paid"
/// and friends are debits; everything else (notably "credited",
/// "received") is a credit. Substring test, so verb tense and case do not
/// matter.
pub fn classify_direction(token: &str) -> Direction {
    let lower = token.to_lowercase();
    if lower.contains("debit") || lower.contains("paid") {
        Direction::Debit
    } else {
        Direction::Credit
    }
}

/// Counterparty cleaner. Holds its regexes compiled once; shared by the
/// pipeline across messages.
pub struct FieldNormalizer {
    leading_prefix: Regex,
    trailing_qualifier: Regex,
}

impl FieldNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            leading_prefix: Regex::new(r"(?i)^(?:to|from)\s+")?,
            // Truncate at the first qualifier token; plain substring match
            // on purpose ("Housing society" truncates at "using").
            trailing_qualifier: Regex::new(r"(?i)\s*(?:using|via|UPI|-).*$")?,
        })
    }

    /// Trim, strip "to "/"from " prefixes, cut trailing qualifiers.
    /// Collapses to "Unknown" when nothing survives.
    pub fn clean_counterparty(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let no_prefix = self.leading_prefix.replace(trimmed, "");
        let cleaned = self.trailing_qualifier.replace(&no_prefix, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            "Unknown".to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Normalize a raw capture. `None` when the amount is unparseable or
    /// not strictly positive; such messages are dropped, never recorded
    /// as zero-amount transactions.
    pub fn normalize(&self, raw: &RawCapture) -> Option<NormalizedFields> {
        let amount = parse_amount(&raw.amount_text)?;
        let direction = classify_direction(&raw.direction_text);

        let upi_id = raw
            .counterparty_text
            .contains('@')
            .then(|| raw.counterparty_text.trim().to_string());
        let counterparty = self.clean_counterparty(&raw.counterparty_text);

        Some(NormalizedFields {
            amount,
            direction,
            counterparty,
            upi_id,
        })
    }
}
