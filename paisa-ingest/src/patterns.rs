//! Ordered, layout-tagged pattern table for transaction messages.
//!
//! Each institution (and a generic UPI fallback) owns an ordered list of
//! regexes; the first pattern that matches wins and short-circuits the
//! rest. Order encodes priority: specific bank templates sit before the
//! loose generic fallback, so declaration order here is load-bearing.
//!
//! Every pattern has exactly three capture groups and carries a `Layout`
//! telling the extractor which group is which. Two layouts exist in the
//! wild:
//!   - bank alerts: "INR 250.00 debited ... UPI/merchant" (amount first)
//!   - wallet apps: "You paid ₹200 to Merchant" (direction verb first)

use anyhow::Result;
use regex::{Captures, Regex};

use paisa_core::Institution;

/// Relative order of the three capture groups within a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Groups: 1 = amount, 2 = direction verb, 3 = counterparty.
    AmountFirst,
    /// Groups: 1 = direction verb, 2 = amount, 3 = counterparty.
    VerbFirst,
}

/// Raw capture text pulled out of a message, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCapture {
    pub amount_text: String,
    pub direction_text: String,
    pub counterparty_text: String,
}

impl Layout {
    /// Map positional groups into named fields according to the layout.
    fn capture(self, caps: &Captures<'_>) -> RawCapture {
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("").to_string();
        match self {
            Layout::AmountFirst => RawCapture {
                amount_text: group(1),
                direction_text: group(2),
                counterparty_text: group(3),
            },
            Layout::VerbFirst => RawCapture {
                amount_text: group(2),
                direction_text: group(1),
                counterparty_text: group(3),
            },
        }
    }
}

/// One entry in the pattern table. `institution` is `None` for the generic
/// fallback patterns at the end of the table.
pub struct PatternSpec {
    pub institution: Option<Institution>,
    pub layout: Layout,
    regex: Regex,
}

impl PatternSpec {
    fn try_match(&self, body: &str) -> Option<RawCapture> {
        self.regex.captures(body).map(|caps| self.layout.capture(&caps))
    }
}

/// Pattern sources in priority order. Kept as data so the compiled table
/// preserves declaration order exactly.
const PATTERN_SOURCES: &[(Option<Institution>, Layout, &str)] = &[
    // HDFC
    (
        Some(Institution::Hdfc),
        Layout::AmountFirst,
        concat!(
            r"(?i)INR\s*([\d,]+\.?\d*)\s*(?:has\s*been\s*)?(debited|credited)\s*(?:from|to)",
            r".*?(?:towards\s+)?UPI[/:]?\s*([\w@.-]*)"
        ),
    ),
    (
        Some(Institution::Hdfc),
        Layout::AmountFirst,
        r"(?i)Rs\.?\s*([\d,]+\.?\d*)\s*(?:has\s*been\s*)?(debited|credited).*?UPI[/:]?\s*([\w@.-]*)",
    ),
    // SBI
    (
        Some(Institution::Sbi),
        Layout::AmountFirst,
        r"(?i)Rs\.?\s*([\d,]+\.?\d*)\s*(debited|credited).*?UPI.*?(?:to|from)\s+([\w\s@.-]*)",
    ),
    (
        Some(Institution::Sbi),
        Layout::AmountFirst,
        r"(?i)₹\s*([\d,]+\.?\d*)\s*(?:has\s*been\s*)?(debited|credited).*?UPI[/:]?\s*([\w@.-]*)",
    ),
    // ICICI
    (
        Some(Institution::Icici),
        Layout::AmountFirst,
        r"(?i)Rs\.?\s*([\d,]+\.?\d*)\s*(debited|credited)\s*(?:for|from|to)?.*?UPI[/:]?\s*([\w@.-]*)",
    ),
    (
        Some(Institution::Icici),
        Layout::AmountFirst,
        r"(?i)INR\s*([\d,]+\.?\d*)\s*(debited|credited).*?UPI[/:]?\s*([\w@.-]*)",
    ),
    // Axis
    (
        Some(Institution::Axis),
        Layout::AmountFirst,
        r"(?i)Rs\.?\s*([\d,]+\.?\d*)\s*(?:has\s*been\s*)?(debited|credited).*?UPI[/:]?\s*([\w@.-]*)",
    ),
    // Google Pay
    (
        Some(Institution::Gpay),
        Layout::VerbFirst,
        concat!(
            r"(?i)You\s*(paid|received)\s*₹\s*([\d,]+\.?\d*)\s*(?:to|from)\s*",
            r"(.*?)\s*(?:using|via)\s*(?:Google\s*Pay|UPI)"
        ),
    ),
    (
        Some(Institution::Gpay),
        Layout::AmountFirst,
        concat!(
            r"(?i)₹\s*([\d,]+\.?\d*)\s*(paid|received)\s*(?:to|from)\s*",
            r"(.*?)\s*(?:using|via|-|\.).*?Google\s*Pay"
        ),
    ),
    // PhonePe
    (
        Some(Institution::PhonePe),
        Layout::AmountFirst,
        r"(?i)₹\s*([\d,]+\.?\d*)\s*(paid|received)\s*(?:to|from)\s*(.*?)\s*(?:via|using)\s*PhonePe",
    ),
    (
        Some(Institution::PhonePe),
        Layout::VerbFirst,
        concat!(
            r"(?i)You\s*(paid|received)\s*₹\s*([\d,]+\.?\d*)\s*(?:to|from)\s*",
            r"(.*?)\s*(?:via|using|on).*?PhonePe"
        ),
    ),
    // Paytm
    (
        Some(Institution::Paytm),
        Layout::AmountFirst,
        r"(?i)₹\s*([\d,]+\.?\d*)\s*(paid|sent|received)\s*(?:to|from)\s*(.*?)\s*(?:via|using)\s*Paytm",
    ),
    (
        Some(Institution::Paytm),
        Layout::VerbFirst,
        concat!(
            r"(?i)You\s*(paid|received)\s*₹\s*([\d,]+\.?\d*)\s*(?:to|from)\s*",
            r"(.*?)\s*(?:via|using|on).*?Paytm"
        ),
    ),
    // BHIM
    (
        Some(Institution::Bhim),
        Layout::AmountFirst,
        r"(?i)₹\s*([\d,]+\.?\d*)\s*(paid|received)\s*(?:to|from)\s*(.*?)\s*(?:via|using|on)\s*BHIM",
    ),
    // Generic UPI fallback
    (
        None,
        Layout::AmountFirst,
        r"(?i)(?:₹|Rs\.?|INR)\s*([\d,]+\.?\d*).*?(debit\w*|credit\w*|paid|received).*?UPI[/:]?\s*([\w@.-]*)",
    ),
    (
        None,
        Layout::AmountFirst,
        concat!(
            r"(?i)UPI.*?(?:₹|Rs\.?|INR)\s*([\d,]+\.?\d*).*?(debit\w*|credit\w*|paid|received)",
            r"\s*(?:to|from)?\s*([\w@.-]*)"
        ),
    ),
];

/// The compiled, ordered pattern table. Immutable after construction; safe
/// to share across threads.
pub struct PatternTable {
    specs: Vec<PatternSpec>,
}

impl PatternTable {
    /// Compile the fixed table. Fails only if a pattern source is invalid,
    /// which would be a programming error caught by the test suite.
    pub fn compile() -> Result<Self> {
        let mut specs = Vec::with_capacity(PATTERN_SOURCES.len());
        for (institution, layout, source) in PATTERN_SOURCES {
            specs.push(PatternSpec {
                institution: *institution,
                layout: *layout,
                regex: Regex::new(source)?,
            });
        }
        Ok(Self { specs })
    }

    /// Try patterns in declared order against a whitespace-normalized body;
    /// first match wins. When `hint` names an institution with its own
    /// pattern set, that set is tried ahead of the full order.
    pub fn extract(&self, body: &str, hint: Option<Institution>) -> Option<RawCapture> {
        if let Some(hinted) = hint {
            for spec in self.specs.iter().filter(|s| s.institution == Some(hinted)) {
                if let Some(capture) = spec.try_match(body) {
                    return Some(capture);
                }
            }
        }

        for spec in &self.specs {
            if spec.institution.is_some() && spec.institution == hint {
                continue; // already tried above
            }
            if let Some(capture) = spec.try_match(body) {
                return Some(capture);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::compile().expect("fixed pattern table must compile")
    }

    #[test]
    fn test_bank_layout_amount_first() {
        let cap = table()
            .extract(
                "INR 250.00 has been debited from your A/c XXXX1234 on 21-Jul-25 towards UPI/swiggy@okaxis. Bal: INR 5,320.00",
                Some(Institution::Hdfc),
            )
            .unwrap();
        assert_eq!(cap.amount_text, "250.00");
        assert_eq!(cap.direction_text, "debited");
        assert_eq!(cap.counterparty_text, "swiggy@okaxis.");
    }

    #[test]
    fn test_wallet_layout_verb_first() {
        let cap = table()
            .extract(
                "You paid ₹200 to Zomato using UPI. UPI Ref no 2525XXXX. - Google Pay",
                Some(Institution::Gpay),
            )
            .unwrap();
        assert_eq!(cap.amount_text, "200");
        assert_eq!(cap.direction_text, "paid");
        assert_eq!(cap.counterparty_text, "Zomato");
    }

    #[test]
    fn test_terse_debit_falls_through_to_matching_set() {
        let cap = table()
            .extract("Rs. 15000 debited UPI/unknownvendor@bank", Some(Institution::Sbi))
            .unwrap();
        assert_eq!(cap.amount_text, "15000");
        assert_eq!(cap.counterparty_text, "unknownvendor@bank");
    }

    #[test]
    fn test_paytm_received_with_person_name() {
        let cap = table()
            .extract(
                "₹300 received from John Doe via Paytm UPI. Ref: PTM123456789",
                Some(Institution::Paytm),
            )
            .unwrap();
        assert_eq!(cap.amount_text, "300");
        assert_eq!(cap.direction_text, "received");
        assert_eq!(cap.counterparty_text, "John Doe");
    }

    #[test]
    fn test_phonepe_amount_first_wallet_message() {
        let cap = table()
            .extract("₹150 paid to Zomato via PhonePe UPI", Some(Institution::PhonePe))
            .unwrap();
        assert_eq!(cap.amount_text, "150");
        assert_eq!(cap.direction_text, "paid");
        assert_eq!(cap.counterparty_text, "Zomato");
    }

    #[test]
    fn test_no_currency_marker_means_no_match() {
        assert!(table().extract("hello how are you", None).is_none());
    }

    #[test]
    fn test_unhinted_message_still_matches_in_declared_order() {
        // No hint: full table scan still finds the ICICI-style template.
        let cap = table()
            .extract(
                "ICICI Bank: Rs 125.50 debited for UPI/swiggy@icici on 23-Jul-25. Available Bal: Rs 2,345.67",
                None,
            )
            .unwrap();
        assert_eq!(cap.amount_text, "125.50");
        assert_eq!(cap.counterparty_text, "swiggy@icici");
    }
}
