//! The message pipeline: spam filter → institution identifier → pattern
//! extractor → field normalizer → categorizer → assembler.
//!
//! Pure and synchronous. One `Pipeline` holds only compiled tables, so a
//! shared reference can parse any number of messages concurrently; every
//! invocation reads fixed data and builds a fresh record. Re-parsing the
//! same raw text yields the same result, so there is no retry path: a
//! message either parses on this pass or is permanently unmatched.

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde::Serialize;

use paisa_core::{InboundMessage, Institution, ParsedTransaction, categorize};

use crate::institution;
use crate::normalize::{FieldNormalizer, NormalizedFields};
use crate::patterns::PatternTable;
use crate::spam;

/// Per-message result, with the drop reason kept visible for callers that
/// want diagnostics. Spam and no-match are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ParseOutcome {
    Parsed(ParsedTransaction),
    Spam,
    NoMatch,
}

/// Counts for a backlog run. Spam and unmatched messages both land in
/// `failed`; per-message reasons are not surfaced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub parsed: usize,
    pub failed: usize,
    pub transactions: Vec<ParsedTransaction>,
}

pub struct Pipeline {
    table: PatternTable,
    normalizer: FieldNormalizer,
    message_date: Regex,
    upi_reference: Regex,
    trailing_balance: Regex,
}

impl Pipeline {
    /// Compile the fixed tables once. The result is immutable and can be
    /// shared freely.
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: PatternTable::compile()?,
            normalizer: FieldNormalizer::new()?,
            message_date: Regex::new(r"(?i)\bon\s+(\d{1,2})-([A-Za-z]{3})-(\d{2,4})")?,
            upi_reference: Regex::new(
                r"(?i)\bRef(?:erence)?\s*(?:no|num|number)?\.?\s*[:#]?\s*([A-Za-z0-9]+)",
            )?,
            trailing_balance: Regex::new(
                r"(?i)(?:Avl|Available)?\s*Bal(?:ance)?\s*:?\s*(?:INR|Rs\.?|₹)\s*([\d,]+\.?\d*)",
            )?,
        })
    }

    /// Single entry point: one structured record, or `None` when the
    /// message is spam or matches no pattern. `Err` only on a caller
    /// contract violation (empty body or sender).
    pub fn parse(&self, msg: &InboundMessage) -> Result<Option<ParsedTransaction>> {
        Ok(match self.parse_with_outcome(msg)? {
            ParseOutcome::Parsed(txn) => Some(txn),
            ParseOutcome::Spam | ParseOutcome::NoMatch => None,
        })
    }

    /// Like [`parse`](Self::parse), but keeps the drop reason.
    pub fn parse_with_outcome(&self, msg: &InboundMessage) -> Result<ParseOutcome> {
        if msg.body.trim().is_empty() {
            bail!("malformed input: empty message body");
        }
        if msg.sender.trim().is_empty() {
            bail!("malformed input: empty sender");
        }

        if spam::is_spam(&msg.body) {
            return Ok(ParseOutcome::Spam);
        }

        let body = squash_whitespace(&msg.body);
        let institution = institution::identify(&body, &msg.sender);
        let hint = (institution != Institution::Unknown).then_some(institution);

        let Some(capture) = self.table.extract(&body, hint) else {
            return Ok(ParseOutcome::NoMatch);
        };
        let Some(fields) = self.normalizer.normalize(&capture) else {
            return Ok(ParseOutcome::NoMatch);
        };

        let occurred_at = self
            .extract_message_date(&body)
            .or(msg.received_at)
            .unwrap_or_else(Utc::now);

        Ok(ParseOutcome::Parsed(self.assemble(
            institution,
            fields,
            occurred_at,
            &body,
        )))
    }

    /// Independent repeated invocation over a backlog. Ordering across
    /// messages does not affect any individual parse.
    pub fn parse_batch(&self, msgs: &[InboundMessage]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for msg in msgs {
            match self.parse_with_outcome(msg) {
                Ok(ParseOutcome::Parsed(txn)) => {
                    summary.parsed += 1;
                    summary.transactions.push(txn);
                }
                Ok(_) | Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Combine everything into the durable record. Infallible by this
    /// point: every required field has been validated upstream.
    fn assemble(
        &self,
        institution: Institution,
        fields: NormalizedFields,
        occurred_at: DateTime<Utc>,
        body: &str,
    ) -> ParsedTransaction {
        let category = categorize(&fields.counterparty, fields.amount);
        let balance = self
            .trailing_balance
            .captures(body)
            .and_then(|caps| caps[1].replace(',', "").parse::<f64>().ok());

        // Dedup key: prefer the stable reference id carried by the message;
        // otherwise amount + minute-truncated timestamp.
        let raw_source = match self.extract_reference(body) {
            Some(reference) => format!("sms_{}_{}", institution.code(), reference),
            None => format!(
                "sms_{}_{:.2}_{}",
                institution.code(),
                fields.amount,
                occurred_at.format("%Y%m%d%H%M")
            ),
        };

        ParsedTransaction {
            amount: fields.amount,
            direction: fields.direction,
            counterparty: fields.counterparty,
            upi_id: fields.upi_id,
            institution,
            category,
            occurred_at,
            balance,
            raw_source,
        }
    }

    /// Transaction date carried in the body ("on 21-Jul-25"), pinned to
    /// midnight UTC. Messages without one fall back to the caller's
    /// received-at, then to processing time.
    fn extract_message_date(&self, body: &str) -> Option<DateTime<Utc>> {
        let caps = self.message_date.captures(body)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }

    fn extract_reference(&self, body: &str) -> Option<String> {
        self.upi_reference
            .captures(body)
            .map(|caps| caps[1].to_string())
    }
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn month_number(abbrev: &str) -> Option<u32> {
    match abbrev.to_ascii_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paisa_core::{Category, Direction};

    fn pipeline() -> Pipeline {
        Pipeline::new().expect("fixed tables must compile")
    }

    fn msg(body: &str, sender: &str) -> InboundMessage {
        InboundMessage::new(body, sender)
    }

    #[test]
    fn test_message_date_extraction() {
        let p = pipeline();
        let dt = p
            .extract_message_date("debited on 21-Jul-25 towards UPI")
            .unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-07-21T00:00:00+00:00");
    }

    #[test]
    fn test_message_date_absent() {
        let p = pipeline();
        assert!(p.extract_message_date("You paid ₹200 to Zomato").is_none());
    }

    #[test]
    fn test_reference_extraction() {
        let p = pipeline();
        assert_eq!(
            p.extract_reference("UPI Ref no 2525XXXX. - Google Pay").as_deref(),
            Some("2525XXXX")
        );
        assert_eq!(
            p.extract_reference("via Paytm UPI. Ref: PTM123456789").as_deref(),
            Some("PTM123456789")
        );
        assert!(p.extract_reference("no reference here").is_none());
    }

    #[test]
    fn test_balance_extraction_in_assembled_record() {
        let p = pipeline();
        let txn = p
            .parse(&msg(
                "INR 250.00 has been debited from your A/c XXXX1234 on 21-Jul-25 towards UPI/swiggy@okaxis. Bal: INR 5,320.00",
                "HDFC",
            ))
            .unwrap()
            .unwrap();
        assert_eq!(txn.balance, Some(5320.0));
    }

    #[test]
    fn test_dedup_key_prefers_reference() {
        let p = pipeline();
        let txn = p
            .parse(&msg(
                "You paid ₹200 to Zomato using UPI. UPI Ref no 2525XXXX. - Google Pay",
                "GPAY",
            ))
            .unwrap()
            .unwrap();
        assert_eq!(txn.raw_source, "sms_gpay_2525XXXX");
    }

    #[test]
    fn test_dedup_key_without_reference_uses_amount_and_minute() {
        let p = pipeline();
        let at = Utc.with_ymd_and_hms(2025, 7, 22, 9, 30, 45).unwrap();
        let txn = p
            .parse(&msg("₹150 paid to Zomato via PhonePe UPI", "PHONEPE").with_received_at(at))
            .unwrap()
            .unwrap();
        assert_eq!(txn.raw_source, "sms_phonepe_150.00_202507220930");
    }

    #[test]
    fn test_spam_reported_separately_from_no_match() {
        let p = pipeline();
        assert_eq!(
            p.parse_with_outcome(&msg("CONGRATULATIONS! You have WON a lottery prize, claim now!", "PROMO"))
                .unwrap(),
            ParseOutcome::Spam
        );
        assert_eq!(
            p.parse_with_outcome(&msg("hello how are you", "FRIEND")).unwrap(),
            ParseOutcome::NoMatch
        );
    }

    #[test]
    fn test_malformed_input_is_a_hard_error() {
        let p = pipeline();
        assert!(p.parse(&msg("", "HDFC")).is_err());
        assert!(p.parse(&msg("Rs. 100 debited UPI/x", "   ")).is_err());
    }

    #[test]
    fn test_zero_amount_is_dropped_not_recorded() {
        let p = pipeline();
        let outcome = p
            .parse_with_outcome(&msg("Rs. 0.00 debited UPI/shop@bank", "SBI"))
            .unwrap();
        assert_eq!(outcome, ParseOutcome::NoMatch);
    }

    #[test]
    fn test_idempotent_with_fixed_received_at() {
        let p = pipeline();
        let at = Utc.with_ymd_and_hms(2025, 7, 22, 9, 30, 0).unwrap();
        let m = msg("₹300 received from John Doe via Paytm UPI. Ref: PTM123456789", "PAYTM")
            .with_received_at(at);
        let first = p.parse(&m).unwrap().unwrap();
        let second = p.parse(&m).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_direction_and_category_assembly() {
        let p = pipeline();
        let txn = p
            .parse(&msg("₹300 received from John Doe via Paytm UPI. Ref: PTM1", "PAYTM"))
            .unwrap()
            .unwrap();
        assert_eq!(txn.direction, Direction::Credit);
        assert_eq!(txn.counterparty, "John Doe");
        assert_eq!(txn.category, Category::Others);
        assert_eq!(txn.institution, Institution::Paytm);
    }

    #[test]
    fn test_batch_counts() {
        let p = pipeline();
        let msgs = vec![
            msg("INR 250.00 has been debited from your A/c towards UPI/swiggy@okaxis. Bal: INR 5,320.00", "HDFC"),
            msg("hello how are you", "FRIEND"),
            msg("CONGRATULATIONS! You have WON a lottery prize, claim now!", "PROMO"),
        ];
        let summary = p.parse_batch(&msgs);
        assert_eq!(summary.parsed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.transactions.len(), 1);
    }
}
