//! Transaction types shared across the parsing pipeline and its consumers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw notification message handed to the pipeline.
///
/// Ephemeral input: never persisted as-is. `received_at` is optional because
/// some callers (backlog imports) know when the message arrived and some
/// (live listeners) do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub body: String,
    pub sender: String,
    pub received_at: Option<DateTime<Utc>>,
}

impl InboundMessage {
    pub fn new(body: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sender: sender.into(),
            received_at: None,
        }
    }

    pub fn with_received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }
}

/// Whether money left or entered the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

/// Banks and UPI apps the pipeline recognizes. Closed set; anything else
/// is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    #[serde(rename = "sbi")]
    Sbi,
    #[serde(rename = "hdfc")]
    Hdfc,
    #[serde(rename = "icici")]
    Icici,
    #[serde(rename = "axis")]
    Axis,
    #[serde(rename = "pnb")]
    Pnb,
    #[serde(rename = "bob")]
    Bob,
    #[serde(rename = "canara")]
    Canara,
    #[serde(rename = "union")]
    Union,
    #[serde(rename = "kotak")]
    Kotak,
    #[serde(rename = "gpay")]
    Gpay,
    #[serde(rename = "phonepe")]
    PhonePe,
    #[serde(rename = "paytm")]
    Paytm,
    #[serde(rename = "bhim")]
    Bhim,
    #[serde(rename = "amazon-pay")]
    AmazonPay,
    #[serde(rename = "mobikwik")]
    Mobikwik,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Institution {
    /// Short lowercase code, used in dedup keys and persistence source tags.
    pub fn code(&self) -> &'static str {
        match self {
            Institution::Sbi => "sbi",
            Institution::Hdfc => "hdfc",
            Institution::Icici => "icici",
            Institution::Axis => "axis",
            Institution::Pnb => "pnb",
            Institution::Bob => "bob",
            Institution::Canara => "canara",
            Institution::Union => "union",
            Institution::Kotak => "kotak",
            Institution::Gpay => "gpay",
            Institution::PhonePe => "phonepe",
            Institution::Paytm => "paytm",
            Institution::Bhim => "bhim",
            Institution::AmazonPay => "amazonpay",
            Institution::Mobikwik => "mobikwik",
            Institution::Unknown => "unknown",
        }
    }

    /// True for wallet/UPI-app tags (as opposed to banks or `Unknown`).
    pub fn is_upi_app(&self) -> bool {
        matches!(
            self,
            Institution::Gpay
                | Institution::PhonePe
                | Institution::Paytm
                | Institution::Bhim
                | Institution::AmazonPay
                | Institution::Mobikwik
        )
    }
}

/// Spending categories assigned deterministically by keyword rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "food-dining")]
    FoodDining,
    #[serde(rename = "transportation")]
    Transportation,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "utilities")]
    Utilities,
    #[serde(rename = "healthcare")]
    Healthcare,
    #[serde(rename = "emi-rent")]
    EmiRent,
    #[serde(rename = "others")]
    Others,
}

impl Category {
    /// Display label as shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Healthcare => "Healthcare",
            Category::EmiRent => "EMI/Rent",
            Category::Others => "Others",
        }
    }
}

/// The durable output of a successful pipeline run.
///
/// Created only by the assembler once every required field is present;
/// immutable afterwards. Ownership passes to the persistence collaborator
/// on handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Strictly positive, decimal rupees.
    pub amount: f64,
    pub direction: Direction,
    /// Cleaned merchant/person name; "Unknown" when nothing usable survived.
    pub counterparty: String,
    /// Raw payment handle, retained when the capture contained '@'.
    pub upi_id: Option<String>,
    pub institution: Institution,
    pub category: Category,
    /// Message-borne date when present, else the caller's received-at,
    /// else processing time.
    pub occurred_at: DateTime<Utc>,
    /// Trailing available-balance figure, when the message carried one.
    pub balance: Option<f64>,
    /// Dedup key: institution code plus a stable reference (or
    /// amount + minute-rounded timestamp when no reference exists).
    pub raw_source: String,
}

impl ParsedTransaction {
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }
}
