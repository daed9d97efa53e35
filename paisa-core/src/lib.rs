//! paisa-core: transaction types and category rules for the SMS pipeline

pub mod categorize;
pub mod transaction;

pub use categorize::{HIGH_VALUE_THRESHOLD, categorize};
pub use transaction::{Category, Direction, InboundMessage, Institution, ParsedTransaction};
