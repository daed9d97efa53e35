//! paisa-ingest: message classification and extraction pipeline.
//!
//! Turns free-text bank/UPI notification messages into structured
//! [`ParsedTransaction`](paisa_core::ParsedTransaction) records:
//! spam filter → institution identifier → layout-tagged pattern extractor
//! → field normalizer → categorizer → assembler.

pub mod institution;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod spam;

pub use institution::identify;
pub use normalize::{FieldNormalizer, NormalizedFields, classify_direction, parse_amount};
pub use patterns::{Layout, PatternSpec, PatternTable, RawCapture};
pub use pipeline::{BatchSummary, ParseOutcome, Pipeline};
pub use spam::is_spam;
