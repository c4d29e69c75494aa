//! SMS parsing rule engine.
//!
//! An ordered, first-match-wins list of pattern rules turns raw banking SMS
//! text into structured movements. Rule order is semantically significant
//! and is preserved as configuration; messages no rule matches become
//! persisted parse failures, never silent drops.

mod error;
mod parser;
mod rules;

pub use error::SmsError;
pub use parser::{ParseFailure, ParseOutcome, ParsedSms};
pub use rules::{RuleSpec, SmsRuleSet};
