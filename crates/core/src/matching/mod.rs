//! Client matching for parsed movements.

mod matcher;

pub use matcher::{MatchOutcome, MatchQuery, Matcher};
