//! Ordered pattern rules.

use regex::Regex;
use serde::{Deserialize, Serialize};

use hawala_shared::types::Currency;

use crate::reconcile::RecordDirection;

use super::error::SmsError;
use super::parser::{currency_from_word, parse_amount, ParseOutcome, ParsedSms};

/// One configured pattern rule.
///
/// The pattern uses named capture groups: `amount` (required), `person`
/// (required), and `currency` (optional - when absent, `currency` below
/// supplies the rule's fixed currency). Rules are tried in configuration
/// order and the first match wins, so order is part of the configuration's
/// meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Rule name, carried onto parse outcomes for audit.
    pub name: String,
    /// Regex with named groups `amount`, `person`, and optionally `currency`.
    pub pattern: String,
    /// Whether a match is an inflow (SMS credit) or outflow (SMS debit).
    pub direction: RecordDirection,
    /// Fixed currency for rules whose pattern has no `currency` group.
    #[serde(default)]
    pub currency: Option<Currency>,
}

/// A compiled rule.
#[derive(Debug, Clone)]
struct SmsRule {
    spec: RuleSpec,
    regex: Regex,
}

/// The ordered, first-match-wins rule list.
#[derive(Debug, Clone)]
pub struct SmsRuleSet {
    rules: Vec<SmsRule>,
}

impl SmsRuleSet {
    /// Compiles rule specs in order.
    ///
    /// # Errors
    ///
    /// Returns `SmsError::InvalidPattern` naming the first rule whose
    /// pattern does not compile.
    pub fn compile(specs: Vec<RuleSpec>) -> Result<Self, SmsError> {
        let rules = specs
            .into_iter()
            .map(|spec| {
                let regex = Regex::new(&spec.pattern).map_err(|source| SmsError::InvalidPattern {
                    name: spec.name.clone(),
                    source,
                })?;
                Ok(SmsRule { spec, regex })
            })
            .collect::<Result<Vec<_>, SmsError>>()?;
        Ok(Self { rules })
    }

    /// The built-in rule set covering the remittance desk's message shapes.
    ///
    /// More specific rules (explicit currency word) come before their
    /// generic fallbacks; reordering would change parse results.
    #[must_use]
    pub fn default_rules() -> Self {
        Self::compile(default_specs()).expect("built-in rules compile")
    }

    /// Number of rules, in order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs `raw` through the rules in order; first match wins.
    ///
    /// A rule that matches but yields an unusable amount or currency does
    /// NOT fall through to later rules: the message becomes a `NoMatch` for
    /// manual resolution, because a half-understood message is more
    /// dangerous than an unparsed one.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let raw = raw.trim();

        for rule in &self.rules {
            let Some(captures) = rule.regex.captures(raw) else {
                continue;
            };

            let Some(amount) = captures.name("amount").and_then(|m| parse_amount(m.as_str()))
            else {
                return ParseOutcome::NoMatch;
            };

            let currency = match captures.name("currency") {
                Some(word) => match currency_from_word(word.as_str()) {
                    Some(currency) => currency,
                    None => return ParseOutcome::NoMatch,
                },
                None => match rule.spec.currency {
                    Some(currency) => currency,
                    None => return ParseOutcome::NoMatch,
                },
            };

            let Some(person) = captures.name("person") else {
                return ParseOutcome::NoMatch;
            };

            let sms = ParsedSms {
                direction: rule.spec.direction,
                amount,
                currency,
                person: person.as_str().trim().to_string(),
            };
            if sms.validate().is_err() {
                return ParseOutcome::NoMatch;
            }

            return ParseOutcome::Parsed {
                rule: rule.spec.name.clone(),
                sms,
            };
        }

        ParseOutcome::NoMatch
    }
}

/// Built-in rule specs, in priority order.
fn default_specs() -> Vec<RuleSpec> {
    const AMOUNT: &str = r"(?P<amount>[0-9٠-٩][0-9٠-٩,.،٫٬]*)";
    const CURRENCY: &str = r"(?P<currency>دولار|ريال\s?سعودي|ريال\s?يمني|ريال)";

    vec![
        RuleSpec {
            name: "cash-in-currency".to_string(),
            pattern: format!(r"استلمت\s+{AMOUNT}\s+{CURRENCY}\s+من\s+(?P<person>.+)"),
            direction: RecordDirection::Inflow,
            currency: None,
        },
        RuleSpec {
            name: "cash-in".to_string(),
            pattern: format!(r"استلمت\s+{AMOUNT}\s+من\s+(?P<person>.+)"),
            direction: RecordDirection::Inflow,
            currency: Some(Currency::Yer),
        },
        RuleSpec {
            name: "cash-out-currency".to_string(),
            pattern: format!(r"حولت\s+{AMOUNT}\s+{CURRENCY}\s+إلى\s+(?P<person>.+)"),
            direction: RecordDirection::Outflow,
            currency: None,
        },
        RuleSpec {
            name: "cash-out".to_string(),
            pattern: format!(r"حولت\s+{AMOUNT}\s+إلى\s+(?P<person>.+)"),
            direction: RecordDirection::Outflow,
            currency: Some(Currency::Yer),
        },
        RuleSpec {
            name: "usdt-in".to_string(),
            pattern: r"(?i)received\s+(?P<amount>[0-9][0-9,.]*)\s*usdt\s+from\s+(?P<person>.+)"
                .to_string(),
            direction: RecordDirection::Inflow,
            currency: Some(Currency::Usdt),
        },
        RuleSpec {
            name: "usdt-out".to_string(),
            pattern: r"(?i)sent\s+(?P<amount>[0-9][0-9,.]*)\s*usdt\s+to\s+(?P<person>.+)"
                .to_string(),
            direction: RecordDirection::Outflow,
            currency: Some(Currency::Usdt),
        },
    ]
}
