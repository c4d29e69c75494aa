//! Fixed-priority client matching rules.

use rust_decimal::Decimal;

use hawala_shared::config::MatchingConfig;
use hawala_shared::types::{ClientId, Currency};

use crate::clients::Client;
use crate::reconcile::RecordDirection;

/// The movement attributes matching runs on.
#[derive(Debug, Clone)]
pub struct MatchQuery<'a> {
    /// The counterparty as written in the message (name or phone).
    pub person: &'a str,
    /// The movement amount.
    pub amount: Decimal,
    /// The movement currency.
    pub currency: Currency,
    /// Inflow or outflow.
    pub direction: RecordDirection,
}

/// Result of matching one movement against the client base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The counterparty is blacklisted; the record must be flagged, never
    /// auto-assigned.
    Blacklisted {
        /// Which blacklist entry fired.
        reason: String,
    },
    /// Exactly one high-confidence candidate: safe to auto-assign.
    Auto(ClientId),
    /// Candidates exist but none is safe to auto-assign.
    Suggestions(Vec<ClientId>),
    /// No client resembles the counterparty.
    NoMatch,
}

/// Client matcher with a fixed rule priority.
///
/// Rules run in order: exact phone, exact full name, first+last name,
/// partial name. The first tier that produces candidates decides the
/// outcome; partial-name hits are suggestions only and never auto-assign.
#[derive(Debug, Clone)]
pub struct Matcher {
    blacklist_names: Vec<String>,
    blacklist_phones: Vec<String>,
}

impl Matcher {
    /// Builds a matcher from configuration.
    #[must_use]
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            blacklist_names: config
                .blacklist_names
                .iter()
                .map(|name| normalize_name(name))
                .collect(),
            blacklist_phones: config
                .blacklist_phones
                .iter()
                .map(|phone| normalize_phone(phone))
                .collect(),
        }
    }

    /// Matches a movement against the known clients.
    #[must_use]
    pub fn match_client(&self, query: &MatchQuery<'_>, clients: &[Client]) -> MatchOutcome {
        let person_name = normalize_name(query.person);
        let person_phone = normalize_phone(query.person);

        // Blacklist short-circuits everything.
        if self.blacklist_names.iter().any(|name| *name == person_name) {
            return MatchOutcome::Blacklisted {
                reason: format!("name '{}' is blacklisted", query.person.trim()),
            };
        }
        if !person_phone.is_empty()
            && self.blacklist_phones.iter().any(|phone| *phone == person_phone)
        {
            return MatchOutcome::Blacklisted {
                reason: format!("phone '{person_phone}' is blacklisted"),
            };
        }

        // Tier 1: exact phone.
        if person_phone.len() >= 7 {
            let hits: Vec<ClientId> = clients
                .iter()
                .filter(|client| {
                    client
                        .phone
                        .as_deref()
                        .is_some_and(|phone| normalize_phone(phone) == person_phone)
                })
                .map(|client| client.id)
                .collect();
            if !hits.is_empty() {
                return decide(hits);
            }
        }

        // Tier 2: exact full name.
        let hits: Vec<ClientId> = clients
            .iter()
            .filter(|client| normalize_name(&client.name) == person_name)
            .map(|client| client.id)
            .collect();
        if !hits.is_empty() {
            return decide(hits);
        }

        // Tier 3: first and last name tokens.
        let person_tokens: Vec<&str> = person_name.split_whitespace().collect();
        if person_tokens.len() >= 2 {
            let first = person_tokens[0];
            let last = person_tokens[person_tokens.len() - 1];
            let hits: Vec<ClientId> = clients
                .iter()
                .filter(|client| {
                    let name = normalize_name(&client.name);
                    let tokens: Vec<&str> = name.split_whitespace().collect();
                    tokens.len() >= 2 && tokens[0] == first && tokens[tokens.len() - 1] == last
                })
                .map(|client| client.id)
                .collect();
            if !hits.is_empty() {
                return decide(hits);
            }
        }

        // Tier 4: partial name. Suggestions only.
        if !person_name.is_empty() {
            let hits: Vec<ClientId> = clients
                .iter()
                .filter(|client| {
                    let name = normalize_name(&client.name);
                    name.contains(&person_name) || person_name.contains(&name)
                })
                .map(|client| client.id)
                .collect();
            if !hits.is_empty() {
                return MatchOutcome::Suggestions(hits);
            }
        }

        MatchOutcome::NoMatch
    }
}

/// One high-confidence candidate auto-assigns; several become suggestions.
fn decide(hits: Vec<ClientId>) -> MatchOutcome {
    if hits.len() == 1 {
        MatchOutcome::Auto(hits[0])
    } else {
        MatchOutcome::Suggestions(hits)
    }
}

/// Normalizes a name for comparison: case, whitespace, and the Arabic
/// letter variants that differ between how senders and registrations spell
/// the same name.
fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut last_was_space = true;

    for c in raw.trim().chars() {
        let mapped = match c {
            '\u{0623}' | '\u{0625}' | '\u{0622}' => '\u{0627}', // alef variants -> alef
            '\u{0649}' => '\u{064A}',                           // alef maqsura -> yeh
            '\u{0629}' => '\u{0647}',                           // ta marbuta -> heh
            other => other,
        };
        if mapped.is_whitespace() {
            if !last_was_space {
                normalized.push(' ');
            }
            last_was_space = true;
        } else {
            for lower in mapped.to_lowercase() {
                normalized.push(lower);
            }
            last_was_space = false;
        }
    }

    normalized.trim_end().to_string()
}

/// Keeps only digits, mapping Arabic-Indic digits to ASCII.
fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '\u{0660}'..='\u{0669}' => char::from_u32(u32::from(c) - 0x0660 + u32::from('0')),
            _ => None,
        })
        .collect()
}
