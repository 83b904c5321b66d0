//! Query grammar: `term+ | NOT term+ | term+ (AND|OR) term+`.
//!
//! Tokens are split on whitespace and upper-cased to match the vocabulary.
//! Only the first operator token is honored; any later `AND`/`OR`/`NOT`
//! token is kept as an ordinary operand term.

use crate::Error;
use serde::Serialize;
use std::fmt;

/// Boolean connective recognized in a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        })
    }
}

/// Parsed query. Operand term sets keep their input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "operands", rename_all = "lowercase")]
pub enum Query {
    /// No operator: an implicit-OR bag of terms.
    Terms(Vec<String>),
    /// Every operand term negated as a group.
    Not(Vec<String>),
    And(Vec<String>, Vec<String>),
    Or(Vec<String>, Vec<String>),
}

impl Query {
    /// Parses a raw query string.
    ///
    /// Fails with [`Error::EmptyQuery`] when no operand term remains.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let tokens: Vec<String> = input.split_whitespace().map(str::to_uppercase).collect();
        let op = tokens
            .iter()
            .enumerate()
            .find_map(|(i, t)| Operator::from_token(t).map(|op| (i, op)));

        let query = match op {
            None => Query::Terms(tokens),
            Some((i, Operator::Not)) => {
                let mut terms = tokens;
                terms.remove(i);
                Query::Not(terms)
            }
            Some((i, op)) => {
                let mut left = tokens;
                let right = left.split_off(i + 1);
                left.truncate(i);
                match op {
                    Operator::And => Query::And(left, right),
                    _ => Query::Or(left, right),
                }
            }
        };
        query.non_empty()
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Query::Terms(_) => None,
            Query::Not(_) => Some(Operator::Not),
            Query::And(..) => Some(Operator::And),
            Query::Or(..) => Some(Operator::Or),
        }
    }

    /// Every operand term, left operand first.
    pub fn terms(&self) -> Vec<String> {
        match self {
            Query::Terms(t) | Query::Not(t) => t.clone(),
            Query::And(l, r) | Query::Or(l, r) => l.iter().chain(r).cloned().collect(),
        }
    }

    /// Replaces every operand token with the terms `f` produces for it.
    ///
    /// Used to push query tokens through the same normalizer as documents. A
    /// token may yield several terms (all join its operand) or none.
    pub fn normalize_terms<F>(self, f: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Vec<String>,
    {
        let map = |terms: Vec<String>| -> Vec<String> {
            terms.iter().flat_map(|t| f(t.as_str())).collect()
        };
        let query = match self {
            Query::Terms(t) => Query::Terms(map(t)),
            Query::Not(t) => Query::Not(map(t)),
            Query::And(l, r) => Query::And(map(l), map(r)),
            Query::Or(l, r) => Query::Or(map(l), map(r)),
        };
        query.non_empty()
    }

    fn non_empty(self) -> Result<Self, Error> {
        let empty = match &self {
            Query::Terms(t) | Query::Not(t) => t.is_empty(),
            Query::And(l, r) | Query::Or(l, r) => l.is_empty() && r.is_empty(),
        };
        if empty {
            Err(Error::EmptyQuery)
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Terms(t) => write!(f, "{}", t.join(" ")),
            Query::Not(t) => write!(f, "NOT {}", t.join(" ")),
            Query::And(l, r) => write!(f, "{} AND {}", l.join(" "), r.join(" ")),
            Query::Or(l, r) => write!(f, "{} OR {}", l.join(" "), r.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_and_bag_queries() {
        assert_eq!(Query::parse("ai").unwrap(), Query::Terms(terms(&["AI"])));
        assert_eq!(
            Query::parse("  deep   learning ").unwrap(),
            Query::Terms(terms(&["DEEP", "LEARNING"]))
        );
    }

    #[test]
    fn binary_operators_split_operands() {
        assert_eq!(
            Query::parse("technology or quantum").unwrap(),
            Query::Or(terms(&["TECHNOLOGY"]), terms(&["QUANTUM"]))
        );
        assert_eq!(
            Query::parse("ai AND robot").unwrap(),
            Query::And(terms(&["AI"]), terms(&["ROBOT"]))
        );
    }

    #[test]
    fn not_negates_every_operand() {
        let q = Query::parse("not quantum physics").unwrap();
        assert_eq!(q, Query::Not(terms(&["QUANTUM", "PHYSICS"])));
        assert_eq!(q.operator(), Some(Operator::Not));
    }

    #[test]
    fn first_operator_wins() {
        let q = Query::parse("a or b and c").unwrap();
        assert_eq!(q, Query::Or(terms(&["A"]), terms(&["B", "AND", "C"])));
        assert_eq!(q.terms(), terms(&["A", "B", "AND", "C"]));
    }

    #[test]
    fn empty_queries_are_rejected() {
        assert_eq!(Query::parse(""), Err(Error::EmptyQuery));
        assert_eq!(Query::parse("   "), Err(Error::EmptyQuery));
        assert_eq!(Query::parse("and"), Err(Error::EmptyQuery));
        assert_eq!(Query::parse("NOT"), Err(Error::EmptyQuery));
    }

    #[test]
    fn one_sided_operator_is_kept() {
        assert_eq!(
            Query::parse("ai and").unwrap(),
            Query::And(terms(&["AI"]), Vec::new())
        );
    }

    #[test]
    fn normalization_can_empty_a_query() {
        let q = Query::parse("the quantum").unwrap();
        let stemmed = q
            .clone()
            .normalize_terms(|t| if t == "THE" { Vec::new() } else { vec![t.to_string()] })
            .unwrap();
        assert_eq!(stemmed, Query::Terms(terms(&["QUANTUM"])));
        assert_eq!(q.normalize_terms(|_| Vec::new()), Err(Error::EmptyQuery));
    }

    #[test]
    fn token_expanding_to_several_terms_keeps_all_of_them() {
        let split = |t: &str| t.split('-').map(str::to_string).collect::<Vec<_>>();
        let q = Query::parse("state-of-the-art or chip").unwrap();
        assert_eq!(
            q.normalize_terms(split).unwrap(),
            Query::Or(terms(&["STATE", "OF", "THE", "ART"]), terms(&["CHIP"]))
        );
    }

    #[test]
    fn display_round_trips_shape() {
        let q = Query::parse("technology or quantum").unwrap();
        assert_eq!(q.to_string(), "TECHNOLOGY OR QUANTUM");
    }
}
