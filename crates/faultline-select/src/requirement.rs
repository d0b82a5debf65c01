//! Existence-only requirement matching engine.
//!
//! One small matcher serves three semantically different filters: namespace
//! and phase filters project the entity attribute into a synthetic
//! single-key set (`{namespace: ""}`, `{phase: ""}`), while the annotation
//! filter evaluates the entity's annotation set directly. Parsing accepts
//! the equality forms (`k=v`, `k!=v`) so that evaluation can reject them
//! explicitly instead of silently misreading them.

use std::fmt;

use faultline_model::Labels;

use crate::error::SelectError;

/// Constraint operator. Only `Exists` and `DoesNotExist` are evaluable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Exists,
    DoesNotExist,
    Equals,
    NotEquals,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Exists => "exists",
            Operator::DoesNotExist => "does-not-exist",
            Operator::Equals => "equals",
            Operator::NotEquals => "not-equals",
        };
        f.write_str(s)
    }
}

/// A single constraint over one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
}

/// A parsed requirement expression: a set of [`Requirement`]s derived from a
/// comma-joined token string. The empty expression matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expression(Vec<Requirement>);

impl Expression {
    /// Parse a comma-joined token string.
    ///
    /// Token forms: `key` → `Exists`, `!key` → `DoesNotExist`, `key=v` /
    /// `key==v` → `Equals`, `key!=v` → `NotEquals`. An empty token inside a
    /// non-empty expression, or a token with an empty key, is a
    /// [`SelectError::Parse`].
    pub fn parse(input: &str) -> Result<Self, SelectError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::default());
        }

        let mut reqs = Vec::new();
        for raw in input.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                return Err(SelectError::Parse(format!(
                    "empty token in expression {input:?}"
                )));
            }

            let (key, operator) = if let Some(idx) = token.find("!=") {
                if idx == 0 {
                    return Err(SelectError::Parse(format!("missing key in {token:?}")));
                }
                (&token[..idx], Operator::NotEquals)
            } else if let Some(rest) = token.strip_prefix('!') {
                (rest.trim(), Operator::DoesNotExist)
            } else if let Some(idx) = token.find('=') {
                (&token[..idx], Operator::Equals)
            } else {
                (token, Operator::Exists)
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(SelectError::Parse(format!("missing key in {token:?}")));
            }

            reqs.push(Requirement {
                key: key.to_string(),
                operator,
            });
        }

        Ok(Self(reqs))
    }

    /// Parse a list of fragments (`"prod"`, `"!kube-system"`, ...) as one
    /// comma-joined expression.
    pub fn from_fragments<I, S>(fragments: I) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = fragments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::parse(&joined)
    }

    /// Render a key list to the textual form and parse it: every key becomes
    /// an `Exists` requirement. Used for annotation selector maps, whose
    /// values are ignored by design.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_fragments(keys)
    }

    /// Returns `true` if the expression carries no requirements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluate the expression against a key set.
    ///
    /// With zero `Exists` requirements, inclusion defaults to `true`;
    /// otherwise at least one `Exists` key must be present (logical OR).
    /// Any `DoesNotExist` key that *is* present excludes the item. Any
    /// other operator is a fatal [`SelectError::UnsupportedOperator`].
    pub fn matches(&self, set: &Labels) -> Result<bool, SelectError> {
        let mut incl = Vec::new();
        let mut excl = Vec::new();

        for req in &self.0 {
            match req.operator {
                Operator::Exists => incl.push(req),
                Operator::DoesNotExist => excl.push(req),
                other => {
                    return Err(SelectError::UnsupportedOperator(other.to_string()));
                }
            }
        }

        let mut included = incl.is_empty();
        for req in incl {
            if set.contains_key(&req.key) {
                included = true;
                break;
            }
        }
        for req in excl {
            if set.contains_key(&req.key) {
                included = false;
                break;
            }
        }

        Ok(included)
    }
}

#[cfg(test)]
mod tests {
    use super::{Expression, Operator};
    use crate::error::SelectError;
    use faultline_model::Labels;

    #[test]
    fn empty_expression_matches_everything() {
        let expr = Expression::parse("").unwrap();
        assert!(expr.is_empty());
        assert!(expr.matches(&Labels::single("anything")).unwrap());
        assert!(expr.matches(&Labels::new()).unwrap());
    }

    #[test]
    fn bare_token_is_exists() {
        let expr = Expression::parse("prod").unwrap();
        assert!(expr.matches(&Labels::single("prod")).unwrap());
        assert!(!expr.matches(&Labels::single("staging")).unwrap());
    }

    #[test]
    fn negated_token_is_does_not_exist() {
        let expr = Expression::parse("!kube-system").unwrap();
        assert!(expr.matches(&Labels::single("default")).unwrap());
        assert!(!expr.matches(&Labels::single("kube-system")).unwrap());
    }

    #[test]
    fn exists_requirements_are_or_combined() {
        let expr = Expression::parse("prod,staging").unwrap();
        assert!(expr.matches(&Labels::single("prod")).unwrap());
        assert!(expr.matches(&Labels::single("staging")).unwrap());
        assert!(!expr.matches(&Labels::single("dev")).unwrap());
    }

    #[test]
    fn one_excluding_violation_wins_over_inclusion() {
        let expr = Expression::parse("a,!b").unwrap();
        let mut set = Labels::single("a");
        set.insert("b", "");
        assert!(!expr.matches(&set).unwrap());
        assert!(expr.matches(&Labels::single("a")).unwrap());
    }

    #[test]
    fn only_exclusions_include_by_default() {
        let expr = Expression::parse("!a,!b").unwrap();
        assert!(expr.matches(&Labels::single("c")).unwrap());
        assert!(!expr.matches(&Labels::single("b")).unwrap());
    }

    #[test]
    fn equality_forms_parse_but_do_not_evaluate() {
        let expr = Expression::parse("app=web").unwrap();
        match expr.matches(&Labels::single("app")) {
            Err(SelectError::UnsupportedOperator(op)) => assert_eq!(op, "equals"),
            other => panic!("expected UnsupportedOperator, got {other:?}"),
        }

        let expr = Expression::parse("app!=web").unwrap();
        match expr.matches(&Labels::single("app")) {
            Err(SelectError::UnsupportedOperator(op)) => assert_eq!(op, "not-equals"),
            other => panic!("expected UnsupportedOperator, got {other:?}"),
        }
    }

    #[test]
    fn malformed_tokens_fail_parsing() {
        assert!(matches!(
            Expression::parse("a,,b"),
            Err(SelectError::Parse(_))
        ));
        assert!(matches!(Expression::parse("!"), Err(SelectError::Parse(_))));
        assert!(matches!(
            Expression::parse("=web"),
            Err(SelectError::Parse(_))
        ));
        assert!(matches!(
            Expression::parse("!=web"),
            Err(SelectError::Parse(_))
        ));
    }

    #[test]
    fn fragments_join_like_a_comma_expression() {
        let expr = Expression::from_fragments(["prod", "!kube-system"]).unwrap();
        assert!(expr.matches(&Labels::single("prod")).unwrap());
        assert!(!expr.matches(&Labels::single("kube-system")).unwrap());
    }

    #[test]
    fn from_keys_builds_exists_requirements() {
        let expr = Expression::from_keys(["owner"]).unwrap();
        let annotations: Labels = [("owner", "team-a")].into_iter().collect();
        assert!(expr.matches(&annotations).unwrap());
        assert!(!expr.matches(&Labels::new()).unwrap());
    }

    #[test]
    fn operator_display_names() {
        assert_eq!(Operator::Exists.to_string(), "exists");
        assert_eq!(Operator::DoesNotExist.to_string(), "does-not-exist");
    }
}
