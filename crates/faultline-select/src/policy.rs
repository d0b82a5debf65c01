use regex::Regex;
use tracing::warn;

/// Namespace allow/deny policy injected into the pipeline.
///
/// Two mutually exclusive modes: if an allow pattern is configured, a
/// namespace must match it to pass and the deny pattern is ignored;
/// otherwise, if a deny pattern is configured, a namespace must *not* match
/// it. With neither configured every namespace passes. A pattern that fails
/// to compile makes that branch deny everything it is asked about.
#[derive(Clone, Debug, Default)]
pub struct NamespacePolicy {
    allowed: Pattern,
    ignored: Pattern,
}

#[derive(Clone, Debug, Default)]
enum Pattern {
    #[default]
    Unset,
    Valid(Regex),
    Invalid,
}

impl Pattern {
    fn compile(source: Option<&str>) -> Self {
        match source {
            None | Some("") => Pattern::Unset,
            Some(src) => match Regex::new(src) {
                Ok(re) => Pattern::Valid(re),
                Err(err) => {
                    warn!(pattern = src, error = %err, "invalid namespace pattern");
                    Pattern::Invalid
                }
            },
        }
    }
}

impl NamespacePolicy {
    /// Build a policy from optional allow and deny pattern strings.
    ///
    /// Empty strings count as unset, matching the original configuration
    /// convention.
    pub fn new(allowed: Option<&str>, ignored: Option<&str>) -> Self {
        Self {
            allowed: Pattern::compile(allowed),
            ignored: Pattern::compile(ignored),
        }
    }

    /// Allow-all policy.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns whether the namespace passes the policy.
    pub fn is_allowed(&self, namespace: &str) -> bool {
        match &self.allowed {
            Pattern::Valid(re) => return re.is_match(namespace),
            Pattern::Invalid => return false,
            Pattern::Unset => {}
        }

        match &self.ignored {
            Pattern::Valid(re) => !re.is_match(namespace),
            Pattern::Invalid => false,
            Pattern::Unset => true,
        }
    }
}
