// src/core/pattern.rs

//! # Pattern Matcher
//!
//! Operation patterns are short, space-delimited templates such as
//! `$id actions create $payload`. Each pattern is compiled once into a list of
//! [`PatternToken`]s and then tested positionally against the tokens that follow
//! the resource group name.

use serde_json::Value;
use thiserror::Error;

/// CRUD verbs that also accept a single-letter shorthand.
/// `delete` is deliberately absent: destructive verbs must be typed in full.
const SHORTHAND_VERBS: &[(&str, &str)] = &[
    ("create", "c"),
    ("list", "l"),
    ("read", "r"),
    ("update", "u"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty.")]
    Empty,
    #[error("Pattern '{0}' contains a placeholder without a label.")]
    UnlabelledPlaceholder(String),
}

/// Switch-dependent state consulted while matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchContext {
    /// The payload comes from `--build`, `--from-csv` or `--from-json`
    /// rather than from argv.
    pub payload_sourced_elsewhere: bool,
}

/// One compiled position of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// Must be identical to the argument.
    Literal(String),
    /// A CRUD verb, matched by name or shorthand.
    Verb {
        name: &'static str,
        shorthand: &'static str,
    },
    /// `$id`: any non-empty identifier.
    Id,
    /// `$payload`: a JSON document.
    Payload,
    /// `$type`, `$name`, ...: any non-empty value.
    Label(String),
}

impl PatternToken {
    /// Parses a single pattern token.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if let Some(label) = raw.strip_prefix('$') {
            return match label {
                "" => Err(PatternError::UnlabelledPlaceholder(raw.to_string())),
                "id" => Ok(Self::Id),
                "payload" => Ok(Self::Payload),
                other => Ok(Self::Label(other.to_string())),
            };
        }

        if let Some(&(name, shorthand)) = SHORTHAND_VERBS.iter().find(|(name, _)| *name == raw) {
            return Ok(Self::Verb { name, shorthand });
        }

        Ok(Self::Literal(raw.to_string()))
    }

    /// Tests one argument (or its absence) against this token.
    pub fn matches(&self, arg: Option<&str>, ctx: MatchContext) -> bool {
        let value = arg.unwrap_or("");
        match self {
            Self::Literal(literal) => value == literal,
            Self::Verb { name, shorthand } => value == *name || value == *shorthand,
            Self::Id | Self::Label(_) => !value.is_empty(),
            Self::Payload => ctx.payload_sourced_elsewhere || is_json_document(value),
        }
    }

    /// True for tokens that capture a user-supplied value.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Id | Self::Payload | Self::Label(_))
    }

    /// Human-readable form used in usage listings.
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(literal) => literal.clone(),
            Self::Verb { name, shorthand } => format!("{} ({})", name, shorthand),
            Self::Id => "$id".to_string(),
            Self::Payload => "$payload".to_string(),
            Self::Label(label) => format!("${}", label),
        }
    }
}

/// A compiled operation pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<PatternToken>,
}

impl Pattern {
    /// Compiles a pattern string into typed tokens.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let tokens = source
            .split_whitespace()
            .map(PatternToken::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if tokens.is_empty() {
            return Err(PatternError::Empty);
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Every pattern position must match; trailing extra arguments are ignored.
    pub fn matches(&self, args: &[String], ctx: MatchContext) -> bool {
        self.tokens
            .iter()
            .enumerate()
            .all(|(i, token)| token.matches(args.get(i).map(String::as_str), ctx))
    }

    /// Position of the `$payload` token, if the pattern has one.
    pub fn payload_position(&self) -> Option<usize> {
        self.tokens.iter().position(|t| *t == PatternToken::Payload)
    }

    /// The pattern with shorthand verbs annotated, e.g. `$id read (r)`.
    pub fn describe(&self) -> String {
        self.tokens
            .iter()
            .map(PatternToken::describe)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Matches a single argument against a single pattern token.
/// A token that cannot be compiled never matches.
pub fn match_arg(arg: Option<&str>, spec_token: &str, ctx: MatchContext) -> bool {
    PatternToken::parse(spec_token)
        .map(|token| token.matches(arg, ctx))
        .unwrap_or(false)
}

/// Matches an argument list against an uncompiled pattern string.
pub fn match_args(args: &[String], pattern: &str, ctx: MatchContext) -> bool {
    Pattern::compile(pattern)
        .map(|p| p.matches(args, ctx))
        .unwrap_or(false)
}

/// A payload is any JSON object or array.
fn is_json_document(value: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(value),
        Ok(Value::Object(_)) | Ok(Value::Array(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    const PLAIN: MatchContext = MatchContext {
        payload_sourced_elsewhere: false,
    };
    const BUILDING: MatchContext = MatchContext {
        payload_sourced_elsewhere: true,
    };

    // --- `$id` ---
    #[test]
    fn test_id_accepts_any_non_empty_identifier() {
        assert!(match_arg(Some("U12345678901234567890ab"), "$id", PLAIN));
        assert!(match_arg(Some("custom-id"), "$id", PLAIN));
        assert!(!match_arg(Some(""), "$id", PLAIN));
        assert!(!match_arg(None, "$id", PLAIN));
    }

    // --- `$payload` ---
    #[test]
    fn test_payload_requires_json_document() {
        assert!(match_arg(Some(r#"{"a":1}"#), "$payload", PLAIN));
        assert!(match_arg(Some(r#"["UpUxnWAXeMPNQraRaGmKQdHr"]"#), "$payload", PLAIN));
        assert!(!match_arg(Some("not json"), "$payload", PLAIN));
        assert!(!match_arg(Some("42"), "$payload", PLAIN));
        assert!(!match_arg(None, "$payload", PLAIN));
    }

    #[test]
    fn test_payload_is_not_checked_when_sourced_elsewhere() {
        assert!(match_arg(Some("not json"), "$payload", BUILDING));
        assert!(match_arg(None, "$payload", BUILDING));
    }

    // --- Generic labels ---
    #[test]
    fn test_labelled_placeholder_accepts_any_non_empty_value() {
        assert!(match_arg(Some("scans"), "$type", PLAIN));
        assert!(!match_arg(None, "$type", PLAIN));
    }

    // --- Verbs ---
    #[test]
    fn test_crud_shorthands() {
        assert!(match_arg(Some("c"), "create", PLAIN));
        assert!(match_arg(Some("l"), "list", PLAIN));
        assert!(match_arg(Some("r"), "read", PLAIN));
        assert!(match_arg(Some("u"), "update", PLAIN));
        assert!(match_arg(Some("list"), "list", PLAIN));
    }

    #[test]
    fn test_delete_has_no_shorthand() {
        assert!(!match_arg(Some("d"), "delete", PLAIN));
        assert!(match_arg(Some("delete"), "delete", PLAIN));
    }

    #[test]
    fn test_literals_need_exact_match() {
        assert!(match_arg(Some("actions"), "actions", PLAIN));
        assert!(!match_arg(Some("action"), "actions", PLAIN));
        assert!(!match_arg(Some("a"), "actions", PLAIN));
    }

    // --- Whole patterns ---
    #[test]
    fn test_pattern_matches_positionally_and_ignores_extra_tokens() {
        let pattern = Pattern::compile("$id actions $id read").unwrap();
        assert!(pattern.matches(&args(&["abc", "actions", "def", "r"]), PLAIN));
        assert!(pattern.matches(&args(&["abc", "actions", "def", "read", "extra"]), PLAIN));
        assert!(!pattern.matches(&args(&["abc", "actions", "def"]), PLAIN));
        assert!(!pattern.matches(&args(&["abc", "thngs", "def", "read"]), PLAIN));
    }

    #[test]
    fn test_placeholder_matching_is_value_insensitive() {
        let pattern = Pattern::compile("$id update $payload").unwrap();
        let first = args(&["UpUxnWAXeMPNQraRaGmKQdHr", "update", r#"{"name":"a"}"#]);
        let second = args(&["another-id", "u", r#"{"tags":["b"]}"#]);
        assert!(pattern.matches(&first, PLAIN));
        assert!(pattern.matches(&second, PLAIN));
    }

    #[test]
    fn test_compile_rejects_empty_and_unlabelled() {
        assert_eq!(Pattern::compile("  "), Err(PatternError::Empty));
        assert!(matches!(
            Pattern::compile("$ read"),
            Err(PatternError::UnlabelledPlaceholder(_))
        ));
        assert!(!match_args(&args(&["x"]), "", PLAIN));
    }

    #[test]
    fn test_describe_annotates_shorthand() {
        let pattern = Pattern::compile("$id properties $key read").unwrap();
        assert_eq!(pattern.describe(), "$id properties $key read (r)");
        assert_eq!(pattern.payload_position(), None);
        let create = Pattern::compile("create $payload").unwrap();
        assert_eq!(create.payload_position(), Some(1));
    }
}
