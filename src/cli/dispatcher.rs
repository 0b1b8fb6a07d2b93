// src/cli/dispatcher.rs

use thiserror::Error;

use crate::{
    constants::{BIN_NAME, INTERACTIVE_KEYWORD},
    core::{
        pattern::MatchContext,
        registry::{CompiledGroup, CompiledOperation, Registry},
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The group was found but none of its patterns matched.
    #[error("Invalid syntax for '{group}'. Available operations:\n{}", .usage.join("\n"))]
    Syntax { group: String, usage: Vec<String> },
    /// No group answers to the first token.
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),
}

/// What a command line resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch<'r> {
    Interactive,
    Operation {
        group: &'r CompiledGroup,
        operation: &'r CompiledOperation,
    },
}

/// Resolves a command line (switches already removed) to one operation.
///
/// The first group answering to `tokens[0]` is the only one searched: when
/// none of its operations match, dispatch fails with its usage listing even
/// if a later group shares the alias.
pub fn identify<'r>(
    registry: &'r Registry,
    tokens: &[String],
    ctx: MatchContext,
) -> Result<Dispatch<'r>, DispatchError> {
    let Some(first) = tokens.first() else {
        return Err(DispatchError::UnknownCommand(String::new()));
    };

    if first == INTERACTIVE_KEYWORD {
        return Ok(Dispatch::Interactive);
    }

    let group = registry
        .groups()
        .iter()
        .find(|group| group.group.answers_to(first))
        .ok_or_else(|| DispatchError::UnknownCommand(first.clone()))?;

    let rest = tokens.get(1..).unwrap_or_default();
    match group
        .operations
        .iter()
        .find(|operation| operation.pattern.matches(rest, ctx))
    {
        Some(operation) => {
            log::debug!(
                "Matched '{}' in group '{}'",
                operation.spec.name,
                group.group.name()
            );
            Ok(Dispatch::Operation { group, operation })
        }
        None => Err(DispatchError::Syntax {
            group: group.group.name().to_string(),
            usage: usage_lines(group),
        }),
    }
}

/// One usage line per operation, e.g. `evrythng thngs|t $id read (r)`.
pub fn usage_lines(group: &CompiledGroup) -> Vec<String> {
    let aliases = group.group.first_args.join("|");
    group
        .operations
        .iter()
        .map(|operation| {
            let pattern = operation
                .spec
                .help_pattern
                .map(str::to_string)
                .unwrap_or_else(|| operation.pattern.describe());
            format!("{} {} {}", BIN_NAME, aliases, pattern)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::registry::{Action, Endpoint, OperationSpec, ResourceGroup},
        models::Method,
    };

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    const fn get(name: &'static str, pattern: &'static str, path: &'static str) -> OperationSpec {
        OperationSpec {
            name,
            pattern,
            help_pattern: None,
            action: Action::Request(Endpoint { method: Method::Get, path }),
        }
    }

    static GROUPS: &[ResourceGroup] = &[
        ResourceGroup {
            first_args: &["widgets", "w"],
            about: "First widgets group.",
            operations: &[get("listWidgets", "list", "/widgets"), get("readWidget", "$id read", "/widgets/{0}")],
        },
        ResourceGroup {
            first_args: &["widgets"],
            about: "Shadowed group.",
            operations: &[get("countWidgets", "count", "/widgets/count")],
        },
    ];

    fn registry() -> Registry {
        Registry::compile(GROUPS).unwrap()
    }

    fn matched_name(result: Result<Dispatch<'_>, DispatchError>) -> &'static str {
        match result {
            Ok(Dispatch::Operation { operation, .. }) => operation.spec.name,
            other => panic!("expected an operation, got {:?}", other),
        }
    }

    #[test]
    fn test_operation_found_by_alias_and_shorthand() {
        let registry = registry();
        let ctx = MatchContext::default();
        assert_eq!(matched_name(identify(&registry, &args(&["w", "l"]), ctx)), "listWidgets");
        assert_eq!(matched_name(identify(&registry, &args(&["widgets", "abc", "r"]), ctx)), "readWidget");
    }

    #[test]
    fn test_first_group_wins_and_fails_hard() {
        let registry = registry();
        let err = identify(&registry, &args(&["widgets", "count"]), MatchContext::default()).unwrap_err();
        match err {
            DispatchError::Syntax { group, usage } => {
                assert_eq!(group, "widgets");
                assert_eq!(
                    usage,
                    vec!["evrythng widgets|w list (l)", "evrythng widgets|w $id read (r)"]
                );
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_first_token() {
        let err = identify(&registry(), &args(&["gadgets", "list"]), MatchContext::default()).unwrap_err();
        assert_eq!(err, DispatchError::UnknownCommand("gadgets".to_string()));
    }

    #[test]
    fn test_interactive_keyword() {
        let registry = registry();
        let result = identify(&registry, &args(&["repl"]), MatchContext::default());
        assert!(matches!(result, Ok(Dispatch::Interactive)));
    }
}
