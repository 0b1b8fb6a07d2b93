// src/core/registry.rs

//! # Operation Registry
//!
//! Resource groups and their operations are declared as `'static` data (see
//! `cli::catalog`). [`Registry::compile`] turns that table into a lookup
//! structure with every pattern pre-compiled, and rejects malformed entries
//! before any argument is dispatched.

use thiserror::Error;

use crate::{
    core::pattern::{Pattern, PatternError, PatternToken},
    models::Method,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Operation '{operation}' of '{group}' has an invalid pattern: {source}")]
    Pattern {
        group: &'static str,
        operation: &'static str,
        #[source]
        source: PatternError,
    },
    #[error("Operation '{operation}' of '{group}' uses path slot {{{slot}}}, which is not a placeholder in its pattern.")]
    PathSlot {
        group: &'static str,
        operation: &'static str,
        slot: usize,
    },
    #[error("Operation '{operation}' of '{group}' sends a body but its pattern has no $payload.")]
    MissingPayload {
        group: &'static str,
        operation: &'static str,
    },
    #[error("Resource group #{0} has no name.")]
    UnnamedGroup(usize),
}

/// Hand-written executors, resolved through exhaustive matching in `cli::handlers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    KeysAdd,
    KeysList,
    KeysRead,
    KeysUse,
    KeysRemove,
    OptionsList,
    OptionsSet,
    AccountConfigHelp,
    AccountConfigList,
    AccountConfigRead,
    AccountConfigUpdate,
    AccountConfigDelete,
}

/// A declarative REST mapping.
///
/// `{n}` in `path` is replaced with the n-th argument after the group name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
}

/// What an operation does once it has been identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Request(Endpoint),
    Handler(Handler),
}

/// A single operation of a resource group.
#[derive(Debug)]
pub struct OperationSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    /// Overrides the pattern in usage listings, e.g. to mention `--build`.
    pub help_pattern: Option<&'static str>,
    pub action: Action,
}

/// A named collection of operations targeting one API resource type.
#[derive(Debug)]
pub struct ResourceGroup {
    /// The group name followed by its aliases. Any of them opens the group.
    pub first_args: &'static [&'static str],
    pub about: &'static str,
    pub operations: &'static [OperationSpec],
}

impl ResourceGroup {
    /// The canonical (first) name of the group.
    pub fn name(&self) -> &'static str {
        self.first_args.first().copied().unwrap_or_default()
    }

    pub fn answers_to(&self, token: &str) -> bool {
        self.first_args.contains(&token)
    }
}

/// An operation with its pattern compiled.
#[derive(Debug)]
pub struct CompiledOperation {
    pub spec: &'static OperationSpec,
    pub pattern: Pattern,
}

/// A resource group with all of its operations compiled, in declaration order.
#[derive(Debug)]
pub struct CompiledGroup {
    pub group: &'static ResourceGroup,
    pub operations: Vec<CompiledOperation>,
}

/// The immutable, compiled operation table used by the dispatcher.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<CompiledGroup>,
}

impl Registry {
    /// Compiles every pattern of every group, preserving declaration order.
    pub fn compile(groups: &'static [ResourceGroup]) -> Result<Self, RegistryError> {
        let mut compiled = Vec::with_capacity(groups.len());

        for (position, group) in groups.iter().enumerate() {
            if group.first_args.is_empty() {
                return Err(RegistryError::UnnamedGroup(position));
            }

            let mut operations = Vec::with_capacity(group.operations.len());
            for spec in group.operations {
                let pattern =
                    Pattern::compile(spec.pattern).map_err(|source| RegistryError::Pattern {
                        group: group.name(),
                        operation: spec.name,
                        source,
                    })?;
                check_action(group, spec, &pattern)?;
                operations.push(CompiledOperation { spec, pattern });
            }

            log::trace!(
                "Compiled group '{}' with {} operations",
                group.name(),
                operations.len()
            );
            compiled.push(CompiledGroup { group, operations });
        }

        Ok(Self { groups: compiled })
    }

    pub fn groups(&self) -> &[CompiledGroup] {
        &self.groups
    }
}

/// Verifies that an endpoint only splices placeholder arguments into its path
/// and that body-carrying verbs have somewhere to take the body from.
fn check_action(
    group: &'static ResourceGroup,
    spec: &'static OperationSpec,
    pattern: &Pattern,
) -> Result<(), RegistryError> {
    let Action::Request(endpoint) = spec.action else {
        return Ok(());
    };

    for slot in path_slots(endpoint.path) {
        let is_placeholder = pattern
            .tokens()
            .get(slot)
            .is_some_and(|t| t.is_placeholder() && *t != PatternToken::Payload);
        if !is_placeholder {
            return Err(RegistryError::PathSlot {
                group: group.name(),
                operation: spec.name,
                slot,
            });
        }
    }

    if endpoint.method.has_body() && pattern.payload_position().is_none() {
        return Err(RegistryError::MissingPayload {
            group: group.name(),
            operation: spec.name,
        });
    }

    Ok(())
}

/// Lists the `{n}` slot numbers used by a path template.
fn path_slots(template: &str) -> Vec<usize> {
    let mut slots = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = rest.get(start + 1..).unwrap_or_default();
        let Some(end) = after.find('}') else { break };
        if let Ok(slot) = after.get(..end).unwrap_or_default().parse::<usize>() {
            slots.push(slot);
        }
        rest = after.get(end + 1..).unwrap_or_default();
    }
    slots
}

/// Renders an endpoint path, percent-encoding each spliced argument.
pub fn render_path(template: &str, args: &[String]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rendered.push_str(rest.get(..start).unwrap_or_default());
        let after = rest.get(start + 1..).unwrap_or_default();
        let slot = after
            .find('}')
            .and_then(|end| after.get(..end)?.parse::<usize>().ok().map(|slot| (slot, end)));
        match slot {
            Some((slot, end)) => {
                let value = args.get(slot).map(String::as_str).unwrap_or_default();
                rendered.push_str(&urlencoding::encode(value));
                rest = after.get(end + 1..).unwrap_or_default();
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    static GOOD: &[ResourceGroup] = &[ResourceGroup {
        first_args: &["widgets", "w"],
        about: "Work with widgets.",
        operations: &[
            OperationSpec {
                name: "listWidgets",
                pattern: "list",
                help_pattern: None,
                action: Action::Request(Endpoint {
                    method: Method::Get,
                    path: "/widgets",
                }),
            },
            OperationSpec {
                name: "updateWidget",
                pattern: "$id update $payload",
                help_pattern: None,
                action: Action::Request(Endpoint {
                    method: Method::Put,
                    path: "/widgets/{0}",
                }),
            },
        ],
    }];

    static BAD_SLOT: &[ResourceGroup] = &[ResourceGroup {
        first_args: &["widgets"],
        about: "",
        operations: &[OperationSpec {
            name: "readWidget",
            pattern: "$id read",
            help_pattern: None,
            action: Action::Request(Endpoint {
                method: Method::Get,
                path: "/widgets/{1}",
            }),
        }],
    }];

    static NO_PAYLOAD: &[ResourceGroup] = &[ResourceGroup {
        first_args: &["widgets"],
        about: "",
        operations: &[OperationSpec {
            name: "createWidget",
            pattern: "create",
            help_pattern: None,
            action: Action::Request(Endpoint {
                method: Method::Post,
                path: "/widgets",
            }),
        }],
    }];

    #[test]
    fn test_compile_preserves_order() {
        let registry = Registry::compile(GOOD).unwrap();
        let group = &registry.groups()[0];
        assert_eq!(group.group.name(), "widgets");
        assert!(group.group.answers_to("w"));
        let names: Vec<_> = group.operations.iter().map(|o| o.spec.name).collect();
        assert_eq!(names, vec!["listWidgets", "updateWidget"]);
    }

    #[test]
    fn test_compile_rejects_non_placeholder_slot() {
        let err = Registry::compile(BAD_SLOT).unwrap_err();
        assert!(matches!(err, RegistryError::PathSlot { slot: 1, .. }));
    }

    #[test]
    fn test_compile_rejects_body_without_payload() {
        let err = Registry::compile(NO_PAYLOAD).unwrap_err();
        assert!(matches!(err, RegistryError::MissingPayload { .. }));
    }

    #[test]
    fn test_render_path_splices_and_encodes() {
        let args: Vec<String> = ["abc", "thngs", "a b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            render_path("/collections/{0}/thngs/{2}", &args),
            "/collections/abc/thngs/a%20b"
        );
        assert_eq!(render_path("/thngs", &args), "/thngs");
    }

    #[test]
    fn test_path_slots() {
        assert_eq!(path_slots("/a/{0}/b/{2}"), vec![0, 2]);
        assert!(path_slots("/a").is_empty());
    }
}
