// src/cli/handlers/mod.rs

// Executors for every operation kind. Declarative endpoints go through
// `request`; the others are hand-written.

pub mod account_config;
pub mod keys;
pub mod options;
pub mod request;

use anyhow::Result;
use std::io::Write;

use crate::{
    core::{
        credentials,
        registry::{Action, CompiledOperation, Handler},
        switches::RequestOptions,
    },
    models::Outcome,
    state::ConfigState,
    system::{http::ApiClient, prompt::Prompt},
};

/// The collaborators an operation runs with.
pub struct Invocation<'a> {
    pub config: &'a mut ConfigState,
    pub prompt: &'a dyn Prompt,
    pub out: &'a mut dyn Write,
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Invocation<'_> {
    /// Resolves the credential for this command line and opens a client.
    pub fn client(&self, options: &RequestOptions) -> Result<ApiClient> {
        let credential = credentials::resolve(&**self.config, options.api_key.as_deref())?;
        Ok(ApiClient::new(&credential)?)
    }
}

/// Runs one identified operation. `args` are the tokens after the group name.
pub async fn execute(
    operation: &CompiledOperation,
    args: &[String],
    options: &RequestOptions,
    inv: &mut Invocation<'_>,
) -> Result<Outcome> {
    match operation.spec.action {
        Action::Request(endpoint) => {
            request::handle(endpoint, &operation.pattern, args, options, inv).await
        }
        Action::Handler(handler) => match handler {
            Handler::KeysAdd => keys::add(args, inv).await,
            Handler::KeysList => keys::list(inv),
            Handler::KeysRead => keys::read(args, inv),
            Handler::KeysUse => keys::select(args, inv),
            Handler::KeysRemove => keys::remove(args, inv),
            Handler::OptionsList => options::list(inv),
            Handler::OptionsSet => options::set(args, inv),
            Handler::AccountConfigHelp => account_config::help(inv),
            Handler::AccountConfigList => account_config::list(options, inv).await,
            Handler::AccountConfigRead => account_config::read(args, options, inv).await,
            Handler::AccountConfigUpdate => {
                account_config::update(&operation.pattern, args, options, inv).await
            }
            Handler::AccountConfigDelete => account_config::delete(args, options, inv).await,
        },
    }
}
