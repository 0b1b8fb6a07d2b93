// src/cli/handlers/account_config.rs

//! A convenience layer over `/accounts/:id/configuration` for the first
//! account the credential can see.

use anyhow::{Result, anyhow, bail};
use serde_json::Value;

use super::{Invocation, request};
use crate::{
    core::{pattern::Pattern, switches::RequestOptions},
    models::{Method, Outcome},
    system::http::ApiSession,
};

const CONFIG_NAMES: &[&str] = &[
    "uniqueIdentifiers",
    "bi",
    "types",
    "dashboards",
    "brands",
    "consumerEngagement",
    "labels",
    "schemas",
    "regions",
];

fn ensure_name_valid(name: &str) -> Result<()> {
    if !CONFIG_NAMES.contains(&name) {
        bail!(
            "Configuration name '{}' is invalid.\n\nSelect from:\n{}",
            name,
            CONFIG_NAMES.join(", ")
        );
    }
    Ok(())
}

async fn first_account(session: &ApiSession<'_>) -> Result<Value> {
    let accounts = session.get_silently("/accounts").await?;
    accounts
        .as_array()
        .and_then(|list| list.first())
        .cloned()
        .ok_or_else(|| anyhow!("No account is visible to this API key."))
}

fn account_id(account: &Value) -> Result<&str> {
    account
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("The account has no 'id'."))
}

/// `account-config help`
pub fn help(inv: &mut Invocation<'_>) -> Result<Outcome> {
    writeln!(inv.out, "\nSelect 'name' from:\n{}", CONFIG_NAMES.join(", "))?;
    Ok(Outcome::Completed(Value::Null))
}

/// `account-config list`
pub async fn list(options: &RequestOptions, inv: &mut Invocation<'_>) -> Result<Outcome> {
    let client = inv.client(options)?;
    let settings = inv.config.options.clone();
    let session = ApiSession { client: &client, options, settings: &settings, prompt: inv.prompt };

    let configuration = first_account(&session)
        .await?
        .get("configuration")
        .cloned()
        .unwrap_or(Value::Null);
    writeln!(inv.out, "{}", serde_json::to_string_pretty(&configuration)?)?;
    Ok(Outcome::Completed(configuration))
}

/// `account-config $name read`
pub async fn read(args: &[String], options: &RequestOptions, inv: &mut Invocation<'_>) -> Result<Outcome> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    ensure_name_valid(name)?;

    let client = inv.client(options)?;
    let settings = inv.config.options.clone();
    let session = ApiSession { client: &client, options, settings: &settings, prompt: inv.prompt };

    let account = first_account(&session).await?;
    let Some(value) = account.get("configuration").and_then(|c| c.get(name)).cloned() else {
        bail!("Configuration '{}' is not yet set.", name);
    };
    writeln!(inv.out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(Outcome::Completed(value))
}

/// `account-config $name update $payload`
pub async fn update(
    pattern: &Pattern,
    args: &[String],
    options: &RequestOptions,
    inv: &mut Invocation<'_>,
) -> Result<Outcome> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    ensure_name_valid(name)?;
    let body = request::payload(pattern, args, options, inv.prompt)?;

    let client = inv.client(options)?;
    let settings = inv.config.options.clone();
    let session = ApiSession { client: &client, options, settings: &settings, prompt: inv.prompt };

    let account = first_account(&session).await?;
    let path = format!("/accounts/{}/configuration/{}", account_id(&account)?, name);
    session.request(Method::Put, &path, Some(body), inv.out).await
}

/// `account-config $name delete`
pub async fn delete(args: &[String], options: &RequestOptions, inv: &mut Invocation<'_>) -> Result<Outcome> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    ensure_name_valid(name)?;

    let client = inv.client(options)?;
    let settings = inv.config.options.clone();
    let session = ApiSession { client: &client, options, settings: &settings, prompt: inv.prompt };

    let account = first_account(&session).await?;
    let path = format!("/accounts/{}/configuration/{}", account_id(&account)?, name);
    session.request(Method::Delete, &path, None, inv.out).await
}
