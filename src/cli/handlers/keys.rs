// src/cli/handlers/keys.rs

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde_json::{Value, json};

use super::Invocation;
use crate::{
    constants::API_KEY_LENGTH,
    core::credentials::{Credential, CredentialError, mask, region_url},
    models::{KeyEntry, Method, Outcome, RequestDescriptor},
    system::http::ApiClient,
};

fn arg(args: &[String], position: usize) -> &str {
    args.get(position).map(String::as_str).unwrap_or_default()
}

fn ensure_key_exists<'c>(inv: &'c Invocation<'_>, name: &str) -> Result<&'c KeyEntry> {
    inv.config
        .keys
        .get(name)
        .ok_or_else(|| CredentialError::UnknownKey(name.to_string()).into())
}

/// Checks that a key works in a region by reading its access.
async fn validate_credentials(api_url: &str, api_key: &str) -> Result<()> {
    let client = ApiClient::new(&Credential {
        api_key: api_key.to_string(),
        api_url: api_url.to_string(),
    })?;
    let descriptor = RequestDescriptor {
        method: Method::Get,
        path: "/access".to_string(),
        query: Vec::new(),
        headers: client.headers(Method::Get),
        body: None,
    };
    client.send(&descriptor).await?;
    Ok(())
}

/// `keys add $name $region $apiKey`
pub async fn add(args: &[String], inv: &mut Invocation<'_>) -> Result<Outcome> {
    let (name, region, api_key) = (arg(args, 1), arg(args, 2), arg(args, 3));

    let Ok(api_url) = region_url(&**inv.config, region) else {
        let regions: Vec<&str> = inv.config.regions.keys().map(String::as_str).collect();
        bail!("$region must be one of {}", regions.join(", "));
    };
    if name.split_whitespace().count() != 1 {
        bail!("Short name must be a single word");
    }
    if api_key.chars().count() != API_KEY_LENGTH {
        bail!("API key is an invalid length");
    }

    validate_credentials(&api_url, api_key)
        .await
        .context("Failed to add key - check $apiKey and $region are correct and compatible.")?;

    let entry = KeyEntry {
        api_key: api_key.to_string(),
        region: region.to_string(),
    };
    inv.config.keys.insert(name.to_string(), entry.clone());
    writeln!(inv.out, "\nAdded key '{}' in region '{}'", name.cyan(), region)?;

    select_key(inv, name)?;
    Ok(Outcome::Completed(serde_json::to_value(entry)?))
}

/// `keys list`
pub fn list(inv: &mut Invocation<'_>) -> Result<Outcome> {
    if inv.config.keys.is_empty() {
        log::error!("No keys have been stored.");
        return Ok(Outcome::Completed(json!({"keys": [], "using": ""})));
    }

    writeln!(inv.out, "\nCurrent: '{}'\nAvailable:", inv.config.using.green())?;
    for (name, entry) in &inv.config.keys {
        writeln!(inv.out, "- '{}' (API key: {})", name, mask(&entry.api_key))?;
    }
    writeln!(inv.out)?;

    let names: Vec<Value> = inv.config.keys.keys().map(|k| Value::String(k.clone())).collect();
    Ok(Outcome::Completed(json!({"keys": names, "using": inv.config.using})))
}

/// `keys $name read`: prints the full key, for use in scripts.
pub fn read(args: &[String], inv: &mut Invocation<'_>) -> Result<Outcome> {
    let api_key = ensure_key_exists(inv, arg(args, 0))?.api_key.clone();
    writeln!(inv.out, "{}", api_key)?;
    Ok(Outcome::Completed(Value::String(api_key)))
}

/// `keys $name use`
pub fn select(args: &[String], inv: &mut Invocation<'_>) -> Result<Outcome> {
    let name = arg(args, 0);
    select_key(inv, name)?;
    Ok(Outcome::Completed(Value::String(name.to_string())))
}

fn select_key(inv: &mut Invocation<'_>, name: &str) -> Result<()> {
    let region = ensure_key_exists(inv, name)?.region.clone();
    inv.config.using = name.to_string();
    writeln!(inv.out, "\nSwitched to key '{}' in region '{}'", name.cyan(), region)?;
    Ok(())
}

/// `keys $name remove`. Clears the selection when the key was in use.
pub fn remove(args: &[String], inv: &mut Invocation<'_>) -> Result<Outcome> {
    let name = arg(args, 0);
    ensure_key_exists(inv, name)?;

    inv.config.keys.remove(name);
    writeln!(inv.out, "\nRemoved key '{}'", name)?;

    if inv.config.using == name {
        writeln!(inv.out, "Key was in use, please choose another.")?;
        inv.config.using.clear();
    }
    Ok(Outcome::Completed(Value::Null))
}
