// src/core/pagination.rs

use serde_json::Value;

use crate::{
    models::ApiResponse,
    system::http::{ApiClient, HttpError},
};

/// Extracts the continuation URL from a `link` header value.
///
/// The URL is the percent-decoded text between `<` and `>`. Relative URLs are
/// resolved against `base_url`.
pub fn extract_next_url(link: &str, base_url: &str) -> String {
    let trimmed = link.trim();
    let inner = match (trimmed.find('<'), trimmed.find('>')) {
        (Some(start), Some(end)) if start < end => trimmed.get(start + 1..end).unwrap_or_default(),
        _ => trimmed,
    };
    let decoded = urlencoding::decode(inner)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| inner.to_string());

    if decoded.starts_with("http://") || decoded.starts_with("https://") {
        decoded
    } else if decoded.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), decoded)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), decoded)
    }
}

/// Follows the `link` header `target` times and returns the last page reached.
///
/// Running out of pages is not an error: the last page found is returned.
pub async fn advance_to_page(
    client: &ApiClient,
    mut response: ApiResponse,
    target: u32,
) -> Result<ApiResponse, HttpError> {
    for page in 0..target {
        let Some(link) = response.next_link() else {
            log::info!("No more pages. Returning last found page.");
            return Ok(response);
        };
        let url = extract_next_url(link, client.base_url());
        log::debug!("Advancing to page {}: {}", page + 1, url);
        response = client.fetch(&url).await?;
    }
    Ok(response)
}

/// Collects the items of the first page and of up to `max - 1` further pages.
pub async fn accumulate_pages(
    client: &ApiClient,
    mut response: ApiResponse,
    max: u32,
) -> Result<Vec<Value>, HttpError> {
    let mut items = into_items(response.data.take());

    for _ in 1..max {
        let Some(link) = response.next_link() else {
            break;
        };
        let url = extract_next_url(link, client.base_url());
        response = client.fetch(&url).await?;
        items.extend(into_items(response.data.take()));
        log::debug!("Reading - {} items", items.len());
    }

    log::info!("Read {} items.", items.len());
    Ok(items)
}

/// Coerces response data into a list of items.
pub fn into_items(data: Option<Value>) -> Vec<Value> {
    match data {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}
