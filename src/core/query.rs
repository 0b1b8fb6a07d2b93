// src/core/query.rs

use crate::{
    constants::PLATFORM_ID_LENGTH,
    core::switches::RequestOptions,
    models::Method,
};

/// A path addresses a collection unless its last segment looks like a platform ID.
pub fn is_list_request(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or_default();
    last.chars().count() != PLATFORM_ID_LENGTH
}

/// Computes the ordered query parameters for a request.
///
/// Only parameters that were actually set are emitted. `perPage` is always
/// present on GET list requests, falling back to `default_per_page`.
pub fn build_query(
    method: Method,
    path: &str,
    options: &RequestOptions,
    default_per_page: u32,
) -> Vec<(String, String)> {
    let mut query = Vec::new();
    let mut push = |key: &str, value: String| query.push((key.to_string(), value));

    if let Some(filter) = &options.filter {
        push("filter", filter.clone());
    }
    if method == Method::Get && is_list_request(path) {
        push(
            "perPage",
            options.per_page.unwrap_or(default_per_page).to_string(),
        );
    }
    if let Some(project) = &options.project {
        push("project", project.clone());
    }
    if options.with_scopes {
        push("withScopes", "true".to_string());
    }
    if options.context {
        push("context", "true".to_string());
    }
    if options.with_errors {
        push("withErrors", "true".to_string());
    }
    if options.with_ids {
        push("withIds", "true".to_string());
    }
    if let Some(ids) = &options.ids {
        push("ids", ids.clone());
    }

    log::debug!("Query for {} {}: {:?}", method, path, query);
    query
}
