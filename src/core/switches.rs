// src/core/switches.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::core::pattern::MatchContext;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Invalid switch: {0}")]
    Invalid(String),
    #[error("Switch '{switch}' expects a value: {label}")]
    MissingValue { switch: String, label: &'static str },
    #[error("Switch '{switch}' expects a whole number, got '{value}'.")]
    NotANumber { switch: String, value: String },
}

/// Every switch the CLI understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Filter,
    PerPage,
    Project,
    WithScopes,
    Context,
    Ids,
    WithErrors,
    WithIds,
    Summary,
    ApiKey,
    Page,
    Expand,
    Build,
    Field,
    Simple,
    Silent,
    ToCsv,
    ToPage,
    FromCsv,
    FromJson,
    ToJson,
}

#[derive(Debug)]
pub struct SwitchDefinition {
    pub name: &'static str,
    pub about: &'static str,
    /// Present for switches that consume the following token.
    pub value_label: Option<&'static str>,
    pub switch: Switch,
}

/// The switch catalog, in the order it is shown in help output.
pub static SWITCH_CATALOG: &[SwitchDefinition] = &[
    SwitchDefinition { name: "--filter", about: "Specify a Thng/product/collection filter.", value_label: Some("<query>"), switch: Switch::Filter },
    SwitchDefinition { name: "--per-page", about: "Number of items to return per page.", value_label: Some("<count>"), switch: Switch::PerPage },
    SwitchDefinition { name: "--project", about: "Specify a project to scope the request to.", value_label: Some("<project ID>"), switch: Switch::Project },
    SwitchDefinition { name: "--with-scopes", about: "Include scopes in the response.", value_label: None, switch: Switch::WithScopes },
    SwitchDefinition { name: "--context", about: "Include action context in the response.", value_label: None, switch: Switch::Context },
    SwitchDefinition { name: "--ids", about: "Comma-separated list of IDs to read.", value_label: Some("<list of IDs>"), switch: Switch::Ids },
    SwitchDefinition { name: "--with-errors", about: "Report per-item errors in batch results.", value_label: None, switch: Switch::WithErrors },
    SwitchDefinition { name: "--with-ids", about: "Include IDs in batch results.", value_label: None, switch: Switch::WithIds },
    SwitchDefinition { name: "--summary", about: "Print one 'id name' line per item.", value_label: None, switch: Switch::Summary },
    SwitchDefinition { name: "--api-key", about: "Use a stored key name or a raw API key for this request.", value_label: Some("<API key|name>"), switch: Switch::ApiKey },
    SwitchDefinition { name: "--page", about: "Follow the 'link' header to a later page.", value_label: Some("<page>"), switch: Switch::Page },
    SwitchDefinition { name: "--expand", about: "Show timestamps as readable dates.", value_label: None, switch: Switch::Expand },
    SwitchDefinition { name: "--build", about: "Enter the request payload interactively.", value_label: None, switch: Switch::Build },
    SwitchDefinition { name: "--field", about: "Print only one field of the response.", value_label: Some("<key>"), switch: Switch::Field },
    SwitchDefinition { name: "--simple", about: "Print a flattened, indented view.", value_label: None, switch: Switch::Simple },
    SwitchDefinition { name: "--silent", about: "Print nothing.", value_label: None, switch: Switch::Silent },
    SwitchDefinition { name: "--to-csv", about: "Write the response to a CSV file.", value_label: Some("<output file>"), switch: Switch::ToCsv },
    SwitchDefinition { name: "--to-page", about: "Read this many pages before exporting.", value_label: Some("<page>"), switch: Switch::ToPage },
    SwitchDefinition { name: "--from-csv", about: "Create one resource per CSV row.", value_label: Some("<input file>"), switch: Switch::FromCsv },
    SwitchDefinition { name: "--from-json", about: "Create one resource per JSON array item.", value_label: Some("<input file>"), switch: Switch::FromJson },
    SwitchDefinition { name: "--to-json", about: "Write the response to a JSON file.", value_label: Some("<output file>"), switch: Switch::ToJson },
];

/// Finds a switch definition by its full name (including the leading `--`).
pub fn find_switch(name: &str) -> Option<&'static SwitchDefinition> {
    SWITCH_CATALOG.iter().find(|def| def.name == name)
}

/// Switch values for a single command line.
///
/// Built once by [`apply`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub filter: Option<String>,
    pub per_page: Option<u32>,
    pub project: Option<String>,
    pub with_scopes: bool,
    pub context: bool,
    pub ids: Option<String>,
    pub with_errors: bool,
    pub with_ids: bool,
    pub summary: bool,
    pub api_key: Option<String>,
    pub page: Option<u32>,
    pub expand: bool,
    pub build: bool,
    pub field: Option<String>,
    pub simple: bool,
    pub silent: bool,
    pub to_csv: Option<PathBuf>,
    pub to_page: Option<u32>,
    pub from_csv: Option<PathBuf>,
    pub from_json: Option<PathBuf>,
    pub to_json: Option<PathBuf>,
}

impl RequestOptions {
    /// True when the request payload is not taken from argv.
    pub fn payload_sourced_elsewhere(&self) -> bool {
        self.build || self.from_csv.is_some() || self.from_json.is_some()
    }

    pub fn match_context(&self) -> MatchContext {
        MatchContext {
            payload_sourced_elsewhere: self.payload_sourced_elsewhere(),
        }
    }

    /// Records one switch occurrence. Later occurrences overwrite earlier ones.
    fn record(&mut self, def: &SwitchDefinition, value: Option<&str>) -> Result<(), SwitchError> {
        let text = || value.unwrap_or_default().to_string();
        let number = || -> Result<u32, SwitchError> {
            let raw = value.unwrap_or_default();
            raw.parse::<u32>().map_err(|_| SwitchError::NotANumber {
                switch: def.name.to_string(),
                value: raw.to_string(),
            })
        };

        match def.switch {
            Switch::Filter => self.filter = Some(text()),
            Switch::PerPage => self.per_page = Some(number()?),
            Switch::Project => self.project = Some(text()),
            Switch::WithScopes => self.with_scopes = true,
            Switch::Context => self.context = true,
            Switch::Ids => self.ids = Some(text()),
            Switch::WithErrors => self.with_errors = true,
            Switch::WithIds => self.with_ids = true,
            Switch::Summary => self.summary = true,
            Switch::ApiKey => self.api_key = Some(text()),
            Switch::Page => self.page = Some(number()?),
            Switch::Expand => self.expand = true,
            Switch::Build => self.build = true,
            Switch::Field => self.field = Some(text()),
            Switch::Simple => self.simple = true,
            Switch::Silent => self.silent = true,
            Switch::ToCsv => self.to_csv = Some(PathBuf::from(text())),
            Switch::ToPage => self.to_page = Some(number()?),
            Switch::FromCsv => self.from_csv = Some(PathBuf::from(text())),
            Switch::FromJson => self.from_json = Some(PathBuf::from(text())),
            Switch::ToJson => self.to_json = Some(PathBuf::from(text())),
        }
        Ok(())
    }
}

/// The positional tokens of a command line plus its switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArgs {
    pub args: Vec<String>,
    pub options: RequestOptions,
}

/// Splits argv into positional tokens and [`RequestOptions`].
///
/// # Logic:
/// - Any token starting with `--` is looked up in [`SWITCH_CATALOG`].
/// - A switch with a `value_label` consumes the following token, whatever it is.
/// - Everything else is positional, in its original order.
pub fn apply(argv: &[String]) -> Result<ResolvedArgs, SwitchError> {
    let mut args = Vec::new();
    let mut options = RequestOptions::default();
    let mut tokens = argv.iter();

    while let Some(token) = tokens.next() {
        if !token.starts_with("--") {
            args.push(token.clone());
            continue;
        }

        let def = find_switch(token).ok_or_else(|| SwitchError::Invalid(token.clone()))?;
        let value = match def.value_label {
            Some(label) => Some(tokens.next().ok_or_else(|| SwitchError::MissingValue {
                switch: def.name.to_string(),
                label,
            })?),
            None => None,
        };
        options.record(def, value.map(String::as_str))?;
    }

    log::debug!("Positional arguments: {:?}", args);
    Ok(ResolvedArgs { args, options })
}
