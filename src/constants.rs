// src/constants.rs

/// The name the binary is invoked as. Used in usage lines and help output.
pub const BIN_NAME: &str = "evrythng";

/// The name of the directory holding the CLI configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "evrythng";

/// The name of the configuration file (inside the config directory).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that points to an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "EVRYTHNG_CONFIG";

/// The reserved first token that opens the interactive command loop.
pub const INTERACTIVE_KEYWORD: &str = "repl";

/// Page size applied to list requests when neither `--per-page` nor the config sets one.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Largest page size the platform accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Length of a platform API key (operator key or access token).
pub const API_KEY_LENGTH: usize = 80;

/// Length of a platform-generated resource ID.
pub const PLATFORM_ID_LENGTH: usize = 24;

/// How many leading characters of a credential may be echoed.
pub const CREDENTIAL_PREFIX_LENGTH: usize = 4;

/// Region used for raw `--api-key` overrides when no key is active.
pub const DEFAULT_REGION: &str = "us";

/// Regions written to a freshly created configuration file.
pub const DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("us", "https://api.evrythng.com"),
    ("eu", "https://api-eu.evrythng.com"),
    ("us-v2", "https://api.evrythng.io/v2"),
    ("eu-v2", "https://api.eu.evrythng.io/v2"),
];
