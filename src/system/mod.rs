//! # System Interaction Layer
//!
//! Abstractions over everything outside the process: the platform API, the
//! terminal and the filesystem.
//!
//! ## Modules
//!
//! - **`http`**: The HTTP pipeline. `ApiClient` sends requests and decodes
//!   responses; `ApiSession` adds confirmation, request echo and shaping.
//! - **`prompt`**: The `Prompt` trait for confirmations and text input, with a
//!   `dialoguer` terminal implementation and a scripted one.
//! - **`files`**: CSV and JSON import/export of resource lists.

pub mod files;
pub mod http;
pub mod prompt;
