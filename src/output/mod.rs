//! Output formatters for report queries and deletion results.
//!
//! - [`text`] for humans, with IEC sizes and optional color
//! - [`json`] for automation and scripting
//!
//! # Example
//!
//! ```
//! use rmlint_manager::output::text::write_space;
//! use rmlint_manager::report::ReportIndex;
//!
//! let index = ReportIndex::build(Vec::new());
//! let mut out = Vec::new();
//! write_space(&mut out, &index).unwrap();
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{write_json, JsonEntryList, JsonOutputError, JsonSpace, JsonSummary};
pub use text::format_size;
