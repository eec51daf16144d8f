//! Digest templating
//!
//! Renders the featured models into the HTML email body using minijinja.
//!
//! # Filters
//!
//! - `thousands`: `1234567` becomes `1,234,567`
//! - `date`: timestamp to `YYYY-MM-DD`, "Recently" when unparsable

mod engine;
mod errors;
mod filters;

pub use engine::DigestRenderer;
#[allow(unused_imports)]
pub use errors::TemplateError;
