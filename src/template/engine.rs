//! Digest renderer

use super::errors::TemplateError;
use super::filters;
use crate::digest::DigestEntry;
use chrono::NaiveDate;
use minijinja::Environment;

const DIGEST_TEMPLATE_NAME: &str = "digest.html";
const DIGEST_TEMPLATE: &str = include_str!("digest.html");

/// Tags shown per model
const MAX_TAGS: usize = 5;

/// Renders the HTML digest
///
/// Wraps minijinja with the digest filters and strict undefined handling.
/// The `.html` template name turns on HTML auto-escaping, so descriptions
/// and tags from the catalog are escaped.
pub struct DigestRenderer {
    env: Environment<'static>,
}

impl DigestRenderer {
    /// Create a renderer with the built-in digest template
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_template(DIGEST_TEMPLATE)
    }

    /// Create a renderer with a custom digest template
    pub fn with_template(source: &'static str) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        filters::register_filters(&mut env);

        env.add_template(DIGEST_TEMPLATE_NAME, source)
            .map_err(|e| TemplateError::from_render(DIGEST_TEMPLATE_NAME, e))?;

        Ok(Self { env })
    }

    /// Render the digest for `entries` dated `date`
    pub fn render(&self, entries: &[DigestEntry], date: NaiveDate) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(DIGEST_TEMPLATE_NAME)?;

        tmpl.render(minijinja::context! {
            date => date.format("%Y-%m-%d").to_string(),
            entries => entries,
            max_tags => MAX_TAGS,
        })
        .map_err(|e| TemplateError::from_render(DIGEST_TEMPLATE_NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> DigestEntry {
        DigestEntry {
            id: id.into(),
            owner: "acme".into(),
            description: "A compact model.".into(),
            growth_label: String::new(),
            likes: 1234,
            downloads: 9876543,
            last_modified_at: "2026-02-14T12:34:56.000Z".into(),
            link: format!("https://huggingface.co/{}", id),
            tags: Vec::new(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_render_entry() {
        let renderer = DigestRenderer::new().unwrap();
        let mut e = entry("acme/model-x");
        e.growth_label = "⭐ 50% likes/week".into();

        let html = renderer.render(&[e], date()).unwrap();

        // Auto-escaping also encodes '/', so match around it
        assert!(html.contains("as of 2026-03-01"));
        assert!(html.contains(r#"<a href="https:"#));
        assert!(html.contains("model-x</a>"));
        assert!(html.contains("by acme"));
        assert!(html.contains(r#"<div class="growth">⭐ 50% likes"#));
        assert!(html.contains("❤️ 1,234"));
        assert!(html.contains("⬇️ 9,876,543 downloads"));
        assert!(html.contains("Updated: 2026-02-14"));
    }

    #[test]
    fn test_empty_label_omits_badge() {
        let renderer = DigestRenderer::new().unwrap();
        let html = renderer.render(&[entry("acme/model-x")], date()).unwrap();
        assert!(!html.contains(r#"<div class="growth">"#));
    }

    #[test]
    fn test_tags_capped_at_five() {
        let renderer = DigestRenderer::new().unwrap();
        let mut e = entry("acme/model-x");
        e.tags = (1..=8).map(|i| format!("tag{}", i)).collect();

        let html = renderer.render(&[e], date()).unwrap();
        assert!(html.contains(r#"<span class="tag">tag5</span>"#));
        assert!(!html.contains("tag6"));
    }

    #[test]
    fn test_unparsable_date_renders_recently() {
        let renderer = DigestRenderer::new().unwrap();
        let mut e = entry("acme/model-x");
        e.last_modified_at = String::new();

        let html = renderer.render(&[e], date()).unwrap();
        assert!(html.contains("Updated: Recently"));
    }

    #[test]
    fn test_description_is_escaped() {
        let renderer = DigestRenderer::new().unwrap();
        let mut e = entry("acme/model-x");
        e.description = "<script>alert(1)</script>".into();

        let html = renderer.render(&[e], date()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_preserves_order() {
        let renderer = DigestRenderer::new().unwrap();
        let html = renderer
            .render(&[entry("acme/alpha"), entry("acme/omega")], date())
            .unwrap();

        let first = html.find("alpha").unwrap();
        let second = html.find("omega").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_invalid_template_is_syntax_error() {
        let result = DigestRenderer::with_template("{% for x in %}");
        assert!(matches!(result, Err(TemplateError::SyntaxError { .. })));
    }
}
