//! Branded base template

use std::{fs, path::PathBuf};

use css_inline::CSSInliner;
use serde::Serialize;
use tera::{Context, Tera};

use super::TemplateError;

const CONTENT_TEMPLATE: &str = "content.html";
const BASE_TEMPLATE: &str = "base.html";

/// Logo and store badge image URLs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogoUrls {
    /// Brand logo
    pub brand: String,
    /// Facebook icon
    pub facebook: String,
    /// Instagram icon
    pub instagram: String,
    /// Twitter icon
    pub twitter: String,
    /// LinkedIn icon
    pub linkedin: String,
    /// App Store badge
    pub download_ios: String,
    /// Google Play badge
    pub download_android: String,
}

/// Footer link URLs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Urls {
    /// Help center
    pub help_center: String,
    /// Privacy policy
    pub privacy_policy: String,
    /// Unsubscribe page
    pub unsubscribe: String,
    /// Frequently asked questions
    pub faq: String,
}

/// Where the base template lives and what it is rendered with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Path of the base template file
    pub base_template_path: PathBuf,

    /// Logo URLs exposed as `logo_urls`
    pub logo_urls: LogoUrls,

    /// Link URLs exposed as `urls`
    pub urls: Urls,
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    logo_urls: &'a LogoUrls,
    urls: &'a Urls,
}

/// Wraps email content in the branded base template.
///
/// The content is registered as `content.html` and the base file as
/// `base.html`, which places the content with `{% include "content.html" %}`.
/// Both see `logo_urls` and `urls`. Values are HTML-escaped unless passed
/// through the `safe` filter. Styles of the rendered document are inlined.
#[derive(Clone, Debug)]
pub struct BaseTemplate {
    config: TemplateConfig,
}

impl BaseTemplate {
    /// Creates a base template from its configuration
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// Renders `content` inside the base template
    pub fn embed(&self, content: &str) -> Result<String, TemplateError> {
        let mut tera = Tera::default();

        tera.add_raw_template(CONTENT_TEMPLATE, content)
            .map_err(TemplateError::Content)?;

        // Registered by name so autoescaping follows `base.html`, not the file's extension.
        let base = fs::read_to_string(&self.config.base_template_path)
            .map_err(TemplateError::BaseTemplateFile)?;

        tera.add_raw_template(BASE_TEMPLATE, &base)
            .map_err(TemplateError::BaseTemplate)?;

        let context = Context::from_serialize(TemplateContext {
            logo_urls: &self.config.logo_urls,
            urls: &self.config.urls,
        })
        .map_err(TemplateError::Render)?;

        let html = tera
            .render(BASE_TEMPLATE, &context)
            .map_err(TemplateError::Render)?;

        Ok(inliner().inline(&html)?)
    }
}

/// Inlines `<style>` blocks only. Linked stylesheets are never fetched.
fn inliner() -> CSSInliner<'static> {
    CSSInliner::options()
        .load_remote_stylesheets(false)
        .build()
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        net::TcpListener,
    };

    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use super::*;

    const BASE: &str = r#"<html>
<head><style>.footer { color: #999999; }</style></head>
<body>
<img src="{{ logo_urls.brand }}" alt="logo">
<div id="content">{% include "content.html" %}</div>
<p class="footer"><a href="{{ urls.help_center }}">Help</a></p>
</body>
</html>"#;

    fn base_template_file(source: &str) -> TestResult<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(source.as_bytes())?;

        Ok(file)
    }

    fn template(path: PathBuf) -> BaseTemplate {
        BaseTemplate::new(TemplateConfig {
            base_template_path: path,
            logo_urls: LogoUrls {
                brand: "https://cdn.example.com/brand.png".to_string(),
                ..Default::default()
            },
            urls: Urls {
                help_center: "https://help.example.com".to_string(),
                faq: "<b>FAQ</b>".to_string(),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_embed_wraps_content_in_base_template() -> TestResult {
        let file = base_template_file(BASE)?;

        let html = template(file.path().to_path_buf()).embed("<p>Hello User!</p>")?;

        assert!(html.contains("<p>Hello User!</p>"));
        assert!(html.contains("cdn.example.com"));
        assert!(html.contains("help.example.com"));

        Ok(())
    }

    #[test]
    fn test_embed_inlines_styles() -> TestResult {
        let file = base_template_file(BASE)?;

        let html = template(file.path().to_path_buf()).embed("Hello!")?;

        assert!(!html.contains("<style>"));
        assert!(html.contains("#999999"));

        Ok(())
    }

    #[test]
    fn test_content_can_use_the_context() -> TestResult {
        let file = base_template_file(BASE)?;

        let html = template(file.path().to_path_buf())
            .embed(r#"<a href="{{ urls.help_center }}">Contact support</a>"#)?;

        assert!(html.contains("Contact support"));
        assert_eq!(html.matches("help.example.com").count(), 2);

        Ok(())
    }

    #[test]
    fn test_values_are_escaped_unless_marked_safe() -> TestResult {
        let file = base_template_file(
            r#"<html><body>{% include "content.html" %}<div id="safe">{{ urls.faq | safe }}</div><div id="escaped">{{ urls.faq }}</div></body></html>"#,
        )?;

        let html = template(file.path().to_path_buf()).embed("Hello!")?;

        assert!(html.contains(r#"<div id="safe"><b>FAQ</b></div>"#));
        assert!(html.contains("&lt;b&gt;FAQ&lt;/b&gt;"));

        Ok(())
    }

    #[test]
    fn test_shipped_base_template() -> TestResult {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/emails/base.html");

        let html = template(path).embed("<p>Your code is 1234</p>")?;

        assert!(html.contains("<p>Your code is 1234</p>"));
        assert!(html.contains("https://cdn.example.com/brand.png"));
        assert!(html.contains("Help Center"));
        assert!(!html.contains("<style>"));

        Ok(())
    }

    #[test]
    fn test_escaping_does_not_depend_on_the_file_extension() -> TestResult {
        let mut file = tempfile::Builder::new().suffix(".tmpl").tempfile()?;
        file.write_all(br#"{% include "content.html" %}<div id="faq">{{ urls.faq }}</div>"#)?;

        let html = template(file.path().to_path_buf()).embed("Hello!")?;

        assert!(html.contains("&lt;b&gt;FAQ&lt;/b&gt;"));
        assert!(!html.contains("<b>FAQ</b>"));

        Ok(())
    }

    #[test]
    fn test_linked_stylesheets_are_not_fetched() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        let file = base_template_file(BASE)?;

        let html = template(file.path().to_path_buf()).embed(&format!(
            r#"<link rel="stylesheet" href="http://127.0.0.1:{port}/internal-admin"><p>Hi</p>"#
        ))?;

        assert!(html.contains("<p>Hi</p>"));
        assert!(matches!(
            listener.accept(),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock
        ));

        Ok(())
    }

    #[test]
    fn test_local_files_are_not_read_as_stylesheets() -> TestResult {
        let mut css = tempfile::Builder::new().suffix(".css").tempfile()?;
        css.write_all(b"p { color: #123456; }")?;

        let file = base_template_file(BASE)?;

        let html = template(file.path().to_path_buf()).embed(&format!(
            r#"<link rel="stylesheet" href="{}"><p>Hi</p>"#,
            css.path().display()
        ))?;

        assert!(html.contains("<p>Hi</p>"));
        assert!(!html.contains("#123456"));

        Ok(())
    }

    #[test]
    fn test_missing_base_template() {
        let result = template(PathBuf::from("/nonexistent/base.html")).embed("Hello!");

        assert!(matches!(result, Err(TemplateError::BaseTemplateFile(_))));
    }

    #[test]
    fn test_content_that_is_not_a_template() -> TestResult {
        let file = base_template_file(BASE)?;

        let result = template(file.path().to_path_buf()).embed("Hello {{ unclosed");

        assert!(matches!(result, Err(TemplateError::Content(_))));

        Ok(())
    }

    #[test]
    fn test_base_template_referencing_unknown_values() -> TestResult {
        let file = base_template_file(r#"{% include "content.html" %}{{ nope.missing }}"#)?;

        let result = template(file.path().to_path_buf()).embed("Hello!");

        assert!(matches!(result, Err(TemplateError::Render(_))));

        Ok(())
    }
}
