//! Security policy for hosting untrusted, AI-generated HTML.
//!
//! The policy restricts every fetchable source to a fixed allow-list: the
//! frame itself, inline content (the AI authors inline styles and scripts),
//! one external font provider, and HTTPS-only images/media/connections.
//! Anything outside the list is silently blocked by the host and falls back
//! to a system default - a deliberate trade-off of compatibility for attack
//! surface.

/// Host serving font stylesheets (the single allowed style origin besides
/// self/inline).
pub const FONT_STYLESHEET_HOST: &str = "https://fonts.googleapis.com";

/// Host serving the font files themselves.
pub const FONT_FILE_HOST: &str = "https://fonts.gstatic.com";

/// The content security policy injected into previewed documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    font_stylesheet_host: String,
    font_file_host: String,
}

impl Default for ContentSecurityPolicy {
    fn default() -> Self {
        Self {
            font_stylesheet_host: FONT_STYLESHEET_HOST.to_string(),
            font_file_host: FONT_FILE_HOST.to_string(),
        }
    }
}

impl ContentSecurityPolicy {
    /// A policy with a non-default font provider.
    pub fn with_font_hosts(
        font_stylesheet_host: impl Into<String>,
        font_file_host: impl Into<String>,
    ) -> Self {
        Self {
            font_stylesheet_host: font_stylesheet_host.into(),
            font_file_host: font_file_host.into(),
        }
    }

    /// Renders the policy directive string.
    ///
    /// The directive set and order are part of the external contract; hosts
    /// relying on the policy compare it verbatim.
    pub fn header_value(&self) -> String {
        format!(
            "script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
             style-src 'self' 'unsafe-inline' {styles}; \
             font-src 'self' data: {fonts}; \
             img-src 'self' data: blob: https:; \
             media-src 'self' https:; \
             connect-src 'self' https:; \
             frame-src 'none'",
            styles = self.font_stylesheet_host,
            fonts = self.font_file_host,
        )
    }

    /// Renders the policy as a `<meta>` element for document injection.
    pub fn meta_element(&self) -> String {
        format!(
            "<meta http-equiv=\"Content-Security-Policy\" content=\"{}\">",
            self.header_value()
        )
    }
}

/// True when the document already declares its own policy; injection must
/// not produce a second, conflicting one.
pub fn declares_policy(document: &str) -> bool {
    let lowered = document.to_lowercase();
    lowered.contains("http-equiv=\"content-security-policy\"")
        || lowered.contains("http-equiv='content-security-policy'")
}
