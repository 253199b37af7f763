//! Sandboxed hosting frame for previewed documents.
//!
//! The frame hosts arbitrary AI-generated HTML in an isolated rendering
//! context: no access to the hosting application's storage or cookies, no
//! top-level navigation. Document preparation wraps bare content in a
//! minimal shell and injects the security policy when the document does not
//! already declare one.

use crate::policy::{declares_policy, ContentSecurityPolicy};
use crate::viewport::PreviewViewport;

/// Sandbox tokens granted to the hosting frame.
///
/// Scripting only: no `allow-same-origin` (which would expose the host's
/// storage and cookies) and no `allow-top-navigation`.
pub const SANDBOX_TOKENS: &[&str] = &["allow-scripts", "allow-forms", "allow-modals"];

/// Whether scroll position can be carried across content updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    /// The host can introspect the frame and restore the position.
    Preserve,
    /// Introspection is unavailable; the position resets on update.
    Reset,
}

/// What the hosting frame can do, derived from its sandbox tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCapabilities {
    /// True when the frame shares the host origin and its document can be
    /// inspected from outside.
    pub same_origin_introspection: bool,
}

impl FrameCapabilities {
    /// Derives capabilities from a sandbox token set.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        Self {
            same_origin_introspection: tokens.contains(&"allow-same-origin"),
        }
    }
}

/// Scroll handling for a frame with the given capabilities: preserve where
/// feature-compatible, degrade gracefully (reset) otherwise.
pub fn scroll_policy(capabilities: FrameCapabilities) -> ScrollPolicy {
    if capabilities.same_origin_introspection {
        ScrollPolicy::Preserve
    } else {
        ScrollPolicy::Reset
    }
}

/// A document prepared for the sandboxed frame, plus the frame attributes
/// the host should apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFrame {
    /// The full document to load into the frame.
    pub document: String,
    /// Space-separated sandbox token list.
    pub sandbox_attribute: String,
    /// How the host should treat scroll position across updates.
    pub scroll_policy: ScrollPolicy,
    /// The viewport the surface is constrained to.
    pub viewport: PreviewViewport,
}

/// Prepares a document body for sandboxed hosting.
///
/// Bare content (no document structure) is wrapped in a minimal shell; the
/// security policy is injected only when the document does not already
/// declare one.
pub fn prepare_frame(
    document_body: &str,
    viewport: PreviewViewport,
    policy: &ContentSecurityPolicy,
) -> PreparedFrame {
    PreparedFrame {
        document: prepare_document(document_body, policy),
        sandbox_attribute: SANDBOX_TOKENS.join(" "),
        scroll_policy: scroll_policy(FrameCapabilities::from_tokens(SANDBOX_TOKENS)),
        viewport,
    }
}

/// Wraps and policy-injects a document body. See [`prepare_frame`].
pub fn prepare_document(document_body: &str, policy: &ContentSecurityPolicy) -> String {
    let document = if has_document_structure(document_body) {
        document_body.to_string()
    } else {
        wrap_in_shell(document_body)
    };

    if declares_policy(&document) {
        tracing::debug!("document declares its own security policy, leaving it");
        return document;
    }
    inject_policy(&document, policy)
}

/// True when the content carries its own document structure.
fn has_document_structure(content: &str) -> bool {
    let lowered = content.to_lowercase();
    lowered.contains("<!doctype")
        || find_tag(&lowered, "html").is_some()
        || find_tag(&lowered, "head").is_some()
        || find_tag(&lowered, "body").is_some()
}

fn wrap_in_shell(content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n{content}\n</body>\n</html>"
    )
}

/// Inserts the policy meta element as early in the document as possible:
/// right after `<head>` when present, otherwise after `<html>`, otherwise
/// before everything.
fn inject_policy(document: &str, policy: &ContentSecurityPolicy) -> String {
    let meta = policy.meta_element();
    if let Some(position) = tag_end(document, "head") {
        let (before, after) = document.split_at(position);
        return format!("{before}{meta}{after}");
    }
    if let Some(position) = tag_end(document, "html") {
        let (before, after) = document.split_at(position);
        return format!("{before}<head>{meta}</head>{after}");
    }
    format!("{meta}{document}")
}

/// Byte offset of the first occurrence of the given opening tag,
/// case-insensitive. The tag name must end at a delimiter so `<head` does
/// not match `<header>`.
fn find_tag(lowered: &str, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut from = 0;
    while let Some(found) = lowered[from..].find(&needle) {
        let start = from + found;
        match lowered.as_bytes().get(start + needle.len()) {
            None | Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
            | Some(b'/') => return Some(start),
            _ => from = start + needle.len(),
        }
    }
    None
}

/// Byte offset just past the closing `>` of the first occurrence of the
/// given opening tag, case-insensitive.
fn tag_end(document: &str, name: &str) -> Option<usize> {
    let lowered = document.to_lowercase();
    let start = find_tag(&lowered, name)?;
    let close = lowered[start..].find('>')?;
    Some(start + close + 1)
}
