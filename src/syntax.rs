//! The textual convention shared by the item extractor and the style
//! compiler: doc comments carrying `Title:` / `Description:` markers, the
//! `responsive-styles` mixin with a `with-<breakpoint>` token, and the
//! `#{$prefix}` placeholder standing in for a breakpoint class prefix.
//!
//! Both scans walk the source independently; they share only these
//! stateless pattern definitions so the two components cannot drift apart.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder token replaced by the active `with-<breakpoint>` prefix.
pub const PREFIX_PLACEHOLDER: &str = "#{$prefix}";

/// Token prefix shared by every breakpoint include argument.
pub const BREAKPOINT_TOKEN_PREFIX: &str = "with-";

/// `@mixin responsive-styles(` definition line.
pub static MIXIN_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@mixin\s+responsive-styles\(").expect("valid regex"));

/// `@include responsive-styles(<arg>, "with-<name>"...)` line; capture 1 is
/// the `with-<name>` token, quotes optional.
pub static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@include\s+responsive-styles\([^,]+,\s*"?(with-[\w-]+)"?"#).expect("valid regex")
});

/// The compiler only honors includes that open a body on the same line.
pub static INCLUDE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@include\s+responsive-styles\([^,]+,\s*"?(with-[\w-]+)"?\)\s*\{"#)
        .expect("valid regex")
});

/// `Title:` marker inside a doc block. The capture stops at a following
/// `Description:` marker or the block close so both can share one line.
pub static DOC_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Title:\s*(.+?)\s*(?:Description:|\*/|$)").expect("valid regex"));

/// `Description:` marker inside a doc block.
pub static DOC_DESC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Description:\s*(.+?)\s*(?:\*/|$)").expect("valid regex"));

/// Placeholder-prefixed selector inside the mixin body; capture 1 is the
/// class-name suffix.
pub static PREFIXED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.#\{\$prefix\}-([\w-]+)").expect("valid regex"));

/// Any dot-prefixed word token.
pub static CLASS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([\w-]+)").expect("valid regex"));

/// `.selector {` at the start of a trimmed line; capture 1 is the selector
/// text up to the opening brace.
pub static SELECTOR_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.([^{]+)\{").expect("valid regex"));

/// A single `property: value;` declaration.
pub static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:;{}]+):\s*([^;{}]+);").expect("valid regex"));

/// Net brace balance contributed by one line.
pub fn brace_delta(line: &str) -> i32 {
    let opens = line.matches('{').count() as i32;
    let closes = line.matches('}').count() as i32;
    opens - closes
}

/// Strip the shared token prefix off a `with-<name>` token to get the
/// breakpoint key. Tokens without the prefix pass through unchanged.
pub fn breakpoint_key(token: &str) -> &str {
    token.strip_prefix(BREAKPOINT_TOKEN_PREFIX).unwrap_or(token)
}
