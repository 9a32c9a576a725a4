//! Style compilation: one forward pass over the helpers stylesheet
//! producing plain CSS, with recognized mixin includes expanded into
//! explicit media-query blocks.
//!
//! Unlike the item extractor, the breakpoint table here is fixed: a mixin
//! body recorded under an unknown key is dropped, so an extractor-discovered
//! breakpoint with no table entry yields panel items without compiled CSS.

use crate::syntax::{breakpoint_key, DECLARATION, INCLUDE_OPEN, PREFIX_PLACEHOLDER, SELECTOR_OPEN};
use std::collections::HashMap;

/// Known breakpoint keys and their media-query predicates, in output order.
pub const BREAKPOINTS: [(&str, &str); 4] = [
    ("mobile", "@media (max-width: 767px)"),
    ("medium", "@media (min-width: 768px) and (max-width: 1023px)"),
    ("large", "@media (min-width: 1024px)"),
    ("xl", "@media (min-width: 1280px)"),
];

/// Compile the stylesheet lines into final CSS text: top-level rules in
/// source order, then one media block per known breakpoint that recorded a
/// mixin body. Unmatched lines contribute nothing; there are no errors.
pub fn compile<S: AsRef<str>>(lines: &[S]) -> String {
    let mut output = String::new();
    let mut selector: Option<String> = None;
    let mut declarations: Vec<String> = Vec::new();

    let mut in_mixin = false;
    let mut active_prefix = String::new();
    let mut active_key = String::new();
    let mut mixin_buffer = String::new();
    let mut blocks: HashMap<String, String> = HashMap::new();

    for raw in lines {
        let line = raw.as_ref().trim();

        if line.is_empty() || line.starts_with("//") || line.starts_with("/*") {
            continue;
        }

        if let Some(caps) = INCLUDE_OPEN.captures(line) {
            active_prefix = caps[1].to_string();
            active_key = breakpoint_key(&active_prefix).to_string();
            in_mixin = true;
            mixin_buffer.clear();
            continue;
        }

        if in_mixin {
            if line == "}" {
                // Only the known keys get a media block; the rest is dropped.
                if BREAKPOINTS.iter().any(|(key, _)| *key == active_key) {
                    blocks.insert(active_key.clone(), std::mem::take(&mut mixin_buffer));
                }
                in_mixin = false;
                active_prefix.clear();
                active_key.clear();
            } else {
                mixin_buffer.push_str(&line.replace(PREFIX_PLACEHOLDER, &active_prefix));
                mixin_buffer.push('\n');
            }
            continue;
        }

        if let Some(caps) = SELECTOR_OPEN.captures(line) {
            flush_rule(&mut output, &mut selector, &mut declarations);
            selector = Some(caps[1].trim().to_string());

            // Declarations may follow the brace on the same line, and the
            // rule may close there too.
            let mut rest = &line[caps.get(0).map(|m| m.end()).unwrap_or(line.len())..];
            let mut closed = false;
            if let Some(i) = rest.find('}') {
                closed = true;
                rest = &rest[..i];
            }
            for decl in DECLARATION.captures_iter(rest) {
                declarations.push(format!("{}: {};", decl[1].trim(), decl[2].trim()));
            }
            if closed {
                flush_rule(&mut output, &mut selector, &mut declarations);
            }
            continue;
        }

        if let Some(caps) = DECLARATION.captures(line) {
            declarations.push(format!("{}: {};", caps[1].trim(), caps[2].trim()));
            continue;
        }

        if line == "}" && selector.is_some() {
            flush_rule(&mut output, &mut selector, &mut declarations);
        }
    }

    // The file may end with a rule still open.
    flush_rule(&mut output, &mut selector, &mut declarations);

    for (key, query) in BREAKPOINTS {
        if let Some(css) = blocks.get(key) {
            if !css.is_empty() {
                output.push_str(&format!("\n{query} {{\n{css}}}\n"));
            }
        }
    }

    output
}

/// Emit the open selector as one compiled rule, if it accumulated any
/// declarations, and reset the rule state.
fn flush_rule(output: &mut String, selector: &mut Option<String>, declarations: &mut Vec<String>) {
    if let Some(sel) = selector.take() {
        if !declarations.is_empty() {
            output.push_str(&format!(".{} {{ {} }}\n", sel, declarations.join(" ")));
        }
    }
    declarations.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<&str> {
        src.lines().collect()
    }

    #[test]
    fn test_single_line_rules_round_trip() {
        let css = compile(&lines(".foo { color: red; }\n.bar { color: blue; }"));
        assert_eq!(css, ".foo { color: red; }\n.bar { color: blue; }\n");
    }

    #[test]
    fn test_multi_line_rule() {
        let src = r#"
.card {
  display: flex;
  gap: 1rem;
}
"#;
        assert_eq!(compile(&lines(src)), ".card { display: flex; gap: 1rem; }\n");
    }

    #[test]
    fn test_unterminated_rule_flushes_at_end_of_input() {
        let src = ".tail {\n  margin: 0;";
        assert_eq!(compile(&lines(src)), ".tail { margin: 0; }\n");
    }

    #[test]
    fn test_mobile_mixin_wrapped_in_media_block() {
        let src = r#"
@include responsive-styles($bp, "with-mobile") {
  .#{$prefix}-mt-1 { margin-top: 1rem; }
}
"#;
        let css = compile(&lines(src));
        assert_eq!(
            css,
            "\n@media (max-width: 767px) {\n.with-mobile-mt-1 { margin-top: 1rem; }\n}\n"
        );
    }

    #[test]
    fn test_unknown_breakpoint_emits_no_media_block() {
        let src = r#"
@include responsive-styles($bp, "with-print") {
  .#{$prefix}-hide { display: none; }
}
"#;
        assert_eq!(compile(&lines(src)), "");
    }

    #[test]
    fn test_media_blocks_in_fixed_table_order() {
        let src = r#"
@include responsive-styles($bp, "with-xl") {
  .#{$prefix}-a { order: 1; }
}
@include responsive-styles($bp, "with-mobile") {
  .#{$prefix}-b { order: 2; }
}
"#;
        let css = compile(&lines(src));
        let mobile = css.find("@media (max-width: 767px)").unwrap();
        let xl = css.find("@media (min-width: 1280px)").unwrap();
        assert!(mobile < xl);
    }

    #[test]
    fn test_later_mixin_body_overwrites_same_key() {
        let src = r#"
@include responsive-styles($bp, "with-large") {
  .#{$prefix}-old { order: 1; }
}
@include responsive-styles($bp, "with-large") {
  .#{$prefix}-new { order: 2; }
}
"#;
        let css = compile(&lines(src));
        assert!(!css.contains("with-large-old"));
        assert!(css.contains(".with-large-new { order: 2; }"));
        assert_eq!(css.matches("@media").count(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let src = r#"
// .ghost { display: none; }
/* block comment */

.real { display: block; }
"#;
        assert_eq!(compile(&lines(src)), ".real { display: block; }\n");
    }

    #[test]
    fn test_selector_without_declarations_emits_nothing() {
        assert_eq!(compile(&lines(".empty {\n}")), "");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let src = r#"
.a { color: red; }
@include responsive-styles($bp, "with-medium") {
  .#{$prefix}-x { margin: 0; }
}
"#;
        assert_eq!(compile(&lines(src)), compile(&lines(src)));
    }
}
