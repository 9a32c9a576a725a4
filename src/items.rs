//! Item extraction: one forward pass over the helpers stylesheet producing
//! the flat, ordered list of headings and togglable class names the editor
//! panel renders.
//!
//! Breakpoints are discovered dynamically here (any `with-<name>` token used
//! in a recognized include registers a group), unlike the compiler's fixed
//! table. An unknown key still produces a panel group; it simply has no
//! compiled CSS behind it.

use crate::syntax::{
    brace_delta, breakpoint_key, CLASS_TOKEN, DOC_DESC, DOC_TITLE, INCLUDE, MIXIN_DEF,
    PREFIXED_SUFFIX,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// One renderable unit for the editor panel: a section/group heading or a
/// togglable class name. Serialized form is the stable contract for the
/// client-side renderer; field order and item order are significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Heading {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        desc: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default, skip_serializing_if = "is_false")]
        bp: bool,
    },
    Class { name: String },
}

impl Item {
    /// Section or default-group heading. An empty description is omitted
    /// from the serialized form.
    pub fn heading(label: impl Into<String>, desc: impl Into<String>) -> Self {
        let desc = desc.into();
        Item::Heading {
            label: label.into(),
            desc: if desc.is_empty() { None } else { Some(desc) },
            prefix: None,
            bp: false,
        }
    }

    /// Heading that opens a breakpoint group, carrying the class prefix the
    /// group's items are built from.
    pub fn breakpoint(label: impl Into<String>, prefix: impl Into<String>) -> Self {
        Item::Heading {
            label: label.into(),
            desc: None,
            prefix: Some(prefix.into()),
            bp: true,
        }
    }

    /// Togglable class name.
    pub fn class(name: impl Into<String>) -> Self {
        Item::Class { name: name.into() }
    }
}

/// Named group of class-name suffixes defined inside the mixin body.
#[derive(Debug, Default)]
struct Section {
    desc: String,
    suffixes: Vec<String>,
}

/// Scan the stylesheet lines and produce the panel item list: all items
/// defined outside the mixin first, then one group per discovered
/// breakpoint replicating the mixin sections in definition order.
///
/// Malformed lines are never errors; anything unrecognized contributes
/// nothing.
pub fn extract_items<S: AsRef<str>>(lines: &[S]) -> Vec<Item> {
    let mut scan = ItemScan::default();
    for raw in lines {
        scan.line(raw.as_ref());
    }
    scan.finish()
}

#[derive(Default)]
struct ItemScan {
    in_mixin: bool,
    depth: i32,
    in_doc: bool,
    doc_title: Option<String>,
    doc_desc: Option<String>,
    current_section: Option<String>,
    default_items: Vec<Item>,
    /// section label -> section, first definition fixes the order
    sections: IndexMap<String, Section>,
    /// with-<name> prefix -> breakpoint key, discovery order
    breakpoints: IndexMap<String, String>,
}

impl ItemScan {
    fn line(&mut self, raw: &str) {
        let line = raw.trim_start();

        // A fully commented-out line contributes nothing at all.
        if line.starts_with("//") {
            return;
        }

        // Mixin entry and brace tracking. The definition line enters mixin
        // mode even when its brace opens on a following line. An include
        // that opens a body on its own line behaves as a mixin region too,
        // so a doc block ahead of it becomes a section rather than a
        // default heading.
        if !self.in_mixin && MIXIN_DEF.is_match(line) {
            self.in_mixin = true;
            self.depth = brace_delta(line);
        } else if !self.in_mixin && !self.in_doc && INCLUDE.is_match(line) {
            self.depth = brace_delta(line);
            self.in_mixin = self.depth > 0;
        } else if self.in_mixin {
            self.depth += brace_delta(line);
            if self.depth <= 0 {
                self.in_mixin = false;
                self.current_section = None;
            }
        }

        // Doc-block capture. The close marker ends buffering without
        // consuming the rest of the line.
        let rest = match self.doc_line(line) {
            Some(rest) => rest,
            None => return,
        };

        // Breakpoint registration; first discovery wins the group order.
        if let Some(caps) = INCLUDE.captures(rest) {
            let prefix = caps[1].to_string();
            let key = breakpoint_key(&prefix).to_string();
            self.breakpoints.entry(prefix).or_insert(key);
            return;
        }

        // A buffered doc block attaches to the next selector-like line.
        if rest.contains('.') {
            self.flush_doc();
        }

        if self.in_mixin {
            // Suffixes belong only to the currently open section; anything
            // outside one is dropped silently.
            if let Some(label) = &self.current_section {
                if let Some(caps) = PREFIXED_SUFFIX.captures(rest) {
                    if let Some(section) = self.sections.get_mut(label) {
                        section.suffixes.push(caps[1].to_string());
                    }
                }
            }
        } else {
            for caps in CLASS_TOKEN.captures_iter(rest) {
                let class = &caps[1];
                if !class.chars().all(|c| c.is_ascii_digit()) {
                    self.default_items.push(Item::class(class));
                }
            }
        }
    }

    /// Feed one line through the doc-block state. Returns the portion of
    /// the line that still needs processing, or `None` when the line was
    /// consumed entirely by the doc block.
    fn doc_line<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if !self.in_doc {
            if let Some(after_open) = line.strip_prefix("/**") {
                self.in_doc = true;
                self.doc_title = None;
                self.doc_desc = None;
                return self.doc_body(after_open);
            }
            return Some(line);
        }
        self.doc_body(line)
    }

    fn doc_body<'a>(&mut self, text: &'a str) -> Option<&'a str> {
        let (body, rest) = match text.find("*/") {
            Some(i) => (&text[..i], Some(&text[i + 2..])),
            None => (text, None),
        };
        if let Some(caps) = DOC_TITLE.captures(body) {
            self.doc_title = Some(caps[1].trim().to_string());
        }
        if let Some(caps) = DOC_DESC.captures(body) {
            self.doc_desc = Some(caps[1].trim().to_string());
        }
        if rest.is_some() {
            self.in_doc = false;
        }
        rest
    }

    /// Turn the buffered doc block into a section (inside the mixin) or a
    /// default heading (outside). A section with an empty title is
    /// discarded.
    fn flush_doc(&mut self) {
        if self.doc_title.is_none() && self.doc_desc.is_none() {
            return;
        }
        let title = self.doc_title.take().unwrap_or_default();
        let desc = self.doc_desc.take().unwrap_or_default();
        if self.in_mixin {
            if !title.is_empty() {
                self.sections.insert(
                    title.clone(),
                    Section {
                        desc,
                        suffixes: Vec::new(),
                    },
                );
                self.current_section = Some(title);
            }
        } else {
            self.default_items.push(Item::heading(title, desc));
        }
    }

    fn finish(mut self) -> Vec<Item> {
        // The file may end inside a doc block.
        self.flush_doc();

        let mut items = self.default_items;
        for (prefix, key) in &self.breakpoints {
            items.push(Item::breakpoint(key, prefix));
            for (label, section) in &self.sections {
                items.push(Item::heading(label.clone(), section.desc.clone()));
                for suffix in &section.suffixes {
                    items.push(Item::class(format!("{prefix}-{suffix}")));
                }
            }
        }
        items
    }
}
