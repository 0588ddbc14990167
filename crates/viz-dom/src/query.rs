//! Selector matching.
//!
//! The matching primitive is resolved once from an ordered list of
//! candidate engines and cached; every later call goes through the
//! resolved engine. Non-element nodes never match anything.

use std::sync::OnceLock;

use crate::node::ElementData;
use crate::operations::{DomError, DomResult};
use crate::tree::DomTree;
use crate::{Document, NodeId};

/// A selector-matching capability.
pub trait SelectorEngine: Send + Sync {
    /// Engine name, for diagnostics
    fn name(&self) -> &'static str;

    /// Whether this engine is available in the current build
    fn is_supported(&self) -> bool;

    /// Match one node against selector text
    fn matches(&self, tree: &DomTree, node: NodeId, selector: &str) -> DomResult<bool>;
}

/// Candidate engines, in preference order
static CANDIDATES: &[&dyn SelectorEngine] = &[&CompoundEngine, &BasicEngine];

static RESOLVED: OnceLock<&'static dyn SelectorEngine> = OnceLock::new();

/// First supported candidate wins; the choice is made once and cached.
fn engine() -> &'static dyn SelectorEngine {
    *RESOLVED.get_or_init(|| {
        let chosen = CANDIDATES
            .iter()
            .copied()
            .find(|candidate| candidate.is_supported())
            .unwrap_or(&BasicEngine);
        tracing::debug!(engine = chosen.name(), "resolved selector engine");
        chosen
    })
}

/// Whether `node` matches the selector text.
pub fn matches(doc: &Document, node: NodeId, selector: &str) -> DomResult<bool> {
    engine().matches(doc.tree(), node, selector)
}

/// Nearest ancestor (including `node` itself) matching the selector.
pub fn closest(doc: &Document, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
    let tree = doc.tree();
    let mut current = Some(node);
    while let Some(id) = current {
        if engine().matches(tree, id, selector)? {
            return Ok(Some(id));
        }
        current = tree.parent(id);
    }
    Ok(None)
}

/// All element descendants of `root` matching the selector, in tree order.
pub fn query_selector_all(doc: &Document, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
    let mut found = Vec::new();
    collect_matches(doc.tree(), root, selector, &mut found)?;
    Ok(found)
}

/// First element descendant of `root` matching the selector.
pub fn query_selector(doc: &Document, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
    Ok(query_selector_all(doc, root, selector)?.into_iter().next())
}

fn collect_matches(
    tree: &DomTree,
    id: NodeId,
    selector: &str,
    out: &mut Vec<NodeId>,
) -> DomResult<()> {
    for (child, node) in tree.children(id) {
        if node.is_element() && engine().matches(tree, child, selector)? {
            out.push(child);
        }
        collect_matches(tree, child, selector, out)?;
    }
    Ok(())
}

/// One simple selector component
#[derive(Debug, Clone, PartialEq)]
enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr {
        name: String,
        value: Option<String>,
    },
}

impl SimpleSelector {
    fn matches(&self, elem: &ElementData) -> bool {
        match self {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => elem.tag.eq_ignore_ascii_case(tag),
            SimpleSelector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
            SimpleSelector::Class(class) => elem.classes.contains(class),
            SimpleSelector::Attr { name, value: None } => elem.attrs.has(name),
            SimpleSelector::Attr {
                name,
                value: Some(expected),
            } => elem.attr(name) == Some(expected.as_str()),
        }
    }
}

fn valid_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse a single simple selector: `*`, `tag`, `.class` or `#id`.
fn parse_simple(s: &str) -> Option<SimpleSelector> {
    if s == "*" {
        Some(SimpleSelector::Universal)
    } else if let Some(id) = s.strip_prefix('#') {
        valid_ident(id).then(|| SimpleSelector::Id(id.to_string()))
    } else if let Some(class) = s.strip_prefix('.') {
        valid_ident(class).then(|| SimpleSelector::Class(class.to_string()))
    } else {
        valid_ident(s).then(|| SimpleSelector::Tag(s.to_lowercase()))
    }
}

/// Fallback engine: a single simple selector per call.
struct BasicEngine;

impl SelectorEngine for BasicEngine {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn matches(&self, tree: &DomTree, node: NodeId, selector: &str) -> DomResult<bool> {
        let Some(elem) = tree.element(node) else {
            return Ok(false);
        };
        let simple = parse_simple(selector.trim())
            .ok_or_else(|| DomError::InvalidSelector(selector.to_string()))?;
        Ok(simple.matches(elem))
    }
}

/// Preferred engine: compound selectors (`tag#id.class[attr=value]`) and
/// `,`-separated selector lists.
struct CompoundEngine;

impl SelectorEngine for CompoundEngine {
    fn name(&self) -> &'static str {
        "compound"
    }

    fn is_supported(&self) -> bool {
        cfg!(feature = "compound-selectors")
    }

    fn matches(&self, tree: &DomTree, node: NodeId, selector: &str) -> DomResult<bool> {
        let Some(elem) = tree.element(node) else {
            return Ok(false);
        };
        let list = parse_selector_list(selector)?;
        Ok(list
            .iter()
            .any(|compound| compound.iter().all(|simple| simple.matches(elem))))
    }
}

fn parse_selector_list(text: &str) -> DomResult<Vec<Vec<SimpleSelector>>> {
    let mut list = Vec::new();
    for part in text.split(',') {
        list.push(
            parse_compound(part.trim())
                .ok_or_else(|| DomError::InvalidSelector(text.to_string()))?,
        );
    }
    Ok(list)
}

fn parse_compound(s: &str) -> Option<Vec<SimpleSelector>> {
    if s.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    let mut rest = s;

    // Leading type selector
    if let Some(r) = rest.strip_prefix('*') {
        parts.push(SimpleSelector::Universal);
        rest = r;
    } else if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        let end = rest
            .find(|c: char| matches!(c, '#' | '.' | '['))
            .unwrap_or(rest.len());
        let (tag, r) = rest.split_at(end);
        if !valid_ident(tag) {
            return None;
        }
        parts.push(SimpleSelector::Tag(tag.to_lowercase()));
        rest = r;
    }

    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix('#') {
            let end = r
                .find(|c: char| matches!(c, '#' | '.' | '['))
                .unwrap_or(r.len());
            let (id, rr) = r.split_at(end);
            if !valid_ident(id) {
                return None;
            }
            parts.push(SimpleSelector::Id(id.to_string()));
            rest = rr;
        } else if let Some(r) = rest.strip_prefix('.') {
            let end = r
                .find(|c: char| matches!(c, '#' | '.' | '['))
                .unwrap_or(r.len());
            let (class, rr) = r.split_at(end);
            if !valid_ident(class) {
                return None;
            }
            parts.push(SimpleSelector::Class(class.to_string()));
            rest = rr;
        } else if let Some(r) = rest.strip_prefix('[') {
            let close = r.find(']')?;
            let body = &r[..close];
            rest = &r[close + 1..];
            parts.push(parse_attr_selector(body)?);
        } else {
            return None;
        }
    }

    if parts.is_empty() { None } else { Some(parts) }
}

fn parse_attr_selector(body: &str) -> Option<SimpleSelector> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            valid_ident(name).then(|| SimpleSelector::Attr {
                name: name.to_string(),
                value: None,
            })
        }
        Some((name, value)) => {
            let name = name.trim();
            if !valid_ident(name) {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some(SimpleSelector::Attr {
                name: name.to_string(),
                value: Some(value.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attrs, Value, attrs, div, span};

    fn sample_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let node = div(
            &mut doc,
            attrs! {
                "id" => "main",
                "class" => Value::list(["container", "active"]),
                "data-role" => "plot",
            },
            Vec::new(),
        )
        .unwrap();
        (doc, node)
    }

    #[test]
    #[cfg(feature = "compound-selectors")]
    fn test_engine_resolution_prefers_compound() {
        // Resolution happens once; with default features the compound
        // engine is the first supported candidate.
        assert_eq!(engine().name(), "compound");
        assert!(std::ptr::eq(engine(), engine()));
    }

    #[test]
    fn test_simple_selector_parse() {
        assert!(matches!(
            parse_simple("div"),
            Some(SimpleSelector::Tag(_))
        ));
        assert!(matches!(
            parse_simple(".class"),
            Some(SimpleSelector::Class(_))
        ));
        assert!(matches!(parse_simple("#id"), Some(SimpleSelector::Id(_))));
        assert!(matches!(
            parse_simple("*"),
            Some(SimpleSelector::Universal)
        ));
        assert_eq!(parse_simple(""), None);
    }

    #[test]
    fn test_matches_tag_class_id() {
        let (doc, node) = sample_doc();

        assert!(matches(&doc, node, "div").unwrap());
        assert!(matches(&doc, node, "DIV").unwrap());
        assert!(matches(&doc, node, ".container").unwrap());
        assert!(matches(&doc, node, "#main").unwrap());
        assert!(matches(&doc, node, "*").unwrap());
        assert!(!matches(&doc, node, "span").unwrap());
        assert!(!matches(&doc, node, ".missing").unwrap());
    }

    #[test]
    #[cfg(feature = "compound-selectors")]
    fn test_matches_compound_and_lists() {
        let (doc, node) = sample_doc();

        assert!(matches(&doc, node, "div.container.active#main").unwrap());
        assert!(!matches(&doc, node, "div.container.closed").unwrap());
        assert!(matches(&doc, node, "span, .container").unwrap());
        assert!(matches(&doc, node, "[data-role]").unwrap());
        assert!(matches(&doc, node, "[data-role=plot]").unwrap());
        assert!(matches(&doc, node, "[data-role=\"plot\"]").unwrap());
        assert!(!matches(&doc, node, "[data-role=table]").unwrap());
    }

    #[test]
    fn test_invalid_selector_errors() {
        let (doc, node) = sample_doc();

        assert!(matches!(
            matches(&doc, node, ""),
            Err(DomError::InvalidSelector(_))
        ));
        assert!(matches!(
            matches(&doc, node, "div >"),
            Err(DomError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_non_elements_never_match() {
        let mut doc = Document::new();
        let text = doc.tree_mut().create_text("hello");
        assert!(!matches(&doc, text, "*").unwrap());
    }

    #[test]
    fn test_closest() {
        let mut doc = Document::new();
        let inner = span(&mut doc, Attrs::new(), Vec::new()).unwrap();
        let wrapper = div(&mut doc, attrs! { "class" => Value::list(["wrap"]) }, vec![
            inner.into(),
        ])
        .unwrap();
        let body = doc.body();
        doc.tree_mut().append_child(body, wrapper).unwrap();

        assert_eq!(closest(&doc, inner, ".wrap").unwrap(), Some(wrapper));
        assert_eq!(closest(&doc, inner, "span").unwrap(), Some(inner));
        assert_eq!(closest(&doc, inner, "#nope").unwrap(), None);
    }

    #[test]
    fn test_query_selector_all_in_tree_order() {
        let mut doc = Document::new();
        let first = li(&mut doc);
        let second = li(&mut doc);
        let list = crate::ul(&mut doc, Attrs::new(), vec![first.into(), second.into()]).unwrap();
        let body = doc.body();
        doc.tree_mut().append_child(body, list).unwrap();

        let root = doc.document_element();
        assert_eq!(
            query_selector_all(&doc, root, "li").unwrap(),
            vec![first, second]
        );
        assert_eq!(query_selector(&doc, root, "li").unwrap(), Some(first));
        assert_eq!(query_selector(&doc, root, "canvas").unwrap(), None);
    }

    fn li(doc: &mut Document) -> NodeId {
        crate::li(doc, Attrs::new(), Vec::new()).unwrap()
    }
}
