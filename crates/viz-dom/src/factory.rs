//! Element factory.
//!
//! Declarative construction: a tag name, an attribute map and a children
//! list in, a fully assembled node out. The factory normalizes attributes
//! through a fixed per-key handler table and flattens children into an
//! explicit list of append operations before touching the tree. It holds
//! no state once the node id is returned.

use crate::node::ElementData;
use crate::operations::{DomError, DomResult};
use crate::value::Value;
use crate::{Document, NodeId};

/// Tag sentinel that constructs a fragment instead of an element.
pub const FRAGMENT: &str = "fragment";

/// Insertion-ordered attribute map accepted by the factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(String, Value)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute; a repeated name replaces the earlier entry in
    /// place, keeping its position in iteration order.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Build an [`Attrs`] map in place: `attrs! { "id" => "plot", "tabindex" => 0 }`.
#[macro_export]
macro_rules! attrs {
    () => { $crate::Attrs::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Attrs::new()$(.set($name, $value))+
    };
}

/// Outcome of a special-cased attribute handler.
enum Applied {
    Done,
    /// Value shape did not match; fall back to the generic attribute write
    Fallthrough,
}

/// Per-key handlers, each declaring the value shape it accepts. Only
/// `class` and `style` get structural interpretation; everything else is a
/// generic string-coerced attribute write.
const ATTR_HANDLERS: &[(&str, fn(&mut ElementData, &Value) -> Applied)] =
    &[("class", apply_class), ("style", apply_style)];

fn apply_class(elem: &mut ElementData, value: &Value) -> Applied {
    let Value::List(names) = value else {
        return Applied::Fallthrough;
    };
    for name in names {
        // null entries are valid "omit" signals inside a class list
        if !name.is_null() {
            elem.add_class(&name.coerce_string());
        }
    }
    Applied::Done
}

fn apply_style(elem: &mut ElementData, value: &Value) -> Applied {
    let Value::Map(props) = value else {
        return Applied::Fallthrough;
    };
    for (prop, v) in props {
        elem.style.set_property(prop, &v.coerce_string());
    }
    Applied::Done
}

fn apply_attrs(elem: &mut ElementData, attrs: &Attrs) {
    for (name, value) in attrs.iter() {
        // null and false mean "omit this attribute"
        if matches!(value, Value::Null | Value::Bool(false)) {
            continue;
        }
        if let Some((_, handler)) = ATTR_HANDLERS.iter().find(|(key, _)| *key == name) {
            if matches!(handler(elem, value), Applied::Done) {
                continue;
            }
        }
        elem.set_attr(name, &value.coerce_string());
    }
}

/// A concrete append decision produced by child flattening.
#[derive(Debug, PartialEq)]
enum AppendOp {
    Node(NodeId),
    Text(String),
}

/// Flatten the children list into an ordered sequence of append
/// operations. Sequences flatten one level; null and false entries are
/// omitted; anything else that is not a node or string is an
/// [`DomError::InvalidChild`].
fn flatten_children(children: &[Value]) -> DomResult<Vec<AppendOp>> {
    let mut ops = Vec::new();
    for child in children {
        if let Value::List(inner) = child {
            for sub in inner {
                push_op(&mut ops, sub)?;
            }
        } else {
            push_op(&mut ops, child)?;
        }
    }
    Ok(ops)
}

fn push_op(ops: &mut Vec<AppendOp>, child: &Value) -> DomResult<()> {
    match child {
        Value::Node(id) => ops.push(AppendOp::Node(*id)),
        Value::Str(s) => ops.push(AppendOp::Text(s.clone())),
        Value::Null | Value::Bool(false) => {}
        other => return Err(DomError::InvalidChild(other.serialized())),
    }
    Ok(())
}

/// Construct an element declaratively.
///
/// The tag [`FRAGMENT`] yields a grouping fragment; its attribute map is
/// ignored entirely. For any other tag, attributes are applied in map
/// order (null/false values skipped, `class` lists and `style` maps
/// special-cased, everything else string-coerced) and children are
/// flattened and appended in order. The caller owns the returned node.
pub fn create_element(
    doc: &mut Document,
    tag: &str,
    attrs: Attrs,
    children: Vec<Value>,
) -> DomResult<NodeId> {
    let ops = flatten_children(&children)?;
    let tree = doc.tree_mut();

    let id = if tag == FRAGMENT {
        tree.create_fragment()
    } else {
        let id = tree.create_element(tag);
        apply_attrs(tree.require_element_mut(id)?, &attrs);
        id
    };

    for op in ops {
        match op {
            AppendOp::Node(child) => {
                tree.append_child(id, child)?;
            }
            AppendOp::Text(text) => {
                let text_node = tree.create_text(&text);
                tree.append_child(id, text_node)?;
            }
        }
    }

    tracing::trace!(tag, "constructed element");
    Ok(id)
}

macro_rules! tag_constructors {
    ($($fn_name:ident => $tag:literal),+ $(,)?) => {$(
        #[doc = concat!("Construct a `<", $tag, ">` element; same contract as [`create_element`] minus the tag.")]
        pub fn $fn_name(doc: &mut Document, attrs: Attrs, children: Vec<Value>) -> DomResult<NodeId> {
            create_element(doc, $tag, attrs, children)
        }
    )+};
}

tag_constructors! {
    div => "div",
    span => "span",
    link => "link",
    style => "style",
    a => "a",
    p => "p",
    pre => "pre",
    label => "label",
    input => "input",
    select => "select",
    option => "option",
    canvas => "canvas",
    ul => "ul",
    ol => "ol",
    li => "li",
}
