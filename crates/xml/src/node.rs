//! The DOM node model (component G): an arena of namespace/element/text
//! nodes, since a front end parses resource XML once but often needs to
//! walk it more than once (name validation, then value extraction).
//!
//! Grounded in `original_source/XmlDom.cpp`'s `xml::Node`/`xml::Element`
//! class hierarchy. spec.md §9 flags the original's `parent` back-reference
//! as forming a cycle with the owning children list and recommends an
//! arena keyed by stable indices instead of a weak-reference pointer; that
//! is exactly the shape used here — [`Dom`] owns a flat `Vec<Node>` and
//! every cross-node link is a plain [`NodeId`] index into it, so cloning
//! the whole tree is just cloning the vector and no index needs remapping.

use std::fmt;

/// An index into a [`Dom`]'s node arena. Stable for the arena's lifetime:
/// nodes are appended, never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One `xmlns:prefix="uri"` binding, introducing a namespace that scopes
/// its subtree. A `Namespace` node is otherwise a transparent wrapper: its
/// single child is conceptually still a child of the namespace's own
/// parent, which is why the query methods below "see through" it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: String,
    pub uri: String,
}

/// One attribute on an [`ElementData`]. spec.md calls for attributes sorted
/// lexicographically by `(namespaceUri, name, value)` — the derived `Ord`
/// below compares fields in declaration order, so keeping `namespace_uri`
/// first is what makes that derive correct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attribute {
    pub namespace_uri: String,
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(namespace_uri: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            namespace_uri: namespace_uri.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element's tag name and attributes. There is no separate attribute
/// node — attributes hang directly off the element that carries them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub namespace_uri: String,
    pub name: String,
    /// Kept sorted by `(namespace_uri, name, value)` at construction time;
    /// callers that build a [`Dom`] by hand (e.g. tests) should insert
    /// through [`Dom::add_element`] rather than pushing directly so that
    /// invariant holds.
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    pub fn find_attribute(&self, namespace_uri: &str, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.namespace_uri == namespace_uri && a.name == name)
    }
}

/// The closed tag of a DOM node: `{Namespace, Element, Text}`, per spec.md
/// §4.7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Namespace(NamespaceDecl),
    Element(ElementData),
    /// Contiguous character data. The construction contract coalesces
    /// consecutive text/CDATA callbacks from the parser into one of these
    /// rather than a chain of single-run nodes.
    Text(String),
}

/// One node in the tree: its kind, a non-owning back-reference to its
/// parent, source position, any comment that preceded it in the source,
/// and its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub line: u32,
    pub column: u32,
    /// Accumulated `<!-- ... -->` text immediately preceding this node,
    /// joined by `\n` if more than one comment ran together. `None` if no
    /// comment preceded it.
    pub comment: Option<String>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceDecl> {
        match &self.kind {
            NodeKind::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// The arena-owned XML tree produced by the front end (see [`crate::build`])
/// and consumed by resource parsing.
///
/// A `Dom` with no `root` is a valid, empty value: spec.md §4.7 says a
/// parse error discards the whole tree rather than leaving a partial one,
/// which here just means `root` stays `None` and `nodes` is dropped back to
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dom {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Dom {
    pub fn new() -> Self {
        Dom::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a new node as a child of `parent` (or as the root, if this is
    /// the first node in the arena) and returns its ID. Used by the
    /// construction contract in [`crate::build`]; exposed publicly so other
    /// producers (e.g. hand-built test fixtures) can assemble a `Dom`
    /// without going through a parser.
    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind, line: u32, column: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent,
            line,
            column,
            comment: None,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        } else if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Discards the whole tree, per the "discard on parse error" rule.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// `xml::Element::findAttribute`. Only meaningful on an `Element` node;
    /// any other kind has no attributes and returns `None`.
    pub fn find_attribute(&self, id: NodeId, namespace_uri: &str, name: &str) -> Option<&Attribute> {
        self.get(id).as_element()?.find_attribute(namespace_uri, name)
    }

    /// The IDs of `id`'s direct `Element` children, transparently
    /// descending through any `Namespace` wrapper in between — a namespace
    /// node is not itself a "child" in the sense resource parsing cares
    /// about, it just scopes one.
    ///
    /// `xml::Element::getChildElements`.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_child_elements(id, &mut out);
        out
    }

    fn collect_child_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.get(id).children {
            match &self.get(child).kind {
                NodeKind::Element(_) => out.push(child),
                NodeKind::Namespace(_) => self.collect_child_elements(child, out),
                NodeKind::Text(_) => {}
            }
        }
    }

    /// `xml::Element::findChild`: the first direct (namespace-transparent)
    /// child element named `name` in namespace `namespace_uri`.
    pub fn find_child(&self, id: NodeId, namespace_uri: &str, name: &str) -> Option<NodeId> {
        self.child_elements(id).into_iter().find(|&child| {
            let element = self.get(child).as_element().expect("child_elements only returns elements");
            element.namespace_uri == namespace_uri && element.name == name
        })
    }

    /// `xml::Element::findChildWithAttribute`: as [`Dom::find_child`], but
    /// additionally requires the child to carry an attribute exactly equal
    /// to `required` (namespace, name, and value must all match) when one
    /// is given. `None` for `required` behaves exactly like `find_child`.
    pub fn find_child_with_attribute(
        &self,
        id: NodeId,
        namespace_uri: &str,
        name: &str,
        required: Option<&Attribute>,
    ) -> Option<NodeId> {
        self.child_elements(id).into_iter().find(|&child| {
            let element = self.get(child).as_element().expect("child_elements only returns elements");
            if element.namespace_uri != namespace_uri || element.name != name {
                return false;
            }
            match required {
                Some(attr) => element.attributes.contains(attr),
                None => true,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> NodeKind {
        NodeKind::Element(ElementData {
            namespace_uri: String::new(),
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    #[test]
    fn first_pushed_node_becomes_root() {
        let mut dom = Dom::new();
        let root = dom.push(None, element("Layout"), 1, 0);
        assert_eq!(dom.root(), Some(root));
    }

    #[test]
    fn child_elements_descend_through_namespace_wrapper() {
        let mut dom = Dom::new();
        let ns = dom.push(
            None,
            NodeKind::Namespace(NamespaceDecl {
                prefix: "android".to_string(),
                uri: "urn:test".to_string(),
            }),
            1,
            0,
        );
        let layout = dom.push(Some(ns), element("Layout"), 2, 0);
        let _text_view = dom.push(Some(layout), element("TextView"), 3, 4);

        assert_eq!(dom.child_elements(ns), vec![layout]);
        assert_eq!(dom.child_elements(layout), vec![_text_view]);
    }

    #[test]
    fn find_child_with_attribute_requires_exact_match() {
        let mut dom = Dom::new();
        let root = dom.push(None, element("Layout"), 1, 0);
        let child = dom.push(
            Some(root),
            NodeKind::Element(ElementData {
                namespace_uri: String::new(),
                name: "TextView".to_string(),
                attributes: vec![Attribute::new("", "id", "@+id/hello")],
            }),
            2,
            2,
        );

        let wanted = Attribute::new("", "id", "@+id/hello");
        assert_eq!(
            dom.find_child_with_attribute(root, "", "TextView", Some(&wanted)),
            Some(child)
        );

        let wrong = Attribute::new("", "id", "@+id/other");
        assert_eq!(dom.find_child_with_attribute(root, "", "TextView", Some(&wrong)), None);
    }

    #[test]
    fn attributes_sort_by_namespace_then_name_then_value() {
        let mut attrs = vec![
            Attribute::new("", "z", "1"),
            Attribute::new("", "a", "1"),
            Attribute::new("urn:a", "a", "1"),
        ];
        attrs.sort();
        assert_eq!(
            attrs,
            vec![
                Attribute::new("", "a", "1"),
                Attribute::new("", "z", "1"),
                Attribute::new("urn:a", "a", "1"),
            ]
        );
    }
}
