//! The immutable parse tree a successful run produces.

use std::ops::Range;
use std::rc::Rc;

/// A matcher's label, used both for tree node names and "expected" error
/// messages. Custom labels (user-assigned) win over default ones when
/// selecting an error message (see `findProperLabelMatcher` in the engine
/// crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Derived from the combinator kind and its children, e.g. `"'a'"` or `"Sequence"`.
    Default(Rc<str>),
    /// Assigned by the grammar author, e.g. `"digit"`.
    Custom(Rc<str>),
}

impl Label {
    pub fn is_custom(&self) -> bool {
        matches!(self, Label::Custom(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Label::Default(s) | Label::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// One node of the parse tree: a labelled `[start, end)` range over the
/// input, its children (in match order), and the value (if any) bound to
/// the frame that produced it.
#[derive(Debug, Clone)]
pub struct Node<V> {
    label: Label,
    range: Range<usize>,
    children: Vec<Node<V>>,
    value: Option<V>,
}

impl<V> Node<V> {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn children(&self) -> &[Node<V>] {
        &self.children
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Pre-order traversal. `visit` returning `false` skips that node's children.
    pub fn visit(&self, visit: &mut impl FnMut(&Node<V>) -> bool) {
        if visit(self) {
            for child in &self.children {
                child.visit(visit);
            }
        }
    }
}

/// Assembles one [`Node`] from the pieces a matcher frame produces.
pub struct NodeBuilder<V> {
    label: Label,
    range: Range<usize>,
    children: Vec<Node<V>>,
    value: Option<V>,
}

impl<V> NodeBuilder<V> {
    pub fn new(label: Label, range: Range<usize>, children: Vec<Node<V>>) -> Self {
        Self {
            label,
            range,
            children,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Option<V>) -> Self {
        self.value = value;
        self
    }

    pub fn build(self) -> Node<V> {
        Node {
            label: self.label,
            range: self.range,
            children: self.children,
            value: self.value,
        }
    }
}
