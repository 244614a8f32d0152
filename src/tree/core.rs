use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{ResizeError, Result};
use crate::geometry::{Rect, px};

use super::selector::Selector;
use super::style::StyleDeclaration;

/// Handle to an element in a [`RenderTree`]. Ids stay valid for the life of
/// the tree; detached elements keep theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Rect,
    style: StyleDeclaration,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
            style: StyleDeclaration::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id_attr(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }
}

/// Arena-backed element tree with a `body` root.
///
/// Layout is owned by whoever drives the tree: [`RenderTree::set_rect`]
/// records the border box the layout pass produced, and
/// [`RenderTree::bounding_client_rect`] reports it back. Inline style writes
/// are tracked so a renderer can flush only what changed.
#[derive(Debug, Clone)]
pub struct RenderTree {
    elements: Vec<Element>,
    root: ElementId,
    dirty: BTreeSet<ElementId>,
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTree {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: ElementId(0),
            dirty: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(tag));
        id
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(id.0)
            .ok_or(ResizeError::ElementNotFound(id))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(id.0)
            .ok_or(ResizeError::ElementNotFound(id))
    }

    /// Append `child` as the last child of `parent`, moving it out of its
    /// current parent first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.element(parent)?;
        self.element(child)?;

        if child == self.root {
            return Err(hierarchy(parent, child, "the root cannot be moved"));
        }
        if self.contains(child, parent) {
            return Err(hierarchy(parent, child, "an element cannot contain itself"));
        }

        self.detach(child)?;
        self.element_mut(parent)?.children.push(child);
        self.element_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` (and its subtree) from its parent.
    pub fn remove(&mut self, child: ElementId) -> Result<()> {
        self.detach(child)
    }

    fn detach(&mut self, child: ElementId) -> Result<()> {
        if let Some(old_parent) = self.element_mut(child)?.parent.take() {
            self.element_mut(old_parent)?.children.retain(|c| *c != child);
        }
        Ok(())
    }

    /// Whether `node` is `ancestor` or lives somewhere beneath it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.elements.get(id.0).and_then(|e| e.parent);
        }
        false
    }

    pub fn is_connected(&self, id: ElementId) -> bool {
        self.contains(self.root, id)
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Result<Vec<ElementId>> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.element(id)?.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.element(next)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    pub fn query_selector(&self, root: ElementId, selector: &Selector) -> Result<Option<ElementId>> {
        self.first_descendant(root, |element| selector.matches(element))
    }

    /// First descendant matching `selector` that does not carry `class`.
    pub fn query_selector_excluding(
        &self,
        root: ElementId,
        selector: &Selector,
        class: &str,
    ) -> Result<Option<ElementId>> {
        self.first_descendant(root, |element| {
            selector.matches(element) && !element.has_class(class)
        })
    }

    fn first_descendant(
        &self,
        root: ElementId,
        predicate: impl Fn(&Element) -> bool,
    ) -> Result<Option<ElementId>> {
        for id in self.descendants(root)? {
            if predicate(self.element(id)?) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> Result<()> {
        self.element_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> Result<bool> {
        Ok(self.element(id)?.has_class(class))
    }

    /// Set an attribute. `class` replaces the class list.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            element.attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Record the border box produced by layout.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<()> {
        self.element_mut(id)?.rect = rect;
        Ok(())
    }

    /// The element's rendered border box. Elements outside the document
    /// have no box and report an empty rect.
    pub fn bounding_client_rect(&self, id: ElementId) -> Result<Rect> {
        let rect = self.element(id)?.rect;
        if self.is_connected(id) {
            Ok(rect)
        } else {
            Ok(Rect::default())
        }
    }

    pub fn style(&self, id: ElementId) -> Result<&StyleDeclaration> {
        Ok(&self.element(id)?.style)
    }

    /// Write an inline style property; returns whether the value changed.
    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> Result<bool> {
        let changed = self.element_mut(id)?.style.set(property, value);
        if changed {
            self.dirty.insert(id);
        }
        Ok(changed)
    }

    pub fn set_style_px(&mut self, id: ElementId, property: &str, value: f64) -> Result<bool> {
        self.set_style(id, property, &px(value))
    }

    pub fn take_dirty(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

fn hierarchy(parent: ElementId, child: ElementId, reason: &'static str) -> ResizeError {
    ResizeError::HierarchyRequest {
        parent,
        child,
        reason,
    }
}
