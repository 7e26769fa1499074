// src/page/dom.rs
//! The slice of a host document the watcher needs, and an in-memory one.
//!
//! [`Document`] is what the watcher reads and mutates. A browser binding
//! implements it over the live DOM; [`MemoryDocument`] implements it over a
//! small arena tree so the whole watch cycle runs in tests, the CLI and the
//! preview GUI.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::{decode_entities, strip_tags};
use crate::page::badge::BadgeMarkup;

static ANCHOR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<a\s[^>]*>").unwrap());
static HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\shref="([^"]*)""#).unwrap());

pub trait Document {
    type Node: Copy + Eq + fmt::Debug;

    /// Full current URL.
    fn location(&self) -> String;
    /// `document.title`.
    fn title(&self) -> String;
    fn body(&self) -> Self::Node;
    /// Connected elements with this tag, in document order.
    fn elements_by_tag(&self, tag: &str) -> Vec<Self::Node>;
    /// Connected text nodes under the body, in document order.
    fn text_nodes(&self) -> Vec<Self::Node>;
    fn text_content(&self, node: Self::Node) -> String;
    fn parent_element(&self, node: Self::Node) -> Option<Self::Node>;
    /// First connected element carrying this id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// New detached element with the given tag and id.
    fn create_element(&mut self, tag: &str, id: &str) -> Self::Node;
    /// Place `node` right after `anchor` as its next sibling.
    fn insert_after(&mut self, anchor: Self::Node, node: Self::Node);
    fn append_to_body(&mut self, node: Self::Node);
    fn remove(&mut self, node: Self::Node);
    fn is_connected(&self, node: Self::Node) -> bool;

    /// Replace the element's class and content. Every link in `content` must
    /// open in a new browsing context without the click reaching the host page.
    fn render(&mut self, node: Self::Node, content: &BadgeMarkup);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String, id: String, class: String, markup: Option<String> },
    Text(String),
}

/// An `<a>` rendered into a badge. Guarded anchors open in a new context
/// and stop the click there; anything else bubbles up to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    href: String,
    guarded: bool,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed document. The body is the root; anything not reachable from
/// it is detached.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: NodeId,
    location: String,
    title: String,
    anchors: HashMap<NodeId, Vec<Anchor>>,
    opened: Vec<String>,
    host_clicks: usize,
}

impl MemoryDocument {
    pub fn new(location: &str, title: &str) -> Self {
        let body = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element { tag: s!("body"), id: s!(), class: s!(), markup: None },
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            location: s!(location),
            title: s!(title),
            anchors: HashMap::new(),
            opened: Vec::new(),
            host_clicks: 0,
        }
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = s!(location);
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = s!(title);
    }

    fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent, children: Vec::new(), kind });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    /// Append a child element.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let kind = NodeKind::Element { tag: tag.to_ascii_lowercase(), id: s!(), class: s!(), markup: None };
        self.push(Some(parent), kind)
    }

    /// Append a child text node.
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(Some(parent), NodeKind::Text(s!(text)))
    }

    /// Replace all children with one text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.text(node, text);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn class_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { class, .. } => Some(class),
            NodeKind::Text(_) => None,
        }
    }

    /// Markup last rendered into the element.
    pub fn inner_html(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { markup, .. } => markup.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    /// Simulate a click on the n-th anchor rendered into `node`.
    /// A guarded anchor opens its URL in a new context and returns it; an
    /// unguarded one lets the click reach the host page and returns `None`.
    pub fn click_link(&mut self, node: NodeId, index: usize) -> Option<String> {
        let anchor = self.anchors.get(&node)?.get(index)?.clone();
        if anchor.guarded {
            self.opened.push(anchor.href.clone());
            Some(anchor.href)
        } else {
            self.host_clicks += 1;
            None
        }
    }

    /// Anchors rendered into `node`.
    pub fn link_count(&self, node: NodeId) -> usize {
        self.anchors.get(&node).map_or(0, Vec::len)
    }

    pub fn opened_urls(&self) -> &[String] {
        &self.opened
    }

    /// Clicks that reached the host page's own handler.
    pub fn host_clicks(&self) -> usize {
        self.host_clicks
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(p) = self.nodes[node.0].parent.take() {
            self.nodes[p.0].children.retain(|c| *c != node);
        }
    }

    /// Pre-order walk from the body.
    fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.body];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn location(&self) -> String {
        self.location.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.walk().into_iter().filter(|n| self.tag(*n) == Some(tag.as_str())).collect()
    }

    fn text_nodes(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|n| matches!(self.nodes[n.0].kind, NodeKind::Text(_)))
            .collect()
    }

    fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Element { markup: Some(m), .. } => strip_tags(m),
            NodeKind::Element { .. } => self.nodes[node.0]
                .children
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk().into_iter().find(|n| {
            matches!(&self.nodes[n.0].kind, NodeKind::Element { id: eid, .. } if eid == id)
        })
    }

    fn create_element(&mut self, tag: &str, id: &str) -> NodeId {
        let kind = NodeKind::Element { tag: tag.to_ascii_lowercase(), id: s!(id), class: s!(), markup: None };
        self.push(None, kind)
    }

    fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        self.detach(node);
        let Some(parent) = self.nodes[anchor.0].parent else {
            self.append_to_body(node);
            return;
        };
        let siblings = &mut self.nodes[parent.0].children;
        let at = siblings.iter().position(|c| *c == anchor).map_or(siblings.len(), |i| i + 1);
        siblings.insert(at, node);
        self.nodes[node.0].parent = Some(parent);
    }

    fn append_to_body(&mut self, node: NodeId) {
        self.detach(node);
        let body = self.body;
        self.nodes[body.0].children.push(node);
        self.nodes[node.0].parent = Some(body);
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
        self.anchors.remove(&node);
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == self.body {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    fn render(&mut self, node: NodeId, content: &BadgeMarkup) {
        if let NodeKind::Element { class, markup, .. } = &mut self.nodes[node.0].kind {
            *class = s!(content.class_name);
            *markup = Some(content.html.clone());
        }
        // Rendered children replace any previous ones.
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.anchors.insert(node, parse_anchors(&content.html, &content.links));
    }
}

/// Anchors in `html`, in order. The n-th is guarded when it opens in a new
/// context and `links[n]` names its target.
fn parse_anchors(html: &str, links: &[String]) -> Vec<Anchor> {
    ANCHOR_TAG
        .find_iter(html)
        .enumerate()
        .map(|(i, tag)| {
            let tag = tag.as_str();
            let href = HREF.captures(tag).map(|c| decode_entities(&c[1])).unwrap_or_default();
            let guarded = tag.contains(r#"target="_blank""#) && links.get(i) == Some(&href);
            Anchor { href, guarded }
        })
        .collect()
}
