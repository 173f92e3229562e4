//! Visual tree produced by the template renderer.
//!
//! A deliberately small element model: tag, optional id, class list, children.
//! Class names mirror the utility classes of the web front-end so the HTML
//! serialization can be styled by the same stylesheet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// Starts a new element with the given tag.
pub fn el(tag: &str) -> Element {
    Element {
        tag: tag.to_string(),
        id: None,
        class: String::new(),
        children: Vec::new(),
    }
}

pub fn text(content: impl Into<String>) -> Node {
    Node::Text {
        text: content.into(),
    }
}

impl Element {
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends a child only when `child` is `Some`.
    pub fn child_opt(mut self, child: Option<impl Into<Node>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Shorthand for an element holding a single text node.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(text(content))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text { .. } => None,
        }
    }

    /// Depth-first search for the element carrying `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        let element = self.as_element()?;
        if element.id.as_deref() == Some(id) {
            return Some(self);
        }
        element.children.iter().find_map(|c| c.find_by_id(id))
    }
}

/// Tree queries used by the layout tests.
#[cfg(test)]
impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

#[cfg(test)]
impl Node {
    /// All elements (self included) matching `predicate`, in document order.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matching(predicate, &mut found);
        found
    }

    fn collect_matching<'a>(
        &'a self,
        predicate: &dyn Fn(&Element) -> bool,
        found: &mut Vec<&'a Element>,
    ) {
        if let Node::Element(element) = self {
            if predicate(element) {
                found.push(element);
            }
            for child in &element.children {
                child.collect_matching(predicate, found);
            }
        }
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id_descends_into_children() {
        let tree: Node = el("div")
            .child(el("section").child(el("p").id("target").text("hi")))
            .into();
        let found = tree.find_by_id("target").unwrap();
        assert_eq!(found.text_content(), "hi");
        assert!(tree.find_by_id("missing").is_none());
    }

    #[test]
    fn test_child_opt_skips_none() {
        let e = el("div")
            .child_opt(None::<Element>)
            .child_opt(Some(el("span")));
        assert_eq!(e.children.len(), 1);
    }

    #[test]
    fn test_has_class_matches_whole_words() {
        let e = el("div").class("mb-8 text-justify");
        assert!(e.has_class("text-justify"));
        assert!(!e.has_class("text"));
    }

    #[test]
    fn test_node_serializes_with_kind_tag() {
        let node: Node = el("h1").text("Jane").into();
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], "element");
        assert_eq!(value["tag"], "h1");
        assert_eq!(value["children"][0]["kind"], "text");
        assert_eq!(value["children"][0]["text"], "Jane");
    }
}
