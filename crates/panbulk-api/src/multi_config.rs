// Multi-config request builder
//
// `action=multi-config` carries several ordered `set` operations in one
// request. The device applies them together and answers with one nested
// `<response id="N">` per operation.

use crate::element::{Element, render_all};

/// One `set` operation: merge `body` into the node at `xpath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    pub xpath: String,
    pub body: Vec<Element>,
}

/// Ordered batch of `set` operations sent as a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiConfig {
    operations: Vec<SetOperation>,
}

impl MultiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `set` at `xpath` whose body is the given sibling elements.
    pub fn set(mut self, xpath: impl Into<String>, body: impl IntoIterator<Item = Element>) -> Self {
        self.operations.push(SetOperation {
            xpath: xpath.into(),
            body: body.into_iter().collect(),
        });
        self
    }

    pub fn operations(&self) -> &[SetOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The `<multi-config>` document sent as the `element` parameter.
    /// Operation ids are 1-based in insertion order.
    pub fn to_element(&self) -> Element {
        Element::new("multi-config").children(self.operations.iter().enumerate().map(
            |(i, op)| {
                Element::new("set")
                    .attr("id", (i + 1).to_string())
                    .attr("xpath", op.xpath.as_str())
                    .children(op.body.iter().cloned())
            },
        ))
    }

    /// One `xpath <- body` line per operation, for trace logging.
    pub fn describe(&self) -> String {
        self.operations
            .iter()
            .map(|op| format!("{} <- {}", op.xpath, render_all(&op.body)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
