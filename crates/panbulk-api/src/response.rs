// XML API response envelope
//
// Every reply is wrapped as
//   <response status="success|error" code="N"> ... </response>
// Payloads are small, so the body is parsed into an owned node tree with
// quick-xml's pull reader and callers navigate it by element name.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::Error;

/// Envelope status attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Error,
}

/// One parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given element name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Walk a path of direct child names.
    pub fn find(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text of the direct child `name`, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// All descendant text joined by single spaces.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if !self.text.is_empty() {
            parts.push(&self.text);
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }
}

/// A parsed `<response>` document.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    pub code: Option<String>,
    root: XmlNode,
}

impl ApiResponse {
    /// Parse a response body. Fails if the body is not XML or the root
    /// element is not `<response>`.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let root = parse_tree(body).map_err(|message| Error::MalformedResponse {
            message,
            body: body.to_owned(),
        })?;

        if root.name != "response" {
            return Err(Error::MalformedResponse {
                message: format!("expected <response> root, found <{}>", root.name),
                body: body.to_owned(),
            });
        }

        let status = match root.attr("status") {
            Some("success") => ResponseStatus::Success,
            Some("error") => ResponseStatus::Error,
            other => {
                return Err(Error::MalformedResponse {
                    message: format!("unexpected response status {other:?}"),
                    body: body.to_owned(),
                });
            }
        };
        let code = root.attr("code").map(String::from);

        Ok(Self { status, code, root })
    }

    /// The `<result>` payload of a successful request.
    pub fn result(&self) -> Option<&XmlNode> {
        self.root.child("result")
    }

    /// Human-readable message: the text of `<msg>` (wherever it sits),
    /// falling back to all text in the envelope.
    pub fn message(&self) -> String {
        let msg = self
            .root
            .child("msg")
            .or_else(|| self.root.find(&["result", "msg"]))
            .map(XmlNode::text_content)
            .unwrap_or_default();
        if msg.is_empty() {
            self.root.text_content()
        } else {
            msg
        }
    }

    /// Turn an error envelope into an `Error`.
    ///
    /// Multi-config replies nest one `<response id="N">` per operation; a
    /// failing operation is reported with its id even when the outer
    /// envelope says success.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.status == ResponseStatus::Error {
            return Err(self.to_error());
        }

        if let Some(failed) = self
            .root
            .children_named("response")
            .find(|r| r.attr("status") == Some("error"))
        {
            let id = failed.attr("id").unwrap_or("?");
            return Err(Error::Api {
                code: failed.attr("code").map(String::from),
                message: format!("operation {id}: {}", failed.text_content()),
            });
        }

        Ok(self)
    }

    fn to_error(&self) -> Error {
        // Nested per-operation failures carry the useful detail.
        let message = self
            .root
            .children_named("response")
            .find(|r| r.attr("status") == Some("error"))
            .map(|r| format!("operation {}: {}", r.attr("id").unwrap_or("?"), r.text_content()))
            .unwrap_or_else(|| self.message());

        if self.code.as_deref() == Some("403") {
            Error::Authentication { message }
        } else {
            Error::Api {
                code: self.code.clone(),
                message,
            }
        }
    }
}

// ── Tree parser ─────────────────────────────────────────────────────

fn start_node(start: &BytesStart<'_>) -> Result<XmlNode, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        name,
        attributes,
        ..XmlNode::default()
    })
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err("multiple root elements".into()),
    }
}

fn parse_tree(body: &str) -> Result<XmlNode, String> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(start_node(&e)?),
            Ok(Event::Empty(e)) => {
                let node = start_node(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or("unbalanced closing tag")?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ));
            }
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".into());
    }
    root.ok_or_else(|| "empty document".into())
}
