// XML element builder for config request bodies.
//
// Config `set` requests carry an XML fragment in the `element` parameter.
// Fragments are built as a small owned tree and serialized with
// `quick_xml::Writer`, which handles escaping.

use std::fmt;
use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// An owned XML element: name, attributes, and either text or children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// `<name>text</name>`
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// `<entry name="..."/>`, the keyed list item used throughout the config tree.
    pub fn entry(name: impl Into<String>) -> Self {
        Self::new("entry").attr("name", name)
    }

    /// `<member>name</member>`, the plain list item used for references.
    pub fn member(name: impl Into<String>) -> Self {
        Self::text("member", name)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a child only when `child` is `Some`.
    pub fn child_opt(self, child: Option<Element>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    fn write_to<W: io::Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        if let Some(ref text) = self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer).map_err(|_| fmt::Error)?;
        let rendered = String::from_utf8(writer.into_inner()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Render a sequence of sibling elements without a wrapper.
pub fn render_all(elements: &[Element]) -> String {
    elements.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_element_self_closes() {
        assert_eq!(Element::new("layer3").to_string(), "<layer3/>");
    }

    #[test]
    fn nested_entry_renders_in_order() {
        let el = Element::entry("ethernet1/5.1")
            .child(Element::text("tag", "1"))
            .child(Element::new("ip").child(Element::entry("1.1.1.1/23")))
            .child(Element::text("mtu", "1400"));

        assert_eq!(
            el.to_string(),
            "<entry name=\"ethernet1/5.1\"><tag>1</tag><ip><entry name=\"1.1.1.1/23\"/></ip>\
             <mtu>1400</mtu></entry>"
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let el = Element::text("comment", "a<b & \"c\"").attr("x", "1'2");
        assert_eq!(
            el.to_string(),
            "<comment x=\"1&apos;2\">a&lt;b &amp; &quot;c&quot;</comment>"
        );
    }

    #[test]
    fn child_opt_skips_none() {
        let el = Element::entry("e").child_opt(None).child_opt(Some(Element::member("m")));
        assert_eq!(el.to_string(), "<entry name=\"e\"><member>m</member></entry>");
    }

    #[test]
    fn render_all_concatenates_siblings() {
        let members = [Element::member("a"), Element::member("b")];
        assert_eq!(render_all(&members), "<member>a</member><member>b</member>");
    }
}
