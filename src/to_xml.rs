//! XML formatting module
//!
//! Use [`Document::serialize`] unless you need a different indentation, or to write the XML to a file or other writer.
use crate::{Document, Tag};

/// Indentation unit used by [`Document::serialize`] and [`Tag::pretty_print_xml`].
pub const TAB: &str = "\t";

/// Flatten a document as a formatted XML string using the given writer.
///
/// `tab_char` is used to indent the XML. If `None`, a tab is used.
///
/// # Errors
/// This function will return an error if the writer fails to write the XML string.
pub fn write_xml(
    writer: &mut dyn std::io::Write,
    document: &Document,
    tab_char: Option<&str>,
) -> std::io::Result<()> {
    writer.write_all(format_document(document, tab_char.unwrap_or(TAB)).as_bytes())
}

/// The whole document as text: the `<?xml` declaration, the root tag, and a trailing newline.
pub(crate) fn format_document(document: &Document, tab_char: &str) -> String {
    let mut out = String::from("<?xml ");

    //
    // Write the XML declaration
    for attribute in document.attributes() {
        out.push_str(&attribute.to_xml());
        out.push(' ');
    }
    out.push_str("?>\n");

    //
    // Write the root node
    write_tag(&mut out, document.root(), tab_char);
    out.push('\n');
    out
}

/// Writes a tag and everything below it.
///
/// Each line is indented by `depth - 1` units, so the root is not indented.
pub(crate) fn write_tag(out: &mut String, tag: Tag<'_>, tab_char: &str) {
    let mut stack = vec![(NodeTask::Open(tag), tag.depth())];
    while let Some((task, depth)) = stack.pop() {
        let tab = tab_char.repeat(depth - 1);

        match task {
            NodeTask::Close(node) => {
                out.push_str(&format!("{tab}</{}>\n", node.name()));
            }

            NodeTask::Open(node) => {
                let name = node.name();
                let attributes = format_attributes(node);

                if let Some(value) = node.value() {
                    out.push_str(&format!("{tab}<{name}{attributes}>{value}</{name}>\n"));
                    continue;
                }

                if !node.has_children() {
                    if node.has_attributes() {
                        out.push_str(&format!("{tab}<{name}{attributes} />\n"));
                    } else {
                        out.push_str(&format!("{tab}<{name}></{name}>\n"));
                    }
                    continue;
                }

                out.push_str(&format!("{tab}<{name}{attributes}>\n"));
                stack.push((NodeTask::Close(node), depth));
                let children: Vec<_> = node.children().collect();
                for child in children.into_iter().rev() {
                    stack.push((NodeTask::Open(child), depth + 1));
                }
            }
        }
    }
}

fn format_attributes(tag: Tag<'_>) -> String {
    tag.attributes()
        .iter()
        .map(|attribute| format!(" {}", attribute.to_xml()))
        .collect()
}

enum NodeTask<'a> {
    Open(Tag<'a>),
    Close(Tag<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_write_xml_with_declaration() {
        let mut output = Vec::new();
        let document = Document::with_root("root").unwrap();

        write_xml(&mut output, &document, None).unwrap();
        let result = String::from_utf8(output).unwrap();
        assert!(result.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
    }

    #[test]
    fn test_write_xml_with_root_node() {
        let document = Document::with_root("root").unwrap();
        let result = format_document(&document, TAB);
        assert!(result.ends_with("<root></root>\n\n"));
    }

    #[test]
    fn test_write_xml_with_attributes() {
        let mut document = Document::with_root("root").unwrap();
        let mut root = document.root_mut();
        root.add_attribute("id", 123).unwrap();
        root.add_attribute("class", "test").unwrap();

        let result = format_document(&document, TAB);
        assert!(result.contains(r#"<root id=123 class="test" />"#));
    }

    #[test]
    fn test_write_xml_with_nested_nodes() {
        let mut document = Document::with_root("root").unwrap();
        document.root_mut().add_tag("child").unwrap();

        let result = format_document(&document, TAB);
        assert!(result.contains("<root>\n\t<child></child>\n</root>"));
    }

    #[test]
    fn test_write_xml_custom_tab() {
        let mut document = Document::with_root("root").unwrap();
        let mut root = document.root_mut();
        root.add_tag("child").unwrap().add_value_tag("leaf", Value::from(1.5)).unwrap();

        let result = format_document(&document, "  ");
        assert!(result.contains("<root>\n  <child>\n    <leaf>1.5</leaf>\n  </child>\n</root>\n"));
    }

    #[test]
    fn test_empty_declaration() {
        let mut document = Document::with_root("root").unwrap();
        document.delete_attribute("version");
        document.delete_attribute("encoding");

        let result = format_document(&document, TAB);
        assert!(result.starts_with("<?xml ?>\n<root></root>\n"));
    }
}
