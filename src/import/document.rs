//! Shared XML reading helpers
//!
//! Both importers read the same `<sqale>` document. Parsing is tolerant of
//! whitespace and indentation but a document that is not well-formed, or
//! whose root is not `<sqale>`, is a fatal [`DebtError::Xml`].

use roxmltree::{Document, Node};

use crate::error::{DebtError, DebtResult};

pub const ROOT: &str = "sqale";
pub const CHARACTERISTIC: &str = "chc";
pub const CHARACTERISTIC_KEY: &str = "key";
pub const CHARACTERISTIC_NAME: &str = "name";
pub const CHARACTERISTIC_ORDER: &str = "order";
pub const REPOSITORY_KEY: &str = "rule-repo";
pub const RULE_KEY: &str = "rule-key";
pub const PROPERTY: &str = "prop";
pub const PROPERTY_KEY: &str = "key";
pub const PROPERTY_VALUE: &str = "val";
pub const PROPERTY_TEXT_VALUE: &str = "txt";
pub const PROPERTY_FUNCTION: &str = "remediationFunction";
pub const PROPERTY_COEFFICIENT: &str = "remediationFactor";
pub const PROPERTY_OFFSET: &str = "offset";

/// Parse `xml` and check that its root element is `<sqale>`
pub fn parse_document(xml: &str) -> DebtResult<Document<'_>> {
    let document = Document::parse(xml)?;

    let root = document.root_element().tag_name().name();
    if root != ROOT {
        return Err(DebtError::Xml(format!(
            "Expected <{}> as root element, found <{}>",
            ROOT, root
        )));
    }

    Ok(document)
}

/// Direct child elements of `node` named `name`
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Trimmed text of the first child element named `name`, if non-blank
pub fn child_text(node: Node<'_, '_>, name: &'static str) -> Option<String> {
    child_elements(node, name)
        .next()
        .map(descendant_text)
        .filter(|text| !text.is_empty())
}

pub fn has_child(node: Node<'_, '_>, name: &'static str) -> bool {
    child_elements(node, name).next().is_some()
}

fn descendant_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
