//! Characteristics importer
//!
//! Reads the two-level characteristic tree out of a debt model document.
//! `<chc>` elements directly under `<sqale>` are roots, `<chc>` elements
//! under a root are sub-characteristics. Anything nested deeper (rule
//! entries) is not a characteristic and is left to the rules importer.

use roxmltree::Node;

use super::document::{
    child_elements, child_text, parse_document, CHARACTERISTIC, CHARACTERISTIC_KEY,
    CHARACTERISTIC_NAME, CHARACTERISTIC_ORDER,
};
use super::legacy::{convert_characteristic_key, key_from_name};
use crate::error::{DebtError, DebtResult};
use crate::models::{DebtCharacteristic, DebtModel};

/// Parse the characteristic tree of a debt model document
///
/// Roots without an explicit `<order>` are numbered by position, starting
/// at 1.
pub fn import_characteristics(xml: &str) -> DebtResult<DebtModel> {
    let document = parse_document(xml)?;
    let mut model = DebtModel::new();

    for root_node in child_elements(document.root_element(), CHARACTERISTIC) {
        let Some(mut root) = read_characteristic(root_node)? else {
            continue;
        };
        if root.order.is_none() {
            root.order = Some(model.root_characteristics().len() as i32 + 1);
        }

        let root_key = root.key.clone();
        model.add_root_characteristic(root);

        for sub_node in child_elements(root_node, CHARACTERISTIC) {
            if let Some(mut sub) = read_characteristic(sub_node)? {
                sub.order = None;
                model.add_sub_characteristic(sub, &root_key);
            }
        }
    }

    tracing::debug!(
        roots = model.root_characteristics().len(),
        "imported characteristics"
    );
    Ok(model)
}

/// Read key, name and order of one `<chc>`
///
/// Returns `None` for elements that carry neither a key nor a name, such as
/// rule entries.
fn read_characteristic(node: Node<'_, '_>) -> DebtResult<Option<DebtCharacteristic>> {
    let name = child_text(node, CHARACTERISTIC_NAME);
    let key = match (child_text(node, CHARACTERISTIC_KEY), &name) {
        (Some(key), _) => key,
        (None, Some(name)) => key_from_name(name),
        (None, None) => return Ok(None),
    };
    let key = convert_characteristic_key(&key);

    let order = child_text(node, CHARACTERISTIC_ORDER)
        .map(|order| {
            order.parse::<i32>().map_err(|_| {
                DebtError::Xml(format!(
                    "Order of characteristic '{}' is not an integer: '{}'",
                    key, order
                ))
            })
        })
        .transpose()?;

    Ok(Some(DebtCharacteristic {
        name: name.unwrap_or_else(|| key.clone()),
        key,
        order,
        parent_key: None,
    }))
}
