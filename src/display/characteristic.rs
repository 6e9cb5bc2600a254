//! Characteristic display formatting

use crate::services::CharacteristicTree;

/// Format characteristics as a tree, roots with their order
pub fn format_characteristic_tree(tree: &[CharacteristicTree]) -> String {
    if tree.is_empty() {
        return "No characteristics found.\n\nRun 'debtmodel reset' to load the default model."
            .to_string();
    }

    let mut output = String::new();

    for (i, node) in tree.iter().enumerate() {
        let order = node
            .root
            .order
            .map(|o| format!("{}. ", o))
            .unwrap_or_default();
        output.push_str(&format!("{}{} [{}]\n", order, node.root.name, node.root.key));

        if node.subs.is_empty() {
            output.push_str("  (no sub-characteristics)\n");
        } else {
            for (j, sub) in node.subs.iter().enumerate() {
                let prefix = if j == node.subs.len() - 1 {
                    "└── "
                } else {
                    "├── "
                };
                output.push_str(&format!("  {}{} [{}]\n", prefix, sub.name, sub.key));
            }
        }

        if i < tree.len() - 1 {
            output.push('\n');
        }
    }

    output
}
