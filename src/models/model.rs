//! In-memory characteristic tree
//!
//! Flat records plus a `parent key -> sub-characteristics` adjacency map.
//! The model does no validation beyond bookkeeping; policy lives in the
//! importers and the reconciler.

use std::collections::HashMap;

use super::characteristic::DebtCharacteristic;

/// Root characteristics in insertion order, with their sub-characteristics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtModel {
    roots: Vec<DebtCharacteristic>,
    subs: HashMap<String, Vec<DebtCharacteristic>>,
}

impl DebtModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root_characteristic(&mut self, characteristic: DebtCharacteristic) -> &mut Self {
        self.roots.push(characteristic);
        self
    }

    /// Attach a sub-characteristic to `parent_key`
    ///
    /// The parent does not need to be registered yet.
    pub fn add_sub_characteristic(
        &mut self,
        mut characteristic: DebtCharacteristic,
        parent_key: &str,
    ) -> &mut Self {
        characteristic.parent_key = Some(parent_key.to_string());
        self.subs
            .entry(parent_key.to_string())
            .or_default()
            .push(characteristic);
        self
    }

    pub fn root_characteristics(&self) -> &[DebtCharacteristic] {
        &self.roots
    }

    pub fn sub_characteristics(&self, parent_key: &str) -> &[DebtCharacteristic] {
        self.subs.get(parent_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn characteristic_by_key(&self, key: &str) -> Option<&DebtCharacteristic> {
        self.roots
            .iter()
            .chain(self.subs.values().flatten())
            .find(|c| c.key == key)
    }

    /// Roots in insertion order, each followed by its sub-characteristics
    pub fn all_characteristics(&self) -> impl Iterator<Item = &DebtCharacteristic> + '_ {
        self.roots.iter().flat_map(move |root| {
            std::iter::once(root).chain(self.sub_characteristics(&root.key).iter())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.subs.values().all(Vec::is_empty)
    }

    /// Keys that have sub-characteristics attached, in no particular order
    pub fn parent_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.subs
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(key, _)| key.as_str())
    }

    /// Add what `other` declares and this model lacks
    ///
    /// Unknown roots are appended after the last order, with their subs.
    /// Unknown subs of a known root are appended to it. Nothing already
    /// present is modified.
    pub fn merge(&mut self, other: &DebtModel) {
        for root in other.root_characteristics() {
            if self.characteristic_by_key(&root.key).is_none() {
                let order = self.roots.iter().filter_map(|c| c.order).max().unwrap_or(0) + 1;
                self.add_root_characteristic(DebtCharacteristic {
                    order: Some(order),
                    ..root.clone()
                });
            } else if self.roots.iter().all(|c| c.key != root.key) {
                // Declared here as a sub: its children would end up three levels deep
                continue;
            }

            for sub in other.sub_characteristics(&root.key) {
                if self.characteristic_by_key(&sub.key).is_none() {
                    self.add_sub_characteristic(sub.clone(), &root.key);
                }
            }
        }
    }
}
