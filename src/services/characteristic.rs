//! Characteristic service
//!
//! Administrator operations on the characteristic tree outside of restore
//! and reset: listing, renaming and reordering roots.

use chrono::Utc;

use crate::audit::ChangeSource;
use crate::error::{DebtError, DebtResult};
use crate::models::Characteristic;
use crate::storage::{Storage, StorageSession};

/// Service for characteristic management
pub struct CharacteristicService<'a> {
    storage: &'a Storage,
}

/// A root characteristic with its enabled sub-characteristics
#[derive(Debug, Clone)]
pub struct CharacteristicTree {
    pub root: Characteristic,
    pub subs: Vec<Characteristic>,
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

impl<'a> CharacteristicService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Enabled roots by order, each with its enabled subs sorted by name
    pub fn list_tree(&self) -> DebtResult<Vec<CharacteristicTree>> {
        let session = self.storage.open_session()?;

        let mut roots = enabled_roots(&session);
        roots.sort_by_key(|c| (c.order.is_none(), c.order, c.id));

        Ok(roots
            .into_iter()
            .map(|root| {
                let mut subs: Vec<_> = session
                    .select_characteristics_by_parent(root.id)
                    .into_iter()
                    .filter(|c| c.enabled)
                    .collect();
                subs.sort_by(|a, b| a.name.cmp(&b.name));
                CharacteristicTree { root, subs }
            })
            .collect())
    }

    /// Rename an enabled characteristic
    ///
    /// Nothing is written when the name does not change.
    pub fn rename(&self, key: &str, name: &str) -> DebtResult<Characteristic> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DebtError::Validation(
                "Characteristic name cannot be empty".into(),
            ));
        }

        let mut session = self.storage.open_session()?;
        let mut characteristic = find_enabled(&session, key)?;
        if characteristic.name == name {
            return Ok(characteristic);
        }

        characteristic.name = name.to_string();
        characteristic.updated_at = Some(Utc::now());
        session.update_characteristic(characteristic.clone())?;
        session.commit(ChangeSource::Rename)?;

        tracing::info!(key = %characteristic.key, "characteristic renamed");
        Ok(characteristic)
    }

    /// Swap a root with the previous one
    ///
    /// Returns `false` when the root is already first.
    pub fn move_up(&self, key: &str) -> DebtResult<bool> {
        self.move_root(key, Direction::Up)
    }

    /// Swap a root with the next one
    ///
    /// Returns `false` when the root is already last.
    pub fn move_down(&self, key: &str) -> DebtResult<bool> {
        self.move_root(key, Direction::Down)
    }

    fn move_root(&self, key: &str, direction: Direction) -> DebtResult<bool> {
        let mut session = self.storage.open_session()?;
        let characteristic = find_enabled(&session, key)?;
        if !characteristic.is_root() {
            return Err(DebtError::Validation(format!(
                "'{}' is a sub-characteristic, only root characteristics can be moved",
                key
            )));
        }

        let mut roots: Vec<_> = enabled_roots(&session)
            .into_iter()
            .filter(|c| c.order.is_some())
            .collect();
        roots.sort_by_key(|c| (c.order, c.id));

        let Some(position) = roots.iter().position(|c| c.id == characteristic.id) else {
            return Err(DebtError::Validation(format!(
                "Root characteristic '{}' has no order",
                key
            )));
        };
        let neighbour = match direction {
            Direction::Up => position.checked_sub(1),
            Direction::Down => Some(position + 1).filter(|&i| i < roots.len()),
        };
        let Some(neighbour) = neighbour else {
            return Ok(false);
        };

        let now = Utc::now();
        let mut moved = roots[position].clone();
        let mut swapped = roots[neighbour].clone();
        std::mem::swap(&mut moved.order, &mut swapped.order);
        moved.updated_at = Some(now);
        swapped.updated_at = Some(now);

        session.update_characteristic(moved)?;
        session.update_characteristic(swapped)?;
        session.commit(ChangeSource::Reorder)?;

        tracing::info!(key, "root characteristic moved");
        Ok(true)
    }
}

fn enabled_roots(session: &StorageSession<'_>) -> Vec<Characteristic> {
    session
        .select_enabled_characteristics()
        .into_iter()
        .filter(Characteristic::is_root)
        .collect()
}

fn find_enabled(session: &StorageSession<'_>, key: &str) -> DebtResult<Characteristic> {
    session
        .select_characteristic_by_key(key)
        .filter(|c| c.enabled)
        .ok_or_else(|| DebtError::characteristic_not_found(key))
}
