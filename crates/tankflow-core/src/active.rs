//! Ordered set of tanks that are still filling.
//!
//! Redistribution depends on input order: flow released by a full tank goes
//! to the *next* active tank. Removing tanks therefore has to keep the
//! relative order of the rest, and the engine needs to ask "is anything
//! after this tank?" while it walks and removes. [`ActiveTanks`] is a doubly
//! linked list whose nodes live in a [`SlotMap`], with a [`CursorMut`] for the
//! walk-and-remove pass.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::id::TankId;
use crate::snapshot::StateError;
use crate::tank::Tank;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Link {
    tank: Tank,
    prev: Option<TankId>,
    next: Option<TankId>,
}

/// Tanks still filling, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveTanks {
    links: SlotMap<TankId, Link>,
    head: Option<TankId>,
    tail: Option<TankId>,
}

impl ActiveTanks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tank at the end of the order.
    pub fn push_back(&mut self, tank: Tank) -> TankId {
        let prev = self.tail;
        let id = self.links.insert(Link {
            tank,
            prev,
            next: None,
        });
        match prev {
            Some(prev) => self.links[prev].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, id: TankId) -> Option<&Tank> {
        self.links.get(id).map(|link| &link.tank)
    }

    pub fn contains(&self, id: TankId) -> bool {
        self.links.contains_key(id)
    }

    /// First tank in order.
    pub fn front(&self) -> Option<&Tank> {
        self.head.map(|id| &self.links[id].tank)
    }

    /// Last tank in order.
    pub fn back(&self) -> Option<&Tank> {
        self.tail.map(|id| &self.links[id].tank)
    }

    /// Iterate tanks in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            links: &self.links,
            next: self.head,
        }
    }

    /// Remove a tank by id, splicing its neighbours together.
    pub fn remove(&mut self, id: TankId) -> Option<Tank> {
        let link = self.links.remove(id)?;
        match link.prev {
            Some(prev) => self.links[prev].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.links[next].prev = link.prev,
            None => self.tail = link.prev,
        }
        Some(link.tank)
    }

    /// Walk the chain from `head` and confirm it is well formed: every link
    /// resolves, back links agree, it ends at `tail`, it visits every stored
    /// tank once in increasing ordinal order, and every tank is valid.
    ///
    /// Lists built through `push_back` always pass; decoded ones may not.
    pub(crate) fn check_integrity(&self) -> Result<(), StateError> {
        let stored = self.links.len();
        let mut visited = 0;
        let mut prev: Option<TankId> = None;
        let mut last_ordinal: Option<usize> = None;
        let mut next = self.head;

        while let Some(id) = next {
            let link = self.links.get(id).ok_or(StateError::DanglingLink)?;
            if link.prev != prev {
                return Err(StateError::BrokenChain);
            }
            visited += 1;
            if visited > stored {
                return Err(StateError::LengthMismatch { visited, stored });
            }
            let ordinal = link.tank.ordinal();
            if last_ordinal.is_some_and(|last| last >= ordinal) {
                return Err(StateError::OutOfOrder { ordinal });
            }
            link.tank
                .revalidate()
                .map_err(|source| StateError::InvalidTank { ordinal, source })?;
            last_ordinal = Some(ordinal);
            prev = Some(id);
            next = link.next;
        }

        if prev != self.tail {
            return Err(StateError::BrokenChain);
        }
        if visited != stored {
            return Err(StateError::LengthMismatch { visited, stored });
        }
        Ok(())
    }

    /// A cursor positioned on the first tank.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_> {
        let current = self.head;
        CursorMut {
            list: self,
            current,
        }
    }
}

impl FromIterator<Tank> for ActiveTanks {
    fn from_iter<I: IntoIterator<Item = Tank>>(iter: I) -> Self {
        let mut list = Self::new();
        for tank in iter {
            list.push_back(tank);
        }
        list
    }
}

impl<'a> IntoIterator for &'a ActiveTanks {
    type Item = (TankId, &'a Tank);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

/// In-order iterator over active tanks.
pub struct Iter<'a> {
    links: &'a SlotMap<TankId, Link>,
    next: Option<TankId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (TankId, &'a Tank);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let links = self.links;
        let link = &links[id];
        self.next = link.next;
        Some((id, &link.tank))
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A position in [`ActiveTanks`] that can mutate or remove the tank under it.
///
/// Once the cursor has moved past the last tank, `current` is `None`.
pub struct CursorMut<'a> {
    list: &'a mut ActiveTanks,
    current: Option<TankId>,
}

impl CursorMut<'_> {
    pub fn current_id(&self) -> Option<TankId> {
        self.current
    }

    pub fn current(&self) -> Option<&Tank> {
        let id = self.current?;
        Some(&self.list.links[id].tank)
    }

    pub fn current_mut(&mut self) -> Option<&mut Tank> {
        let id = self.current?;
        Some(&mut self.list.links[id].tank)
    }

    /// Whether another tank follows the current one.
    pub fn has_next(&self) -> bool {
        self.current
            .and_then(|id| self.list.links[id].next)
            .is_some()
    }

    /// The tank following the current one, if any.
    pub fn peek_next(&self) -> Option<&Tank> {
        let next = self.list.links[self.current?].next?;
        Some(&self.list.links[next].tank)
    }

    /// Step to the following tank.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(|id| self.list.links[id].next);
    }

    /// Remove the current tank and move to its successor.
    pub fn remove_current(&mut self) -> Option<Tank> {
        let id = self.current?;
        self.current = self.list.links[id].next;
        self.list.remove(id)
    }
}
