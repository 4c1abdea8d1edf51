//! Clock-face slot registry.
//!
//! Slots are handed out in [`SLOT_ORDER`] with a monotonic cursor. A slot is
//! never reassigned during a session, so once twelve plugins have loaded
//! every later announcement is rejected.

use std::collections::HashMap;

use jetclock_common::{PluginToken, SlotHour, SLOT_ORDER};

use crate::error::RelayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub hour: SlotHour,
    pub token: Option<PluginToken>,
    /// Content URL, token query included.
    pub source: Option<String>,
    shown: bool,
}

impl Slot {
    fn empty(hour: SlotHour) -> Self {
        Self {
            hour,
            token: None,
            source: None,
            shown: false,
        }
    }

    /// A slot is shown once a plugin owns it and its content loaded.
    pub fn is_visible(&self) -> bool {
        self.token.is_some() && self.shown
    }
}

pub struct SlotRegistry {
    /// Slots in allocation order.
    slots: Vec<Slot>,
    cursor: usize,
    by_token: HashMap<PluginToken, usize>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            slots: SLOT_ORDER
                .iter()
                .filter_map(|&h| SlotHour::new(h))
                .map(Slot::empty)
                .collect(),
            cursor: 0,
            by_token: HashMap::new(),
        }
    }

    /// Bind `token` to the next free slot.
    pub fn allocate(&mut self, token: PluginToken) -> Result<SlotHour, RelayError> {
        if let Some(&idx) = self.by_token.get(&token) {
            return Err(RelayError::DuplicateToken(self.slots[idx].hour));
        }
        let idx = self.cursor;
        let slot = self.slots.get_mut(idx).ok_or(RelayError::SlotsFull)?;
        slot.token = Some(token.clone());
        self.cursor += 1;
        self.by_token.insert(token, idx);
        Ok(slot.hour)
    }

    pub fn lookup(&self, token: &PluginToken) -> Option<&Slot> {
        self.by_token.get(token).map(|&idx| &self.slots[idx])
    }

    pub fn slot(&self, hour: SlotHour) -> Option<&Slot> {
        self.slots.iter().find(|s| s.hour == hour)
    }

    /// Record the content URL loaded into an assigned slot. Returns `false`
    /// if the slot has no plugin.
    pub fn bind_source(&mut self, hour: SlotHour, url: impl Into<String>) -> bool {
        match self.slots.iter_mut().find(|s| s.hour == hour) {
            Some(slot) if slot.token.is_some() => {
                slot.source = Some(url.into());
                true
            }
            _ => false,
        }
    }

    /// Mark an assigned slot's frame as shown or hidden. Returns `false` if
    /// the slot has no plugin.
    pub fn set_shown(&mut self, hour: SlotHour, shown: bool) -> bool {
        match self.slots.iter_mut().find(|s| s.hour == hour) {
            Some(slot) if slot.token.is_some() => {
                slot.shown = shown;
                true
            }
            _ => false,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn assigned_count(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.slots.len() - self.cursor
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}
