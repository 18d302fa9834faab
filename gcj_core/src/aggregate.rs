//! The in-memory calendar shared by all ingested sources.

use std::collections::{btree_map::Entry, BTreeMap};

use crate::category::{Category, CategoryBitmask};

/// All districts seen during a run.
///
/// Every insertion merges at the leaf: adding a block or a date never replaces
/// blocks, dates or flags that are already present.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CalendarAggregate {
    districts: BTreeMap<String, District>,
}

/// A district with its blocks and its collection calendar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct District {
    blocks: BTreeMap<String, Block>,
    calendar: BTreeMap<String, DateEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub pronunciation: String,
}

/// The categories collected on one date of a district.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateEntry {
    flags: CategoryBitmask,
}

impl Default for DateEntry {
    fn default() -> Self {
        Self::blank()
    }
}

impl DateEntry {
    /// An entry with every category unset.
    pub fn blank() -> Self {
        Self {
            flags: CategoryBitmask::none(),
        }
    }

    pub fn is_set(&self, category: Category) -> bool {
        self.flags.contains(category.flag())
    }

    /// Set the flag of a category. Flags are never cleared.
    pub fn set(&mut self, category: Category) {
        self.flags |= category.flag();
    }

    pub fn is_blank(&self) -> bool {
        self.flags.is_none()
    }
}

impl CalendarAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.get(name)
    }

    /// Get a district, creating it empty on first use.
    pub fn district_mut(&mut self, name: &str) -> &mut District {
        self.districts.entry(name.to_string()).or_default()
    }

    /// Districts in lexicographic order.
    pub fn districts(&self) -> impl Iterator<Item = (&String, &District)> {
        self.districts.iter()
    }

    pub fn districts_mut(&mut self) -> impl Iterator<Item = (&String, &mut District)> {
        self.districts.iter_mut()
    }

    /// Register a block of a district. Returns `false` if the block was already known,
    /// in which case the first pronunciation is kept.
    pub fn register_block(&mut self, district: &str, block: &str, pronunciation: &str) -> bool {
        self.district_mut(district).insert_block(block, pronunciation)
    }

    /// Mark a category as collected on a date of a district. Returns `true` if the
    /// flag was newly set.
    pub fn mark(&mut self, district: &str, date: &str, category: Category) -> bool {
        let entry = self.district_mut(district).entry_mut(date);
        let newly_set = !entry.is_set(category);
        entry.set(category);
        newly_set
    }
}

impl District {
    pub fn blocks(&self) -> impl Iterator<Item = (&String, &Block)> {
        self.blocks.iter()
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    /// Calendar entries in lexicographic date order.
    pub fn calendar(&self) -> impl Iterator<Item = (&String, &DateEntry)> {
        self.calendar.iter()
    }

    pub fn date(&self, date: &str) -> Option<&DateEntry> {
        self.calendar.get(date)
    }

    pub fn calendar_len(&self) -> usize {
        self.calendar.len()
    }

    fn insert_block(&mut self, name: &str, pronunciation: &str) -> bool {
        match self.blocks.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Block {
                    name: name.to_string(),
                    pronunciation: pronunciation.to_string(),
                });
                true
            }
        }
    }

    /// Get the entry of a date, creating a blank one if absent.
    pub fn entry_mut(&mut self, date: &str) -> &mut DateEntry {
        self.calendar.entry(date.to_string()).or_default()
    }

    /// Insert a blank entry unless the date is already present. Returns `true` on insertion.
    pub fn insert_blank(&mut self, date: String) -> bool {
        match self.calendar.entry(date) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(DateEntry::blank());
                true
            }
        }
    }
}
