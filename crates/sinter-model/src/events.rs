//! Per-site event lists over one shared growable arena.
//!
//! Multi-reaction models enumerate every reaction a site can currently
//! undergo. The records live in one contiguous arena shared by all
//! owned sites; each site threads its records through an index-based
//! singly-linked list, and unused slots thread the free list. Links are
//! indices, never addresses, so arena growth relocates storage without
//! touching a single link.

use crate::reaction::ReactionEvent;

/// List terminator / empty-list marker.
const NIL: u32 = u32::MAX;

/// Arena slots added when the first record is requested.
const FIRST_GROWTH: usize = 16;

/// One reaction a specific site can currently undergo.
#[derive(Clone, Copy, Debug)]
pub struct EventRecord {
    /// The reaction and its partner sites.
    pub event: ReactionEvent,
    /// This event's contribution to the owning site's propensity.
    pub propensity: f64,
    /// Next record of the same site, or `NIL`.
    next: u32,
}

/// The shared event-record arena plus per-site list heads.
///
/// Invariant: every arena slot is reachable from exactly one of
/// {some site's list, the free list} — never both, never neither.
/// [`EventArena::audit_partition`] checks this exhaustively and is
/// meant for tests and debug assertions.
#[derive(Clone, Debug)]
pub struct EventArena {
    records: Vec<EventRecord>,
    /// Head of each owned site's list, indexed by site ordinal.
    first: Vec<u32>,
    /// Head of the free list.
    free_head: u32,
    /// Records currently on site lists.
    in_use: usize,
}

impl EventArena {
    /// Create an arena for `n_sites` owned sites with no records yet.
    ///
    /// Storage is allocated lazily on the first [`EventArena::add`].
    pub fn new(n_sites: usize) -> Self {
        Self {
            records: Vec::new(),
            first: vec![NIL; n_sites],
            free_head: NIL,
            in_use: 0,
        }
    }

    /// Records currently linked on site lists.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Total arena slots, used and free.
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Return every record of `site` to the free list and empty its
    /// list head. Must run before re-enumerating the site's reactions.
    pub fn clear(&mut self, site: usize) {
        let mut index = self.first[site];
        while index != NIL {
            let next = self.records[index as usize].next;
            self.records[index as usize].next = self.free_head;
            self.free_head = index;
            self.in_use -= 1;
            index = next;
        }
        self.first[site] = NIL;
    }

    /// Link a new event at the head of `site`'s list and return its
    /// propensity contribution for the caller to accumulate.
    ///
    /// Pops a slot off the free list, doubling the arena when none is
    /// left. Growth appends fresh slots and threads them onto the free
    /// list; existing indices are untouched.
    pub fn add(&mut self, site: usize, event: ReactionEvent, propensity: f64) -> f64 {
        debug_assert!(
            propensity.is_finite() && propensity >= 0.0,
            "event propensity must be finite and non-negative, got {propensity}"
        );
        if self.free_head == NIL {
            self.grow();
        }
        let index = self.free_head;
        let slot = &mut self.records[index as usize];
        self.free_head = slot.next;
        slot.event = event;
        slot.propensity = propensity;
        slot.next = self.first[site];
        self.first[site] = index;
        self.in_use += 1;
        propensity
    }

    /// Iterate `site`'s events, most recently added first.
    pub fn events(&self, site: usize) -> EventIter<'_> {
        EventIter {
            arena: self,
            index: self.first[site],
        }
    }

    fn grow(&mut self) {
        let old = self.records.len();
        let target = if old == 0 { FIRST_GROWTH } else { old * 2 };
        self.records.reserve(target - old);
        for k in old..target {
            let next = if k + 1 < target { (k + 1) as u32 } else { NIL };
            self.records.push(EventRecord {
                event: ReactionEvent::placeholder(),
                propensity: 0.0,
                next,
            });
        }
        self.free_head = old as u32;
    }

    /// Verify the partition invariant: each slot reachable from exactly
    /// one list. Returns a description of the first violation found.
    pub fn audit_partition(&self) -> Result<(), String> {
        let cap = self.records.len();
        let mut owner: Vec<Option<usize>> = vec![None; cap];

        for (site, &head) in self.first.iter().enumerate() {
            let mut index = head;
            let mut steps = 0usize;
            while index != NIL {
                if steps > cap {
                    return Err(format!("cycle in site {site}'s event list"));
                }
                let slot = index as usize;
                if let Some(prev) = owner[slot] {
                    return Err(format!(
                        "record {slot} reachable from site {site} and from owner {prev}"
                    ));
                }
                owner[slot] = Some(site);
                index = self.records[slot].next;
                steps += 1;
            }
        }

        let mut index = self.free_head;
        let mut steps = 0usize;
        while index != NIL {
            if steps > cap {
                return Err("cycle in the free list".to_string());
            }
            let slot = index as usize;
            if let Some(prev) = owner[slot] {
                return Err(format!(
                    "record {slot} on the free list and reachable from owner {prev}"
                ));
            }
            owner[slot] = Some(usize::MAX);
            index = self.records[slot].next;
            steps += 1;
        }

        if let Some(orphan) = owner.iter().position(Option::is_none) {
            return Err(format!("record {orphan} unreachable from any list"));
        }
        Ok(())
    }
}

/// Iterator over one site's event records.
pub struct EventIter<'a> {
    arena: &'a EventArena,
    index: u32,
}

impl<'a> Iterator for EventIter<'a> {
    type Item = &'a EventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index == NIL {
            return None;
        }
        let record = &self.arena.records[self.index as usize];
        self.index = record.next;
        Some(record)
    }
}
