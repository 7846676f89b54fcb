//! Address Allocator Module
//!
//! Turns a declared-capacity shelf segment into an enumerable set of
//! individual slot addresses, and reports occupancy per slot by recomputing
//! it from the loaded document set. The allocator keeps no mutable counters
//! of its own; the denormalized `occupied` field on the parent row belongs
//! to the surrounding screens and is never trusted here.
//!
//! Generation is lazy and idempotent: the first caller to open a segment's
//! detail view creates the slot rows; later calls find them and create
//! nothing. The existence check is client-side, so two sessions opening a
//! brand-new segment at once can still race (an accepted limitation of the
//! hosted API; a backend with a conditional create can close it behind the
//! same `EntityStore` trait).

use crate::entity::{PhysicalDocument, PhysicalLocation};
use crate::store::{EntityFilter, EntityStore, StoreError};
use rand::seq::SliceRandom;
use std::fmt;
use uuid::Uuid;

/// Allocator error type
#[derive(Debug)]
pub enum AllocatorError {
    /// No tenant id resolved for the session; generation must not create
    /// mis-owned rows
    MissingTenant,
    /// Parent segment has not been persisted yet (no id to back-reference)
    UnsavedParent,
    /// Capacity edit rejected: the segment already has generated slot rows
    CapacityLocked { parent: Uuid, slots: usize },
    /// Store failure surfaced by an operation that cannot degrade
    Store(StoreError),
}

impl fmt::Display for AllocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatorError::MissingTenant => {
                write!(f, "No company id resolved for this session; cannot generate addresses")
            }
            AllocatorError::UnsavedParent => {
                write!(f, "Parent location has no id; save the segment before generating addresses")
            }
            AllocatorError::CapacityLocked { parent, slots } => {
                write!(
                    f,
                    "Capacity of segment {parent} is locked: {slots} individual address(es) already generated"
                )
            }
            AllocatorError::Store(e) => {
                write!(f, "Store error: {e}")
            }
        }
    }
}

impl std::error::Error for AllocatorError {}

impl From<StoreError> for AllocatorError {
    fn from(err: StoreError) -> Self {
        AllocatorError::Store(err)
    }
}

/// Occupancy of a single slot, recomputed from the loaded document set.
#[derive(Debug, Clone)]
pub struct SlotOccupancy {
    pub occupied: bool,
    pub document_count: usize,
    pub documents: Vec<PhysicalDocument>,
}

/// Usage summary of a whole segment, recomputed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentUsage {
    pub total_slots: usize,
    pub occupied_slots: usize,
    pub free_slots: usize,
    pub document_count: usize,
}

/// Address allocator and occupancy tracker over an entity store.
///
/// Holds the session tenant id; every generated row is owned by it. The
/// tenant is optional at construction so the caller can surface a
/// configuration error instead of panicking when the session has none.
///
/// # Example
///
/// ```
/// use archivault::allocator::AddressAllocator;
/// use archivault::store::MemoryStore;
/// use uuid::Uuid;
///
/// let store = MemoryStore::new();
/// let allocator = AddressAllocator::new(&store, Some(Uuid::new_v4()));
/// # let _ = allocator;
/// ```
pub struct AddressAllocator<'a, S: EntityStore> {
    store: &'a S,
    company_id: Option<Uuid>,
}

impl<'a, S: EntityStore> AddressAllocator<'a, S> {
    pub fn new(store: &'a S, company_id: Option<Uuid>) -> Self {
        Self { store, company_id }
    }

    /// Fetch the individual slot rows of a parent segment, generating them
    /// on first access.
    ///
    /// If any slot rows already exist for the parent they are returned
    /// unchanged; no reconciliation happens when the declared capacity has
    /// changed since (capacity edits on generated segments are rejected by
    /// [`guard_capacity_edit`](Self::guard_capacity_edit)).
    ///
    /// Generation is best-effort, not atomic: each slot row is created
    /// independently, a failed create is logged and skipped, and the
    /// returned set is whatever succeeded. A failed existence check skips
    /// generation entirely and returns an empty set — regenerating on a
    /// transient read failure could double-create slots.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorError::MissingTenant` when the session has no
    /// company id, and `AllocatorError::UnsavedParent` when the parent has
    /// not been persisted. Store failures never escape this method.
    pub fn generate_or_fetch(
        &self,
        parent: &PhysicalLocation,
    ) -> Result<Vec<PhysicalLocation>, AllocatorError> {
        if self.company_id.is_none() {
            return Err(AllocatorError::MissingTenant);
        }
        let parent_id = parent.id.ok_or(AllocatorError::UnsavedParent)?;

        let existing = match self.store.filter::<PhysicalLocation>(&slot_filter(parent_id)) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to query individual addresses for segment {parent_id}: {e}");
                return Ok(Vec::new());
            }
        };
        if !existing.is_empty() {
            log::debug!(
                "Segment {parent_id} already has {} individual address(es), skipping generation",
                existing.len()
            );
            return Ok(existing);
        }

        let mut created = Vec::with_capacity(parent.capacity as usize);
        for index in 1..=parent.capacity {
            let slot = PhysicalLocation::slot(parent, parent_id, index);
            match self.store.create(&slot) {
                Ok(row) => created.push(row),
                Err(e) => {
                    log::warn!(
                        "Failed to create individual address {} for segment {parent_id}: {e}",
                        slot.full_address
                    );
                }
            }
        }
        log::info!(
            "Generated {}/{} individual address(es) for segment {parent_id}",
            created.len(),
            parent.capacity
        );
        Ok(created)
    }

    /// Load the documents stored at a location, for client-side occupancy
    /// checks. A query failure is logged and resolves to an empty set; the
    /// detail view renders "no documents found" rather than an error state.
    pub fn fetch_documents(&self, location_id: Uuid) -> Vec<PhysicalDocument> {
        let filter = EntityFilter::new().field("physical_location_id", &location_id);
        match self.store.filter::<PhysicalDocument>(&filter) {
            Ok(documents) => documents,
            Err(e) => {
                log::warn!("Failed to load documents for location {location_id}: {e}");
                Vec::new()
            }
        }
    }

    /// Reject a capacity edit when the segment already has generated slots.
    ///
    /// Existing slot rows are neither extended nor pruned on capacity
    /// change, so allowing the edit would silently desynchronize the
    /// declared capacity from the generated set.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorError::CapacityLocked` when slots exist, and
    /// propagates store failures: a guard must not fail open.
    pub fn guard_capacity_edit(&self, parent: &PhysicalLocation) -> Result<(), AllocatorError> {
        let parent_id = parent.id.ok_or(AllocatorError::UnsavedParent)?;
        let slots = self.store.filter::<PhysicalLocation>(&slot_filter(parent_id))?;
        if slots.is_empty() {
            Ok(())
        } else {
            Err(AllocatorError::CapacityLocked { parent: parent_id, slots: slots.len() })
        }
    }
}

fn slot_filter(parent_id: Uuid) -> EntityFilter {
    EntityFilter::new()
        .field("parent_location_id", &parent_id)
        .field("is_individual_address", &true)
}

/// Occupancy of one slot against an already-loaded document set.
///
/// A slot is occupied iff at least one document's denormalized
/// `full_address` strictly equals the slot's. No capacity check happens
/// here: a capacity-1 slot can legitimately report two documents.
pub fn slot_occupancy(slot: &PhysicalLocation, documents: &[PhysicalDocument]) -> SlotOccupancy {
    let documents: Vec<PhysicalDocument> = documents
        .iter()
        .filter(|doc| doc.full_address.as_deref() == Some(slot.full_address.as_str()))
        .cloned()
        .collect();
    SlotOccupancy { occupied: !documents.is_empty(), document_count: documents.len(), documents }
}

/// Usage of a whole segment, recomputed from its slot rows and the loaded
/// document set. This is the consistent-on-read answer to the denormalized
/// `occupied` counter on the parent row.
pub fn segment_usage(
    slots: &[PhysicalLocation],
    documents: &[PhysicalDocument],
) -> SegmentUsage {
    let mut occupied_slots = 0;
    let mut document_count = 0;
    for slot in slots {
        let occupancy = slot_occupancy(slot, documents);
        if occupancy.occupied {
            occupied_slots += 1;
        }
        document_count += occupancy.document_count;
    }
    SegmentUsage {
        total_slots: slots.len(),
        occupied_slots,
        free_slots: slots.len() - occupied_slots,
        document_count,
    }
}

/// Pick a random unoccupied slot, for the document form's "assign me any
/// free location" action. Returns `None` when every slot is occupied.
pub fn random_available_slot<'s>(
    slots: &'s [PhysicalLocation],
    documents: &[PhysicalDocument],
) -> Option<&'s PhysicalLocation> {
    let available: Vec<&PhysicalLocation> = slots
        .iter()
        .filter(|slot| !slot_occupancy(slot, documents).occupied)
        .collect();
    available.choose(&mut rand::thread_rng()).copied()
}

/// Sort slot rows the way the location detail view lists them: shelf level
/// first, then position. Positions compare numerically, so a three-digit
/// position sorts after every two-digit one.
pub fn sort_by_shelf_then_position(slots: &mut [PhysicalLocation]) {
    slots.sort_by(|a, b| {
        a.shelf.cmp(&b.shelf).then_with(|| a.position.index().cmp(&b.position.index()))
    });
}

/// Sort slot rows lexically by full address, the overview screens' order.
pub fn sort_by_full_address(slots: &mut [PhysicalLocation]) {
    slots.sort_by(|a, b| a.full_address.cmp(&b.full_address));
}
