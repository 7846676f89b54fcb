//! Entity Module
//!
//! The two archive entity types this layer owns: `PhysicalLocation`
//! (a shelf segment, or an individual slot when flagged) and
//! `PhysicalDocument` (a stored document referencing a slot).
//!
//! `full_address` is derived state: always the concatenation of
//! street + shelf + side + position. Use the constructors (or
//! `recompute_full_address`) so it never drifts from the components; the
//! editing screens keep the component fields read-only after creation for
//! the same reason.

use crate::address::{full_address, Position, Shelf, Side, StreetCode};
use crate::store::EntityRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical storage location: a shelf segment with a declared capacity,
/// or one generated slot inside a segment (`is_individual_address = true`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalLocation {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Owning tenant
    pub company_id: Uuid,
    pub street: StreetCode,
    pub shelf: Shelf,
    pub side: Side,
    pub position: Position,
    /// Derived: `street + shelf + side + position`, no separators
    pub full_address: String,
    /// Total slots the segment can hold; always 1 on slot rows
    pub capacity: u32,
    /// Denormalized count maintained by the surrounding screens; this crate
    /// recomputes occupancy from the document set instead of trusting it
    pub occupied: u32,
    pub is_individual_address: bool,
    #[serde(default)]
    pub parent_location_id: Option<Uuid>,
    pub is_active: bool,
}

impl PhysicalLocation {
    /// Build a parent shelf segment. `occupied` starts at zero and
    /// `full_address` is computed from the components.
    pub fn segment(
        company_id: Uuid,
        street: StreetCode,
        shelf: Shelf,
        side: Side,
        position: Position,
        capacity: u32,
    ) -> Self {
        let address = full_address(&street, shelf, side, &position);
        PhysicalLocation {
            id: None,
            company_id,
            street,
            shelf,
            side,
            position,
            full_address: address,
            capacity,
            occupied: 0,
            is_individual_address: false,
            parent_location_id: None,
            is_active: true,
        }
    }

    /// Build the individual slot row for the 1-based `index` inside a parent
    /// segment. Slot rows have capacity 1 and carry the parent back-reference.
    pub fn slot(parent: &PhysicalLocation, parent_id: Uuid, index: u32) -> Self {
        let position = Position::from_index(index);
        let address = full_address(&parent.street, parent.shelf, parent.side, &position);
        PhysicalLocation {
            id: None,
            company_id: parent.company_id,
            street: parent.street.clone(),
            shelf: parent.shelf,
            side: parent.side,
            position,
            full_address: address,
            capacity: 1,
            occupied: 0,
            is_individual_address: true,
            parent_location_id: Some(parent_id),
            is_active: true,
        }
    }

    /// Recompute `full_address` from the current components.
    pub fn recompute_full_address(&mut self) {
        self.full_address = full_address(&self.street, self.shelf, self.side, &self.position);
    }
}

impl EntityRecord for PhysicalLocation {
    const COLLECTION: &'static str = "physical_locations";

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

/// A physically archived document.
///
/// `destruction_date` stays a raw string as received from the backend;
/// status derivation parses it tolerantly and maps failures to an explicit
/// invalid band (see [`crate::status`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalDocument {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Owning tenant
    pub company_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub physical_location_id: Option<Uuid>,
    /// Denormalized slot address; occupancy matches on strict equality
    #[serde(default)]
    pub full_address: Option<String>,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub destruction_date: Option<String>,
    pub is_permanent: bool,
    pub status: String,
}

impl PhysicalDocument {
    pub fn new(company_id: Uuid, title: &str, entry_date: NaiveDate) -> Self {
        PhysicalDocument {
            id: None,
            company_id,
            title: title.to_string(),
            physical_location_id: None,
            full_address: None,
            entry_date,
            destruction_date: None,
            is_permanent: false,
            status: "Arquivado".to_string(),
        }
    }

    /// Assign this document to a slot, keeping the id reference and the
    /// denormalized address in step.
    pub fn assign_to(&mut self, slot: &PhysicalLocation) {
        self.physical_location_id = slot.id;
        self.full_address = Some(slot.full_address.clone());
    }
}

impl EntityRecord for PhysicalDocument {
    const COLLECTION: &'static str = "physical_documents";

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
