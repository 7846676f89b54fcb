//! # Archivault
//!
//! Physical-archive addressing and occupancy data layer for multi-tenant
//! GED/CDOC document management.
//!
//! Sits between application event handlers and a hosted entity API
//! (abstracted by [`store::EntityStore`]): generates the individual slot
//! addresses of a shelf segment lazily and idempotently, recomputes slot
//! and segment occupancy from the loaded document set, bands location
//! usage for the warehouse map, and derives document destruction status at
//! render time.

pub mod address;
pub mod allocator;
pub mod cache;
pub mod config;
pub mod entity;
pub mod status;
pub mod store;
pub mod usage;

pub use address::{AddressError, Position, Shelf, Side, StreetCode};
pub use allocator::{
    random_available_slot, segment_usage, slot_occupancy, AddressAllocator, AllocatorError,
    SegmentUsage, SlotOccupancy,
};
pub use cache::ResponseCache;
pub use config::ArchiveConfig;
pub use entity::{PhysicalDocument, PhysicalLocation};
pub use status::{destruction_status, destruction_status_today, DestructionStatus};
pub use store::{EntityFilter, EntityRecord, EntityStore, MemoryStore, StoreError};
pub use usage::{usage_band, usage_percentage, UsageBand};
