//! Integration tests for the address allocator end-to-end flow
//!
//! These tests drive the allocator the way the location detail screen does:
//! persist a parent segment, open it (generate-or-fetch), load documents,
//! and read occupancy, usage bands, and destruction status off the results.

use archivault::{
    destruction_status, random_available_slot, segment_usage, slot_occupancy, usage_band,
    AddressAllocator, AllocatorError, DestructionStatus, EntityFilter, EntityRecord, EntityStore,
    MemoryStore, PhysicalDocument, PhysicalLocation, Position, Shelf, Side, StoreError,
    StreetCode, UsageBand,
};
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use uuid::Uuid;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn persisted_segment(store: &MemoryStore, capacity: u32) -> PhysicalLocation {
    let segment = PhysicalLocation::segment(
        Uuid::new_v4(),
        StreetCode::new("JA1").expect("valid street"),
        Shelf::P2,
        Side::Aee,
        Position::from_index(1),
        capacity,
    );
    store.create(&segment).expect("persist parent segment")
}

fn document_at(company_id: Uuid, address: &str) -> PhysicalDocument {
    let mut doc = PhysicalDocument::new(
        company_id,
        "Contrato de prestação",
        NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
    );
    doc.full_address = Some(address.to_string());
    doc
}

#[test]
fn test_generation_yields_exact_slot_set() {
    init_logging();
    let store = MemoryStore::new();
    let parent = persisted_segment(&store, 3);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));

    let slots = allocator.generate_or_fetch(&parent).expect("generate");
    let addresses: Vec<&str> = slots.iter().map(|s| s.full_address.as_str()).collect();
    assert_eq!(addresses, vec!["JA1P2AEE01", "JA1P2AEE02", "JA1P2AEE03"]);

    for slot in &slots {
        assert!(slot.id.is_some(), "store assigns an id on create");
        assert_eq!(slot.parent_location_id, parent.id);
        assert!(slot.is_individual_address);
        assert_eq!(slot.capacity, 1);
    }
}

#[test]
fn test_reopening_the_detail_view_creates_nothing() {
    init_logging();
    let store = MemoryStore::new();
    let parent = persisted_segment(&store, 5);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));

    allocator.generate_or_fetch(&parent).expect("first open");
    let rows_after_first = store.collection_len("physical_locations");
    let second = allocator.generate_or_fetch(&parent).expect("second open");

    assert_eq!(second.len(), 5);
    assert_eq!(store.collection_len("physical_locations"), rows_after_first);
}

#[test]
fn test_one_document_marks_exactly_one_slot() {
    init_logging();
    let store = MemoryStore::new();
    let parent = persisted_segment(&store, 3);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));
    let slots = allocator.generate_or_fetch(&parent).expect("generate");

    store
        .create(&document_at(parent.company_id, "JA1P2AEE02"))
        .expect("persist document");
    let documents: Vec<PhysicalDocument> = store.list().expect("load documents");

    let flags: Vec<bool> =
        slots.iter().map(|slot| slot_occupancy(slot, &documents).occupied).collect();
    assert_eq!(flags, vec![false, true, false]);

    let usage = segment_usage(&slots, &documents);
    assert_eq!(usage.occupied_slots, 1);
    assert_eq!(usage.free_slots, 2);
    assert_eq!(usage.document_count, 1);

    // The map view bands the same numbers against the 100-slot denominator
    // floor: 1 occupied is 1%, green.
    assert_eq!(usage_band(usage.occupied_slots as u32, usage.total_slots as u32), UsageBand::Low);
}

#[test]
fn test_random_assignment_only_picks_free_slots() {
    init_logging();
    let store = MemoryStore::new();
    let parent = persisted_segment(&store, 3);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));
    let slots = allocator.generate_or_fetch(&parent).expect("generate");

    let documents = vec![
        document_at(parent.company_id, "JA1P2AEE01"),
        document_at(parent.company_id, "JA1P2AEE02"),
    ];
    let slot = random_available_slot(&slots, &documents).expect("one free slot");
    assert_eq!(slot.full_address, "JA1P2AEE03");

    // Assigning keeps the id reference and denormalized address in step.
    let mut doc = document_at(parent.company_id, "unassigned");
    doc.assign_to(slot);
    assert_eq!(doc.physical_location_id, slot.id);
    assert_eq!(doc.full_address.as_deref(), Some("JA1P2AEE03"));
}

#[test]
fn test_missing_tenant_aborts_before_any_create() {
    init_logging();
    let store = MemoryStore::new();
    let parent = persisted_segment(&store, 4);
    let allocator = AddressAllocator::new(&store, None);

    let err = allocator.generate_or_fetch(&parent).expect_err("config error");
    assert!(matches!(err, AllocatorError::MissingTenant));
    // Only the parent row exists; no partial generation.
    assert_eq!(store.collection_len("physical_locations"), 1);
}

#[test]
fn test_destruction_status_over_generated_documents() {
    init_logging();
    let company = Uuid::new_v4();
    let today = NaiveDate::from_ymd_opt(2025, 8, 30).expect("valid date");

    let mut permanent = document_at(company, "JA1P2AEE01");
    permanent.is_permanent = true;
    permanent.destruction_date = Some("garbage".to_string());
    assert_eq!(destruction_status(&permanent, today), DestructionStatus::Permanent);

    let mut due_yesterday = document_at(company, "JA1P2AEE02");
    due_yesterday.destruction_date = Some("2025-08-29".to_string());
    assert_eq!(destruction_status(&due_yesterday, today), DestructionStatus::Overdue);

    let mut due_today = document_at(company, "JA1P2AEE03");
    due_today.destruction_date = Some("2025-08-30".to_string());
    assert_eq!(destruction_status(&due_today, today), DestructionStatus::Upcoming);
}

/// Store wrapper that rejects the create of one specific slot address,
/// simulating a backend failure mid-generation.
struct FailingSlotStore {
    inner: MemoryStore,
    fail_address: &'static str,
}

impl EntityStore for FailingSlotStore {
    fn list<R: EntityRecord>(&self) -> Result<Vec<R>, StoreError> {
        self.inner.list()
    }

    fn filter<R: EntityRecord>(&self, filter: &EntityFilter) -> Result<Vec<R>, StoreError> {
        self.inner.filter(filter)
    }

    fn create<R: EntityRecord>(&self, record: &R) -> Result<R, StoreError> {
        let value = serde_json::to_value(record)?;
        if value.get("full_address").and_then(JsonValue::as_str) == Some(self.fail_address) {
            return Err(StoreError::Backend("injected create failure".to_string()));
        }
        self.inner.create(record)
    }

    fn update<R: EntityRecord>(&self, id: Uuid, patch: &JsonValue) -> Result<(), StoreError> {
        self.inner.update::<R>(id, patch)
    }

    fn delete<R: EntityRecord>(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete::<R>(id)
    }
}

/// Store wrapper that rejects every filter call, simulating the hosted API
/// failing reads while writes would still go through.
struct FailingFilterStore {
    inner: MemoryStore,
}

impl EntityStore for FailingFilterStore {
    fn list<R: EntityRecord>(&self) -> Result<Vec<R>, StoreError> {
        self.inner.list()
    }

    fn filter<R: EntityRecord>(&self, _filter: &EntityFilter) -> Result<Vec<R>, StoreError> {
        Err(StoreError::Backend("injected filter failure".to_string()))
    }

    fn create<R: EntityRecord>(&self, record: &R) -> Result<R, StoreError> {
        self.inner.create(record)
    }

    fn update<R: EntityRecord>(&self, id: Uuid, patch: &JsonValue) -> Result<(), StoreError> {
        self.inner.update::<R>(id, patch)
    }

    fn delete<R: EntityRecord>(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete::<R>(id)
    }
}

#[test]
fn test_failed_existence_check_skips_generation_entirely() {
    init_logging();
    let store = FailingFilterStore { inner: MemoryStore::new() };
    let parent = persisted_segment(&store.inner, 3);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));

    let slots = allocator.generate_or_fetch(&parent).expect("read failure degrades, never throws");
    assert!(slots.is_empty());
    // Only the parent row survives: no slot may be created while the
    // existing set is unknowable, or a retry would double-generate.
    assert_eq!(store.inner.collection_len("physical_locations"), 1);
}

#[test]
fn test_document_load_failure_resolves_to_empty_set() {
    init_logging();
    let store = FailingFilterStore { inner: MemoryStore::new() };
    let company = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let mut doc = document_at(company, "JA1P2AEE01");
    doc.physical_location_id = Some(slot_id);
    store.inner.create(&doc).expect("persist document");

    let allocator = AddressAllocator::new(&store, Some(company));
    // The detail view renders "no documents found", not an error state.
    assert!(allocator.fetch_documents(slot_id).is_empty());
}

#[test]
fn test_partial_failure_skips_the_failed_slot_only() {
    init_logging();
    let store = FailingSlotStore { inner: MemoryStore::new(), fail_address: "JA1P2AEE02" };
    let parent = persisted_segment(&store.inner, 3);
    let allocator = AddressAllocator::new(&store, Some(parent.company_id));

    let slots = allocator.generate_or_fetch(&parent).expect("generation never throws");
    let addresses: Vec<&str> = slots.iter().map(|s| s.full_address.as_str()).collect();
    assert_eq!(addresses, vec!["JA1P2AEE01", "JA1P2AEE03"]);

    // Parent row + the two slot rows that persisted.
    assert_eq!(store.inner.collection_len("physical_locations"), 3);
}
