//! Booking store: the state container shared by the query and transition
//! services.
//!
//! It holds the list cache, the single-booking detail slot, and the snapshots
//! taken before optimistic updates. Writes follow a two-phase pattern:
//! [`BookingStore::apply_optimistic`] publishes a tentative value right away,
//! then either [`BookingStore::commit`] replaces it with the authoritative
//! booking or [`BookingStore::rollback`] puts back the truth reloaded from
//! storage (or the saved snapshot when no truth is available).
//!
//! Observers subscribe to [`BookingStoreEvent`]s. Locks are held only for the
//! duration of a synchronous update, never across an `.await`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tracing::debug;

use crate::backend::domain::booking_list_cache::BookingListCache;
use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage};
use crate::backend::domain::models::booking::{Booking, BookingId, BookingStatus};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum BookingStoreEvent {
    ListReplaced { count: usize },
    DetailLoaded { booking_id: BookingId },
    Optimistic { booking_id: BookingId, status: BookingStatus },
    Committed { booking_id: BookingId, status: BookingStatus },
    RolledBack { booking_id: BookingId, status: Option<BookingStatus> },
}

pub trait BookingStore: Send + Sync {
    /// Latest known value of a booking, looking at the detail slot first.
    fn current(&self, id: BookingId) -> Option<Booking>;

    fn detail(&self) -> Option<Booking>;

    fn list(&self) -> Vec<Booking>;

    fn list_query(&self) -> Option<BookingListQuery>;

    fn replace_list(&self, query: BookingListQuery, page: BookingPage);

    fn set_detail(&self, booking: Booking);

    /// Publish a tentative value, remembering what it replaced.
    fn apply_optimistic(&self, tentative: Booking);

    /// Replace a tentative value with the authoritative booking.
    fn commit(&self, authoritative: Booking);

    /// Undo a tentative value. `truth` wins over the saved snapshot.
    /// Returns whatever value the store now holds for `id`.
    fn rollback(&self, id: BookingId, truth: Option<Booking>) -> Option<Booking>;

    fn subscribe(&self) -> broadcast::Receiver<BookingStoreEvent>;
}

#[derive(Debug, Default)]
struct StoreState {
    list: BookingListCache,
    detail: Option<Booking>,
    snapshots: HashMap<BookingId, Booking>,
}

impl StoreState {
    fn current(&self, id: BookingId) -> Option<&Booking> {
        self.detail
            .as_ref()
            .filter(|b| b.id == id)
            .or_else(|| self.list.get(id))
    }

    /// Write `booking` into the list entry and make it the detail.
    fn write_through(&mut self, booking: &Booking) {
        self.list.merge(booking);
        self.detail = Some(booking.clone());
    }
}

pub struct InMemoryBookingStore {
    state: RwLock<StoreState>,
    events: broadcast::Sender<BookingStoreEvent>,
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(StoreState::default()),
            events,
        }
    }

    /// Number of bookings with an unresolved optimistic update
    pub fn pending_count(&self) -> usize {
        self.read().snapshots.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: BookingStoreEvent) {
        debug!("Booking store event: {:?}", event);
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl BookingStore for InMemoryBookingStore {
    fn current(&self, id: BookingId) -> Option<Booking> {
        self.read().current(id).cloned()
    }

    fn detail(&self) -> Option<Booking> {
        self.read().detail.clone()
    }

    fn list(&self) -> Vec<Booking> {
        self.read().list.bookings().to_vec()
    }

    fn list_query(&self) -> Option<BookingListQuery> {
        self.read().list.query().cloned()
    }

    fn replace_list(&self, query: BookingListQuery, page: BookingPage) {
        let count = page.bookings.len();
        self.write().list.replace(query, page);
        self.emit(BookingStoreEvent::ListReplaced { count });
    }

    fn set_detail(&self, booking: Booking) {
        let booking_id = booking.id;
        self.write().detail = Some(booking);
        self.emit(BookingStoreEvent::DetailLoaded { booking_id });
    }

    fn apply_optimistic(&self, tentative: Booking) {
        let event = BookingStoreEvent::Optimistic {
            booking_id: tentative.id,
            status: tentative.status,
        };
        {
            let mut state = self.write();
            if let Some(previous) = state.current(tentative.id).cloned() {
                state.snapshots.entry(tentative.id).or_insert(previous);
            }
            state.write_through(&tentative);
        }
        self.emit(event);
    }

    fn commit(&self, authoritative: Booking) {
        let event = BookingStoreEvent::Committed {
            booking_id: authoritative.id,
            status: authoritative.status,
        };
        {
            let mut state = self.write();
            state.snapshots.remove(&authoritative.id);
            state.write_through(&authoritative);
        }
        self.emit(event);
    }

    fn rollback(&self, id: BookingId, truth: Option<Booking>) -> Option<Booking> {
        let restored = {
            let mut state = self.write();
            let snapshot = state.snapshots.remove(&id);
            let restored = truth.or(snapshot);
            if let Some(booking) = &restored {
                state.write_through(booking);
            }
            restored
        };
        self.emit(BookingStoreEvent::RolledBack {
            booking_id: id,
            status: restored.as_ref().map(|b| b.status),
        });
        restored
    }

    fn subscribe(&self) -> broadcast::Receiver<BookingStoreEvent> {
        self.events.subscribe()
    }
}
