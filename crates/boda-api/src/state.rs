//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::store::KeyValueStore;
use boda_core::submission::FormSubmitter;
use boda_forms::settings::{MusicSettings, PrebodaSettings};
use boda_quiz::application::flow::QuizFlow;
use boda_quiz::settings::QuizSettings;
use boda_rsvp::application::controller::RsvpController;
use boda_rsvp::settings::RsvpSettings;
use boda_ui::photos::Photo;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::WeddingConfig;

/// How long a flow may sit untouched before it is dropped.
pub const DEFAULT_FLOW_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

type SharedFlow<T> = Arc<tokio::sync::Mutex<T>>;

struct Entry<T> {
    flow: SharedFlow<T>,
    touched: DateTime<Utc>,
}

/// Live flow instances of one kind, keyed by id.
///
/// Each instance sits behind its own async mutex; the map lock is only
/// held to look an instance up. A visitor who leaves never says so, so
/// flows untouched for longer than the idle TTL are dropped on the next
/// insert. Dropping a quiz flow aborts its timers.
pub struct FlowRegistry<T> {
    flows: Arc<Mutex<HashMap<Uuid, Entry<T>>>>,
    clock: Arc<dyn Clock>,
    idle_ttl: TimeDelta,
}

impl<T> Clone for FlowRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            flows: Arc::clone(&self.flows),
            clock: Arc::clone(&self.clock),
            idle_ttl: self.idle_ttl,
        }
    }
}

impl<T> FlowRegistry<T> {
    /// Creates an empty registry that drops flows idle for `idle_ttl`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, idle_ttl: Duration) -> Self {
        Self {
            flows: Arc::new(Mutex::new(HashMap::new())),
            clock,
            idle_ttl: TimeDelta::from_std(idle_ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Registers `flow` under a fresh id, evicting idle flows first.
    pub fn insert(&self, flow: T) -> (Uuid, SharedFlow<T>) {
        self.evict_idle();
        let id = Uuid::new_v4();
        let flow = Arc::new(tokio::sync::Mutex::new(flow));
        self.entries().insert(
            id,
            Entry {
                flow: Arc::clone(&flow),
                touched: self.clock.now(),
            },
        );
        (id, flow)
    }

    /// The flow registered under `id`; counts as activity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FlowNotFound` if there is none.
    pub fn get(&self, id: Uuid) -> Result<SharedFlow<T>, DomainError> {
        let now = self.clock.now();
        let mut entries = self.entries();
        let entry = entries.get_mut(&id).ok_or(DomainError::FlowNotFound(id))?;
        entry.touched = now;
        Ok(Arc::clone(&entry.flow))
    }

    /// Unregisters the flow under `id` and hands it back.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FlowNotFound` if there is none.
    pub fn remove(&self, id: Uuid) -> Result<SharedFlow<T>, DomainError> {
        self.entries()
            .remove(&id)
            .map(|entry| entry.flow)
            .ok_or(DomainError::FlowNotFound(id))
    }

    /// Drops every flow idle for longer than the TTL; returns how many.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let evicted: Vec<Entry<T>> = {
            let mut entries = self.entries();
            let stale: Vec<Uuid> = entries
                .iter()
                .filter(|(_, entry)| now - entry.touched > self.idle_ttl)
                .map(|(id, _)| *id)
                .collect();
            stale.iter().filter_map(|id| entries.remove(id)).collect()
        };
        if !evicted.is_empty() {
            info!(count = evicted.len(), "idle flows evicted");
        }
        evicted.len()
    }

    /// Number of live flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no flow is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Entry<T>>> {
        self.flows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for FlowRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowRegistry")
            .field("live", &self.len())
            .field("idle_ttl", &self.idle_ttl)
            .finish_non_exhaustive()
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// RSVP settings.
    pub rsvp: Arc<RsvpSettings>,
    /// Quiz settings.
    pub quiz: Arc<QuizSettings>,
    /// Pre-wedding form settings.
    pub preboda: Arc<PrebodaSettings>,
    /// Music form settings.
    pub music: Arc<MusicSettings>,
    /// Gallery photos.
    pub gallery: Arc<Vec<Photo>>,
    /// Outbound form submission.
    pub submitter: Arc<dyn FormSubmitter>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Persisted flags shared by every visitor, namespaced per visitor.
    pub local_store: Arc<dyn KeyValueStore>,
    /// Live RSVP flows.
    pub rsvp_flows: FlowRegistry<RsvpController>,
    /// Live quiz flows.
    pub quiz_flows: FlowRegistry<QuizFlow>,
}

impl AppState {
    /// Create new application state; flows expire after
    /// [`DEFAULT_FLOW_IDLE_TTL`] of inactivity.
    #[must_use]
    pub fn new(
        wedding: WeddingConfig,
        submitter: Arc<dyn FormSubmitter>,
        clock: Arc<dyn Clock>,
        local_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            rsvp: Arc::new(wedding.rsvp),
            quiz: Arc::new(wedding.quiz),
            preboda: Arc::new(wedding.preboda),
            music: Arc::new(wedding.music),
            gallery: Arc::new(wedding.gallery),
            submitter,
            rsvp_flows: FlowRegistry::new(Arc::clone(&clock), DEFAULT_FLOW_IDLE_TTL),
            quiz_flows: FlowRegistry::new(Arc::clone(&clock), DEFAULT_FLOW_IDLE_TTL),
            clock,
            local_store,
        }
    }

    /// Drops idle RSVP and quiz flows; returns how many went.
    pub fn evict_idle_flows(&self) -> usize {
        self.rsvp_flows.evict_idle() + self.quiz_flows.evict_idle()
    }

    /// Replaces the idle TTL of both flow registries.
    ///
    /// Call before any flow is created; live flows are discarded.
    #[must_use]
    pub fn with_flow_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.rsvp_flows = FlowRegistry::new(Arc::clone(&self.clock), idle_ttl);
        self.quiz_flows = FlowRegistry::new(Arc::clone(&self.clock), idle_ttl);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("rsvp_flows", &self.rsvp_flows)
            .field("quiz_flows", &self.quiz_flows)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use boda_test_support::ManualClock;
    use chrono::TimeZone;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_registry_insert_get_remove() {
        // Arrange
        let registry: FlowRegistry<u32> = FlowRegistry::new(clock(), DEFAULT_FLOW_IDLE_TTL);

        // Act
        let (id, _) = registry.insert(7);
        let found = registry.get(id).is_ok();
        let removed = registry.remove(id).is_ok();

        // Assert
        assert!(found);
        assert!(removed);
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get(id),
            Err(DomainError::FlowNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_registry_clones_share_flows() {
        let registry: FlowRegistry<u32> = FlowRegistry::new(clock(), DEFAULT_FLOW_IDLE_TTL);
        let clone = registry.clone();

        let (id, _) = registry.insert(1);

        assert!(clone.get(id).is_ok());
        assert_eq!(clone.len(), 1);
    }

    #[test]
    fn test_insert_evicts_flows_idle_past_ttl() {
        // Arrange
        let clock = clock();
        let registry: FlowRegistry<u32> =
            FlowRegistry::new(Arc::clone(&clock) as Arc<dyn Clock>, Duration::from_secs(60));
        let (abandoned, _) = registry.insert(1);
        let (active, _) = registry.insert(2);
        clock.advance(TimeDelta::seconds(45));
        registry.get(active).unwrap();
        clock.advance(TimeDelta::seconds(30));

        // Act
        let (fresh, _) = registry.insert(3);

        // Assert
        assert!(matches!(
            registry.get(abandoned),
            Err(DomainError::FlowNotFound(_))
        ));
        assert!(registry.get(active).is_ok());
        assert!(registry.get(fresh).is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_flow_at_exactly_ttl_is_kept() {
        let clock = clock();
        let registry: FlowRegistry<u32> =
            FlowRegistry::new(Arc::clone(&clock) as Arc<dyn Clock>, Duration::from_secs(60));
        registry.insert(1);
        clock.advance(TimeDelta::seconds(60));

        assert_eq!(registry.evict_idle(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_evicted_quiz_flow_stops_its_driver() {
        // Arrange
        let clock = clock();
        let state = AppState::new(
            WeddingConfig::default(),
            Arc::new(boda_test_support::RecordingSubmitter::new(
                boda_core::submission::SubmitResponse::ok(),
            )),
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::new(boda_core::store::MemoryStore::new()),
        );
        let flow = QuizFlow::new(
            Arc::clone(&state.quiz),
            Arc::clone(&state.local_store),
            Arc::clone(&state.submitter),
            Arc::clone(&state.clock),
        )
        .unwrap();
        let (id, shared) = state.quiz_flows.insert(flow);
        shared.lock().await.start().unwrap();
        let weak = Arc::downgrade(&shared);
        drop(shared);
        clock.advance(TimeDelta::minutes(31));

        // Act
        let evicted = state.quiz_flows.evict_idle();

        // Assert
        assert_eq!(evicted, 1);
        assert!(weak.upgrade().is_none());
        assert!(matches!(
            state.quiz_flows.get(id),
            Err(DomainError::FlowNotFound(_))
        ));
    }
}
