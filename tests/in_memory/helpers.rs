//! Shared test helpers for in-memory integration tests.

use atelier::config::EngineConfig;
use atelier::sync::{SnapshotCallback, SyncHub};
use atelier::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};
use atelier::team::{
    adapters::memory::InMemoryTeamRepository,
    domain::{Identity, Project},
    services::{InvitationService, MembershipService},
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Arc, Mutex, PoisonError};

/// Clock whose time only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock pinned to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Monday morning, used as the start of every scenario.
pub fn start_of_week() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0)
        .single()
        .expect("valid fixed instant")
}

/// Builds an identity, panicking on invalid fixture data.
pub fn person(user_id: &str, email: &str, name: &str) -> Identity {
    Identity::new(user_id, email, name).expect("valid identity fixture")
}

/// Membership service under test.
pub type Membership = MembershipService<InMemoryTeamRepository, ManualClock>;
/// Invitation service under test.
pub type Invitations = InvitationService<InMemoryTeamRepository, ManualClock>;
/// Task service under test.
pub type Tasks = TaskLifecycleService<InMemoryTaskRepository, InMemoryTeamRepository, ManualClock>;

/// Every service wired to one hub and one clock.
pub struct Engine {
    pub clock: Arc<ManualClock>,
    pub membership: Membership,
    pub invitations: Invitations,
    pub tasks: Tasks,
}

impl Engine {
    /// Builds an engine with the given configuration.
    pub fn with_config(config: &EngineConfig) -> Self {
        let clock = Arc::new(ManualClock::at(start_of_week()));
        let hub = SyncHub::new();
        let team_repository = Arc::new(InMemoryTeamRepository::new());
        Self {
            membership: MembershipService::new(
                Arc::clone(&team_repository),
                Arc::clone(&clock),
                hub.clone(),
            )
            .with_limits(config.team),
            invitations: InvitationService::new(
                Arc::clone(&team_repository),
                Arc::clone(&clock),
                hub.clone(),
            )
            .with_limits(config.team),
            tasks: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                team_repository,
                Arc::clone(&clock),
                hub,
            )
            .with_limits(config.tasks),
            clock,
        }
    }

    /// Creates a project, panicking on failure.
    pub async fn project(&self, owner: &Identity, name: &str) -> Project {
        self.membership
            .create_project(owner, name)
            .await
            .expect("project creation succeeds")
    }
}

/// Provides an engine with default limits.
#[fixture]
pub fn engine() -> Engine {
    Engine::with_config(&EngineConfig::default())
}

/// Collects every snapshot delivered to a callback.
pub struct Snapshots<T> {
    seen: Arc<Mutex<Vec<Vec<T>>>>,
}

impl<T> Snapshots<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a callback that appends to this collector.
    pub fn callback(&self) -> SnapshotCallback<T> {
        let seen = Arc::clone(&self.seen);
        Arc::new(move |items: &[T]| {
            seen.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(items.to_vec());
        })
    }

    /// Returns every snapshot received so far.
    pub fn all(&self) -> Vec<Vec<T>> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the sizes of every snapshot received so far.
    pub fn sizes(&self) -> Vec<usize> {
        self.all().iter().map(Vec::len).collect()
    }
}

impl<T> Default for Snapshots<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
