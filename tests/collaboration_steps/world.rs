//! Shared world state for collaboration and task progress BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use atelier::ErrorKind;
use atelier::sync::SyncHub;
use atelier::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{SubtaskId, Task},
    services::TaskLifecycleService,
};
use atelier::team::{
    adapters::memory::InMemoryTeamRepository,
    domain::{Identity, Invitation, Member, Project},
    services::{InvitationService, MembershipService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Membership service used by the BDD world.
pub type TestMembershipService = MembershipService<InMemoryTeamRepository, DefaultClock>;
/// Invitation service used by the BDD world.
pub type TestInvitationService = InvitationService<InMemoryTeamRepository, DefaultClock>;
/// Task service used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryTeamRepository, DefaultClock>;

/// Scenario world for collaboration behaviour tests.
pub struct CollaborationWorld {
    /// Membership service under test.
    pub membership: TestMembershipService,
    /// Invitation service under test.
    pub invitations: TestInvitationService,
    /// Task service under test.
    pub tasks: TestTaskService,
    /// Identities created so far, keyed by scenario name.
    pub people: HashMap<String, Identity>,
    /// Project the scenario works in.
    pub project: Option<Project>,
    /// Most recently issued invitation.
    pub invitation: Option<Invitation>,
    /// Task the scenario works on.
    pub task: Option<Task>,
    /// Subtasks of the task, in creation order.
    pub subtasks: Vec<SubtaskId>,
    /// Failure kind of the last rejected request.
    pub last_failure: Option<ErrorKind>,
}

impl CollaborationWorld {
    /// Creates a world with services sharing one store and one hub.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let hub = SyncHub::new();
        let team_repository = Arc::new(InMemoryTeamRepository::new());
        Self {
            membership: MembershipService::new(
                Arc::clone(&team_repository),
                Arc::clone(&clock),
                hub.clone(),
            ),
            invitations: InvitationService::new(
                Arc::clone(&team_repository),
                Arc::clone(&clock),
                hub.clone(),
            ),
            tasks: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                team_repository,
                clock,
                hub,
            ),
            people: HashMap::new(),
            project: None,
            invitation: None,
            task: None,
            subtasks: Vec::new(),
            last_failure: None,
        }
    }

    /// Returns the identity registered under `name`, creating it on first
    /// use with a `studio.example` address.
    pub fn person(&mut self, name: &str) -> Result<Identity, eyre::Report> {
        if let Some(identity) = self.people.get(name) {
            return Ok(identity.clone());
        }
        let identity = Identity::new(name, format!("{name}@studio.example"), name)?;
        self.people.insert(name.to_owned(), identity.clone());
        Ok(identity)
    }

    /// Returns the scenario project.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the scenario task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Finds the active membership of `name` in the scenario project.
    pub fn active_member(&mut self, name: &str) -> Result<Option<Member>, eyre::Report> {
        let identity = self.person(name)?;
        let project_id = self.project()?.id();
        let members = run_async(self.membership.list_active(project_id))?;
        Ok(members
            .into_iter()
            .find(|member| member.user_id() == identity.user_id()))
    }

    /// Stores the outcome of a request that may be rejected.
    pub fn record<T, E>(&mut self, result: Result<T, E>, kind: impl Fn(&E) -> ErrorKind) -> Option<T> {
        self.last_failure = result.as_ref().err().map(kind);
        result.ok()
    }
}

impl Default for CollaborationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CollaborationWorld {
    CollaborationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
