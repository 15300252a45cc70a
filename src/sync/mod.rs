//! Snapshot synchronization for observers of project state.
//!
//! Subscribers register per collection and key (members and tasks per
//! project, invitations per email) and always receive the complete current
//! collection, never a diff: once on subscription, then after every
//! committed mutation affecting their key. Delivery happens before the
//! mutating command returns.

mod hub;
mod locks;
mod subscription;
mod topic;

pub use hub::SyncHub;
pub use locks::KeyedLocks;
pub use subscription::{CollectionKind, Subscription};
pub use topic::{SnapshotCallback, Topic};
