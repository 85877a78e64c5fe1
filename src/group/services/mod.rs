//! Application services for group membership management.

mod invariant;
mod lifecycle;
mod query;

pub use invariant::{GroupInvariantEngine, GroupOpError, GroupOpResult, GroupPolicy};
pub use lifecycle::{GroupLifecycleService, JoinOutcome, LifecycleError, LifecycleResult};
pub use query::{GroupView, MemberRecord, MembershipQueryService, QueryError, QueryResult};
