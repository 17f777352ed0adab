//! Flock group management
//!
//! Postgres-backed orchestration for the Flock congregation back office:
//! cell-group capacity evaluation and splitting, membership changes that
//! trigger it, and leader promotion. The rule logic itself is pure and
//! lives in `flock-engine`; this crate owns the persistence boundary and
//! the transactional structural mutations.

pub mod config;
pub mod db;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod promotion;
pub mod roster;
pub mod splitter;
pub mod store;

pub use config::GroupsConfig;
pub use db::{create_pool, run_migrations};
pub use error::GroupsError;
pub use evaluator::{evaluate_group_for_split, SplitOutcome};
pub use models::{CellGroup, Member, Membership, PromotionRuleRecord, SplitRuleRecord};
pub use promotion::{evaluate_leader_for_promotion, PromotionOutcome};
pub use splitter::{execute_split, SplitReport};
