//! Flock Rule Engine
//!
//! Pure rule evaluation for the Flock congregation back office.
//! This library provides functionality for:
//! - Validated, non-overlapping capacity rules over group-size ranges
//! - Deterministic partition planning for group splits
//! - Promotion thresholds for group leaders
//!
//! The engine performs no I/O; persistence-backed orchestration lives in
//! the `flock-groups` crate.
//!
//! # Example
//!
//! ```
//! use flock_engine::{plan_partition, RuleTable, SplitRule};
//!
//! let table = RuleTable::new(vec![SplitRule {
//!     min_size: 8,
//!     max_size: 12,
//!     split_into: 3,
//!     designation_level: 1,
//! }])?;
//!
//! if let Some(rule) = table.lookup(10) {
//!     let plan = plan_partition(10, rule.split_into)?;
//!     assert_eq!(plan.sizes(), &[4, 4, 2]);
//! }
//! # Ok::<(), flock_engine::EngineError>(())
//! ```

pub mod error;
pub mod planner;
pub mod promotion;
pub mod rules;

// Re-export commonly used items
pub use error::{EngineError, Result};
pub use planner::{plan_partition, SplitPlan};
pub use promotion::PromotionRule;
pub use rules::{RuleTable, SplitRule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
