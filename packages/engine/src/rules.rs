//! Capacity rules and the validated rule table.
//!
//! A [`SplitRule`] says: groups whose membership count falls in the
//! inclusive range `[min_size, max_size]` must be split into `split_into`
//! new groups. Administrators manage the rules; the engine only reads them.
//!
//! [`RuleTable`] is the load-time validated form: ranges are checked for
//! well-formedness and pairwise non-overlap, then kept sorted by
//! `min_size`. A configuration that relies on insertion order to
//! disambiguate overlapping ranges is rejected outright.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A single capacity rule over an inclusive size range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRule {
    /// Lower bound of the size range (inclusive).
    pub min_size: u32,
    /// Upper bound of the size range (inclusive).
    pub max_size: u32,
    /// Number of groups the old group is partitioned into.
    pub split_into: u32,
    /// Designation level associated with groups produced by this rule.
    pub designation_level: u32,
}

impl SplitRule {
    /// Whether `size` falls inside this rule's range.
    pub fn contains(&self, size: u32) -> bool {
        size >= self.min_size && size <= self.max_size
    }

    fn validate(&self) -> Result<()> {
        if self.min_size > self.max_size {
            return Err(EngineError::InvalidRange {
                min_size: self.min_size,
                max_size: self.max_size,
            });
        }
        if self.split_into < 1 {
            return Err(EngineError::InvalidSplitCount(self.split_into));
        }
        Ok(())
    }
}

/// Ordered, non-overlapping set of capacity rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<SplitRule>,
}

impl RuleTable {
    /// Build a table from administrator-managed rules.
    ///
    /// Validates each rule and rejects any pair of overlapping ranges, so
    /// that for any size at most one rule applies.
    pub fn new(mut rules: Vec<SplitRule>) -> Result<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        rules.sort_by_key(|r| r.min_size);
        for pair in rules.windows(2) {
            if pair[1].min_size <= pair[0].max_size {
                return Err(EngineError::OverlappingRanges {
                    first_min: pair[0].min_size,
                    first_max: pair[0].max_size,
                    second_min: pair[1].min_size,
                    second_max: pair[1].max_size,
                });
            }
        }
        Ok(Self { rules })
    }

    /// Find the rule whose range contains `size`.
    ///
    /// Absence of a match is a valid terminal state meaning "no action",
    /// not an error.
    pub fn lookup(&self, size: u32) -> Option<&SplitRule> {
        let rule = self.rules.iter().find(|r| r.contains(size));
        tracing::debug!(size, matched = rule.is_some(), "rule lookup");
        rule
    }

    /// Rules in ascending range order.
    pub fn rules(&self) -> &[SplitRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
