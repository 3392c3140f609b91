use serde::{Deserialize, Serialize};

use crate::FULL_NAME_CHAR_LIMIT;

/// Counts gathered while a service section is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub rejections: usize,
    pub criteria: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub oversized: usize,
}

impl ServiceStats {
    pub fn entries(&self) -> usize {
        self.rejections + self.criteria
    }

    pub fn merge(&mut self, other: &ServiceStats) {
        self.rejections += other.rejections;
        self.criteria += other.criteria;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.oversized += other.oversized;
    }
}

/// Length in characters, the unit the database column limit is expressed in.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn exceeds_full_name_limit(value: &str) -> bool {
    char_len(value) >= FULL_NAME_CHAR_LIMIT
}
