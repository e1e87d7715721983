//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use strata_codec::Value;
use strata_core::{CriteriaMap, CriteriaQuery};

/// Strategy for generating timestamps between 1970 and 2099, at second
/// precision, matching what the text encoding preserves.
pub fn date_time_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|seconds| {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .expect("timestamp in range")
    })
}

/// Strategy for generating any value, including nulls.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        2 => any::<bool>().prop_map(Value::Bool),
        3 => any::<i64>().prop_map(Value::Integer),
        2 => (-1.0e12f64..1.0e12).prop_map(Value::Real),
        3 => text_strategy().prop_map(Value::Text),
        1 => prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Blob),
        2 => date_time_strategy().prop_map(Value::DateTime),
    ]
}

/// Strategy for generating values that bind as placeholders (no nulls,
/// which compile to `IS NULL` instead).
pub fn bindable_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        text_strategy().prop_map(Value::Text),
        date_time_strategy().prop_map(Value::DateTime),
    ]
}

/// Strategy for generating valid column names.
pub fn column_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,15}").expect("Invalid regex")
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _.,!?-]{0,32}").expect("Invalid regex")
}

/// Strategy for generating non-empty criteria maps.
pub fn criteria_map_strategy() -> impl Strategy<Value = CriteriaMap> {
    prop::collection::vec((column_name_strategy(), value_strategy()), 1..4).prop_map(|pairs| {
        let mut map = CriteriaMap::new();
        for (column, value) in pairs {
            map.insert(column, value);
        }
        map
    })
}

/// Strategy for generating whole queries: groups plus an exclusion list.
pub fn criteria_query_strategy() -> impl Strategy<Value = CriteriaQuery> {
    (
        prop::collection::vec(criteria_map_strategy(), 0..3),
        prop::collection::vec(any::<i64>(), 0..4),
    )
        .prop_map(|(groups, exclude)| {
            let mut query = CriteriaQuery::new();
            for group in groups {
                query = query.group(group);
            }
            query.exclude(exclude)
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
