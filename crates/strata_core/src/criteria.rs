//! The criteria compiler: structured predicates to WHERE clauses.

use strata_codec::Value;

/// Sort direction for a criteria query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// `ASC`.
    Ascending,
    /// `DESC`.
    Descending,
}

impl SortDirection {
    /// The SQL keyword for this direction.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// One AND-group of column predicates, in insertion order.
///
/// A [`Value::Null`] entry compiles to `column IS NULL` and consumes no
/// placeholder; every other value compiles to `column = ?`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriteriaMap {
    entries: Vec<(String, Value)>,
}

impl CriteriaMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Appends a predicate.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((column.into(), value.into()));
    }

    /// Iterates predicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A compiled WHERE clause and the values it binds, in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClauseItem {
    /// The clause text, without the `WHERE` keyword. Empty for no criteria.
    pub clause: String,
    /// Values for the clause's placeholders, in order.
    pub values: Vec<Value>,
}

impl WhereClauseItem {
    /// Whether the clause is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

/// A structured query: criteria groups, exclusions, ordering and limit.
///
/// Within a group, predicates AND together in insertion order; groups OR
/// together, each parenthesized. A non-empty exclusion list appends
/// `AND <key> NOT IN (…)` after the criteria, binding its ids after all
/// criteria values.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaQuery {
    groups: Vec<CriteriaMap>,
    exclude: Vec<i64>,
    key_column: String,
    sort: Option<(String, SortDirection)>,
    limit: usize,
}

impl Default for CriteriaQuery {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            exclude: Vec::new(),
            key_column: "itemID".to_string(),
            sort: None,
            limit: 0,
        }
    }
}

impl CriteriaQuery {
    /// Creates an empty query (selects everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an AND-group.
    #[must_use]
    pub fn group(mut self, map: CriteriaMap) -> Self {
        self.groups.push(map);
        self
    }

    /// Sets the excluded key values.
    #[must_use]
    pub fn exclude<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.exclude = ids.into_iter().collect();
        self
    }

    /// Overrides the key column used by exclusions.
    #[must_use]
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    /// Sets the sort column and direction.
    #[must_use]
    pub fn sort_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some((column.into(), direction));
        self
    }

    /// Sets the row limit. Zero means no limit.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Compiles the criteria to a WHERE clause and its bind values.
    #[must_use]
    pub fn compile(&self) -> WhereClauseItem {
        let mut values = Vec::new();
        let mut group_clauses = Vec::new();

        for group in self.groups.iter().filter(|group| !group.is_empty()) {
            let mut predicates = Vec::with_capacity(group.len());
            for (column, value) in group.iter() {
                if value.is_null() {
                    predicates.push(format!("{column} IS NULL"));
                } else {
                    predicates.push(format!("{column} = ?"));
                    values.push(value.clone());
                }
            }
            group_clauses.push(format!("({})", predicates.join(" AND ")));
        }

        let criteria = group_clauses.join(" OR ");

        let clause = if self.exclude.is_empty() {
            criteria
        } else {
            let placeholders = vec!["?"; self.exclude.len()].join(", ");
            let exclusion = format!("{} NOT IN ({placeholders})", self.key_column);
            values.extend(self.exclude.iter().map(|id| Value::Integer(*id)));
            if criteria.is_empty() {
                exclusion
            } else if group_clauses.len() > 1 {
                format!("({criteria}) AND {exclusion}")
            } else {
                format!("{criteria} AND {exclusion}")
            }
        };

        WhereClauseItem { clause, values }
    }

    /// Renders the trailing ORDER BY / LIMIT fragment, leading space
    /// included. Empty when neither is set.
    #[must_use]
    pub fn tail_sql(&self) -> String {
        let mut tail = String::new();
        if let Some((column, direction)) = &self.sort {
            tail.push_str(&format!(" ORDER BY {column} {}", direction.keyword()));
        }
        if self.limit > 0 {
            tail.push_str(&format!(" LIMIT {}", self.limit));
        }
        tail
    }
}
