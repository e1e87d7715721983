//! Trigger definitions.

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    /// `BEFORE` the event.
    Before,
    /// `AFTER` the event.
    After,
    /// `INSTEAD OF` the event (views).
    InsteadOf,
}

impl TriggerTiming {
    /// The SQL keyword for this timing.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        }
    }
}

/// The statement kind a trigger monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Row insertion.
    Insert,
    /// Row update, optionally narrowed to monitored columns.
    Update,
    /// Row deletion.
    Delete,
}

impl TriggerEvent {
    /// The SQL keyword for this event.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
        }
    }
}

/// A trigger over one table.
///
/// `body` holds the triggered statements; a missing trailing semicolon is
/// supplied when rendering so the `BEGIN … END` block is always well
/// formed. Monitored columns only render for update triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDefinition {
    name: String,
    schema: Option<String>,
    table: String,
    timing: TriggerTiming,
    event: TriggerEvent,
    columns: Vec<String>,
    when_expression: Option<String>,
    body: String,
}

impl TriggerDefinition {
    /// Creates a trigger on `table`.
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        timing: TriggerTiming,
        event: TriggerEvent,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: None,
            table: table.into(),
            timing,
            event,
            columns: Vec::new(),
            when_expression: None,
            body: body.into(),
        }
    }

    /// Places the trigger under an attached-database alias.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Narrows an update trigger to the given columns (`UPDATE OF`).
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a `WHEN` guard expression.
    #[must_use]
    pub fn with_when(mut self, expression: impl Into<String>) -> Self {
        self.when_expression = Some(expression.into());
        self
    }

    /// The trigger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema-qualified trigger name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Renders the complete `CREATE TRIGGER` statement.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TRIGGER {} {} {}",
            self.qualified_name(),
            self.timing.keyword(),
            self.event.keyword()
        );
        if self.event == TriggerEvent::Update && !self.columns.is_empty() {
            sql.push_str(&format!(" OF {}", self.columns.join(", ")));
        }
        sql.push_str(&format!(" ON {} FOR EACH ROW", self.table));
        if let Some(expression) = &self.when_expression {
            sql.push_str(&format!(" WHEN {expression}"));
        }
        let body = self.body.trim();
        let terminator = if body.ends_with(';') { "" } else { ";" };
        sql.push_str(&format!(" BEGIN {body}{terminator} END"));
        sql
    }
}
