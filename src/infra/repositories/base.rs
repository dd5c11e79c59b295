//! Base repository traits providing uniform CRUD over the data API.
//!
//! Each table supplies a [`Table`] descriptor (row and payload types, key
//! type, table name, primary-key column, relationship table). The split
//! read/write/delete/bulk traits carry default method bodies over a shared
//! [`PostgrestClient`]; concrete repositories implement the traits by
//! handing out their client and add table-specific queries on top.
//!
//! Failure semantics: every method returns `AppResult` and normalizes
//! upstream failures into the application error taxonomy. Bulk operations
//! are best-effort per item; partial failure is reported alongside the
//! successful rows, never as a total failure.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::config::DEFAULT_BULK_BATCH_SIZE;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::postgrest::{PostgrestClient, QueryPairs};

/// One embeddable relationship of a table: the name of the related
/// resource plus the relationships reachable beneath it.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub name: &'static str,
    pub nested: &'static [Relation],
}

impl Relation {
    pub const fn leaf(name: &'static str) -> Self {
        Self { name, nested: &[] }
    }
}

/// Descriptor for one table of the hosted schema.
pub trait Table: Send + Sync + 'static {
    /// Full row as returned by the data API
    type Row: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;
    /// Validated payload for inserts
    type Create: Validate + Serialize + Send + Sync + 'static;
    /// Validated partial payload for updates
    type Update: Validate + Serialize + Send + Sync + 'static;
    /// Primary key type (natural slug or integer id)
    type Key: Display + Clone + Send + Sync + 'static;

    const NAME: &'static str;
    const PRIMARY_KEY: &'static str;

    /// Relationship table consulted when building select clauses.
    fn relations() -> &'static [Relation] {
        &[]
    }
}

/// Requested relationship expansion, as a tree of include keys.
///
/// Keys that name a known relation embed the related resource; other keys
/// are treated as plain column projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include {
    entries: BTreeMap<String, Include>,
}

impl Include {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one include path ("chapter" or "chapter.missions").
    pub fn with(mut self, path: &str) -> Self {
        self.insert_path(path);
        self
    }

    /// Parse a comma-separated list of dotted include paths, as supplied
    /// in `?include=` query parameters.
    pub fn parse(raw: &str) -> Self {
        let mut include = Self::default();
        for path in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            include.insert_path(path);
        }
        include
    }

    fn insert_path(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('.').map(str::trim).filter(|s| !s.is_empty()) {
            node = node.entries.entry(segment.to_string()).or_default();
        }
    }
}

/// Ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Ordering option for list queries
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// Options for filtered, ordered, paginated list queries.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Equality filters, column to value
    pub filters: Vec<(String, String)>,
    pub order: Option<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub include: Include,
}

impl QueryOptions {
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn paginate(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }

    /// Render into data-API query parameters for the given relationship
    /// table.
    pub fn to_query_pairs(&self, relations: &[Relation]) -> QueryPairs {
        let mut pairs = vec![(
            "select".to_string(),
            build_select_clause(&self.include, relations),
        )];
        for (column, value) in &self.filters {
            pairs.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some(order) = &self.order {
            pairs.push((
                "order".to_string(),
                format!("{}.{}", order.column, order.direction.as_str()),
            ));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

/// Render an include tree into the data API's nested projection syntax.
///
/// With no includes the clause is `*`. Include keys present in the
/// relationship table embed the related resource and recurse into its
/// relationships; unknown keys are projected as plain columns.
pub fn build_select_clause(include: &Include, relations: &[Relation]) -> String {
    if include.is_empty() {
        return "*".to_string();
    }

    let mut parts = vec!["*".to_string()];
    for (key, child) in &include.entries {
        match relations.iter().find(|r| r.name == key) {
            Some(relation) => parts.push(format!(
                "{}({})",
                key,
                build_nested_select_clause(child, relation.nested)
            )),
            None => parts.push(key.clone()),
        }
    }
    parts.join(",")
}

/// Nested variant: renders the projection inside an embedded resource.
fn build_nested_select_clause(include: &Include, relations: &[Relation]) -> String {
    build_select_clause(include, relations)
}

/// Options controlling bulk operations.
#[derive(Clone, Default)]
pub struct BulkOptions {
    /// Items per batch; `None` uses the default of 100
    pub batch_size: Option<usize>,
    /// Invoked after each batch with (processed, total)
    pub on_progress: Option<Arc<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BulkOptions {
    fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BULK_BATCH_SIZE).max(1)
    }

    fn report(&self, processed: usize, total: usize) {
        if let Some(callback) = &self.on_progress {
            callback(processed, total);
        }
    }
}

impl std::fmt::Debug for BulkOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkOptions")
            .field("batch_size", &self.batch_size)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// One failed item of a bulk operation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    /// Index of the item in the caller's input
    pub index: usize,
    pub code: String,
    pub message: String,
}

impl BulkFailure {
    fn from_error(index: usize, error: &AppError) -> Self {
        Self {
            index,
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a bulk operation: successes and failures together.
///
/// Callers must inspect both sides; a partial failure is not a total
/// failure.
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome<R> {
    pub succeeded: Vec<R>,
    pub failures: Vec<BulkFailure>,
    pub total: usize,
}

impl<R> BulkOutcome<R> {
    fn new(total: usize) -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
            total,
        }
    }

    pub fn is_partial_failure(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Summary error for the failed items, if any failed.
    pub fn partial_failure_error(&self) -> Option<AppError> {
        if self.failures.is_empty() {
            return None;
        }
        Some(AppError::BulkPartialFailure {
            failed: self.failures.len(),
            total: self.total,
            details: serde_json::json!({ "failures": self.failures }),
        })
    }
}

/// Read operations over one table.
#[async_trait]
pub trait ReadRepository<T: Table>: Send + Sync {
    /// Get data API client handle
    fn client(&self) -> &PostgrestClient;

    /// Filtered, ordered, paginated select.
    async fn find_all(&self, options: &QueryOptions) -> AppResult<Vec<T::Row>> {
        let query = options.to_query_pairs(T::relations());
        self.client().select(T::NAME, &query).await
    }

    /// Single-row fetch by primary key with optional relationship
    /// expansion. A missing row surfaces as `NOT_FOUND`.
    async fn find_by_id(&self, key: &T::Key, include: &Include) -> AppResult<T::Row> {
        let query = vec![
            (
                "select".to_string(),
                build_select_clause(include, T::relations()),
            ),
            (T::PRIMARY_KEY.to_string(), format!("eq.{}", key)),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows: Vec<T::Row> = self.client().select(T::NAME, &query).await?;
        rows.into_iter().next().ok_or_not_found()
    }
}

/// Write operations over one table.
#[async_trait]
pub trait WriteRepository<T: Table>: Send + Sync {
    /// Get data API client handle
    fn client(&self) -> &PostgrestClient;

    /// Validate and insert, returning the created row.
    ///
    /// Invalid input yields `VALIDATION_ERROR` with field details and
    /// never reaches the data API.
    async fn create(&self, input: &T::Create) -> AppResult<T::Row> {
        input
            .validate()
            .map_err(|e| AppError::from_validation(&e))?;
        insert_row::<T>(self.client(), input).await
    }

    /// Validate the partial payload and patch the row with the given key.
    async fn update(&self, key: &T::Key, patch: &T::Update) -> AppResult<T::Row> {
        patch
            .validate()
            .map_err(|e| AppError::from_validation(&e))?;
        update_row::<T>(self.client(), key, patch).await
    }
}

/// Delete operations over one table.
#[async_trait]
pub trait DeleteRepository<T: Table>: Send + Sync {
    /// Get data API client handle
    fn client(&self) -> &PostgrestClient;

    /// Delete by primary key. Deleting a missing key is `NOT_FOUND`.
    async fn delete(&self, key: &T::Key) -> AppResult<()> {
        let query = vec![
            ("select".to_string(), T::PRIMARY_KEY.to_string()),
            (T::PRIMARY_KEY.to_string(), format!("eq.{}", key)),
        ];
        let deleted: Vec<serde_json::Value> = self.client().delete(T::NAME, &query).await?;
        if deleted.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Delete every row whose `column` falls within `[from, to]`,
    /// returning the number of rows removed.
    async fn delete_range(&self, column: &str, from: &str, to: &str) -> AppResult<u64> {
        let query = vec![
            ("select".to_string(), T::PRIMARY_KEY.to_string()),
            (column.to_string(), format!("gte.{}", from)),
            (column.to_string(), format!("lte.{}", to)),
        ];
        let deleted: Vec<serde_json::Value> = self.client().delete(T::NAME, &query).await?;
        Ok(deleted.len() as u64)
    }
}

/// Best-effort batched bulk operations.
///
/// Items are processed in batches (default 100). Within a batch each item
/// is an independent request; the batch is awaited as a whole before the
/// next one starts. There is no cross-item ordering guarantee and no
/// rollback on partial failure.
#[async_trait]
pub trait BulkRepository<T: Table>: WriteRepository<T> {
    async fn bulk_create(
        &self,
        inputs: Vec<T::Create>,
        options: &BulkOptions,
    ) -> AppResult<BulkOutcome<T::Row>> {
        let total = inputs.len();
        let mut outcome = BulkOutcome::new(total);

        // Validate up-front; invalid items never reach the data API.
        let mut pending = Vec::new();
        for (index, input) in inputs.into_iter().enumerate() {
            match input.validate() {
                Ok(()) => pending.push((index, input)),
                Err(e) => outcome
                    .failures
                    .push(BulkFailure::from_error(index, &AppError::from_validation(&e))),
            }
        }

        let mut processed = outcome.failures.len();
        for batch in pending.chunks(options.effective_batch_size()) {
            let results = future::join_all(batch.iter().map(|(index, input)| async move {
                (*index, insert_row::<T>(self.client(), input).await)
            }))
            .await;

            for (index, result) in results {
                match result {
                    Ok(row) => outcome.succeeded.push(row),
                    Err(e) => outcome.failures.push(BulkFailure::from_error(index, &e)),
                }
            }

            processed += batch.len();
            options.report(processed, total);
        }

        Ok(outcome)
    }

    async fn bulk_update(
        &self,
        updates: Vec<(T::Key, T::Update)>,
        options: &BulkOptions,
    ) -> AppResult<BulkOutcome<T::Row>> {
        let total = updates.len();
        let mut outcome = BulkOutcome::new(total);

        let mut pending = Vec::new();
        for (index, (key, patch)) in updates.into_iter().enumerate() {
            match patch.validate() {
                Ok(()) => pending.push((index, key, patch)),
                Err(e) => outcome
                    .failures
                    .push(BulkFailure::from_error(index, &AppError::from_validation(&e))),
            }
        }

        let mut processed = outcome.failures.len();
        for batch in pending.chunks(options.effective_batch_size()) {
            let results = future::join_all(batch.iter().map(|(index, key, patch)| async move {
                (*index, update_row::<T>(self.client(), key, patch).await)
            }))
            .await;

            for (index, result) in results {
                match result {
                    Ok(row) => outcome.succeeded.push(row),
                    Err(e) => outcome.failures.push(BulkFailure::from_error(index, &e)),
                }
            }

            processed += batch.len();
            options.report(processed, total);
        }

        Ok(outcome)
    }
}

/// Full CRUD repository, combining all operation traits.
pub trait CrudRepository<T: Table>:
    ReadRepository<T> + WriteRepository<T> + DeleteRepository<T> + BulkRepository<T>
{
}

impl<R, T> CrudRepository<T> for R
where
    T: Table,
    R: ReadRepository<T> + WriteRepository<T> + DeleteRepository<T> + BulkRepository<T>,
{
}

/// Insert one already-validated payload and return the created row.
async fn insert_row<T: Table>(client: &PostgrestClient, input: &T::Create) -> AppResult<T::Row> {
    let query = vec![("select".to_string(), "*".to_string())];
    let rows: Vec<T::Row> = client.insert(T::NAME, &query, input).await?;
    rows.into_iter()
        .next()
        .ok_or_else(|| AppError::internal("insert returned no representation"))
}

/// Patch one row by primary key and return the updated row.
async fn update_row<T: Table>(
    client: &PostgrestClient,
    key: &T::Key,
    patch: &T::Update,
) -> AppResult<T::Row> {
    let query = vec![
        ("select".to_string(), "*".to_string()),
        (T::PRIMARY_KEY.to_string(), format!("eq.{}", key)),
    ];
    let rows: Vec<T::Row> = client.update(T::NAME, &query, patch).await?;
    rows.into_iter().next().ok_or_not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER_RELATIONS: &[Relation] = &[Relation::leaf("mission")];
    const HERO_RELATIONS: &[Relation] = &[
        Relation::leaf("hero_artifact"),
        Relation::leaf("hero_skin"),
        Relation {
            name: "hero_equipment_slot",
            nested: &[Relation::leaf("equipment")],
        },
    ];

    #[test]
    fn empty_include_selects_star() {
        assert_eq!(build_select_clause(&Include::none(), HERO_RELATIONS), "*");
    }

    #[test]
    fn known_relations_embed() {
        let include = Include::parse("hero_artifact,hero_skin");
        assert_eq!(
            build_select_clause(&include, HERO_RELATIONS),
            "*,hero_artifact(*),hero_skin(*)"
        );
    }

    #[test]
    fn unknown_keys_project_as_columns() {
        let include = Include::parse("name");
        assert_eq!(build_select_clause(&include, HERO_RELATIONS), "*,name");
    }

    #[test]
    fn nested_includes_recurse() {
        let include = Include::parse("hero_equipment_slot.equipment");
        assert_eq!(
            build_select_clause(&include, HERO_RELATIONS),
            "*,hero_equipment_slot(*,equipment(*))"
        );
    }

    #[test]
    fn nested_unknown_keys_are_plain_columns() {
        let include = Include::parse("mission.bogus");
        assert_eq!(
            build_select_clause(&include, CHAPTER_RELATIONS),
            "*,mission(*,bogus)"
        );
    }

    #[test]
    fn include_parse_ignores_blank_segments() {
        assert_eq!(Include::parse(" , ,"), Include::none());
        assert_eq!(Include::parse("a, ,b"), Include::none().with("a").with("b"));
    }

    #[test]
    fn query_pairs_carry_filters_order_and_paging() {
        let options = QueryOptions::default()
            .filter("quality", "orange")
            .order(OrderBy::desc("name"))
            .paginate(25, 50);
        let pairs = options.to_query_pairs(&[]);
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("quality".to_string(), "eq.orange".to_string()),
                ("order".to_string(), "name.desc".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("offset".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn bulk_outcome_reports_partial_failure() {
        let mut outcome: BulkOutcome<u8> = BulkOutcome::new(3);
        outcome.succeeded.push(1);
        outcome
            .failures
            .push(BulkFailure::from_error(2, &AppError::NotFound));

        let err = outcome.partial_failure_error().expect("partial failure");
        assert_eq!(err.code(), "BULK_PARTIAL_FAILURE");

        let clean: BulkOutcome<u8> = BulkOutcome::new(0);
        assert!(clean.partial_failure_error().is_none());
    }

    #[test]
    fn bulk_batch_size_defaults_and_clamps() {
        assert_eq!(BulkOptions::default().effective_batch_size(), 100);
        let tiny = BulkOptions {
            batch_size: Some(0),
            on_progress: None,
        };
        assert_eq!(tiny.effective_batch_size(), 1);
    }
}
