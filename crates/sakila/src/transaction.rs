//! Multi-statement writes that commit together or not at all.
//!
//! A [`TransactionPlan`] is an ordered list of statements. Inserts capture the
//! key they generate; later statements refer to it with
//! [`Value::Key`](crate::Value::Key) and get the real id substituted just
//! before they run.
//!
//! # Example
//!
//! ```ignore
//! use sakila::{BoundQuery, TransactionPlan, Value};
//!
//! let mut plan = TransactionPlan::new();
//! let address = plan.insert(BoundQuery::template(
//!     "INSERT INTO address (address, district, city_id, phone) VALUES (?, ?, ?, ?) RETURNING address_id",
//!     [street.into(), district.into(), city_id.into(), phone.into()],
//! )?);
//! plan.insert(BoundQuery::template(
//!     "INSERT INTO customer (store_id, first_name, last_name, address_id) VALUES (?, ?, ?, ?) RETURNING customer_id",
//!     [store_id.into(), first.into(), last.into(), Value::key_of(address)],
//! )?);
//!
//! let outcome = plan.run(&client).await?;
//! let customer_id = outcome.primary_key();
//! ```

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::{StoreError, StoreResult};
use crate::value::{StepId, Value};

/// Lifecycle of one plan run.
///
/// `Started` is entered only after `BEGIN` succeeded. `Committed` and
/// `RolledBack` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Started,
    Committed,
    RolledBack,
}

impl TxState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// `INSERT ... RETURNING <key>`; the key is captured.
    Insert,
    /// Any other statement; only the row count is kept.
    Execute,
    /// Like `Execute`, but zero affected rows aborts the plan with
    /// [`StoreError::NotFound`].
    ExecuteExisting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub query: BoundQuery,
    pub kind: StepKind,
}

/// An ordered sequence of statements run in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPlan {
    steps: Vec<PlanStep>,
}

/// What a committed plan produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    /// `keys[i]` is the key generated by step `i` (`None` for non-inserts).
    pub keys: Vec<Option<i32>>,
    /// Rows affected by each step (1 for inserts).
    pub rows: Vec<u64>,
    /// Sum of rows affected by non-insert steps.
    pub rows_affected: u64,
}

impl PlanOutcome {
    /// The key of the last insert, which by convention is the primary row.
    pub fn primary_key(&self) -> Option<i32> {
        self.keys.iter().rev().find_map(|k| *k)
    }

    pub fn key(&self, step: StepId) -> Option<i32> {
        self.keys.get(step.index()).copied().flatten()
    }

    pub fn rows_of(&self, step: StepId) -> u64 {
        self.rows.get(step.index()).copied().unwrap_or(0)
    }
}

impl TransactionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an insert whose generated key later steps can refer to.
    ///
    /// `query` must end in `RETURNING <key column>`.
    pub fn insert(&mut self, query: BoundQuery) -> StepId {
        self.push(query, StepKind::Insert)
    }

    /// Add a statement whose result is only a row count.
    pub fn execute(&mut self, query: BoundQuery) -> StepId {
        self.push(query, StepKind::Execute)
    }

    /// Add a statement that must affect at least one row, typically the
    /// `UPDATE` of the row that later steps hang off.
    pub fn execute_existing(&mut self, query: BoundQuery) -> StepId {
        self.push(query, StepKind::ExecuteExisting)
    }

    fn push(&mut self, query: BoundQuery, kind: StepKind) -> StepId {
        self.steps.push(PlanStep { query, kind });
        StepId(self.steps.len() - 1)
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check that every generated-key reference points at an earlier insert.
    pub fn check(&self) -> StoreResult<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            for param in step.query.params() {
                let Value::Key(source) = param else { continue };
                let valid = source.index() < idx
                    && self.steps[source.index()].kind == StepKind::Insert;
                if !valid {
                    return Err(StoreError::statement(format!(
                        "step #{idx} refers to step {source}, which is not an earlier insert"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Run every step inside one transaction on `db`.
    ///
    /// - `BEGIN` fails: the error is returned and nothing else is sent.
    /// - A step fails: `ROLLBACK` is issued and [`StoreError::RolledBack`]
    ///   carries the failing step; no key is returned.
    /// - All steps succeed: `COMMIT`.
    pub async fn run(&self, db: &impl Executor) -> StoreResult<PlanOutcome> {
        self.check()?;

        let mut state = TxState::Idle;
        db.begin().await?;
        transition(&mut state, TxState::Started);

        match self.run_steps(db).await {
            Ok(outcome) => match db.commit().await {
                Ok(()) => {
                    transition(&mut state, TxState::Committed);
                    Ok(outcome)
                }
                Err(error) => {
                    // PostgreSQL ends the transaction when COMMIT fails.
                    transition(&mut state, TxState::RolledBack);
                    Err(error)
                }
            },
            Err((step, error)) => {
                let result = db.rollback().await;
                transition(&mut state, TxState::RolledBack);
                match result {
                    Ok(()) => Err(StoreError::RolledBack {
                        step,
                        source: Box::new(error),
                    }),
                    Err(rollback_err) => Err(StoreError::Other(format!(
                        "{error} (rollback failed: {rollback_err})"
                    ))),
                }
            }
        }
    }

    async fn run_steps(&self, db: &impl Executor) -> Result<PlanOutcome, (usize, StoreError)> {
        let mut keys: Vec<Option<i32>> = Vec::with_capacity(self.steps.len());
        let mut rows = Vec::with_capacity(self.steps.len());
        let mut rows_affected = 0;

        for (idx, step) in self.steps.iter().enumerate() {
            let query = step.query.resolve_keys(&keys).map_err(|e| (idx, e))?;
            match step.kind {
                StepKind::Insert => {
                    let key = db.insert_returning_key(&query).await.map_err(|e| (idx, e))?;
                    keys.push(Some(key));
                    rows.push(1);
                }
                StepKind::Execute | StepKind::ExecuteExisting => {
                    let n = db.execute(&query).await.map_err(|e| (idx, e))?;
                    if n == 0 && step.kind == StepKind::ExecuteExisting {
                        return Err((
                            idx,
                            StoreError::not_found(format!("step #{idx} matched no rows")),
                        ));
                    }
                    rows_affected += n;
                    keys.push(None);
                    rows.push(n);
                }
            }
        }

        Ok(PlanOutcome {
            keys,
            rows,
            rows_affected,
        })
    }
}

fn transition(state: &mut TxState, next: TxState) {
    debug_assert!(!state.is_terminal(), "transaction already ended");
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "sakila.tx", from = ?*state, to = ?next, "transaction state");
    *state = next;
}

/// Replace the association rows of one owner.
///
/// Appends `DELETE FROM <table> WHERE <owner_column> = owner` and then one
/// insert of `(owner_column, other_column)` per id. An empty `ids` leaves the
/// owner with no associations.
///
/// `owner` may be a [`Value::Key`] so the owner can be created earlier in the
/// same plan.
pub fn rewrite_associations(
    plan: &mut TransactionPlan,
    table: &str,
    owner_column: &str,
    owner: Value,
    other_column: &str,
    ids: &[i32],
) -> StoreResult<()> {
    plan.execute(BoundQuery::template(
        &format!("DELETE FROM {table} WHERE {owner_column} = ?"),
        [owner.clone()],
    )?);
    append_associations(plan, table, owner_column, owner, other_column, ids)
}

/// Insert one `(owner_column, other_column)` row per id.
pub fn append_associations(
    plan: &mut TransactionPlan,
    table: &str,
    owner_column: &str,
    owner: Value,
    other_column: &str,
    ids: &[i32],
) -> StoreResult<()> {
    let sql = format!("INSERT INTO {table} ({owner_column}, {other_column}) VALUES (?, ?)");
    for id in ids {
        plan.execute(BoundQuery::template(&sql, [owner.clone(), Value::Int(*id)])?);
    }
    Ok(())
}
