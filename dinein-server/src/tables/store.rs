//! In-memory store
//!
//! 单一事实来源：桌台、会话记录、每个会话的账本，以及
//! `order_item_id → session_id` 反向索引。所有字段只在
//! [`super::TablesManager`] 的写锁内修改。

use shared::error::{PosError, PosResult, Resource};
use shared::models::{DiningTable, TableSession};
use shared::order::{Ledger, LedgerSummary};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct Store {
    pub(crate) tables: BTreeMap<i64, DiningTable>,
    /// Every session ever issued; closed records stay for revalidation
    pub(crate) sessions: HashMap<String, TableSession>,
    pub(crate) ledgers: HashMap<String, Ledger>,
    pub(crate) item_index: HashMap<i64, String>,
}

/// A table together with its currently bound visit
pub struct TableContext<'a> {
    pub table: &'a mut DiningTable,
    pub session: Option<&'a mut TableSession>,
    pub ledger: Option<&'a mut Ledger>,
}

impl TableContext<'_> {
    /// Summary of the bound ledger (empty when the table is free)
    pub fn summary(&self) -> LedgerSummary {
        self.ledger
            .as_deref()
            .map(Ledger::summary)
            .unwrap_or_default()
    }
}

/// An order item together with the visit it belongs to
pub struct ItemContext<'a> {
    pub table: &'a DiningTable,
    pub session: &'a TableSession,
    pub ledger: &'a mut Ledger,
}

impl ItemContext<'_> {
    /// Whether the item's visit is still the one bound to its table
    pub fn is_current(&self) -> bool {
        self.table.is_bound_to(&self.session.session_id)
    }
}

impl Store {
    /// Seed `count` available tables numbered from 1
    pub fn with_tables(count: usize) -> Self {
        let tables = (1..=count as i64)
            .map(|id| (id, DiningTable::new(id, format!("โต๊ะ {id}"))))
            .collect();
        Self {
            tables,
            ..Default::default()
        }
    }

    pub fn table(&self, table_id: i64) -> PosResult<&DiningTable> {
        self.tables
            .get(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))
    }

    pub fn session(&self, session_id: &str) -> PosResult<&TableSession> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| PosError::not_found(Resource::Session, session_id))
    }

    pub fn ledger(&self, session_id: &str) -> PosResult<&Ledger> {
        self.ledgers
            .get(session_id)
            .ok_or_else(|| PosError::not_found(Resource::Session, session_id))
    }

    pub fn table_context(&mut self, table_id: i64) -> PosResult<TableContext<'_>> {
        let table = self
            .tables
            .get_mut(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?;
        let (session, ledger) = match table.session_id.as_deref() {
            Some(sid) => (self.sessions.get_mut(sid), self.ledgers.get_mut(sid)),
            None => (None, None),
        };
        Ok(TableContext {
            table,
            session,
            ledger,
        })
    }

    pub fn item_context(&mut self, order_item_id: i64) -> PosResult<ItemContext<'_>> {
        let not_found = || PosError::not_found(Resource::OrderItem, order_item_id);
        let sid = self.item_index.get(&order_item_id).ok_or_else(not_found)?;
        let session = self.sessions.get(sid).ok_or_else(not_found)?;
        let table = self.tables.get(&session.table_id).ok_or_else(not_found)?;
        let ledger = self.ledgers.get_mut(sid).ok_or_else(not_found)?;
        Ok(ItemContext {
            table,
            session,
            ledger,
        })
    }

    /// Summary of the ledger bound to `table`
    pub fn summary_for(&self, table: &DiningTable) -> LedgerSummary {
        table
            .session_id
            .as_deref()
            .and_then(|sid| self.ledgers.get(sid))
            .map(Ledger::summary)
            .unwrap_or_default()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.values().filter(|s| s.is_active()).count()
    }
}
