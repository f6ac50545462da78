//! In-memory `SalesStore` with failure injection and call counters.
//!
//! Used by the test suite and handy for demos without a database file.
//! Each `fail_next_*` switch makes exactly one later call fail.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use super::{SalesStore, StoreError, StoreResult};
use tally_core::{Item, SaleLine, SaleRecord, SoldLine};

/// Number of calls made to each store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub list_items: usize,
    pub list_sales: usize,
    pub create_sale: usize,
    pub create_sale_lines: usize,
    pub delete_sale: usize,
}

impl StoreCalls {
    /// Calls that write.
    pub fn writes(&self) -> usize {
        self.create_sale + self.create_sale_lines + self.delete_sale
    }

    pub fn total(&self) -> usize {
        self.list_items + self.list_sales + self.writes()
    }
}

/// Holds the next `create_sale_lines` call until released.
///
/// Lets a test observe the store mid-submission.
#[derive(Debug, Clone, Default)]
pub struct LineGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl LineGate {
    /// Waits until a `create_sale_lines` call is parked on this gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the parked call continue.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Clone)]
struct StoredSale {
    id: String,
    buyer_name: String,
    sale_date: NaiveDate,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Clone)]
struct StoredLine {
    sale_id: String,
    item_id: String,
    quantity: u32,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: Vec<Item>,
    sales: Vec<StoredSale>,
    lines: Vec<StoredLine>,
    next_seq: u64,
    calls: StoreCalls,
    fail_next_list_sales: bool,
    fail_next_create_sale: bool,
    fail_next_create_lines: bool,
    fail_next_delete: bool,
    line_gate: Option<LineGate>,
}

/// In-memory sales store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose catalog holds the given item names.
    pub fn with_items(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            store.add_item(name);
        }
        store
    }

    /// Adds an item to the catalog.
    pub fn add_item(&self, name: &str) -> Item {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.write().items.push(item.clone());
        item
    }

    /// ID of the first item with this name.
    pub fn item_id(&self, name: &str) -> Option<String> {
        self.read()
            .items
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.id.clone())
    }

    pub fn fail_next_list_sales(&self) {
        self.write().fail_next_list_sales = true;
    }

    pub fn fail_next_create_sale(&self) {
        self.write().fail_next_create_sale = true;
    }

    pub fn fail_next_create_lines(&self) {
        self.write().fail_next_create_lines = true;
    }

    pub fn fail_next_delete(&self) {
        self.write().fail_next_delete = true;
    }

    /// Parks the next `create_sale_lines` call on the returned gate.
    pub fn hold_next_create_lines(&self) -> LineGate {
        let gate = LineGate::default();
        self.write().line_gate = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> StoreCalls {
        self.read().calls
    }

    pub fn sale_count(&self) -> usize {
        self.read().sales.len()
    }

    pub fn line_count(&self) -> usize {
        self.read().lines.len()
    }

    /// Lines stored for one sale.
    pub fn lines_of(&self, sale_id: &str) -> usize {
        self.read()
            .lines
            .iter()
            .filter(|l| l.sale_id == sale_id)
            .count()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().expect("memory store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().expect("memory store lock poisoned")
    }
}

fn injected(op: &str) -> StoreError {
    StoreError::Unavailable(format!("injected failure in {op}"))
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let mut state = self.write();
        state.calls.list_items += 1;

        let mut items = state.items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn list_sales(&self) -> StoreResult<Vec<SaleRecord>> {
        let mut state = self.write();
        state.calls.list_sales += 1;

        if std::mem::take(&mut state.fail_next_list_sales) {
            return Err(injected("list_sales"));
        }

        let names: HashMap<&str, &str> = state
            .items
            .iter()
            .map(|i| (i.id.as_str(), i.name.as_str()))
            .collect();

        let mut sales = state.sales.clone();
        sales.sort_by(|a, b| {
            b.sale_date
                .cmp(&a.sale_date)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let records = sales
            .into_iter()
            .map(|sale| {
                let lines = state
                    .lines
                    .iter()
                    .filter(|l| l.sale_id == sale.id)
                    .filter_map(|l| {
                        names.get(l.item_id.as_str()).map(|name| SoldLine {
                            item_id: l.item_id.clone(),
                            item_name: name.to_string(),
                            quantity: l.quantity,
                        })
                    })
                    .collect();

                SaleRecord {
                    id: sale.id,
                    buyer_name: sale.buyer_name,
                    sale_date: sale.sale_date,
                    created_at: sale.created_at,
                    lines,
                }
            })
            .collect();

        Ok(records)
    }

    async fn create_sale(&self, buyer_name: &str, sale_date: NaiveDate) -> StoreResult<String> {
        let mut state = self.write();
        state.calls.create_sale += 1;

        if std::mem::take(&mut state.fail_next_create_sale) {
            return Err(injected("create_sale"));
        }

        let id = Uuid::new_v4().to_string();
        state.next_seq += 1;
        let seq = state.next_seq;
        state.sales.push(StoredSale {
            id: id.clone(),
            buyer_name: buyer_name.to_string(),
            sale_date,
            created_at: Utc::now(),
            seq,
        });

        Ok(id)
    }

    async fn create_sale_lines(&self, sale_id: &str, lines: &[SaleLine]) -> StoreResult<()> {
        let gate = {
            let mut state = self.write();
            state.calls.create_sale_lines += 1;
            state.line_gate.take()
        };

        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let mut state = self.write();

        if std::mem::take(&mut state.fail_next_create_lines) {
            return Err(injected("create_sale_lines"));
        }

        if !state.sales.iter().any(|s| s.id == sale_id) {
            return Err(StoreError::Rejected(format!("sale {sale_id} does not exist")));
        }

        if let Some(line) = lines
            .iter()
            .find(|l| !state.items.iter().any(|i| i.id == l.item_id))
        {
            return Err(StoreError::Rejected(format!(
                "item {} does not exist",
                line.item_id
            )));
        }

        state
            .lines
            .extend(lines.iter().map(|line| StoredLine {
                sale_id: sale_id.to_string(),
                item_id: line.item_id.clone(),
                quantity: line.quantity.get(),
            }));

        Ok(())
    }

    async fn delete_sale(&self, sale_id: &str) -> StoreResult<()> {
        let mut state = self.write();
        state.calls.delete_sale += 1;

        if std::mem::take(&mut state.fail_next_delete) {
            return Err(injected("delete_sale"));
        }

        if !state.sales.iter().any(|s| s.id == sale_id) {
            return Err(StoreError::not_found("Sale", sale_id));
        }

        state.lines.retain(|l| l.sale_id != sale_id);
        state.sales.retain(|s| s.id != sale_id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
