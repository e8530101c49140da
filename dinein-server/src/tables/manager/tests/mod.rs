use super::*;
use crate::catalog::demo_catalog;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{SessionCloseReason, SessionInvalidReason};
use shared::table::CheckoutBlock;

fn create_test_manager() -> TablesManager {
    create_test_manager_with_hub(Arc::new(NotificationHub::new(100)))
}

fn create_test_manager_with_hub(hub: Arc<NotificationHub>) -> TablesManager {
    TablesManager::new(5, Arc::new(CatalogService::new(demo_catalog())), hub)
}

fn selection(item_id: i64, quantity: i32, option_value_ids: &[i64]) -> OrderSelection {
    OrderSelection {
        item_id,
        quantity,
        option_value_ids: option_value_ids.to_vec(),
        note: None,
    }
}

/// น้ำเปล่า 15, no options
fn water(quantity: i32) -> OrderSelection {
    selection(302, quantity, &[])
}

fn open_table(manager: &TablesManager, table_id: i64) -> String {
    let (table, session) = manager.issue_session(table_id).unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    session.session_id
}

// ========================================================================
// Helper: open a table and submit items, returning the new item ids
// ========================================================================

fn open_table_with_items(
    manager: &TablesManager,
    table_id: i64,
    selections: Vec<OrderSelection>,
) -> (String, Vec<i64>) {
    let session_id = open_table(manager, table_id);
    let resp = manager.submit_order(&session_id, &selections).unwrap();
    assert!(resp.rejected.is_empty(), "Failed to submit items");
    let ids = resp.accepted.iter().map(|i| i.order_item_id).collect();
    (session_id, ids)
}

/// Accept and complete every item so checkout is allowed
fn serve_all(manager: &TablesManager, table_id: i64) {
    manager.bulk(table_id, ItemAction::Accept, None).unwrap();
    manager.bulk(table_id, ItemAction::Complete, None).unwrap();
}

fn money(units: i64) -> Decimal {
    Decimal::new(units, 0)
}
