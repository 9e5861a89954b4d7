// ==========================================
// 餐饮运营补货计划系统 - ERP 库存数据仓储
// ==========================================
// 职责: inventory_stock / purchase_order_line 表取数
// 红线: Repository 不含业务逻辑,汇总规则在领域层
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::{
    InTransitQuantity, InventorySnapshot, PurchaseOrderLine, StockBalance,
};
use crate::importer::data_source::ErpDataSource;
use crate::importer::error::SourceResult;
use crate::importer::field_mapper::parse_sheet_date;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// ErpInventoryRepository - ERP 库存仓储
// ==========================================
pub struct ErpInventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ErpInventoryRepository {
    /// 创建新的 ErpInventoryRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部仓库库存行
    pub fn list_stock_balances(&self) -> RepositoryResult<Vec<StockBalance>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT warehouse_code, ingredient_code, quantity
            FROM inventory_stock
            ORDER BY ingredient_code, warehouse_code
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StockBalance {
                warehouse_code: row.get(0)?,
                ingredient_code: row.get(1)?,
                quantity: row.get(2)?,
            })
        })?;

        let mut balances = Vec::new();
        for row in rows {
            balances.push(row?);
        }
        Ok(balances)
    }

    /// 查询全部采购单行
    pub fn list_purchase_order_lines(&self) -> RepositoryResult<Vec<PurchaseOrderLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_no, ingredient_code, ordered_qty, received_qty, status, expected_date
            FROM purchase_order_line
            ORDER BY order_no, line_no
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let expected_date: Option<String> = row.get(5)?;
            Ok(PurchaseOrderLine {
                order_no: row.get(0)?,
                ingredient_code: row.get(1)?,
                ordered_qty: row.get(2)?,
                received_qty: row.get(3)?,
                status: row.get(4)?,
                expected_date: expected_date.as_deref().and_then(parse_sheet_date),
            })
        })?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(row?);
        }
        Ok(lines)
    }

    /// 写入/覆盖单仓库存（ERP 同步用）
    pub fn upsert_stock_balance(&self, balance: &StockBalance) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory_stock (warehouse_code, ingredient_code, quantity, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(warehouse_code, ingredient_code)
            DO UPDATE SET quantity = ?3, updated_at = datetime('now')
            "#,
            params![balance.warehouse_code, balance.ingredient_code, balance.quantity],
        )?;
        Ok(())
    }

    /// 写入/覆盖采购单行（ERP 同步用）
    pub fn upsert_purchase_order_line(
        &self,
        line_no: i64,
        line: &PurchaseOrderLine,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO purchase_order_line (
                order_no, line_no, ingredient_code, ordered_qty, received_qty, status, expected_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                line.order_no,
                line_no,
                line.ingredient_code,
                line.ordered_qty,
                line.received_qty,
                line.status,
                line.expected_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ErpDataSource for ErpInventoryRepository {
    async fn fetch_current_inventory(&self) -> SourceResult<InventorySnapshot> {
        let balances = self.list_stock_balances()?;
        let snapshot = InventorySnapshot::from_balances(&balances);
        debug!(rows = balances.len(), ingredients = snapshot.len(), "库存快照读取完成");
        Ok(snapshot)
    }

    async fn fetch_in_transit(&self) -> SourceResult<InTransitQuantity> {
        let lines = self.list_purchase_order_lines()?;
        let in_transit = InTransitQuantity::from_orders(&lines);
        debug!(rows = lines.len(), ingredients = in_transit.len(), "在途数量读取完成");
        Ok(in_transit)
    }
}
