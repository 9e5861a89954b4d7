// ==========================================
// 餐饮运营补货计划系统 - 库存与在途领域模型
// ==========================================
// 职责: 多仓库存汇总、未到货采购单汇总
// 红线: 汇总规则在领域层,仓储层只负责取数
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 视为"已完结"的采购单状态
const RECEIVED_STATUSES: [&str; 4] = ["received", "완료", "입고완료", "closed"];

// ==========================================
// StockBalance - 单仓库存行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBalance {
    pub warehouse_code: String,
    pub ingredient_code: String,
    pub quantity: f64,
}

// ==========================================
// PurchaseOrderLine - 采购单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub order_no: String,
    pub ingredient_code: String,
    pub ordered_qty: f64,
    pub received_qty: f64,
    pub status: String,
    pub expected_date: Option<NaiveDate>,
}

impl PurchaseOrderLine {
    pub fn is_received(&self) -> bool {
        let status = self.status.trim().to_lowercase();
        RECEIVED_STATUSES.iter().any(|s| *s == status)
    }

    /// 未到货数量（已完结或超收时为 0）
    pub fn pending_qty(&self) -> f64 {
        if self.is_received() {
            return 0.0;
        }
        (self.ordered_qty - self.received_qty).max(0.0)
    }
}

// ==========================================
// InventorySnapshot - 现有库存快照
// ==========================================
/// ingredient_code → 在库数量（非负,跨仓汇总）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot(BTreeMap<String, f64>);

impl InventorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 跨仓汇总; 单食材汇总结果为负时按 0 处理
    pub fn from_balances(balances: &[StockBalance]) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for balance in balances {
            let code = balance.ingredient_code.trim();
            if code.is_empty() {
                continue;
            }
            *totals.entry(code.to_string()).or_insert(0.0) += balance.quantity;
        }
        for qty in totals.values_mut() {
            *qty = qty.max(0.0);
        }
        Self(totals)
    }

    pub fn insert(&mut self, ingredient_code: impl Into<String>, qty: f64) {
        self.0.insert(ingredient_code.into(), qty.max(0.0));
    }

    /// 查询在库数量,缺失时为 0
    pub fn on_hand(&self, ingredient_code: &str) -> f64 {
        self.0.get(ingredient_code).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for InventorySnapshot {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (code, qty) in iter {
            snapshot.insert(code, qty);
        }
        snapshot
    }
}

// ==========================================
// InTransitQuantity - 在途数量
// ==========================================
/// ingredient_code → Σ(ordered - received),不含已完结订单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InTransitQuantity(BTreeMap<String, f64>);

impl InTransitQuantity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orders(orders: &[PurchaseOrderLine]) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for order in orders {
            let code = order.ingredient_code.trim();
            let pending = order.pending_qty();
            if code.is_empty() || pending <= 0.0 {
                continue;
            }
            *totals.entry(code.to_string()).or_insert(0.0) += pending;
        }
        Self(totals)
    }

    pub fn insert(&mut self, ingredient_code: impl Into<String>, qty: f64) {
        self.0.insert(ingredient_code.into(), qty.max(0.0));
    }

    pub fn pending(&self, ingredient_code: &str) -> f64 {
        self.0.get(ingredient_code).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for InTransitQuantity {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut in_transit = Self::new();
        for (code, qty) in iter {
            in_transit.insert(code, qty);
        }
        in_transit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(code: &str, ordered: f64, received: f64, status: &str) -> PurchaseOrderLine {
        PurchaseOrderLine {
            order_no: "PO-1".to_string(),
            ingredient_code: code.to_string(),
            ordered_qty: ordered,
            received_qty: received,
            status: status.to_string(),
            expected_date: None,
        }
    }

    #[test]
    fn test_snapshot_aggregates_warehouses() {
        let balances = vec![
            StockBalance {
                warehouse_code: "W1".to_string(),
                ingredient_code: "I001".to_string(),
                quantity: 30.0,
            },
            StockBalance {
                warehouse_code: "W2".to_string(),
                ingredient_code: "I001".to_string(),
                quantity: 20.0,
            },
            StockBalance {
                warehouse_code: "W1".to_string(),
                ingredient_code: "I002".to_string(),
                quantity: -5.0,
            },
        ];
        let snapshot = InventorySnapshot::from_balances(&balances);
        assert_eq!(snapshot.on_hand("I001"), 50.0);
        assert_eq!(snapshot.on_hand("I002"), 0.0);
        assert_eq!(snapshot.on_hand("I003"), 0.0);
    }

    #[test]
    fn test_in_transit_excludes_received_orders() {
        let orders = vec![
            order("I001", 100.0, 40.0, "ordered"),
            order("I001", 50.0, 0.0, "부분입고"),
            order("I001", 70.0, 0.0, "완료"),
            order("I002", 10.0, 10.0, "ordered"),
            order("I003", 20.0, 0.0, "RECEIVED"),
        ];
        let in_transit = InTransitQuantity::from_orders(&orders);
        assert_eq!(in_transit.pending("I001"), 110.0);
        assert_eq!(in_transit.pending("I002"), 0.0);
        assert_eq!(in_transit.pending("I003"), 0.0);
        assert_eq!(in_transit.len(), 1);
    }
}
