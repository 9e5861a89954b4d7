// ==========================================
// 餐饮运营补货计划系统 - 净需求计算引擎
// ==========================================
// 顺序:
// 1) total = gross + safety
// 2) available = on_hand + in_transit（缺失为 0）
// 3) net = max(0, total - available)
// 4) net > 0: order = max(net, moq), 包装单位 > 1 时向上取整到整包
// 5) cost = order × unit_price
// 红线: 中间计算保持浮点,仅在写入输出行时取整
// ==========================================

use crate::domain::ingredient::IngredientMaster;
use crate::domain::inventory::{InTransitQuantity, InventorySnapshot};
use crate::engine::bom_expansion::IngredientRequirement;

/// 整包换算时吸收浮点误差
const PACKAGING_EPSILON: f64 = 1e-9;

// ==========================================
// NetRequirement - 单食材净需求（浮点中间结果）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NetRequirement {
    pub requirement: IngredientRequirement,
    pub master: IngredientMaster,
    pub safety_stock: f64,
    pub total_requirement: f64,
    pub on_hand: f64,
    pub in_transit: f64,
    pub available_stock: f64,
    pub net_requirement: f64,
    pub order_qty: f64,
    pub estimated_cost: f64,
}

impl NetRequirement {
    /// 日均需求 = 毛需求 / 7
    pub fn avg_daily_demand(&self) -> f64 {
        self.requirement.gross_qty / 7.0
    }
}

// ==========================================
// NetRequirementResolver - 净需求计算
// ==========================================
pub struct NetRequirementResolver<'a> {
    inventory: &'a InventorySnapshot,
    in_transit: &'a InTransitQuantity,
}

impl<'a> NetRequirementResolver<'a> {
    pub fn new(inventory: &'a InventorySnapshot, in_transit: &'a InTransitQuantity) -> Self {
        Self {
            inventory,
            in_transit,
        }
    }

    pub fn resolve(
        &self,
        requirement: IngredientRequirement,
        master: IngredientMaster,
        safety_stock: f64,
    ) -> NetRequirement {
        let total_requirement = requirement.gross_qty + safety_stock;

        let supply_key = Self::supply_key(&requirement, &master);
        let on_hand = self.inventory.on_hand(supply_key);
        let in_transit = self.in_transit.pending(supply_key);
        let available_stock = on_hand + in_transit;

        let net_requirement = (total_requirement - available_stock).max(0.0);
        let order_qty = correct_order_qty(net_requirement, master.moq, master.packaging_unit);
        let estimated_cost = order_qty * master.unit_price;

        NetRequirement {
            requirement,
            master,
            safety_stock,
            total_requirement,
            on_hand,
            in_transit,
            available_stock,
            net_requirement,
            order_qty,
            estimated_cost,
        }
    }

    /// 库存按主数据 code 查询; 合成主数据的 code 即食材键
    fn supply_key<'k>(requirement: &'k IngredientRequirement, master: &'k IngredientMaster) -> &'k str {
        if master.ingredient_code.trim().is_empty() {
            &requirement.ingredient_key
        } else {
            &master.ingredient_code
        }
    }
}

/// MOQ / 包装单位修正
///
/// - net ≤ 0 → 0
/// - 否则 max(net, moq),包装单位 > 1 时向上取整为整包
pub fn correct_order_qty(net_requirement: f64, moq: f64, packaging_unit: f64) -> f64 {
    if net_requirement <= 0.0 {
        return 0.0;
    }

    let qty = net_requirement.max(moq);
    if packaging_unit > 1.0 {
        let packs = (qty / packaging_unit - PACKAGING_EPSILON).ceil().max(1.0);
        packs * packaging_unit
    } else {
        qty
    }
}
