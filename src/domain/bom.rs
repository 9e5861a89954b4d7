// ==========================================
// 餐饮运营补货计划系统 - BOM 领域模型
// ==========================================
// 红线: 单层 BOM,不做多层展开
// ==========================================

use crate::domain::types::ingredient_key;
use serde::{Deserialize, Serialize};

/// 菜单配方行
///
/// - `required_qty`: 每份菜单产出的食材消耗量
/// - `loss_rate`: 损耗率（百分比,5 表示 5%）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    pub menu_code: String,
    pub menu_name: String,
    pub ingredient_code: String,
    pub ingredient_name: String,
    pub required_qty: f64,
    pub unit: String,
    pub loss_rate: f64,
}

impl BomLine {
    pub fn ingredient_key(&self) -> String {
        ingredient_key(&self.ingredient_code, &self.ingredient_name)
    }

    /// 是否属于指定菜单键（code 或 name 任一匹配）
    pub fn matches_menu(&self, menu_key: &str) -> bool {
        (!self.menu_code.is_empty() && self.menu_code == menu_key)
            || (!self.menu_name.is_empty() && self.menu_name == menu_key)
    }

    /// 损耗放大系数 (1 + loss_rate/100)
    pub fn loss_factor(&self) -> f64 {
        1.0 + self.loss_rate / 100.0
    }
}
