// ==========================================
// 餐饮运营补货计划系统 - 食材主数据
// ==========================================
// 红线: 主数据缺失时合成保守默认值,绝不让计划失败
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 缺失主数据时的默认分类
pub const DEFAULT_CATEGORY: &str = "기타";

// ==========================================
// IngredientMaster - 食材主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMaster {
    pub ingredient_code: String,
    pub ingredient_name: String,
    pub category: String,
    pub unit: String,
    pub moq: f64,               // 最小订货量
    pub packaging_unit: f64,    // 包装单位
    pub lead_time: u32,         // 交货周期（天）
    pub safety_days: u32,       // 安全天数
    pub unit_price: f64,
    pub supplier_code: Option<String>,
    pub supplier_name: Option<String>,
}

/// 主数据默认参数（来自运行配置）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientDefaults {
    pub lead_time_days: u32,
    pub safety_days: u32,
}

impl IngredientMaster {
    /// 合成默认主数据
    ///
    /// category=기타, moq=1, packaging_unit=1, unit_price=0,
    /// lead_time/safety_days 取配置默认值
    pub fn synthetic(
        ingredient_key: &str,
        ingredient_name: &str,
        unit: &str,
        defaults: IngredientDefaults,
    ) -> Self {
        let name = if ingredient_name.trim().is_empty() {
            ingredient_key
        } else {
            ingredient_name
        };

        Self {
            ingredient_code: ingredient_key.to_string(),
            ingredient_name: name.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            unit: unit.to_string(),
            moq: 1.0,
            packaging_unit: 1.0,
            lead_time: defaults.lead_time_days,
            safety_days: defaults.safety_days,
            unit_price: 0.0,
            supplier_code: None,
            supplier_name: None,
        }
    }
}

// ==========================================
// IngredientCatalog - 主数据查询（带默认值）
// ==========================================
/// 按 code 优先、name 次之查找主数据
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    by_code: HashMap<String, IngredientMaster>,
    by_name: HashMap<String, IngredientMaster>,
}

impl IngredientCatalog {
    pub fn new(masters: &[IngredientMaster]) -> Self {
        let mut catalog = Self::default();
        for master in masters {
            let code = master.ingredient_code.trim();
            if !code.is_empty() {
                catalog
                    .by_code
                    .entry(code.to_string())
                    .or_insert_with(|| master.clone());
            }
            let name = master.ingredient_name.trim();
            if !name.is_empty() {
                catalog
                    .by_name
                    .entry(name.to_string())
                    .or_insert_with(|| master.clone());
            }
        }
        catalog
    }

    pub fn find(&self, ingredient_key: &str) -> Option<&IngredientMaster> {
        self.by_code
            .get(ingredient_key)
            .or_else(|| self.by_name.get(ingredient_key))
    }

    /// 查找主数据,缺失时返回合成默认值（始终完整填充）
    pub fn lookup_or_default(
        &self,
        ingredient_key: &str,
        ingredient_name: &str,
        unit: &str,
        defaults: IngredientDefaults,
    ) -> IngredientMaster {
        match self.find(ingredient_key) {
            Some(master) => master.clone(),
            None => IngredientMaster::synthetic(ingredient_key, ingredient_name, unit, defaults),
        }
    }
}
