// ==========================================
// 餐饮运营补货计划系统 - 食单与销售领域模型
// ==========================================
// 职责: 未来食单、历史销售、星期统计
// 红线: 只读输入,一次计划运行内有效
// ==========================================

use crate::domain::types::menu_key;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// MealPlanEntry - 食单条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub meal_type: String,          // 餐次（조식/중식/석식）
    pub corner: String,             // 档口
    pub menu_code: String,
    pub menu_name: String,
    pub planned_qty: Option<f64>,   // 计划份数
}

impl MealPlanEntry {
    pub fn menu_key(&self) -> String {
        menu_key(&self.menu_code, &self.menu_name)
    }
}

// ==========================================
// SalesHistoryRecord - 历史销售记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistoryRecord {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub menu_code: String,
    pub menu_name: String,
    pub corner: String,
    pub sold_qty: f64,
}

impl SalesHistoryRecord {
    pub fn menu_key(&self) -> String {
        menu_key(&self.menu_code, &self.menu_name)
    }
}

// ==========================================
// DayOfWeekStatistic - 星期维度销售统计
// ==========================================
// 唯一性: 每次运行内 (menu_key, weekday) 至多一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekStatistic {
    pub weekday: Weekday,
    pub menu_code: String,
    pub menu_name: String,
    pub avg_sales: f64,
    pub std_dev: f64,
    pub max_sales: f64,
    pub min_sales: f64,
    pub sample_count: usize,
}

impl DayOfWeekStatistic {
    pub fn menu_key(&self) -> String {
        menu_key(&self.menu_code, &self.menu_name)
    }
}
