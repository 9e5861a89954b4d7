// ==========================================
// 餐饮运营补货计划系统 - 补货状态判定
// ==========================================
// 规则（顺序执行,命中即返回）:
// 1) days_of_stock < lead_time → SHORTAGE
// 2) net > 0 且 days_of_stock < lead_time + 2 → URGENT
// 3) available > total × 3 → OVERSTOCK
// 4) 其他 → NORMAL
// 红线: 比较为严格小于; 规则顺序即优先级
// ==========================================

use crate::domain::types::OrderStatus;

/// 毛需求为 0 时的库存天数哨兵值（视为库存充足）
pub const DAYS_OF_STOCK_SENTINEL: f64 = 999.0;

/// 临近判定的额外缓冲天数
pub const URGENT_BUFFER_DAYS: f64 = 2.0;

/// 过剩判定倍数
pub const OVERSTOCK_MULTIPLIER: f64 = 3.0;

/// 库存可用天数 = available / (gross / 7)
pub fn days_of_stock(available_stock: f64, gross_qty: f64) -> f64 {
    if gross_qty <= 0.0 {
        return DAYS_OF_STOCK_SENTINEL;
    }
    available_stock / (gross_qty / 7.0)
}

// ==========================================
// StatusInput - 判定输入
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInput {
    pub days_of_stock: f64,
    pub lead_time: u32,
    pub net_requirement: f64,
    pub available_stock: f64,
    pub total_requirement: f64,
}

// ==========================================
// StatusRule - 有序规则表
// ==========================================
pub struct StatusRule {
    pub status: OrderStatus,
    pub applies: fn(&StatusInput) -> bool,
}

fn is_shortage(input: &StatusInput) -> bool {
    input.days_of_stock < input.lead_time as f64
}

fn is_urgent(input: &StatusInput) -> bool {
    input.net_requirement > 0.0
        && input.days_of_stock < input.lead_time as f64 + URGENT_BUFFER_DAYS
}

fn is_overstock(input: &StatusInput) -> bool {
    input.available_stock > input.total_requirement * OVERSTOCK_MULTIPLIER
}

fn always(_: &StatusInput) -> bool {
    true
}

pub const STATUS_RULES: [StatusRule; 4] = [
    StatusRule {
        status: OrderStatus::Shortage,
        applies: is_shortage,
    },
    StatusRule {
        status: OrderStatus::Urgent,
        applies: is_urgent,
    },
    StatusRule {
        status: OrderStatus::Overstock,
        applies: is_overstock,
    },
    StatusRule {
        status: OrderStatus::Normal,
        applies: always,
    },
];

// ==========================================
// StatusClassifier - 状态判定器
// ==========================================
pub struct StatusClassifier;

impl StatusClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, input: &StatusInput) -> OrderStatus {
        STATUS_RULES
            .iter()
            .find(|rule| (rule.applies)(input))
            .map(|rule| rule.status)
            .unwrap_or(OrderStatus::Normal)
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}
