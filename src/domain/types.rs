// ==========================================
// 餐饮运营补货计划系统 - 领域类型定义
// ==========================================
// 职责: 补货状态等级、星期解析、键值规则
// ==========================================

use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 补货状态 (Order Status)
// ==========================================
// 红线: 等级制,按固定优先级排序,不按数值字段排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Shortage,  // 缺货 - 紧急补货
    Urgent,    // 临近 - 尽快补货
    Normal,    // 正常
    Overstock, // 过剩
}

impl OrderStatus {
    /// 排序优先级（越小越靠前）
    pub fn priority_rank(&self) -> u8 {
        match self {
            OrderStatus::Shortage => 0,
            OrderStatus::Urgent => 1,
            OrderStatus::Normal => 2,
            OrderStatus::Overstock => 3,
        }
    }

    /// i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            OrderStatus::Shortage => "status.shortage",
            OrderStatus::Urgent => "status.urgent",
            OrderStatus::Normal => "status.normal",
            OrderStatus::Overstock => "status.overstock",
        }
    }

    /// 是否计入紧急项（urgent + shortage）
    pub fn is_urgent(&self) -> bool {
        matches!(self, OrderStatus::Shortage | OrderStatus::Urgent)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Shortage => write!(f, "SHORTAGE"),
            OrderStatus::Urgent => write!(f, "URGENT"),
            OrderStatus::Normal => write!(f, "NORMAL"),
            OrderStatus::Overstock => write!(f, "OVERSTOCK"),
        }
    }
}

// ==========================================
// 键值规则
// ==========================================

/// 菜单键: menu_code 非空时取 code,否则取 menu_name
pub fn menu_key(menu_code: &str, menu_name: &str) -> String {
    let code = menu_code.trim();
    if code.is_empty() {
        menu_name.trim().to_string()
    } else {
        code.to_string()
    }
}

/// 食材键: ingredient_code 非空时取 code,否则取 ingredient_name
pub fn ingredient_key(ingredient_code: &str, ingredient_name: &str) -> String {
    menu_key(ingredient_code, ingredient_name)
}

// ==========================================
// 星期解析
// ==========================================

/// 解析星期文本
///
/// 支持: 월/화/수/목/금/토/일、월요일、Mon/Monday、1-7（周一=1）
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let korean = s.trim_end_matches("요일");
    let by_korean = match korean {
        "월" => Some(Weekday::Mon),
        "화" => Some(Weekday::Tue),
        "수" => Some(Weekday::Wed),
        "목" => Some(Weekday::Thu),
        "금" => Some(Weekday::Fri),
        "토" => Some(Weekday::Sat),
        "일" => Some(Weekday::Sun),
        _ => None,
    };
    if by_korean.is_some() {
        return by_korean;
    }

    if let Ok(n) = s.parse::<u32>() {
        return match n {
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            7 => Some(Weekday::Sun),
            _ => None,
        };
    }

    s.parse::<Weekday>().ok()
}

// ==========================================
// 天数上限与日期偏移
// ==========================================

/// 交期、安全天数等天数参数的上限（约 10 年）
pub const MAX_PLANNING_DAYS: u32 = 3650;

/// 日期偏移 N 天,越界时饱和到 NaiveDate::MIN / NaiveDate::MAX
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    // 超过 NaiveDate 全部可表示范围的偏移一律按边界处理
    const MAX_SHIFT: i64 = 200_000_000;
    let days = days.clamp(-MAX_SHIFT, MAX_SHIFT);
    match date.checked_add_signed(Duration::days(days)) {
        Some(shifted) => shifted,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority_order() {
        let mut statuses = vec![
            OrderStatus::Overstock,
            OrderStatus::Normal,
            OrderStatus::Shortage,
            OrderStatus::Urgent,
        ];
        statuses.sort_by_key(|s| s.priority_rank());
        assert_eq!(
            statuses,
            vec![
                OrderStatus::Shortage,
                OrderStatus::Urgent,
                OrderStatus::Normal,
                OrderStatus::Overstock
            ]
        );
    }

    #[test]
    fn test_menu_key_prefers_code() {
        assert_eq!(menu_key("M001", "김치찌개"), "M001");
        assert_eq!(menu_key("  ", "김치찌개"), "김치찌개");
        assert_eq!(ingredient_key("", "양파"), "양파");
    }

    #[test]
    fn test_parse_weekday_variants() {
        assert_eq!(parse_weekday("월"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("금요일"), Some(Weekday::Fri));
        assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("tue"), Some(Weekday::Tue));
        assert_eq!(parse_weekday("3"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("9"), None);
        assert_eq!(parse_weekday(""), None);
    }

    #[test]
    fn test_shift_days_saturates_out_of_range() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        assert_eq!(shift_days(today, 2), NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());
        assert_eq!(shift_days(today, -1), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(shift_days(today, 1_000_000_000), NaiveDate::MAX);
        assert_eq!(shift_days(today, -7_000_000_000), NaiveDate::MIN);
        assert_eq!(shift_days(today, i64::MAX), NaiveDate::MAX);
    }
}
