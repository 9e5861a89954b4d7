// ==========================================
// 餐饮运营补货计划系统 - 字段映射
// ==========================================
// 职责: 原始行记录 → 领域记录
// 规则:
// - 列名支持韩文/英文别名
// - 日期无法解析的行不参与日期区间过滤（直接排除）
// - 星期缺失时由日期推导
// - 数值允许千分位逗号; 必需数值非法时排除该行
// ==========================================

use crate::domain::bom::BomLine;
use crate::domain::ingredient::{IngredientDefaults, IngredientMaster, DEFAULT_CATEGORY};
use crate::domain::meal::{MealPlanEntry, SalesHistoryRecord};
use crate::domain::types::{parse_weekday, MAX_PLANNING_DAYS};
use crate::importer::file_parser::RawRow;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

// ==========================================
// 列名别名
// ==========================================
pub mod columns {
    pub const DATE: &[&str] = &["date", "날짜", "일자"];
    pub const WEEKDAY: &[&str] = &["weekday", "요일"];
    pub const MEAL_TYPE: &[&str] = &["meal_type", "mealType", "식사구분", "끼니"];
    pub const CORNER: &[&str] = &["corner", "코너"];
    pub const MENU_CODE: &[&str] = &["menu_code", "menuCode", "메뉴코드"];
    pub const MENU_NAME: &[&str] = &["menu_name", "menuName", "메뉴명"];
    pub const PLANNED_QTY: &[&str] = &["planned_qty", "plannedQty", "계획식수", "예정수량"];
    pub const SOLD_QTY: &[&str] = &["sold_qty", "soldQty", "판매수량", "판매량"];
    pub const INGREDIENT_CODE: &[&str] = &["ingredient_code", "ingredientCode", "식자재코드"];
    pub const INGREDIENT_NAME: &[&str] = &["ingredient_name", "ingredientName", "식자재명"];
    pub const REQUIRED_QTY: &[&str] = &["required_qty", "requiredQty", "소요량"];
    pub const UNIT: &[&str] = &["unit", "단위"];
    pub const LOSS_RATE: &[&str] = &["loss_rate", "lossRate", "로스율", "손실률"];
    pub const CATEGORY: &[&str] = &["category", "분류", "카테고리"];
    pub const MOQ: &[&str] = &["moq", "최소주문량"];
    pub const PACKAGING_UNIT: &[&str] = &["packaging_unit", "packagingUnit", "포장단위"];
    pub const LEAD_TIME: &[&str] = &["lead_time", "leadTime", "리드타임"];
    pub const SAFETY_DAYS: &[&str] = &["safety_days", "safetyDays", "안전재고일수"];
    pub const UNIT_PRICE: &[&str] = &["unit_price", "unitPrice", "단가"];
    pub const SUPPLIER_CODE: &[&str] = &["supplier_code", "supplierCode", "공급업체코드"];
    pub const SUPPLIER_NAME: &[&str] = &["supplier_name", "supplierName", "공급업체명"];
}

/// 按别名取第一个非空字段
fn field<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn text(row: &RawRow, aliases: &[&str]) -> String {
    field(row, aliases).unwrap_or("").to_string()
}

// ==========================================
// 值解析
// ==========================================

/// 解析表格日期
///
/// 支持: YYYY-MM-DD / YYYY/MM/DD / YYYY.MM.DD / YYYYMMDD,
/// 可带星期后缀如 "2026-02-02(월)"; 也支持 Excel 日期序列号
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // 去掉括号后缀与时间部分
    let s = s.split('(').next().unwrap_or(s).trim();
    let s = s.split_whitespace().next().unwrap_or(s);
    let s = s.split('T').next().unwrap_or(s);

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_excel_serial(s)
}

/// Excel 序列号（1900 日期系统）
fn parse_excel_serial(s: &str) -> Option<NaiveDate> {
    let serial = s.parse::<f64>().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) || s.len() == 8 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// 解析数值,允许千分位与百分号
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '%' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number(row: &RawRow, aliases: &[&str]) -> Option<f64> {
    field(row, aliases).and_then(parse_number)
}

/// 天数字段: 负数取默认值,超过上限按上限截断
fn days(row: &RawRow, aliases: &[&str], default: u32) -> u32 {
    number(row, aliases)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round().min(f64::from(MAX_PLANNING_DAYS)) as u32)
        .unwrap_or(default)
}

// ==========================================
// SheetFieldMapper - 字段映射器
// ==========================================
pub struct SheetFieldMapper {
    defaults: IngredientDefaults,
}

impl SheetFieldMapper {
    pub fn new(defaults: IngredientDefaults) -> Self {
        Self { defaults }
    }

    /// 食单行映射（日期非法的行被排除）
    pub fn map_meal_plan(&self, rows: &[RawRow]) -> Vec<MealPlanEntry> {
        let mut skipped = 0usize;
        let entries: Vec<MealPlanEntry> = rows
            .iter()
            .filter_map(|row| {
                let date = match field(row, columns::DATE).and_then(parse_sheet_date) {
                    Some(d) => d,
                    None => {
                        skipped += 1;
                        return None;
                    }
                };
                let weekday = field(row, columns::WEEKDAY)
                    .and_then(parse_weekday)
                    .unwrap_or_else(|| date.weekday());

                Some(MealPlanEntry {
                    date,
                    weekday,
                    meal_type: text(row, columns::MEAL_TYPE),
                    corner: text(row, columns::CORNER),
                    menu_code: text(row, columns::MENU_CODE),
                    menu_name: text(row, columns::MENU_NAME),
                    planned_qty: number(row, columns::PLANNED_QTY).filter(|v| *v >= 0.0),
                })
            })
            .collect();

        if skipped > 0 {
            debug!(skipped, "食单行日期无法解析,已排除");
        }
        entries
    }

    /// 销售行映射（日期或销量非法的行被排除）
    pub fn map_sales_history(&self, rows: &[RawRow]) -> Vec<SalesHistoryRecord> {
        let mut skipped = 0usize;
        let records: Vec<SalesHistoryRecord> = rows
            .iter()
            .filter_map(|row| {
                let date = field(row, columns::DATE).and_then(parse_sheet_date);
                let sold_qty = number(row, columns::SOLD_QTY);
                let (date, sold_qty) = match (date, sold_qty) {
                    (Some(d), Some(q)) => (d, q),
                    _ => {
                        skipped += 1;
                        return None;
                    }
                };
                let weekday = field(row, columns::WEEKDAY)
                    .and_then(parse_weekday)
                    .unwrap_or_else(|| date.weekday());

                Some(SalesHistoryRecord {
                    date,
                    weekday,
                    menu_code: text(row, columns::MENU_CODE),
                    menu_name: text(row, columns::MENU_NAME),
                    corner: text(row, columns::CORNER),
                    sold_qty,
                })
            })
            .collect();

        if skipped > 0 {
            debug!(skipped, "销售行日期或销量无法解析,已排除");
        }
        records
    }

    /// BOM 行映射（消耗量非法的行被排除; 损耗率缺失为 0）
    pub fn map_bom(&self, rows: &[RawRow]) -> Vec<BomLine> {
        rows.iter()
            .filter_map(|row| {
                let required_qty = number(row, columns::REQUIRED_QTY)?;
                Some(BomLine {
                    menu_code: text(row, columns::MENU_CODE),
                    menu_name: text(row, columns::MENU_NAME),
                    ingredient_code: text(row, columns::INGREDIENT_CODE),
                    ingredient_name: text(row, columns::INGREDIENT_NAME),
                    required_qty,
                    unit: text(row, columns::UNIT),
                    loss_rate: number(row, columns::LOSS_RATE).unwrap_or(0.0),
                })
            })
            .filter(|line| {
                (!line.menu_code.is_empty() || !line.menu_name.is_empty())
                    && (!line.ingredient_code.is_empty() || !line.ingredient_name.is_empty())
            })
            .collect()
    }

    /// 主数据映射（空字段取保守默认值）
    pub fn map_ingredient_master(&self, rows: &[RawRow]) -> Vec<IngredientMaster> {
        rows.iter()
            .filter_map(|row| {
                let ingredient_code = text(row, columns::INGREDIENT_CODE);
                let ingredient_name = text(row, columns::INGREDIENT_NAME);
                if ingredient_code.is_empty() && ingredient_name.is_empty() {
                    return None;
                }

                let category = field(row, columns::CATEGORY)
                    .unwrap_or(DEFAULT_CATEGORY)
                    .to_string();

                Some(IngredientMaster {
                    ingredient_code,
                    ingredient_name,
                    category,
                    unit: text(row, columns::UNIT),
                    moq: number(row, columns::MOQ).filter(|v| *v > 0.0).unwrap_or(1.0),
                    packaging_unit: number(row, columns::PACKAGING_UNIT)
                        .filter(|v| *v > 0.0)
                        .unwrap_or(1.0),
                    lead_time: days(row, columns::LEAD_TIME, self.defaults.lead_time_days),
                    safety_days: days(row, columns::SAFETY_DAYS, self.defaults.safety_days),
                    unit_price: number(row, columns::UNIT_PRICE)
                        .filter(|v| *v >= 0.0)
                        .unwrap_or(0.0),
                    supplier_code: field(row, columns::SUPPLIER_CODE).map(str::to_string),
                    supplier_name: field(row, columns::SUPPLIER_NAME).map(str::to_string),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapper() -> SheetFieldMapper {
        SheetFieldMapper::new(IngredientDefaults {
            lead_time_days: 2,
            safety_days: 1,
        })
    }

    #[test]
    fn test_parse_sheet_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 2);
        assert_eq!(parse_sheet_date("2026-02-02"), expected);
        assert_eq!(parse_sheet_date("2026/02/02"), expected);
        assert_eq!(parse_sheet_date("2026.02.02"), expected);
        assert_eq!(parse_sheet_date("20260202"), expected);
        assert_eq!(parse_sheet_date("2026-02-02(월)"), expected);
        assert_eq!(parse_sheet_date("2026-02-02 00:00:00"), expected);
        assert_eq!(parse_sheet_date("46055"), expected);
        assert_eq!(parse_sheet_date("2월 2일"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,200"), Some(1200.0));
        assert_eq!(parse_number(" 5% "), Some(5.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_meal_plan_drops_bad_dates_and_derives_weekday() {
        let rows = vec![
            row(&[("날짜", "2026-02-02"), ("메뉴코드", "M001"), ("계획식수", "120")]),
            row(&[("날짜", "미정"), ("메뉴코드", "M002")]),
            row(&[("date", "2026-02-03"), ("weekday", "화"), ("menu_name", "잡채")]),
        ];
        let entries = mapper().map_meal_plan(&rows);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].weekday, Weekday::Mon);
        assert_eq!(entries[0].planned_qty, Some(120.0));
        assert_eq!(entries[1].weekday, Weekday::Tue);
        assert_eq!(entries[1].planned_qty, None);
        assert_eq!(entries[1].menu_key(), "잡채");
    }

    #[test]
    fn test_sales_history_requires_quantity() {
        let rows = vec![
            row(&[("날짜", "2026-01-05"), ("메뉴코드", "M001"), ("판매수량", "95")]),
            row(&[("날짜", "2026-01-06"), ("메뉴코드", "M001"), ("판매수량", "-")]),
        ];
        let records = mapper().map_sales_history(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sold_qty, 95.0);
    }

    #[test]
    fn test_master_defaults_for_blank_fields() {
        let rows = vec![row(&[
            ("식자재코드", "I001"),
            ("식자재명", "양파"),
            ("포장단위", "20"),
            ("단가", "1,500"),
        ])];
        let masters = mapper().map_ingredient_master(&rows);
        let m = &masters[0];

        assert_eq!(m.category, DEFAULT_CATEGORY);
        assert_eq!(m.moq, 1.0);
        assert_eq!(m.packaging_unit, 20.0);
        assert_eq!(m.lead_time, 2);
        assert_eq!(m.safety_days, 1);
        assert_eq!(m.unit_price, 1500.0);
        assert_eq!(m.supplier_code, None);
    }

    #[test]
    fn test_master_day_fields_clamped_to_upper_bound() {
        let rows = vec![row(&[
            ("식자재코드", "I001"),
            ("리드타임", "1e12"),
            ("안전재고일수", "-3"),
        ])];
        let masters = mapper().map_ingredient_master(&rows);
        assert_eq!(masters[0].lead_time, MAX_PLANNING_DAYS);
        assert_eq!(masters[0].safety_days, 1);
    }

    #[test]
    fn test_bom_skips_rows_without_quantity_or_keys() {
        let rows = vec![
            row(&[("메뉴코드", "M001"), ("식자재코드", "I001"), ("소요량", "0.2"), ("로스율", "5")]),
            row(&[("메뉴코드", "M001"), ("식자재코드", "I002")]),
            row(&[("식자재코드", "I003"), ("소요량", "1")]),
        ];
        let lines = mapper().map_bom(&rows);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].loss_rate, 5.0);
    }
}
