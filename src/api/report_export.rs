// ==========================================
// 餐饮运营补货计划系统 - 报告导出
// ==========================================
// 职责: 发注明细导出为 CSV（供采购人员在表格中复核）
// 范围: 仅导出 order_qty > 0 的行,顺序与报告一致
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::recommendation::{OrderCalculationLine, OrderRecommendation, UNKNOWN_SUPPLIER};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

// ==========================================
// OrderLineRow - CSV 行结构
// ==========================================
#[derive(Debug, Serialize)]
struct OrderLineRow<'a> {
    ingredient_code: &'a str,
    ingredient_name: &'a str,
    category: &'a str,
    supplier_name: &'a str,
    unit: &'a str,
    gross_requirement: f64,
    safety_stock: f64,
    available_stock: f64,
    net_requirement: f64,
    order_qty: f64,
    unit_price: f64,
    estimated_cost: f64,
    days_of_stock: f64,
    status: String,
    status_message: &'a str,
}

impl<'a> From<&'a OrderCalculationLine> for OrderLineRow<'a> {
    fn from(line: &'a OrderCalculationLine) -> Self {
        Self {
            ingredient_code: &line.ingredient_code,
            ingredient_name: &line.ingredient_name,
            category: &line.category,
            supplier_name: line.supplier_name.as_deref().unwrap_or(UNKNOWN_SUPPLIER),
            unit: &line.unit,
            gross_requirement: line.gross_requirement,
            safety_stock: line.safety_stock,
            available_stock: line.available_stock,
            net_requirement: line.net_requirement,
            order_qty: line.order_qty,
            unit_price: line.unit_price,
            estimated_cost: line.estimated_cost,
            days_of_stock: line.days_of_stock,
            status: line.status.to_string(),
            status_message: &line.status_message,
        }
    }
}

/// 将需要下单的明细写入任意 writer
///
/// # 返回
/// - Ok(usize): 写入的数据行数（不含表头）
pub fn write_order_lines<W: Write>(report: &OrderRecommendation, writer: W) -> ApiResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;
    for line in report.lines_to_order() {
        csv_writer.serialize(OrderLineRow::from(line))?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}

/// 将需要下单的明细写入 CSV 文件
pub fn write_order_lines_csv(report: &OrderRecommendation, path: &Path) -> ApiResult<usize> {
    let file = std::fs::File::create(path)?;
    write_order_lines(report, file)
}
