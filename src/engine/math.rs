// ==========================================
// 餐饮运营补货计划系统 - 引擎数值工具
// ==========================================

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 输出行使用的整数取整（仅在写入输出时调用）
pub fn round_qty(value: f64) -> f64 {
    value.round()
}

/// 独立来源的标准差按平方和开方合成
pub fn combine_in_quadrature(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}
