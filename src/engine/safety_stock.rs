// ==========================================
// 餐饮运营补货计划系统 - 安全库存计算
// ==========================================
// 公式: L = lead_time + safety_days; SS = Z × σ × √L
// 假设: 保护期内需求近似正态,日需求方差恒定
// ==========================================

/// 安全库存计算器
#[derive(Debug, Clone, Copy)]
pub struct SafetyStockCalculator {
    z_score: f64,
}

impl SafetyStockCalculator {
    pub fn new(z_score: f64) -> Self {
        Self {
            z_score: z_score.max(0.0),
        }
    }

    pub fn z_score(&self) -> f64 {
        self.z_score
    }

    /// 计算安全库存（结果恒 ≥ 0）
    pub fn calculate(&self, std_dev: f64, lead_time: u32, safety_days: u32) -> f64 {
        let protection_days = f64::from(lead_time) + f64::from(safety_days);
        (self.z_score * std_dev.max(0.0) * protection_days.sqrt()).max(0.0)
    }
}
