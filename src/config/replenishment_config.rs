// ==========================================
// 餐饮运营补货计划系统 - 补货运行配置
// ==========================================
// 职责: 单次计划运行的不可变配置值
// 红线: Z 值由服务水平派生,不单独存储（避免陈旧 Z 值）
// ==========================================

use crate::domain::ingredient::IngredientDefaults;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ServiceLevel - 服务水平
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    P90,
    P95,
    P97,
    P99,
}

impl ServiceLevel {
    /// 对应的 Z 值
    pub fn z_score(&self) -> f64 {
        match self {
            ServiceLevel::P90 => 1.28,
            ServiceLevel::P95 => 1.65,
            ServiceLevel::P97 => 1.88,
            ServiceLevel::P99 => 2.33,
        }
    }

    pub fn percent(&self) -> u32 {
        match self {
            ServiceLevel::P90 => 90,
            ServiceLevel::P95 => 95,
            ServiceLevel::P97 => 97,
            ServiceLevel::P99 => 99,
        }
    }

    /// 从百分比解析（仅支持 90/95/97/99）
    pub fn from_percent(percent: f64) -> Option<Self> {
        if !percent.is_finite() || percent.fract() != 0.0 {
            return None;
        }
        match percent as u32 {
            90 => Some(ServiceLevel::P90),
            95 => Some(ServiceLevel::P95),
            97 => Some(ServiceLevel::P97),
            99 => Some(ServiceLevel::P99),
            _ => None,
        }
    }
}

impl Default for ServiceLevel {
    fn default() -> Self {
        ServiceLevel::P95
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// ==========================================
// ReplenishmentConfig - 补货配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentConfig {
    pub service_level: ServiceLevel,
    pub forecast_weeks: u32,
    pub default_lead_time_days: u32,
    pub default_safety_days: u32,
    pub source_sheet_id: String,
    pub report_locale: String,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            service_level: ServiceLevel::P95,
            forecast_weeks: 4,
            default_lead_time_days: 2,
            default_safety_days: 1,
            source_sheet_id: String::new(),
            report_locale: "ko".to_string(),
        }
    }
}

impl ReplenishmentConfig {
    pub fn z_score(&self) -> f64 {
        self.service_level.z_score()
    }

    pub fn ingredient_defaults(&self) -> IngredientDefaults {
        IngredientDefaults {
            lead_time_days: self.default_lead_time_days,
            safety_days: self.default_safety_days,
        }
    }

    pub fn with_service_level(mut self, service_level: ServiceLevel) -> Self {
        self.service_level = service_level;
        self
    }

    pub fn with_forecast_weeks(mut self, weeks: u32) -> Self {
        self.forecast_weeks = weeks.max(1);
        self
    }

    pub fn with_default_lead_time(mut self, days: u32) -> Self {
        self.default_lead_time_days = days;
        self
    }

    pub fn with_default_safety_days(mut self, days: u32) -> Self {
        self.default_safety_days = days;
        self
    }

    pub fn with_source_sheet_id(mut self, sheet_id: impl Into<String>) -> Self {
        self.source_sheet_id = sheet_id.into();
        self
    }

    pub fn with_report_locale(mut self, locale: impl Into<String>) -> Self {
        self.report_locale = locale.into();
        self
    }
}
