// ==========================================
// 餐饮运营补货计划系统 - 命令行入口
// ==========================================
// 用法:
//   meal-ops-planner [sheet_source] [erp_db] [today] [--save] [--csv <path>]
//
// - sheet_source: CSV 目录或 Excel 工作簿（缺省读取 source_sheet_id 配置）
// - erp_db: SQLite ERP 库（缺省 get_default_db_path()）
// - today: 基准日期 YYYY-MM-DD（缺省本地当天）
// 报告以 JSON 输出到 stdout,日志输出到 stderr
// ==========================================

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use meal_ops_planner::api::{write_order_lines_csv, ReplenishmentApi};
use meal_ops_planner::config::ConfigManager;
use meal_ops_planner::db::{get_default_db_path, init_schema, open_sqlite_connection};
use meal_ops_planner::importer::FileSheetSource;
use meal_ops_planner::repository::{ErpInventoryRepository, RecommendationRepository};
use meal_ops_planner::{logging, APP_NAME, VERSION};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    sheet_source: Option<String>,
    erp_db: Option<String>,
    today: Option<NaiveDate>,
    save: bool,
    csv_path: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--save" => cli.save = true,
            "--csv" => {
                let path = args.next().context("--csv 需要输出文件路径")?;
                cli.csv_path = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    cli.sheet_source = positional.next().filter(|s| !s.trim().is_empty());
    cli.erp_db = positional.next().filter(|s| !s.trim().is_empty());
    if let Some(raw) = positional.next() {
        let today = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("基准日期格式错误: {}", raw))?;
        cli.today = Some(today);
    }
    if let Some(extra) = positional.next() {
        bail!("多余的参数: {}", extra);
    }

    Ok(cli)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = parse_args(std::env::args().skip(1))?;
    info!(app = APP_NAME, version = VERSION, "启动补货计划");

    let db_path = cli.erp_db.clone().unwrap_or_else(get_default_db_path);
    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开 ERP 数据库: {}", db_path))?;
    init_schema(&conn).context("数据库初始化失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())
        .load_replenishment_config()
        .context("加载补货配置失败")?;

    let sheet_source = match cli.sheet_source.clone() {
        Some(source) => source,
        None if !config.source_sheet_id.trim().is_empty() => config.source_sheet_id.clone(),
        None => bail!("未指定表格数据源（参数或 source_sheet_id 配置）"),
    };
    let sheets = FileSheetSource::open(&sheet_source, config.ingredient_defaults())
        .with_context(|| format!("无法打开表格数据源: {}", sheet_source))?;

    let erp = ErpInventoryRepository::from_connection(conn.clone());
    let api = ReplenishmentApi::new(Arc::new(sheets), Arc::new(erp))
        .with_report_repo(Arc::new(RecommendationRepository::from_connection(conn)));

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let (outcome, report_id) = if cli.save {
        api.generate_and_save(&config, today).await?
    } else {
        (api.generate_recommendation(&config, today).await, None)
    };

    if let Some(path) = &cli.csv_path {
        let written = write_order_lines_csv(&outcome.recommendation, path)?;
        info!(path = %path.display(), rows = written, "发注明细 CSV 已导出");
    }

    let output = serde_json::json!({
        "reportId": report_id,
        "coverage": outcome.coverage,
        "supplierSummaries": outcome.recommendation.supplier_summaries(),
        "recommendation": outcome.recommendation,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_positional_and_flags() {
        let cli = parse_args(args(&["./sheets", "erp.db", "2026-02-02", "--save", "--csv", "out.csv"]))
            .unwrap();
        assert_eq!(cli.sheet_source.as_deref(), Some("./sheets"));
        assert_eq!(cli.erp_db.as_deref(), Some("erp.db"));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2026, 2, 2));
        assert!(cli.save);
        assert_eq!(cli.csv_path, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_parse_args_rejects_bad_date() {
        assert!(parse_args(args(&["./sheets", "erp.db", "02/30"])).is_err());
        assert!(parse_args(args(&["--csv"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
