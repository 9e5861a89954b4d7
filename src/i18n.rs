// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持韩文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 报告消息一律显式传入 locale,不依赖全局语言状态
// ==========================================

/// 翻译消息（指定语言,带参数）
///
/// # 示例
/// ```no_run
/// use meal_ops_planner::i18n::t_with_args_in;
/// let msg = t_with_args_in("ko", "status.shortage", &[("days", "1.5")]);
/// ```
pub fn t_with_args_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key, locale = locale).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
