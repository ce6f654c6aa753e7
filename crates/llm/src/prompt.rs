//! Prompt construction for expense extraction

use chrono::NaiveDate;

/// System message sent with every expense extraction request
pub const SYSTEM_PROMPT: &str = "你是帮用户记录旅行开销的记账助手，请只返回 JSON 对象。";

/// Category labels the model is steered towards
const CATEGORY_LABELS: &str = "交通、餐饮、住宿、娱乐、购物";

/// Build the user prompt describing the expected JSON shape
///
/// Hints are rendered as guidance only; the model is told that explicit
/// information in the description takes precedence.
pub fn build_expense_parse_prompt(
    content: &str,
    currency_hint: Option<&str>,
    date_hint: Option<NaiveDate>,
) -> String {
    let mut prompt = format!(
        "请从下面的记账描述中提取一笔消费，返回一个 JSON 对象，包含以下字段（无法确定的字段填 null）：\n\
         - category: 消费类别，尽量使用 {CATEGORY_LABELS} 之一\n\
         - amount: 金额数字，不含货币符号\n\
         - currency: 三位大写货币代码，例如 CNY、USD、JPY\n\
         - occurredOn: 消费日期，格式 YYYY-MM-DD\n\
         - notes: 简短备注\n\
         - confidence: 0 到 1 之间的置信度\n\
         \n\
         描述：{content}\n"
    );

    if let Some(hint) = currency_hint.map(str::trim).filter(|hint| !hint.is_empty()) {
        prompt.push_str(&format!("如果描述中没有写明货币，默认货币为 {hint}。\n"));
    }

    if let Some(date) = date_hint {
        prompt.push_str(&format!(
            "如果描述中没有写明日期，默认日期为 {}。\n",
            date.format("%Y-%m-%d")
        ));
    }

    prompt
}
