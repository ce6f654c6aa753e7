//! Expense category classification
//!
//! Keyword groups are checked in a fixed order and the first group with a
//! substring hit wins, so text matching both transport and dining keywords
//! is always transport.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cascade::Cascade;

/// Built-in expense categories, in classification order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "交通")]
    Transport,
    #[serde(rename = "餐饮")]
    Dining,
    #[serde(rename = "住宿")]
    Lodging,
    #[serde(rename = "娱乐")]
    Entertainment,
    #[serde(rename = "购物")]
    Shopping,
}

impl ExpenseCategory {
    /// Classification order; earlier entries win on overlapping keywords
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Transport,
        ExpenseCategory::Dining,
        ExpenseCategory::Lodging,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
    ];

    /// Display label stored on expenses
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Transport => "交通",
            ExpenseCategory::Dining => "餐饮",
            ExpenseCategory::Lodging => "住宿",
            ExpenseCategory::Entertainment => "娱乐",
            ExpenseCategory::Shopping => "购物",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            ExpenseCategory::Transport => &[
                "车", "打车", "出租", "网约", "地铁", "公交", "高铁", "火车", "机票", "飞机",
                "航班", "油",
            ],
            ExpenseCategory::Dining => &[
                "餐", "饭", "吃", "早餐", "午餐", "晚餐", "美食", "酒", "饮", "咖啡", "茶",
                "餐厅",
            ],
            ExpenseCategory::Lodging => &["住", "酒店", "民宿", "客栈", "房费", "房间"],
            ExpenseCategory::Entertainment => {
                &["玩", "景点", "门票", "体验", "活动", "演出", "展", "博物馆"]
            }
            ExpenseCategory::Shopping => {
                &["买", "购物", "礼物", "纪念品", "特产", "商场", "市集"]
            }
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.keywords().iter().any(|keyword| text.contains(keyword))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First category whose keywords appear in the text
pub fn classify_category(text: &str) -> Option<ExpenseCategory> {
    ExpenseCategory::ALL
        .into_iter()
        .find(|category| category.matches(text))
}

/// Resolve the category label
///
/// A non-blank external category is taken verbatim (trimmed); it is not
/// restricted to the built-in set.
pub fn resolve_category(text: &str, external: Option<&str>) -> Option<String> {
    Cascade::new("category")
        .step("external", || {
            external
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
        })
        .step("keyword", || {
            classify_category(text).map(|category| category.label().to_string())
        })
        .resolve()
}
