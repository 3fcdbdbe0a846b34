//! SQL 评估启发式
//!
//! 基于 SQL 文本的关键字判断，不解析也不执行查询，只是真实评分的近似替代。

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::homework_sets::entities::Question;

static SELECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^select\b").expect("Invalid select regex"));

/// 评估结果
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score_ratio: f64,
    pub note: String,
}

impl Evaluation {
    pub fn new(score_ratio: f64, note: impl Into<String>) -> Self {
        Self {
            score_ratio: score_ratio.clamp(0.0, 1.0),
            note: note.into(),
        }
    }
}

/// 单题评估函数，入参为小写后的 SQL
pub type HeuristicFn = fn(&str) -> Evaluation;

/// 按题目 ID 注册的评估策略，未注册的题目走通用规则
pub struct HeuristicRegistry {
    heuristics: HashMap<String, HeuristicFn>,
}

impl Default for HeuristicRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("q1", revenue_per_customer);
        registry.register("q2", top_products);
        registry.register("q3", customers_without_orders);
        registry
    }
}

impl HeuristicRegistry {
    pub fn empty() -> Self {
        Self {
            heuristics: HashMap::new(),
        }
    }

    pub fn register(&mut self, question_id: impl Into<String>, heuristic: HeuristicFn) {
        self.heuristics.insert(question_id.into(), heuristic);
    }

    pub fn is_registered(&self, question_id: &str) -> bool {
        self.heuristics.contains_key(question_id)
    }

    /// 评估一次提交的 SQL（纯函数）
    pub fn evaluate_sql(&self, question: &Question, sql: &str) -> Evaluation {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Evaluation::new(0.0, "Enter a SQL query to run against the sample dataset.");
        }

        if !SELECT_RE.is_match(trimmed) {
            return Evaluation::new(
                0.0,
                "Only SELECT statements can be executed in the sandbox.",
            );
        }

        let lowered = trimmed.to_lowercase();
        match self.heuristics.get(question.id.as_str()) {
            Some(heuristic) => heuristic(&lowered),
            None => generic(&lowered),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Join,
    Sum,
    GroupBy,
    OrderBy,
    Limit,
    LeftJoin,
    IsNull,
    NotExists,
}

impl Keyword {
    // 顺序与枚举值一致，作为 KEYWORD_RES 的下标
    const ALL: [Keyword; 8] = [
        Keyword::Join,
        Keyword::Sum,
        Keyword::GroupBy,
        Keyword::OrderBy,
        Keyword::Limit,
        Keyword::LeftJoin,
        Keyword::IsNull,
        Keyword::NotExists,
    ];

    fn text(self) -> &'static str {
        match self {
            Keyword::Join => "join",
            Keyword::Sum => "sum",
            Keyword::GroupBy => "group by",
            Keyword::OrderBy => "order by",
            Keyword::Limit => "limit",
            Keyword::LeftJoin => "left join",
            Keyword::IsNull => "is null",
            Keyword::NotExists => "not exists",
        }
    }
}

// 关键字以完整单词匹配，多词关键字中间允许任意空白
static KEYWORD_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    Keyword::ALL
        .iter()
        .map(|keyword| {
            let pattern = keyword
                .text()
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            Regex::new(&format!(r"\b{pattern}\b")).expect("Invalid keyword regex")
        })
        .collect()
});

fn has_keyword(sql: &str, keyword: Keyword) -> bool {
    KEYWORD_RES[keyword as usize].is_match(sql)
}

fn generic(sql: &str) -> Evaluation {
    if has_keyword(sql, Keyword::Join) {
        Evaluation::new(0.6, "Query runs. Joins detected; compare your output with the expected columns.")
    } else {
        Evaluation::new(0.5, "Query runs. Compare your output with the expected columns.")
    }
}

// 每位客户的总消费：需要 SUM 聚合和 JOIN
fn revenue_per_customer(sql: &str) -> Evaluation {
    let has_sum = has_keyword(sql, Keyword::Sum);
    let has_join = has_keyword(sql, Keyword::Join);
    match (has_sum, has_join) {
        (true, true) => Evaluation::new(1.0, "Great work! Aggregation and join look correct."),
        (true, false) => Evaluation::new(0.75, "Totals computed, but customer details need a JOIN."),
        (false, true) => Evaluation::new(0.75, "Join looks good; aggregate the order totals with SUM."),
        (false, false) => Evaluation::new(0.5, "Try joining customers to orders and summing the totals."),
    }
}

// 销量最高的商品：GROUP BY + ORDER BY + LIMIT
fn top_products(sql: &str) -> Evaluation {
    let has_group = has_keyword(sql, Keyword::GroupBy);
    let has_order = has_keyword(sql, Keyword::OrderBy);
    let has_limit = has_keyword(sql, Keyword::Limit);
    if has_group && has_order && has_limit {
        Evaluation::new(1.0, "Nice! Products are grouped, ranked and limited.")
    } else if has_group {
        Evaluation::new(0.7, "Grouping is right; rank with ORDER BY and keep the top rows with LIMIT.")
    } else {
        Evaluation::new(0.4, "Group the order items by product before ranking them.")
    }
}

// 没有订单的客户：LEFT JOIN ... IS NULL 或 NOT EXISTS
fn customers_without_orders(sql: &str) -> Evaluation {
    let anti_join = has_keyword(sql, Keyword::LeftJoin) && has_keyword(sql, Keyword::IsNull);
    if anti_join || has_keyword(sql, Keyword::NotExists) {
        Evaluation::new(1.0, "Correct anti-join: only customers without orders remain.")
    } else if has_keyword(sql, Keyword::Join) {
        Evaluation::new(0.6, "An inner join drops the customers you are looking for; try LEFT JOIN with IS NULL.")
    } else {
        Evaluation::new(0.3, "Relate customers to orders to find the ones with no purchases.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: String::new(),
            instructions: String::new(),
            expected_result_schema: vec![],
            grading_rubric: vec![],
            dataset_id: "retail".to_string(),
            max_attempts: None,
            points: 10,
        }
    }

    #[test]
    fn test_empty_sql_scores_zero() {
        let registry = HeuristicRegistry::default();
        let eval = registry.evaluate_sql(&question("q1"), "   \n ");
        assert_eq!(eval.score_ratio, 0.0);
        assert!(eval.note.contains("Enter a SQL query"));
    }

    #[test]
    fn test_non_select_rejected() {
        let registry = HeuristicRegistry::default();
        for sql in ["DELETE FROM orders", "update orders set total = 0", "selectx 1"] {
            let eval = registry.evaluate_sql(&question("q1"), sql);
            assert_eq!(eval.score_ratio, 0.0, "{sql}");
            assert!(eval.note.contains("Only SELECT"));
        }
    }

    #[test]
    fn test_select_is_case_insensitive() {
        let registry = HeuristicRegistry::default();
        let eval = registry.evaluate_sql(&question("q1"), "  sElEcT name FROM orders");
        assert_eq!(eval.score_ratio, 0.5);
    }

    #[test]
    fn test_q1_keyword_combinations() {
        let registry = HeuristicRegistry::default();
        let q = question("q1");
        assert_eq!(registry.evaluate_sql(&q, "SELECT name FROM orders").score_ratio, 0.5);
        assert_eq!(
            registry
                .evaluate_sql(
                    &q,
                    "SELECT c.name, SUM(o.total) FROM customers c JOIN orders o ON o.customer_id = c.id GROUP BY c.name"
                )
                .score_ratio,
            1.0
        );
        assert_eq!(
            registry.evaluate_sql(&q, "SELECT SUM(total) FROM orders").score_ratio,
            0.75
        );
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let registry = HeuristicRegistry::default();
        // "summary" 与 "joined_at" 不算关键字
        let eval = registry.evaluate_sql(&question("q1"), "SELECT summary, joined_at FROM orders");
        assert_eq!(eval.score_ratio, 0.5);
    }

    #[test]
    fn test_q2_and_q3_heuristics() {
        let registry = HeuristicRegistry::default();
        assert_eq!(
            registry
                .evaluate_sql(
                    &question("q2"),
                    "SELECT product_id, SUM(qty) FROM order_items GROUP BY product_id ORDER BY 2 DESC LIMIT 5"
                )
                .score_ratio,
            1.0
        );
        assert_eq!(
            registry
                .evaluate_sql(&question("q2"), "SELECT product_id FROM order_items group   by product_id")
                .score_ratio,
            0.7
        );
        assert_eq!(
            registry
                .evaluate_sql(
                    &question("q3"),
                    "SELECT c.id FROM customers c LEFT JOIN orders o ON o.customer_id = c.id WHERE o.id IS NULL"
                )
                .score_ratio,
            1.0
        );
        assert_eq!(
            registry
                .evaluate_sql(&question("q3"), "SELECT * FROM customers")
                .score_ratio,
            0.3
        );
    }

    #[test]
    fn test_unregistered_question_uses_generic_rule() {
        let registry = HeuristicRegistry::default();
        let q = question("custom-7");
        assert!(!registry.is_registered("custom-7"));
        assert_eq!(registry.evaluate_sql(&q, "SELECT * FROM a").score_ratio, 0.5);
        assert_eq!(
            registry
                .evaluate_sql(&q, "SELECT * FROM a JOIN b ON a.id = b.a_id")
                .score_ratio,
            0.6
        );
    }

    #[test]
    fn test_registered_heuristic_overrides_generic() {
        let mut registry = HeuristicRegistry::empty();
        registry.register("custom-7", |_| Evaluation::new(0.9, "custom"));
        let eval = registry.evaluate_sql(&question("custom-7"), "SELECT 1");
        assert_eq!(eval, Evaluation::new(0.9, "custom"));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let registry = HeuristicRegistry::default();
        let q = question("q2");
        let sql = "SELECT product_id FROM order_items GROUP BY product_id";
        assert_eq!(registry.evaluate_sql(&q, sql), registry.evaluate_sql(&q, sql));
    }

    #[test]
    fn test_keyword_table_matches_own_text() {
        for (index, keyword) in Keyword::ALL.iter().enumerate() {
            assert_eq!(*keyword as usize, index);
            assert!(has_keyword(keyword.text(), *keyword), "{keyword:?}");
        }
        assert!(has_keyword("a left\n  join b", Keyword::LeftJoin));
        assert!(!has_keyword("select summary", Keyword::Sum));
    }
}
