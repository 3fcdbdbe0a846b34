//! 示例作业集 "Retail Analytics" 及其预置结果
//!
//! 启动时按配置写入存储，测试也直接使用这里的数据。

use chrono::Utc;
use serde_json::json;

use super::execution::{CannedResult, ResultCatalog};
use crate::config::GradingConfig;
use crate::models::homework_sets::entities::{
    ExpectedColumn, HomeworkRecord, RubricCriterion, Visibility,
};
use crate::models::homework_sets::requests::{HomeworkRecordDraft, QuestionDraft};

pub const SAMPLE_SET_ID: &str = "retail-analytics";

fn column(name: &str, data_type: &str) -> ExpectedColumn {
    ExpectedColumn {
        column: name.to_string(),
        data_type: data_type.to_string(),
    }
}

fn criterion(id: &str, label: &str, description: &str, weight: f64) -> RubricCriterion {
    RubricCriterion {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        weight,
        auto_graded: true,
    }
}

/// 示例作业集草稿，分值与尝试次数由配置补齐的题目不显式给出
pub fn sample_draft() -> HomeworkRecordDraft {
    HomeworkRecordDraft {
        id: SAMPLE_SET_ID.to_string(),
        title: "Retail Analytics".to_string(),
        course_id: "sql-101".to_string(),
        due_at: None,
        visibility: Some(Visibility::Published),
        questions: vec![
            QuestionDraft {
                id: "q1".to_string(),
                prompt: "Compute the total revenue generated by each customer.".to_string(),
                instructions: "Join customers to orders and sum the order totals per customer."
                    .to_string(),
                expected_result_schema: vec![
                    column("customer_name", "text"),
                    column("total_revenue", "numeric"),
                ],
                grading_rubric: vec![
                    criterion("aggregation", "Aggregation", "Uses SUM over order totals", 6.0),
                    criterion("join", "Join", "Relates customers to their orders", 4.0),
                ],
                dataset_id: "retail".to_string(),
                max_attempts: Some(3),
                points: Some(10),
            },
            QuestionDraft {
                id: "q2".to_string(),
                prompt: "List the five best-selling products by units sold.".to_string(),
                instructions: "Group order items by product, rank them and keep the top five."
                    .to_string(),
                expected_result_schema: vec![
                    column("product_name", "text"),
                    column("units_sold", "integer"),
                ],
                grading_rubric: vec![
                    criterion("grouping", "Grouping", "Groups order items by product", 5.0),
                    criterion("ranking", "Ranking", "Orders and limits the result", 5.0),
                ],
                dataset_id: "retail".to_string(),
                max_attempts: None,
                points: None,
            },
            QuestionDraft {
                id: "q3".to_string(),
                prompt: "Find customers who have never placed an order.".to_string(),
                instructions: "Use an anti-join (LEFT JOIN ... IS NULL or NOT EXISTS).".to_string(),
                expected_result_schema: vec![
                    column("customer_id", "integer"),
                    column("customer_name", "text"),
                ],
                grading_rubric: vec![
                    criterion("anti_join", "Anti-join", "Excludes customers with orders", 10.0),
                    criterion("projection", "Projection", "Returns the expected columns", 5.0),
                ],
                dataset_id: "retail".to_string(),
                max_attempts: Some(0),
                points: Some(15),
            },
        ],
    }
}

/// 使用默认评分配置构造的示例作业集
pub fn sample_record() -> HomeworkRecord {
    sample_draft().into_record(&GradingConfig::default(), Utc::now())
}

/// 示例题目的预置查询结果
pub fn sample_results() -> ResultCatalog {
    let mut catalog = ResultCatalog::new();
    catalog.insert(
        "q1".to_string(),
        CannedResult::new(
            &["customer_name", "total_revenue"],
            vec![
                vec![json!("Ada Lovelace"), json!(1840.5)],
                vec![json!("Grace Hopper"), json!(1322.0)],
                vec![json!("Alan Turing"), json!(987.25)],
                vec![json!("Edsger Dijkstra"), json!(640.0)],
                vec![json!("Barbara Liskov"), json!(412.75)],
            ],
            180,
        ),
    );
    catalog.insert(
        "q2".to_string(),
        CannedResult::new(
            &["product_name", "units_sold"],
            vec![
                vec![json!("Mechanical Keyboard"), json!(412)],
                vec![json!("USB-C Hub"), json!(388)],
                vec![json!("Laptop Stand"), json!(301)],
                vec![json!("Noise-Cancelling Headphones"), json!(276)],
                vec![json!("Webcam"), json!(199)],
            ],
            240,
        ),
    );
    catalog.insert(
        "q3".to_string(),
        CannedResult::new(
            &["customer_id", "customer_name"],
            vec![
                vec![json!(17), json!("Ken Thompson")],
                vec![json!(23), json!("Frances Allen")],
                vec![json!(41), json!("John Backus")],
            ],
            60,
        ),
    );
    catalog
}
