//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_sqlhw_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SqlHwError {
            $($variant(String),)*
        }

        impl SqlHwError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SqlHwError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SqlHwError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SqlHwError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SqlHwError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SqlHwError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_sqlhw_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    StorageBackendNotFound("E007", "Storage Backend Not Found"),
}

impl SqlHwError {
    /// 是否为“资源不存在”错误（传输层映射为 404）
    pub fn is_not_found(&self) -> bool {
        matches!(self, SqlHwError::NotFound(_))
    }
}

impl SqlHwError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SqlHwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SqlHwError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SqlHwError {
    fn from(err: sea_orm::DbErr) -> Self {
        SqlHwError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SqlHwError {
    fn from(err: serde_json::Error) -> Self {
        SqlHwError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SqlHwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SqlHwError::database_config("test").code(), "E001");
        assert_eq!(SqlHwError::validation("test").code(), "E004");
        assert_eq!(SqlHwError::not_found("test").code(), "E005");
        assert_eq!(SqlHwError::storage_backend_not_found("test").code(), "E007");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SqlHwError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SqlHwError::serialization("test").error_type(),
            "Serialization Error"
        );
    }

    #[test]
    fn test_not_found_detection() {
        assert!(SqlHwError::not_found("homework set s1").is_not_found());
        assert!(!SqlHwError::database_operation("boom").is_not_found());
    }

    #[test]
    fn test_format_simple() {
        let err = SqlHwError::not_found("Unknown question q9");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Unknown question q9"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: SqlHwError = serde_json::from_str::<u32>("not a number")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E006");
    }
}
