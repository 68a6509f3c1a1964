//! 数据库错误映射工具
//!
//! 提供统一的 SQLx 错误到 AppError 的转换

use shop_errors::AppError;

/// PostgreSQL 约束违规类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// 23505
    Unique(Option<String>),
    /// 23503
    ForeignKey(Option<String>),
}

/// 识别约束违规，返回违规类型和约束名
pub fn constraint_violation(e: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = e else {
        return None;
    };
    let constraint = db_err.constraint().map(str::to_string);

    match db_err.code().as_deref() {
        Some("23505") => Some(ConstraintViolation::Unique(constraint)),
        Some("23503") => Some(ConstraintViolation::ForeignKey(constraint)),
        _ => None,
    }
}

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // PostgreSQL 约束违规代码
                    "23505" => AppError::conflict("Duplicate entry violates unique constraint"),
                    "23503" => AppError::validation("Foreign key constraint violation"),
                    "23514" => AppError::validation("Check constraint violation"),
                    "23502" => AppError::validation("Not null constraint violation"),
                    "22001" => AppError::validation("String data too long"),
                    "22P02" => AppError::validation("Invalid input syntax"),
                    // chrono 可表示的年份范围比 TIMESTAMP 宽，超出部分由数据库拒绝
                    "22008" => AppError::validation("Timestamp out of range"),
                    "22003" => AppError::validation("Numeric value out of range"),
                    _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
                }
            } else {
                AppError::database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        sqlx::Error::Protocol(msg) => AppError::internal(format!("Database protocol error: {}", msg)),
        _ => AppError::database(e.to_string()),
    }
}
