use std::fmt;

use actix_web::http::StatusCode;

use crate::services::encoder::EncodingError;
use crate::services::validation::ValidationError;

#[derive(Debug, Clone)]
pub enum CodemintError {
    Validation(ValidationError),
    Encoding(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    Internal(String),
}

impl CodemintError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CodemintError::Validation(_) => "E001",
            CodemintError::Encoding(_) => "E002",
            CodemintError::DatabaseConfig(_) => "E003",
            CodemintError::DatabaseConnection(_) => "E004",
            CodemintError::DatabaseOperation(_) => "E005",
            CodemintError::FileOperation(_) => "E006",
            CodemintError::Serialization(_) => "E007",
            CodemintError::Internal(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CodemintError::Validation(_) => "Validation Error",
            CodemintError::Encoding(_) => "Encoding Error",
            CodemintError::DatabaseConfig(_) => "Database Configuration Error",
            CodemintError::DatabaseConnection(_) => "Database Connection Error",
            CodemintError::DatabaseOperation(_) => "Database Operation Error",
            CodemintError::FileOperation(_) => "File Operation Error",
            CodemintError::Serialization(_) => "Serialization Error",
            CodemintError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            CodemintError::Validation(err) => &err.message,
            CodemintError::Encoding(msg) => msg,
            CodemintError::DatabaseConfig(msg) => msg,
            CodemintError::DatabaseConnection(msg) => msg,
            CodemintError::DatabaseOperation(msg) => msg,
            CodemintError::FileOperation(msg) => msg,
            CodemintError::Serialization(msg) => msg,
            CodemintError::Internal(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            CodemintError::Validation(_) | CodemintError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 简洁输出：`<类型>: <详情>`
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CodemintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CodemintError {}

// 便捷的构造函数
impl CodemintError {
    pub fn encoding<T: Into<String>>(msg: T) -> Self {
        CodemintError::Encoding(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CodemintError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CodemintError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CodemintError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        CodemintError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CodemintError::Serialization(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        CodemintError::Internal(msg.into())
    }
}

impl From<ValidationError> for CodemintError {
    fn from(err: ValidationError) -> Self {
        CodemintError::Validation(err)
    }
}

impl From<EncodingError> for CodemintError {
    fn from(err: EncodingError) -> Self {
        CodemintError::Encoding(err.reason)
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CodemintError {
    fn from(err: sea_orm::DbErr) -> Self {
        CodemintError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CodemintError {
    fn from(err: std::io::Error) -> Self {
        CodemintError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CodemintError {
    fn from(err: serde_json::Error) -> Self {
        CodemintError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for CodemintError {
    fn from(err: image::ImageError) -> Self {
        CodemintError::Encoding(format!("image encoding failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CodemintError>;
