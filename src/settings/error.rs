use std::fmt;

use crate::routing::MappingError;

#[derive(Debug)]
pub enum SettingsError {
    EnvVarInvalid {
        var_name: String,
        value: String,
        reason: String,
    },
    FileError {
        path: String,
        error: std::io::Error,
    },
    ParseError {
        source: toml::de::Error,
    },
    JsonParseError {
        source: serde_json::Error,
    },
    /// JSON 매핑 객체의 값이 문자열이 아님
    InvalidMappingValue {
        key: String,
    },
    InvalidMapping {
        from: String,
        to: String,
        source: MappingError,
    },
    InvalidConfig(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVarInvalid { var_name, value, reason } =>
                write!(f, "환경 변수 {} 값 {} 오류: {}", var_name, value, reason),
            Self::FileError { path, error } =>
                write!(f, "설정 파일 {} 오류: {}", path, error),
            Self::ParseError { source } =>
                write!(f, "설정 파싱 오류: {}", source),
            Self::JsonParseError { source } =>
                write!(f, "매핑 JSON 파싱 오류: {}", source),
            Self::InvalidMappingValue { key } =>
                write!(f, "매핑 {}의 값은 URL 문자열이어야 합니다", key),
            Self::InvalidMapping { from, to, source } =>
                write!(f, "잘못된 매핑 {} -> {}: {}", from, to, source),
            Self::InvalidConfig(msg) =>
                write!(f, "잘못된 설정: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError { source } => Some(source),
            Self::JsonParseError { source } => Some(source),
            Self::InvalidMapping { source, .. } => Some(source),
            Self::FileError { error, .. } => Some(error),
            _ => None,
        }
    }
}
