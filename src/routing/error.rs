use std::fmt;

/// 매핑 URL 파싱 에러를 표현하는 열거형입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// URL 문법 오류
    InvalidUrl {
        url: String,
        reason: String,
    },
    /// 호스트가 필요한 위치에 호스트가 없음
    MissingHost {
        url: String,
    },
    /// 지원하지 않는 스킴 (http, https 만 허용)
    UnsupportedScheme {
        url: String,
        scheme: String,
    },
    /// `/` 로 시작하지 않는 상대 경로
    RelativePath {
        url: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::InvalidUrl { url, reason } =>
                write!(f, "유효하지 않은 URL {}: {}", url, reason),
            MappingError::MissingHost { url } =>
                write!(f, "URL {}에 호스트가 없음", url),
            MappingError::UnsupportedScheme { url, scheme } =>
                write!(f, "URL {}의 스킴 {}은 지원하지 않음 (http, https 만 가능)", url, scheme),
            MappingError::RelativePath { url } =>
                write!(f, "경로 {}는 '/' 로 시작해야 함", url),
        }
    }
}

impl std::error::Error for MappingError {}
