use std::fmt;

use hyper::header::HeaderValue;
use hyper::http::uri::{Authority, Scheme};
use url::{ParseError, Url};

use crate::routing::error::MappingError;

/// 경로만 주어진 패턴을 정규화할 때 쓰는 임시 기준 URL
const PLACEHOLDER_BASE: &str = "http://localhost";

/// 매핑의 출발지 패턴입니다.
///
/// `host` 가 비어 있으면 모든 호스트와 매칭되고, `path` 가 비어 있으면
/// 모든 경로와 매칭됩니다.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourcePattern {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl SourcePattern {
    /// 모든 요청과 매칭되는 패턴
    pub fn any() -> Self {
        Self {
            scheme: String::new(),
            host: String::new(),
            path: String::new(),
        }
    }

    /// 매핑 키 문자열을 파싱합니다.
    ///
    /// 절대 URL(`http://a.example/old`)이면 호스트와 경로를 모두 갖고,
    /// `/` 로 시작하는 경로(`/legacy`)면 호스트 없는 패턴이 됩니다.
    /// 경로는 요청 경로와 그대로 비교되도록 원문을 유지합니다 (`/a/./b`, `%2F` 등).
    pub fn parse(raw: &str) -> Result<Self, MappingError> {
        if raw.is_empty() {
            return Ok(Self::any());
        }

        let path_only = raw.starts_with('/') && !raw.starts_with("//");
        let url = parse_url(raw)?;

        if path_only {
            return Ok(Self {
                scheme: String::new(),
                host: String::new(),
                path: raw_path(raw).to_string(),
            });
        }

        if url.host_str().is_none() {
            return Err(MappingError::MissingHost { url: raw.to_string() });
        }

        let (authority, path) = split_authority(raw);
        Ok(Self {
            scheme: url.scheme().to_string(),
            host: authority.to_string(),
            path: path.to_string(),
        })
    }

    pub fn is_host_agnostic(&self) -> bool {
        self.host.is_empty()
    }
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}://{}{}", self.scheme, self.host, self.path)
        }
    }
}

/// 매핑의 목적지입니다. 스킴과 호스트는 포워딩 클라이언트에 바인딩되고,
/// `path` 는 재작성 시 새 접두사로 사용됩니다.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetUrl {
    pub scheme: Scheme,
    pub authority: Authority,
    pub path: String,
    host_header: HeaderValue,
}

impl TargetUrl {
    pub fn parse(raw: &str) -> Result<Self, MappingError> {
        if raw.starts_with('/') {
            return Err(MappingError::RelativePath { url: raw.to_string() });
        }
        let url = parse_url(raw)?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(MappingError::UnsupportedScheme {
                    url: raw.to_string(),
                    scheme: other.to_string(),
                })
            }
        };

        if url.host_str().is_none() {
            return Err(MappingError::MissingHost { url: raw.to_string() });
        }

        let (authority, path) = split_authority(raw);
        let authority: Authority = authority.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            MappingError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }
        })?;
        let host_header = HeaderValue::from_str(authority.as_str()).map_err(|e| {
            MappingError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            scheme,
            authority,
            path: if path.is_empty() { String::new() } else { url.path().to_string() },
            host_header,
        })
    }

    /// 목적지 호스트 (포트 포함, 원문 그대로)
    pub fn host(&self) -> &str {
        self.authority.as_str()
    }

    /// 포워딩 요청의 `Host` 헤더 값
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// `scheme://host` 형태의 오리진
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

/// 하나의 라우팅 규칙입니다. 체인이 컴파일된 뒤에는 변경되지 않습니다.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    pub from: SourcePattern,
    pub to: TargetUrl,
}

impl Mapping {
    /// `(from, to)` URL 문자열 쌍으로부터 매핑을 생성합니다.
    ///
    /// # 예제
    ///
    /// ```
    /// use http_route::routing::Mapping;
    ///
    /// let mapping = Mapping::parse("/legacy", "http://c.example/dst").unwrap();
    /// assert!(mapping.from.is_host_agnostic());
    /// assert_eq!(mapping.to.host(), "c.example");
    /// assert_eq!(mapping.to.path, "/dst");
    /// ```
    pub fn parse(from: &str, to: &str) -> Result<Self, MappingError> {
        Ok(Self {
            from: SourcePattern::parse(from)?,
            to: TargetUrl::parse(to)?,
        })
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

fn parse_url(raw: &str) -> Result<Url, MappingError> {
    let parsed = if raw.starts_with('/') {
        Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(raw))
    } else {
        Url::parse(raw)
    };

    parsed.map_err(|e| match e {
        ParseError::RelativeUrlWithoutBase => MappingError::RelativePath { url: raw.to_string() },
        other => MappingError::InvalidUrl {
            url: raw.to_string(),
            reason: other.to_string(),
        },
    })
}

/// URL 원문에서 사용자 정보를 제외한 authority 와 경로 원문을 돌려줍니다.
///
/// url 크레이트는 경로가 없는 URL 에도 `/` 를 채우고 기본 포트를 지우며
/// 경로를 정규화하므로 호스트와 경로의 "원문" 은 여기서 직접 잘라냅니다.
fn split_authority(raw: &str) -> (&str, &str) {
    let rest = match raw.split_once("://") {
        Some((_, rest)) => rest,
        None => raw.trim_start_matches('/'),
    };
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);
    (authority, raw_path(&rest[end..]))
}

/// 쿼리와 프래그먼트를 제외한 경로 원문
fn raw_path(raw: &str) -> &str {
    let end = raw.find(|c: char| matches!(c, '?' | '#')).unwrap_or(raw.len());
    &raw[..end]
}
