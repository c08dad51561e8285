use std::str::FromStr;

use serde::Deserialize;

use crate::routing::mapping::SourcePattern;

/// 경로 접두사 비교 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMatchMode {
    /// 바이트 단위 접두사 비교. `/foo` 는 `/foobar` 와도 매칭된다.
    #[default]
    Prefix,
    /// 접두사가 경로 세그먼트 경계에서 끝나야 매칭된다.
    Segment,
}

impl FromStr for PathMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" => Ok(PathMatchMode::Prefix),
            "segment" => Ok(PathMatchMode::Segment),
            _ => Err(format!("Invalid path match mode: {}", s)),
        }
    }
}

/// 하나의 매핑에 대한 요청 판별기입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMatcher {
    host: String,
    path: String,
    mode: PathMatchMode,
}

impl RequestMatcher {
    pub fn new(pattern: &SourcePattern, mode: PathMatchMode) -> Self {
        Self {
            host: pattern.host.clone(),
            path: pattern.path.clone(),
            mode,
        }
    }

    /// 호스트가 비어 있으면 모든 호스트, 아니면 정확히 같은 호스트만 매칭
    pub fn matches_host(&self, host: &str) -> bool {
        self.host.is_empty() || self.host == host
    }

    pub fn matches_path(&self, path: &str) -> bool {
        if !path.as_bytes().starts_with(self.path.as_bytes()) {
            return false;
        }

        match self.mode {
            PathMatchMode::Prefix => true,
            PathMatchMode::Segment => {
                self.path.is_empty()
                    || self.path.ends_with('/')
                    || matches!(path.as_bytes().get(self.path.len()), None | Some(&b'/'))
            }
        }
    }

    pub fn matches(&self, host: &str, path: &str) -> bool {
        self.matches_host(host) && self.matches_path(path)
    }

    /// 매칭된 접두사 길이. 재작성 시 요청 경로에서 잘라낼 길이입니다.
    pub fn prefix_len(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(raw: &str, mode: PathMatchMode) -> RequestMatcher {
        RequestMatcher::new(&SourcePattern::parse(raw).unwrap(), mode)
    }

    #[test]
    fn test_host_matching() {
        let scoped = matcher("http://a.example/old", PathMatchMode::Prefix);
        assert!(scoped.matches_host("a.example"));
        assert!(!scoped.matches_host("A.example"));
        assert!(!scoped.matches_host("a.example:80"));
        assert!(!scoped.matches_host(""));

        let agnostic = matcher("/legacy", PathMatchMode::Prefix);
        assert!(agnostic.matches_host("z.example"));
        assert!(agnostic.matches_host(""));
    }

    #[test]
    fn test_prefix_matching() {
        let test_cases = vec![
            // (패턴, 요청 경로, 예상 결과)
            ("/foo", "/foo", true),
            ("/foo", "/foo/bar", true),
            ("/foo", "/foobar", true),
            ("/foo", "/fo", false),
            ("/foo", "/bar/foo", false),
            ("/foo/", "/foo", false),
            ("http://a.example", "/anything", true),
            ("", "/", true),
        ];

        for (pattern, path, expected) in test_cases {
            assert_eq!(
                matcher(pattern, PathMatchMode::Prefix).matches_path(path),
                expected,
                "패턴: '{}', 경로: '{}'",
                pattern,
                path
            );
        }
    }

    #[test]
    fn test_segment_matching() {
        let test_cases = vec![
            ("/foo", "/foo", true),
            ("/foo", "/foo/bar", true),
            ("/foo", "/foobar", false),
            ("/foo/", "/foo/bar", true),
            ("/foo/", "/foo", false),
            ("/", "/anything", true),
            ("", "/anything", true),
        ];

        for (pattern, path, expected) in test_cases {
            assert_eq!(
                matcher(pattern, PathMatchMode::Segment).matches_path(path),
                expected,
                "패턴: '{}', 경로: '{}'",
                pattern,
                path
            );
        }
    }

    #[test]
    fn test_both_host_and_path_required() {
        let m = matcher("http://a.example/old", PathMatchMode::Prefix);
        assert!(m.matches("a.example", "/old/page"));
        assert!(!m.matches("a.example", "/other"));
        assert!(!m.matches("b.example", "/old/page"));
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("segment".parse::<PathMatchMode>(), Ok(PathMatchMode::Segment));
        assert_eq!("PREFIX".parse::<PathMatchMode>(), Ok(PathMatchMode::Prefix));
        assert!("regex".parse::<PathMatchMode>().is_err());
    }
}
