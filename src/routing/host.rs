use std::borrow::Cow;

use hyper::{header, Request};

/// 요청의 호스트를 추출합니다.
///
/// absolute-form 요청(`GET http://a.example/x`)이면 요청 URI 의 authority 가
/// `Host` 헤더보다 우선합니다. 그 외에는 `Host` 헤더 값을 포트까지 그대로
/// 사용하고, 둘 다 없으면 빈 문자열입니다.
pub fn request_host<B>(req: &Request<B>) -> Cow<'_, str> {
    if let Some(authority) = req.uri().authority() {
        return Cow::Borrowed(authority.as_str());
    }

    req.headers()
        .get(header::HOST)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .unwrap_or(Cow::Borrowed(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_header_verbatim() {
        let req = Request::builder()
            .uri("/path")
            .header("Host", "Example.com:8080")
            .body(())
            .unwrap();
        assert_eq!(request_host(&req), "Example.com:8080");
    }

    #[test]
    fn test_host_from_absolute_uri() {
        let req = Request::builder()
            .uri("http://a.example/path")
            .body(())
            .unwrap();
        assert_eq!(request_host(&req), "a.example");
    }

    #[test]
    fn test_absolute_uri_wins_over_host_header() {
        let req = Request::builder()
            .uri("http://a.example:8080/old/x")
            .header("Host", "other.example")
            .body(())
            .unwrap();
        assert_eq!(request_host(&req), "a.example:8080");
    }

    #[test]
    fn test_missing_host_is_empty() {
        let req = Request::builder().uri("/path").body(()).unwrap();
        assert_eq!(request_host(&req), "");
    }
}
