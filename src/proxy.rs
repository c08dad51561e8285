use std::fmt;
use std::net::SocketAddr;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::{Request, Response, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{self, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::handler::ProxyBody;
use crate::routing::TargetUrl;

type HttpClient = legacy::Client<HttpsConnector<HttpConnector>, Incoming>;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

// Connection 헤더에 나열된 것과 별개로 항상 제거하는 hop-by-hop 헤더
const HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
];

/// 포워딩 실패 원인
#[derive(Debug)]
pub enum ForwardError {
    /// 재작성된 URI 가 유효하지 않음
    InvalidUri {
        uri: String,
        reason: String,
    },
    /// 백엔드 연결 또는 응답 수신 실패
    Upstream(legacy::Error),
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardError::InvalidUri { uri, reason } =>
                write!(f, "잘못된 포워딩 URI {}: {}", uri, reason),
            ForwardError::Upstream(e) =>
                write!(f, "백엔드 요청 실패: {}", e),
        }
    }
}

impl std::error::Error for ForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForwardError::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

/// 하나의 목적지에 바인딩된 포워딩 클라이언트입니다.
///
/// 매핑마다 한 번 생성되어 요청 간에 재사용되며, 자기 백엔드 전용
/// 커넥션 풀을 가집니다.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    target: TargetUrl,
}

impl Forwarder {
    pub fn new(target: &TargetUrl) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = legacy::Client::builder(TokioExecutor::new())
            .build::<_, Incoming>(connector);

        Self {
            client,
            target: target.clone(),
        }
    }

    pub fn target(&self) -> &TargetUrl {
        &self.target
    }

    /// 재작성된 경로로 목적지 URI 를 만듭니다.
    pub fn destination(&self, path_and_query: &str) -> Result<Uri, ForwardError> {
        Uri::builder()
            .scheme(self.target.scheme.clone())
            .authority(self.target.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ForwardError::InvalidUri {
                uri: format!("{}{}", self.target.origin(), path_and_query),
                reason: e.to_string(),
            })
    }

    /// 요청을 목적지로 보내고 응답을 스트리밍으로 돌려줍니다.
    ///
    /// 메서드, 헤더, 바디는 그대로 복사하고 경로와 `Host` 헤더만 바꿉니다.
    /// 클라이언트가 끊겨 이 future 가 drop 되면 백엔드 요청도 함께 취소됩니다.
    pub async fn forward(
        &self,
        req: Request<Incoming>,
        destination: Uri,
        remote_addr: SocketAddr,
    ) -> Result<Response<ProxyBody>, ForwardError> {
        let (mut parts, body) = req.into_parts();

        parts.uri = destination;
        remove_hop_headers(&mut parts.headers);
        parts.headers.insert(header::HOST, self.target.host_header().clone());
        append_forwarded_for(&mut parts.headers, remote_addr);

        debug!(uri = %parts.uri, "백엔드로 요청 전달");

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(ForwardError::Upstream)?;

        let (mut parts, body) = response.into_parts();
        remove_hop_headers(&mut parts.headers);
        Ok(Response::from_parts(parts, body.boxed_unsync()))
    }
}

/// hop-by-hop 헤더를 제거합니다. `Connection` 헤더에 나열된 헤더도 포함됩니다.
pub fn remove_hop_headers(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_HEADERS {
        headers.remove(name);
    }
    headers.remove(header::UPGRADE);
}

/// `X-Forwarded-For` 에 호출자 IP 를 덧붙입니다.
pub fn append_forwarded_for(headers: &mut HeaderMap, remote_addr: SocketAddr) {
    let client_ip = remote_addr.ip().to_string();
    let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{}, {}", existing, client_ip),
        _ => client_ip,
    };

    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, X-Session"));
        headers.insert("x-session", HeaderValue::from_static("abc"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));

        remove_hop_headers(&mut headers);

        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("x-session").is_none());
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert!(headers.get(header::UPGRADE).is_none());
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "text/html");
    }

    #[test]
    fn test_append_forwarded_for() {
        let remote: SocketAddr = "192.0.2.10:40000".parse().unwrap();

        let mut headers = HeaderMap::new();
        append_forwarded_for(&mut headers, remote);
        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "192.0.2.10");

        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.1"));
        append_forwarded_for(&mut headers, remote);
        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "198.51.100.1, 192.0.2.10");
    }

    #[test]
    fn test_destination_uri() {
        let target = TargetUrl::parse("http://b.example:8080/new").unwrap();
        let forwarder = Forwarder::new(&target);

        let uri = forwarder.destination("/new/page?x=1").unwrap();
        assert_eq!(uri.to_string(), "http://b.example:8080/new/page?x=1");
        assert_eq!(forwarder.target().host(), "b.example:8080");
    }
}
