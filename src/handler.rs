use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response};

/// 모든 핸들러가 돌려주는 스트리밍 응답 바디
pub type ProxyBody = UnsyncBoxBody<Bytes, hyper::Error>;

/// 요청 핸들러 트레이트
///
/// 매핑 하나(`Route`), 체인 전체(`RoutingChain`), 폴백 페이지(`ErrorPage`)가
/// 모두 이 인터페이스를 구현합니다. 실패는 전부 응답으로 변환되므로
/// 에러를 반환하지 않습니다.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: Request<Incoming>, remote_addr: SocketAddr) -> Response<ProxyBody>;
}

/// 고정 바이트를 응답 바디로 변환합니다.
pub fn full_body(bytes: impl Into<Bytes>) -> ProxyBody {
    Full::new(bytes.into()).map_err(|never| match never {}).boxed_unsync()
}
