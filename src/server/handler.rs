use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};

use crate::chain::RoutingChain;
use crate::handler::{Handler, ProxyBody};

/// 연결 하나를 HTTP/1 로 서비스하며 모든 요청을 라우팅 체인에 넘깁니다.
pub struct RequestHandler {
    chain: Arc<RoutingChain>,
}

impl RequestHandler {
    pub fn new(chain: Arc<RoutingChain>) -> Self {
        Self { chain }
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
        remote_addr: SocketAddr,
    ) -> Result<Response<ProxyBody>, Infallible> {
        Ok(self.chain.handle(req, remote_addr).await)
    }

    pub async fn handle_connection<I>(&self, io: I, remote_addr: SocketAddr) -> Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(|req| self.handle_request(req, remote_addr)),
            )
            .await
    }
}
