use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::HOST;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use http_route::chain::RoutingChain;
use http_route::routing::{Mapping, PathMatchMode};
use http_route::server::{RequestHandler, ServerListener};

// Mock 백엔드: 받은 요청의 Host, 경로, X-Forwarded-For 를 응답 헤더로 돌려주고 바디는 그대로 echo
pub async fn spawn_backend(name: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| async move {
                    let header = |name: &str| {
                        req.headers()
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("")
                            .to_string()
                    };
                    let host = header(HOST.as_str());
                    let forwarded_for = header("x-forwarded-for");
                    let path = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_default();
                    let method = req.method().to_string();

                    let body = req.into_body().collect().await?.to_bytes();

                    let response = Response::builder()
                        .header("x-backend", name)
                        .header("x-seen-host", host)
                        .header("x-seen-path", path)
                        .header("x-seen-method", method)
                        .header("x-seen-forwarded-for", forwarded_for)
                        .body(Full::new(body))
                        .unwrap();
                    Ok::<_, hyper::Error>(response)
                });

                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    addr
}

// 연결을 거부하는 주소 (바인딩 후 바로 닫음)
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub async fn spawn_proxy(mappings: Vec<Mapping>, mode: PathMatchMode) -> SocketAddr {
    let chain = RoutingChain::with_not_found(mappings, mode);
    let listener = ServerListener::bind_addr("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let handler = Arc::new(RequestHandler::new(Arc::new(chain)));
    tokio::spawn(listener.run(handler));
    addr
}

pub fn mapping(from: &str, to: &str) -> Mapping {
    Mapping::parse(from, to).unwrap()
}
