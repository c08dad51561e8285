use std::net::SocketAddr;

use async_trait::async_trait;
use hyper::body::Incoming;
use hyper::{Request, Response};
use tracing::{debug, info};

use crate::error_page::ErrorPage;
use crate::handler::{Handler, ProxyBody};
use crate::logging::{log_request, RequestLog};
use crate::proxy::Forwarder;
use crate::routing::{request_host, rewrite_path_and_query, Mapping, PathMatchMode, RequestMatcher};

/// 컴파일된 매핑 하나. 판별기와 재작성 규칙, 전용 포워딩 클라이언트를 묶습니다.
pub struct Route {
    mapping: Mapping,
    matcher: RequestMatcher,
    forwarder: Forwarder,
    upstream_error: ErrorPage,
}

impl Route {
    pub fn new(mapping: Mapping, mode: PathMatchMode) -> Self {
        let matcher = RequestMatcher::new(&mapping.from, mode);
        let forwarder = Forwarder::new(&mapping.to);
        Self {
            mapping,
            matcher,
            forwarder,
            upstream_error: ErrorPage::bad_gateway(),
        }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn matches<B>(&self, req: &Request<B>) -> bool {
        self.matcher.matches(&request_host(req), req.uri().path())
    }

    /// 요청 URI 의 경로를 재작성한 `path?query`
    pub fn rewrite<B>(&self, req: &Request<B>) -> String {
        rewrite_path_and_query(&self.mapping.to.path, req.uri(), self.matcher.prefix_len())
    }
}

/// 이미 매칭이 확인된 요청을 목적지로 전달합니다.
#[async_trait]
impl Handler for Route {
    async fn handle(&self, req: Request<Incoming>, remote_addr: SocketAddr) -> Response<ProxyBody> {
        let mut log = RequestLog::new(&req, remote_addr);
        let path_and_query = self.rewrite(&req);
        log.with_resolution(format!("{}{}", self.mapping.to.origin(), path_and_query));

        let result = match self.forwarder.destination(&path_and_query) {
            Ok(destination) => self.forwarder.forward(req, destination, remote_addr).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log.with_error(&e);
                self.upstream_error.response()
            }
        };

        log.with_response(response.status());
        log.finish();
        log_request(&log);
        response
    }
}

/// 매핑 목록을 컴파일한 라우팅 체인입니다.
///
/// 요청마다 `routes` 를 앞에서부터 검사하고 처음 매칭된 매핑이 요청을
/// 처리합니다. 아무것도 매칭되지 않으면 폴백 핸들러가 호출됩니다.
/// 컴파일 이후에는 변경되지 않으므로 `Arc` 로 모든 연결이 공유합니다.
pub struct RoutingChain {
    routes: Vec<Route>,
    fallback: Box<dyn Handler>,
}

impl RoutingChain {
    /// 매핑 순서가 곧 우선순위입니다. 컴파일은 실패하지 않습니다.
    pub fn compile(mappings: Vec<Mapping>, fallback: Box<dyn Handler>, mode: PathMatchMode) -> Self {
        let routes = mappings
            .into_iter()
            .map(|mapping| {
                info!("Mapping {}", mapping);
                Route::new(mapping, mode)
            })
            .collect::<Vec<_>>();

        debug!(routes = routes.len(), mode = ?mode, "라우팅 체인 컴파일 완료");
        Self { routes, fallback }
    }

    /// 404 페이지를 폴백으로 사용하는 체인
    pub fn with_not_found(mappings: Vec<Mapping>, mode: PathMatchMode) -> Self {
        Self::compile(mappings, Box::new(ErrorPage::not_found()), mode)
    }

    /// 요청을 처리할 첫 번째 매핑을 찾습니다.
    pub fn resolve<B>(&self, req: &Request<B>) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(req))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[async_trait]
impl Handler for RoutingChain {
    async fn handle(&self, req: Request<Incoming>, remote_addr: SocketAddr) -> Response<ProxyBody> {
        match self.resolve(&req) {
            Some(route) => route.handle(req, remote_addr).await,
            None => self.fallback.handle(req, remote_addr).await,
        }
    }
}
