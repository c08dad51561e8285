//! http-route 는 호스트와 경로 접두사 기반으로 요청을 백엔드에 전달하는 경량 HTTP 라우터입니다.
//!
//! # 주요 기능
//!
//! - `(from, to)` 매핑 목록을 순서가 곧 우선순위인 라우팅 체인으로 컴파일
//! - 매칭된 접두사를 목적지 접두사로 치환하는 경로 재작성
//! - 매핑마다 전용 커넥션 풀을 갖는 단일 대상 리버스 프록시
//! - 매칭 실패 시 404 에러 페이지 폴백
//!
//! # 예제
//!
//! ```
//! use http_route::chain::RoutingChain;
//! use http_route::routing::{Mapping, PathMatchMode};
//! use hyper::Request;
//!
//! let mappings = vec![
//!     Mapping::parse("http://a.example/old", "http://b.example/new").unwrap(),
//!     Mapping::parse("/legacy", "http://c.example/dst").unwrap(),
//! ];
//! let chain = RoutingChain::with_not_found(mappings, PathMatchMode::Prefix);
//!
//! let req = Request::builder()
//!     .uri("/legacy/x")
//!     .header("Host", "z.example")
//!     .body(())
//!     .unwrap();
//!
//! let route = chain.resolve(&req).unwrap();
//! assert_eq!(route.mapping().to.host(), "c.example");
//! assert_eq!(route.rewrite(&req), "/dst/x");
//! ```

pub mod chain;
pub mod cli;
pub mod error_page;
pub mod handler;
pub mod logging;
pub mod proxy;
pub mod routing;
pub mod server;
pub mod settings;
