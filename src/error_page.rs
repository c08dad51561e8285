use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};

use crate::handler::{full_body, Handler, ProxyBody};
use crate::logging::{log_request, RequestLog};

const SERVER_SIGNATURE: &str = concat!("http-route/", env!("CARGO_PKG_VERSION"));

// 브라우저는 512 바이트보다 짧은 에러 응답을 자체 "친절한" 에러 페이지로 바꿔치기한다
const PADDING: &str = "<!-- a padding to disable MSIE and Chrome friendly error page -->\n";
const PADDING_LINES: usize = 6;

/// 매칭되는 매핑이 없을 때 호출되는 종단 핸들러입니다.
///
/// 상태 코드는 하나의 `StatusCode` 값에서만 나오므로 상태 줄과 HTML 본문의
/// 코드가 어긋날 수 없습니다.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    status: StatusCode,
    body: Bytes,
}

impl ErrorPage {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: Bytes::from(render(status)),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn bad_gateway() -> Self {
        Self::new(StatusCode::BAD_GATEWAY)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `"404 Not Found"` 형태의 상태 문자열
    pub fn status_line(&self) -> String {
        format!(
            "{} {}",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Unknown")
        )
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// 렌더링된 페이지로 응답을 만듭니다. 로그는 남기지 않습니다.
    pub fn response(&self) -> Response<ProxyBody> {
        let mut response = Response::new(full_body(self.body.clone()));
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }
}

#[async_trait]
impl Handler for ErrorPage {
    async fn handle(&self, req: Request<Incoming>, remote_addr: SocketAddr) -> Response<ProxyBody> {
        let mut log = RequestLog::new(&req, remote_addr);
        log.with_resolution(self.status_line());
        log.with_response(self.status);
        log.finish();
        log_request(&log);

        self.response()
    }
}

fn render(status: StatusCode) -> String {
    let code = status.as_u16();
    let text = status.canonical_reason().unwrap_or("Unknown");

    let mut page = format!(
        "<html>\n\
         <head><title>{code} {text}</title></head>\n\
         <body>\n\
         <center><h1>{code} {text}</h1></center>\n\
         <hr><center>{SERVER_SIGNATURE}</center>\n\
         </body>\n\
         </html>\n"
    );
    for _ in 0..PADDING_LINES {
        page.push_str(PADDING);
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_single_sourced() {
        for status in [StatusCode::NOT_FOUND, StatusCode::BAD_GATEWAY, StatusCode::GONE] {
            let page = ErrorPage::new(status);
            let response = page.response();
            let body = std::str::from_utf8(page.body()).unwrap();

            assert_eq!(response.status(), status);
            assert!(
                body.contains(&format!("<title>{}</title>", page.status_line())),
                "본문에 상태 {} 가 없음",
                status
            );
        }
    }

    #[test]
    fn test_stock_pages() {
        assert_eq!(ErrorPage::not_found().status_line(), "404 Not Found");
        assert_eq!(ErrorPage::bad_gateway().status_line(), "502 Bad Gateway");
    }

    #[test]
    fn test_padding_defeats_friendly_error_pages() {
        let page = ErrorPage::not_found();
        assert!(page.body().len() > 512);
        assert!(std::str::from_utf8(page.body()).unwrap().contains(SERVER_SIGNATURE));
    }

    #[test]
    fn test_content_type() {
        let response = ErrorPage::not_found().response();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }
}
