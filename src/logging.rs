use std::ffi::OsStr;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

use hyper::{Request, StatusCode};
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::routing::request_host;
use crate::settings::logging::{LogFormat, LogOutput, LogSettings};

const DEFAULT_LOG_FILE: &str = "http-route.log";

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 전역 tracing 구독자를 설치합니다.
///
/// `RUST_LOG` 지시어가 있으면 설정된 레벨보다 우선합니다. 반환된 가드는
/// 프로세스가 끝날 때까지 유지해야 버퍼된 로그가 유실되지 않습니다.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard, InitError> {
    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
            tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name))
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(matches!(settings.output, LogOutput::Stdout))
        .with_target(true);

    match settings.format {
        LogFormat::Json => builder.json().try_init()?,
        LogFormat::Text => builder.try_init()?,
    }

    Ok(guard)
}

/// 요청 하나에 대한 로그 레코드. 요청당 정확히 한 번 `log_request` 로 출력됩니다.
#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub remote_addr: SocketAddr,
    pub method: String,
    pub url: String,
    /// 재작성된 목적지 URL 또는 폴백 상태 ("404 Not Found")
    pub resolution: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub error: Option<String>,
    started: Instant,
}

impl RequestLog {
    pub fn new<B>(req: &Request<B>, remote_addr: SocketAddr) -> Self {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Self {
            request_id: Uuid::new_v4().to_string(),
            remote_addr,
            method: req.method().to_string(),
            url: format!("http://{}{}", request_host(req), path_and_query),
            resolution: String::new(),
            status_code: 0,
            duration_ms: 0,
            error: None,
            started: Instant::now(),
        }
    }

    pub fn with_resolution(&mut self, resolution: impl Into<String>) {
        self.resolution = resolution.into();
    }

    pub fn with_response(&mut self, status: StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_error(&mut self, error: impl Display) {
        self.error = Some(error.to_string());
    }

    pub fn finish(&mut self) {
        self.duration_ms = self.started.elapsed().as_millis() as u64;
    }

    fn level(&self) -> Level {
        if self.error.is_some() {
            Level::ERROR
        } else if self.status_code >= 400 {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

pub fn log_request(log: &RequestLog) {
    match log.level() {
        Level::ERROR => error!(
            request_id = %log.request_id,
            remote_addr = %log.remote_addr,
            method = %log.method,
            url = %log.url,
            resolution = %log.resolution,
            status = log.status_code,
            duration_ms = log.duration_ms,
            error = ?log.error,
            "{} {} {} -> {}", log.remote_addr, log.method, log.url, log.resolution
        ),
        Level::WARN => warn!(
            request_id = %log.request_id,
            remote_addr = %log.remote_addr,
            method = %log.method,
            url = %log.url,
            resolution = %log.resolution,
            status = log.status_code,
            duration_ms = log.duration_ms,
            "{} {} {} -> {}", log.remote_addr, log.method, log.url, log.resolution
        ),
        _ => info!(
            request_id = %log.request_id,
            remote_addr = %log.remote_addr,
            method = %log.method,
            url = %log.url,
            resolution = %log.resolution,
            status = log.status_code,
            duration_ms = log.duration_ms,
            "{} {} {} -> {}", log.remote_addr, log.method, log.url, log.resolution
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> SocketAddr {
        "10.0.0.7:51234".parse().unwrap()
    }

    #[test]
    fn test_request_log_captures_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/old/page?x=1")
            .header("Host", "a.example")
            .body(())
            .unwrap();

        let log = RequestLog::new(&req, remote());
        assert_eq!(log.method, "POST");
        assert_eq!(log.url, "http://a.example/old/page?x=1");
        assert_eq!(log.remote_addr, remote());
        assert!(!log.request_id.is_empty());
    }

    #[test]
    fn test_level_selection() {
        let req = Request::builder().uri("/").body(()).unwrap();

        let mut log = RequestLog::new(&req, remote());
        log.with_response(StatusCode::OK);
        assert_eq!(log.level(), Level::INFO);

        log.with_response(StatusCode::NOT_FOUND);
        assert_eq!(log.level(), Level::WARN);

        log.with_error("connection refused");
        assert_eq!(log.level(), Level::ERROR);
    }
}
