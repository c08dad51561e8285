use std::path::PathBuf;

use clap::Parser;

use crate::routing::PathMatchMode;
use crate::settings::mappings::process_env;
use crate::settings::{MappingSources, Settings};

/// 호스트와 경로 접두사 기반 HTTP 라우터
#[derive(Parser, Debug, Clone)]
#[command(name = "http-route", version)]
#[command(about = "Forwards requests to backends by host and path prefix", long_about = None)]
pub struct Cli {
    /// 수신 포트 (설정값보다 우선)
    #[arg(long)]
    pub port: Option<u16>,

    /// 매핑 JSON. --file 이 있으면 무시됩니다.
    #[arg(long, default_value = "{}")]
    pub json: String,

    /// URL 을 키로, 대체 URL 을 값으로 갖는 매핑 JSON 파일. --json 보다 우선합니다.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// 경로 접두사 비교 방식 (prefix | segment)
    #[arg(long)]
    pub match_mode: Option<PathMatchMode>,

    /// FROM=TO 형태의 매핑
    #[arg(value_name = "FROM=TO")]
    pub mappings: Vec<String>,
}

impl Cli {
    /// 명령줄 옵션으로 설정값을 덮어씁니다.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.server.http_port = port;
        }
        if let Some(mode) = self.match_mode {
            settings.server.match_mode = mode;
        }
    }

    /// 설정 파일, JSON, 환경 변수, 위치 인자를 순서대로 묶은 매핑 소스
    pub fn mapping_sources(&self, settings: &Settings) -> MappingSources {
        MappingSources {
            configured: settings.mappings.clone(),
            json: Some(self.json.clone()),
            file: self.file.clone(),
            env: process_env(),
            args: self.mappings.clone(),
        }
    }
}
