use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::SettingsError;
use super::Result;
use crate::routing::Mapping;

/// 설정 파일의 `[[mappings]]` 항목. 문자열 그대로 보관하고 로드 시점에 검증합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub from: String,
    pub to: String,
}

impl MappingConfig {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn parse(&self) -> Result<Mapping> {
        Mapping::parse(&self.from, &self.to).map_err(|source| SettingsError::InvalidMapping {
            from: self.from.clone(),
            to: self.to.clone(),
            source,
        })
    }
}

/// 매핑 입력 소스들. `load` 는 아래 순서대로 이어 붙이며 앞선 매핑이 우선합니다.
///
/// 1. 설정 파일의 `[[mappings]]`
/// 2. `--file` 의 JSON (없으면 `--json` 인라인 JSON)
/// 3. 환경 변수
/// 4. `from=to` 형태의 위치 인자
#[derive(Debug, Clone, Default)]
pub struct MappingSources {
    pub configured: Vec<MappingConfig>,
    pub json: Option<String>,
    pub file: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub args: Vec<String>,
}

impl MappingSources {
    pub async fn load(self) -> Result<Vec<Mapping>> {
        let mut mappings = Vec::new();

        for config in &self.configured {
            mappings.push(config.parse()?);
        }

        let json = match &self.file {
            Some(path) => Some(read_json_file(path).await?),
            None => self.json.clone(),
        };
        if let Some(json) = json {
            for config in from_json_str(&json)? {
                mappings.push(config.parse()?);
            }
        }

        mappings.extend(from_env_vars(self.env));

        for config in from_args(&self.args) {
            mappings.push(config.parse()?);
        }

        debug!(count = mappings.len(), "매핑 로드 완료");
        Ok(mappings)
    }
}

/// `{"from": "to", ...}` 형태의 JSON 객체를 키 순서대로 읽습니다.
pub fn from_json_str(json: &str) -> Result<Vec<MappingConfig>> {
    let object: Map<String, Value> = serde_json::from_str(json)
        .map_err(|e| SettingsError::JsonParseError { source: e })?;

    object
        .into_iter()
        .map(|(from, to)| match to {
            Value::String(to) => Ok(MappingConfig::new(from, to)),
            _ => Err(SettingsError::InvalidMappingValue { key: from }),
        })
        .collect()
}

async fn read_json_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SettingsError::FileError {
            path: path.to_string_lossy().to_string(),
            error: e,
        })
}

/// 환경 변수 중 매핑으로 보이는 것만 골라 파싱합니다.
///
/// 이름에 `://` 가 있거나 `/` 로 시작하고 값에 `://` 가 있는 변수만 대상이며,
/// 파싱에 실패한 항목은 경고만 남기고 건너뜁니다.
pub fn from_env_vars<I>(vars: I) -> Vec<Mapping>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(key, value)| {
            (key.contains("://") || key.starts_with('/')) && value.contains("://")
        })
        .filter_map(|(key, value)| {
            let config = MappingConfig::new(key, value);
            match config.parse() {
                Ok(mapping) => Some(mapping),
                Err(e) => {
                    warn!(error = %e, "환경 변수 매핑 무시");
                    None
                }
            }
        })
        .collect()
}

/// 프로세스 환경 변수 스냅샷. UTF-8 이 아닌 항목은 제외합니다.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// `from=to` 인자를 첫 번째 `=` 에서 나눕니다. `=` 가 없는 인자는 무시합니다.
pub fn from_args(args: &[String]) -> Vec<MappingConfig> {
    args.iter()
        .filter_map(|arg| arg.split_once('='))
        .map(|(from, to)| MappingConfig::new(from, to))
        .collect()
}
