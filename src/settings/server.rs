use serde::Deserialize;
use std::env;

use super::SettingsError;
use crate::routing::PathMatchMode;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerSettings {
    /// HTTP 포트 (기본값: 80)
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// 경로 접두사 비교 방식 (기본값: prefix)
    #[serde(default)]
    pub match_mode: PathMatchMode,
}

fn default_http_port() -> u16 { 80 }

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    const MIN_PORT: u16 = 1;

    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            http_port: parse_env_var("PROXY_HTTP_PORT", default_http_port)?,
            match_mode: parse_env_var("PROXY_MATCH_MODE", PathMatchMode::default)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.http_port < Self::MIN_PORT {
            return Err(SettingsError::InvalidConfig(
                "포트는 0이 될 수 없습니다".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            match_mode: PathMatchMode::default(),
        }
    }
}
