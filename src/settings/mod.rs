use std::{env, path::Path};
use serde::Deserialize;
use tracing::debug;

mod server;
pub mod logging;
mod error;
pub mod mappings;

pub use server::ServerSettings;
pub use logging::LogSettings;
pub use error::SettingsError;
pub use mappings::{MappingConfig, MappingSources};

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 설정 파일에 정의된 매핑 (순서 = 우선순위)
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("PROXY_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("설정 파일 로드: {}", path.as_ref().display());
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            mappings: Vec::new(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증. 매핑 URL 도 리스너를 열기 전에 여기서 걸러집니다.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        for mapping in &self.mappings {
            mapping.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PathMatchMode;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_from_toml() {
        let toml_content = r#"
            [server]
            http_port = 8080
            match_mode = "segment"

            [logging]
            format = "json"
            level = "info"

            [[mappings]]
            from = "http://a.example/old"
            to = "http://b.example/new"

            [[mappings]]
            from = "/legacy"
            to = "http://c.example/dst"
        "#;

        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.server.http_port, 8080);
        assert_eq!(settings.server.match_mode, PathMatchMode::Segment);
        assert_eq!(settings.mappings.len(), 2);
        assert_eq!(settings.mappings[1], MappingConfig::new("/legacy", "http://c.example/dst"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.server.http_port, 80);
        assert_eq!(settings.server.match_mode, PathMatchMode::Prefix);
        assert!(settings.mappings.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_mapping_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("http-route.toml");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(
            br#"
            [[mappings]]
            from = "/ok"
            to = "gopher://c.example"
            "#,
        )
        .unwrap();

        let result = Settings::from_toml_file(&file_path).await;
        assert!(matches!(result, Err(SettingsError::InvalidMapping { .. })));
    }

    #[tokio::test]
    async fn test_zero_port_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("http-route.toml");
        std::fs::write(&file_path, "[server]\nhttp_port = 0\n").unwrap();

        let result = Settings::from_toml_file(&file_path).await;
        assert!(matches!(result, Err(SettingsError::InvalidConfig(_))));
    }
}
