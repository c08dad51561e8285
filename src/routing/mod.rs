//! 매핑 모델과 요청 매칭, 경로 재작성을 담당하는 모듈입니다.

mod error;
mod host;
mod mapping;
pub mod matcher;
pub mod rewrite;

pub use error::MappingError;
pub use host::request_host;
pub use mapping::{Mapping, SourcePattern, TargetUrl};
pub use matcher::{PathMatchMode, RequestMatcher};
pub use rewrite::{rewrite_path, rewrite_path_and_query};
