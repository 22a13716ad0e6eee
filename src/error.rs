//! Error types for qradar-health
//!
//! This module defines the error types used throughout the application.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// 로그 파일 설정 에러
#[derive(Error, Debug)]
pub enum LoggingError {
    /// 로그 파일 열기 실패
    #[error("Failed to open log file '{}': {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetcher 모듈 에러 타입
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// 잘못된 요청 URL (호스트 누락 등)
    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// 잘못된 HTTP 헤더
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// CA 번들 로드 실패
    #[error("Failed to load CA bundle '{}': {reason}", .path.display())]
    CaBundle { path: PathBuf, reason: String },

    /// HTTP 요청 실패 (연결 거부, 타임아웃, TLS, DNS)
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// 200 이외의 HTTP 상태 코드
    #[error("Received non-200 status code {status}")]
    HttpStatus { status: StatusCode, body: String },

    /// JSON 파싱 에러
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// 빈 응답 (`[]` 또는 `null`)
    #[error("No data received.")]
    NoData,
}

impl FetchError {
    /// 전송 계층 에러인지 확인
    ///
    /// 요청이 서버 응답까지 도달하지 못한 모든 경우를 하나의 분류로 묶는다.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            FetchError::ClientInit(_)
                | FetchError::InvalidUrl { .. }
                | FetchError::InvalidHeader { .. }
                | FetchError::CaBundle { .. }
                | FetchError::Request(_)
        )
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failure_classification() {
        let err = FetchError::InvalidHeader {
            name: "SEC".to_string(),
            reason: "invalid value".to_string(),
        };
        assert!(err.is_request_failure());
        assert!(!FetchError::NoData.is_request_failure());

        let parse = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert!(!FetchError::from(parse).is_request_failure());
    }

    #[test]
    fn test_http_status_extraction() {
        let err = FetchError::HttpStatus {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        };
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.to_string(), "Received non-200 status code 401 Unauthorized");
        assert_eq!(FetchError::NoData.http_status(), None);
    }

    #[test]
    fn test_no_data_message() {
        assert_eq!(FetchError::NoData.to_string(), "No data received.");
    }
}
