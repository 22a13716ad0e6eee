//! QRadar 헬스 메트릭 HTTP 클라이언트
//!
//! 인증 헤더와 TLS 검증 정책을 적용하여 단일 GET 요청을 수행합니다.
//! 재시도는 하지 않습니다.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Certificate, Client, ClientBuilder, StatusCode};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::record::{decode_metrics, FetchResult, MetricRecord};
use crate::config::{ConnectionProvider, VerifyOption, SEC_HEADER};
use crate::error::FetchError;

/// 헬스 메트릭 API 경로
pub const METRICS_ENDPOINT: &str = "/api/health/metrics/qradar_metrics";

/// 호스트로부터 요청 URL 생성
///
/// # Example
/// ```
/// use qradar_health::fetcher::metrics_url;
///
/// assert_eq!(
///     metrics_url("192.0.2.10"),
///     "https://192.0.2.10/api/health/metrics/qradar_metrics"
/// );
/// ```
pub fn metrics_url(host: &str) -> String {
    format!("https://{host}{METRICS_ENDPOINT}")
}

/// QRadar 메트릭 HTTP 클라이언트
#[derive(Clone)]
pub struct MetricsClient {
    client: Client,
    url: Url,
}

impl MetricsClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `url` - 메트릭 엔드포인트 전체 URL
    /// * `headers` - 모든 요청에 포함할 헤더
    /// * `verify` - TLS 인증서 검증 정책
    /// * `timeout` - 요청 타임아웃 (None이면 클라이언트 기본값)
    ///
    /// # Example
    /// ```ignore
    /// let client = MetricsClient::new(&url, &headers, &VerifyOption::Enabled, None)?;
    /// ```
    pub fn new(
        url: &str,
        headers: &BTreeMap<String, String>,
        verify: &VerifyOption,
        timeout: Option<Duration>,
    ) -> FetchResult<Self> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut builder = ClientBuilder::new().default_headers(header_map(headers)?);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder = match verify {
            VerifyOption::Enabled => builder,
            VerifyOption::Disabled => builder.danger_accept_invalid_certs(true),
            VerifyOption::CaBundle(path) => builder.add_root_certificate(load_ca_bundle(path)?),
        };

        let client = builder.build().map_err(FetchError::ClientInit)?;

        Ok(Self {
            client,
            url: parsed,
        })
    }

    /// 연결 정보 제공자로부터 클라이언트 생성
    ///
    /// `ip_QRadar`가 없으면 빈 호스트로 URL을 만들고, 이는 요청 실패로 보고됩니다.
    pub fn from_provider<P>(provider: &P) -> FetchResult<Self>
    where
        P: ConnectionProvider + ?Sized,
    {
        let settings = provider.read_config();
        let url = metrics_url(settings.host());

        // `https:///api/...` would otherwise parse with "api" as the host
        if settings.host().is_empty() {
            return Err(FetchError::InvalidUrl {
                url,
                source: url::ParseError::EmptyHost,
            });
        }

        Self::new(
            &url,
            &provider.qradar_headers(),
            &provider.verify_option(),
            settings.timeout_ms.map(Duration::from_millis),
        )
    }

    /// 요청 URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 메트릭 조회
    ///
    /// 상태 코드와 응답 헤더는 결과와 관계없이 DEBUG로 기록됩니다.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> FetchResult<Vec<MetricRecord>> {
        debug!("Sending QRadar metrics request");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Status Code");
        debug!(headers = ?response.headers(), "Response Headers");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "Response content unreadable");
                String::new()
            });
            return Err(FetchError::HttpStatus { status, body });
        }

        let body = response.text().await.map_err(FetchError::Request)?;

        decode_metrics(&body)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> FetchResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let invalid = |reason: String| FetchError::InvalidHeader {
            name: name.clone(),
            reason,
        };

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let mut header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;

        if header_name.as_str().eq_ignore_ascii_case(SEC_HEADER) {
            header_value.set_sensitive(true);
        }

        map.insert(header_name, header_value);
    }

    Ok(map)
}

fn load_ca_bundle(path: &Path) -> FetchResult<Certificate> {
    let ca_error = |reason: String| FetchError::CaBundle {
        path: path.to_path_buf(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| ca_error(e.to_string()))?;
    Certificate::from_pem(&pem).map_err(|e| ca_error(e.to_string()))
}
