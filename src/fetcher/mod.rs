//! QRadar 헬스 메트릭 조회 모듈
//!
//! `/api/health/metrics/qradar_metrics` 엔드포인트에서 메트릭 목록을 가져와
//! MBean 필터를 적용한 뒤 출력합니다. 모든 실패는 로그로만 남기고
//! 호출자에게 전파하지 않습니다.
//!
//! # Example
//!
//! ```ignore
//! use qradar_health::{config::Config, fetcher, logging::Logger};
//!
//! let logger = Logger::setup(false)?;
//! let config = Config::load("config.yaml")?;
//! let mut stdout = std::io::stdout().lock();
//! fetcher::fetch_and_print(&logger, &config, Some("JVM"), &mut stdout).await;
//! ```

mod client;
mod record;

pub use client::{metrics_url, MetricsClient, METRICS_ENDPOINT};
pub use record::{
    decode_metrics, render_value, FetchResult, MetricFilter, MetricRecord, METRICS_HEADER,
    NOT_AVAILABLE,
};

use std::io::{self, Write};
use tracing::instrument::WithSubscriber;
use tracing::{debug, error};

use crate::config::ConnectionProvider;
use crate::error::FetchError;
use crate::logging::Logger;

/// 한 번의 조회 결과
///
/// 정보 제공용이며 어떤 결과든 프로세스는 정상 종료합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 헤더와 레코드 출력 완료
    Printed {
        /// 응답에 포함된 레코드 수
        total: usize,
        /// 필터를 통과하여 출력된 레코드 수
        shown: usize,
    },
    /// 빈 응답
    NoData,
    /// JSON 파싱 실패
    InvalidJson,
    /// 200 이외의 상태 코드
    HttpStatus(u16),
    /// 전송 계층 실패
    RequestFailed,
    /// 표준 출력 쓰기 실패
    OutputFailed,
}

/// 설정을 읽어 메트릭을 조회하고 `out`에 출력
///
/// 로그는 `logger`로만 기록됩니다.
pub async fn fetch_and_print<P, W>(
    logger: &Logger,
    provider: &P,
    mbean_query: Option<&str>,
    out: &mut W,
) -> FetchOutcome
where
    P: ConnectionProvider + ?Sized,
    W: Write,
{
    async {
        match MetricsClient::from_provider(provider) {
            Ok(client) => run(&client, mbean_query, out).await,
            Err(e) => report_failure(&e),
        }
    }
    .with_subscriber(logger.dispatch().clone())
    .await
}

/// 이미 구성된 클라이언트로 조회 및 출력
pub async fn fetch_and_print_with<W: Write>(
    logger: &Logger,
    client: &MetricsClient,
    mbean_query: Option<&str>,
    out: &mut W,
) -> FetchOutcome {
    run(client, mbean_query, out)
        .with_subscriber(logger.dispatch().clone())
        .await
}

/// 헤더와 필터를 통과한 레코드를 출력하고 출력된 레코드 수를 반환
pub fn print_metrics<W: Write>(
    records: &[MetricRecord],
    filter: &MetricFilter,
    out: &mut W,
) -> io::Result<usize> {
    writeln!(out, "{METRICS_HEADER}")?;

    let mut shown = 0;
    for record in records.iter().filter(|r| filter.matches(r)) {
        writeln!(out, "{}", record.summary_line())?;
        shown += 1;
    }

    out.flush()?;
    Ok(shown)
}

async fn run<W: Write>(
    client: &MetricsClient,
    mbean_query: Option<&str>,
    out: &mut W,
) -> FetchOutcome {
    let records = match client.fetch().await {
        Ok(records) => records,
        Err(e) => return report_failure(&e),
    };

    let filter = MetricFilter::new(mbean_query);
    match print_metrics(&records, &filter, out) {
        Ok(shown) => {
            debug!(
                total = records.len(),
                shown,
                query = filter.query().unwrap_or_default(),
                "Metrics printed"
            );
            FetchOutcome::Printed {
                total: records.len(),
                shown,
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to write metrics output");
            FetchOutcome::OutputFailed
        }
    }
}

fn report_failure(err: &FetchError) -> FetchOutcome {
    match err {
        FetchError::HttpStatus { status, body } => {
            error!(status = status.as_u16(), "Received non-200 status code");
            debug!(body = %body, "Response content");
            FetchOutcome::HttpStatus(status.as_u16())
        }
        FetchError::JsonParse(e) => {
            error!(error = %e, "Error parsing JSON response");
            FetchOutcome::InvalidJson
        }
        FetchError::NoData => {
            error!("No data received.");
            FetchOutcome::NoData
        }
        _ => {
            error!(error = %err, "Request failed");
            FetchOutcome::RequestFailed
        }
    }
}
