//! QRadar 메트릭 레코드 파서
//!
//! `/api/health/metrics/qradar_metrics` 응답 본문을 레코드 목록으로 변환하고
//! MBean 필터와 출력 포맷을 제공합니다.

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

use crate::error::FetchError;

/// Fetcher 작업 결과 타입
pub type FetchResult<T> = Result<T, FetchError>;

/// 값이 없는 필드의 출력값
pub const NOT_AVAILABLE: &str = "N/A";

/// 메트릭 목록 앞에 출력되는 헤더
pub const METRICS_HEADER: &str = "QRadar Metrics Data:";

/// 단일 메트릭 레코드
///
/// 모든 필드는 선택 사항이며 `null` 값은 누락과 동일하게 취급합니다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricRecord {
    /// 컴포넌트 종류
    #[serde(default)]
    pub component_type: Option<Value>,
    /// 메트릭 ID (MBean 필터 대상)
    #[serde(default)]
    pub metric_id: Option<Value>,
    /// 수집 주기
    #[serde(default)]
    pub time_resolution: Option<Value>,
    /// 컴포넌트 이름
    #[serde(default)]
    pub component_name: Option<Value>,
    /// 활성화 여부
    #[serde(default)]
    pub enabled: Option<Value>,
}

impl MetricRecord {
    /// 메트릭 ID 문자열 (누락 또는 null이면 None)
    pub fn metric_id_text(&self) -> Option<Cow<'_, str>> {
        match &self.metric_id {
            None | Some(Value::Null) => None,
            Some(value) => Some(render_value(Some(value))),
        }
    }

    /// 출력용 한 줄 요약
    pub fn summary_line(&self) -> String {
        format!(
            "Component Type: {}, Metric ID: {}, Time Resolution: {}, Component Name: {}, Enabled: {}",
            render_value(self.component_type.as_ref()),
            render_value(self.metric_id.as_ref()),
            render_value(self.time_resolution.as_ref()),
            render_value(self.component_name.as_ref()),
            render_value(self.enabled.as_ref()),
        )
    }
}

/// 필드 값을 출력 문자열로 변환
///
/// 불리언은 `True`/`False`, 중첩 값은 compact JSON으로 출력합니다.
pub fn render_value(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(NOT_AVAILABLE),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(true)) => Cow::Borrowed("True"),
        Some(Value::Bool(false)) => Cow::Borrowed("False"),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// MBean 이름 필터
///
/// 대소문자를 구분하는 단순 부분 문자열 비교입니다. 와일드카드나 정규식은
/// 지원하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricFilter {
    query: Option<String>,
}

impl MetricFilter {
    /// 새 필터 생성 (빈 문자열은 필터 없음)
    pub fn new(query: Option<&str>) -> Self {
        Self {
            query: query.filter(|q| !q.is_empty()).map(str::to_owned),
        }
    }

    /// 설정된 쿼리
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// 레코드 포함 여부
    ///
    /// `metric_id`가 있고 쿼리를 포함하지 않을 때만 제외됩니다.
    pub fn matches(&self, record: &MetricRecord) -> bool {
        match (self.query.as_deref(), record.metric_id_text()) {
            (Some(query), Some(metric_id)) => metric_id.contains(query),
            _ => true,
        }
    }
}

/// 응답 본문 파싱
///
/// `null` 또는 빈 배열은 [`FetchError::NoData`]를 반환합니다.
pub fn decode_metrics(body: &str) -> FetchResult<Vec<MetricRecord>> {
    let records: Option<Vec<MetricRecord>> = serde_json::from_str(body)?;

    match records {
        Some(records) if !records.is_empty() => Ok(records),
        _ => Err(FetchError::NoData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_id(metric_id: Value) -> MetricRecord {
        MetricRecord {
            metric_id: Some(metric_id),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_line_full_record() {
        let records = decode_metrics(
            r#"[{"component_type":"EPS","metric_id":"ecs-ec-ingress.EPS","time_resolution":"MINUTE","component_name":"ECS","enabled":true}]"#,
        )
        .unwrap();

        assert_eq!(
            records[0].summary_line(),
            "Component Type: EPS, Metric ID: ecs-ec-ingress.EPS, Time Resolution: MINUTE, Component Name: ECS, Enabled: True"
        );
    }

    #[test]
    fn test_summary_line_missing_fields() {
        let records = decode_metrics(r#"[{"metric_id": "x", "enabled": null}]"#).unwrap();
        assert_eq!(
            records[0].summary_line(),
            "Component Type: N/A, Metric ID: x, Time Resolution: N/A, Component Name: N/A, Enabled: N/A"
        );
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(None), "N/A");
        assert_eq!(render_value(Some(&Value::Null)), "N/A");
        assert_eq!(render_value(Some(&json!(false))), "False");
        assert_eq!(render_value(Some(&json!(60))), "60");
        assert_eq!(render_value(Some(&json!(1.5))), "1.5");
        assert_eq!(render_value(Some(&json!("true"))), "true");
        assert_eq!(render_value(Some(&json!(["a", 1]))), r#"["a",1]"#);
    }

    #[test]
    fn test_filter_case_sensitive_substring() {
        let filter = MetricFilter::new(Some("JVM"));
        assert!(filter.matches(&record_with_id(json!("com.ibm.si.JVM.heap"))));
        assert!(!filter.matches(&record_with_id(json!("com.ibm.si.jvm.heap"))));
    }

    #[test]
    fn test_filter_is_literal() {
        let filter = MetricFilter::new(Some("JVM.*"));
        assert!(!filter.matches(&record_with_id(json!("com.ibm.si.JVM.heap"))));
        assert!(filter.matches(&record_with_id(json!("pool.JVM.*.size"))));
    }

    #[test]
    fn test_filter_keeps_records_without_metric_id() {
        let filter = MetricFilter::new(Some("JVM"));
        assert!(filter.matches(&MetricRecord::default()));
        assert!(filter.matches(&record_with_id(Value::Null)));
    }

    #[test]
    fn test_filter_excludes_empty_metric_id() {
        let filter = MetricFilter::new(Some("JVM"));
        assert!(!filter.matches(&record_with_id(json!(""))));
    }

    #[test]
    fn test_no_filter_matches_everything() {
        for filter in [MetricFilter::new(None), MetricFilter::new(Some(""))] {
            assert_eq!(filter.query(), None);
            assert!(filter.matches(&record_with_id(json!("anything"))));
        }
    }

    #[test]
    fn test_decode_empty_payloads() {
        assert!(matches!(decode_metrics("[]"), Err(FetchError::NoData)));
        assert!(matches!(decode_metrics("null"), Err(FetchError::NoData)));
    }

    #[test]
    fn test_decode_invalid_payloads() {
        assert!(matches!(decode_metrics("not json"), Err(FetchError::JsonParse(_))));
        assert!(matches!(decode_metrics(""), Err(FetchError::JsonParse(_))));
        assert!(matches!(
            decode_metrics(r#"{"metric_id": "x"}"#),
            Err(FetchError::JsonParse(_))
        ));
        assert!(matches!(decode_metrics(r#"["x"]"#), Err(FetchError::JsonParse(_))));
    }

    #[test]
    fn test_decode_ignores_unknown_fields_and_keeps_duplicates() {
        let records = decode_metrics(
            r#"[{"metric_id": "a", "extra": 1}, {"metric_id": "a", "extra": 1}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }
}
