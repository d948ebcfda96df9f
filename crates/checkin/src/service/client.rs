//! HTTP client for the attendance service.
//!
//! The service exposes a single endpoint: `GET ?record={id}` returns the
//! history as a JSON array, `POST` with a JSON body registers a check-in.

use std::time::Duration;

use asistencia_common::AttendanceRecord;
use async_trait::async_trait;

use super::{AttendanceService, CheckInAck, CheckInRequest, ServiceError};

/// Attendance service reached over HTTP
pub struct HttpAttendanceService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAttendanceService {
    /// Create a client with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl AttendanceService for HttpAttendanceService {
    async fn fetch_records(&self, record_id: i64) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("record", record_id)])
            .send()
            .await?;

        let body: serde_json::Value = Self::ensure_success(response).await?.json().await?;
        let records = records_from_json(body);

        tracing::debug!(record_id, count = records.len(), "Fetched attendance history");

        Ok(records)
    }

    async fn submit_check_in(&self, request: &CheckInRequest) -> Result<CheckInAck, ServiceError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await?;

        let body: serde_json::Value = Self::ensure_success(response).await?.json().await?;

        Ok(CheckInAck::from_json(&body))
    }
}

/// Anything other than an array is an empty history. Elements that do not
/// decode are skipped; the rest are kept in order.
fn records_from_json(body: serde_json::Value) -> Vec<AttendanceRecord> {
    let serde_json::Value::Array(items) = body else {
        tracing::debug!("History payload is not an array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| tracing::warn!(index, error = %e, "Skipping malformed attendance record"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::get,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;

    const ENDPOINT: &str = "/api/examen.php";

    /// Serve `router` on an ephemeral port, returning the endpoint URL
    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}{ENDPOINT}")
    }

    fn client(url: String) -> HttpAttendanceService {
        HttpAttendanceService::new(url, Duration::from_secs(5)).unwrap()
    }

    async fn history(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("record").map(String::as_str) == Some("15") {
            Json(json!([
                { "record": "101", "date": "2024-05-07", "time": "18:15:00", "join_date": "15" },
                { "record": 102, "date": "2024-05-10", "time": null, "join_date": "15" }
            ]))
        } else {
            Json(json!([]))
        }
    }

    async fn check_in(Json(body): Json<Value>) -> Json<Value> {
        if body["record_user"] == body["join_user"] && body["record_user"] == json!(15) {
            Json(json!({ "message": "Asistencia registrada correctamente" }))
        } else {
            Json(json!({ "message": "Datos inválidos" }))
        }
    }

    fn attendance_router() -> Router {
        Router::new().route(ENDPOINT, get(history).post(check_in))
    }

    #[tokio::test]
    async fn test_fetch_sends_record_and_decodes() {
        let service = client(spawn_service(attendance_router()).await);

        let records = service.fetch_records(15).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence_id, 101);
        assert_eq!(records[0].time, "18:15:00");
        assert_eq!(records[1].sequence_id, 102);
        assert_eq!(records[1].time, "");

        assert!(service.fetch_records(16).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_array_is_empty() {
        let router = Router::new().route(
            ENDPOINT,
            get(|| async { Json(json!({ "error": "sin datos" })) }),
        );
        let service = client(spawn_service(router).await);

        assert!(service.fetch_records(15).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_records() {
        let router = Router::new().route(
            ENDPOINT,
            get(|| async {
                Json(json!([
                    { "record": 1, "date": "2024-05-06", "time": "08:30:00" },
                    { "unexpected": true },
                    { "record": 2, "date": "2024-05-07", "time": "09:30:00" },
                    { "record": null, "date": "2024-05-09", "time": "08:00:00" },
                ]))
            }),
        );
        let service = client(spawn_service(router).await);

        let records = service.fetch_records(15).await.unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.sequence_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_records_without_date_are_kept() {
        let records = records_from_json(json!([
            { "record": 3, "time": "08:00:00" },
            { "record": 4, "date": null },
        ]));

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.date.is_empty()));
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let router = Router::new().route(
            ENDPOINT,
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let service = client(spawn_service(router).await);

        let err = service.fetch_records(15).await.unwrap_err();
        assert!(matches!(err, ServiceError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn test_submit_confirmed() {
        let service = client(spawn_service(attendance_router()).await);

        let ack = service
            .submit_check_in(&CheckInRequest::for_record(15))
            .await
            .unwrap();
        assert!(ack.is_confirmed("correctamente"));

        let ack = service
            .submit_check_in(&CheckInRequest::for_record(99))
            .await
            .unwrap();
        assert!(!ack.is_confirmed("correctamente"));
    }

    #[tokio::test]
    async fn test_submit_non_json_is_transport_error() {
        let router = Router::new().route(
            ENDPOINT,
            axum::routing::post(|| async { "<html>proxy error</html>" }),
        );
        let service = client(spawn_service(router).await);

        let err = service
            .submit_check_in(&CheckInRequest::for_record(15))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Request(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = client(format!("http://{addr}{ENDPOINT}"));
        let err = service.fetch_records(15).await.unwrap_err();
        assert!(matches!(err, ServiceError::Request(_)));
    }
}
