use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStorageCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthAuditCheck {
    pub enabled: bool,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
    pub audit: HealthAuditCheck,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 图片生成不依赖数据库，存储不可用时整体状态为 `degraded`，仍返回 200。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage_status = match &state.storage {
            None => HealthStorageCheck {
                status: "unavailable".to_string(),
                backend: None,
                error: None,
            },
            Some(storage) => {
                let backend = Some(storage.backend_name().to_string());
                match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
                    Ok(Ok(())) => HealthStorageCheck {
                        status: "healthy".to_string(),
                        backend,
                        error: None,
                    },
                    Ok(Err(e)) => {
                        error!("Storage health check failed: {}", e);
                        HealthStorageCheck {
                            status: "unhealthy".to_string(),
                            backend,
                            error: Some(format!("database error: {}", e)),
                        }
                    }
                    Err(_) => {
                        error!("Storage health check timeout");
                        HealthStorageCheck {
                            status: "unhealthy".to_string(),
                            backend,
                            error: Some("timeout".to_string()),
                        }
                    }
                }
            }
        };

        let is_healthy = storage_status.status == "healthy";
        let uptime = state.uptime_seconds();

        let health = HealthResponse {
            status: if is_healthy { "healthy" } else { "degraded" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime,
            checks: HealthChecks {
                storage: storage_status,
                audit: HealthAuditCheck {
                    enabled: state.audit.is_enabled(),
                    pending: state.audit.pending(),
                },
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            health.status,
            uptime
        );

        HttpResponse::Ok().json(health)
    }

    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
