use serde::{Deserialize, Serialize};

use crate::config::ConfigSource;
use crate::contract::{MenuRequest, MenuResponse, TreeResponse};
use crate::entry_store::EntryStore;
use crate::live_query::{LiveQueryController, RebuildReport};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    StoreUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: MenuResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request<S, C>(
    controller: &mut LiveQueryController<S, C>,
    request: MenuRequest,
) -> TransportResponse
where
    S: EntryStore,
    C: ConfigSource,
{
    let report = match request {
        MenuRequest::QueryChanged(payload) => Some(controller.on_query_text_changed(&payload.text)),
        MenuRequest::QueryCleared => Some(controller.on_query_cleared()),
        MenuRequest::StoreChanged => Some(controller.refresh()),
        MenuRequest::CurrentTree => None,
    };

    if let Some(report) = &report {
        if report.unavailable.len() == 2 {
            return TransportResponse::Err {
                error: ErrorResponse {
                    code: ErrorCode::StoreUnavailable,
                    message: format!("entry store unavailable (generation {})", report.generation),
                },
            };
        }
    }

    TransportResponse::Ok {
        response: MenuResponse::Tree(tree_response(controller, report.as_ref())),
    }
}

pub fn handle_json<S, C>(controller: &mut LiveQueryController<S, C>, payload: &str) -> String
where
    S: EntryStore,
    C: ConfigSource,
{
    let response = match serde_json::from_str::<MenuRequest>(payload) {
        Ok(request) => handle_request(controller, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| encode_failure(&error.to_string()))
}

fn encode_failure(message: &str) -> String {
    serde_json::json!({
        "status": "err",
        "error": { "code": "invalid_json", "message": message },
    })
    .to_string()
}

fn tree_response<S, C>(
    controller: &LiveQueryController<S, C>,
    report: Option<&RebuildReport>,
) -> TreeResponse
where
    S: EntryStore,
    C: ConfigSource,
{
    TreeResponse {
        generation: controller.generation(),
        mode: report.map(|report| report.mode),
        unavailable: report
            .map(|report| report.unavailable.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default(),
        root: controller.tree().cloned(),
    }
}
