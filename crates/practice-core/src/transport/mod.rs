use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::catalog::Difficulty;
use crate::chat::ChatService;
use crate::executor::{CommandError, CommandOutcome};
use crate::intent::Command;
use crate::link::classify;
use crate::sanitizer::{sanitize, sanitize_with_resolution};

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const EXECUTION_FAILED: i32 = -32000;

const DEFAULT_SESSION: &str = "default";

pub async fn serve_stdio(chat: ChatService) -> Result<()> {
    serve(&chat, BufReader::new(io::stdin()), io::stdout()).await
}

/// Line-delimited JSON-RPC loop over any reader/writer pair.
pub async fn serve<R, W>(chat: &ChatService, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = String::new();
    loop {
        buffer.clear();
        let bytes = reader.read_line(&mut buffer).await?;
        if bytes == 0 {
            info!(target: "practice_transport", "input closed; shutting down");
            break;
        }
        if buffer.trim().is_empty() {
            continue;
        }

        debug!(target: "practice_transport", request = buffer.trim());
        let maybe_response = match serde_json::from_str::<RpcRequest>(&buffer) {
            Ok(request) => handle_request(chat, request).await,
            Err(error) => {
                warn!(target: "practice_transport", error = %error, "failed to parse request");
                Some(RpcResponse::error(None, PARSE_ERROR, "Parse error"))
            }
        };

        if let Some(response) = maybe_response {
            let payload = serde_json::to_string(&response)?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

impl RpcResponse {
    fn result(id: Option<Value>, value: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(value),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResolveParams {
    keyword: Option<String>,
    random: bool,
    difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResolveIdParams {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

#[derive(Debug, Deserialize)]
struct UrlParams {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatParams {
    #[serde(default)]
    session_id: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SessionParams {
    session_id: String,
}

/// Failure of one method call, mapped onto a JSON-RPC error code.
enum MethodError {
    InvalidParams(String),
    Execution(String),
}

impl From<CommandError> for MethodError {
    fn from(error: CommandError) -> Self {
        Self::Execution(error.to_string())
    }
}

fn params<T: DeserializeOwned>(raw: Option<Value>) -> Result<T, MethodError> {
    serde_json::from_value(raw.unwrap_or_else(|| json!({})))
        .map_err(|error| MethodError::InvalidParams(error.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, MethodError> {
    serde_json::to_value(value).map_err(|error| MethodError::Execution(error.to_string()))
}

async fn handle_request(chat: &ChatService, request: RpcRequest) -> Option<RpcResponse> {
    let RpcRequest { id, method, params } = request;

    let Some(id) = id else {
        debug!(
            target: "practice_transport",
            method = %method,
            "ignoring notification"
        );
        return None;
    };

    let outcome = match method.as_str() {
        "initialize" => Ok(json!({
            "protocolVersion": "0.1.0",
            "serverInfo": {
                "name": "practice-link",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "methods": [
                    "resolve", "resolve_id", "sanitize", "validate",
                    "chat", "session/end", "telemetry"
                ]
            }
        })),
        "resolve" => resolve(chat, params).await,
        "resolve_id" => resolve_id(chat, params).await,
        "sanitize" => sanitize_text(params),
        "validate" => validate(params),
        "chat" => chat_turn(chat, params).await,
        "session/end" => end_session(chat, params).await,
        "telemetry" => telemetry(chat).await,
        other => {
            return Some(RpcResponse::error(
                Some(id),
                METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            ))
        }
    };

    Some(match outcome {
        Ok(value) => RpcResponse::result(Some(id), value),
        Err(MethodError::InvalidParams(message)) => {
            RpcResponse::error(Some(id), INVALID_PARAMS, message)
        }
        Err(MethodError::Execution(message)) => {
            RpcResponse::error(Some(id), EXECUTION_FAILED, message)
        }
    })
}

async fn resolve(chat: &ChatService, raw: Option<Value>) -> Result<Value, MethodError> {
    let params: ResolveParams = params(raw)?;
    let keyword = params.keyword.as_deref().map(str::trim).unwrap_or_default();
    let command = if params.random {
        Command::RandomLookup {
            difficulty: params.difficulty.as_deref().and_then(Difficulty::from_str_loose),
        }
    } else if keyword.is_empty() {
        return Err(MethodError::InvalidParams(
            "expected a non-empty `keyword` or `random: true`".to_string(),
        ));
    } else {
        Command::TitleLookup {
            keyword: keyword.to_string(),
        }
    };
    let outcome = chat.executor().execute(&command).await?;
    resolution_value(&outcome)
}

async fn resolve_id(chat: &ChatService, raw: Option<Value>) -> Result<Value, MethodError> {
    let params: ResolveIdParams = params(raw)?;
    let outcome = chat
        .executor()
        .execute(&Command::IdLookup { id: params.id })
        .await?;
    resolution_value(&outcome)
}

fn resolution_value(outcome: &CommandOutcome) -> Result<Value, MethodError> {
    let sanitized = match &outcome.resolution {
        Some(resolution) => sanitize_with_resolution(&outcome.text, resolution),
        None => sanitize(&outcome.text),
    };
    Ok(json!({
        "resolution": to_value(&outcome.resolution)?,
        "text": sanitized.rendered(),
    }))
}

fn sanitize_text(raw: Option<Value>) -> Result<Value, MethodError> {
    let params: TextParams = params(raw)?;
    let sanitized = sanitize(&params.text);
    let mut value = to_value(&sanitized)?;
    if let Value::Object(map) = &mut value {
        map.insert("rendered".to_string(), Value::String(sanitized.rendered()));
    }
    Ok(value)
}

fn validate(raw: Option<Value>) -> Result<Value, MethodError> {
    let params: UrlParams = params(raw)?;
    let kind = classify(params.url.trim());
    Ok(json!({
        "valid": kind.is_page(),
        "kind": kind,
    }))
}

async fn chat_turn(chat: &ChatService, raw: Option<Value>) -> Result<Value, MethodError> {
    let params: ChatParams = params(raw)?;
    let session_id = params
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());
    let reply = chat.reply(&session_id, &params.message).await;
    to_value(&reply)
}

async fn end_session(chat: &ChatService, raw: Option<Value>) -> Result<Value, MethodError> {
    let params: SessionParams = params(raw)?;
    Ok(json!({ "ended": chat.end_session(&params.session_id).await }))
}

async fn telemetry(chat: &ChatService) -> Result<Value, MethodError> {
    let entries = chat.executor().context().telemetry_snapshot().await;
    Ok(json!({ "entries": to_value(&entries)? }))
}
