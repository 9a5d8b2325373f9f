use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::collaborators::PromptContext;
use crate::executor::{CommandError, CommandExecutor};
use crate::intent::{classify, Intent};
use crate::reply::{PRODUCER_FAILED, USAGE_HINT};
use crate::sanitizer::{sanitize, sanitize_with_resolution, SanitizedResponse};
use crate::session::{Role, SessionStore, Turn};

pub const SYSTEM_PROMPT: &str = "你是面试练习助手，帮助用户准备互联网公司技术面试。\
回答使用中文，简洁直接。不要编造题目链接；需要推荐题目时只给出题目名称。";

const CONVERSATION_UNAVAILABLE: &str = "暂未接入对话模型，可以试试：给我一道中等难度的算法题。";

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    /// Final user-facing text, link suffix included.
    pub text: String,
    pub sanitized: SanitizedResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static str>,
}

/// One conversational turn: classify, execute or converse, sanitize, remember.
#[derive(Clone)]
pub struct ChatService {
    executor: CommandExecutor,
    sessions: Arc<dyn SessionStore>,
}

impl ChatService {
    pub fn new(executor: CommandExecutor) -> Self {
        let sessions = executor.context().sessions.clone();
        Self { executor, sessions }
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn sessions(&self) -> Arc<dyn SessionStore> {
        self.sessions.clone()
    }

    pub async fn end_session(&self, session_id: &str) -> bool {
        self.sessions.end(session_id).await
    }

    pub async fn reply(&self, session_id: &str, message: &str) -> ChatReply {
        let message = message.trim();
        if message.is_empty() {
            let sanitized = sanitize(USAGE_HINT);
            return ChatReply {
                session_id: session_id.to_string(),
                text: sanitized.rendered(),
                sanitized,
                command: None,
            };
        }

        let session = self.sessions.open(session_id).await;
        let intent = classify(message);
        debug!(target: "practice_session", session = session_id, ?intent, "classified message");

        let (sanitized, command) = match intent {
            Intent::Command(command) => {
                let name = command.name();
                let sanitized = match self.executor.execute(&command).await {
                    Ok(outcome) => match &outcome.resolution {
                        Some(resolution) => sanitize_with_resolution(&outcome.text, resolution),
                        None => sanitize(&outcome.text),
                    },
                    Err(CommandError::Unavailable(what)) => {
                        sanitize(&format!("当前未配置{}，暂时无法处理该请求。", unavailable_label(what)))
                    }
                    Err(error) => {
                        warn!(target: "practice_executor", command = name, error = %error, "command reply degraded");
                        sanitize(&format!("处理失败：{}", error_summary(&error)))
                    }
                };
                (sanitized, Some(name))
            }
            Intent::Conversation => {
                let history = session.lock().await.history();
                (sanitize(&self.converse(message, history).await), None)
            }
        };

        let text = sanitized.rendered();
        {
            let mut session = session.lock().await;
            session.push(Role::User, message);
            session.push(Role::Assistant, text.clone());
        }

        ChatReply {
            session_id: session_id.to_string(),
            text,
            sanitized,
            command,
        }
    }

    async fn converse(&self, message: &str, history: Vec<Turn>) -> String {
        let Some(producer) = self.executor.context().producer.clone() else {
            return CONVERSATION_UNAVAILABLE.to_string();
        };
        let prompt = PromptContext {
            system_prompt: SYSTEM_PROMPT.to_string(),
            history,
            message: message.to_string(),
        };
        match producer.produce(&prompt).await {
            Ok(text) => text,
            Err(error) => {
                warn!(target: "practice_session", error = %error, "text producer failed");
                PRODUCER_FAILED.to_string()
            }
        }
    }
}

fn unavailable_label(what: &str) -> &str {
    match what {
        "code runner" => "代码执行服务",
        "experience search" => "面经检索服务",
        other => other,
    }
}

fn error_summary(error: &CommandError) -> String {
    match error {
        CommandError::Execution { source, .. } => source.to_string(),
        CommandError::Unavailable(what) => (*what).to_string(),
    }
}
