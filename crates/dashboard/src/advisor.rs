use chrono::Local;
use std::sync::Arc;
use tracing::warn;
use tradeai_core::api::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use tradeai_core::api::port::DashboardApi;

pub const GREETING: &str = "Hello! I'm your AI Trading Advisor. I can help you with market analysis, portfolio recommendations, and trading strategies. How can I assist you today?";
pub const NO_ANSWER: &str = "I couldn't find an answer. Please try again.";
pub const SERVICE_ERROR: &str = "Sorry, there was an error connecting to the AI service.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// 本地时间 `HH:MM`
    pub time: String,
}

impl ChatMessage {
    fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            time: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// # Summary
/// AI 顾问对话。
///
/// # Invariants
/// - 对话记录以机器人问候语开头，只增不减。
/// - 原始错误从不出现在对话中，只出现固定文案。
pub struct AdvisorChat {
    api: Arc<dyn DashboardApi>,
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl AdvisorChat {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            messages: vec![ChatMessage::now(Sender::Bot, GREETING)],
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// # Summary
    /// 发送一条提问并追加回答。
    ///
    /// # Logic
    /// 1. 空白输入直接忽略。
    /// 2. 追加用户消息，调用 `get_recommendation`。
    /// 3. 成功追加回答（空回答替换为兜底文案）；凭证被拒追加会话过期提示；其余错误追加通用错误文案。
    ///
    /// # Returns
    /// 本次追加的机器人消息，输入被忽略时返回 `None`。
    pub async fn ask(&mut self, query: &str) -> Option<&ChatMessage> {
        if query.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::now(Sender::User, query));
        self.loading = true;
        let result = self.api.get_recommendation(query).await;
        self.loading = false;

        let reply = match result {
            Ok(text) if text.trim().is_empty() => NO_ANSWER.to_string(),
            Ok(text) => text,
            Err(e @ ApiError::Unauthorized { .. }) => {
                warn!("Advisor request rejected: {}", e);
                SESSION_EXPIRED_MESSAGE.to_string()
            }
            Err(e) => {
                warn!("Advisor request failed: {}", e);
                SERVICE_ERROR.to_string()
            }
        };
        self.messages.push(ChatMessage::now(Sender::Bot, reply));
        self.messages.last()
    }
}
