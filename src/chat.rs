//! Chat transcript with a streaming assistant bubble.

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered chat history plus the one in-progress assistant bubble that
/// stream chunks accumulate into.
///
/// With `retain_history` clear, finalized exchanges are discarded and
/// only the in-flight stream is kept (the history-less client variant).
#[derive(Clone, Debug)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    streaming: Option<String>,
    retain_history: bool,
}

impl ChatTranscript {
    pub fn new(retain_history: bool) -> Self {
        Self {
            messages: Vec::new(),
            streaming: None,
            retain_history,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The assistant bubble currently being streamed, if any.
    pub fn streaming_text(&self) -> Option<&str> {
        self.streaming.as_deref()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    /// Appends a stream chunk, opening the bubble on the first chunk.
    pub fn push_chunk(&mut self, text: &str) {
        self.streaming.get_or_insert_with(String::new).push_str(text);
    }

    /// Finalizes the in-progress bubble. The server's full text wins
    /// over the accumulated chunks (it is the trimmed authoritative
    /// copy).
    pub fn end_stream(&mut self, full_text: impl Into<String>) {
        self.streaming = None;
        self.push(ChatMessage::assistant(full_text));
    }

    fn push(&mut self, message: ChatMessage) {
        if !self.retain_history {
            self.messages.clear();
        }
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
