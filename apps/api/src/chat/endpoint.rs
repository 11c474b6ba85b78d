use std::fmt;

use crate::chat::prompts::{
    CAREER_COACH_PERSONA, RESUME_ASSISTANT_PERSONA, RESUME_MODE, VOICE_ASSISTANT_PERSONA,
};
use crate::chat::window::{CAREER_WINDOW, VOICE_WINDOW};
use crate::llm_client::Sampling;

/// The two chat endpoint instances. Each fixes its persona, history window
/// and sampling parameters; nothing here is configurable per request except
/// the persona `mode` on the career endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEndpoint {
    Career,
    Voice,
}

impl ChatEndpoint {
    pub fn name(self) -> &'static str {
        match self {
            ChatEndpoint::Career => "career-chat",
            ChatEndpoint::Voice => "voice-chat",
        }
    }

    /// Route path the endpoint is mounted on.
    pub fn path(self) -> &'static str {
        match self {
            ChatEndpoint::Career => "/api/v1/career-chat",
            ChatEndpoint::Voice => "/api/v1/voice-chat",
        }
    }

    pub fn window_size(self) -> usize {
        match self {
            ChatEndpoint::Career => CAREER_WINDOW,
            ChatEndpoint::Voice => VOICE_WINDOW,
        }
    }

    pub fn sampling(self) -> Sampling {
        match self {
            ChatEndpoint::Career => Sampling {
                temperature: 0.7,
                max_tokens: 1000,
                presence_penalty: None,
                frequency_penalty: None,
            },
            // Penalties discourage repeated phrasing in spoken output.
            ChatEndpoint::Voice => Sampling {
                temperature: 0.7,
                max_tokens: 300,
                presence_penalty: Some(0.1),
                frequency_penalty: Some(0.1),
            },
        }
    }

    /// System persona for this endpoint. `mode` only matters on the career endpoint.
    pub fn persona(self, mode: Option<&str>) -> &'static str {
        match (self, mode) {
            (ChatEndpoint::Voice, _) => VOICE_ASSISTANT_PERSONA,
            (ChatEndpoint::Career, Some(m)) if m.eq_ignore_ascii_case(RESUME_MODE) => {
                RESUME_ASSISTANT_PERSONA
            }
            (ChatEndpoint::Career, _) => CAREER_COACH_PERSONA,
        }
    }
}

impl fmt::Display for ChatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
