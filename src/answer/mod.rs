//! Answer composition
//!
//! Routes each query through document grounding, web retrieval and the
//! generation backends according to the operating [`Mode`].

mod context;
mod orchestrator;
pub mod prompts;

pub use context::AnswerContext;
pub use orchestrator::{Answer, AnswerOrchestrator, AnswerPath};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local generation only
    Local,
    /// Web retrieval only, no cloud generation
    #[serde(rename = "web", alias = "webonly", alias = "web-only")]
    WebOnly,
    /// Web first, cloud generation when a credential is present
    #[default]
    Cloud,
}

impl Mode {
    /// Read `AI_MODE`; unrecognised values mean cloud, unset means `None`
    pub fn from_env() -> Option<Self> {
        let value = std::env::var("AI_MODE").ok()?;
        Some(value.parse().unwrap_or(Mode::Cloud))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::WebOnly => "web",
            Mode::Cloud => "cloud",
        }
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Mode::Local),
            "web" | "webonly" | "web-only" | "web_only" => Ok(Mode::WebOnly),
            "cloud" | "" => Ok(Mode::Cloud),
            other => Err(anyhow::anyhow!("unknown mode: {}", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
