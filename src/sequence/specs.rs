//! 序列批次的线上格式。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::GameId;

/// 序列容器本身的格式版本。
pub const SEQUENCE_VERSION: u32 = 0;

/// 一次提交的批次。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequenceSpecs {
    #[serde(default)]
    pub version: u32,
    pub game: GameId,
    pub count: u64,
    #[serde(default)]
    pub elements: Vec<ElementSpecs>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementSpecs {
    #[serde(default)]
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecContext {
    pub game: GameId,
}

impl SpecContext {
    pub fn new(game: GameId) -> Self {
        Self { game }
    }
}
