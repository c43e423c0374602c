use serde::{Deserialize, Serialize};

use crate::animation::ADELAY;

/// 相邻两个元素之间固定间隔的帧数。
pub const DEFAULT_SPACING: u64 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayConfig {
    #[serde(default = "default_frame_delay")]
    pub frame_delay: u32,
    #[serde(default = "default_spacing")]
    pub spacing: u64,
}

fn default_frame_delay() -> u32 {
    ADELAY
}

fn default_spacing() -> u64 {
    DEFAULT_SPACING
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_delay: ADELAY,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl ReplayConfig {
    pub fn with_spacing(mut self, spacing: u64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_frame_delay(mut self, frame_delay: u32) -> Self {
        self.frame_delay = frame_delay.max(1);
        self
    }

    /// 一个 delay 毫秒的元素之后，下一个元素需要推迟的帧数。
    pub fn ticks_after(&self, delay: u32) -> u64 {
        u64::from(delay / self.frame_delay.max(1)) + self.spacing
    }
}
