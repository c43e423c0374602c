use std::fmt;

use serde::{Deserialize, Serialize};

/// 对局标识。序列元素与序列只持有该句柄，而不持有对局本身。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 六角格坐标。列、行使用浮点数，以便动画在两个格子之间插值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexPoint {
    pub col: f64,
    pub row: f64,
}

impl HexPoint {
    pub fn new(col: f64, row: f64) -> Self {
        Self { col, row }
    }

    pub fn lerp(self, to: HexPoint, factor: f64) -> HexPoint {
        HexPoint {
            col: self.col + (to.col - self.col) * factor,
            row: self.row + (to.row - self.row) * factor,
        }
    }
}

impl fmt::Display for HexPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// 单位在棋盘上的可视姿态。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPose {
    pub hex: HexPoint,
    pub angle: f64,
}

impl UnitPose {
    pub fn new(hex: HexPoint, angle: f64) -> Self {
        Self { hex, angle }
    }
}

/// 序列引擎所依赖的对局接口。规则结算、棋盘绘制都在实现方一侧。
pub trait Game {
    fn id(&self) -> &GameId;

    fn next_turn(&mut self, turn: u32);

    /// 把单位画在指定姿态上。
    fn place_unit(&mut self, _unit: &str, _pose: UnitPose) {}
}
