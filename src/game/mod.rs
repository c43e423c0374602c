//! 序列引擎所见的对局接口（规则层、渲染层都在外部）。

pub mod model;

pub use model::{Game, GameId, HexPoint, UnitPose};

#[cfg(test)]
pub(crate) use model::testing;
