use serde::{Deserialize, Serialize};

use crate::animation::AnimationEffect;
use crate::game::{Game, HexPoint, UnitPose};
use crate::sequence::{ElementDescription, ElementPayload, ElementType};

pub const MOVE_DELAY: u32 = 400;
pub const ROTATE_DELAY: u32 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveElement {
    pub unit: String,
    pub from: HexPoint,
    pub to: HexPoint,
    #[serde(default)]
    pub angle: f64,
}

impl Default for MoveElement {
    fn default() -> Self {
        Self {
            unit: String::new(),
            from: HexPoint::new(0.0, 0.0),
            to: HexPoint::new(0.0, 0.0),
            angle: 0.0,
        }
    }
}

impl MoveElement {
    pub fn new(unit: impl Into<String>, from: HexPoint, to: HexPoint, angle: f64) -> Self {
        Self {
            unit: unit.into(),
            from,
            to,
            angle,
        }
    }
}

impl ElementPayload for MoveElement {
    fn describe(&self, description: &mut ElementDescription) {
        description
            .field("unit", &self.unit)
            .field("from", self.from)
            .field("to", self.to)
            .field("angle", self.angle);
    }

    fn delay(&self) -> u32 {
        MOVE_DELAY
    }

    fn effect(&self) -> Box<dyn AnimationEffect> {
        Box::new(MoveEffect {
            unit: self.unit.clone(),
            from: UnitPose::new(self.from, self.angle),
            to: UnitPose::new(self.to, self.angle),
        })
    }
}

impl ElementType for MoveElement {
    const TYPE: &'static str = "move";

    fn launch(&self, game: &mut dyn Game) {
        game.place_unit(&self.unit, UnitPose::new(self.to, self.angle));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotateElement {
    pub unit: String,
    pub hex: HexPoint,
    pub from: f64,
    pub to: f64,
}

impl Default for RotateElement {
    fn default() -> Self {
        Self {
            unit: String::new(),
            hex: HexPoint::new(0.0, 0.0),
            from: 0.0,
            to: 0.0,
        }
    }
}

impl RotateElement {
    pub fn new(unit: impl Into<String>, hex: HexPoint, from: f64, to: f64) -> Self {
        Self {
            unit: unit.into(),
            hex,
            from,
            to,
        }
    }
}

impl ElementPayload for RotateElement {
    fn describe(&self, description: &mut ElementDescription) {
        description
            .field("unit", &self.unit)
            .field("hex", self.hex)
            .field("from", self.from)
            .field("to", self.to);
    }

    fn delay(&self) -> u32 {
        ROTATE_DELAY
    }

    fn effect(&self) -> Box<dyn AnimationEffect> {
        Box::new(MoveEffect {
            unit: self.unit.clone(),
            from: UnitPose::new(self.hex, self.from),
            to: UnitPose::new(self.hex, self.to),
        })
    }
}

impl ElementType for RotateElement {
    const TYPE: &'static str = "rotate";

    fn launch(&self, game: &mut dyn Game) {
        game.place_unit(&self.unit, UnitPose::new(self.hex, self.to));
    }
}

/// 在两个姿态之间插值；角度走较短的一侧。
struct MoveEffect {
    unit: String,
    from: UnitPose,
    to: UnitPose,
}

impl MoveEffect {
    fn pose_at(&self, factor: f64) -> UnitPose {
        let turn = (self.to.angle - self.from.angle + 540.0).rem_euclid(360.0) - 180.0;
        let angle = (self.from.angle + turn * factor).rem_euclid(360.0);
        UnitPose::new(self.from.hex.lerp(self.to.hex, factor), angle)
    }
}

impl AnimationEffect for MoveEffect {
    fn paint(&mut self, factor: f64, game: &mut dyn Game) {
        let pose = self.pose_at(factor);
        game.place_unit(&self.unit, pose);
    }
}
