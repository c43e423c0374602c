use serde::{Deserialize, Serialize};

use crate::animation::AnimationEffect;
use crate::game::Game;
use crate::sequence::{ElementDescription, ElementPayload, ElementType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTurnElement {
    pub turn: u32,
}

impl NextTurnElement {
    pub fn new(turn: u32) -> Self {
        Self { turn }
    }
}

impl ElementPayload for NextTurnElement {
    fn describe(&self, description: &mut ElementDescription) {
        description.field("turn", self.turn);
    }

    fn effect(&self) -> Box<dyn AnimationEffect> {
        Box::new(NextTurnEffect { turn: self.turn })
    }
}

impl ElementType for NextTurnElement {
    const TYPE: &'static str = "next-turn";

    fn launch(&self, game: &mut dyn Game) {
        game.next_turn(self.turn);
    }
}

struct NextTurnEffect {
    turn: u32,
}

impl AnimationEffect for NextTurnEffect {
    fn init(&mut self, game: &mut dyn Game) {
        game.next_turn(self.turn);
    }
}
