pub mod movement;
pub mod next_turn;

pub use movement::{MoveElement, RotateElement, MOVE_DELAY, ROTATE_DELAY};
pub use next_turn::NextTurnElement;
