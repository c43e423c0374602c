//! 序列元素与动画调度之间的桥接层。

pub mod animator;

pub use animator::Animator;

use crate::game::{Game, GameId};

/// 每帧的时间量（毫秒）。
pub const ADELAY: u32 = 20;

/// 动画结束后执行一次的回调。
pub type FinishAction = Box<dyn FnOnce(&mut dyn Game)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Stop,
    Continue,
}

/// 某一类元素在每一帧上具体“画什么”。
pub trait AnimationEffect {
    fn init(&mut self, _game: &mut dyn Game) {}

    /// `factor` 为 `[0, 1]` 区间内的进度。
    fn paint(&mut self, _factor: f64, _game: &mut dyn Game) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffect;

impl AnimationEffect for NoEffect {}

/// 从某个 tick 开始、持续 `duration` 毫秒的一段动画。
pub struct SequenceAnimation {
    game: GameId,
    tick: u64,
    duration: u32,
    effect: Box<dyn AnimationEffect>,
    finish: Option<FinishAction>,
}

impl SequenceAnimation {
    pub fn new(
        game: GameId,
        start_tick: u64,
        duration: u32,
        effect: impl AnimationEffect + 'static,
    ) -> Self {
        Self::new_boxed(game, start_tick, duration, Box::new(effect))
    }

    pub fn new_boxed(
        game: GameId,
        start_tick: u64,
        duration: u32,
        effect: Box<dyn AnimationEffect>,
    ) -> Self {
        Self {
            game,
            // 预留一帧引入
            tick: start_tick + 1,
            duration,
            effect,
            finish: None,
        }
    }

    pub fn game(&self) -> &GameId {
        &self.game
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn has_final_action(&self) -> bool {
        self.finish.is_some()
    }

    pub fn set_final_action(&mut self, action: impl FnOnce(&mut dyn Game) + 'static) {
        self.finish = Some(Box::new(action));
    }

    pub fn factor(&self, count: u32) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (f64::from(count) * f64::from(ADELAY) / f64::from(self.duration)).min(1.0)
    }

    pub fn draw(&mut self, count: u32, ticks: u64, game: &mut dyn Game) -> Continuation {
        let factor = self.factor(count);
        tracing::trace!(game = %self.game, ticks, count, factor, "draw sequence animation");
        self.effect.paint(factor, game);
        if u64::from(count) * u64::from(ADELAY) >= u64::from(self.duration) {
            Continuation::Stop
        } else {
            Continuation::Continue
        }
    }

    pub(crate) fn start(&mut self, game: &mut dyn Game) {
        self.effect.init(game);
    }

    pub(crate) fn finish(&mut self, game: &mut dyn Game) {
        if let Some(action) = self.finish.take() {
            action(game);
        }
    }
}

impl std::fmt::Debug for SequenceAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAnimation")
            .field("game", &self.game)
            .field("tick", &self.tick)
            .field("duration", &self.duration)
            .field("has_final_action", &self.finish.is_some())
            .finish()
    }
}
