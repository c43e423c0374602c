use crate::game::Game;

use super::{Continuation, SequenceAnimation};

struct Running {
    animation: SequenceAnimation,
    count: u32,
    started: bool,
}

/// 按 tick 推进的动画调度器。
///
/// 动画在调度器的 tick 到达其起始 tick 时开始，每个 tick 按加入顺序各画一帧；
/// `draw` 返回 [`Continuation::Stop`] 后执行其结束回调，且只执行一次。
#[derive(Default)]
pub struct Animator {
    tick: u64,
    running: Vec<Running>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn pending(&self) -> usize {
        self.running.len()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// 尚未结束的动画，按加入顺序。
    pub fn queued(&self) -> impl Iterator<Item = &SequenceAnimation> {
        self.running.iter().map(|entry| &entry.animation)
    }

    pub fn play(&mut self, animation: SequenceAnimation) {
        tracing::trace!(tick = animation.tick(), duration = animation.duration(), "queue animation");
        self.running.push(Running {
            animation,
            count: 0,
            started: false,
        });
    }

    /// 推进一个 tick，返回调度器是否仍有动画未完成。
    pub fn advance(&mut self, game: &mut dyn Game) -> bool {
        self.tick += 1;
        let tick = self.tick;

        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.running.len() {
            let entry = &mut self.running[index];
            if entry.animation.tick() > tick {
                index += 1;
                continue;
            }
            if !entry.started {
                entry.animation.start(game);
                entry.started = true;
            }
            let continuation = entry.animation.draw(entry.count, tick, game);
            entry.count += 1;
            if continuation == Continuation::Stop {
                finished.push(self.running.remove(index));
            } else {
                index += 1;
            }
        }

        for mut entry in finished {
            entry.animation.finish(game);
        }
        !self.running.is_empty()
    }

    pub fn run_to_end(&mut self, game: &mut dyn Game) -> u64 {
        let start = self.tick;
        while self.advance(game) {}
        self.tick - start
    }

    /// 丢弃所有未完成的动画，结束回调不会执行。
    pub fn clear(&mut self) {
        if !self.running.is_empty() {
            tracing::debug!(dropped = self.running.len(), "clear pending animations");
        }
        self.running.clear();
    }
}
