use std::cell::Cell;
use std::rc::Rc;

use crate::animation::Animator;
use crate::config::ReplayConfig;
use crate::game::GameId;
use crate::undo::{Memento, Undoable};

use super::element::SequenceElement;
use super::error::SequenceResult;
use super::registry;
use super::specs::{SequenceSpecs, SpecContext, SEQUENCE_VERSION};

#[derive(Debug, Clone)]
pub struct SequenceSnapshot {
    pub elements: Vec<Rc<SequenceElement>>,
}

/// 一局游戏的动作序列。
///
/// 状态流转：空 → 有待提交元素 → 已提交（等待确认）→ 确认后回到空。
/// 在确认之前再次提交属于编程错误，会直接 panic。
#[derive(Debug)]
pub struct Sequence {
    game: GameId,
    count: u64,
    elements: Vec<Rc<SequenceElement>>,
    validated: Option<Vec<Rc<SequenceElement>>>,
    validated_count: Option<u64>,
    replaying: Rc<Cell<u32>>,
    config: ReplayConfig,
}

impl Sequence {
    pub fn new(game: GameId, count: u64) -> Self {
        Self {
            game,
            count,
            elements: Vec::new(),
            validated: None,
            validated_count: None,
            replaying: Rc::new(Cell::new(0)),
            config: ReplayConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game(&self) -> &GameId {
        &self.game
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// 设置提交计数，同时把已提交批次的计数对齐到同一个值。
    pub fn set_count(&mut self, count: u64) {
        self.count = count;
        self.validated_count = Some(count);
    }

    pub fn validated_count(&self) -> Option<u64> {
        self.validated_count
    }

    pub fn elements(&self) -> &[Rc<SequenceElement>] {
        &self.elements
    }

    pub fn validated(&self) -> &[Rc<SequenceElement>] {
        self.validated.as_deref().unwrap_or(&[])
    }

    pub fn has_pending_validation(&self) -> bool {
        self.validated.is_some()
    }

    /// 串联的回放各自计数，全部结束后才退出回放模式。
    pub fn is_replaying(&self) -> bool {
        self.replaying.get() > 0
    }

    /// 追加一个玩家操作产生的元素。
    ///
    /// 传入撤销管理器时，追加前的元素列表会被登记为撤销点；回放期间不登记。
    pub fn append_element(
        &mut self,
        mut element: SequenceElement,
        memento: Option<&mut Memento<Sequence>>,
    ) {
        match memento {
            Some(memento) if !self.is_replaying() => memento.register(self),
            Some(_) => tracing::trace!(game = %self.game, "skip undo checkpoint during replay"),
            None => {}
        }
        element.attach(self.game.clone());
        tracing::trace!(game = %self.game, element = %element, "append sequence element");
        self.elements.push(Rc::new(element));
    }

    /// 追加元素但不登记撤销点，用于装载与重建。
    pub fn add_element(&mut self, mut element: SequenceElement) {
        element.attach(self.game.clone());
        self.elements.push(Rc::new(element));
    }

    pub fn commit(&mut self) -> &mut Self {
        assert!(
            self.validated.is_none(),
            "sequence for game `{}` committed again before the previous batch was acknowledged",
            self.game
        );
        let batch = std::mem::take(&mut self.elements);
        tracing::debug!(game = %self.game, count = self.count, elements = batch.len(), "commit sequence");
        self.validated = Some(batch);
        self.validated_count = Some(self.count);
        self.count += 1;
        self
    }

    pub fn acknowledge(&mut self) {
        if self.validated.is_some() {
            tracing::debug!(game = %self.game, count = ?self.validated_count, "acknowledge sequence");
        }
        self.validated = None;
        self.validated_count = None;
    }

    /// 依次为待处理元素排定动画，返回最后的 tick，便于串联下一次回放。
    ///
    /// 最后一个动画结束后退出回放模式并调用 `on_finished`；没有元素时立即调用。
    pub fn replay(
        &mut self,
        start_tick: u64,
        animator: &mut Animator,
        on_finished: impl FnOnce() + 'static,
    ) -> u64 {
        self.replaying.set(self.replaying.get() + 1);
        let elements = std::mem::take(&mut self.elements);
        tracing::debug!(game = %self.game, start_tick, elements = elements.len(), "replay sequence");

        let mut tick = start_tick;
        let mut last = None;
        for element in &elements {
            if let Some(previous) = last.take() {
                animator.play(previous);
            }
            last = Some(element.apply(tick));
            tick += self.config.ticks_after(element.delay());
        }

        let replaying = Rc::clone(&self.replaying);
        let game = self.game.clone();
        let finish = move || {
            replaying.set(replaying.get().saturating_sub(1));
            tracing::debug!(game = %game, "replay finished");
            on_finished();
        };
        match last {
            Some(mut animation) => {
                animation.set_final_action(move |_| finish());
                animator.play(animation);
            }
            None => finish(),
        }
        tick
    }

    pub fn to_specs(&self) -> SequenceResult<SequenceSpecs> {
        let context = SpecContext::new(self.game.clone());
        let elements = self
            .validated()
            .iter()
            .map(|element| element.to_specs(&context))
            .collect::<SequenceResult<Vec<_>>>()?;
        Ok(SequenceSpecs {
            version: SEQUENCE_VERSION,
            game: self.game.clone(),
            count: self.validated_count.unwrap_or(self.count),
            elements,
        })
    }

    /// 装载一个批次：先对齐计数，再逐个重建元素并加入待处理列表。
    ///
    /// 遇到未注册的类型时返回 `SequenceError::UnknownElementType`，序列保持不变。
    pub fn from_specs(&mut self, specs: &SequenceSpecs) -> SequenceResult<()> {
        if specs.game != self.game {
            tracing::warn!(expected = %self.game, found = %specs.game, "loading batch of another game");
        }
        let context = SpecContext::new(self.game.clone());
        let elements = specs
            .elements
            .iter()
            .map(|element| registry::instantiate(None, element, &context))
            .collect::<SequenceResult<Vec<_>>>()?;

        self.set_count(specs.count);
        for element in elements {
            self.add_element(element);
        }
        tracing::debug!(game = %self.game, count = specs.count, elements = specs.elements.len(), "load sequence");
        Ok(())
    }

    pub fn get_sequence_element<'a>(
        elements: &'a [Rc<SequenceElement>],
        kind: &str,
    ) -> Option<&'a Rc<SequenceElement>> {
        elements.iter().find(|element| element.kind() == kind)
    }
}

impl Undoable for Sequence {
    type Snapshot = SequenceSnapshot;

    fn memento(&self) -> SequenceSnapshot {
        SequenceSnapshot {
            elements: self.elements.clone(),
        }
    }

    fn revert(&mut self, snapshot: SequenceSnapshot) {
        self.elements = snapshot.elements;
    }
}
