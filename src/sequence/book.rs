use std::collections::HashMap;
use std::rc::Rc;

use crate::config::ReplayConfig;
use crate::game::GameId;
use crate::undo::Memento;

use super::element::SequenceElement;
use super::log::Sequence;

/// 对局与序列的一一对应表；序列在第一次访问时创建。
#[derive(Debug, Default)]
pub struct SequenceBook {
    sequences: HashMap<GameId, Sequence>,
    config: ReplayConfig,
}

impl SequenceBook {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            sequences: HashMap::new(),
            config,
        }
    }

    pub fn get_sequence(&mut self, game: &GameId) -> &mut Sequence {
        let config = self.config;
        self.sequences.entry(game.clone()).or_insert_with(|| {
            tracing::debug!(game = %game, "create sequence");
            Sequence::new(game.clone(), 0).with_config(config)
        })
    }

    pub fn find(&self, game: &GameId) -> Option<&Sequence> {
        self.sequences.get(game)
    }

    pub fn append_element(
        &mut self,
        game: &GameId,
        element: SequenceElement,
        memento: Option<&mut Memento<Sequence>>,
    ) {
        self.get_sequence(game).append_element(element, memento);
    }

    pub fn add_element(&mut self, game: &GameId, element: SequenceElement) {
        self.get_sequence(game).add_element(element);
    }

    pub fn get_count(&self, game: &GameId) -> u64 {
        self.find(game).map_or(0, Sequence::count)
    }

    /// 总是覆盖已有序列的计数。
    pub fn set_count(&mut self, game: &GameId, count: u64) {
        self.get_sequence(game).set_count(count);
    }

    pub fn get_validated_count(&self, game: &GameId) -> Option<u64> {
        self.find(game).and_then(Sequence::validated_count)
    }

    pub fn get_elements(&self, game: &GameId) -> &[Rc<SequenceElement>] {
        self.find(game).map(Sequence::elements).unwrap_or_default()
    }
}
