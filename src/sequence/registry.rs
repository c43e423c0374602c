//! 类型标签 → 元素构造器的全局表。
//!
//! 内置元素在首次访问时一次性注册，与模块加载顺序无关；之后的注册按标签覆盖，
//! 重复注册同一类型没有副作用。

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::elements::{MoveElement, NextTurnElement, RotateElement};
use crate::game::Game;

use super::element::{ElementPayload, ElementType, SequenceElement};
use super::error::{SequenceError, SequenceResult};
use super::specs::{ElementSpecs, SpecContext};

/// 把重建出的元素效果直接作用到对局上。
pub type Launcher = fn(&SequenceElement, &mut dyn Game);

#[derive(Clone, Copy)]
pub struct ElementEntry {
    pub create: fn() -> Box<dyn ElementPayload>,
    pub launch: Launcher,
}

impl ElementEntry {
    pub fn of<T: ElementType>() -> Self {
        Self {
            create: create_payload::<T>,
            launch: launch_payload::<T>,
        }
    }
}

fn create_payload<T: ElementType>() -> Box<dyn ElementPayload> {
    Box::new(T::default())
}

fn launch_payload<T: ElementType>(element: &SequenceElement, game: &mut dyn Game) {
    match element.payload::<T>() {
        Some(payload) => payload.launch(game),
        None => tracing::warn!(
            kind = element.kind(),
            expected = T::TYPE,
            "launcher does not match element payload"
        ),
    }
}

#[derive(Default)]
pub struct ElementRegistry {
    entries: HashMap<String, ElementEntry>,
}

impl ElementRegistry {
    fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert::<NextTurnElement>();
        registry.insert::<MoveElement>();
        registry.insert::<RotateElement>();
        registry
    }

    fn insert<T: ElementType>(&mut self) {
        self.entries.insert(T::TYPE.to_string(), ElementEntry::of::<T>());
    }
}

static REGISTRY: Lazy<RwLock<ElementRegistry>> =
    Lazy::new(|| RwLock::new(ElementRegistry::with_builtins()));

pub fn register(label: impl Into<String>, entry: ElementEntry) {
    let label = label.into();
    tracing::debug!(label = %label, "register sequence element");
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entries
        .insert(label, entry);
}

pub fn register_element<T: ElementType>() {
    register(T::TYPE, ElementEntry::of::<T>());
}

fn lookup(label: &str) -> Option<ElementEntry> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .entries
        .get(label)
        .copied()
}

pub fn is_registered(label: &str) -> bool {
    lookup(label).is_some()
}

pub fn registered_types() -> Vec<String> {
    let mut labels: Vec<String> = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .entries
        .keys()
        .cloned()
        .collect();
    labels.sort();
    labels
}

pub fn create_element(id: Option<String>, label: &str) -> Option<SequenceElement> {
    let entry = lookup(label)?;
    Some(SequenceElement::from_boxed(id, label, (entry.create)()))
}

pub fn get_launcher(label: &str) -> Option<Launcher> {
    lookup(label).map(|entry| entry.launch)
}

/// 根据序列化数据重建元素，并挂接到上下文中的对局。
pub fn instantiate(
    id: Option<String>,
    specs: &ElementSpecs,
    context: &SpecContext,
) -> SequenceResult<SequenceElement> {
    let mut element = create_element(id, &specs.kind)
        .ok_or_else(|| SequenceError::unknown_element_type(&specs.kind))?;
    element.from_specs(specs, context)?;
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::testing::RecordingGame;
    use crate::game::GameId;
    use crate::sequence::testing::TestElement;

    #[test]
    fn builtins_are_available_without_explicit_setup() {
        for label in ["next-turn", "move", "rotate"] {
            assert!(is_registered(label), "{label} should be registered");
        }
        assert!(registered_types().contains(&"move".to_string()));
    }

    #[test]
    fn registering_a_label_again_overwrites_the_entry() {
        register("overwritten", ElementEntry::of::<TestElement>());
        let before = create_element(None, "overwritten").expect("label is registered");
        assert!(before.payload::<TestElement>().is_some());

        register("overwritten", ElementEntry::of::<NextTurnElement>());
        let after = create_element(None, "overwritten").expect("label is still registered");

        assert!(after.payload::<NextTurnElement>().is_some(), "latest entry wins");
        assert!(after.payload::<TestElement>().is_none());
        assert_eq!(after.kind(), "overwritten");
    }

    #[test]
    fn create_element_uses_label_and_id() {
        register_element::<TestElement>();
        let element = create_element(Some("e1".into()), "test").expect("test is registered");
        assert_eq!(element.kind(), "test");
        assert_eq!(element.id(), Some("e1"));
        assert!(create_element(None, "no-such-element").is_none());
    }

    #[test]
    fn unknown_launcher_is_absent() {
        assert!(get_launcher("no-such-element").is_none());
    }

    #[test]
    fn launcher_dispatches_to_payload() {
        let mut game = RecordingGame::new("Game");
        let element = SequenceElement::new(NextTurnElement::new(4));
        let launch = get_launcher("next-turn").expect("next-turn is builtin");
        launch(&element, &mut game);
        assert_eq!(game.turns, vec![4]);
    }

    #[test]
    fn instantiate_rejects_unknown_type() {
        let specs = ElementSpecs {
            version: 0,
            kind: "no-such-element".into(),
            content: serde_json::json!({}),
        };
        let error = instantiate(None, &specs, &SpecContext::new(GameId::new("Game")))
            .expect_err("unknown types cannot be rebuilt");
        assert_eq!(error, SequenceError::unknown_element_type("no-such-element"));
    }
}
