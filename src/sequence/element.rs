use std::any::Any;
use std::fmt::{self, Write as _};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::animation::{AnimationEffect, NoEffect, SequenceAnimation};
use crate::game::{Game, GameId};

use super::error::{SequenceError, SequenceResult};
use super::specs::{ElementSpecs, SpecContext};

/// 元素负载的类型擦除编解码，任何 `Serialize + DeserializeOwned` 类型自动获得。
pub trait PayloadCodec {
    fn write_content(&self) -> Result<Value, serde_json::Error>;
    fn read_content(&mut self, content: Value) -> Result<(), serde_json::Error>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> PayloadCodec for T
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn write_content(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn read_content(&mut self, content: Value) -> Result<(), serde_json::Error> {
        *self = serde_json::from_value(content)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 各类元素携带的规则数据。
pub trait ElementPayload: PayloadCodec + fmt::Debug {
    /// 依次追加本元素的字段；字段顺序参与相等比较。
    fn describe(&self, description: &mut ElementDescription);

    /// 可视效果持续的毫秒数。
    fn delay(&self) -> u32 {
        0
    }

    fn effect(&self) -> Box<dyn AnimationEffect> {
        Box::new(NoEffect)
    }
}

/// 可以注册进元素表的具体元素类型。
pub trait ElementType: ElementPayload + Default + Serialize + DeserializeOwned + 'static {
    const TYPE: &'static str;

    /// 不经过动画，直接把效果作用到对局上。
    fn launch(&self, _game: &mut dyn Game) {}
}

/// 元素的可读描述，用于相等比较与诊断输出。
#[derive(Debug, Default)]
pub struct ElementDescription {
    text: String,
}

impl ElementDescription {
    fn new(kind: &str) -> Self {
        Self {
            text: kind.to_string(),
        }
    }

    pub fn field(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        // 写入 String 不会失败
        let _ = write!(self.text, " {name}:{value}");
        self
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// 一条可回放、可序列化的原子变更。
pub struct SequenceElement {
    id: Option<String>,
    kind: String,
    version: u32,
    game: Option<GameId>,
    payload: Box<dyn ElementPayload>,
}

impl SequenceElement {
    pub fn new<T: ElementType>(payload: T) -> Self {
        Self::from_boxed(None, T::TYPE, Box::new(payload))
    }

    pub fn from_boxed(
        id: Option<String>,
        kind: impl Into<String>,
        payload: Box<dyn ElementPayload>,
    ) -> Self {
        let kind = kind.into();
        assert!(!kind.is_empty(), "sequence element requires a type tag");
        Self {
            id,
            kind,
            version: 0,
            game: None,
            payload,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn game(&self) -> Option<&GameId> {
        self.game.as_ref()
    }

    pub(crate) fn attach(&mut self, game: GameId) {
        self.game = Some(game);
    }

    pub fn payload<T: ElementType>(&self) -> Option<&T> {
        (*self.payload).as_any().downcast_ref::<T>()
    }

    pub fn delay(&self) -> u32 {
        self.payload.delay()
    }

    pub fn equals_to(&self, other: Option<&SequenceElement>) -> bool {
        other.is_some_and(|other| self.to_string() == other.to_string())
    }

    /// 生成从 `start_tick` 开始展示本元素效果的动画。
    ///
    /// 对局状态此时已经被修改过，这里只负责可视化。
    pub fn apply(&self, start_tick: u64) -> SequenceAnimation {
        let Some(game) = self.game.clone() else {
            panic!("sequence element `{}` applied before being attached to a game", self.kind);
        };
        SequenceAnimation::new_boxed(game, start_tick, self.delay(), self.payload.effect())
    }

    pub fn to_specs(&self, _context: &SpecContext) -> SequenceResult<ElementSpecs> {
        let content = (*self.payload)
            .write_content()
            .map_err(|error| SequenceError::invalid_content(&self.kind, error))?;
        Ok(ElementSpecs {
            version: self.version,
            kind: self.kind.clone(),
            content,
        })
    }

    pub fn from_specs(&mut self, specs: &ElementSpecs, context: &SpecContext) -> SequenceResult<()> {
        self.attach(context.game.clone());
        self.version = specs.version;
        (*self.payload)
            .read_content(specs.content.clone())
            .map_err(|error| SequenceError::invalid_content(&self.kind, error))
    }
}

impl fmt::Display for SequenceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut description = ElementDescription::new(&self.kind);
        self.payload.describe(&mut description);
        f.write_str(&description.into_string())
    }
}

impl fmt::Debug for SequenceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceElement")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("game", &self.game)
            .field("payload", &self.payload)
            .finish()
    }
}

impl PartialEq for SequenceElement {
    fn eq(&self, other: &Self) -> bool {
        self.equals_to(Some(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::testing::TestElement;

    #[test]
    fn description_lists_type_then_fields() {
        let element = SequenceElement::new(TestElement::new("d1"));
        assert_eq!(element.to_string(), "test data:d1");
    }

    #[test]
    fn equality_follows_description() {
        let first = SequenceElement::new(TestElement::new("d1")).with_id("a");
        let second = SequenceElement::new(TestElement::new("d1")).with_id("b");
        let third = SequenceElement::new(TestElement::new("d2"));

        assert!(first.equals_to(Some(&second)), "ids do not take part in equality");
        assert!(!first.equals_to(Some(&third)));
        assert!(!first.equals_to(None));
    }

    #[test]
    fn to_specs_writes_version_type_and_content() {
        let context = SpecContext::new(GameId::new("Game"));
        let element = SequenceElement::new(TestElement::new("d1")).with_version(3);
        let specs = element.to_specs(&context).expect("element should serialize");

        assert_eq!(specs.version, 3);
        assert_eq!(specs.kind, "test");
        assert_eq!(specs.content, serde_json::json!({ "data": "d1" }));
    }

    #[test]
    fn from_specs_attaches_game_and_is_idempotent() {
        let context = SpecContext::new(GameId::new("Game"));
        let specs = ElementSpecs {
            version: 1,
            kind: "test".into(),
            content: serde_json::json!({ "data": "loaded" }),
        };
        let mut element = SequenceElement::new(TestElement::default());

        element.from_specs(&specs, &context).expect("first load");
        element.from_specs(&specs, &context).expect("second load");

        assert_eq!(element.game(), Some(&GameId::new("Game")));
        assert_eq!(element.version(), 1);
        assert_eq!(
            element.payload::<TestElement>().map(|p| p.data.as_str()),
            Some("loaded")
        );
    }

    #[test]
    fn from_specs_rejects_bad_content() {
        let context = SpecContext::new(GameId::new("Game"));
        let specs = ElementSpecs {
            version: 0,
            kind: "test".into(),
            content: serde_json::json!({ "data": 12 }),
        };
        let mut element = SequenceElement::new(TestElement::default());
        let error = element
            .from_specs(&specs, &context)
            .expect_err("numeric data should be rejected");
        assert!(matches!(error, SequenceError::InvalidContent { .. }));
    }

    #[test]
    #[should_panic(expected = "before being attached")]
    fn apply_requires_attached_game() {
        let element = SequenceElement::new(TestElement::new("d1"));
        let _ = element.apply(0);
    }

    #[test]
    fn apply_uses_delay_as_duration() {
        let mut element = SequenceElement::new(TestElement::new("d1").with_delay(200));
        element.attach(GameId::new("Game"));
        let animation = element.apply(4);
        assert_eq!(animation.tick(), 5);
        assert_eq!(animation.duration(), 200);
    }
}
