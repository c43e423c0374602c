pub mod animation;
pub mod config;
pub mod elements;
pub mod game;
pub mod sequence;
pub mod undo;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use animation::{
    AnimationEffect, Animator, Continuation, NoEffect, SequenceAnimation, ADELAY,
};
pub use config::ReplayConfig;
pub use elements::{MoveElement, NextTurnElement, RotateElement};
pub use game::{Game, GameId, HexPoint, UnitPose};
pub use sequence::{
    registry, ElementPayload, ElementSpecs, ElementType, Sequence, SequenceBook, SequenceElement,
    SequenceError, SequenceResult, SequenceSpecs, SpecContext,
};
pub use undo::{Memento, Undoable};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    let message = format!(
        "sequence engine ready: {}",
        registry::registered_types().join(", ")
    );
    web_sys::console::log_1(&message.into());
}

fn to_js_error(error: SequenceError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// 浏览器侧的对局记录：只保存序列回放会触及的可视状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserGame {
    pub id: GameId,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub units: HashMap<String, UnitPose>,
}

impl BrowserGame {
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            turn: 0,
            units: HashMap::new(),
        }
    }
}

impl Game for BrowserGame {
    fn id(&self) -> &GameId {
        &self.id
    }

    fn next_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    fn place_unit(&mut self, unit: &str, pose: UnitPose) {
        self.units.insert(unit.to_string(), pose);
    }
}

/// 前端提交的单个元素：线上格式加上可选的 id。
#[derive(Debug, Deserialize)]
struct ElementRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    specs: ElementSpecs,
}

fn build_element(json: &str, context: &SpecContext) -> SequenceResult<SequenceElement> {
    let request: ElementRequest = serde_json::from_str(json)?;
    registry::instantiate(request.id, &request.specs, context)
}

#[wasm_bindgen]
pub struct GameSession {
    game: Rc<RefCell<BrowserGame>>,
    sequence: Sequence,
    memento: Memento<Sequence>,
    animator: Rc<RefCell<Animator>>,
    driving: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl GameSession {
    #[wasm_bindgen(constructor)]
    pub fn new(game_id: String, config_json: Option<String>) -> Result<GameSession, JsValue> {
        let config = match config_json {
            Some(json) => serde_json::from_str(&json).map_err(serde_to_js_error)?,
            None => ReplayConfig::default(),
        };
        let id = GameId::new(game_id);
        Ok(GameSession {
            game: Rc::new(RefCell::new(BrowserGame::new(id.clone()))),
            sequence: Sequence::new(id, 0).with_config(config),
            memento: Memento::new(),
            animator: Rc::new(RefCell::new(Animator::new())),
            driving: Rc::new(Cell::new(false)),
        })
    }

    fn context(&self) -> SpecContext {
        SpecContext::new(self.sequence.game().clone())
    }

    /// 追加玩家操作，并登记撤销点。
    pub fn append_json(&mut self, element_json: &str) -> Result<(), JsValue> {
        let element = build_element(element_json, &self.context()).map_err(to_js_error)?;
        self.sequence.append_element(element, Some(&mut self.memento));
        Ok(())
    }

    pub fn add_json(&mut self, element_json: &str) -> Result<(), JsValue> {
        let element = build_element(element_json, &self.context()).map_err(to_js_error)?;
        self.sequence.add_element(element);
        Ok(())
    }

    /// 不经动画直接把元素效果作用到对局上。
    pub fn launch_json(&mut self, element_json: &str) -> Result<bool, JsValue> {
        let element = build_element(element_json, &self.context()).map_err(to_js_error)?;
        let Some(launch) = registry::get_launcher(element.kind()) else {
            return Ok(false);
        };
        launch(&element, &mut *self.game.borrow_mut());
        Ok(true)
    }

    /// 在上一批次确认之前再次提交会 panic。
    pub fn commit(&mut self) -> f64 {
        self.sequence.commit().count() as f64
    }

    pub fn acknowledge(&mut self) {
        self.sequence.acknowledge();
    }

    pub fn open_transaction(&mut self) {
        self.memento.open();
    }

    pub fn undo(&mut self) -> bool {
        self.memento.undo(&mut self.sequence)
    }

    pub fn redo(&mut self) -> bool {
        self.memento.redo(&mut self.sequence)
    }

    pub fn count(&self) -> f64 {
        self.sequence.count() as f64
    }

    pub fn set_count(&mut self, count: u32) {
        self.sequence.set_count(u64::from(count));
    }

    pub fn validated_count(&self) -> Option<f64> {
        self.sequence.validated_count().map(|count| count as f64)
    }

    pub fn is_replaying(&self) -> bool {
        self.sequence.is_replaying()
    }

    pub fn pending_descriptions(&self) -> Vec<String> {
        self.sequence
            .elements()
            .iter()
            .map(|element| element.to_string())
            .collect()
    }

    pub fn batch_json(&self) -> Result<String, JsValue> {
        let specs = self.sequence.to_specs().map_err(to_js_error)?;
        serde_json::to_string(&specs).map_err(serde_to_js_error)
    }

    pub fn load_json(&mut self, batch_json: &str) -> Result<(), JsValue> {
        let specs: SequenceSpecs = serde_json::from_str(batch_json).map_err(serde_to_js_error)?;
        self.sequence.from_specs(&specs).map_err(to_js_error)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&*self.game.borrow()).map_err(serde_to_js_error)
    }

    /// 回放待处理元素；Promise 在最后一个动画结束时以结束 tick 兑现。
    pub fn replay(&mut self, start_tick: u32) -> Promise {
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let end_tick = self.sequence.replay(
            u64::from(start_tick),
            &mut self.animator.borrow_mut(),
            move || flag.set(true),
        );

        let animator = Rc::clone(&self.animator);
        let game = Rc::clone(&self.game);
        let driving = Rc::clone(&self.driving);
        // 同一时刻只有一个循环推进动画
        let owns_driver = !driving.replace(true);

        future_to_promise(async move {
            loop {
                let idle = animator.borrow().is_idle();
                if idle || (!owns_driver && done.get()) {
                    break;
                }
                TimeoutFuture::new(ADELAY).await;
                if owns_driver {
                    animator.borrow_mut().advance(&mut *game.borrow_mut());
                }
            }
            if owns_driver {
                driving.set(false);
            }
            Ok(JsValue::from_f64(end_tick as f64))
        })
    }

    pub fn clear_animations(&mut self) {
        self.animator.borrow_mut().clear();
    }
}

#[wasm_bindgen(js_name = "registeredElementTypes")]
pub fn registered_element_types() -> Vec<String> {
    registry::registered_types()
}

/// 解析一个批次并以 JS 对象返回，便于前端检查。
#[wasm_bindgen(js_name = "decodeBatch")]
pub fn decode_batch(batch_json: &str) -> Result<JsValue, JsValue> {
    let specs: SequenceSpecs = serde_json::from_str(batch_json).map_err(serde_to_js_error)?;
    to_value(&specs).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
