//! 动作序列：追加、提交、确认、序列化与回放。

pub mod book;
pub mod element;
pub mod error;
pub mod log;
pub mod registry;
pub mod specs;

pub use book::SequenceBook;
pub use element::{
    ElementDescription, ElementPayload, ElementType, PayloadCodec, SequenceElement,
};
pub use error::{SequenceError, SequenceResult};
pub use log::{Sequence, SequenceSnapshot};
pub use registry::{ElementEntry, Launcher};
pub use specs::{ElementSpecs, SequenceSpecs, SpecContext, SEQUENCE_VERSION};
