//! 走法推断引擎
//!
//! 包含:
//! - 空中状态（提起 / 放下记录）
//! - 推断状态机（信号识别、伪合法过滤、走法提交）
//! - 规则协作方接缝 (RuleBook trait)

mod air;
mod engine;
mod rules;

pub use air::AirState;
pub use engine::{EngineEvent, InferenceEngine};
pub use rules::{CoordinateRules, Move, RuleBook};
