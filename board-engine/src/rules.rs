//! 规则协作方接口
//!
//! 引擎只做伪合法过滤，完整的规则校验和记法渲染交给外部的象棋
//! 规则引擎。这里定义接缝，并提供一个宽容的坐标记法占位实现。

use protocol::{king_castled, king_home, Board, PieceType, Square, Wing};

/// 走法候选：起点格到终点格
///
/// 易位以王的移动表示，车随动由规则方推断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// 规则协作方
///
/// 对完整合法性和消歧记法拥有最终裁决权。`Some(记法)` 表示接受，
/// `None` 表示该候选在完整规则下不合法。
pub trait RuleBook {
    fn validate(&mut self, board: &Board, mv: Move) -> Option<String>;
}

/// 坐标记法占位实现
///
/// 接受一切结构上成立的候选，记法用纯坐标（易位除外）。接入真正
/// 的规则引擎之前用它跑通整条链路。
#[derive(Debug, Default)]
pub struct CoordinateRules;

impl RuleBook for CoordinateRules {
    fn validate(&mut self, board: &Board, mv: Move) -> Option<String> {
        let piece = board.get(mv.from)?;

        // 王从初始格横跨两列：按易位渲染
        if piece.piece_type == PieceType::King && mv.from == king_home(piece.side) {
            if mv.to == king_castled(piece.side, Wing::Kingside) {
                return Some("O-O".to_string());
            }
            if mv.to == king_castled(piece.side, Wing::Queenside) {
                return Some("O-O-O".to_string());
            }
        }

        Some(mv.to_string())
    }
}
