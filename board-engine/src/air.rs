//! 空中状态
//!
//! 自上一个稳定局面以来，哪些格子被提走了什么、哪些格子被放下了
//! 什么。键唯一，顺序无关。占用为空的观察不携带信息，从一开始就
//! 不会进入映射（类型上棋子不可为空）。

use std::collections::HashMap;

use protocol::{Piece, Square};

/// 提起 / 放下两张映射
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirState {
    lifted: HashMap<Square, Piece>,
    dropped: HashMap<Square, Piece>,
}

impl AirState {
    /// 创建空的空中状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 两张映射都为空（局面稳定）
    pub fn is_empty(&self) -> bool {
        self.lifted.is_empty() && self.dropped.is_empty()
    }

    /// 清空（走法提交后调用）
    pub fn clear(&mut self) {
        self.lifted.clear();
        self.dropped.clear();
    }

    pub fn lifted(&self) -> &HashMap<Square, Piece> {
        &self.lifted
    }

    pub fn dropped(&self) -> &HashMap<Square, Piece> {
        &self.dropped
    }

    /// 查询某格最近被放下的棋子
    pub fn dropped_at(&self, square: Square) -> Option<Piece> {
        self.dropped.get(&square).copied()
    }

    /// 记录一次提子
    ///
    /// 之前检测到落在该格的棋子已不在，顺手清掉陈旧的放下记录。
    pub fn record_lift(&mut self, square: Square, piece: Piece) {
        self.lifted.insert(square, piece);
        self.dropped.remove(&square);
    }

    /// 记录一次放子，总是覆盖旧值（最新观察为准）
    pub fn record_drop(&mut self, square: Square, piece: Piece) {
        self.dropped.insert(square, piece);
    }

    /// 特殊信号形态：恰好一提一放，同格同子
    ///
    /// 不修改任何状态，只做判定。
    pub fn special_pair(&self) -> Option<(Square, Piece)> {
        if self.lifted.len() != 1 || self.dropped.len() != 1 {
            return None;
        }
        let (&square, &up) = self.lifted.iter().next()?;
        let &down = self.dropped.get(&square)?;
        if up != down {
            return None;
        }
        Some((square, up))
    }

    /// 化简：删除同格同子的提放对
    ///
    /// 这样能识别“提起又放回原格”的无效操作，也能吸收乱序到达的
    /// 单格更新。幂等：连续执行两次结果不变。
    pub fn simplify(&mut self) {
        let returned: Vec<Square> = self
            .lifted
            .iter()
            .filter(|&(square, up)| self.dropped.get(square) == Some(up))
            .map(|(&square, _)| square)
            .collect();
        for square in returned {
            self.lifted.remove(&square);
            self.dropped.remove(&square);
        }
    }

    /// 调试用摘要，形如 `{ [K@e1] / [] }`
    pub fn summary(&self) -> String {
        fn side(map: &HashMap<Square, Piece>) -> String {
            let mut elems: Vec<String> = map
                .iter()
                .map(|(square, piece)| format!("{}@{}", piece, square))
                .collect();
            elems.sort();
            format!("[{}]", elems.join(", "))
        }
        format!("{{ {} / {} }}", side(&self.lifted), side(&self.dropped))
    }
}
