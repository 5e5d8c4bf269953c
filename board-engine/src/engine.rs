//! 走法推断状态机
//!
//! 消费解码后的单格更新事件，维护空中状态，在恰当的时机判定一步
//! 完整走法（或一次特殊信号）已经发生。棋盘上的人只会提起和放下
//! 棋子，事件到达顺序任意，还夹杂失误和调整，这里的职责是在尽量
//! 少误报漏报的前提下把事件流还原成走法。

use protocol::{
    king_castled, king_home, rook_castled, rook_home, Board, BoardMessage, Piece, PieceType, Side,
    Square, Wing,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::air::AirState;
use crate::rules::{Move, RuleBook};

/// 引擎对外输出的事件
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// 收到首个棋盘快照，推断引擎就绪
    BoardInitialized { fen: String },
    /// 识别出一步完整走法（已通过规则协作方确认）
    MoveDetected {
        side: Side,
        from: Square,
        to: Square,
        notation: String,
    },
    /// 信号：强制设置行棋方（王在初始格上提起又放回）
    TurnSet { side: Side },
    /// 信号：翻转某角的易位可用性（车在初始角上提起又放回）
    CastlingToggled {
        side: Side,
        wing: Wing,
        allowed: bool,
    },
}

/// 走法推断引擎
///
/// 独占持有棋盘状态；只应由单个消费者驱动（见 I/O 侧的单消费者
/// 约束），因此内部不加锁。
pub struct InferenceEngine<R: RuleBook> {
    /// 最近一次提交后的棋盘；首个快照到达前为空
    board: Option<Board>,
    /// 自上一个稳定局面以来的提放记录
    air: AirState,
    /// 自上次提交或信号以来第一枚被提起的棋子
    first_lifted: Option<(Square, Piece)>,
    rules: R,
}

impl<R: RuleBook> InferenceEngine<R> {
    /// 创建引擎，棋盘等待首个快照
    pub fn new(rules: R) -> Self {
        Self {
            board: None,
            air: AirState::new(),
            first_lifted: None,
            rules,
        }
    }

    /// 当前棋盘（首个快照前为 `None`）
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// 当前空中状态
    pub fn air(&self) -> &AirState {
        &self.air
    }

    /// 处理一条消息，至多产生一个事件
    pub fn process(&mut self, message: &BoardMessage) -> Option<EngineEvent> {
        match message {
            BoardMessage::BoardSnapshot(board) => self.handle_snapshot(board),
            BoardMessage::FieldChange { square, piece } => match piece {
                None => self.handle_lift(*square),
                Some(piece) => self.handle_drop(*square, *piece),
            },
            // 棋钟、版本、文本和未解码消息与走法推断无关
            other => {
                debug!(message = %other, "与推断无关的消息");
                None
            }
        }
    }

    /// 首个快照建立棋盘；后续快照有意忽略
    ///
    /// 已知局限：对局中途的快照不用于纠偏，以免覆盖引擎自己维护
    /// 的行棋方和易位标志。
    fn handle_snapshot(&mut self, board: &Board) -> Option<EngineEvent> {
        if self.board.is_some() {
            debug!("忽略后续棋盘快照");
            return None;
        }
        let fen = board.fen();
        info!(%fen, "收到初始棋盘快照");
        self.board = Some(board.clone());
        Some(EngineEvent::BoardInitialized { fen })
    }

    /// 某格变空：推断被提起的是什么棋子
    ///
    /// 固件只说“这格空了”，不说提走的是什么。未提交的走法里棋盘
    /// 还是旧值，所以优先查空中状态里最近放到该格的棋子，查不到
    /// 才回退到棋盘。
    fn handle_lift(&mut self, square: Square) -> Option<EngineEvent> {
        let Some(board) = &self.board else {
            warn!(%square, "快照尚未到达，丢弃单格更新");
            return None;
        };

        let piece = self.air.dropped_at(square).or_else(|| board.get(square));
        let Some(piece) = piece else {
            // 引擎认知里这格本来就是空的，事件不携带信息
            debug!(%square, "空格上的提子事件，丢弃");
            return None;
        };

        self.air.record_lift(square, piece);
        if self.first_lifted.is_none() {
            self.first_lifted = Some((square, piece));
        }
        self.air.simplify();
        debug!(air = %self.air.summary(), "提子");
        None
    }

    /// 某格出现棋子：依次尝试信号判定、化简、走法提交
    fn handle_drop(&mut self, square: Square, piece: Piece) -> Option<EngineEvent> {
        if self.board.is_none() {
            warn!(%square, "快照尚未到达，丢弃单格更新");
            return None;
        }

        self.air.record_drop(square, piece);
        debug!(air = %self.air.summary(), "放子");

        let signal = self.apply_special_signal();
        self.air.simplify();
        if signal.is_some() {
            self.first_lifted = None;
            return signal;
        }

        self.try_commit()
    }

    /// 特殊信号：恰好一提一放、同格同子
    ///
    /// 王放回初始格指定行棋方；车放回初始角翻转该角易位标志。
    /// 其余形态不构成信号。本函数不修改空中状态。
    fn apply_special_signal(&mut self) -> Option<EngineEvent> {
        let (square, piece) = self.air.special_pair()?;

        // 对称性交叉校验：信号理应就是本轮第一枚被提起的棋子
        if let Some(first) = self.first_lifted {
            if first != (square, piece) {
                debug!(
                    first = %format!("{}@{}", first.1, first.0),
                    pair = %format!("{}@{}", piece, square),
                    "信号形态与首枚提子不对称"
                );
            }
        }

        let board = self.board.as_mut()?;
        match piece.piece_type {
            PieceType::King if square == king_home(piece.side) => {
                board.side_to_move = piece.side;
                info!(side = ?piece.side, "信号：设置行棋方");
                Some(EngineEvent::TurnSet { side: piece.side })
            }
            PieceType::Rook => {
                for wing in [Wing::Kingside, Wing::Queenside] {
                    if square == rook_home(piece.side, wing) {
                        let allowed = board.castling.toggle(piece.side, wing);
                        info!(side = ?piece.side, wing = ?wing, allowed, "信号：翻转易位可用性");
                        return Some(EngineEvent::CastlingToggled {
                            side: piece.side,
                            wing,
                            allowed,
                        });
                    }
                }
                debug!(pair = %format!("{}@{}", piece, square), "无法识别的信号形态");
                None
            }
            _ => {
                debug!(pair = %format!("{}@{}", piece, square), "无法识别的信号形态");
                None
            }
        }
    }

    /// 伪合法过滤与提交
    ///
    /// 按当前行棋方划分空中状态，不满足走法形态就保持现状继续
    /// 累积；满足则把候选提交给规则协作方裁决。
    fn try_commit(&mut self) -> Option<EngineEvent> {
        let side = self.board.as_ref()?.side_to_move;

        let mut own_lifted: Vec<(Square, Piece)> = Vec::new();
        let mut enemy_lifted: Vec<(Square, Piece)> = Vec::new();
        for (&square, &piece) in self.air.lifted() {
            if piece.side == side {
                own_lifted.push((square, piece));
            } else {
                enemy_lifted.push((square, piece));
            }
        }

        let mut own_dropped: Vec<(Square, Piece)> = Vec::new();
        let mut enemy_dropped = 0usize;
        for (&square, &piece) in self.air.dropped() {
            if piece.side == side {
                own_dropped.push((square, piece));
            } else {
                enemy_dropped += 1;
            }
        }

        if own_lifted.is_empty() {
            debug!("不构成走法：没有己方棋子被提起");
            return None;
        }
        if own_lifted.len() > 2 {
            debug!("不构成走法：提起的己方棋子超过两枚");
            return None;
        }
        if own_lifted.len() > own_dropped.len() {
            debug!("不构成走法：仍有棋子在空中");
            return None;
        }
        if own_lifted.len() < own_dropped.len() {
            debug!("不构成走法：凭空多出棋子");
            return None;
        }
        if enemy_dropped > 0 {
            debug!("不构成走法：放下了对方棋子");
            return None;
        }
        if enemy_lifted.len() > 1 {
            debug!("不构成走法：提起的对方棋子超过一枚");
            return None;
        }

        if own_dropped.len() == 2 {
            return self.try_commit_castle(side);
        }

        // 单枚棋子：一提一放且必须同子
        let (from, lifted_piece) = own_lifted[0];
        let (to, dropped_piece) = own_dropped[0];
        if lifted_piece != dropped_piece {
            debug!(
                lifted = %format!("{}@{}", lifted_piece, from),
                dropped = %format!("{}@{}", dropped_piece, to),
                "棋子在空中变了，继续累积"
            );
            return None;
        }

        let mv = Move { from, to };
        let Some(notation) = self.rules.validate(self.board.as_ref()?, mv) else {
            // 已知缺口：此处不清空空中状态，引擎可能停在等待输入的状态
            warn!(%mv, "规则协作方拒绝了走法候选");
            return None;
        };

        let board = self.board.as_mut()?;
        // 被提走的对方棋子视为被吃，从它原来的格上移除（覆盖吃过路兵）
        for (captured_square, _) in &enemy_lifted {
            board.set(*captured_square, None);
        }
        board.move_piece(from, to);
        match lifted_piece.piece_type {
            PieceType::King => board.castling.clear_side(side),
            PieceType::Rook => {
                for wing in [Wing::Kingside, Wing::Queenside] {
                    if from == rook_home(side, wing) {
                        board.castling.set(side, wing, false);
                    }
                }
            }
            _ => {}
        }
        board.switch_turn();

        self.air.clear();
        self.first_lifted = None;
        info!(side = ?side, %notation, "检测到走法");
        Some(EngineEvent::MoveDetected {
            side,
            from,
            to,
            notation,
        })
    }

    /// 两枚己方落子：唯一合法解释是易位
    ///
    /// 与行棋方该翼的固定格集精确比对：王从初始格、车从对应角提
    /// 起，各自落在规范落点，空中再无其他棋子。不精确匹配就继续
    /// 累积，不急着下结论。
    fn try_commit_castle(&mut self, side: Side) -> Option<EngineEvent> {
        let king = Piece::new(PieceType::King, side);
        let rook = Piece::new(PieceType::Rook, side);

        for wing in [Wing::Kingside, Wing::Queenside] {
            let expected_lifted: HashMap<Square, Piece> =
                [(king_home(side), king), (rook_home(side, wing), rook)]
                    .into_iter()
                    .collect();
            let expected_dropped: HashMap<Square, Piece> = [
                (king_castled(side, wing), king),
                (rook_castled(side, wing), rook),
            ]
            .into_iter()
            .collect();

            if self.air.lifted() != &expected_lifted || self.air.dropped() != &expected_dropped {
                continue;
            }

            let mv = Move {
                from: king_home(side),
                to: king_castled(side, wing),
            };
            let Some(notation) = self.rules.validate(self.board.as_ref()?, mv) else {
                warn!(%mv, "规则协作方拒绝了易位候选");
                return None;
            };

            let board = self.board.as_mut()?;
            board.move_piece(king_home(side), king_castled(side, wing));
            board.move_piece(rook_home(side, wing), rook_castled(side, wing));
            board.castling.clear_side(side);
            board.switch_turn();

            self.air.clear();
            self.first_lifted = None;
            info!(side = ?side, %notation, "检测到易位");
            return Some(EngineEvent::MoveDetected {
                side,
                from: mv.from,
                to: mv.to,
                notation,
            });
        }

        debug!("两枚落子但不构成易位形态，继续累积");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CoordinateRules;

    /// 拒绝一切候选的规则协作方
    struct RejectAll;

    impl RuleBook for RejectAll {
        fn validate(&mut self, _board: &Board, _mv: Move) -> Option<String> {
            None
        }
    }

    fn piece(piece_type: PieceType, side: Side) -> Piece {
        Piece::new(piece_type, side)
    }

    fn sq(file: u8, rank: u8) -> Square {
        Square::new_unchecked(file, rank)
    }

    /// 标准初始局面
    fn initial_board() -> Board {
        let mut squares = [None; 64];
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in back.iter().enumerate() {
            let file = file as u8;
            squares[sq(file, 0).index()] = Some(piece(*piece_type, Side::White));
            squares[sq(file, 1).index()] = Some(piece(PieceType::Pawn, Side::White));
            squares[sq(file, 6).index()] = Some(piece(PieceType::Pawn, Side::Black));
            squares[sq(file, 7).index()] = Some(piece(*piece_type, Side::Black));
        }
        Board::from_snapshot(squares)
    }

    fn engine_with_initial_board() -> InferenceEngine<CoordinateRules> {
        let mut engine = InferenceEngine::new(CoordinateRules);
        let event = engine.process(&BoardMessage::BoardSnapshot(initial_board()));
        assert!(matches!(event, Some(EngineEvent::BoardInitialized { .. })));
        engine
    }

    fn lift(engine: &mut InferenceEngine<impl RuleBook>, square: Square) -> Option<EngineEvent> {
        engine.process(&BoardMessage::FieldChange {
            square,
            piece: None,
        })
    }

    fn place(
        engine: &mut InferenceEngine<impl RuleBook>,
        square: Square,
        p: Piece,
    ) -> Option<EngineEvent> {
        engine.process(&BoardMessage::FieldChange {
            square,
            piece: Some(p),
        })
    }

    #[test]
    fn test_duplicate_snapshot_ignored() {
        let mut engine = engine_with_initial_board();
        let fen_before = engine.board().unwrap().fen();

        // 第二个快照（空棋盘）必须被忽略，棋盘保持不变
        let event = engine.process(&BoardMessage::BoardSnapshot(Board::empty()));
        assert_eq!(event, None);
        assert_eq!(engine.board().unwrap().fen(), fen_before);
    }

    #[test]
    fn test_field_change_before_snapshot_ignored() {
        let mut engine = InferenceEngine::new(CoordinateRules);
        let event = lift(&mut engine, sq(4, 1));
        assert_eq!(event, None);
        assert!(engine.air().is_empty());
    }

    #[test]
    fn test_simple_pawn_move() {
        let mut engine = engine_with_initial_board();

        assert_eq!(lift(&mut engine, sq(4, 1)), None);
        let event = place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::White,
                from: sq(4, 1),
                to: sq(4, 3),
                notation: "e2e4".to_string(),
            })
        );

        let board = engine.board().unwrap();
        assert_eq!(board.side_to_move, Side::Black);
        assert!(board.get(sq(4, 1)).is_none());
        assert_eq!(
            board.get(sq(4, 3)),
            Some(piece(PieceType::Pawn, Side::White))
        );
        assert!(engine.air().is_empty());
    }

    #[test]
    fn test_capture() {
        let mut engine = engine_with_initial_board();

        // 1. e4 d5 之后白兵吃 d5
        lift(&mut engine, sq(4, 1));
        place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));
        lift(&mut engine, sq(3, 6));
        place(&mut engine, sq(3, 4), piece(PieceType::Pawn, Side::Black));

        // 吃子时两枚棋子都会离板，顺序任意；这里对方的兵先被提起
        assert_eq!(lift(&mut engine, sq(3, 4)), None);
        assert_eq!(lift(&mut engine, sq(4, 3)), None);
        let event = place(&mut engine, sq(3, 4), piece(PieceType::Pawn, Side::White));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::White,
                from: sq(4, 3),
                to: sq(3, 4),
                notation: "e4d5".to_string(),
            })
        );

        let board = engine.board().unwrap();
        assert_eq!(
            board.get(sq(3, 4)),
            Some(piece(PieceType::Pawn, Side::White))
        );
        assert!(board.get(sq(4, 3)).is_none());
        assert_eq!(board.side_to_move, Side::Black);
    }

    #[test]
    fn test_en_passant_capture_clears_pawn_square() {
        let mut engine = engine_with_initial_board();

        // 摆出吃过路兵的局面：白兵到 e5，黑兵 d7-d5
        lift(&mut engine, sq(4, 1));
        place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));
        lift(&mut engine, sq(0, 6));
        place(&mut engine, sq(0, 5), piece(PieceType::Pawn, Side::Black));
        lift(&mut engine, sq(4, 3));
        place(&mut engine, sq(4, 4), piece(PieceType::Pawn, Side::White));
        lift(&mut engine, sq(3, 6));
        place(&mut engine, sq(3, 4), piece(PieceType::Pawn, Side::Black));

        // exd6 e.p.：黑兵从 d5 离板，白兵 e5 -> d6
        lift(&mut engine, sq(3, 4));
        lift(&mut engine, sq(4, 4));
        let event = place(&mut engine, sq(3, 5), piece(PieceType::Pawn, Side::White));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::White,
                from: sq(4, 4),
                to: sq(3, 5),
                notation: "e5d6".to_string(),
            })
        );

        // 被吃的兵必须从 d5 消失
        let board = engine.board().unwrap();
        assert!(board.get(sq(3, 4)).is_none());
        assert_eq!(
            board.get(sq(3, 5)),
            Some(piece(PieceType::Pawn, Side::White))
        );
    }

    #[test]
    fn test_king_tap_signal() {
        let mut engine = engine_with_initial_board();
        let fen_before = engine.board().unwrap().fen();

        // 白王提起又放回 e1：行棋方设为白方，棋盘不动
        assert_eq!(lift(&mut engine, Square::E1), None);
        let event = place(&mut engine, Square::E1, piece(PieceType::King, Side::White));

        assert_eq!(event, Some(EngineEvent::TurnSet { side: Side::White }));
        assert_eq!(engine.board().unwrap().fen(), fen_before);
        assert!(engine.air().is_empty());
    }

    #[test]
    fn test_black_king_tap_switches_turn() {
        let mut engine = engine_with_initial_board();

        assert_eq!(lift(&mut engine, Square::E8), None);
        let event = place(&mut engine, Square::E8, piece(PieceType::King, Side::Black));

        assert_eq!(event, Some(EngineEvent::TurnSet { side: Side::Black }));
        assert_eq!(engine.board().unwrap().side_to_move, Side::Black);
    }

    #[test]
    fn test_rook_tap_toggles_castling() {
        let mut engine = engine_with_initial_board();

        // 初始快照推断出 a1 角可易位；敲一下关掉
        lift(&mut engine, Square::A1);
        let event = place(&mut engine, Square::A1, piece(PieceType::Rook, Side::White));
        assert_eq!(
            event,
            Some(EngineEvent::CastlingToggled {
                side: Side::White,
                wing: Wing::Queenside,
                allowed: false,
            })
        );

        // 再敲一下开回来
        lift(&mut engine, Square::A1);
        let event = place(&mut engine, Square::A1, piece(PieceType::Rook, Side::White));
        assert_eq!(
            event,
            Some(EngineEvent::CastlingToggled {
                side: Side::White,
                wing: Wing::Queenside,
                allowed: true,
            })
        );
    }

    #[test]
    fn test_pawn_tap_is_not_a_signal() {
        let mut engine = engine_with_initial_board();

        lift(&mut engine, sq(4, 1));
        let event = place(&mut engine, sq(4, 1), piece(PieceType::Pawn, Side::White));

        // 普通棋子放回原格：无信号，化简后回到稳定状态
        assert_eq!(event, None);
        assert!(engine.air().is_empty());
    }

    /// f1、g1 已腾空的初始局面，用于易位测试
    fn castling_ready_engine() -> InferenceEngine<CoordinateRules> {
        let mut board = initial_board();
        board.set(Square::F1, None);
        board.set(Square::G1, None);
        let mut engine = InferenceEngine::new(CoordinateRules);
        engine.process(&BoardMessage::BoardSnapshot(board));
        engine
    }

    #[test]
    fn test_kingside_castle() {
        let mut engine = castling_ready_engine();

        assert_eq!(lift(&mut engine, Square::E1), None);
        assert_eq!(lift(&mut engine, Square::H1), None);
        assert_eq!(
            place(&mut engine, Square::G1, piece(PieceType::King, Side::White)),
            None
        );
        let event = place(&mut engine, Square::F1, piece(PieceType::Rook, Side::White));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::White,
                from: Square::E1,
                to: Square::G1,
                notation: "O-O".to_string(),
            })
        );

        let board = engine.board().unwrap();
        assert_eq!(
            board.get(Square::G1),
            Some(piece(PieceType::King, Side::White))
        );
        assert_eq!(
            board.get(Square::F1),
            Some(piece(PieceType::Rook, Side::White))
        );
        assert!(board.get(Square::E1).is_none());
        assert!(board.get(Square::H1).is_none());
        assert_eq!(board.side_to_move, Side::Black);
        assert!(!board.castling.get(Side::White, Wing::Kingside));
        assert!(!board.castling.get(Side::White, Wing::Queenside));
        assert!(engine.air().is_empty());
    }

    #[test]
    fn test_kingside_castle_drops_in_reverse_order() {
        let mut engine = castling_ready_engine();

        // 两枚棋子都提起后，车先落也必须识别
        lift(&mut engine, Square::H1);
        lift(&mut engine, Square::E1);
        assert_eq!(
            place(&mut engine, Square::F1, piece(PieceType::Rook, Side::White)),
            None
        );
        let event = place(&mut engine, Square::G1, piece(PieceType::King, Side::White));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::White,
                from: Square::E1,
                to: Square::G1,
                notation: "O-O".to_string(),
            })
        );
    }

    #[test]
    fn test_queenside_castle_black() {
        let mut board = initial_board();
        board.set(Square::new_unchecked(1, 7), None);
        board.set(Square::C8, None);
        board.set(Square::D8, None);
        let mut engine = InferenceEngine::new(CoordinateRules);
        engine.process(&BoardMessage::BoardSnapshot(board));
        // 快照不携带行棋方，用信号把行棋方设为黑方
        lift(&mut engine, Square::E8);
        place(&mut engine, Square::E8, piece(PieceType::King, Side::Black));

        lift(&mut engine, Square::E8);
        lift(&mut engine, Square::A8);
        place(&mut engine, Square::C8, piece(PieceType::King, Side::Black));
        let event = place(&mut engine, Square::D8, piece(PieceType::Rook, Side::Black));

        assert_eq!(
            event,
            Some(EngineEvent::MoveDetected {
                side: Side::Black,
                from: Square::E8,
                to: Square::C8,
                notation: "O-O-O".to_string(),
            })
        );
        let board = engine.board().unwrap();
        assert_eq!(
            board.get(Square::C8),
            Some(piece(PieceType::King, Side::Black))
        );
        assert_eq!(
            board.get(Square::D8),
            Some(piece(PieceType::Rook, Side::Black))
        );
        assert_eq!(board.side_to_move, Side::White);
    }

    #[test]
    fn test_two_drops_not_matching_castle_pattern() {
        let mut engine = castling_ready_engine();

        // 王落错格（f1 而非 g1）：不判为易位，也不提交
        lift(&mut engine, Square::E1);
        lift(&mut engine, Square::H1);
        place(&mut engine, Square::F1, piece(PieceType::King, Side::White));
        let event = place(&mut engine, Square::G1, piece(PieceType::Rook, Side::White));

        assert_eq!(event, None);
        assert!(!engine.air().is_empty());
    }

    #[test]
    fn test_enemy_drop_never_commits() {
        let mut engine = engine_with_initial_board();

        // 白方行棋时凭空出现一枚黑子：永远不提交
        let event = place(&mut engine, sq(0, 3), piece(PieceType::Knight, Side::Black));
        assert_eq!(event, None);
        assert!(!engine.air().is_empty());

        // 再来一次也洗不成走法
        let event = place(&mut engine, sq(0, 3), piece(PieceType::Knight, Side::Black));
        assert_eq!(event, None);
    }

    #[test]
    fn test_piece_changed_midair_not_committed() {
        let mut engine = engine_with_initial_board();

        // 兵提起、皇后落下（类似升变）：身份不一致，保持累积
        lift(&mut engine, sq(4, 1));
        let event = place(&mut engine, sq(4, 3), piece(PieceType::Queen, Side::White));
        assert_eq!(event, None);
        assert!(!engine.air().is_empty());
    }

    #[test]
    fn test_fumble_then_real_move() {
        let mut engine = engine_with_initial_board();

        // 先误提 d2 又放回，再正常走 e2e4
        lift(&mut engine, sq(3, 1));
        place(&mut engine, sq(3, 1), piece(PieceType::Pawn, Side::White));
        lift(&mut engine, sq(4, 1));
        let event = place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));

        assert!(matches!(
            event,
            Some(EngineEvent::MoveDetected { ref notation, .. }) if notation == "e2e4"
        ));
    }

    #[test]
    fn test_lift_after_uncommitted_drop_uses_air_state() {
        // 协作方拒绝一切，e2e4 不会提交
        let mut engine = InferenceEngine::new(RejectAll);
        engine.process(&BoardMessage::BoardSnapshot(initial_board()));

        lift(&mut engine, sq(4, 1));
        place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));

        // e4 在已提交的棋盘上是空格，被提起的棋子身份必须来自
        // 空中状态里挂着的那枚兵，而不是被当成噪声丢掉
        lift(&mut engine, sq(4, 3));
        assert_eq!(
            engine.air().lifted().get(&sq(4, 3)),
            Some(&piece(PieceType::Pawn, Side::White))
        );
        assert!(engine.air().dropped().is_empty());
    }

    #[test]
    fn test_rules_rejection_keeps_air_state() {
        let mut engine = InferenceEngine::new(RejectAll);
        engine.process(&BoardMessage::BoardSnapshot(initial_board()));

        lift(&mut engine, sq(4, 1));
        let event = place(&mut engine, sq(4, 3), piece(PieceType::Pawn, Side::White));

        // 协作方拒绝：无事件，空中状态保留（已知缺口，有意为之）
        assert_eq!(event, None);
        assert!(!engine.air().is_empty());
        assert_eq!(engine.board().unwrap().side_to_move, Side::White);
    }

    #[test]
    fn test_rook_move_downgrades_castling() {
        let mut engine = engine_with_initial_board();

        // a1 车挪到 a3：后翼易位标志随之清除
        lift(&mut engine, sq(0, 1));
        place(&mut engine, sq(0, 3), piece(PieceType::Pawn, Side::White));
        // 信号把行棋方切回白方
        lift(&mut engine, Square::E1);
        place(&mut engine, Square::E1, piece(PieceType::King, Side::White));

        lift(&mut engine, Square::A1);
        let event = place(&mut engine, sq(0, 2), piece(PieceType::Rook, Side::White));

        assert!(matches!(
            event,
            Some(EngineEvent::MoveDetected { ref notation, .. }) if notation == "a1a3"
        ));
        let board = engine.board().unwrap();
        assert!(!board.castling.get(Side::White, Wing::Queenside));
        assert!(board.castling.get(Side::White, Wing::Kingside));
    }
}
