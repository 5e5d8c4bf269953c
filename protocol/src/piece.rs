//! 棋子定义与棋盘原生编码映射

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ProtocolError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（先手）
    White,
    /// 黑方（后手）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 从棋盘原生编码解析
    ///
    /// 编码 0x00 表示空格，返回 `None`；未知编码返回错误而不中止进程。
    pub fn from_board_code(code: u8) -> Result<Option<Piece>, ProtocolError> {
        let piece = match code {
            PIECE_EMPTY => return Ok(None),
            PIECE_WPAWN => Piece::new(PieceType::Pawn, Side::White),
            PIECE_WROOK => Piece::new(PieceType::Rook, Side::White),
            PIECE_WKNIGHT => Piece::new(PieceType::Knight, Side::White),
            PIECE_WBISHOP => Piece::new(PieceType::Bishop, Side::White),
            PIECE_WKING => Piece::new(PieceType::King, Side::White),
            PIECE_WQUEEN => Piece::new(PieceType::Queen, Side::White),
            PIECE_BPAWN => Piece::new(PieceType::Pawn, Side::Black),
            PIECE_BROOK => Piece::new(PieceType::Rook, Side::Black),
            PIECE_BKNIGHT => Piece::new(PieceType::Knight, Side::Black),
            PIECE_BBISHOP => Piece::new(PieceType::Bishop, Side::Black),
            PIECE_BKING => Piece::new(PieceType::King, Side::Black),
            PIECE_BQUEEN => Piece::new(PieceType::Queen, Side::Black),
            _ => return Err(ProtocolError::UnknownPieceCode { code }),
        };
        Ok(Some(piece))
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}
