//! 传感棋盘串口协议库
//!
//! 包含:
//! - 字节流分帧与帧解码
//! - 棋子、坐标的原生编码映射
//! - 入站消息与出站命令类型定义
//! - 传输层抽象 (BoardConnector trait)

mod board;
mod command;
mod constants;
mod decode;
mod error;
mod framer;
mod message;
mod piece;
mod square;
mod transport;

pub use board::{king_castled, king_home, rook_castled, rook_home, Board, CastlingRights, Wing};
pub use command::BoardCommand;
pub use constants::*;
pub use decode::decode;
pub use error::{ProtocolError, Result};
pub use framer::{Frame, Framer};
pub use message::{BoardMessage, ClockReport, ClockSide};
pub use piece::{Piece, PieceType, Side};
pub use square::Square;
pub use transport::{BoardConnector, TcpConnector};
