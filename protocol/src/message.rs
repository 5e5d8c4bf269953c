//! 入站消息类型定义

use crate::board::Board;
use crate::piece::Piece;
use crate::square::Square;

/// 棋盘发来的一条已解码消息
///
/// 真正的和类型：任一时刻只有一个变体有效。
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMessage {
    /// 完整棋盘快照
    BoardSnapshot(Board),
    /// 单格占用变化；`piece` 为 `None` 表示该格变空（提子）
    FieldChange {
        square: Square,
        piece: Option<Piece>,
    },
    /// 棋钟报告
    ClockReport(ClockReport),
    /// 固件版本
    VersionInfo { major: u8, minor: u8 },
    /// 固件发来的文本信息（商标消息）
    InfoText(String),
    /// 已识别但不解码的消息，载荷原样保留
    Unhandled { code: u8, payload: Vec<u8> },
}

impl std::fmt::Display for BoardMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardMessage::BoardSnapshot(board) => write!(f, "{}", board.fen()),
            BoardMessage::FieldChange { square, piece } => match piece {
                Some(piece) => write!(f, "{}@{}", piece, square),
                None => write!(f, ".@{}", square),
            },
            BoardMessage::ClockReport(report) => write!(
                f,
                "{} - {}",
                report.left.display_time(),
                report.right.display_time()
            ),
            BoardMessage::VersionInfo { major, minor } => {
                write!(f, "version {}.{:02}", major, minor)
            }
            BoardMessage::InfoText(text) => write!(f, "{}", text),
            BoardMessage::Unhandled { code, payload } => {
                write!(f, "unhandled 0x{:02x} ({} bytes)", code, payload.len())
            }
        }
    }
}

/// 棋钟单侧状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockSide {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    /// 旗已落且计时被锁定
    pub flag_blocked: bool,
    /// 每步计时模式指示
    pub time_per_move: bool,
    /// 旗已落（显示层面）
    pub flag_fallen: bool,
}

impl ClockSide {
    /// 格式化为 HH:MM:SS
    pub fn display_time(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// 棋钟报告
///
/// 只有棋钟已连接且在运行时才会产生；时间控制逻辑不在本层。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReport {
    pub left: ClockSide,
    pub right: ClockSide,
    /// 左侧玩家行棋中
    pub left_to_move: bool,
    /// 右侧玩家行棋中
    pub right_to_move: bool,
    /// 电池电量低
    pub battery_low: bool,
}
