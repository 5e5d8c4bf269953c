//! 协议常量定义
//!
//! 消息码、命令字节和棋子编码均来自棋盘固件的串口协议。

/// 消息头有效位（入站消息码的最高位恒为 1）
pub const MESSAGE_BIT: u8 = 0x80;

/// 去掉有效位的掩码
pub const MESSAGE_MASK: u8 = 0x7f;

/// 消息头长度：1 字节消息码 + 2 字节长度（各含 7 位）
pub const HEADER_SIZE: usize = 3;

/// 14 位长度字段的最大值
pub const MAX_FRAME_SIZE: usize = 0x3fff;

/// 接收缓冲区上限（超出即丢弃并重新同步）
pub const RECV_BUFFER_LIMIT: usize = 32 * 1024;

/// 消息队列容量
pub const MESSAGE_QUEUE_CAPACITY: usize = 1000;

/// 命令队列容量
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// 连接超时
pub const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

// === 入站消息码（已去掉有效位） ===

/// 空闲信号
pub const MSG_NONE: u8 = 0x00;

/// 完整棋盘快照，64 字节
pub const MSG_BOARD_DUMP: u8 = 0x06;

/// 棋钟报告，7 字节
pub const MSG_BWTIME: u8 = 0x0d;

/// 单格占用变化，2 字节
pub const MSG_FIELD_UPDATE: u8 = 0x0e;

/// EEPROM 走法记录
pub const MSG_EE_MOVES: u8 = 0x0f;

/// 总线地址，2 字节
pub const MSG_BUSADRES: u8 = 0x10;

/// 序列号，5 字节
pub const MSG_SERIALNR: u8 = 0x11;

/// 商标文本，变长
pub const MSG_TRADEMARK: u8 = 0x12;

/// 固件版本，2 字节
pub const MSG_VERSION: u8 = 0x13;

/// 电池状态
pub const MSG_BATTERY_STATUS: u8 = 0x20;

/// 长序列号
pub const MSG_LONG_SERIALNR: u8 = 0x22;

// === 棋盘快照 / 单格更新使用的棋子编码 ===

/// 空格
pub const PIECE_EMPTY: u8 = 0x00;

pub const PIECE_WPAWN: u8 = 0x01;
pub const PIECE_WROOK: u8 = 0x02;
pub const PIECE_WKNIGHT: u8 = 0x03;
pub const PIECE_WBISHOP: u8 = 0x04;
pub const PIECE_WKING: u8 = 0x05;
pub const PIECE_WQUEEN: u8 = 0x06;
pub const PIECE_BPAWN: u8 = 0x07;
pub const PIECE_BROOK: u8 = 0x08;
pub const PIECE_BKNIGHT: u8 = 0x09;
pub const PIECE_BBISHOP: u8 = 0x0a;
pub const PIECE_BKING: u8 = 0x0b;
pub const PIECE_BQUEEN: u8 = 0x0c;
