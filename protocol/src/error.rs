//! 错误类型定义

use thiserror::Error;

/// 协议错误类型
///
/// 同时覆盖帧提取、消息解码和传输层。其中一部分变体是预期内的
/// 高频信号（见 [`ProtocolError::is_benign`]），不应按错误记录。
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 缓冲区内数据不足，等待下次读取后重试
    #[error("need more data")]
    NeedMoreData,

    /// 消息头损坏（消息码最高位未置位）
    #[error("corrupt message header: 0x{byte:02x}")]
    CorruptHeader { byte: u8 },

    /// 空闲信号（NONE），已从缓冲区消费但不构成事件
    #[error("NONE command")]
    NoneCommand,

    /// 未知消息码
    #[error("failed to parse message code 0x{code:02x}")]
    ParseFailure { code: u8 },

    /// 载荷长度与消息码的固定长度不符
    #[error("bad payload for code 0x{code:02x}: expected {expected} bytes, got {actual}")]
    BadPayload {
        code: u8,
        expected: usize,
        actual: usize,
    },

    /// 未知棋子编码
    #[error("unknown piece code: 0x{code:02x}")]
    UnknownPieceCode { code: u8 },

    /// 棋钟命令确认（并非时间报告）
    #[error("clock ack")]
    ClockAck,

    /// 棋钟未运行
    #[error("clock not running")]
    ClockNotRunning,

    /// 棋钟未连接
    #[error("clock not connected")]
    ClockNotConnected,

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 连接超时
    #[error("connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("connection closed")]
    ConnectionClosed,
}

impl ProtocolError {
    /// 是否为预期内的非错误信号
    ///
    /// 这些信号在正常对局中频繁出现，I/O 侧只在 debug 级别记录。
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            ProtocolError::NeedMoreData
                | ProtocolError::NoneCommand
                | ProtocolError::ClockAck
                | ProtocolError::ClockNotRunning
                | ProtocolError::ClockNotConnected
        )
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
