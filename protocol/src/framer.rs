//! 字节流分帧
//!
//! 固件消息头为 3 字节：`[码|0x80][长度高7位][长度低7位]`，其中
//! 长度包含消息头本身。分帧器累积原始字节，每次尝试提取一帧。

use crate::constants::*;
use crate::error::{ProtocolError, Result};

/// 一个完整的协议帧
///
/// `code` 已去掉有效位；`payload` 不含消息头。提取后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub code: u8,
    pub payload: Vec<u8>,
}

/// 分帧器
///
/// 接收缓冲区有上限：每次喂入前先压缩掉已消费的前缀，仍然超限时
/// 丢弃全部旧数据重新同步，避免持续流量下无界增长。
#[derive(Debug, Default)]
pub struct Framer {
    buf: Vec<u8>,
    /// 已消费前缀的长度
    head: usize,
}

impl Framer {
    /// 创建新的分帧器
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前缓冲的未消费字节数
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.head
    }

    /// 追加从传输层读到的字节
    pub fn feed(&mut self, bytes: &[u8]) {
        // 压缩已消费前缀
        if self.head > 0 {
            self.buf.drain(..self.head);
            self.head = 0;
        }

        if self.buf.len() + bytes.len() > RECV_BUFFER_LIMIT {
            tracing::warn!(
                buffered = self.buf.len(),
                incoming = bytes.len(),
                "接收缓冲区超限，丢弃旧数据重新同步"
            );
            self.buf.clear();
        }
        self.buf.extend_from_slice(bytes);
    }

    /// 尝试从缓冲区提取一帧
    ///
    /// - 数据不足返回 [`ProtocolError::NeedMoreData`]，缓冲区不动，
    ///   下次读取后重试。
    /// - 消息码最高位未置位说明流失步，消费 1 字节后返回
    ///   [`ProtocolError::CorruptHeader`]，反复调用即可向前扫描到
    ///   下一个可信的消息头。
    /// - 空闲信号（NONE）会被消费但以 [`ProtocolError::NoneCommand`]
    ///   上报，调用方不应将其视为事件或失败。
    pub fn try_extract(&mut self) -> Result<Frame> {
        let avail = &self.buf[self.head..];
        if avail.len() < HEADER_SIZE {
            return Err(ProtocolError::NeedMoreData);
        }

        let b0 = avail[0];
        if b0 & MESSAGE_BIT == 0 {
            self.head += 1;
            return Err(ProtocolError::CorruptHeader { byte: b0 });
        }
        let code = b0 & MESSAGE_MASK;

        // 两个长度字节各携带 7 位，大端组合
        let length =
            (((avail[1] & MESSAGE_MASK) as usize) << 7) | (avail[2] & MESSAGE_MASK) as usize;

        if length < HEADER_SIZE {
            // 固件对空闲信号声明长度 0（只有消息头）
            if code == MSG_NONE {
                self.head += HEADER_SIZE;
                return Err(ProtocolError::NoneCommand);
            }
            self.head += 1;
            return Err(ProtocolError::CorruptHeader { byte: b0 });
        }

        if avail.len() < length {
            return Err(ProtocolError::NeedMoreData);
        }

        let payload = avail[HEADER_SIZE..length].to_vec();
        self.head += length;

        if code == MSG_NONE {
            return Err(ProtocolError::NoneCommand);
        }

        Ok(Frame { code, payload })
    }
}
