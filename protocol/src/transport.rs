//! 传输层抽象
//!
//! 提供 BoardConnector trait 使上层与具体传输实现解耦。传感棋盘
//! 本身走串口，但串口通常由 ser2net/socat 之类的桥接程序暴露为
//! TCP 端口，这里提供 TCP 实现；需要别的传输方式时实现同一 trait。

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::constants::CONNECT_TIMEOUT;
use crate::error::{ProtocolError, Result};

/// 连接器 trait
///
/// `open` 返回全双工字节流的读写两半：读半喂给分帧器，写半透传
/// 出站命令，两者分属不同任务。
#[async_trait]
pub trait BoardConnector: Send + Sync {
    type Reader: AsyncRead + Unpin + Send + 'static;
    type Writer: AsyncWrite + Unpin + Send + 'static;

    /// 建立到棋盘的连接
    async fn open(&self, addr: &str) -> Result<(Self::Reader, Self::Writer)>;
}

/// TCP 连接器（ser2net / socat 桥接的串口）
pub struct TcpConnector;

#[async_trait]
impl BoardConnector for TcpConnector {
    type Reader = OwnedReadHalf;
    type Writer = OwnedWriteHalf;

    async fn open(&self, addr: &str) -> Result<(Self::Reader, Self::Writer)> {
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)?
            .map_err(ProtocolError::Io)?;

        // 命令字节要立刻送达棋盘
        stream.set_nodelay(true)?;

        Ok(stream.into_split())
    }
}
