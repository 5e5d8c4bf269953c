//! I/O 侧
//!
//! 读取任务持续从传输层拉字节喂给分帧器，每次追加后循环尝试提帧
//! 解码；解出的消息推进有界队列交给唯一消费者。另一条有界队列把
//! 应用层的命令字节透传给棋盘。经典单生产者/单消费者：推断引擎
//! 只被消费者触碰，无需加锁。

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use protocol::{
    decode, BoardCommand, BoardMessage, Framer, ProtocolError, COMMAND_QUEUE_CAPACITY,
    MESSAGE_QUEUE_CAPACITY,
};

/// 与棋盘会话的句柄
///
/// 关停方式：关闭传输层即可。读取任务因读取失败退出并放掉发送端，
/// 消费者把队列里剩余的消息取完后 `next_message` 返回 `None`。
pub struct BoardHandle {
    messages: mpsc::Receiver<BoardMessage>,
    commands: mpsc::Sender<BoardCommand>,
    reader_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl BoardHandle {
    /// 取下一条已解码消息；队列关闭时返回 `None`
    pub async fn next_message(&mut self) -> Option<BoardMessage> {
        self.messages.recv().await
    }

    /// 向棋盘下发一条命令
    pub async fn send_command(&self, command: BoardCommand) -> protocol::Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ProtocolError::ConnectionClosed)
    }

    /// 中止两个后台任务（通常不需要，关闭传输层更体面）
    pub fn abort(&self) {
        self.reader_task.abort();
        self.writer_task.abort();
    }
}

/// 在给定的传输读写两半上启动会话
pub fn spawn<R, W>(reader: R, writer: W) -> BoardHandle
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    spawn_with_capacity(reader, writer, MESSAGE_QUEUE_CAPACITY)
}

/// 指定消息队列容量启动会话
pub fn spawn_with_capacity<R, W>(reader: R, writer: W, message_capacity: usize) -> BoardHandle
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (message_tx, message_rx) = mpsc::channel(message_capacity.max(1));
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);

    BoardHandle {
        messages: message_rx,
        commands: command_tx,
        reader_task: tokio::spawn(read_loop(reader, message_tx)),
        writer_task: tokio::spawn(write_loop(writer, command_rx)),
    }
}

/// 读取循环：字节 -> 帧 -> 消息 -> 队列
async fn read_loop<R>(mut reader: R, tx: mpsc::Sender<BoardMessage>)
where
    R: AsyncRead + Unpin,
{
    let mut framer = Framer::new();
    let mut buf = [0u8; 1024];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => {
                info!("传输端关闭，读取任务退出");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                error!(error = %e, "读取失败，读取任务退出");
                return;
            }
        };
        framer.feed(&buf[..n]);

        loop {
            let frame = match framer.try_extract() {
                Ok(frame) => frame,
                Err(ProtocolError::NeedMoreData) => break,
                Err(ProtocolError::NoneCommand) => {
                    // 空闲信号：消费即可，不入队也不记失败
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "丢弃损坏的字节，继续向前扫描");
                    continue;
                }
            };

            match decode(&frame) {
                Ok(message) => {
                    // 有界队列：消费者跟不上时在此阻塞形成背压，不丢消息
                    if tx.send(message).await.is_err() {
                        info!("消费者已退出，读取任务随之退出");
                        return;
                    }
                }
                Err(e) if e.is_benign() => {
                    debug!(signal = %e, "预期内的解码信号");
                }
                Err(e) => {
                    warn!(code = frame.code, error = %e, "解码失败，丢弃该帧");
                }
            }
        }
    }
}

/// 写入循环：命令字节原样透传
async fn write_loop<W>(mut writer: W, mut rx: mpsc::Receiver<BoardCommand>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(command) = rx.recv().await {
        debug!(%command, "下发命令");
        if let Err(e) = writer.write_all(&[command.byte()]).await {
            error!(error = %e, "命令写入失败，写入任务退出");
            return;
        }
        if let Err(e) = writer.flush().await {
            error!(error = %e, "命令刷出失败，写入任务退出");
            return;
        }
    }
}
