use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_engine::{CoordinateRules, EngineEvent, InferenceEngine};
use protocol::{BoardCommand, BoardConnector, TcpConnector};

use board_daemon::config::DaemonConfig;
use board_daemon::harness;
use board_daemon::recorder::GameRecorder;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("board_daemon=debug".parse()?),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DaemonConfig::load_or_default(config_path.as_deref())?;

    info!(addr = %config.board_addr, "传感棋盘守护进程启动中...");
    let (reader, writer) = TcpConnector.open(&config.board_addr).await?;
    let mut board = harness::spawn_with_capacity(reader, writer, config.message_queue_capacity);

    // 启动序列：复位、请求完整快照、进入单格更新模式
    board.send_command(BoardCommand::Reset).await?;
    board.send_command(BoardCommand::RequestSnapshot).await?;
    board.send_command(BoardCommand::UpdateBoardMode).await?;
    if config.request_version {
        board.send_command(BoardCommand::RequestVersion).await?;
    }

    let mut engine = InferenceEngine::new(CoordinateRules);
    let mut recorder: Option<GameRecorder> = None;

    // 唯一消费者：队列关闭（传输层断开）即退出
    while let Some(message) = board.next_message().await {
        match engine.process(&message) {
            Some(EngineEvent::BoardInitialized { fen }) => {
                info!(%fen, "棋盘就绪");
                match GameRecorder::create(&config.record_dir, fen) {
                    Ok(r) => {
                        info!(path = ?r.filepath(), "对局记录已创建");
                        recorder = Some(r);
                    }
                    Err(e) => warn!(error = %e, "无法创建对局记录，继续运行"),
                }
            }
            Some(EngineEvent::MoveDetected {
                side,
                from,
                to,
                notation,
            }) => {
                info!(?side, %notation, "走法");
                if let Some(recorder) = &mut recorder {
                    if let Err(e) = recorder.record_move(side, from, to, &notation) {
                        warn!(error = %e, "走法落盘失败");
                    }
                }
            }
            Some(EngineEvent::TurnSet { side }) => {
                info!(?side, "信号：行棋方已设置");
            }
            Some(EngineEvent::CastlingToggled {
                side,
                wing,
                allowed,
            }) => {
                info!(?side, ?wing, allowed, "信号：易位可用性已翻转");
            }
            None => {}
        }
    }

    info!("消息队列已关闭，守护进程退出");
    Ok(())
}
