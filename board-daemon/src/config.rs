//! 守护进程配置
//!
//! JSON 配置文件，环境变量可覆盖棋盘地址，便于在不同机器间挪动。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 覆盖棋盘地址的环境变量
pub const BOARD_ADDR_ENV: &str = "BOARD_ADDR";

/// 守护进程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// 棋盘地址（ser2net / socat 桥接出的 TCP 端点）
    pub board_addr: String,
    /// 对局记录输出目录
    pub record_dir: PathBuf,
    /// 消息队列容量（读取任务到消费者）
    pub message_queue_capacity: usize,
    /// 启动时顺带请求一次固件版本
    pub request_version: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            board_addr: "127.0.0.1:4001".to_string(),
            record_dir: PathBuf::from("records"),
            message_queue_capacity: protocol::MESSAGE_QUEUE_CAPACITY,
            request_version: true,
        }
    }
}

impl DaemonConfig {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {:?}", path))?;
        Ok(config)
    }

    /// 加载配置：有文件读文件，没有用默认值，最后套环境变量覆盖
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var(BOARD_ADDR_ENV) {
            config.board_addr = addr;
        }
        Ok(config)
    }
}
