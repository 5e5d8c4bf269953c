//! 对局记录
//!
//! 把推断出的走法流落成 JSON 文件，供事后复盘或外部分析工具消费。
//! 每步落盘一次：守护进程随时可能被拔线，记录不能攒在内存里。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use protocol::{Side, Square};

/// 记录格式版本
pub const RECORD_VERSION: &str = "1.0";

/// 单步走法记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    /// 半回合序号，从 1 开始
    pub ply: u32,
    pub side: Side,
    /// 起点格，如 "e2"
    pub from: String,
    /// 终点格，如 "e4"
    pub to: String,
    /// 规则协作方给出的记法
    pub notation: String,
    /// 走棋时刻
    pub at: DateTime<Utc>,
}

/// 一盘棋的完整记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub version: String,
    pub started_at: DateTime<Utc>,
    /// 初始局面（来自首个棋盘快照）
    pub initial_fen: String,
    pub moves: Vec<MoveEntry>,
}

/// 对局记录器
pub struct GameRecorder {
    record: GameRecord,
    filepath: PathBuf,
}

impl GameRecorder {
    /// 在记录目录下开一盘新棋
    pub fn create(record_dir: &Path, initial_fen: String) -> Result<Self> {
        if !record_dir.exists() {
            fs::create_dir_all(record_dir)
                .with_context(|| format!("无法创建记录目录: {:?}", record_dir))?;
        }

        let started_at = Utc::now();
        let filename = format!("game-{}.json", started_at.format("%Y%m%d-%H%M%S"));
        let recorder = Self {
            record: GameRecord {
                version: RECORD_VERSION.to_string(),
                started_at,
                initial_fen,
                moves: Vec::new(),
            },
            filepath: record_dir.join(filename),
        };
        recorder.save()?;
        Ok(recorder)
    }

    /// 追加一步走法并落盘
    pub fn record_move(
        &mut self,
        side: Side,
        from: Square,
        to: Square,
        notation: &str,
    ) -> Result<()> {
        let ply = self.record.moves.len() as u32 + 1;
        self.record.moves.push(MoveEntry {
            ply,
            side,
            from: from.to_string(),
            to: to.to_string(),
            notation: notation.to_string(),
            at: Utc::now(),
        });
        self.save()
    }

    /// 记录文件路径
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.record).context("序列化对局记录失败")?;
        fs::write(&self.filepath, json)
            .with_context(|| format!("写入记录文件失败: {:?}", self.filepath))
    }
}
