//! 传感棋盘守护进程
//!
//! 包含:
//! - I/O 侧（读取任务、命令下发任务、有界队列）
//! - 守护进程配置
//! - 对局记录
pub mod config;
pub mod harness;
pub mod recorder;

pub use config::DaemonConfig;
pub use harness::BoardHandle;
pub use recorder::GameRecorder;
