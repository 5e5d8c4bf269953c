//! 帧解码
//!
//! 按去掉有效位之后的消息码分派到对应的解码例程，产出类型化的
//! [`BoardMessage`]，或者类型化的失败信号。

use crate::board::Board;
use crate::constants::*;
use crate::error::{ProtocolError, Result};
use crate::framer::Frame;
use crate::message::{BoardMessage, ClockReport, ClockSide};
use crate::piece::Piece;
use crate::square::Square;

/// 解码一个完整帧
pub fn decode(frame: &Frame) -> Result<BoardMessage> {
    match frame.code {
        MSG_BOARD_DUMP => decode_board_snapshot(frame),
        MSG_BWTIME => decode_clock(frame),
        MSG_FIELD_UPDATE => decode_field_change(frame),
        MSG_VERSION => decode_version(frame),
        MSG_TRADEMARK => Ok(BoardMessage::InfoText(
            String::from_utf8_lossy(&frame.payload).trim().to_string(),
        )),
        MSG_EE_MOVES | MSG_BUSADRES | MSG_SERIALNR | MSG_BATTERY_STATUS | MSG_LONG_SERIALNR => {
            // 识别但不解释，让调用方能区分“没有消息”和“选择不解码”
            Ok(BoardMessage::Unhandled {
                code: frame.code,
                payload: frame.payload.clone(),
            })
        }
        code => Err(ProtocolError::ParseFailure { code }),
    }
}

/// 校验固定长度载荷
fn expect_len(frame: &Frame, expected: usize) -> Result<()> {
    if frame.payload.len() != expected {
        return Err(ProtocolError::BadPayload {
            code: frame.code,
            expected,
            actual: frame.payload.len(),
        });
    }
    Ok(())
}

/// 棋盘快照：64 字节，每字节一个棋子编码
///
/// 快照按 a8=0 … h1=63 编号，与内部索引行序相反。
fn decode_board_snapshot(frame: &Frame) -> Result<BoardMessage> {
    expect_len(frame, 64)?;

    let mut squares = [None; 64];
    for (index, code) in frame.payload.iter().enumerate() {
        // from_snapshot_index 对 0..64 必然成功
        let square = Square::from_snapshot_index(index)
            .ok_or(ProtocolError::ParseFailure { code: frame.code })?;
        squares[square.index()] = Piece::from_board_code(*code)?;
    }

    Ok(BoardMessage::BoardSnapshot(Board::from_snapshot(squares)))
}

/// 单格更新：字段编号 + 棋子编码（可以为空，表示提子）
fn decode_field_change(frame: &Frame) -> Result<BoardMessage> {
    expect_len(frame, 2)?;

    let square = Square::from_field_byte(frame.payload[0]);
    let piece = Piece::from_board_code(frame.payload[1])?;

    Ok(BoardMessage::FieldChange { square, piece })
}

/// 固件版本：主、次版本各一字节
fn decode_version(frame: &Frame) -> Result<BoardMessage> {
    expect_len(frame, 2)?;
    Ok(BoardMessage::VersionInfo {
        major: frame.payload[0],
        minor: frame.payload[1],
    })
}

/// 棋钟报告：7 字节
///
/// 布局（按消息内偏移）：
/// - 0: 右侧小时（低半字节）+ 状态位
/// - 1: 右侧分钟（BCD）
/// - 2: 右侧秒（BCD）
/// - 3: 左侧小时（低半字节）+ 状态位
/// - 4: 左侧分钟（BCD）
/// - 5: 左侧秒（BCD）
/// - 6: 棋钟状态位
///
/// 若首字节低半字节为 0x0a，这其实是命令确认而非时间报告。
fn decode_clock(frame: &Frame) -> Result<BoardMessage> {
    expect_len(frame, 7)?;
    let p = &frame.payload;

    if p[0] & 0x0f == 0x0a {
        return Err(ProtocolError::ClockAck);
    }

    let status = p[6];
    if status & 0x20 != 0 {
        return Err(ProtocolError::ClockNotConnected);
    }
    if status & 0x01 == 0 {
        return Err(ProtocolError::ClockNotRunning);
    }

    let right = decode_clock_side(p[0], p[1], p[2]);
    let left = decode_clock_side(p[3], p[4], p[5]);

    Ok(BoardMessage::ClockReport(ClockReport {
        left,
        right,
        right_to_move: status & 0x08 != 0,
        left_to_move: status & 0x10 != 0,
        battery_low: status & 0x04 != 0,
    }))
}

/// 解码单侧时间：小时在低半字节，分钟和秒为 BCD
fn decode_clock_side(hours_flags: u8, minutes: u8, seconds: u8) -> ClockSide {
    ClockSide {
        hours: hours_flags & 0x0f,
        minutes: bcd(minutes),
        seconds: bcd(seconds),
        flag_blocked: hours_flags & 0x10 != 0,
        time_per_move: hours_flags & 0x20 != 0,
        flag_fallen: hours_flags & 0x40 != 0,
    }
}

fn bcd(byte: u8) -> u8 {
    (byte >> 4) * 10 + (byte & 0x0f)
}
