/// 受信制御行の解析機能

use log::{debug, warn};

/// `JPEG_SIZE:` 行のプレフィックス
pub const JPEG_SIZE_PREFIX: &str = "JPEG_SIZE:";
/// `JPEG_START:` 行（サイズ告知の後に送られてくる）
pub const JPEG_START_LINE: &str = "JPEG_START:";

/// 告知サイズの上限（10MiB）
///
/// カメラ側が送るJPEGはSVGA/UXGAでも数百KB程度です。これを大きく超える
/// 告知は化けた行とみなして破棄します。
pub const MAX_ANNOUNCED_SIZE: usize = 10 * 1024 * 1024;

/// 解析された制御行
#[derive(Debug, Clone, PartialEq)]
pub enum ControlLine {
    /// 次フレームのバイト長告知
    /// フォーマット: "JPEG_SIZE:<decimal>"
    JpegSize(usize),
    /// フレームデータ開始の合図
    /// フォーマット: "JPEG_START:"
    JpegStart,
    /// 不明な制御行
    Unknown(String),
}

/// 制御行の解析エラー
#[derive(Debug, Clone, PartialEq)]
pub enum ControlParseError {
    /// サイズ部が10進数として解析できない
    InvalidSize(String),
    /// サイズ告知が上限を超えている
    SizeOutOfRange(usize),
}

impl std::fmt::Display for ControlParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlParseError::InvalidSize(s) => write!(f, "invalid JPEG_SIZE value: '{}'", s),
            ControlParseError::SizeOutOfRange(n) => {
                write!(f, "announced size out of range: {} bytes", n)
            }
        }
    }
}

impl std::error::Error for ControlParseError {}

/// 制御行文字列を解析します
///
/// # 引数
/// * `line` - 解析する制御行（改行は除去済みであること）
///
/// # 戻り値
/// * `Result<ControlLine, ControlParseError>` - 解析された制御行またはエラー
pub fn parse_control_line(line: &str) -> Result<ControlLine, ControlParseError> {
    debug!("Parsing control line: '{}'", line);

    let trimmed = line.trim();

    if let Some(size_str) = trimmed.strip_prefix(JPEG_SIZE_PREFIX) {
        parse_size_announcement(size_str)
    } else if trimmed == JPEG_START_LINE {
        Ok(ControlLine::JpegStart)
    } else {
        warn!("Unknown control line: '{}'", trimmed);
        Ok(ControlLine::Unknown(trimmed.to_string()))
    }
}

/// サイズ告知の数値部を解析します
///
/// フォーマット: "JPEG_SIZE:<decimal>"
/// 例: "JPEG_SIZE:48213"
fn parse_size_announcement(size_str: &str) -> Result<ControlLine, ControlParseError> {
    let size = size_str.trim().parse::<usize>().map_err(|_| {
        warn!("Invalid JPEG_SIZE value: '{}'", size_str);
        ControlParseError::InvalidSize(size_str.to_string())
    })?;

    // サイズの妥当性をチェック
    if size > MAX_ANNOUNCED_SIZE {
        warn!("Announced size out of range (max {}): {}", MAX_ANNOUNCED_SIZE, size);
        return Err(ControlParseError::SizeOutOfRange(size));
    }

    debug!("Parsed size announcement: {} bytes", size);
    Ok(ControlLine::JpegSize(size))
}
