/// Serial Photo Transfer Protocol
///
/// カメラデバイスとの間で交換する改行終端ASCII制御行を定義します。
///
/// ## プロトコル仕様
///
/// カメラ → コントローラ:
/// ```text
/// JPEG_SIZE:<decimal>   次フレームのバイト長の告知
/// JPEG_START:           直後から生バイトの送信が始まる
/// ```
///
/// コントローラ → カメラ:
/// ```text
/// SETUP_SIZE:<enum>     解像度クラス（初回のみ）
/// SETUP_VFLIP:TRUE|FALSE
/// SETUP_HMIRROR:TRUE|FALSE
/// SETUP_MAXBATCH:<decimal>
/// CAPTURE:              撮影トリガ（毎回）
/// ```
pub mod command;
pub mod setup;

pub use command::{parse_control_line, ControlLine, ControlParseError};
pub use setup::{CameraSetup, FrameSize, CAPTURE_COMMAND};
