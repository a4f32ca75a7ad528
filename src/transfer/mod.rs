/// Frame Transfer for Serial Photo Streaming
///
/// サイズ告知済みのJPEGフレームをシリアルチャネルから組み立てます。
///
/// ## 主要機能
///
/// - **PendingTransfer**: 受信中フレームの一時状態（宣言長・受信済み
///   バイト数・連続アイドル回数）
/// - **receive_frame**: 注入されたティックソースで駆動する受信ループ
///
/// 転送はサイズ告知と開始合図の後に一つだけ存在し、成功・タイムアウト・
/// 確保失敗のいずれかでバッファごと破棄されます。部分受信が
/// ストレージに昇格することはありません。
pub mod receiver;

pub use receiver::{receive_frame, PendingTransfer, TransferStatus};

use crate::serial::SerialError;

/// タイムアウトとみなす連続アイドル読み取り回数
pub const IDLE_POLL_LIMIT: u32 = 100;

/// フレーム転送の結果の型
pub type TransferResult<T> = Result<T, TransferError>;

/// フレーム転送のエラーを表す列挙型
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// 受信バッファが確保できない（転送は破棄、再試行しない）
    #[error("failed to allocate {0} byte receive buffer")]
    AllocationFailed(usize),
    /// アイドル上限に達した（部分バッファは破棄される）
    #[error("transfer timed out: received {received} of {expected} bytes")]
    Timeout { received: usize, expected: usize },
    /// 下位のシリアル読み取りが失敗した
    #[error("serial link failed during transfer: {0}")]
    Serial(#[from] SerialError),
}

/// 受信ループのアイドル待ちを注入するためのトレイト
///
/// 実機では最小のスケジューラティック（1ms）を待ちます。テストでは
/// 呼び出し回数を数えるだけの実装を使い、実時間なしで時間経過を
/// シミュレートできます。
pub trait TickSource {
    /// 1ティック分待機する
    fn wait_tick(&mut self);
}

/// スレッドスリープによるティックソース（ホスト実機用）
#[derive(Debug, Default)]
pub struct SleepTick;

impl TickSource for SleepTick {
    fn wait_tick(&mut self) {
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}

/// 待機しないティックソース
///
/// モックトランスポートが即座に全データを返すシミュレーションで使います。
#[derive(Debug, Default)]
pub struct NoWaitTick;

impl TickSource for NoWaitTick {
    fn wait_tick(&mut self) {}
}
