use super::{TickSource, TransferError, TransferResult, IDLE_POLL_LIMIT};
use crate::serial::SerialPort;
use log::{debug, info, warn};

/// 1回の読み取り試行の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// バイトを受信した（アイドルカウンタはリセット済み）
    Progress,
    /// 今回は何も届かなかった（呼び出し側は1ティック待つ）
    Idle,
    /// 宣言長ぶんの受信が完了した
    Complete,
}

/// 受信中フレームの一時状態
///
/// サイズ告知と開始合図の間にのみ存在します。バッファは宣言長ぶん
/// 先に確保され、成功・タイムアウト・確保失敗のいずれでもこの状態と
/// 一緒に解放されます。
#[derive(Debug)]
pub struct PendingTransfer {
    buffer: Vec<u8>,
    expected_len: usize,
    received: usize,
    idle_polls: u32,
}

impl PendingTransfer {
    /// 宣言長ぶんのバッファを確保して転送を開始します
    ///
    /// 確保に失敗した場合は `TransferError::AllocationFailed` を返し、
    /// 転送は破棄されます（再試行しない）。
    pub fn begin(expected_len: usize) -> TransferResult<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(expected_len)
            .map_err(|_| TransferError::AllocationFailed(expected_len))?;
        buffer.resize(expected_len, 0);

        debug!("Transfer started: expecting {} bytes", expected_len);
        Ok(Self {
            buffer,
            expected_len,
            received: 0,
            idle_polls: 0,
        })
    }

    /// 宣言されたフレーム長を取得
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// 受信済みバイト数を取得
    pub fn received(&self) -> usize {
        self.received
    }

    /// 非ブロッキング読み取りを1回試行して状態を進めます
    ///
    /// 未受信領域に直接読み込みます。バイトが読めたらアイドルカウンタを
    /// リセットし、0バイトだったらカウントアップします。カウンタが
    /// `IDLE_POLL_LIMIT` に達した時点で `TransferError::Timeout` です。
    pub fn poll_read<P: SerialPort>(&mut self, port: &mut P) -> TransferResult<TransferStatus> {
        // 長さ0の告知は読み取りを待たずに即時完了
        if self.received == self.expected_len {
            return Ok(TransferStatus::Complete);
        }

        let n = port.read_bytes(&mut self.buffer[self.received..])?;
        if n > 0 {
            self.received += n;
            self.idle_polls = 0;
            debug!("Transfer progress: {} / {} bytes", self.received, self.expected_len);
            if self.received == self.expected_len {
                Ok(TransferStatus::Complete)
            } else {
                Ok(TransferStatus::Progress)
            }
        } else {
            self.idle_polls += 1;
            if self.idle_polls >= IDLE_POLL_LIMIT {
                warn!(
                    "Transfer timed out after {} idle polls: {} / {} bytes",
                    self.idle_polls, self.received, self.expected_len
                );
                return Err(TransferError::Timeout {
                    received: self.received,
                    expected: self.expected_len,
                });
            }
            Ok(TransferStatus::Idle)
        }
    }

    /// 完了した転送からバッファを取り出します
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// 宣言長ぶんのフレームを受信して返します
///
/// 受信が完了するかタイムアウトするまで制御ループを占有します
/// （リンクはこの転送専用なので許容されるレイテンシです）。
/// アイドル時は注入された `TickSource` で1ティック待ちます。
///
/// # 引数
/// * `port` - 読み取り元のシリアルポート
/// * `expected_len` - `JPEG_SIZE:` で告知されたバイト長
/// * `ticks` - アイドル待ちのティックソース
///
/// # 戻り値
/// * `TransferResult<Vec<u8>>` - 完成したフレームまたはエラー
pub fn receive_frame<P: SerialPort, T: TickSource>(
    port: &mut P,
    expected_len: usize,
    ticks: &mut T,
) -> TransferResult<Vec<u8>> {
    let mut transfer = PendingTransfer::begin(expected_len)?;

    loop {
        match transfer.poll_read(port)? {
            TransferStatus::Complete => {
                info!("jpeg received: {} / {} bytes", transfer.received(), expected_len);
                return Ok(transfer.into_bytes());
            }
            TransferStatus::Progress => {}
            TransferStatus::Idle => ticks.wait_tick(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::mock::MockSerialPort;
    use crate::transfer::NoWaitTick;

    #[test]
    fn test_zero_length_completes_immediately() {
        let mut mock = MockSerialPort::new();
        let mut ticks = NoWaitTick;

        let bytes = receive_frame(&mut mock, 0, &mut ticks).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_single_chunk_transfer() {
        let mut mock = MockSerialPort::new();
        mock.queue_chunk(vec![0x11; 64]);
        let mut ticks = NoWaitTick;

        let bytes = receive_frame(&mut mock, 64, &mut ticks).unwrap();
        assert_eq!(bytes, vec![0x11; 64]);
    }

    #[test]
    fn test_idle_counter_resets_on_progress() {
        let mut mock = MockSerialPort::new();
        mock.queue_chunk(vec![1, 2]);
        mock.queue_idle_poll();
        mock.queue_chunk(vec![3, 4]);
        let mut transfer = PendingTransfer::begin(4).unwrap();

        assert_eq!(transfer.poll_read(&mut mock).unwrap(), TransferStatus::Progress);
        assert_eq!(transfer.poll_read(&mut mock).unwrap(), TransferStatus::Idle);
        assert_eq!(transfer.poll_read(&mut mock).unwrap(), TransferStatus::Complete);
        assert_eq!(transfer.into_bytes(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_allocation_failure_is_reported() {
        // isizeを超える確保要求は必ず失敗する
        let result = PendingTransfer::begin(usize::MAX);
        assert!(matches!(result, Err(TransferError::AllocationFailed(_))));
    }

    #[test]
    fn test_serial_error_aborts_transfer() {
        let mut mock = MockSerialPort::new();
        mock.set_read_error(true);
        let mut ticks = NoWaitTick;

        let result = receive_frame(&mut mock, 16, &mut ticks);
        assert!(matches!(result, Err(TransferError::Serial(_))));
    }
}
