use super::{SerialError, SerialPort, SerialResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// テスト用のシリアルポートモック実装
///
/// 実際のUARTハードウェアを使わずにカメラデバイスとの通信をシミュレート
/// します。受信する制御行と生バイトチャンクを事前にスクリプトし、
/// 送信された制御行を記録してテストで検証できます。
#[derive(Debug, Clone)]
pub struct MockSerialPort {
    /// 読み取り用の制御行キュー（先頭から取り出される）
    pub line_queue: Arc<Mutex<VecDeque<String>>>,
    /// 読み取り用の生バイトチャンクキュー
    ///
    /// 空のチャンクは「この回の読み取りでは何も届かなかった」を表します。
    pub chunk_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    /// 書き込まれた制御行の記録
    pub written_lines: Arc<Mutex<Vec<String>>>,
    /// エラーシミュレーション用のフラグ
    pub simulate_read_error: Arc<Mutex<bool>>,
    pub simulate_write_error: Arc<Mutex<bool>>,
    /// 生バイト読み取りだけを失敗させるフラグ
    ///
    /// 制御行は届くがフレームデータの途中でリンクが落ちる状況を
    /// シミュレートします。
    pub simulate_data_read_error: Arc<Mutex<bool>>,
}

impl Default for MockSerialPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSerialPort {
    /// 新しいMockSerialPortインスタンスを作成します
    pub fn new() -> Self {
        Self {
            line_queue: Arc::new(Mutex::new(VecDeque::new())),
            chunk_queue: Arc::new(Mutex::new(VecDeque::new())),
            written_lines: Arc::new(Mutex::new(Vec::new())),
            simulate_read_error: Arc::new(Mutex::new(false)),
            simulate_write_error: Arc::new(Mutex::new(false)),
            simulate_data_read_error: Arc::new(Mutex::new(false)),
        }
    }

    /// テスト用: 受信する制御行をキューに追加
    pub fn queue_line(&self, line: impl Into<String>) {
        self.line_queue.lock().unwrap().push_back(line.into());
    }

    /// テスト用: 受信する生バイトチャンクをキューに追加
    pub fn queue_chunk(&self, chunk: Vec<u8>) {
        self.chunk_queue.lock().unwrap().push_back(chunk);
    }

    /// テスト用: 「何も届かない読み取り」を1回分キューに追加
    pub fn queue_idle_poll(&self) {
        self.chunk_queue.lock().unwrap().push_back(Vec::new());
    }

    /// テスト用: 書き込まれた制御行を取得
    pub fn get_written_lines(&self) -> Vec<String> {
        self.written_lines.lock().unwrap().clone()
    }

    /// テスト用: 書き込み記録をクリア
    pub fn clear_written_lines(&self) {
        self.written_lines.lock().unwrap().clear();
    }

    /// テスト用: 読み取りエラーをシミュレート
    pub fn set_read_error(&self, enable: bool) {
        *self.simulate_read_error.lock().unwrap() = enable;
    }

    /// テスト用: 書き込みエラーをシミュレート
    pub fn set_write_error(&self, enable: bool) {
        *self.simulate_write_error.lock().unwrap() = enable;
    }

    /// テスト用: 生バイト読み取りのみエラーをシミュレート
    pub fn set_data_read_error(&self, enable: bool) {
        *self.simulate_data_read_error.lock().unwrap() = enable;
    }
}

impl SerialPort for MockSerialPort {
    fn read_line(&mut self) -> SerialResult<Option<String>> {
        if *self.simulate_read_error.lock().unwrap() {
            return Err(SerialError::ReadError("simulated read error".to_string()));
        }
        Ok(self.line_queue.lock().unwrap().pop_front())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> SerialResult<usize> {
        if *self.simulate_read_error.lock().unwrap() {
            return Err(SerialError::ReadError("simulated read error".to_string()));
        }
        if *self.simulate_data_read_error.lock().unwrap() {
            return Err(SerialError::ReadError("simulated data read error".to_string()));
        }

        let mut queue = self.chunk_queue.lock().unwrap();
        match queue.pop_front() {
            Some(chunk) => {
                let len = chunk.len().min(buffer.len());
                buffer[..len].copy_from_slice(&chunk[..len]);
                // バッファに収まらなかった分は次の読み取りに回す
                if len < chunk.len() {
                    queue.push_front(chunk[len..].to_vec());
                }
                Ok(len)
            }
            // キューが空の場合はデータなし
            None => Ok(0),
        }
    }

    fn write_line(&mut self, line: &str) -> SerialResult<()> {
        if *self.simulate_write_error.lock().unwrap() {
            return Err(SerialError::WriteError("simulated write error".to_string()));
        }
        self.written_lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
