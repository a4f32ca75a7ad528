// カメラデバイスとの制御チャネルを抽象化するモジュール
pub mod mock;

/// シリアル通信での結果の型
pub type SerialResult<T> = Result<T, SerialError>;

/// シリアル通信のエラーを表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum SerialError {
    /// 読み取りエラー
    ReadError(String),
    /// 書き込みエラー
    WriteError(String),
    /// その他のエラー
    Other(String),
}

impl std::fmt::Display for SerialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerialError::ReadError(msg) => write!(f, "serial read error: {}", msg),
            SerialError::WriteError(msg) => write!(f, "serial write error: {}", msg),
            SerialError::Other(msg) => write!(f, "serial error: {}", msg),
        }
    }
}

impl std::error::Error for SerialError {}

/// シリアル通信インターフェースのトレイト
///
/// このトレイトを実装することで、実機用とテスト用(Mock)の
/// 実装を切り替えることができます。すべての操作は非ブロッキングです。
pub trait SerialPort {
    /// 改行終端の制御行を1行読み取る
    ///
    /// 完全な行がまだ到着していない場合は `Ok(None)` を返します。
    fn read_line(&mut self) -> SerialResult<Option<String>>;

    /// 生バイトを最大 `buffer.len()` バイト読み取る
    ///
    /// 今回の呼び出しで実際に読めたバイト数を返します。
    /// 受信データがない場合は `Ok(0)` を返します（ブロックしない）。
    fn read_bytes(&mut self, buffer: &mut [u8]) -> SerialResult<usize>;

    /// 改行終端の制御行を書き込む
    fn write_line(&mut self, line: &str) -> SerialResult<()>;
}
