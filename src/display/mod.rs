// 電子ペーパーディスプレイコラボレータのインターフェース
//
// ラスタライズとパネルのリフレッシュタイミングはこのクレートの範囲外
// です。コントローラはこの狭いトレイト越しにのみ描画を依頼します。
pub mod mock;

/// ディスプレイ操作の結果の型
pub type DisplayResult<T> = Result<T, DisplayError>;

/// ディスプレイのエラーを表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayError {
    /// 描画エラー（JPEGデコード失敗など）
    RenderError(String),
    /// その他のエラー
    Other(String),
}

impl std::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayError::RenderError(msg) => write!(f, "render error: {}", msg),
            DisplayError::Other(msg) => write!(f, "display error: {}", msg),
        }
    }
}

impl std::error::Error for DisplayError {}

/// パネルのリフレッシュモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// 全面の高品質リフレッシュ（写真表示用、GC16相当）
    Full,
    /// 速い部分リフレッシュ（ステータス表示用、DU相当）
    Fast,
}

/// ディスプレイコラボレータのトレイト
///
/// 描画はすべてベストエフォートです。失敗してもコントローラは
/// 保存処理を続行します。
pub trait DisplaySurface {
    /// JPEGバイト列をデコードして写真領域に描画する
    fn render_photo(&mut self, jpeg: &[u8]) -> DisplayResult<()>;

    /// ステータス・エラーメッセージを表示する
    fn render_text(&mut self, message: &str) -> DisplayResult<()>;

    /// 保留中の描画を物理パネルに反映する
    fn refresh(&mut self, mode: RefreshMode) -> DisplayResult<()>;
}
