/// カメラの初期設定コマンド

/// 撮影トリガコマンド（設定完了後、撮影のたびに送信する）
pub const CAPTURE_COMMAND: &str = "CAPTURE:";

/// 解像度クラス
///
/// 数値はesp32-cameraの`framesize_t`と同じコードです。カメラ側は
/// `SETUP_SIZE:`行でこのコードを受け取ってセンサーに設定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSize {
    /// 320x240
    Qvga = 5,
    /// 640x480
    Vga = 8,
    /// 800x600
    Svga = 9,
    /// 1024x768
    Xga = 10,
    /// 1280x720
    Hd = 11,
    /// 1280x1024
    Sxga = 12,
    /// 1600x1200
    Uxga = 13,
}

impl FrameSize {
    /// ワイヤ上で使う数値コードを取得
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// カメラの一回限りの初期設定
///
/// 最初の撮影トリガの前に一度だけカメラデバイスへ送信されます。
/// 応答は待ちません（fire-and-forget）。
#[derive(Debug, Clone)]
pub struct CameraSetup {
    /// 解像度クラス
    pub frame_size: FrameSize,
    /// 上下反転フラグ
    pub vertical_flip: bool,
    /// 左右反転フラグ
    pub horizontal_mirror: bool,
    /// カメラ側が一度に送る最大バッチサイズ（バイト）
    pub max_batch_size: u32,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            frame_size: FrameSize::Svga,
            vertical_flip: false,
            horizontal_mirror: false,
            max_batch_size: 10000,
        }
    }
}

impl CameraSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_vertical_flip(mut self, vertical_flip: bool) -> Self {
        self.vertical_flip = vertical_flip;
        self
    }

    pub fn with_horizontal_mirror(mut self, horizontal_mirror: bool) -> Self {
        self.horizontal_mirror = horizontal_mirror;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: u32) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// 設定コマンド行を送信順に生成します
    pub fn command_lines(&self) -> [String; 4] {
        [
            format!("SETUP_SIZE:{}", self.frame_size.code()),
            format!("SETUP_VFLIP:{}", bool_token(self.vertical_flip)),
            format!("SETUP_HMIRROR:{}", bool_token(self.horizontal_mirror)),
            format!("SETUP_MAXBATCH:{}", self.max_batch_size),
        ]
    }
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}
