/// Viewer Controller
///
/// シリアルポート・ディスプレイ・ストレージ・カーソルをまとめて
/// 協調ポーリングで駆動するセッションオブジェクトです。撮影トリガ、
/// フレーム受信、保存、ページングまでの制御フローをここで束ねます。
///
/// ## 並行性モデル
///
/// シングルスレッドの協調ポーリングです。`poll_once` が1サイクル分
/// （制御行 → 入力イベント → アイドルティック）を処理します。
/// フレーム受信中はループを占有しますが、リンクはこの転送専用なので
/// 許容されるレイテンシです。3種類の障害（確保失敗・タイムアウト・
/// ストレージ不可）はいずれも回復可能で、ループを止めません。

use log::{debug, error, info, warn};

use crate::display::{DisplaySurface, RefreshMode};
use crate::input::{InputEvent, InputSource, PowerControl};
use crate::navigation::NavigationCursor;
use crate::protocol::{parse_control_line, CameraSetup, ControlLine, CAPTURE_COMMAND};
use crate::serial::SerialPort;
use crate::storage::{PhotoStore, StorageError};
use crate::transfer::{receive_frame, TickSource, TransferError};

/// 設定コマンド送信後にカメラを落ち着かせる待ちティック数
pub const SETTLE_TICKS: u32 = 10;

/// 1ポーリングサイクルの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStep {
    /// ポーリングを継続する
    Continue,
    /// 電源断が要求された
    PowerDown,
}

/// フォトビューアのコントローラ
pub struct ViewerController<P, D, T>
where
    P: SerialPort,
    D: DisplaySurface,
    T: TickSource,
{
    port: P,
    display: D,
    ticks: T,
    store: PhotoStore,
    cursor: NavigationCursor,
    camera_setup: CameraSetup,
    /// 一回限りの設定コマンドを送信済みか（セッション中リセットしない）
    setup_sent: bool,
    /// 直近の`JPEG_SIZE:`で告知されたバイト長（`JPEG_START:`で消費）
    pending_jpeg_size: Option<usize>,
}

impl<P, D, T> ViewerController<P, D, T>
where
    P: SerialPort,
    D: DisplaySurface,
    T: TickSource,
{
    /// 新しいコントローラを作成します
    ///
    /// ストアは呼び出し側で `PhotoStore::open` により起動時リカバリ
    /// 済みであることを想定します。
    pub fn new(port: P, display: D, ticks: T, store: PhotoStore, camera_setup: CameraSetup) -> Self {
        Self {
            port,
            display,
            ticks,
            store,
            cursor: NavigationCursor::new(),
            camera_setup,
            setup_sent: false,
            pending_jpeg_size: None,
        }
    }

    /// 現在表示中のインデックスを取得
    pub fn current_index(&self) -> u32 {
        self.cursor.current_index()
    }

    /// 確認済みの最大インデックス位置を取得
    pub fn highest_index(&self) -> u32 {
        self.store.highest_index()
    }

    /// 設定コマンドを送信済みかどうか
    pub fn setup_sent(&self) -> bool {
        self.setup_sent
    }

    /// 写真ストアへの参照を取得
    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    /// 電源断まで制御ループを回します
    pub fn run<I: InputSource, W: PowerControl>(&mut self, input: &mut I, power: &mut W) {
        info!("Entering control loop...");
        loop {
            if self.poll_once(input) == LoopStep::PowerDown {
                info!("Power down requested");
                power.power_down();
                return;
            }
        }
    }

    /// 協調ポーリングを1サイクル実行します
    ///
    /// 制御行・入力イベントの順に1件だけ処理し、どちらもなければ
    /// 1ティック待ちます。障害はすべてここで吸収され、呼び出し側へは
    /// `LoopStep` だけが返ります。
    pub fn poll_once<I: InputSource>(&mut self, input: &mut I) -> LoopStep {
        // 1. シリアル制御行の処理
        match self.port.read_line() {
            Ok(Some(line)) => {
                self.handle_control_line(&line);
                return LoopStep::Continue;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Error reading control line: {}", e);
            }
        }

        // 2. ボタン・タッチ入力の処理
        if let Some(event) = input.poll_event() {
            return self.handle_event(event);
        }

        // 3. 何もなければ短い待ち
        self.ticks.wait_tick();
        LoopStep::Continue
    }

    /// 入力イベントを1件処理します
    pub fn handle_event(&mut self, event: InputEvent) -> LoopStep {
        debug!("Input event: {:?}", event);
        match event {
            InputEvent::PrevPhoto => self.show_prev(),
            InputEvent::NextPhoto => self.show_next(),
            InputEvent::Capture => self.trigger_capture(),
            InputEvent::PowerDown => return LoopStep::PowerDown,
        }
        LoopStep::Continue
    }

    /// 撮影トリガを送信します
    ///
    /// 初回のみ設定コマンド列を順に送り、短い整定待ちを入れます。
    /// カメラからの応答は待ちません。以降のフローはカメラが自発的に
    /// 送ってくるサイズ告知と開始合図で駆動されます。
    pub fn trigger_capture(&mut self) {
        if !self.setup_sent {
            info!("Sending one-time camera setup...");
            for line in self.camera_setup.command_lines() {
                if let Err(e) = self.port.write_line(&line) {
                    // fire-and-forgetなので再送しない
                    warn!("Failed to send setup command '{}': {}", line, e);
                }
            }
            self.setup_sent = true;
            for _ in 0..SETTLE_TICKS {
                self.ticks.wait_tick();
            }
        }

        info!("Sending capture trigger");
        if let Err(e) = self.port.write_line(CAPTURE_COMMAND) {
            error!("Failed to send capture trigger: {}", e);
        }
    }

    /// 受信した制御行を1行処理します
    fn handle_control_line(&mut self, line: &str) {
        match parse_control_line(line) {
            Ok(ControlLine::JpegSize(size)) => {
                debug!("jpeg size announced: {}", size);
                self.pending_jpeg_size = Some(size);
            }
            Ok(ControlLine::JpegStart) => match self.pending_jpeg_size.take() {
                Some(size) => self.receive_photo(size),
                // サイズ告知なしの開始合図はプロトコル違反
                None => warn!("JPEG_START without size announcement, ignoring"),
            },
            Ok(ControlLine::Unknown(l)) => {
                debug!("Ignoring unknown control line: '{}'", l);
            }
            Err(e) => {
                warn!("Failed to parse control line '{}': {}", line, e);
            }
        }
    }

    /// 告知されたサイズのフレームを受信して表示・保存します
    ///
    /// 成功時は描画（ベストエフォート）→保存→カーソル更新→全面
    /// リフレッシュの順で処理します。描画の失敗が保存を妨げることは
    /// ありません。
    fn receive_photo(&mut self, expected_len: usize) {
        match receive_frame(&mut self.port, expected_len, &mut self.ticks) {
            Ok(bytes) => {
                if let Err(e) = self.display.render_photo(&bytes) {
                    warn!("Photo render failed (continuing with persist): {}", e);
                }
                match self.store.persist(&bytes) {
                    Ok(index) => {
                        self.cursor.jump_to_latest(index);
                        info!("capture {} persisted, now current", index);
                    }
                    Err(e) => {
                        // 表示はされるがセッションを越えて残らない
                        error!("Persist failed: {}", e);
                        self.show_message("No storage");
                    }
                }
                if let Err(e) = self.display.refresh(RefreshMode::Full) {
                    warn!("Panel refresh failed: {}", e);
                }
            }
            Err(TransferError::Timeout { received, expected }) => {
                warn!("Transfer timeout: {} / {} bytes, discarding", received, expected);
                self.show_message("Timeout");
                self.refresh_fast();
            }
            Err(TransferError::AllocationFailed(size)) => {
                error!("Cannot allocate {} byte frame buffer", size);
                self.show_message("Memory full");
                self.refresh_fast();
            }
            Err(TransferError::Serial(e)) => {
                error!("Serial link failed during transfer: {}", e);
                self.show_message("Link error");
                self.refresh_fast();
            }
        }
    }

    /// 1つ前の写真を表示します（端ではクランプして何もしない）
    pub fn show_prev(&mut self) {
        let highest = self.store.highest_index();
        if let Some(index) = self.cursor.step_back(highest) {
            self.show_photo_at(index);
        }
    }

    /// 1つ後の写真を表示します（端ではクランプして何もしない）
    pub fn show_next(&mut self) {
        let highest = self.store.highest_index();
        if let Some(index) = self.cursor.step_forward(highest) {
            self.show_photo_at(index);
        }
    }

    /// 指定インデックスの写真を読み込んで表示します
    fn show_photo_at(&mut self, index: u32) {
        match self.store.load(index) {
            Ok(bytes) => {
                if let Err(e) = self.display.render_photo(&bytes) {
                    warn!("Photo render failed: {}", e);
                }
                if let Err(e) = self.display.refresh(RefreshMode::Full) {
                    warn!("Panel refresh failed: {}", e);
                }
            }
            Err(StorageError::MissingPhoto(i)) => {
                error!("No photo at index {}", i);
                self.show_message(&format!("No photo {}", i));
                self.refresh_fast();
            }
            Err(e) => {
                error!("Failed to load photo {}: {}", index, e);
                self.show_message("No storage");
                self.refresh_fast();
            }
        }
    }

    fn show_message(&mut self, message: &str) {
        if let Err(e) = self.display.render_text(message) {
            warn!("Message render failed: {}", e);
        }
    }

    fn refresh_fast(&mut self) {
        if let Err(e) = self.display.refresh(RefreshMode::Fast) {
            warn!("Panel refresh failed: {}", e);
        }
    }
}
