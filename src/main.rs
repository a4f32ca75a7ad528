use anyhow::Result;
use log::info;

use epd_photo_viewer::controller::ViewerController;
use epd_photo_viewer::display::{DisplayResult, DisplaySurface, RefreshMode};
use epd_photo_viewer::input::mock::MockInput;
use epd_photo_viewer::input::{InputEvent, PowerControl};
use epd_photo_viewer::protocol::CameraSetup;
use epd_photo_viewer::serial::mock::MockSerialPort;
use epd_photo_viewer::storage::PhotoStore;
use epd_photo_viewer::transfer::NoWaitTick;

/// ログ出力だけを行うディスプレイ実装（ホストシミュレーション用）
///
/// 実機ではここが電子ペーパーパネルへの描画になります。
struct ConsoleDisplay;

impl DisplaySurface for ConsoleDisplay {
    fn render_photo(&mut self, jpeg: &[u8]) -> DisplayResult<()> {
        info!("[display] photo rendered: {} bytes", jpeg.len());
        Ok(())
    }

    fn render_text(&mut self, message: &str) -> DisplayResult<()> {
        info!("[display] message: {}", message);
        Ok(())
    }

    fn refresh(&mut self, mode: RefreshMode) -> DisplayResult<()> {
        info!("[display] panel refresh: {:?}", mode);
        Ok(())
    }
}

struct ConsolePower;

impl PowerControl for ConsolePower {
    fn power_down(&mut self) {
        info!("[power] shutting down");
    }
}

/// ダミーのJPEG風バイト列を作成（SOI/EOIマーカー付き）
fn fake_jpeg(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x55u8; len.max(4)];
    bytes[0] = 0xFF;
    bytes[1] = 0xD8;
    let end = bytes.len();
    bytes[end - 2] = 0xFF;
    bytes[end - 1] = 0xD9;
    bytes
}

/// カメラ側の応答（サイズ告知・開始合図・フレームバイト）をスクリプトします
fn script_camera_reply(port: &MockSerialPort, jpeg: &[u8]) {
    port.queue_line(format!("JPEG_SIZE:{}", jpeg.len()));
    port.queue_line("JPEG_START:");
    // 不規則なチャンクに分割して届ける
    let split = jpeg.len() / 3;
    port.queue_chunk(jpeg[..split].to_vec());
    port.queue_idle_poll();
    port.queue_chunk(jpeg[split..].to_vec());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting photo viewer controller (host simulation)...");

    // 写真ストアの準備（前回の実行結果を消して毎回インデックス0から始める）
    let root = std::env::temp_dir().join("epd_photo_viewer_demo");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root)?;
    let store = PhotoStore::open(&root);
    info!("✓ Photo store ready at {}", root.display());

    // スクリプト済みのモックトランスポートを配線
    let port = MockSerialPort::new();
    let mut controller = ViewerController::new(
        port.clone(),
        ConsoleDisplay,
        NoWaitTick,
        store,
        CameraSetup::default(),
    );
    info!("✓ Controller wired to scripted transport");

    // 撮影を2回トリガし、カメラの応答をスクリプト
    controller.handle_event(InputEvent::Capture);
    script_camera_reply(&port, &fake_jpeg(4800));
    controller.handle_event(InputEvent::Capture);
    script_camera_reply(&port, &fake_jpeg(5100));
    info!("コマンド送信記録: {:?}", port.get_written_lines());

    // 受信 → ページング → 電源断までを制御ループで実行
    let mut input = MockInput::new();
    input.queue_events(&[
        InputEvent::PrevPhoto,
        InputEvent::NextPhoto,
        InputEvent::PowerDown,
    ]);
    controller.run(&mut input, &mut ConsolePower);

    info!(
        "Session finished: current index {}, highest index {}",
        controller.current_index(),
        controller.highest_index()
    );
    Ok(())
}
