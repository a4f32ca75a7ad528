/// Control Loop Integration Tests
///
/// このテストは、モックを全面的に使って撮影→受信→保存→表示→
/// ページング→電源断までのデータフロー全体を検証します。

use std::fs;

use epd_photo_viewer::controller::{LoopStep, ViewerController};
use epd_photo_viewer::display::mock::{DisplayCall, MockDisplay};
use epd_photo_viewer::display::RefreshMode;
use epd_photo_viewer::input::mock::{MockInput, MockPower};
use epd_photo_viewer::input::InputEvent;
use epd_photo_viewer::protocol::CameraSetup;
use epd_photo_viewer::serial::mock::MockSerialPort;
use epd_photo_viewer::storage::PhotoStore;
use epd_photo_viewer::transfer::NoWaitTick;
use tempfile::{tempdir, TempDir};

type TestController = ViewerController<MockSerialPort, MockDisplay, NoWaitTick>;

fn make_controller(root: &std::path::Path) -> (TestController, MockSerialPort, MockDisplay) {
    let port = MockSerialPort::new();
    let display = MockDisplay::new();
    let store = PhotoStore::open(root);
    let controller = ViewerController::new(
        port.clone(),
        display.clone(),
        NoWaitTick,
        store,
        CameraSetup::default(),
    );
    (controller, port, display)
}

fn make_controller_in_tempdir() -> (TestController, MockSerialPort, MockDisplay, TempDir) {
    let dir = tempdir().unwrap();
    let (controller, port, display) = make_controller(dir.path());
    (controller, port, display, dir)
}

#[test]
fn test_capture_round_persists_and_shows_photo() {
    let (mut controller, port, display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    // 撮影トリガ後のカメラ応答をスクリプト
    input.queue_event(InputEvent::Capture);
    let jpeg: Vec<u8> = (0..=255u8).cycle().take(4000).collect();
    port.queue_line(format!("JPEG_SIZE:{}", jpeg.len()));
    port.queue_line("JPEG_START:");
    port.queue_chunk(jpeg[..1500].to_vec());
    port.queue_idle_poll();
    port.queue_chunk(jpeg[1500..].to_vec());

    // サイズ行 → 開始行（受信込み） → 入力イベントの3サイクル
    for _ in 0..3 {
        assert_eq!(controller.poll_once(&mut input), LoopStep::Continue);
    }

    // ファイルが受信バイトそのままで作成されている
    let on_disk = fs::read(dir.path().join("capture0.jpg")).unwrap();
    assert_eq!(on_disk, jpeg);

    // 撮影した写真が現在位置になる
    assert_eq!(controller.current_index(), 0);

    // 描画 → 全面リフレッシュの順で表示されている
    let calls = display.get_calls();
    assert!(calls.contains(&DisplayCall::Photo(4000)));
    assert!(calls.contains(&DisplayCall::Refresh(RefreshMode::Full)));
}

#[test]
fn test_render_failure_does_not_block_persist() {
    let (mut controller, port, display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    // デコード失敗をシミュレートしてから撮影フローを1往復
    display.set_render_error(true);
    port.queue_line("JPEG_SIZE:200");
    port.queue_line("JPEG_START:");
    port.queue_chunk(vec![0xCD; 200]);

    controller.poll_once(&mut input);
    controller.poll_once(&mut input);

    // 描画はベストエフォート: 失敗しても保存とカーソル更新は進む
    let on_disk = fs::read(dir.path().join("capture0.jpg")).unwrap();
    assert_eq!(on_disk, vec![0xCD; 200]);
    assert_eq!(controller.current_index(), 0);
    assert_eq!(controller.highest_index(), 0);

    // 全面リフレッシュも変わらず行われる
    assert!(display.get_calls().contains(&DisplayCall::Refresh(RefreshMode::Full)));
}

#[test]
fn test_data_read_failure_reports_link_error() {
    let (mut controller, port, display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    // 制御行は届くがフレームデータの読み取りでリンクが落ちる
    port.queue_line("JPEG_SIZE:100");
    port.queue_line("JPEG_START:");
    port.set_data_read_error(true);

    controller.poll_once(&mut input);
    controller.poll_once(&mut input);

    // 転送は中断され、ユーザーに通知され、部分ファイルは残らない
    assert_eq!(display.get_texts(), vec!["Link error"]);
    assert!(display.get_calls().contains(&DisplayCall::Refresh(RefreshMode::Fast)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_control_line_read_failure_keeps_polling() {
    let (mut controller, port, display, _dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    port.set_read_error(true);
    assert_eq!(controller.poll_once(&mut input), LoopStep::Continue);
    assert!(display.get_calls().is_empty());

    // エラーが解消すれば通常の処理に戻る
    port.set_read_error(false);
    port.queue_line("JPEG_SIZE:10");
    assert_eq!(controller.poll_once(&mut input), LoopStep::Continue);
}

#[test]
fn test_timeout_leaves_no_file_behind() {
    let (mut controller, port, display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    // サイズ告知だけしてデータを一切送らない
    port.queue_line("JPEG_SIZE:5000");
    port.queue_line("JPEG_START:");

    controller.poll_once(&mut input);
    controller.poll_once(&mut input);

    // タイムアウト通知が表示され、部分ファイルは作られない
    assert_eq!(display.get_texts(), vec!["Timeout"]);
    assert!(display.get_calls().contains(&DisplayCall::Refresh(RefreshMode::Fast)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(controller.highest_index(), 0);
}

#[test]
fn test_start_without_size_is_ignored() {
    let (mut controller, port, display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    port.queue_line("JPEG_START:");
    controller.poll_once(&mut input);

    assert!(display.get_calls().is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_size_announcement_is_consumed_by_transfer() {
    let (mut controller, port, _display, dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    port.queue_line("JPEG_SIZE:3");
    port.queue_line("JPEG_START:");
    port.queue_chunk(vec![1, 2, 3]);
    // 2回目のSTARTはサイズ未告知なので無視される
    port.queue_line("JPEG_START:");

    for _ in 0..3 {
        controller.poll_once(&mut input);
    }

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_persist_failure_still_shows_photo() {
    let dir = tempdir().unwrap();
    let missing_root = dir.path().join("not_mounted");
    let (mut controller, port, display) = make_controller(&missing_root);
    let mut input = MockInput::new();

    port.queue_line("JPEG_SIZE:100");
    port.queue_line("JPEG_START:");
    port.queue_chunk(vec![0xEE; 100]);

    controller.poll_once(&mut input);
    controller.poll_once(&mut input);

    // 写真は描画されるが保存はされず、ユーザーに通知される
    let calls = display.get_calls();
    assert!(calls.contains(&DisplayCall::Photo(100)));
    assert!(calls.contains(&DisplayCall::Text("No storage".to_string())));
    assert!(calls.contains(&DisplayCall::Refresh(RefreshMode::Full)));
    assert_eq!(controller.highest_index(), 0);
}

#[test]
fn test_garbled_size_line_is_ignored() {
    let (mut controller, port, display, _dir) = make_controller_in_tempdir();
    let mut input = MockInput::new();

    port.queue_line("JPEG_SIZE:12a4");
    controller.poll_once(&mut input);

    // 化けた行は無視され、ループは続行する
    assert!(display.get_calls().is_empty());
    assert_eq!(controller.poll_once(&mut input), LoopStep::Continue);
}

#[test]
fn test_run_until_power_down() {
    let (mut controller, _port, _display, _dir) = make_controller_in_tempdir();

    let mut input = MockInput::new();
    input.queue_events(&[
        InputEvent::PrevPhoto,
        InputEvent::NextPhoto,
        InputEvent::PowerDown,
    ]);
    let mut power = MockPower::new();

    controller.run(&mut input, &mut power);

    assert_eq!(power.get_power_down_count(), 1);
}
