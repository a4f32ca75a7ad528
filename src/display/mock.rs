use super::{DisplayError, DisplayResult, DisplaySurface, RefreshMode};
use std::sync::{Arc, Mutex};

/// ディスプレイへの呼び出しの記録
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    /// 写真の描画（バイト長のみ記録）
    Photo(usize),
    /// テキストの表示
    Text(String),
    /// パネルのリフレッシュ
    Refresh(RefreshMode),
}

/// テスト用のディスプレイモック実装
///
/// 実際のパネルを使わずに描画依頼を記録し、テストで
/// 「クランプされた遷移では再描画が起きない」等を検証できます。
#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    /// 受け取った呼び出しの記録
    pub calls: Arc<Mutex<Vec<DisplayCall>>>,
    /// エラーシミュレーション用のフラグ
    pub simulate_render_error: Arc<Mutex<bool>>,
}

impl MockDisplay {
    /// 新しいMockDisplayインスタンスを作成します
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: 記録された呼び出しを取得
    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// テスト用: リフレッシュ回数を取得
    pub fn refresh_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, DisplayCall::Refresh(_)))
            .count()
    }

    /// テスト用: 表示されたテキストの一覧を取得
    pub fn get_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Text(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// テスト用: 記録をクリア
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// テスト用: 描画エラーをシミュレート
    pub fn set_render_error(&self, enable: bool) {
        *self.simulate_render_error.lock().unwrap() = enable;
    }
}

impl DisplaySurface for MockDisplay {
    fn render_photo(&mut self, jpeg: &[u8]) -> DisplayResult<()> {
        if *self.simulate_render_error.lock().unwrap() {
            return Err(DisplayError::RenderError("simulated decode failure".to_string()));
        }
        self.calls.lock().unwrap().push(DisplayCall::Photo(jpeg.len()));
        Ok(())
    }

    fn render_text(&mut self, message: &str) -> DisplayResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(DisplayCall::Text(message.to_string()));
        Ok(())
    }

    fn refresh(&mut self, mode: RefreshMode) -> DisplayResult<()> {
        self.calls.lock().unwrap().push(DisplayCall::Refresh(mode));
        Ok(())
    }
}
