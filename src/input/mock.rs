use super::{InputEvent, InputSource, PowerControl};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// テスト用の入力ソースモック実装
///
/// スクリプトされたイベント列を順番に返します。
#[derive(Debug, Clone, Default)]
pub struct MockInput {
    /// 読み取り用のイベントキュー（先頭から取り出される）
    pub event_queue: Arc<Mutex<VecDeque<InputEvent>>>,
}

impl MockInput {
    /// 新しいMockInputインスタンスを作成します
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: イベントをキューに追加
    pub fn queue_event(&self, event: InputEvent) {
        self.event_queue.lock().unwrap().push_back(event);
    }

    /// テスト用: イベント列をまとめてキューに追加
    pub fn queue_events(&self, events: &[InputEvent]) {
        let mut queue = self.event_queue.lock().unwrap();
        for &event in events {
            queue.push_back(event);
        }
    }
}

impl InputSource for MockInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.event_queue.lock().unwrap().pop_front()
    }
}

/// テスト用の電源制御モック実装
#[derive(Debug, Clone, Default)]
pub struct MockPower {
    /// power_downが呼ばれた回数
    pub power_down_count: Arc<Mutex<u32>>,
}

impl MockPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: シャットダウンが要求された回数を取得
    pub fn get_power_down_count(&self) -> u32 {
        *self.power_down_count.lock().unwrap()
    }
}

impl PowerControl for MockPower {
    fn power_down(&mut self) {
        *self.power_down_count.lock().unwrap() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_input_order() {
        let mut mock = MockInput::new();
        mock.queue_events(&[InputEvent::Capture, InputEvent::PrevPhoto]);

        assert_eq!(mock.poll_event(), Some(InputEvent::Capture));
        assert_eq!(mock.poll_event(), Some(InputEvent::PrevPhoto));
        assert_eq!(mock.poll_event(), None);
    }

    #[test]
    fn test_mock_power() {
        let mut mock = MockPower::new();
        assert_eq!(mock.get_power_down_count(), 0);
        mock.power_down();
        assert_eq!(mock.get_power_down_count(), 1);
    }
}
