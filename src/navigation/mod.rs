/// Navigation Cursor
///
/// 表示中の写真インデックスを管理する状態機械です。カーソルは常に
/// `0 <= current <= highest` を満たし、両端では飽和します。
/// 境界でクランプされた遷移は `None` を返し、呼び出し側はI/Oも
/// 再描画も行いません（端で「前へ」ボタンを無効化する挙動に対応）。

use log::debug;

/// ナビゲーションカーソル
#[derive(Debug, Default)]
pub struct NavigationCursor {
    current: u32,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在表示中のインデックスを取得
    pub fn current_index(&self) -> u32 {
        self.current
    }

    /// 撮影直後の写真へジャンプします
    ///
    /// 保存が確定した後にのみ呼ばれます。
    pub fn jump_to_latest(&mut self, index: u32) {
        debug!("cursor jump: {} -> {}", self.current, index);
        self.current = index;
    }

    /// 1つ前の写真へ移動します
    ///
    /// # 戻り値
    /// * `Some(index)` - 移動後のインデックス（読み込みと再描画を行う）
    /// * `None` - 端でクランプされた（何もしない）
    pub fn step_back(&mut self, highest_index: u32) -> Option<u32> {
        if highest_index == 0 || self.current == 0 {
            return None;
        }
        self.current -= 1;
        debug!("cursor back: now {}", self.current);
        Some(self.current)
    }

    /// 1つ後の写真へ移動します
    ///
    /// # 戻り値
    /// * `Some(index)` - 移動後のインデックス（読み込みと再描画を行う）
    /// * `None` - 端でクランプされた（何もしない）
    pub fn step_forward(&mut self, highest_index: u32) -> Option<u32> {
        if highest_index == 0 || self.current >= highest_index {
            return None;
        }
        self.current += 1;
        debug!("cursor forward: now {}", self.current);
        Some(self.current)
    }
}
