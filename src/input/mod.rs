// 物理ボタン・タッチパネルコラボレータのインターフェース
//
// 生の入力ポーリング（ボタンのデバウンスやタッチ座標の読み取り）は
// このクレートの範囲外です。ハードウェア側の実装が座標やボタンIDを
// 離散イベントに変換してから渡します。
pub mod mock;

/// ユーザー入力イベント
///
/// 元のハードウェアでは左ボタン／タッチ帯1が前へ、右ボタン／帯2が
/// 次へ、プッシュボタン／帯3が撮影、帯4が電源断に対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// 1つ前の写真を表示
    PrevPhoto,
    /// 1つ後の写真を表示
    NextPhoto,
    /// 新しい写真を撮影
    Capture,
    /// 電源を切る
    PowerDown,
}

/// 入力ソースのトレイト（非ブロッキング）
pub trait InputSource {
    /// 保留中の入力イベントを1つ取り出す
    ///
    /// イベントがない場合は `None` を返します。
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// 電源制御コラボレータのトレイト
pub trait PowerControl {
    /// デバイスをシャットダウンする（不可逆）
    fn power_down(&mut self);
}
