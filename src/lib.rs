// シリアルフォトビューアのコントローラロジック
pub mod controller;
pub mod navigation;
pub mod protocol;
pub mod serial;
pub mod storage;
pub mod transfer;

// ディスプレイ・入力コラボレータのインターフェース
pub mod display;
pub mod input;
