/// Photo Store
///
/// 連番インデックスと保存先ファイルパスの対応を管理します。
///
/// ## ファイルレイアウト
///
/// ルートディレクトリ直下に `capture<N>.jpg` (N = 0,1,2,…) を作成します。
/// 内容は受信したJPEGバイト列そのままで、ヘッダ等は付加しません。
/// 一度書いたファイルは不変で、再撮影は常に新しいインデックスを使います。

use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 写真ファイル名のプレフィックス
pub const PHOTO_FILE_PREFIX: &str = "capture";
/// 写真ファイルの拡張子
pub const PHOTO_FILE_EXTENSION: &str = "jpg";

/// ストレージのエラーを表す列挙型
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 保存媒体が開けない（SDカード未挿入など）
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// 指定インデックスにファイルが存在しない
    ///
    /// インデックスは0から隙間なく連続している前提なので、
    /// 抜けは有効な状態ではなくエラーです。
    #[error("no photo at index {0}")]
    MissingPhoto(u32),
}

/// 写真ストア
///
/// `next_free_index` は「まだ使われていないと分かっている最小の
/// インデックス」のキャッシュです。ディスク上のファイルを探索して
/// 遅延更新されるため、前回セッションで作られたファイルも起動時の
/// 探索で自然に引き継がれます。
#[derive(Debug)]
pub struct PhotoStore {
    root: PathBuf,
    next_free_index: u32,
}

impl PhotoStore {
    /// 指定ルートの写真ストアを作成します（I/Oはまだ行いません）
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_free_index: 0,
        }
    }

    /// ストアを開き、ディスク上の既存ファイルからインデックスを復元します
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(root);
        let index = store.resolve_next_free_index();
        info!("photo store ready: next free index {}", index);
        store
    }

    /// ストアのルートディレクトリを取得
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// インデックスに対応するファイルパスを取得
    pub fn photo_path(&self, index: u32) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", PHOTO_FILE_PREFIX, index, PHOTO_FILE_EXTENSION))
    }

    /// 確認済みの最大インデックス位置を取得
    ///
    /// ナビゲーションカーソルの上限として参照されます。
    pub fn highest_index(&self) -> u32 {
        self.next_free_index
    }

    /// 空いている次のインデックスを解決します
    ///
    /// 前回の値から昇順に探索し、ファイルが存在しない最初のインデックス
    /// を返します。起動時リカバリを兼ねます（ディスク上の実態から
    /// 件数を再導出する）。
    pub fn resolve_next_free_index(&mut self) -> u32 {
        while self.photo_path(self.next_free_index).exists() {
            self.next_free_index += 1;
        }
        debug!("resolved next free index: {}", self.next_free_index);
        self.next_free_index
    }

    /// 受信済みのJPEGバイト列を次の空きインデックスに保存します
    ///
    /// ファイルの作成に失敗した場合は `StorageError::Unavailable` を返し、
    /// インデックスは変化しません。書き込みは完成したバッファ全体が
    /// 対象なので、部分書き込みファイルの後始末は不要です。
    ///
    /// # 戻り値
    /// * `Result<u32, StorageError>` - 保存先のインデックスまたはエラー
    pub fn persist(&mut self, bytes: &[u8]) -> Result<u32, StorageError> {
        let index = self.resolve_next_free_index();
        let path = self.photo_path(index);

        let mut file = fs::File::create(&path).map_err(|e| {
            warn!("cannot create {}: {}", path.display(), e);
            StorageError::Unavailable(e.to_string())
        })?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(index)
    }

    /// 指定インデックスの写真を読み込みます
    pub fn load(&self, index: u32) -> Result<Vec<u8>, StorageError> {
        let path = self.photo_path(index);
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::MissingPhoto(index)
            } else {
                StorageError::Unavailable(e.to_string())
            }
        })
    }
}
