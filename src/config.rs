// ============================================
// src/config.rs
// 設定ファイルの構造と読み書きロジック
// ============================================

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::selector::DEFAULT_MAX_ATTEMPTS;

const CONFIG_FILE: &str = "config.json";
/// データディレクトリで探す単語リスト (先に見つかった方)
const WORDS_FILES: &[&str] = &["words.json", "words.db"];
const LOG_FILE: &str = "saythec.log";

/// 読み上げる単語の渡し方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPassing {
    /// 引数で渡す (`{text}` を置換、なければ末尾に追加)
    #[default]
    Argument,
    /// 環境変数 `SAYTHEC_TEXT` で渡す (引数はそのまま)
    Env,
}

/// 読み上げコマンドの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
    pub text_via: TextPassing,
}

impl SpeechSettings {
    fn with(program: &str, args: &[&str], text_via: TextPassing) -> Self {
        Self {
            enabled: true,
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            text_via,
        }
    }

    /// PowerShell + System.Speech。単語はスクリプトに埋め込まず環境変数で渡す
    pub fn windows() -> Self {
        Self::with(
            "powershell",
            &[
                "-NoProfile",
                "-Command",
                "Add-Type -AssemblyName System.Speech; \
                 $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
                 $s.Rate = -2; $s.Speak($env:SAYTHEC_TEXT)",
            ],
            TextPassing::Env,
        )
    }

    pub fn macos() -> Self {
        Self::with("say", &["-r", "150"], TextPassing::Argument)
    }

    pub fn espeak() -> Self {
        Self::with("espeak", &["-s", "130"], TextPassing::Argument)
    }
}

impl Default for SpeechSettings {
    /// OS ごとの標準 TTS (少しゆっくりめ)
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            Self::windows()
        } else if cfg!(target_os = "macos") {
            Self::macos()
        } else {
            Self::espeak()
        }
    }
}

/// アプリの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 単語リストのファイル (未指定ならデータディレクトリ → 組み込み)
    pub vocabulary_path: Option<PathBuf>,
    pub max_resample_attempts: u32,
    pub speech: SpeechSettings,
    /// 新しい単語を出すたびに読み上げる
    pub speak_on_generate: bool,
    pub show_help_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vocabulary_path: None,
            max_resample_attempts: DEFAULT_MAX_ATTEMPTS,
            speech: SpeechSettings::default(),
            speak_on_generate: false,
            show_help_on_start: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "saythec", "SayTheC")
}

/// MARK:設定ファイルのパス (取得できなければカレントディレクトリ)
pub fn default_config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

/// データディレクトリに置かれた単語リスト (存在する場合のみ)
pub fn default_words_path() -> Option<PathBuf> {
    let dirs = project_dirs()?;
    WORDS_FILES
        .iter()
        .map(|name| dirs.data_dir().join(name))
        .find(|path| path.exists())
}

/// ログファイルのパス (ディレクトリも作る)
pub fn log_file_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        let data_dir = dirs.data_dir();
        if fs::create_dir_all(data_dir).is_ok() {
            return data_dir.join(LOG_FILE);
        }
    }
    PathBuf::from(LOG_FILE)
}

impl Settings {
    /// MARK:標準の場所から読み込む (失敗したらデフォルト)
    pub fn load() -> Self {
        let path = default_config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "using default settings: {e}");
                Self::default()
            }
        }
    }

    /// コマンドラインで指定された設定を読む
    ///
    /// `creating` (書き出し用) のときは、まだ存在しないファイルをデフォルトとして扱う。
    pub fn resolve(path: Option<&Path>, creating: bool) -> Result<Self, ConfigError> {
        match path {
            Some(path) if creating && !path.exists() => Ok(Self::default()),
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// MARK:JSON で保存する
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
