// ============================================
// src/speech.rs
// 単語の読み上げ (外部の TTS コマンドに丸投げ)
// ============================================

use std::process::{Child, Command, Stdio};

use crate::config::{SpeechSettings, TextPassing};

/// 単語を渡す環境変数 (`TextPassing::Env` のとき)
pub const TEXT_ENV: &str = "SAYTHEC_TEXT";

/// 読み上げ担当。結果は待たない
pub trait Speaker {
    /// ログ用の名前
    fn name(&self) -> &str;

    fn speak(&mut self, text: &str);
}

/// 何もしない (読み上げ無効時・テスト用)
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn name(&self) -> &str {
        "silent"
    }

    fn speak(&mut self, text: &str) {
        tracing::debug!(text, "speech disabled");
    }
}

/// 外部コマンドで読み上げる
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    text_via: TextPassing,
    /// まだ終わっていない読み上げプロセス
    running: Vec<Child>,
}

const TEXT_PLACEHOLDER: &str = "{text}";

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            text_via: TextPassing::Argument,
            running: Vec::new(),
        }
    }

    pub fn with_text_via(mut self, text_via: TextPassing) -> Self {
        self.text_via = text_via;
        self
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone()).with_text_via(settings.text_via)
    }

    /// `{text}` を含む引数は置換、なければ末尾に追加
    fn build_args(&self, text: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(TEXT_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(TEXT_PLACEHOLDER, text)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(text.to_string());
        }
        args
    }

    /// 読み上げプロセスのコマンドを組み立てる
    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        match self.text_via {
            TextPassing::Argument => {
                command.args(self.build_args(text));
            }
            // 単語はスクリプトに埋め込まない
            TextPassing::Env => {
                command.args(&self.args).env(TEXT_ENV, text);
            }
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// 終了したプロセスを回収する
    fn reap(&mut self) {
        self.running
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl Speaker for CommandSpeaker {
    fn name(&self) -> &str {
        &self.program
    }

    fn speak(&mut self, text: &str) {
        self.reap();
        match self.command(text).spawn() {
            Ok(child) => {
                tracing::debug!(program = %self.program, text, "speaking");
                self.running.push(child);
            }
            Err(e) => tracing::warn!(program = %self.program, "failed to start speech: {e}"),
        }
    }
}

impl Drop for CommandSpeaker {
    // 終了時に読み上げ中のプロセスを止める
    fn drop(&mut self) {
        for child in &mut self.running {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// 読み上げの設定から Speaker を作る
pub fn speaker_from_settings(settings: &SpeechSettings) -> Box<dyn Speaker> {
    if settings.enabled && !settings.program.trim().is_empty() {
        Box::new(CommandSpeaker::from_settings(settings))
    } else {
        Box::new(SilentSpeaker)
    }
}
