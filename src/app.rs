// ============================================
// src/app.rs
// アプリ全体の状態とキー操作
// ============================================

use crossterm::event::KeyCode;

use crate::classifier::{Card, render_card};
use crate::config::Settings;
use crate::selector::Selector;
use crate::speech::Speaker;
use crate::vocabulary::{Vocabulary, VocabularyLoader, WordEntry};

/// アプリ全体の状態を管理する
pub struct App {
    loader: Box<dyn VocabularyLoader>,
    speaker: Box<dyn Speaker>,
    selector: Selector,

    /// 単語リスト (読み込み失敗時は空)
    pub vocabulary: Vocabulary,
    /// 単語リストの供給元の表示名
    pub source: String,
    /// 現在表示中の単語のインデックス
    current_index: Option<usize>,
    /// 現在のカード (色分け済み)
    pub card: Option<Card>,

    pub show_help: bool,
    pub speak_on_generate: bool,
    /// ステータス行のメッセージ
    pub status: Option<String>,
    /// このセッションで出した単語数
    pub shown_count: u32,
    pub should_quit: bool,
}

impl App {
    /// 単語リストを読み込んで初期化する
    pub fn new(
        loader: Box<dyn VocabularyLoader>,
        speaker: Box<dyn Speaker>,
        settings: &Settings,
        seed: Option<u64>,
    ) -> Self {
        let selector = match seed {
            Some(seed) => Selector::seeded(0, seed),
            None => Selector::new(0),
        }
        .with_max_attempts(settings.max_resample_attempts);

        let mut app = Self {
            source: loader.describe(),
            loader,
            speaker,
            selector,
            vocabulary: Vocabulary::default(),
            current_index: None,
            card: None,
            show_help: settings.show_help_on_start,
            speak_on_generate: settings.speak_on_generate,
            status: None,
            shown_count: 0,
            should_quit: false,
        };
        app.load_vocabulary();
        app
    }

    /// 単語リストを (再) 読み込みし、選択器を作り直す
    pub fn load_vocabulary(&mut self) {
        match self.loader.load() {
            Ok(entries) => {
                tracing::info!(source = %self.source, count = entries.len(), "vocabulary loaded");
                self.status = entries
                    .is_empty()
                    .then(|| format!("No words found in {}", self.source));
                self.vocabulary = Vocabulary::new(entries);
            }
            Err(e) => {
                tracing::warn!("vocabulary unavailable: {e}");
                self.status = Some(e.to_string());
                self.vocabulary = Vocabulary::default();
            }
        }
        self.selector.reset(self.vocabulary.len());
        self.current_index = None;
        self.card = None;
    }

    pub fn current_word(&self) -> Option<&WordEntry> {
        self.current_index.and_then(|i| self.vocabulary.get(i))
    }

    /// 単語がなければ「次へ」は無効
    pub fn can_generate(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// 表示中の単語があるときだけ読み上げ可能
    pub fn can_speak(&self) -> bool {
        self.current_word()
            .is_some_and(|entry| !entry.word().trim().is_empty())
    }

    /// 次の単語を選んでカードを作る
    pub fn generate(&mut self) {
        if !self.can_generate() {
            self.status = Some("No words to show. Press r to reload.".to_string());
            return;
        }
        let Some(pick) = self.selector.pick() else {
            return;
        };
        let Some(entry) = self.vocabulary.get(pick.index) else {
            return;
        };
        let card = render_card(entry);
        tracing::debug!(
            word = %card.word,
            index = pick.index,
            draws = pick.draws,
            outcome = ?pick.outcome,
            "next word"
        );
        self.card = Some(card);
        self.current_index = Some(pick.index);
        self.shown_count += 1;
        self.status = None;

        if self.speak_on_generate {
            self.speak();
        }
    }

    pub fn speak(&mut self) {
        if !self.can_speak() {
            return;
        }
        if let Some(entry) = self.current_index.and_then(|i| self.vocabulary.get(i)) {
            self.speaker.speak(entry.word());
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// キー入力の処理
    pub fn handle_key(&mut self, code: KeyCode) {
        // ヘルプ表示中は Esc でヘルプだけ閉じる
        if self.show_help && code == KeyCode::Esc {
            self.show_help = false;
            return;
        }
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                self.show_help = false;
                self.generate();
            }
            KeyCode::Char('s') => self.speak(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('r') => {
                self.load_vocabulary();
                if self.status.is_none() {
                    self.status = Some(format!("Reloaded {} words", self.vocabulary.len()));
                }
            }
            _ => {}
        }
    }
}
