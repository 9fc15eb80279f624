// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

mod app;
mod classifier;
mod config;
mod error;
mod logging;
mod selector;
mod speech;
mod ui;
mod vocabulary;

use app::App;
use config::Settings;
use speech::{SilentSpeaker, Speaker, speaker_from_settings};
use vocabulary::{BuiltinLoader, VocabularyLoader, loader_for_path};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::prelude::*;

/// Flashcards for hearing the hard and soft C
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Word list (.json, .db/.sqlite with a Words table, or one `word<TAB>image` per line)
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a repeatable word order
    #[arg(long)]
    seed: Option<u64>,

    /// Do not speak words
    #[arg(long)]
    no_speech: bool,

    /// Write the current settings to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&config::log_file_path(), cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let settings = Settings::resolve(cli.config.as_deref(), cli.write_config)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    if cli.write_config {
        settings
            .save_to(&config_path)
            .with_context(|| format!("failed to write config {}", config_path.display()))?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let loader = choose_loader(&cli, &settings);
    let speaker: Box<dyn Speaker> = if cli.no_speech {
        Box::new(SilentSpeaker)
    } else {
        speaker_from_settings(&settings.speech)
    };
    tracing::info!(speaker = speaker.name(), "speech ready");
    let mut app = App::new(loader, speaker, &settings, cli.seed);

    install_panic_hook();
    let (mut terminal, guard) = setup_terminal().context("failed to set up terminal")?;
    let result = run_app(&mut terminal, &mut app);
    // ループが失敗しても端末は元に戻す
    drop(guard);
    result
}

/// 単語リストの供給元: --words → 設定 → データディレクトリ → 組み込み
fn choose_loader(cli: &Cli, settings: &Settings) -> Box<dyn VocabularyLoader> {
    let path = cli
        .words
        .clone()
        .or_else(|| settings.vocabulary_path.clone())
        .or_else(config::default_words_path);
    match path {
        Some(path) => loader_for_path(path),
        None => Box::new(BuiltinLoader),
    }
}

/// Drop で端末を元に戻す (エラー・パニック時も)
struct TerminalGuard {
    restore: fn() -> Result<()>,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            tracing::warn!("failed to restore terminal: {e}");
        }
    }
}

fn setup_terminal() -> Result<(Terminal<impl Backend>, TerminalGuard)> {
    enable_raw_mode()?;
    // ここから先で失敗しても guard が raw モードを解除する
    let guard = TerminalGuard {
        restore: restore_terminal,
    };
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Ok((Terminal::new(backend)?, guard))
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

/// パニックのメッセージが代替スクリーンに消えないよう、先に端末を戻す
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

fn run_app(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    tracing::info!(shown = app.shown_count, "session ended");
    Ok(())
}
