// --------------------------------------------------
// src/ui.rs
// UI描画
// --------------------------------------------------

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::classifier::{ColorClass, Segment};

const HARD_C_COLOR: Color = Color::Red;
const SOFT_C_COLOR: Color = Color::Cyan;

fn segment_style(color: ColorClass) -> Style {
    match color {
        // 端末の文字色のまま
        ColorClass::Default => Style::default(),
        ColorClass::HardC => Style::default().fg(HARD_C_COLOR),
        ColorClass::SoftC => Style::default().fg(SOFT_C_COLOR),
    }
}

/// Segment 列を色付きの1行にする
pub fn word_line(segments: &[Segment]) -> Line<'_> {
    let spans: Vec<Span> = segments
        .iter()
        .map(|s| Span::styled(s.text.as_str(), segment_style(s.color).bold()))
        .collect();
    Line::from(spans)
}

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default().borders(Borders::ALL).title("Say The C !");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] ステータスバー
            Constraint::Length(1), // [1] メッセージ
            Constraint::Min(1),    // [2] 空白
            Constraint::Length(1), // [3] 単語
            Constraint::Length(1), // [4] 空白
            Constraint::Length(1), // [5] 画像
            Constraint::Min(1),    // [6] 空白
            Constraint::Length(1), // [7] 操作説明
        ])
        .split(inner_area);

    // 0. ステータスバー
    let status = format!(
        "Words: {} ({})   Shown: {}",
        app.vocabulary.len(),
        app.source,
        app.shown_count
    );
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        chunks[0],
    );

    // 1. メッセージ
    if let Some(message) = &app.status {
        f.render_widget(
            Paragraph::new(message.as_str()).style(Style::default().fg(Color::Yellow)),
            chunks[1],
        );
    }

    // 2. 単語と画像
    match &app.card {
        Some(card) => {
            f.render_widget(Paragraph::new(word_line(&card.segments)).centered(), chunks[3]);

            let image_text = match &card.image {
                Some(image) => format!("Image: {image}"),
                None => "(no image)".to_string(),
            };
            f.render_widget(
                Paragraph::new(image_text)
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                chunks[5],
            );
        }
        None => {
            let prompt = if app.can_generate() {
                "Press Space for a word"
            } else {
                "No words loaded"
            };
            f.render_widget(
                Paragraph::new(prompt)
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                chunks[3],
            );
        }
    }

    // 3. 操作説明 (使えない操作は暗く)
    let enabled = Style::default().fg(Color::Gray);
    let disabled = Style::default().fg(Color::DarkGray);
    let hints = Line::from(vec![
        Span::styled(
            "[Space] next  ",
            if app.can_generate() { enabled } else { disabled },
        ),
        Span::styled("[s] speak  ", if app.can_speak() { enabled } else { disabled }),
        Span::styled("[r] reload  [h] help  [q] quit", enabled),
    ]);
    f.render_widget(Paragraph::new(hints).centered(), chunks[7]);

    if app.show_help {
        draw_help(f, size);
    }
}

/// ヘルプのポップアップ
fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 60, 11);
    let lines = vec![
        Line::from("How to read the colors".bold()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Red", Style::default().fg(HARD_C_COLOR).bold()),
            Span::raw(": hard C, sounds like K (cat, cup)"),
        ]),
        Line::from(vec![
            Span::styled("Cyan", Style::default().fg(SOFT_C_COLOR).bold()),
            Span::raw(": soft C, sounds like S (city, cinema)"),
        ]),
        Line::from("C is soft when the next letter is e, i or y."),
        Line::from(""),
        Line::from("Space: next word   s: say it   Esc: close"),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help")),
        popup,
    );
}

/// 画面中央の矩形 (はみ出す場合は画面サイズに合わせる)
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
