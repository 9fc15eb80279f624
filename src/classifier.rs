/*
 * src/classifier.rs
 * 単語中の C を「硬い C」「柔らかい C」に分類して色分けする
 */

use crate::vocabulary::WordEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    Default,
    /// /k/ (cat)
    HardC,
    /// /s/ (cinema)。直後が e, i, y
    SoftC,
}

/// 色付きの1文字分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: ColorClass,
}

impl Segment {
    fn new(c: char, color: ColorClass) -> Self {
        Self {
            text: c.to_string(),
            color,
        }
    }
}

fn is_c(c: char) -> bool {
    c == 'c' || c == 'C'
}

fn softens_c(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'e' | 'i' | 'y')
}

/// 単語を左から走査して Segment 列に分解する
///
/// C とその次の文字は同じ色の2つの Segment になり、まとめて読み進める。
/// 全 Segment の `text` を連結すると元の単語に戻る。
pub fn classify(word: &str) -> Vec<Segment> {
    let mut result = Vec::with_capacity(word.len());
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        if !is_c(c) {
            result.push(Segment::new(c, ColorClass::Default));
            continue;
        }

        let color = match chars.peek() {
            Some(&next) if softens_c(next) => ColorClass::SoftC,
            _ => ColorClass::HardC,
        };
        result.push(Segment::new(c, color));

        // 次の文字も同じ色で消費する
        if let Some(next) = chars.next() {
            result.push(Segment::new(next, color));
        }
    }
    result
}

/// 表示する画像 (空白だけなら画像なし)
pub fn resolve_image(entry: &WordEntry) -> Option<&str> {
    let reference = entry.image_reference();
    if reference.trim().is_empty() {
        None
    } else {
        Some(reference)
    }
}

/// 画面に渡す1枚分のカード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub word: String,
    pub segments: Vec<Segment>,
    pub image: Option<String>,
}

pub fn render_card(entry: &WordEntry) -> Card {
    Card {
        word: entry.word().to_string(),
        segments: classify(entry.word()),
        image: resolve_image(entry).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::ColorClass::{Default, HardC, SoftC};
    use super::*;

    fn pairs(word: &str) -> Vec<(String, ColorClass)> {
        classify(word).into_iter().map(|s| (s.text, s.color)).collect()
    }

    fn expect(items: &[(&str, ColorClass)]) -> Vec<(String, ColorClass)> {
        items.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn cat_is_hard() {
        assert_eq!(pairs("cat"), expect(&[("c", HardC), ("a", HardC), ("t", Default)]));
    }

    #[test]
    fn cinema_is_soft() {
        assert_eq!(
            pairs("cinema"),
            expect(&[
                ("c", SoftC),
                ("i", SoftC),
                ("n", Default),
                ("e", Default),
                ("m", Default),
                ("a", Default),
            ])
        );
    }

    #[test]
    fn bicycle_has_both() {
        assert_eq!(
            pairs("bicycle"),
            expect(&[
                ("b", Default),
                ("i", Default),
                ("c", SoftC),
                ("y", SoftC),
                // "cl" はひとまとまりで硬い C
                ("c", HardC),
                ("l", HardC),
                ("e", Default),
            ])
        );
    }

    #[test]
    fn lone_c_and_empty() {
        assert_eq!(pairs("c"), expect(&[("c", HardC)]));
        assert_eq!(pairs(""), expect(&[]));
    }

    #[test]
    fn trailing_c_has_no_pair() {
        assert_eq!(
            pairs("zinc"),
            expect(&[("z", Default), ("i", Default), ("n", Default), ("c", HardC)])
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(pairs("CE"), expect(&[("C", SoftC), ("E", SoftC)]));
        assert_eq!(pairs("cY"), expect(&[("c", SoftC), ("Y", SoftC)]));
        assert_eq!(pairs("Cup"), expect(&[("C", HardC), ("u", HardC), ("p", Default)]));
    }

    #[test]
    fn punctuation_and_digits_after_c_are_hard() {
        assert_eq!(pairs("c1"), expect(&[("c", HardC), ("1", HardC)]));
        assert_eq!(pairs("tic-tac"), expect(&[
            ("t", Default),
            ("i", Default),
            ("c", HardC),
            ("-", HardC),
            ("t", Default),
            ("a", Default),
            ("c", HardC),
        ]));
    }

    #[test]
    fn paired_letter_is_consumed() {
        // "cc": 2文字目の c は前の C とセットで読まれる
        assert_eq!(pairs("ccc"), expect(&[("c", HardC), ("c", HardC), ("c", HardC)]));
        assert_eq!(
            pairs("accent"),
            expect(&[
                ("a", Default),
                ("c", HardC),
                ("c", HardC),
                ("e", Default),
                ("n", Default),
                ("t", Default),
            ])
        );
    }

    #[test]
    fn segments_rebuild_the_word() {
        let words = [
            "", "c", "C", "cat", "cinema", "bicycle", "accent", "Ça va", "façade", "circus!",
            "ccccc", "über-cycle", "日本c語", "x", "   ",
        ];
        for word in words {
            let rebuilt: String = classify(word).into_iter().map(|s| s.text).collect();
            assert_eq!(rebuilt, word);
        }
    }

    #[test]
    fn image_is_optional() {
        assert_eq!(resolve_image(&WordEntry::new("cat", "cat.png")), Some("cat.png"));
        assert_eq!(resolve_image(&WordEntry::new("cat", "")), None);
        assert_eq!(resolve_image(&WordEntry::new("cat", "  \t")), None);
    }

    #[test]
    fn card_bundles_segments_and_image() {
        let card = render_card(&WordEntry::new("ice", "ice.jpg"));
        assert_eq!(card.word, "ice");
        assert_eq!(card.segments.len(), 3);
        assert_eq!(card.segments[1].color, SoftC);
        assert_eq!(card.image.as_deref(), Some("ice.jpg"));
    }
}
