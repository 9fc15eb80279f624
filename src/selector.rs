/*
 * src/selector.rs
 * 出題する単語を選ぶ (同じ単語が続かないように、使用回数の少ない単語を優先)
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 再抽選の上限回数 (既定値)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// どの分岐で選ばれたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// 初回、または全カウンタが等しい (新しい周回)
    Free,
    /// 直前の単語より使用回数が少ない単語を引けた
    Constrained,
    /// 上限まで再抽選しても見つからず、最後に引いた単語を採用
    Capped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub index: usize,
    pub outcome: PickOutcome,
    /// 乱数を引いた回数 (最初の1回を含む)
    pub draws: u32,
}

/// 使用回数つきのランダム選択器
///
/// 語彙のサイズだけを知っていて、単語そのものには触れない。
/// `counters.len()` は常に語彙のサイズと等しい。
pub struct Selector<R: Rng = StdRng> {
    counters: Vec<u32>,
    last_picked: Option<usize>,
    max_attempts: u32,
    rng: R,
}

impl Selector<StdRng> {
    /// OS の乱数で初期化する
    pub fn new(size: usize) -> Self {
        Self::with_rng(size, StdRng::from_os_rng())
    }

    /// シードを固定する (再現用)
    pub fn seeded(size: usize, seed: u64) -> Self {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Selector<R> {
    pub fn with_rng(size: usize, rng: R) -> Self {
        Self {
            counters: vec![0; size],
            last_picked: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            rng,
        }
    }

    /// 再抽選の上限を設定する (最低1回)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// 新しい語彙サイズで作り直す (カウンタは全て 0、直前の単語もクリア)
    pub fn reset(&mut self, size: usize) {
        self.counters = vec![0; size];
        self.last_picked = None;
        tracing::debug!(size, "selector reset");
    }

    /// 全カウンタが等しいか (周回の区切り)
    fn at_round_boundary(&self) -> bool {
        match self.counters.first() {
            Some(first) => self.counters.iter().all(|c| c == first),
            None => true,
        }
    }

    /// 次の単語のインデックスを選ぶ (空なら `None`)
    pub fn pick(&mut self) -> Option<Pick> {
        if self.counters.is_empty() {
            return None;
        }
        let n = self.counters.len();
        let mut candidate = self.rng.random_range(0..n);
        let mut draws = 1;

        let outcome = match self.last_picked {
            Some(last) if !self.at_round_boundary() => {
                let ceiling = self.counters[last];
                // 直前の単語より使用回数が少ない単語が出るまで引き直す
                while self.counters[candidate] >= ceiling && draws <= self.max_attempts {
                    candidate = self.rng.random_range(0..n);
                    draws += 1;
                }
                if self.counters[candidate] < ceiling {
                    PickOutcome::Constrained
                } else {
                    PickOutcome::Capped
                }
            }
            _ => PickOutcome::Free,
        };

        if outcome == PickOutcome::Capped {
            tracing::warn!(index = candidate, draws, "resample cap reached, accepting candidate");
        }

        self.counters[candidate] += 1;
        self.last_picked = Some(candidate);
        Some(Pick {
            index: candidate,
            outcome,
            draws,
        })
    }
}
