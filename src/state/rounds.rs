//! Round generation from the question corpus
//!
//! Each round draws five distinct corpus rows. The first one supplies the theme
//! and the two correct options, the other four supply distractors. When that is
//! not enough for six distinct options, random cells from the whole corpus top
//! the set up. Every random search has a fixed draw budget, so a pathological
//! corpus yields fewer rounds instead of spinning.

use crate::types::{AnswerKey, CorpusRow, RoundDefinition};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Rows sampled per round: one answer row plus distractor rows
pub const ROWS_PER_ROUND: usize = 5;
pub const MAX_OPTIONS: usize = 6;
/// Correct options shown per round
pub const CORRECT_OPTIONS: usize = 2;
/// Random draws allowed for each bounded search
pub const DRAW_BUDGET: usize = 50;

/// Build up to `round_count` rounds. Rounds that cannot be generated are skipped,
/// so the result may be shorter than requested and is empty for tiny corpora.
pub fn build_rounds<R: Rng + ?Sized>(
    rows: &[CorpusRow],
    round_count: u32,
    round_duration: u32,
    rng: &mut R,
) -> Vec<RoundDefinition> {
    if rows.len() < ROWS_PER_ROUND {
        tracing::error!(
            "Corpus has {} usable rows, at least {} are needed to build a round",
            rows.len(),
            ROWS_PER_ROUND
        );
        return Vec::new();
    }

    let rounds: Vec<RoundDefinition> = (0..round_count)
        .filter_map(|r| build_round(rows, r + 1, round_duration, rng))
        .collect();

    if rounds.len() < round_count as usize {
        tracing::warn!(
            "Generated {} of {} requested rounds",
            rounds.len(),
            round_count
        );
    }

    rounds
}

fn build_round<R: Rng + ?Sized>(
    rows: &[CorpusRow],
    ordinal: u32,
    duration: u32,
    rng: &mut R,
) -> Option<RoundDefinition> {
    let picked = index::sample(rng, rows.len(), ROWS_PER_ROUND).into_vec();
    let answer_row = &rows[picked[0]];

    let correct = pick_distinct_options(answer_row, CORRECT_OPTIONS, rng);
    let [first, second]: [String; CORRECT_OPTIONS] = correct.try_into().ok()?;

    let mut options = OptionSet::default();
    options.push(&first);
    options.push(&second);

    for &row_idx in &picked[1..] {
        options.push(random_cell(&rows[row_idx], rng));
    }

    let mut draws = 0;
    while options.len() < MAX_OPTIONS && draws < DRAW_BUDGET {
        let row = &rows[rng.random_range(0..rows.len())];
        options.push(random_cell(row, rng));
        draws += 1;
    }

    let mut options = options.into_vec();
    options.shuffle(rng);

    Some(RoundDefinition {
        index: ordinal,
        duration,
        theme: answer_row.label.clone(),
        options,
        answer: AnswerKey {
            answer: answer_row.label.clone(),
            choices: [first, second],
        },
    })
}

/// Draw `count` distinct non-empty cells from a row, or nothing if the budget runs out
fn pick_distinct_options<R: Rng + ?Sized>(
    row: &CorpusRow,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    if row.cells.len() < count {
        return Vec::new();
    }

    let mut picked: Vec<String> = Vec::with_capacity(count);
    let mut draws = 0;
    while picked.len() < count && draws < DRAW_BUDGET {
        let cell = random_cell(row, rng);
        if !cell.is_empty() && !picked.iter().any(|p| p == cell) {
            picked.push(cell.to_string());
        }
        draws += 1;
    }

    if picked.len() < count {
        tracing::debug!("Row {:?} has too few distinct options", row.label);
        return Vec::new();
    }
    picked
}

fn random_cell<'a, R: Rng + ?Sized>(row: &'a CorpusRow, rng: &mut R) -> &'a str {
    if row.cells.is_empty() {
        return "";
    }
    row.cells[rng.random_range(0..row.cells.len())].trim()
}

/// Insertion-ordered set of trimmed, non-empty option strings
#[derive(Default)]
struct OptionSet {
    items: Vec<String>,
}

impl OptionSet {
    fn push(&mut self, option: &str) {
        let trimmed = option.trim();
        if !trimmed.is_empty() && !self.items.iter().any(|o| o == trimmed) {
            self.items.push(trimmed.to_string());
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}
