use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of questions drawn for a single match.
pub const QUESTIONS_PER_MATCH: usize = 10;

/// A multiple-choice question. `answer` holds the value of the correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    pub fn is_correct(&self, chosen: &str) -> bool {
        self.answer == chosen
    }
}

/// Draws up to [`QUESTIONS_PER_MATCH`] distinct questions from `bank`.
///
/// Runs only the first ten steps of a Fisher-Yates shuffle over the bank
/// indices, so the cost is independent of the bank size beyond the index
/// vector. A bank smaller than one match is returned whole, in order.
pub fn draw_questions<R: Rng + ?Sized>(bank: &[Question], rng: &mut R) -> Vec<Question> {
    if bank.len() < QUESTIONS_PER_MATCH {
        return bank.to_vec();
    }

    let mut indices: Vec<usize> = (0..bank.len()).collect();
    for i in 0..QUESTIONS_PER_MATCH {
        let j = rng.gen_range(i..bank.len());
        indices.swap(i, j);
    }

    indices[..QUESTIONS_PER_MATCH]
        .iter()
        .map(|&idx| bank[idx].clone())
        .collect()
}
