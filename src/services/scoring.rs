//! Answer scoring.
//!
//! Pure and total: the stored questions are the correctness key, the answer
//! sheet may be partial or mis-shaped, and every question always produces a
//! [`ScoreResult`]. Missing or wrong-shaped entries count as unanswered (and
//! therefore incorrect); an unrecognized question type scores zero instead of
//! failing, so a newer form never breaks an older scorer.

use std::collections::{BTreeMap, HashSet};

use crate::models::answer::{QuestionAnswer, SubAnswer};
use crate::models::question::{
    CategorizeQuestion, ClozeQuestion, ComprehensionQuestion, Question, SubQuestion,
};
use crate::models::score::{ItemScore, ScoreResult, SubScore};

/// Scores a whole answer sheet against a form's questions, one result per
/// question, in question order.
pub fn score_form(questions: &[Question], answers: &[Option<QuestionAnswer>]) -> Vec<ScoreResult> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| score_question(question, answers.get(i).and_then(|a| a.as_ref())))
        .collect()
}

pub fn score_question(question: &Question, answer: Option<&QuestionAnswer>) -> ScoreResult {
    match question {
        Question::Categorize(q) => score_categorize(q, answer),
        Question::Cloze(q) => score_cloze(q, answer),
        Question::Comprehension(q) => score_comprehension(q, answer),
        Question::Unknown(_) => ScoreResult::Unknown { score: 0.0 },
    }
}

/// Average of the per-question scores; an empty form scores 0.
pub fn overall_score(results: &[ScoreResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(ScoreResult::score).sum::<f64>() / results.len() as f64
}

fn score_categorize(q: &CategorizeQuestion, answer: Option<&QuestionAnswer>) -> ScoreResult {
    let placements = match answer {
        Some(QuestionAnswer::Categorize { placements }) => Some(placements),
        _ => None,
    };

    let mut detail = BTreeMap::new();
    let mut matches = 0usize;
    for item in &q.items {
        let user_category = placements.and_then(|p| p.get(&item.name)).cloned();
        let is_correct = user_category.as_deref() == Some(item.category.as_str());
        if is_correct {
            matches += 1;
        }
        detail.insert(
            item.name.clone(),
            ItemScore {
                correct_category: item.category.clone(),
                user_category,
                is_correct,
            },
        );
    }

    let score = if q.items.is_empty() {
        0.0
    } else {
        100.0 * matches as f64 / q.items.len() as f64
    };
    ScoreResult::Categorize { score, detail }
}

fn score_cloze(q: &ClozeQuestion, answer: Option<&QuestionAnswer>) -> ScoreResult {
    let user_answer = match answer {
        Some(QuestionAnswer::Cloze { text }) => Some(text.clone()),
        _ => None,
    };
    let correct_answer = q.answer.clone().unwrap_or_default();

    // Whole-string comparison, exact: no trimming, no case folding.
    let is_correct = user_answer.as_deref() == Some(correct_answer.as_str());
    ScoreResult::Cloze {
        score: if is_correct { 100.0 } else { 0.0 },
        is_correct,
        user_answer,
        correct_answer,
    }
}

fn score_comprehension(q: &ComprehensionQuestion, answer: Option<&QuestionAnswer>) -> ScoreResult {
    let answers = match answer {
        Some(QuestionAnswer::Comprehension { answers }) => Some(answers),
        _ => None,
    };

    let mut detail = BTreeMap::new();
    let mut correct = 0usize;
    let total = q.sub_questions.len();

    for sub in &q.sub_questions {
        let user_answer = answers.and_then(|a| a.get(sub.id())).cloned();
        let (is_correct, correct_answer) = match sub {
            SubQuestion::ShortText(s) => (
                matches!(&user_answer, Some(SubAnswer::One(text)) if *text == s.answer),
                Some(SubAnswer::One(s.answer.clone())),
            ),
            SubQuestion::Mcq(s) => (
                match (&user_answer, &s.correct_answer) {
                    (Some(SubAnswer::One(chosen)), Some(stored)) => chosen == stored,
                    _ => false,
                },
                s.correct_answer.clone().map(SubAnswer::One),
            ),
            SubQuestion::Mca(s) => {
                let stored: HashSet<&str> = s.correct_answers.iter().map(String::as_str).collect();
                let is_correct = match &user_answer {
                    Some(SubAnswer::Many(chosen)) => {
                        let chosen: HashSet<&str> = chosen.iter().map(String::as_str).collect();
                        chosen == stored
                    }
                    _ => false,
                };
                (is_correct, Some(SubAnswer::Many(s.correct_answers.clone())))
            }
        };

        if is_correct {
            correct += 1;
        }
        detail.insert(
            sub.id().to_string(),
            SubScore {
                is_correct,
                user_answer,
                correct_answer,
            },
        );
    }

    let score = if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    };
    ScoreResult::Comprehension { score, detail }
}
