//! Question editor validation.
//!
//! Two layers, both pure:
//!
//! * [`validate_questions`] runs before a whole form is saved. It is
//!   fail-fast: the first violation is returned as a single user-facing
//!   message and the save is blocked.
//! * The gesture-level checks ([`mark_blank`], [`add_category`], ...) run at
//!   the moment the editor applies one change to one question, and the
//!   per-question save checks ([`validate_question_save`]) run when a single
//!   question's editor panel is saved.
//!
//! Comparison policy is deliberately uneven and mirrors the product behavior:
//! option labels at form save compare trimmed but case-SENSITIVE, while the
//! per-question option editor and category names compare case-INSENSITIVE.
//! Both are covered by tests; do not unify without product sign-off.

use thiserror::Error;

use crate::models::question::{
    BlankSpan, CategorizeItem, CategorizeQuestion, ChoiceOption, ClozeQuestion,
    ComprehensionQuestion, Question, QuestionEdit, SubQuestion,
};

const MAX_SENTENCE_CHARS: usize = 500;
const MAX_BLANKS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question text required")]
    MissingQuestionText,
    #[error("at least 2 categories required for \"{0}\"")]
    TooFewCategories(String),
    #[error("at least 1 item required for \"{0}\"")]
    TooFewItems(String),
    #[error("sentence text cannot be empty for \"{0}\"")]
    EmptySentence(String),
    #[error("sentence text is too long (max {MAX_SENTENCE_CHARS} chars) for \"{0}\"")]
    SentenceTooLong(String),
    #[error("at least one blank required for \"{0}\"")]
    NoBlanks(String),
    #[error("too many blanks (max {MAX_BLANKS}) for \"{0}\"")]
    TooManyBlanks(String),
    #[error("blanks cannot overlap in \"{0}\"")]
    OverlappingBlanks(String),
    #[error("blank {ordinal} is empty in \"{text}\"")]
    EmptyBlank { text: String, ordinal: usize },
    #[error("blank {ordinal} is out of bounds in \"{text}\"")]
    BlankOutOfBounds { text: String, ordinal: usize },
    #[error("blank {ordinal} covers only whitespace in \"{text}\"")]
    WhitespaceBlank { text: String, ordinal: usize },
    #[error("comprehension must contain at least one sub-question for \"{0}\"")]
    NoSubQuestions(String),
    #[error("comprehension passage cannot be empty for \"{0}\"")]
    EmptyPassage(String),
    #[error("answer cannot be empty for short-text question \"{0}\"")]
    EmptyShortTextAnswer(String),
    #[error("option label cannot be empty for {kind} question \"{text}\"")]
    EmptyOptionLabel { kind: &'static str, text: String },
    #[error("duplicate option label for {kind} question \"{text}\"")]
    DuplicateOptionLabel { kind: &'static str, text: String },
    #[error("exactly 4 options required for {kind} question \"{text}\"")]
    WrongOptionCount { kind: &'static str, text: String },
    #[error("select a correct option for mcq question \"{0}\"")]
    NoCorrectAnswer(String),
    #[error("select at least one correct option for mca question \"{0}\"")]
    NoCorrectAnswers(String),

    // Gesture-level rejections.
    #[error("category name cannot be empty")]
    EmptyCategoryName,
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
    #[error("at least 2 categories required")]
    CategoryFloor,
    #[error("no such category \"{0}\"")]
    UnknownCategory(String),
    #[error("item name cannot be empty")]
    EmptyItemName,
    #[error("item \"{0}\" already exists")]
    DuplicateItem(String),
    #[error("at least 1 item required")]
    ItemFloor,
    #[error("no such item")]
    UnknownItem,
    #[error("select a valid word to mark as blank")]
    BlankNotAWord,
    #[error("cannot mark a blank inside an existing blank")]
    BlankInsideExisting,
    #[error("word is already marked as a blank")]
    DuplicateBlank,
    #[error("overlapping blanks are not allowed")]
    OverlappingBlank,
    #[error("no such blank")]
    UnknownBlank,
    #[error("this edit does not apply to a {0} question")]
    EditNotApplicable(&'static str),
}

impl ValidationError {
    /// Short stable label for metrics, independent of the message wording.
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationError::MissingQuestionText => "question_text",
            ValidationError::TooFewCategories(_) => "categories_floor",
            ValidationError::TooFewItems(_) => "items_floor",
            ValidationError::EmptySentence(_) => "sentence_empty",
            ValidationError::SentenceTooLong(_) => "sentence_too_long",
            ValidationError::NoBlanks(_) => "blanks_floor",
            ValidationError::TooManyBlanks(_) => "blanks_ceiling",
            ValidationError::OverlappingBlanks(_) => "blanks_overlap",
            ValidationError::EmptyBlank { .. } => "blank_empty",
            ValidationError::BlankOutOfBounds { .. } => "blank_bounds",
            ValidationError::WhitespaceBlank { .. } => "blank_whitespace",
            ValidationError::NoSubQuestions(_) => "sub_questions_floor",
            ValidationError::EmptyPassage(_) => "passage_empty",
            ValidationError::EmptyShortTextAnswer(_) => "short_text_answer",
            ValidationError::EmptyOptionLabel { .. } => "option_empty",
            ValidationError::DuplicateOptionLabel { .. } => "option_duplicate",
            ValidationError::WrongOptionCount { .. } => "option_count",
            ValidationError::NoCorrectAnswer(_) => "mcq_correct_answer",
            ValidationError::NoCorrectAnswers(_) => "mca_correct_answers",
            ValidationError::EmptyCategoryName => "category_name_empty",
            ValidationError::DuplicateCategory(_) => "category_duplicate",
            ValidationError::CategoryFloor => "category_floor",
            ValidationError::UnknownCategory(_) => "category_unknown",
            ValidationError::EmptyItemName => "item_name_empty",
            ValidationError::DuplicateItem(_) => "item_duplicate",
            ValidationError::ItemFloor => "item_floor",
            ValidationError::UnknownItem => "item_unknown",
            ValidationError::BlankNotAWord => "blank_not_word",
            ValidationError::BlankInsideExisting => "blank_inside",
            ValidationError::DuplicateBlank => "blank_duplicate",
            ValidationError::OverlappingBlank => "blank_overlap",
            ValidationError::UnknownBlank => "blank_unknown",
            ValidationError::EditNotApplicable(_) => "edit_mismatch",
        }
    }
}

/// Pre-flight check for a whole form, in question order, first violation only.
pub fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    for question in questions {
        if question.text().trim().is_empty() {
            return Err(ValidationError::MissingQuestionText);
        }

        match question {
            Question::Categorize(q) => validate_categorize(q)?,
            Question::Cloze(q) => validate_cloze(q)?,
            Question::Comprehension(q) => validate_comprehension(q)?,
            // A type this build does not know about cannot be edited here, so
            // there is nothing structural to check beyond the text above.
            Question::Unknown(_) => {}
        }
    }
    Ok(())
}

fn validate_categorize(q: &CategorizeQuestion) -> Result<(), ValidationError> {
    if q.categories.len() < 2 {
        return Err(ValidationError::TooFewCategories(q.text.clone()));
    }
    if q.items.is_empty() {
        return Err(ValidationError::TooFewItems(q.text.clone()));
    }
    Ok(())
}

fn validate_cloze(q: &ClozeQuestion) -> Result<(), ValidationError> {
    if q.sentence.trim().is_empty() {
        return Err(ValidationError::EmptySentence(q.text.clone()));
    }
    if q.underlined_words.is_empty() {
        return Err(ValidationError::NoBlanks(q.text.clone()));
    }
    Ok(())
}

fn validate_comprehension(q: &ComprehensionQuestion) -> Result<(), ValidationError> {
    if q.sub_questions.is_empty() {
        return Err(ValidationError::NoSubQuestions(q.text.clone()));
    }

    for sub in &q.sub_questions {
        match sub {
            SubQuestion::ShortText(s) => {
                if s.answer.trim().is_empty() {
                    return Err(ValidationError::EmptyShortTextAnswer(s.text.clone()));
                }
            }
            SubQuestion::Mcq(s) => {
                check_option_labels("mcq", &s.text, &s.options, CasePolicy::Sensitive)?;
                if s.correct_answer.is_none() {
                    return Err(ValidationError::NoCorrectAnswer(s.text.clone()));
                }
            }
            SubQuestion::Mca(s) => {
                check_option_labels("mca", &s.text, &s.options, CasePolicy::Sensitive)?;
                if s.correct_answers.is_empty() {
                    return Err(ValidationError::NoCorrectAnswers(s.text.clone()));
                }
            }
        }
    }

    // The passage check runs after the sub-question checks, matching the
    // order the editor surfaces these messages in.
    if q.comprehension.trim().is_empty() {
        return Err(ValidationError::EmptyPassage(q.text.clone()));
    }
    Ok(())
}

/// Option-label comparison policy. Form save trims but keeps case; the
/// per-question option editor lowercases as well.
#[derive(Clone, Copy)]
enum CasePolicy {
    Sensitive,
    Insensitive,
}

fn check_option_labels(
    kind: &'static str,
    text: &str,
    options: &[ChoiceOption],
    policy: CasePolicy,
) -> Result<(), ValidationError> {
    let mut seen = Vec::with_capacity(options.len());
    for option in options {
        let trimmed = option.label.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyOptionLabel {
                kind,
                text: text.to_string(),
            });
        }
        let key = match policy {
            CasePolicy::Sensitive => trimmed.to_string(),
            CasePolicy::Insensitive => trimmed.to_lowercase(),
        };
        if seen.contains(&key) {
            return Err(ValidationError::DuplicateOptionLabel {
                kind,
                text: text.to_string(),
            });
        }
        seen.push(key);
    }
    if seen.len() != 4 {
        return Err(ValidationError::WrongOptionCount {
            kind,
            text: text.to_string(),
        });
    }
    Ok(())
}

/// Per-question save check, run when one question's editor panel is saved
/// (stricter than the form-level pass for cloze and choice options).
pub fn validate_question_save(question: &Question) -> Result<(), ValidationError> {
    if question.text().trim().is_empty() {
        return Err(ValidationError::MissingQuestionText);
    }
    match question {
        Question::Categorize(q) => validate_categorize(q),
        Question::Cloze(q) => match cloze_save_issues(q).into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        },
        Question::Comprehension(q) => {
            if q.sub_questions.is_empty() {
                return Err(ValidationError::NoSubQuestions(q.text.clone()));
            }
            for sub in &q.sub_questions {
                match sub {
                    SubQuestion::ShortText(s) => {
                        if s.answer.trim().is_empty() {
                            return Err(ValidationError::EmptyShortTextAnswer(s.text.clone()));
                        }
                    }
                    SubQuestion::Mcq(s) => {
                        check_option_labels("mcq", &s.text, &s.options, CasePolicy::Insensitive)?;
                        if s.correct_answer.is_none() {
                            return Err(ValidationError::NoCorrectAnswer(s.text.clone()));
                        }
                    }
                    SubQuestion::Mca(s) => {
                        check_option_labels("mca", &s.text, &s.options, CasePolicy::Insensitive)?;
                        if s.correct_answers.is_empty() {
                            return Err(ValidationError::NoCorrectAnswers(s.text.clone()));
                        }
                    }
                }
            }
            if q.comprehension.trim().is_empty() {
                return Err(ValidationError::EmptyPassage(q.text.clone()));
            }
            Ok(())
        }
        Question::Unknown(_) => Ok(()),
    }
}

/// Every problem with a cloze question's current state, in display order.
/// Unlike the form-level pass this aggregates, because the cloze editor shows
/// the full list next to the save button.
pub fn cloze_save_issues(q: &ClozeQuestion) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    if q.sentence.trim().is_empty() {
        issues.push(ValidationError::EmptySentence(q.text.clone()));
    }
    if q.sentence.chars().count() > MAX_SENTENCE_CHARS {
        issues.push(ValidationError::SentenceTooLong(q.text.clone()));
    }
    if q.underlined_words.is_empty() {
        issues.push(ValidationError::NoBlanks(q.text.clone()));
    }
    if q.underlined_words.len() > MAX_BLANKS {
        issues.push(ValidationError::TooManyBlanks(q.text.clone()));
    }

    let mut sorted = q.underlined_words.clone();
    sorted.sort_by_key(|span| span.index);
    if sorted
        .windows(2)
        .any(|pair| pair[0].end() > pair[1].index)
    {
        issues.push(ValidationError::OverlappingBlanks(q.text.clone()));
    }

    for (i, span) in q.underlined_words.iter().enumerate() {
        let ordinal = i + 1;
        if span.length == 0 {
            issues.push(ValidationError::EmptyBlank {
                text: q.text.clone(),
                ordinal,
            });
            continue;
        }
        match q.blank_word(span) {
            None => issues.push(ValidationError::BlankOutOfBounds {
                text: q.text.clone(),
                ordinal,
            }),
            Some(word) if word.trim().is_empty() => {
                issues.push(ValidationError::WhitespaceBlank {
                    text: q.text.clone(),
                    ordinal,
                })
            }
            Some(_) => {}
        }
    }

    issues
}

/// Marks `span` as a new blank, rejecting marks inside, duplicating or
/// overlapping an existing blank.
pub fn mark_blank(q: &mut ClozeQuestion, span: BlankSpan) -> Result<(), ValidationError> {
    let word = q.blank_word(&span).ok_or(ValidationError::BlankNotAWord)?;
    if word.trim().is_empty() {
        return Err(ValidationError::BlankNotAWord);
    }

    // Exact duplicates first, so they report as such rather than as a mark
    // inside an existing blank.
    if q.underlined_words.contains(&span) {
        return Err(ValidationError::DuplicateBlank);
    }
    if q.underlined_words
        .iter()
        .any(|w| span.index >= w.index && span.index < w.end())
    {
        return Err(ValidationError::BlankInsideExisting);
    }
    if q.underlined_words.iter().any(|w| w.overlaps(&span)) {
        return Err(ValidationError::OverlappingBlank);
    }

    q.underlined_words.push(span);
    Ok(())
}

pub fn remove_blank(q: &mut ClozeQuestion, blank: usize) -> Result<(), ValidationError> {
    if blank >= q.underlined_words.len() {
        return Err(ValidationError::UnknownBlank);
    }
    q.underlined_words.remove(blank);
    Ok(())
}

pub fn clear_blanks(q: &mut ClozeQuestion) {
    q.underlined_words.clear();
}

/// Adds a category; names are unique case-insensitively.
pub fn add_category(q: &mut CategorizeQuestion, name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    if q.categories
        .iter()
        .any(|c| c.to_lowercase() == trimmed.to_lowercase())
    {
        return Err(ValidationError::DuplicateCategory(trimmed.to_string()));
    }
    q.categories.push(trimmed.to_string());
    Ok(())
}

/// Removes a category and every item filed under it. The editor keeps at
/// least 2 categories alive at all times.
pub fn remove_category(q: &mut CategorizeQuestion, name: &str) -> Result<(), ValidationError> {
    if !q.categories.iter().any(|c| c == name) {
        return Err(ValidationError::UnknownCategory(name.to_string()));
    }
    // A stored question may already be below the floor; never go lower.
    if q.categories.len() <= 2 {
        return Err(ValidationError::CategoryFloor);
    }
    q.categories.retain(|c| c != name);
    q.items.retain(|item| item.category != name);
    Ok(())
}

/// Adds an item filed under an existing category; item names are unique
/// case-insensitively.
pub fn add_item(
    q: &mut CategorizeQuestion,
    name: &str,
    category: &str,
) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyItemName);
    }
    if !q.categories.iter().any(|c| c == category) {
        return Err(ValidationError::UnknownCategory(category.to_string()));
    }
    if q.items
        .iter()
        .any(|item| item.name.to_lowercase() == trimmed.to_lowercase())
    {
        return Err(ValidationError::DuplicateItem(trimmed.to_string()));
    }
    q.items.push(CategorizeItem {
        name: trimmed.to_string(),
        category: category.to_string(),
    });
    Ok(())
}

/// Removes an item by position. The editor keeps at least 1 item alive.
pub fn remove_item(q: &mut CategorizeQuestion, item: usize) -> Result<(), ValidationError> {
    if item >= q.items.len() {
        return Err(ValidationError::UnknownItem);
    }
    if q.items.len() == 1 {
        return Err(ValidationError::ItemFloor);
    }
    q.items.remove(item);
    Ok(())
}

/// Applies one editor gesture to a question, enforcing the gesture-level
/// invariants. A gesture aimed at the wrong question type is rejected, not
/// silently ignored.
pub fn apply_edit(question: &mut Question, edit: QuestionEdit) -> Result<(), ValidationError> {
    match (question, edit) {
        (Question::Cloze(q), QuestionEdit::MarkBlank { index, length }) => {
            mark_blank(q, BlankSpan { index, length })
        }
        (Question::Cloze(q), QuestionEdit::RemoveBlank { blank }) => remove_blank(q, blank),
        (Question::Cloze(q), QuestionEdit::ClearBlanks) => {
            clear_blanks(q);
            Ok(())
        }
        (Question::Categorize(q), QuestionEdit::AddCategory { name }) => add_category(q, &name),
        (Question::Categorize(q), QuestionEdit::RemoveCategory { name }) => {
            remove_category(q, &name)
        }
        (Question::Categorize(q), QuestionEdit::AddItem { name, category }) => {
            add_item(q, &name, &category)
        }
        (Question::Categorize(q), QuestionEdit::RemoveItem { item }) => remove_item(q, item),
        (question, _) => Err(ValidationError::EditNotApplicable(question.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{
        McaSubQuestion, McqSubQuestion, ShortTextSubQuestion, SubQuestion,
    };

    fn option(id: &str, label: &str) -> ChoiceOption {
        ChoiceOption {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    fn four_options() -> Vec<ChoiceOption> {
        vec![
            option("o1", "Mercury"),
            option("o2", "Venus"),
            option("o3", "Earth"),
            option("o4", "Mars"),
        ]
    }

    fn categorize(categories: &[&str], items: &[(&str, &str)]) -> CategorizeQuestion {
        CategorizeQuestion {
            id: "q1".to_string(),
            text: "Sort the animals".to_string(),
            picture: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            items: items
                .iter()
                .map(|(name, category)| CategorizeItem {
                    name: name.to_string(),
                    category: category.to_string(),
                })
                .collect(),
        }
    }

    fn cloze(sentence: &str, spans: &[(usize, usize)]) -> ClozeQuestion {
        ClozeQuestion {
            id: "q2".to_string(),
            text: "Fill the blanks".to_string(),
            picture: None,
            sentence: sentence.to_string(),
            underlined_words: spans
                .iter()
                .map(|&(index, length)| BlankSpan { index, length })
                .collect(),
            answer: None,
        }
    }

    #[test]
    fn empty_text_fails_first() {
        let mut q = categorize(&["A"], &[]);
        q.text = "   ".to_string();
        let err = validate_questions(&[Question::Categorize(q)]).unwrap_err();
        assert_eq!(err, ValidationError::MissingQuestionText);
    }

    #[test]
    fn one_category_fails_with_category_floor() {
        let q = categorize(&["Mammals"], &[("Dog", "Mammals")]);
        let err = validate_questions(&[Question::Categorize(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::TooFewCategories(_)));
    }

    #[test]
    fn two_categories_zero_items_fails_with_item_floor() {
        let q = categorize(&["Mammals", "Birds"], &[]);
        let err = validate_questions(&[Question::Categorize(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::TooFewItems(_)));
    }

    #[test]
    fn cloze_needs_sentence_and_blank() {
        let q = cloze("   ", &[]);
        let err = validate_questions(&[Question::Cloze(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptySentence(_)));

        let q = cloze("The sky is blue", &[]);
        let err = validate_questions(&[Question::Cloze(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::NoBlanks(_)));

        let q = cloze("The sky is blue", &[(4, 3)]);
        assert!(validate_questions(&[Question::Cloze(q)]).is_ok());
    }

    fn comprehension(subs: Vec<SubQuestion>) -> ComprehensionQuestion {
        ComprehensionQuestion {
            id: "q3".to_string(),
            text: "Read and answer".to_string(),
            picture: None,
            comprehension: "A passage about the sea.".to_string(),
            sub_questions: subs,
        }
    }

    #[test]
    fn comprehension_needs_sub_questions() {
        let q = comprehension(vec![]);
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::NoSubQuestions(_)));
    }

    #[test]
    fn passage_is_checked_after_sub_questions() {
        let mut q = comprehension(vec![SubQuestion::ShortText(ShortTextSubQuestion {
            id: "s1".to_string(),
            text: "Name the ocean".to_string(),
            answer: "".to_string(),
        })]);
        q.comprehension = "".to_string();

        // Both the passage and the sub-question are broken; the sub-question
        // message wins because it is checked first.
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyShortTextAnswer(_)));
    }

    #[test]
    fn mcq_duplicate_after_trim_fails_case_sensitively() {
        let mut options = four_options();
        options[3].label = " Mercury ".to_string();
        let q = comprehension(vec![SubQuestion::Mcq(McqSubQuestion {
            id: "s1".to_string(),
            text: "Closest planet?".to_string(),
            options,
            correct_answer: Some("o1".to_string()),
        })]);
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateOptionLabel { .. }));
    }

    #[test]
    fn form_save_option_compare_keeps_case() {
        // "mercury" vs "Mercury" are distinct at form save...
        let mut options = four_options();
        options[3].label = "mercury".to_string();
        let sub = McqSubQuestion {
            id: "s1".to_string(),
            text: "Closest planet?".to_string(),
            options,
            correct_answer: Some("o1".to_string()),
        };
        let q = comprehension(vec![SubQuestion::Mcq(sub.clone())]);
        assert!(validate_questions(&[Question::Comprehension(q)]).is_ok());

        // ...but the per-question editor save lowercases and rejects them.
        let q = comprehension(vec![SubQuestion::Mcq(sub)]);
        let err = validate_question_save(&Question::Comprehension(q)).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateOptionLabel { .. }));
    }

    #[test]
    fn option_count_must_be_exactly_four() {
        let q = comprehension(vec![SubQuestion::Mca(McaSubQuestion {
            id: "s1".to_string(),
            text: "Pick the gas giants".to_string(),
            options: four_options()[..3].to_vec(),
            correct_answers: vec!["o1".to_string()],
        })]);
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::WrongOptionCount { .. }));
    }

    #[test]
    fn mcq_and_mca_need_correct_answers() {
        let q = comprehension(vec![SubQuestion::Mcq(McqSubQuestion {
            id: "s1".to_string(),
            text: "Closest planet?".to_string(),
            options: four_options(),
            correct_answer: None,
        })]);
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::NoCorrectAnswer(_)));

        let q = comprehension(vec![SubQuestion::Mca(McaSubQuestion {
            id: "s2".to_string(),
            text: "Pick the gas giants".to_string(),
            options: four_options(),
            correct_answers: vec![],
        })]);
        let err = validate_questions(&[Question::Comprehension(q)]).unwrap_err();
        assert!(matches!(err, ValidationError::NoCorrectAnswers(_)));
    }

    #[test]
    fn cloze_save_issues_aggregate() {
        let mut q = cloze("The sky is blue", &[(4, 3), (5, 4)]);
        q.underlined_words.push(BlankSpan {
            index: 100,
            length: 3,
        });
        let issues = cloze_save_issues(&q);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::OverlappingBlanks(_))));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::BlankOutOfBounds { ordinal: 3, .. })));
    }

    #[test]
    fn cloze_save_limits_sentence_and_blank_count() {
        let long = "a".repeat(501);
        let q = cloze(&long, &[(0, 1)]);
        let issues = cloze_save_issues(&q);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::SentenceTooLong(_))));

        // Eleven non-overlapping blanks, one per word.
        let sentence = "ab ".repeat(11);
        let spans: Vec<(usize, usize)> = (0..11).map(|i| (i * 3, 2)).collect();
        let q = cloze(sentence.trim_end(), &spans);
        let issues = cloze_save_issues(&q);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::TooManyBlanks(_))));

        // Ten blanks on the same sentence pass.
        let spans: Vec<(usize, usize)> = (0..10).map(|i| (i * 3, 2)).collect();
        let q = cloze(sentence.trim_end(), &spans);
        assert!(cloze_save_issues(&q)
            .iter()
            .all(|i| !matches!(i, ValidationError::TooManyBlanks(_))));
    }

    #[test]
    fn zero_length_blank_reports_empty() {
        let q = cloze("The sky is blue", &[(4, 0)]);
        let issues = cloze_save_issues(&q);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::EmptyBlank { ordinal: 1, .. })));
    }

    #[test]
    fn whitespace_only_blank_is_flagged() {
        // Span (3, 1) covers the space between "The" and "sky".
        let q = cloze("The sky is blue", &[(3, 1)]);
        let issues = cloze_save_issues(&q);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationError::WhitespaceBlank { ordinal: 1, .. })));
    }

    #[test]
    fn question_save_surfaces_first_cloze_issue() {
        let long = "a".repeat(501);
        let q = cloze(&long, &[]);
        let err = validate_question_save(&Question::Cloze(q)).unwrap_err();
        assert!(matches!(err, ValidationError::SentenceTooLong(_)));
    }

    #[test]
    fn mark_blank_rejects_overlap_and_duplicate() {
        let mut q = cloze("The sky is blue", &[(4, 3)]);

        // Byte-identical span is a duplicate, not a mark inside a blank.
        let err = mark_blank(&mut q, BlankSpan { index: 4, length: 3 }).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateBlank);

        let err = mark_blank(&mut q, BlankSpan { index: 5, length: 2 }).unwrap_err();
        assert_eq!(err, ValidationError::BlankInsideExisting);

        let err = mark_blank(&mut q, BlankSpan { index: 2, length: 4 }).unwrap_err();
        assert_eq!(err, ValidationError::OverlappingBlank);

        assert!(mark_blank(&mut q, BlankSpan { index: 11, length: 4 }).is_ok());
        assert_eq!(q.underlined_words.len(), 2);
    }

    #[test]
    fn mark_blank_rejects_whitespace() {
        let mut q = cloze("The sky is blue", &[]);
        let err = mark_blank(&mut q, BlankSpan { index: 3, length: 1 }).unwrap_err();
        assert_eq!(err, ValidationError::BlankNotAWord);
    }

    #[test]
    fn category_gestures_keep_invariants() {
        let mut q = categorize(&["Mammals", "Birds"], &[("Dog", "Mammals")]);

        let err = add_category(&mut q, " mammals ").unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateCategory(_)));

        let err = remove_category(&mut q, "Birds").unwrap_err();
        assert_eq!(err, ValidationError::CategoryFloor);

        add_category(&mut q, "Fish").unwrap();
        add_item(&mut q, "Salmon", "Fish").unwrap();

        // Deleting a category also drops its items.
        remove_category(&mut q, "Fish").unwrap();
        assert_eq!(q.items.len(), 1);
        assert_eq!(q.items[0].name, "Dog");

        let err = remove_item(&mut q, 0).unwrap_err();
        assert_eq!(err, ValidationError::ItemFloor);
    }

    #[test]
    fn remove_category_never_goes_below_two() {
        // A malformed stored question with a single category cannot be
        // emptied further.
        let mut q = categorize(&["Mammals"], &[("Dog", "Mammals")]);
        let err = remove_category(&mut q, "Mammals").unwrap_err();
        assert_eq!(err, ValidationError::CategoryFloor);
        assert_eq!(q.categories.len(), 1);
    }

    #[test]
    fn add_item_requires_known_category() {
        let mut q = categorize(&["Mammals", "Birds"], &[("Dog", "Mammals")]);
        let err = add_item(&mut q, "Salmon", "Fish").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory(_)));

        let err = add_item(&mut q, "dog", "Birds").unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateItem(_)));
    }

    #[test]
    fn unknown_question_only_needs_text() {
        let q = Question::Unknown(serde_json::json!({
            "id": "q9",
            "type": "ranking",
            "text": "Order these"
        }));
        assert!(validate_questions(&[q]).is_ok());

        let q = Question::Unknown(serde_json::json!({ "id": "q9", "type": "ranking" }));
        let err = validate_questions(&[q]).unwrap_err();
        assert_eq!(err, ValidationError::MissingQuestionText);
    }
}
