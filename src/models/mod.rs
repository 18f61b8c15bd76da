pub mod answer;
pub mod form;
pub mod question;
pub mod score;

pub use answer::{QuestionAnswer, SubAnswer, SubmitResponseRequest};
pub use form::{CreateFormRequest, FormDetail, FormDocument, FormSummary, UpdateFormRequest};
pub use question::{
    BlankSpan, CategorizeItem, CategorizeQuestion, ChoiceOption, ClozeQuestion,
    ComprehensionQuestion, McaSubQuestion, McqSubQuestion, Question, QuestionEdit,
    ShortTextSubQuestion, SubQuestion,
};
pub use score::{ItemScore, ResponseRecord, ScoreReport, ScoreResult, SubScore};
