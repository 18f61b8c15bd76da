use serde::{Deserialize, Serialize};

/// A form question. The `type` tag on the wire selects the variant; payloads
/// carrying a tag we do not know yet fall through to `Unknown` and are kept
/// verbatim so old clients keep working against newer stored forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    Categorize(CategorizeQuestion),
    Cloze(ClozeQuestion),
    Comprehension(ComprehensionQuestion),
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::Categorize(q) => &q.id,
            Question::Cloze(q) => &q.id,
            Question::Comprehension(q) => &q.id,
            Question::Unknown(value) => value.get("id").and_then(|v| v.as_str()).unwrap_or(""),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Question::Categorize(q) => &q.text,
            Question::Cloze(q) => &q.text,
            Question::Comprehension(q) => &q.text,
            Question::Unknown(value) => value.get("text").and_then(|v| v.as_str()).unwrap_or(""),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Question::Categorize(_) => "categorize",
            Question::Cloze(_) => "cloze",
            Question::Comprehension(_) => "comprehension",
            Question::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub items: Vec<CategorizeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeItem {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClozeQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub sentence: String,
    #[serde(rename = "underlinedWords", default)]
    pub underlined_words: Vec<BlankSpan>,
    /// Canonical full answer the scorer compares against (whole-string match).
    #[serde(default)]
    pub answer: Option<String>,
}

impl ClozeQuestion {
    /// The word a blank covers, or None when the span does not fall on
    /// character boundaries inside the sentence.
    pub fn blank_word(&self, span: &BlankSpan) -> Option<&str> {
        self.sentence.get(span.index..span.index + span.length)
    }
}

/// Byte span into a cloze sentence marking one blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankSpan {
    pub index: usize,
    pub length: usize,
}

impl BlankSpan {
    pub fn end(&self) -> usize {
        self.index + self.length
    }

    pub fn overlaps(&self, other: &BlankSpan) -> bool {
        self.index < other.end() && other.index < self.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensionQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub picture: Option<String>,
    /// The passage respondents read before answering.
    #[serde(default)]
    pub comprehension: String,
    #[serde(rename = "questions", default)]
    pub sub_questions: Vec<SubQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubQuestion {
    Mcq(McqSubQuestion),
    Mca(McaSubQuestion),
    ShortText(ShortTextSubQuestion),
}

impl SubQuestion {
    pub fn id(&self) -> &str {
        match self {
            SubQuestion::Mcq(q) => &q.id,
            SubQuestion::Mca(q) => &q.id,
            SubQuestion::ShortText(q) => &q.id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SubQuestion::Mcq(q) => &q.text,
            SubQuestion::Mca(q) => &q.text,
            SubQuestion::ShortText(q) => &q.text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqSubQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// Option id of the single correct choice.
    #[serde(rename = "correctAnswer", default)]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McaSubQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// Option ids of every correct choice, order-insensitive.
    #[serde(rename = "correctAnswers", default)]
    pub correct_answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTextSubQuestion {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
}

/// A single editing gesture against one question, mirroring what the form
/// editor UI sends while a question is being built.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuestionEdit {
    MarkBlank { index: usize, length: usize },
    RemoveBlank { blank: usize },
    ClearBlanks,
    AddCategory { name: String },
    RemoveCategory { name: String },
    AddItem { name: String, category: String },
    RemoveItem { item: usize },
}
