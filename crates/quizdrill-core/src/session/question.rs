use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The five answer slots of a question, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
    E,
}

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [OptionKey; 5] = [
        OptionKey::A,
        OptionKey::B,
        OptionKey::C,
        OptionKey::D,
        OptionKey::E,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
            OptionKey::E => "E",
        }
    }

    /// Parse a single letter, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(OptionKey::A),
            "B" | "b" => Some(OptionKey::B),
            "C" | "c" => Some(OptionKey::C),
            "D" | "d" => Some(OptionKey::D),
            "E" | "e" => Some(OptionKey::E),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One of the five answer choices of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: OptionKey,
    pub text: String,
}

/// A multiple-choice question. Immutable once constructed; the session
/// engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    /// Exactly five entries, keys A..E in display order.
    pub options: Vec<AnswerOption>,
    pub correct: OptionKey,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Text of the option behind `key`, if present.
    pub fn option_text(&self, key: OptionKey) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.text.as_str())
    }
}

/// A validated, ordered, non-empty list of questions.
///
/// Construction is the validation boundary: an empty list or a question
/// whose options are not exactly A..E never produces a `QuestionSet`, so
/// the session engine can assume every set it is handed is playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate and wrap a question list.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the list is empty, a question does not
    /// carry exactly five options, or the option keys are not A..E in
    /// display order.
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyQuestionList);
        }
        for q in &questions {
            if q.options.len() != OptionKey::ALL.len() {
                return Err(ValidationError::WrongOptionCount {
                    id: q.id,
                    expected: OptionKey::ALL.len(),
                    found: q.options.len(),
                });
            }
            let keys_ok = q
                .options
                .iter()
                .zip(OptionKey::ALL)
                .all(|(opt, expected)| opt.key == expected);
            if !keys_ok {
                return Err(ValidationError::BadOptionKeys { id: q.id });
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON pack (an array of questions) and validate it.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for malformed input and a validation error for
    /// well-formed input that breaks the pack invariants.
    pub fn from_json(json: &str) -> Result<Self, crate::error::CoreError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(Self::new(questions)?)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        // Always false by construction; kept for the len/is_empty pair.
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Reorder the questions for replay variety.
    pub fn shuffled<R: Rng>(mut self, rng: &mut R) -> Self {
        self.questions.shuffle(rng);
        self
    }

    /// The built-in fallback pack, used when no external question source
    /// is available or a pack file fails to load.
    pub fn builtin_pack() -> Self {
        let questions = vec![
            builtin(
                1,
                "astronomy",
                Difficulty::Easy,
                "Which planet is known as the Red Planet?",
                ["Venus", "Mars", "Jupiter", "Mercury", "Saturn"],
                OptionKey::B,
                "Iron oxide dust gives Mars its reddish appearance.",
            ),
            builtin(
                2,
                "astronomy",
                Difficulty::Easy,
                "What is the closest star to Earth?",
                ["Proxima Centauri", "Sirius", "The Sun", "Vega", "Polaris"],
                OptionKey::C,
                "The Sun is a star, roughly 150 million km away.",
            ),
            builtin(
                3,
                "physics",
                Difficulty::Medium,
                "What does the speed of light in vacuum round to?",
                [
                    "300,000 km/s",
                    "150,000 km/s",
                    "1,000,000 km/s",
                    "30,000 km/s",
                    "3,000 km/s",
                ],
                OptionKey::A,
                "c is 299,792 km/s, conventionally rounded to 300,000 km/s.",
            ),
            builtin(
                4,
                "astronomy",
                Difficulty::Medium,
                "Which planet has the most moons confirmed to date?",
                ["Earth", "Mars", "Neptune", "Saturn", "Venus"],
                OptionKey::D,
                "Saturn overtook Jupiter with well over a hundred confirmed moons.",
            ),
            builtin(
                5,
                "physics",
                Difficulty::Hard,
                "What phenomenon bends starlight around massive objects?",
                [
                    "Redshift",
                    "Gravitational lensing",
                    "Parallax",
                    "Doppler beaming",
                    "Refraction",
                ],
                OptionKey::B,
                "Mass curves spacetime; light follows the curve.",
            ),
            builtin(
                6,
                "astronomy",
                Difficulty::Medium,
                "What is a light-year a unit of?",
                ["Time", "Brightness", "Distance", "Mass", "Energy"],
                OptionKey::C,
                "It is the distance light travels in one Julian year.",
            ),
            builtin(
                7,
                "space history",
                Difficulty::Easy,
                "Who was the first human in space?",
                [
                    "Neil Armstrong",
                    "Buzz Aldrin",
                    "John Glenn",
                    "Valentina Tereshkova",
                    "Yuri Gagarin",
                ],
                OptionKey::E,
                "Gagarin orbited Earth aboard Vostok 1 in April 1961.",
            ),
            builtin(
                8,
                "space history",
                Difficulty::Hard,
                "Which probe was the first to leave the heliosphere?",
                [
                    "Pioneer 10",
                    "Voyager 2",
                    "Voyager 1",
                    "New Horizons",
                    "Cassini",
                ],
                OptionKey::C,
                "Voyager 1 crossed into interstellar space in 2012.",
            ),
        ];
        Self { questions }
    }
}

fn builtin(
    id: u32,
    category: &str,
    difficulty: Difficulty,
    prompt: &str,
    options: [&str; 5],
    correct: OptionKey,
    explanation: &str,
) -> Question {
    Question {
        id,
        category: category.into(),
        difficulty,
        prompt: prompt.into(),
        options: OptionKey::ALL
            .iter()
            .zip(options)
            .map(|(&key, text)| AnswerOption {
                key,
                text: text.into(),
            })
            .collect(),
        correct,
        explanation: explanation.into(),
    }
}

impl TryFrom<Vec<Question>> for QuestionSet {
    type Error = ValidationError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionSet> for Vec<Question> {
    fn from(set: QuestionSet) -> Self {
        set.questions
    }
}
