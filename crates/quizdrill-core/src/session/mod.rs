mod engine;
mod question;

pub use engine::{
    FinishedSummary, SessionEngine, SessionPhase, DEFAULT_SECONDS_PER_QUESTION,
};
pub use question::{AnswerOption, Difficulty, OptionKey, Question, QuestionSet};
