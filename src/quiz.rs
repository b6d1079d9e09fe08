//! Timed quiz and prediction stage.
//!
//! Linear state machines: each question runs a fixed countdown, a correct
//! answer scores ten points per second remaining, a wrong answer or timeout
//! scores zero and reveals the explanation before auto-advancing. The final
//! cumulative score is handed to the prediction stage.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Countdown per question, seconds.
pub const QUESTION_SECONDS: f64 = 20.0;
/// Points per second remaining on a correct answer.
pub const POINTS_PER_SECOND: u32 = 10;
/// How long the explanation stays up before auto-advancing.
pub const REVEAL_SECONDS: f64 = 4.0;

#[derive(Clone, Debug, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub answer: usize,
    pub explanation: String,
}

/// Where the quiz is within the current question.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuizPhase {
    /// Countdown running, answer not yet locked in.
    Asking,
    /// Answer locked or timed out; explanation showing.
    Revealed { awarded: u32, timed_out: bool },
    /// All questions done.
    Finished,
}

pub struct Quiz {
    questions: Vec<QuizQuestion>,
    current: usize,
    phase: QuizPhase,
    /// Countdown expiry for the asking phase.
    deadline: f64,
    /// Auto-advance time for the revealed phase.
    advance_at: f64,
    score: u32,
    /// Choice the player locked in, for highlighting.
    locked_choice: Option<usize>,
}

impl Quiz {
    pub fn start(questions: Vec<QuizQuestion>, now: f64) -> Self {
        assert!(!questions.is_empty(), "quiz needs at least one question");
        Quiz {
            questions,
            current: 0,
            phase: QuizPhase::Asking,
            deadline: now + QUESTION_SECONDS,
            advance_at: 0.0,
            score: 0,
            locked_choice: None,
        }
    }

    /// Whole seconds left on the countdown, as shown on screen.
    pub fn seconds_remaining(&self, now: f64) -> u32 {
        (self.deadline - now).max(0.0).ceil() as u32
    }

    /// Lock in an answer. Ignored outside the asking phase; a single answer
    /// per question.
    pub fn answer(&mut self, choice: usize, now: f64) {
        if self.phase != QuizPhase::Asking {
            return;
        }
        let question = &self.questions[self.current];
        if choice >= question.choices.len() {
            return;
        }
        self.locked_choice = Some(choice);
        let awarded = if choice == question.answer {
            POINTS_PER_SECOND * self.seconds_remaining(now)
        } else {
            0
        };
        self.score += awarded;
        self.phase = QuizPhase::Revealed {
            awarded,
            timed_out: false,
        };
        self.advance_at = now + REVEAL_SECONDS;
    }

    /// Per-frame drive: expire countdowns, auto-advance past explanations.
    pub fn tick(&mut self, now: f64) {
        match self.phase {
            QuizPhase::Asking => {
                if now >= self.deadline {
                    self.locked_choice = None;
                    self.phase = QuizPhase::Revealed {
                        awarded: 0,
                        timed_out: true,
                    };
                    self.advance_at = now + REVEAL_SECONDS;
                }
            }
            QuizPhase::Revealed { .. } => {
                if now >= self.advance_at {
                    self.advance(now);
                }
            }
            QuizPhase::Finished => {}
        }
    }

    fn advance(&mut self, now: f64) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.phase = QuizPhase::Asking;
            self.deadline = now + QUESTION_SECONDS;
            self.locked_choice = None;
        } else {
            self.phase = QuizPhase::Finished;
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn question_number(&self) -> (usize, usize) {
        (self.current + 1, self.questions.len())
    }

    pub fn locked_choice(&self) -> Option<usize> {
        self.locked_choice
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PredictionScenario {
    pub prompt: String,
    pub options: Vec<String>,
}

/// Prediction activity fed by the final quiz score. Choices are recorded
/// only for display; nothing here is scored or persisted.
pub struct PredictionStage {
    scenarios: Vec<PredictionScenario>,
    choices: Vec<Option<usize>>,
    current: usize,
    quiz_score: u32,
}

impl PredictionStage {
    pub fn new(scenarios: Vec<PredictionScenario>, quiz_score: u32) -> Self {
        let choices = vec![None; scenarios.len()];
        PredictionStage {
            scenarios,
            choices,
            current: 0,
            quiz_score,
        }
    }

    pub fn choose(&mut self, option: usize) {
        if self.current < self.scenarios.len() {
            let scenario = &self.scenarios[self.current];
            if option < scenario.options.len() {
                self.choices[self.current] = Some(option);
                self.current += 1;
            }
        }
    }

    pub fn current_scenario(&self) -> Option<&PredictionScenario> {
        self.scenarios.get(self.current)
    }

    pub fn choices(&self) -> &[Option<usize>] {
        &self.choices
    }

    pub fn scenarios(&self) -> &[PredictionScenario] {
        &self.scenarios
    }

    pub fn quiz_score(&self) -> u32 {
        self.quiz_score
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.scenarios.len()
    }
}

/// Load quiz questions from a JSON array.
pub fn questions_from_json_file(path: &Path) -> Result<Vec<QuizQuestion>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let questions: Vec<QuizQuestion> = serde_json::from_str(&raw)?;
    if questions.is_empty() {
        return Err(format!("quiz file {} has no questions", path.display()).into());
    }
    Ok(questions)
}

pub fn builtin_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            prompt: "Which year did a machine first defeat a reigning world \
                     chess champion in a match?"
                .to_string(),
            choices: vec![
                "1966".to_string(),
                "1984".to_string(),
                "1997".to_string(),
                "2006".to_string(),
            ],
            answer: 2,
            explanation: "Deep Blue beat Garry Kasparov 3.5 to 2.5 in their \
                          1997 rematch."
                .to_string(),
        },
        QuizQuestion {
            prompt: "ELIZA, the 1966 conversation program, imitated what?".to_string(),
            choices: vec![
                "A chess tutor".to_string(),
                "A psychotherapist".to_string(),
                "A travel agent".to_string(),
                "A news anchor".to_string(),
            ],
            answer: 1,
            explanation: "Weizenbaum's DOCTOR script parodied a Rogerian \
                          therapist, reflecting statements back as questions."
                .to_string(),
        },
        QuizQuestion {
            prompt: "Turing's 1950 paper proposed replacing \"Can machines \
                     think?\" with what?"
                .to_string(),
            choices: vec![
                "A logic puzzle".to_string(),
                "An arithmetic benchmark".to_string(),
                "A maze-solving trial".to_string(),
                "An imitation game".to_string(),
            ],
            answer: 3,
            explanation: "The imitation game asks whether an interrogator can \
                          tell machine from human by conversation alone."
                .to_string(),
        },
    ]
}

pub fn builtin_scenarios() -> Vec<PredictionScenario> {
    vec![
        PredictionScenario {
            prompt: "By 2050, where will the next milestone on this timeline \
                     take place?"
                .to_string(),
            options: vec![
                "A laboratory".to_string(),
                "A courtroom".to_string(),
                "Somewhere off Earth".to_string(),
            ],
        },
        PredictionScenario {
            prompt: "What will narrate timelines like this one in thirty \
                     years?"
                .to_string(),
            options: vec![
                "A human historian".to_string(),
                "A machine, indistinguishable".to_string(),
                "Both, arguing".to_string(),
            ],
        },
    ]
}
