//! Speech playback capability interface.
//!
//! The narrator never talks to a platform TTS directly; it drives this small
//! trait and consumes polled lifecycle events, so tests can substitute a
//! deterministic engine and the app degrades cleanly when no engine exists.

use log::trace;

pub type UtteranceId = u64;

/// Lifecycle signals emitted by a speech engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    Started { utterance: UtteranceId },
    /// Onset of word `word_index` within the utterance text.
    WordBoundary { utterance: UtteranceId, word_index: usize },
    Ended { utterance: UtteranceId },
}

/// Playback parameters for one utterance.
#[derive(Clone, Copy, Debug)]
pub struct VoiceParams {
    /// Speaking rate multiplier, 1.0 = normal.
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
}

impl Default for VoiceParams {
    fn default() -> Self {
        VoiceParams {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Minimal capability surface of a speech engine.
///
/// Events are delivered by polling from the frame loop, keeping everything on
/// one logical thread; their timing is the engine's, not the frame
/// scheduler's.
pub trait SpeechSynth {
    /// False when the platform has no engine or no voices. Callers must
    /// treat unavailability as "text fully visible, nothing spoken".
    fn available(&self) -> bool;

    /// Begin speaking `text`. Any previously active utterance is replaced.
    fn speak(&mut self, text: &str, params: VoiceParams) -> UtteranceId;

    /// Stop all playback immediately. No further events are emitted for
    /// cancelled utterances, not even `Ended`.
    fn cancel_all(&mut self);

    /// Drain lifecycle events that have come due by `now`.
    fn poll(&mut self, now: f64) -> Vec<SpeechEvent>;
}

/// Absent-engine stand-in: never available, never emits.
#[derive(Debug, Default)]
pub struct NullSpeech {
    next_id: UtteranceId,
}

impl NullSpeech {
    pub fn new() -> Self {
        NullSpeech::default()
    }
}

impl SpeechSynth for NullSpeech {
    fn available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str, _params: VoiceParams) -> UtteranceId {
        self.next_id += 1;
        self.next_id
    }

    fn cancel_all(&mut self) {}

    fn poll(&mut self, _now: f64) -> Vec<SpeechEvent> {
        Vec::new()
    }
}

/// Base seconds per spoken word before length adjustment.
const WORD_BASE_SECONDS: f64 = 0.14;
/// Additional seconds per character of the word.
const WORD_PER_CHAR_SECONDS: f64 = 0.035;
/// Longest any single word may take.
const WORD_MAX_SECONDS: f64 = 0.60;

fn word_duration(word: &str, rate: f64) -> f64 {
    let chars = word.chars().count() as f64;
    ((WORD_BASE_SECONDS + WORD_PER_CHAR_SECONDS * chars) / rate.max(0.25)).min(WORD_MAX_SECONDS)
}

struct PacedUtterance {
    id: UtteranceId,
    /// Per-word durations, consumed front to back.
    durations: Vec<f64>,
    next_word: usize,
    /// Time the next event comes due; None until `Started` is emitted.
    next_at: Option<f64>,
    started: bool,
}

/// Clock-paced engine: emits word boundaries at a cadence derived from word
/// length. Stands in for a platform voice so narration works everywhere.
#[derive(Default)]
pub struct PacedSpeech {
    active: Option<PacedUtterance>,
    next_id: UtteranceId,
}

impl PacedSpeech {
    pub fn new() -> Self {
        PacedSpeech::default()
    }
}

impl SpeechSynth for PacedSpeech {
    fn available(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str, params: VoiceParams) -> UtteranceId {
        self.next_id += 1;
        let durations: Vec<f64> = text
            .split_whitespace()
            .map(|word| word_duration(word, params.rate))
            .collect();
        trace!("paced speech: utterance {} with {} words", self.next_id, durations.len());
        self.active = Some(PacedUtterance {
            id: self.next_id,
            durations,
            next_word: 0,
            next_at: None,
            started: false,
        });
        self.next_id
    }

    fn cancel_all(&mut self) {
        self.active = None;
    }

    fn poll(&mut self, now: f64) -> Vec<SpeechEvent> {
        let mut events = Vec::new();
        let Some(utterance) = &mut self.active else {
            return events;
        };

        if !utterance.started {
            utterance.started = true;
            utterance.next_at = Some(now);
            events.push(SpeechEvent::Started {
                utterance: utterance.id,
            });
        }

        let mut finished = false;
        while let Some(due) = utterance.next_at {
            if now < due {
                break;
            }
            if utterance.next_word < utterance.durations.len() {
                events.push(SpeechEvent::WordBoundary {
                    utterance: utterance.id,
                    word_index: utterance.next_word,
                });
                utterance.next_at = Some(due + utterance.durations[utterance.next_word]);
                utterance.next_word += 1;
            } else {
                events.push(SpeechEvent::Ended {
                    utterance: utterance.id,
                });
                finished = true;
                break;
            }
        }
        if finished {
            self.active = None;
        }
        events
    }
}
