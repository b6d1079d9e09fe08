//! Narration orchestration: spoken sentences with word-level text reveal.
//!
//! Sentences play strictly one after another through a [`SpeechSynth`]; each
//! word-boundary signal reveals one more word of the active sentence. Any
//! cancellation reveals everything at once, so text is never left frozen
//! mid-word.

use log::debug;

use crate::speech::{SpeechEvent, SpeechSynth, UtteranceId, VoiceParams};

/// One playable narration unit.
#[derive(Clone, Debug)]
pub struct Sentence {
    pub text: String,
    pub total_words: usize,
    pub revealed_words: usize,
}

impl Sentence {
    fn new(text: String) -> Self {
        let total_words = text.split_whitespace().count();
        Sentence {
            text,
            total_words,
            revealed_words: 0,
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed_words >= self.total_words
    }

    /// First `revealed_words` words of the sentence text.
    pub fn revealed_text(&self) -> String {
        if self.is_fully_revealed() {
            return self.text.clone();
        }
        self.text
            .split_whitespace()
            .take(self.revealed_words)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split body text into sentences, keeping terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Sequences sentence playback and owns the per-sentence reveal counters.
pub struct Narrator {
    sentences: Vec<Sentence>,
    /// Index of the sentence currently being spoken.
    active: Option<usize>,
    /// Liveness guard: events whose utterance id differs are stale and
    /// must not touch reveal state.
    current_utterance: Option<UtteranceId>,
    speaking: bool,
    voice: VoiceParams,
}

impl Narrator {
    pub fn new(voice: VoiceParams) -> Self {
        Narrator {
            sentences: Vec::new(),
            active: None,
            current_utterance: None,
            speaking: false,
            voice,
        }
    }

    /// Begin narrating `texts` in order.
    ///
    /// With `enabled` false, or with no usable engine, this reveals all text
    /// immediately and plays nothing; navigation is never blocked on speech.
    pub fn start(&mut self, texts: Vec<String>, enabled: bool, speech: &mut dyn SpeechSynth) {
        self.cancel(speech);
        self.sentences = texts.into_iter().map(Sentence::new).collect();

        if !enabled || !speech.available() || self.sentences.is_empty() {
            for sentence in &mut self.sentences {
                sentence.revealed_words = sentence.total_words;
            }
            return;
        }

        self.active = Some(0);
        self.current_utterance = Some(speech.speak(&self.sentences[0].text, self.voice));
        debug!("narration started: {} sentences", self.sentences.len());
    }

    /// Halt playback and reveal every sentence in full.
    pub fn cancel(&mut self, speech: &mut dyn SpeechSynth) {
        speech.cancel_all();
        for sentence in &mut self.sentences {
            sentence.revealed_words = sentence.total_words;
        }
        self.active = None;
        self.current_utterance = None;
        self.speaking = false;
    }

    /// Apply one polled speech event. Stale events are dropped.
    pub fn handle_event(&mut self, event: SpeechEvent, speech: &mut dyn SpeechSynth) {
        let live = match event {
            SpeechEvent::Started { utterance }
            | SpeechEvent::WordBoundary { utterance, .. }
            | SpeechEvent::Ended { utterance } => Some(utterance) == self.current_utterance,
        };
        if !live {
            debug!("dropping stale speech event {:?}", event);
            return;
        }
        let Some(index) = self.active else {
            return;
        };

        match event {
            SpeechEvent::Started { .. } => {
                self.speaking = true;
            }
            SpeechEvent::WordBoundary { word_index, .. } => {
                let sentence = &mut self.sentences[index];
                let next = (word_index + 1).min(sentence.total_words);
                // Reveal counters never move backward.
                sentence.revealed_words = sentence.revealed_words.max(next);
            }
            SpeechEvent::Ended { .. } => {
                self.sentences[index].revealed_words = self.sentences[index].total_words;
                let next_index = index + 1;
                if next_index < self.sentences.len() {
                    self.active = Some(next_index);
                    self.current_utterance =
                        Some(speech.speak(&self.sentences[next_index].text, self.voice));
                } else {
                    // Final unit finished; no automatic replay.
                    self.active = None;
                    self.current_utterance = None;
                    self.speaking = false;
                }
            }
        }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Index of the sentence currently being spoken, if any.
    pub fn active_sentence(&self) -> Option<usize> {
        self.active
    }

    /// True while an utterance is audibly playing.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// True while any unit is still pending or playing.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Avatar mouth openness in [0, 1]; wobbles continuously while speaking.
    pub fn mouth_openness(&self, now: f64) -> f64 {
        if !self.speaking {
            return 0.0;
        }
        let wobble = (now * 9.0).sin() * 0.5 + (now * 23.0).sin() * 0.3;
        (0.55 + wobble * 0.45).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Deterministic engine: records what was spoken, emits only what the
    /// test queues up.
    struct ScriptedSpeech {
        available: bool,
        spoken: Vec<String>,
        queued: VecDeque<SpeechEvent>,
        cancels: usize,
        next_id: UtteranceId,
    }

    impl ScriptedSpeech {
        fn new(available: bool) -> Self {
            ScriptedSpeech {
                available,
                spoken: Vec::new(),
                queued: VecDeque::new(),
                cancels: 0,
                next_id: 0,
            }
        }

        fn last_id(&self) -> UtteranceId {
            self.next_id
        }

        fn queue(&mut self, event: SpeechEvent) {
            self.queued.push_back(event);
        }
    }

    impl SpeechSynth for ScriptedSpeech {
        fn available(&self) -> bool {
            self.available
        }

        fn speak(&mut self, text: &str, _params: VoiceParams) -> UtteranceId {
            self.next_id += 1;
            self.spoken.push(text.to_string());
            self.next_id
        }

        fn cancel_all(&mut self) {
            self.cancels += 1;
        }

        fn poll(&mut self, _now: f64) -> Vec<SpeechEvent> {
            self.queued.drain(..).collect()
        }
    }

    fn two_sentence_narrator() -> (Narrator, ScriptedSpeech) {
        let mut narrator = Narrator::new(VoiceParams::default());
        let mut speech = ScriptedSpeech::new(true);
        narrator.start(
            vec!["one two three.".to_string(), "four five.".to_string()],
            true,
            &mut speech,
        );
        (narrator, speech)
    }

    #[test]
    fn test_split_sentences() {
        let parts = split_sentences("First one. Second! Third? trailing bit");
        assert_eq!(
            parts,
            vec!["First one.", "Second!", "Third?", "trailing bit"]
        );
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_disabled_start_reveals_everything() {
        let mut narrator = Narrator::new(VoiceParams::default());
        let mut speech = ScriptedSpeech::new(true);
        narrator.start(vec!["alpha beta.".to_string()], false, &mut speech);
        assert!(narrator.sentences()[0].is_fully_revealed());
        assert!(!narrator.is_active());
        assert!(speech.spoken.is_empty());
    }

    #[test]
    fn test_unavailable_engine_reveals_everything() {
        let mut narrator = Narrator::new(VoiceParams::default());
        let mut speech = ScriptedSpeech::new(false);
        narrator.start(vec!["alpha beta.".to_string()], true, &mut speech);
        assert!(narrator.sentences()[0].is_fully_revealed());
        assert!(!narrator.is_active());
        assert!(speech.spoken.is_empty());
    }

    #[test]
    fn test_word_boundaries_reveal_monotonically() {
        let (mut narrator, mut speech) = two_sentence_narrator();
        let id = speech.last_id();

        narrator.handle_event(SpeechEvent::Started { utterance: id }, &mut speech);
        assert!(narrator.is_speaking());

        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: id, word_index: 0 },
            &mut speech,
        );
        assert_eq!(narrator.sentences()[0].revealed_words, 1);
        assert_eq!(narrator.sentences()[0].revealed_text(), "one");

        // A repeated or out-of-order boundary never rewinds the counter.
        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: id, word_index: 2 },
            &mut speech,
        );
        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: id, word_index: 0 },
            &mut speech,
        );
        assert_eq!(narrator.sentences()[0].revealed_words, 3);
    }

    #[test]
    fn test_sentences_play_strictly_sequentially() {
        let (mut narrator, mut speech) = two_sentence_narrator();
        // Only the first sentence has been handed to the engine.
        assert_eq!(speech.spoken, vec!["one two three.".to_string()]);
        let first = speech.last_id();

        narrator.handle_event(SpeechEvent::Ended { utterance: first }, &mut speech);
        assert_eq!(speech.spoken.len(), 2);
        assert_eq!(speech.spoken[1], "four five.");
        assert!(narrator.sentences()[0].is_fully_revealed());
        assert_eq!(narrator.active_sentence(), Some(1));

        let second = speech.last_id();
        narrator.handle_event(SpeechEvent::Ended { utterance: second }, &mut speech);
        assert!(!narrator.is_active());
        assert!(!narrator.is_speaking());
        // No replay: nothing further was spoken.
        assert_eq!(speech.spoken.len(), 2);
    }

    #[test]
    fn test_cancel_reveals_all_and_blocks_stale_events() {
        let (mut narrator, mut speech) = two_sentence_narrator();
        let id = speech.last_id();
        narrator.handle_event(SpeechEvent::Started { utterance: id }, &mut speech);
        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: id, word_index: 0 },
            &mut speech,
        );

        narrator.cancel(&mut speech);
        assert!(speech.cancels >= 1);
        assert!(!narrator.is_speaking());
        for sentence in narrator.sentences() {
            assert!(sentence.is_fully_revealed());
        }

        // A boundary from the cancelled utterance must change nothing.
        let before: Vec<usize> = narrator.sentences().iter().map(|s| s.revealed_words).collect();
        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: id, word_index: 1 },
            &mut speech,
        );
        let after: Vec<usize> = narrator.sentences().iter().map(|s| s.revealed_words).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_restart_drops_previous_session() {
        let (mut narrator, mut speech) = two_sentence_narrator();
        let stale = speech.last_id();

        narrator.start(vec!["fresh words here.".to_string()], true, &mut speech);
        assert_eq!(speech.spoken.last().unwrap(), "fresh words here.");

        // Events from the superseded session are ignored.
        narrator.handle_event(
            SpeechEvent::WordBoundary { utterance: stale, word_index: 0 },
            &mut speech,
        );
        assert_eq!(narrator.sentences()[0].revealed_words, 0);
    }

    #[test]
    fn test_mouth_openness_only_while_speaking() {
        let (mut narrator, mut speech) = two_sentence_narrator();
        assert_eq!(narrator.mouth_openness(1.0), 0.0);
        let id = speech.last_id();
        narrator.handle_event(SpeechEvent::Started { utterance: id }, &mut speech);
        let a = narrator.mouth_openness(1.0);
        let b = narrator.mouth_openness(1.3);
        assert!(a >= 0.0 && a <= 1.0);
        // Varies over time.
        assert!((a - b).abs() > 1e-6);
    }
}
