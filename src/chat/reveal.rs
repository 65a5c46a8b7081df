//! Progressive reveal of bot replies, one character per tick.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::markup;
use super::transcript::Transcript;
use crate::models::MessageId;

/// Upper bound of the random delay added to every tick
const JITTER_MS: f64 = 10.0;

#[derive(Debug)]
struct RevealTask {
    message: MessageId,
    chars: Vec<char>,
    pos: usize,
    base_delay: Duration,
    next_at: Instant,
}

/// Drives at most one reveal at a time
pub struct Revealer {
    active: Option<RevealTask>,
    rng: StdRng,
}

impl Default for Revealer {
    fn default() -> Self {
        Self::new()
    }
}

impl Revealer {
    pub fn new() -> Self {
        Self { active: None, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { active: None, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Message currently being revealed
    pub fn target(&self) -> Option<MessageId> {
        self.active.as_ref().map(|task| task.message)
    }

    /// Reveal `text` into `message`. The first character appears immediately.
    /// A reveal already in progress is finished first.
    pub fn start(
        &mut self,
        transcript: &mut Transcript,
        message: MessageId,
        text: &str,
        base_delay: Duration,
        now: Instant,
    ) {
        self.finish(transcript);
        self.active =
            Some(RevealTask { message, chars: text.chars().collect(), pos: 0, base_delay, next_at: now });
        self.tick(transcript, now);
    }

    /// Emit every character that is due at `now`. Returns true if anything changed.
    pub fn tick(&mut self, transcript: &mut Transcript, now: Instant) -> bool {
        let mut changed = false;
        while let Some(task) = self.active.as_mut() {
            if task.pos >= task.chars.len() {
                self.active = None;
                break;
            }
            if now < task.next_at {
                break;
            }

            let mut fragment = String::new();
            markup::escape_char(task.chars[task.pos], &mut fragment);
            if !transcript.append_markup(task.message, &fragment) {
                // Target vanished (transcript cleared)
                self.active = None;
                break;
            }
            task.pos += 1;
            changed = true;

            let jitter = self.rng.gen_range(0.0..JITTER_MS);
            task.next_at += task.base_delay + Duration::from_secs_f64(jitter / 1000.0);
        }
        changed
    }

    /// Flush the remaining characters of the running reveal at once
    pub fn finish(&mut self, transcript: &mut Transcript) {
        if let Some(task) = self.active.take() {
            let remaining: String = task.chars[task.pos..].iter().collect();
            if !remaining.is_empty() {
                transcript.append_markup(task.message, &markup::escape(&remaining));
            }
        }
    }

    /// Stop without emitting the rest
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;

    const DELAY: Duration = Duration::from_millis(14);

    fn content(transcript: &Transcript, id: MessageId) -> String {
        transcript.get(id).unwrap().content.clone()
    }

    /// Drive a reveal to completion tick by tick, collecting each emitted fragment
    fn reveal_fragments(text: &str) -> (Vec<String>, Transcript, MessageId) {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(7);
        let mut now = Instant::now();
        let mut fragments = Vec::new();
        let mut seen = 0;

        revealer.start(&mut transcript, id, text, DELAY, now);
        loop {
            let current = content(&transcript, id);
            if current.len() > seen {
                fragments.push(current[seen..].to_string());
                seen = current.len();
            }
            if !revealer.is_active() {
                break;
            }
            // Never faster than the minimum delay, so at most one character per tick
            now += DELAY;
            revealer.tick(&mut transcript, now);
        }
        (fragments, transcript, id)
    }

    #[test]
    fn test_first_character_is_immediate() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(1);

        revealer.start(&mut transcript, id, "Hi", DELAY, Instant::now());

        assert_eq!(content(&transcript, id), "H");
        assert!(revealer.is_active());
    }

    #[test]
    fn test_one_character_per_tick_when_ticks_are_spaced() {
        let (fragments, transcript, id) = reveal_fragments("Hello world");

        assert_eq!(fragments.len(), "Hello world".len());
        assert_eq!(content(&transcript, id), "Hello world");
    }

    #[test]
    fn test_reveal_preserves_content_modulo_escaping() {
        let text = "Line 1\n<tag> & more\n\ttabs 🚀";
        let (fragments, transcript, id) = reveal_fragments(text);

        assert_eq!(fragments.concat(), markup::escape(text));
        assert_eq!(markup::decode(&content(&transcript, id)), text);
        assert!(fragments.contains(&"<br>".to_string()));
        assert!(fragments.contains(&"&lt;".to_string()));
        assert!(fragments.contains(&"&gt;".to_string()));
    }

    #[test]
    fn test_nothing_due_before_delay() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(3);
        let now = Instant::now();

        revealer.start(&mut transcript, id, "abc", DELAY, now);
        assert!(!revealer.tick(&mut transcript, now + Duration::from_millis(5)));
        assert_eq!(content(&transcript, id), "a");
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(3);
        let now = Instant::now();

        revealer.start(&mut transcript, id, "abcdef", DELAY, now);
        revealer.tick(&mut transcript, now + Duration::from_secs(1));

        assert_eq!(content(&transcript, id), "abcdef");
        assert!(!revealer.is_active());
    }

    #[test]
    fn test_new_reveal_flushes_previous() {
        let mut transcript = Transcript::new();
        let first = transcript.add_message(Sender::Bot, "");
        let second = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(5);
        let now = Instant::now();

        revealer.start(&mut transcript, first, "first reply", DELAY, now);
        revealer.start(&mut transcript, second, "second", DELAY, now);

        assert_eq!(content(&transcript, first), "first reply");
        assert_eq!(content(&transcript, second), "s");
        assert_eq!(revealer.target(), Some(second));
    }

    #[test]
    fn test_cleared_transcript_stops_reveal() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(9);
        let now = Instant::now();

        revealer.start(&mut transcript, id, "gone soon", DELAY, now);
        transcript.clear();
        revealer.tick(&mut transcript, now + Duration::from_secs(1));

        assert!(!revealer.is_active());
    }

    #[test]
    fn test_cancel_stops_without_flush() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(9);

        revealer.start(&mut transcript, id, "abc", DELAY, Instant::now());
        revealer.cancel();
        revealer.finish(&mut transcript);

        assert_eq!(content(&transcript, id), "a");
    }

    #[test]
    fn test_empty_text_finishes_immediately() {
        let mut transcript = Transcript::new();
        let id = transcript.add_message(Sender::Bot, "");
        let mut revealer = Revealer::with_seed(2);

        revealer.start(&mut transcript, id, "", DELAY, Instant::now());

        assert!(!revealer.is_active());
        assert_eq!(content(&transcript, id), "");
    }
}
