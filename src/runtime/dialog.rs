//! Timed decision dialog controller.
//!
//! Loop: render the block, read one key (1 s timeout while running, blocking
//! while paused), interpret it, then either redraw in place or finalize with
//! exactly one [`Outcome`].

use tracing::{debug, warn};

use crate::core::choices::{ChoiceSpec, ReservedAction, DEFAULT_CHOICES};
use crate::core::key::Key;
use crate::core::outcome::Outcome;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::{read_decision_key, DialogTerminal, KeyRead};
use crate::render::block::{format_keymap, format_status, Block, BlockRenderer};
use crate::render::theme::DialogTheme;

pub const DEFAULT_SECONDS: u64 = 5;
pub const DEFAULT_COUNTDOWN_LABEL: &str = "Continuing in";

/// Mutable state of one dialog run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogState {
    remaining_seconds: u64,
    paused: bool,
}

impl DialogState {
    pub fn new(seconds: u64) -> Self {
        Self {
            remaining_seconds: seconds,
            paused: false,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// One read timeout elapsed. Ignored while paused; reaching zero times out.
    pub fn tick(&mut self) -> Option<Outcome> {
        if self.paused {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        (self.remaining_seconds == 0).then_some(Outcome::TimedOut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDecision {
    TogglePause,
    Finish(Outcome),
    Ignore,
}

/// Interpret one key against the decoded choices.
///
/// Precedence: pause toggle, reserved keys (only when their action or any-key
/// is enabled, otherwise swallowed), custom keys in order, any-key.
pub fn interpret_key(spec: &ChoiceSpec, key: &Key) -> KeyDecision {
    if key.is_pause_toggle() && spec.enables(ReservedAction::Pause) {
        return KeyDecision::TogglePause;
    }

    if let Some(action) = key.reserved_action() {
        if !spec.allows(action) {
            return KeyDecision::Ignore;
        }
        let outcome = match action {
            ReservedAction::Redo => Outcome::Redo,
            ReservedAction::Cancel => Outcome::Cancel,
            ReservedAction::Quit => Outcome::Quit,
            _ => Outcome::Continue,
        };
        return KeyDecision::Finish(outcome);
    }

    if let Some(index) = key.as_char().and_then(|ch| spec.custom_index(ch)) {
        return KeyDecision::Finish(Outcome::Custom(index));
    }

    if spec.enables(ReservedAction::AnyKey) {
        return KeyDecision::Finish(Outcome::Continue);
    }

    KeyDecision::Ignore
}

/// A configured dialog. Cheap to run repeatedly; each run owns fresh state.
#[derive(Debug)]
pub struct TimedDialog {
    seconds: u64,
    message: Option<String>,
    spec: ChoiceSpec,
    theme: DialogTheme,
    countdown_label: String,
}

impl Default for TimedDialog {
    fn default() -> Self {
        Self::new(DEFAULT_CHOICES)
    }
}

impl TimedDialog {
    pub fn new(choices: &str) -> Self {
        Self {
            seconds: DEFAULT_SECONDS,
            message: None,
            spec: ChoiceSpec::decode(choices),
            theme: DialogTheme::default(),
            countdown_label: DEFAULT_COUNTDOWN_LABEL.to_string(),
        }
    }

    pub fn with_seconds(mut self, seconds: u64) -> Self {
        self.seconds = seconds;
        self
    }

    /// An empty message means no message row.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.is_empty()).then_some(message);
        self
    }

    pub fn with_theme(mut self, theme: DialogTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_countdown_label(mut self, label: impl Into<String>) -> Self {
        self.countdown_label = label.into();
        self
    }

    pub fn spec(&self) -> &ChoiceSpec {
        &self.spec
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn run<T: DialogTerminal + ?Sized>(&self, term: &mut T) -> Outcome {
        if !term.is_interactive() {
            debug!("no interactive terminal; continuing without a dialog");
            return Outcome::Continue;
        }

        let renderer = BlockRenderer::new(self.message.is_some(), !self.spec.keymap_hidden());
        let message = self
            .message
            .as_deref()
            .map(|text| (self.theme.message)(text))
            .unwrap_or_default();
        let keymap = format_keymap(&self.spec.keymap_entries(), &self.theme);
        let mut state = DialogState::new(self.seconds);
        let mut gate = OutputGate::new();
        gate.push(TerminalCmd::HideCursor);

        debug!(
            seconds = self.seconds,
            lines = renderer.line_count(),
            custom_keys = self.spec.custom_keys().len(),
            "dialog started"
        );

        loop {
            let status = format_status(
                &self.countdown_label,
                state.remaining_seconds(),
                state.paused(),
                &self.theme,
            );
            let block = Block {
                message: &message,
                keymap: &keymap,
                status: &status,
            };
            gate.extend(renderer.render(&block, usize::from(term.columns())));
            gate.flush(term);

            let decision = match read_decision_key(term, state.paused()) {
                Ok(KeyRead::TimedOut) => match state.tick() {
                    Some(outcome) => KeyDecision::Finish(outcome),
                    None => KeyDecision::Ignore,
                },
                Ok(KeyRead::Key(key)) => {
                    let decision = interpret_key(&self.spec, &key);
                    debug!(?key, ?decision, "key read");
                    decision
                }
                Err(err) => {
                    warn!(error = %err, "terminal read failed; continuing");
                    KeyDecision::Finish(Outcome::Continue)
                }
            };

            match decision {
                KeyDecision::Finish(outcome) => {
                    gate.extend(renderer.finish(outcome == Outcome::Redo));
                    gate.push(TerminalCmd::ShowCursor);
                    gate.flush(term);
                    debug!(%outcome, remaining = state.remaining_seconds(), "dialog finished");
                    return outcome;
                }
                KeyDecision::TogglePause => state.toggle_pause(),
                KeyDecision::Ignore => {}
            }
            gate.extend(renderer.rewind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{interpret_key, DialogState, KeyDecision};
    use crate::core::choices::ChoiceSpec;
    use crate::core::key::Key;
    use crate::core::outcome::Outcome;

    fn decide(choices: &str, key: Key) -> KeyDecision {
        interpret_key(&ChoiceSpec::decode(choices), &key)
    }

    #[test]
    fn tick_counts_down_to_timeout() {
        let mut state = DialogState::new(2);
        assert_eq!(state.tick(), None);
        assert_eq!(state.remaining_seconds(), 1);
        assert_eq!(state.tick(), Some(Outcome::TimedOut));
    }

    #[test]
    fn zero_seconds_times_out_on_first_tick() {
        let mut state = DialogState::new(0);
        assert_eq!(state.tick(), Some(Outcome::TimedOut));
        assert_eq!(state.remaining_seconds(), 0);
    }

    #[test]
    fn paused_ticks_do_not_decrement() {
        let mut state = DialogState::new(3);
        state.toggle_pause();
        assert_eq!(state.tick(), None);
        assert_eq!(state.remaining_seconds(), 3);
        state.toggle_pause();
        assert_eq!(state.tick(), None);
        assert_eq!(state.remaining_seconds(), 2);
    }

    #[test]
    fn pause_keys_toggle_only_when_enabled() {
        assert_eq!(decide("P", Key::Char(' ')), KeyDecision::TogglePause);
        assert_eq!(decide("P", Key::Char('p')), KeyDecision::TogglePause);
        assert_eq!(decide("E", Key::Char('p')), KeyDecision::Ignore);
        assert_eq!(decide("A", Key::Char(' ')), KeyDecision::Finish(Outcome::Continue));
    }

    #[test]
    fn reserved_keys_require_their_action_or_any() {
        assert_eq!(decide("R", Key::Char('r')), KeyDecision::Finish(Outcome::Redo));
        assert_eq!(decide("Q", Key::Char('Q')), KeyDecision::Finish(Outcome::Quit));
        assert_eq!(decide("C", Key::Escape), KeyDecision::Finish(Outcome::Cancel));
        assert_eq!(decide("E", Key::Enter), KeyDecision::Finish(Outcome::Continue));
        assert_eq!(decide("A", Key::Char('q')), KeyDecision::Finish(Outcome::Quit));
        assert_eq!(decide("E", Key::Char('q')), KeyDecision::Ignore);
        assert_eq!(decide("xq", Key::Enter), KeyDecision::Ignore);
    }

    #[test]
    fn cancel_letter_case_does_not_matter() {
        for choices in ["C", "c"] {
            for key in ['c', 'C'] {
                assert_eq!(
                    decide(choices, Key::Char(key)),
                    KeyDecision::Finish(Outcome::Cancel),
                    "choices={choices} key={key}"
                );
            }
        }
    }

    #[test]
    fn custom_keys_map_to_their_index() {
        assert_eq!(decide("xyz", Key::Char('y')), KeyDecision::Finish(Outcome::Custom(1)));
        assert_eq!(decide("xyz", Key::Char('Z')), KeyDecision::Finish(Outcome::Custom(2)));
        assert_eq!(decide("xyz", Key::Char('w')), KeyDecision::Ignore);
    }

    #[test]
    fn custom_keys_win_over_any_key() {
        assert_eq!(decide("Ax", Key::Char('x')), KeyDecision::Finish(Outcome::Custom(0)));
        assert_eq!(decide("Ax", Key::Char('w')), KeyDecision::Finish(Outcome::Continue));
    }

    #[test]
    fn escape_sequences_only_continue_under_any_key() {
        let arrow = Key::Sequence("\x1b[A".to_string());
        assert_eq!(decide("ERCPQ", arrow.clone()), KeyDecision::Ignore);
        assert_eq!(decide("A", arrow), KeyDecision::Finish(Outcome::Continue));
    }

    #[test]
    fn space_is_a_custom_key_without_pause() {
        assert_eq!(decide("x ", Key::Char(' ')), KeyDecision::Finish(Outcome::Custom(1)));
    }
}
