//! Choice grammar decoding.
//!
//! A choices string is a compact list of allowed actions: each sentinel letter
//! (`A E R C P Q H`) enables a reserved action, every other character becomes a
//! caller-defined custom key whose outcome code is `10 + index`.

/// Choices used when the caller does not supply any.
pub const DEFAULT_CHOICES: &str = "AERCPQ";

/// Outcome code assigned to the first custom key.
pub const CUSTOM_CODE_BASE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedAction {
    AnyKey,
    Enter,
    Redo,
    Cancel,
    Pause,
    Quit,
    HideKeymap,
}

impl ReservedAction {
    pub const ALL: [ReservedAction; 7] = [
        ReservedAction::AnyKey,
        ReservedAction::Enter,
        ReservedAction::Redo,
        ReservedAction::Cancel,
        ReservedAction::Pause,
        ReservedAction::Quit,
        ReservedAction::HideKeymap,
    ];

    pub fn sentinel(self) -> char {
        match self {
            ReservedAction::AnyKey => 'A',
            ReservedAction::Enter => 'E',
            ReservedAction::Redo => 'R',
            ReservedAction::Cancel => 'C',
            ReservedAction::Pause => 'P',
            ReservedAction::Quit => 'Q',
            ReservedAction::HideKeymap => 'H',
        }
    }

    /// Lowercase sentinels enable the same action as their uppercase form.
    pub fn from_sentinel(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|action| action.sentinel() == upper)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of enabled reserved actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReservedSet(u8);

impl ReservedSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, action: ReservedAction) {
        self.0 |= action.bit();
    }

    pub fn contains(self, action: ReservedAction) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ReservedAction> {
        ReservedAction::ALL
            .into_iter()
            .filter(move |action| self.contains(*action))
    }
}

/// One `[keys] label` pair of the rendered legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapEntry {
    pub keys: String,
    pub label: String,
}

impl KeymapEntry {
    fn new(keys: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            keys: keys.into(),
            label: label.into(),
        }
    }
}

/// Decoded, immutable view of a choices string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSpec {
    reserved: ReservedSet,
    custom_keys: Vec<char>,
}

impl ChoiceSpec {
    pub fn decode(choices: &str) -> Self {
        let mut reserved = ReservedSet::empty();
        let mut custom_keys: Vec<char> = Vec::new();

        for ch in choices.chars() {
            if let Some(action) = ReservedAction::from_sentinel(ch) {
                reserved.insert(action);
                continue;
            }
            if custom_keys.iter().any(|existing| keys_match(*existing, ch)) {
                continue;
            }
            custom_keys.push(ch);
        }

        Self {
            reserved,
            custom_keys,
        }
    }

    pub fn reserved(&self) -> ReservedSet {
        self.reserved
    }

    pub fn enables(&self, action: ReservedAction) -> bool {
        self.reserved.contains(action)
    }

    /// Whether a key bound to `action` may finalize the dialog: the action itself
    /// or any-key must be enabled.
    pub fn allows(&self, action: ReservedAction) -> bool {
        self.enables(action) || self.enables(ReservedAction::AnyKey)
    }

    pub fn keymap_hidden(&self) -> bool {
        self.enables(ReservedAction::HideKeymap)
    }

    pub fn custom_keys(&self) -> &[char] {
        &self.custom_keys
    }

    /// Index of the first custom key matching `key`.
    pub fn custom_index(&self, key: char) -> Option<usize> {
        self.custom_keys
            .iter()
            .position(|candidate| keys_match(*candidate, key))
    }

    /// Outcome code of the custom key at `index`.
    pub fn custom_code(index: usize) -> i32 {
        CUSTOM_CODE_BASE.saturating_add(i32::try_from(index).unwrap_or(i32::MAX))
    }

    /// Legend entries in display order: continue, redo, cancel, pause, quit, then custom keys.
    pub fn keymap_entries(&self) -> Vec<KeymapEntry> {
        let any_key = self.enables(ReservedAction::AnyKey);
        let mut entries: Vec<KeymapEntry> = self
            .reserved
            .iter()
            .filter_map(|action| {
                let (keys, label) = match action {
                    ReservedAction::AnyKey => ("any key", "continue"),
                    ReservedAction::Enter if !any_key => ("Enter", "continue"),
                    ReservedAction::Redo => ("r", "redo"),
                    ReservedAction::Cancel => ("c/Esc", "cancel"),
                    ReservedAction::Pause => ("p/Space", "pause"),
                    ReservedAction::Quit => ("q", "quit"),
                    ReservedAction::Enter | ReservedAction::HideKeymap => return None,
                };
                Some(KeymapEntry::new(keys, label))
            })
            .collect();
        for (index, key) in self.custom_keys.iter().enumerate() {
            entries.push(KeymapEntry::new(
                display_key(*key),
                format!("option {}", Self::custom_code(index)),
            ));
        }
        entries
    }

    /// Plain-text legend, e.g. `[Enter] continue  [q] quit`.
    pub fn keymap_legend(&self) -> String {
        self.keymap_entries()
            .iter()
            .map(|entry| format!("[{}] {}", entry.keys, entry.label))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl Default for ChoiceSpec {
    fn default() -> Self {
        Self::decode(DEFAULT_CHOICES)
    }
}

/// Exact match, or case-insensitive when both sides are alphabetic.
pub fn keys_match(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    a.is_alphabetic() && b.is_alphabetic() && a.to_lowercase().eq(b.to_lowercase())
}

fn display_key(key: char) -> String {
    match key {
        ' ' => "Space".to_string(),
        '\t' => "Tab".to_string(),
        other if other.is_control() => format!("0x{:02x}", other as u32),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{keys_match, ChoiceSpec, ReservedAction, DEFAULT_CHOICES};

    #[test]
    fn default_choices_enable_every_action_but_hide() {
        let spec = ChoiceSpec::decode(DEFAULT_CHOICES);
        for action in [
            ReservedAction::AnyKey,
            ReservedAction::Enter,
            ReservedAction::Redo,
            ReservedAction::Cancel,
            ReservedAction::Pause,
            ReservedAction::Quit,
        ] {
            assert!(spec.enables(action), "{action:?} should be enabled");
        }
        assert!(!spec.keymap_hidden());
        assert!(spec.custom_keys().is_empty());
    }

    #[test]
    fn empty_choices_enable_nothing() {
        let spec = ChoiceSpec::decode("");
        assert!(spec.reserved().is_empty());
        assert!(spec.custom_keys().is_empty());
        assert_eq!(spec.keymap_legend(), "");
    }

    #[test]
    fn custom_keys_keep_first_occurrence_order() {
        let spec = ChoiceSpec::decode("zxZyx1");
        assert_eq!(spec.custom_keys(), &['z', 'x', 'y', '1']);
    }

    #[test]
    fn lowercase_sentinels_never_become_custom_keys() {
        let spec = ChoiceSpec::decode("cqxe");
        assert!(spec.enables(ReservedAction::Cancel));
        assert!(spec.enables(ReservedAction::Quit));
        assert!(spec.enables(ReservedAction::Enter));
        assert_eq!(spec.custom_keys(), &['x']);
    }

    #[test]
    fn custom_keys_never_contain_sentinels() {
        let spec = ChoiceSpec::decode("AaEeRrCcPpQqHh!?");
        for key in spec.custom_keys() {
            assert!(ReservedAction::from_sentinel(*key).is_none());
        }
        assert_eq!(spec.custom_keys(), &['!', '?']);
    }

    #[test]
    fn decode_is_idempotent() {
        for input in ["", "H", "AERCPQ", "xyz", "xXyY!!", "É é ß"] {
            assert_eq!(ChoiceSpec::decode(input), ChoiceSpec::decode(input));
        }
    }

    #[test]
    fn custom_codes_are_dense_from_ten() {
        let spec = ChoiceSpec::decode("Cxyz1x");
        let codes: Vec<i32> = (0..spec.custom_keys().len())
            .map(ChoiceSpec::custom_code)
            .collect();
        assert_eq!(codes, vec![10, 11, 12, 13]);
    }

    #[test]
    fn custom_index_is_case_insensitive_for_letters() {
        let spec = ChoiceSpec::decode("xyz");
        assert_eq!(spec.custom_index('Y'), Some(1));
        assert_eq!(spec.custom_index('y'), Some(1));
        assert_eq!(spec.custom_index('w'), None);
    }

    #[test]
    fn keys_match_only_folds_alphabetic() {
        assert!(keys_match('a', 'A'));
        assert!(keys_match('1', '1'));
        assert!(!keys_match('1', '!'));
    }

    #[test]
    fn allows_falls_back_to_any_key() {
        let spec = ChoiceSpec::decode("A");
        assert!(spec.allows(ReservedAction::Quit));
        let spec = ChoiceSpec::decode("E");
        assert!(!spec.allows(ReservedAction::Quit));
    }

    #[test]
    fn legend_lists_enabled_actions_and_custom_codes() {
        let spec = ChoiceSpec::decode("ERCPQx ");
        assert_eq!(
            spec.keymap_legend(),
            "[Enter] continue  [r] redo  [c/Esc] cancel  [p/Space] pause  [q] quit  [x] option 10  [Space] option 11"
        );
    }

    #[test]
    fn any_key_replaces_enter_in_legend() {
        let spec = ChoiceSpec::decode("AE");
        assert_eq!(spec.keymap_legend(), "[any key] continue");
    }

    #[test]
    fn reserved_set_iterates_in_legend_order() {
        let spec = ChoiceSpec::decode("qHpx");
        let actions: Vec<ReservedAction> = spec.reserved().iter().collect();
        assert_eq!(
            actions,
            vec![
                ReservedAction::Pause,
                ReservedAction::Quit,
                ReservedAction::HideKeymap
            ]
        );
    }

    #[test]
    fn hide_keymap_has_no_legend_entry() {
        let spec = ChoiceSpec::decode("HQ");
        assert_eq!(spec.keymap_legend(), "[q] quit");
    }
}
