//! Style provider for the dialog block.

type StyleFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Injected styling for each part of the block. Every function receives plain
/// text and returns the text wrapped in whatever styling it wants.
pub struct DialogTheme {
    pub message: StyleFn,
    pub key: StyleFn,
    pub key_label: StyleFn,
    pub countdown: StyleFn,
    pub paused: StyleFn,
}

fn sgr(code: &'static str) -> StyleFn {
    Box::new(move |text: &str| format!("\x1b[{code}m{text}\x1b[0m"))
}

fn identity() -> StyleFn {
    Box::new(|text: &str| text.to_string())
}

impl DialogTheme {
    /// No styling at all; used for `NO_COLOR` and in tests.
    pub fn plain() -> Self {
        Self {
            message: identity(),
            key: identity(),
            key_label: identity(),
            countdown: identity(),
            paused: identity(),
        }
    }

    /// Bold message, cyan keys, dim labels, yellow countdown, magenta pause notice.
    pub fn ansi() -> Self {
        Self {
            message: sgr("1"),
            key: sgr("36"),
            key_label: sgr("2"),
            countdown: sgr("33"),
            paused: sgr("35"),
        }
    }

    pub fn for_color(enabled: bool) -> Self {
        if enabled {
            Self::ansi()
        } else {
            Self::plain()
        }
    }
}

impl Default for DialogTheme {
    fn default() -> Self {
        Self::ansi()
    }
}

impl std::fmt::Debug for DialogTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogTheme").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::DialogTheme;

    #[test]
    fn plain_theme_is_identity() {
        let theme = DialogTheme::plain();
        assert_eq!((theme.countdown)("5s"), "5s");
        assert_eq!((theme.key)("q"), "q");
    }

    #[test]
    fn ansi_theme_wraps_and_resets() {
        let theme = DialogTheme::ansi();
        assert_eq!((theme.countdown)("5s"), "\x1b[33m5s\x1b[0m");
    }

    #[test]
    fn color_flag_selects_theme() {
        assert_eq!((DialogTheme::for_color(false).paused)("x"), "x");
        assert_ne!((DialogTheme::for_color(true).paused)("x"), "x");
    }
}
