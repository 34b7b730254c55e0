use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use timed_dialog::{run_on_tty, DialogTheme, EnvConfig, Preset};

/// `EX_USAGE` from sysexits.h; kept clear of the outcome codes.
const USAGE_EXIT: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum PresetArg {
    /// Every reserved action, 5 seconds
    #[default]
    Dialog,
    /// Enter continues, cancel and pause available, 5 seconds
    Autocontinue,
    /// Timed ok/redo/quit confirmation, 10 seconds
    Confirm,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Dialog => Preset::Dialog,
            PresetArg::Autocontinue => Preset::Autocontinue,
            PresetArg::Confirm => Preset::Confirm,
        }
    }
}

/// Timed single-keystroke decision for shell scripts.
///
/// Exit status: 0 continue, 1 timed out, 2 cancel, 3 redo, 4 quit,
/// 10+n for the n-th custom key, 64 for invalid arguments.
#[derive(Debug, Parser)]
#[command(name = "timed-dialog", author, version)]
struct Cli {
    /// Countdown length in seconds (defaults to the preset's)
    #[arg(short, long)]
    seconds: Option<u64>,

    /// Message shown above the keymap
    #[arg(short, long, default_value = "")]
    message: String,

    /// Allowed actions: A any, E enter, R redo, C cancel, P pause, Q quit,
    /// H hide keymap; any other character is a custom key
    #[arg(short, long, allow_hyphen_values = true)]
    choices: Option<String>,

    /// Named configuration providing default choices, seconds and wording
    #[arg(long, value_enum, default_value_t = PresetArg::Dialog)]
    preset: PresetArg,

    /// Disable colors (NO_COLOR in the environment does the same)
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(USAGE_EXIT)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = EnvConfig::from_env();
    let preset = Preset::from(cli.preset);
    let color = config.color_enabled() && !cli.no_color;
    let dialog = preset
        .dialog(cli.choices.as_deref(), cli.seconds)
        .with_message(cli.message)
        .with_theme(DialogTheme::for_color(color));

    let outcome = run_on_tty(&dialog, &config);
    ExitCode::from(outcome.exit_status())
}
