//! safecalc - Entry Point

use clap::Parser;
use safecalc::model::AppError;
use safecalc::session::{ClearPrompt, Confirm, Session};
use safecalc::Calculator;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// safecalc - evaluate arithmetic formulas safely and keep a history
#[derive(Parser, Debug)]
#[command(name = "safecalc")]
#[command(version)]
#[command(about = "Evaluate arithmetic formulas safely and keep a history")]
#[command(after_help = "Put formulas starting with '-' after `--`: safecalc -- -2+3")]
pub struct Args {
    /// Formulas to evaluate (starts an interactive prompt if none are given)
    pub expressions: Vec<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// History file to load and save
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Do not write the history file on exit
    #[arg(long)]
    pub no_save: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = safecalc::config::load_config_with_precedence(args.config.clone())?;
        let merged = safecalc::config::merge_config(config_file);
        let with_env = safecalc::config::apply_env_overrides(merged);
        safecalc::config::apply_cli_overrides(with_env, args.history.clone())
    };

    // A calculator without a log file is still a calculator.
    if let Err(e) = safecalc::logging::init(&config.log_file_path) {
        eprintln!("warning: {e}; continuing without a log file");
    }

    info!(config = ?config, "Configuration loaded and resolved");

    let (mut session, read_error) = Session::start(Calculator::shared().clone(), &config);
    if let Some(e) = read_error {
        eprintln!("{} {e}", config.messages.history_read_error);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.expressions.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        repl(&mut session, &mut input, &mut out)?;
    } else {
        for expression in &args.expressions {
            let calculation = session.submit(expression);
            writeln!(out, "{}", calculation.outcome.message(session.messages()))?;
        }
    }

    if args.no_save {
        info!("history not saved (--no-save)");
    } else if let Err(e) = session.save() {
        eprintln!("{} {e}", config.messages.history_write_error);
    }

    Ok(())
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Evaluate(&'a str),
    History,
    Round(Option<u32>),
    Paste(&'a str),
    Clear,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Command::Empty;
    }
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Command::Evaluate(line);
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));
    match name {
        "history" | "h" => Command::History,
        "round" | "r" if rest.is_empty() => Command::Round(None),
        "round" | "r" => match rest.parse() {
            Ok(digits) => Command::Round(Some(digits)),
            Err(_) => Command::Invalid(format!("not a number of digits: {rest}")),
        },
        "paste" | "p" => Command::Paste(rest),
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

const HELP: &str = "\
Type a formula to evaluate it. Commands:
  :history        list calculations, newest first
  :round [N]      round the last result to N decimal places
  :paste TEXT     show what pasting TEXT would leave in the formula
  :clear          erase the history (asks first)
  :quit           save and exit";

/// Reads the answer to a confirmation from the prompt's own input.
struct TerminalConfirm<'a, R, W> {
    input: RefCell<&'a mut R>,
    output: RefCell<&'a mut W>,
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<'_, R, W> {
    fn confirm(&self, prompt: &ClearPrompt<'_>) -> bool {
        let mut output = self.output.borrow_mut();
        let asked = write!(
            output,
            "{} [{}/{}] ",
            prompt.question, prompt.accept, prompt.reject
        )
        .and_then(|()| output.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_acceptance(answer.trim(), prompt.accept),
        }
    }
}

fn is_acceptance(answer: &str, accept: &str) -> bool {
    answer.to_lowercase() == accept.to_lowercase()
        || answer.eq_ignore_ascii_case("y")
        || answer.eq_ignore_ascii_case("yes")
}

fn repl<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => return Ok(()),
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Invalid(message) => writeln!(output, "{message}")?,
            Command::Evaluate(formula) => {
                let calculation = session.submit(formula);
                writeln!(output, "{}", calculation.outcome.message(session.messages()))?;
            }
            Command::History => {
                for entry in session.history() {
                    writeln!(output, "{} = {}", entry.expression(), entry.result())?;
                }
            }
            Command::Round(digits) => match session.round_last(digits) {
                Ok(rounded) => writeln!(output, "{rounded}")?,
                Err(e) => writeln!(output, "{e}")?,
            },
            Command::Paste(text) => writeln!(output, "{}", session.paste(text))?,
            Command::Clear => {
                let confirm = TerminalConfirm {
                    input: RefCell::new(&mut *input),
                    output: RefCell::new(&mut *output),
                };
                if session.clear_history(&confirm) {
                    writeln!(output, "History cleared")?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use safecalc::config::ResolvedConfig;

    #[test]
    fn test_help_does_not_error() {
        // Help should succeed (exits with code 0)
        let result = Args::try_parse_from(["safecalc", "--help"]);
        // Help returns Err with DisplayHelp, which is success
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["safecalc", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["safecalc"]);
        assert!(args.expressions.is_empty());
        assert_eq!(args.config, None);
        assert_eq!(args.history, None);
        assert!(!args.no_save);
    }

    #[test]
    fn test_expressions_are_positional() {
        let args = Args::parse_from(["safecalc", "1+1", "2*3"]);
        assert_eq!(args.expressions, vec!["1+1", "2*3"]);
    }

    #[test]
    fn test_leading_minus_after_double_dash() {
        let args = Args::parse_from(["safecalc", "--", "-2+3"]);
        assert_eq!(args.expressions, vec!["-2+3"]);
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "safecalc",
            "--config",
            "/custom/config.toml",
            "--history",
            "/tmp/h.csv",
            "--no-save",
            "2^10",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(args.history, Some(PathBuf::from("/tmp/h.csv")));
        assert!(args.no_save);
        assert_eq!(args.expressions, vec!["2^10"]);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("1+1\n"), Command::Evaluate("1+1"));
        assert_eq!(parse_command("  \r\n"), Command::Empty);
        assert_eq!(parse_command(":history"), Command::History);
        assert_eq!(parse_command(":round"), Command::Round(None));
        assert_eq!(parse_command(":round 3"), Command::Round(Some(3)));
        assert!(matches!(parse_command(":round x"), Command::Invalid(_)));
        assert_eq!(parse_command(":paste  abc 1+2 "), Command::Paste("abc 1+2"));
        assert_eq!(parse_command(":clear"), Command::Clear);
        assert_eq!(parse_command(":q"), Command::Quit);
        assert!(matches!(parse_command(":frobnicate"), Command::Invalid(_)));
    }

    #[test]
    fn test_acceptance_answers() {
        assert!(is_acceptance("Yes", "Yes"));
        assert!(is_acceptance("y", "Yes"));
        assert!(is_acceptance("да", "Да"));
        assert!(!is_acceptance("n", "Yes"));
        assert!(!is_acceptance("", "Yes"));
    }

    fn session_in(dir: &std::path::Path) -> Session {
        let config = ResolvedConfig {
            history_file: dir.join("results.csv"),
            ..ResolvedConfig::default()
        };
        Session::start(Calculator::shared().clone(), &config).0
    }

    fn run_repl(session: &mut Session, script: &str) -> String {
        let mut input = io::Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        repl(session, &mut input, &mut output).expect("repl");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn test_repl_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path());

        let out = run_repl(
            &mut session,
            "1,5 + 2_3\n2/3\n:round\n1/0\n:paste abc1+2@#3\n:history\n:quit\n",
        );

        assert!(out.contains("24.5\n"), "{out}");
        assert!(out.contains("0.67\n"), "{out}");
        assert!(out.contains("Error. Division by 0\n"), "{out}");
        assert!(out.contains("1+23\n"), "{out}");
        assert!(out.contains("1/0 = Error. Division by 0\n2/3 = 0.6666666666666666\n1,5 + 2_3 = 24.5\n"), "{out}");
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_repl_clear_needs_confirmation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path());

        run_repl(&mut session, "1+1\n:clear\nn\n");
        assert_eq!(session.history().len(), 1);

        let out = run_repl(&mut session, ":clear\ny\n");
        assert!(out.contains("[Yes/No]"), "{out}");
        assert!(out.contains("History cleared"), "{out}");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_repl_stops_at_end_of_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(dir.path());
        run_repl(&mut session, "2+2");
        assert_eq!(session.history().get(0).map(|e| e.result()), Some("4"));
    }
}
