use std::path::PathBuf;

use colored::Colorize;

use crate::i18n::{self, Language};
use crate::session::params::{MAX_THRESHOLD, MAX_TOP_K, MIN_THRESHOLD, MIN_TOP_K};
use crate::session::ParameterStore;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Search(String),
    TopK(i64),
    Threshold(f64),
    Enhance(bool),
    Params,
    Health,
    Reload,
    Export(Option<PathBuf>),
    Open(u32),
    Help,
    Quit,
    Invalid { command: String, value: String },
    Unknown(String),
}

const KEYWORDS: &[&str] = &[
    "search", "k", "top_k", "threshold", "t", "enhance", "params", "health", "reload", "export",
    "open", "help", "?", "quit", "exit", "q",
];

pub const HELP: &[(&str, &str)] = &[
    ("<text> | search <text>", "run a search"),
    ("k <1-20>", "set the number of results"),
    ("threshold <0.0-0.6>", "set the minimum similarity score"),
    ("enhance on|off", "toggle query enhancement"),
    ("params", "show the current parameters"),
    ("health", "refresh and show the system status"),
    ("reload", "reload the server-side index"),
    ("export [dir]", "save the results as CSV"),
    ("open <rank>", "open a result image in the viewer"),
    ("quit", "leave"),
];

fn invalid(command: &str, value: &str) -> Command {
    Command::Invalid {
        command: command.to_string(),
        value: value.to_string(),
    }
}

/// Anything that does not start with a known keyword is a search query.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let keyword = head.to_lowercase();
    if !KEYWORDS.contains(&keyword.as_str()) {
        return Command::Search(line.to_string());
    }

    match keyword.as_str() {
        "search" => Command::Search(rest.to_string()),
        "k" | "top_k" => match rest.parse::<i64>() {
            Ok(k) => Command::TopK(k),
            Err(_) => invalid(head, rest),
        },
        "threshold" | "t" => match rest.parse::<f64>() {
            Ok(x) if x.is_finite() => Command::Threshold(x),
            _ => invalid(head, rest),
        },
        "enhance" => match rest.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Command::Enhance(true),
            "off" | "false" | "no" | "0" => Command::Enhance(false),
            _ => invalid(head, rest),
        },
        "export" if rest.is_empty() => Command::Export(None),
        "export" => Command::Export(Some(PathBuf::from(rest))),
        "open" => match rest.trim_start_matches('#').parse::<u32>() {
            Ok(rank) => Command::Open(rank),
            Err(_) => invalid(head, rest),
        },
        "params" if rest.is_empty() => Command::Params,
        "health" if rest.is_empty() => Command::Health,
        "reload" if rest.is_empty() => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" if rest.is_empty() => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub fn render_params(params: &ParameterStore, locale: Language) -> String {
    let enhancement = if params.use_enhancement() { "on" } else { "off" };
    let mut out = format!("{}\n", i18n::ts(locale, "params_title").bold());
    out.push_str(&format!(
        "  {:<20} {}\n",
        i18n::ts(locale, "params_query"),
        params.query()
    ));
    out.push_str(&format!(
        "  {:<20} {}\n",
        i18n::ts(locale, "params_enhancement"),
        enhancement
    ));
    out.push_str(&format!(
        "  {:<20} {} ({}-{})\n",
        i18n::ts(locale, "params_top_k"),
        params.top_k(),
        MIN_TOP_K,
        MAX_TOP_K
    ));
    out.push_str(&format!(
        "  {:<20} {:.2} ({:.1}-{:.1})",
        i18n::ts(locale, "params_threshold"),
        params.threshold(),
        MIN_THRESHOLD,
        MAX_THRESHOLD
    ));
    out
}

pub fn render_help(locale: Language) -> String {
    let mut out = format!("{}\n", i18n::ts(locale, "repl_help_title").bold());
    for (syntax, what) in HELP {
        out.push_str(&format!("  {:<26} {}\n", syntax.cyan(), what));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_is_a_search() {
        assert_eq!(parse("sunset over mountains"), Command::Search("sunset over mountains".into()));
        assert_eq!(parse("  kitten  "), Command::Search("kitten".into()));
        assert_eq!(parse("search   red car"), Command::Search("red car".into()));
        assert_eq!(parse("search"), Command::Search(String::new()));
        assert_eq!(parse("   "), Command::None);
    }

    #[test]
    fn test_parameter_commands() {
        assert_eq!(parse("k 12"), Command::TopK(12));
        assert_eq!(parse("k -3"), Command::TopK(-3));
        assert_eq!(parse("threshold 0.35"), Command::Threshold(0.35));
        assert_eq!(parse("t 1"), Command::Threshold(1.0));
        assert_eq!(parse("enhance OFF"), Command::Enhance(false));
        assert_eq!(parse("enhance on"), Command::Enhance(true));
        assert_eq!(
            parse("k many"),
            Command::Invalid { command: "k".into(), value: "many".into() }
        );
        assert!(matches!(parse("threshold NaN"), Command::Invalid { .. }));
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(parse("health"), Command::Health);
        assert_eq!(parse("reload"), Command::Reload);
        assert_eq!(parse("export"), Command::Export(None));
        assert_eq!(parse("export /tmp/out"), Command::Export(Some(PathBuf::from("/tmp/out"))));
        assert_eq!(parse("open #3"), Command::Open(3));
        assert_eq!(parse("open 2"), Command::Open(2));
        assert_eq!(parse("QUIT"), Command::Quit);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("health now"), Command::Unknown("health now".into()));
    }

    #[test]
    fn test_render_params() {
        colored::control::set_override(false);
        let mut params = ParameterStore::new();
        params.set_query("harbor");
        params.set_threshold(0.25);
        let text = render_params(&params, Language::En);
        assert!(text.contains("harbor"));
        assert!(text.contains("0.25 (0.0-0.6)"));
        assert!(text.contains("5 (1-20)"));
    }
}
