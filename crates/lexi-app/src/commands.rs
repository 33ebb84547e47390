//! Console command grammar.

use lexi_types::{AppEvent, HistorySort, RequestParams, parse_length};
use uuid::Uuid;

pub const HELP: &str = "\
commands:
  define <word> <length> [tone=..] [context=..] [lang=..]   (quote multi-word values)
  fav add|rm|toggle <word>      fav list
  quiz add <word>               quiz rm <id>      quiz list
  history [time-desc|time-asc|word-asc|word-desc]
  history replay <n>            re-run the n-th most recent request
  history clear --yes
  cache stats                   cache clear
  help                          quit";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type `help` for the list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown option '{0}' (expected tone=, context= or lang=)")]
    UnknownOption(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone)]
pub enum Input {
    Event(AppEvent),
    Help,
}

/// Split on whitespace, keeping double-quoted runs together
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

pub fn parse_command(line: &str) -> Result<Input, CommandError> {
    let tokens = tokenize(line)?;
    let Some((command, args)) = tokens.split_first() else {
        return Err(CommandError::Usage("help"));
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let event = match (command.to_lowercase().as_str(), args.as_slice()) {
        ("help" | "?", _) => return Ok(Input::Help),
        ("quit" | "exit", _) => AppEvent::Quit,

        ("define" | "d", [word, rest @ ..]) => AppEvent::Define(parse_define(word, rest)?),
        ("define" | "d", []) => return Err(CommandError::Usage("define <word> <length>")),

        ("fav", [] | ["list"]) => AppEvent::FavoritesList,
        ("fav", ["add", word]) => AppEvent::FavoriteAdd(word.to_string()),
        ("fav", ["rm" | "remove", word]) => AppEvent::FavoriteRemove(word.to_string()),
        ("fav", ["toggle", word]) => AppEvent::FavoriteToggle(word.to_string()),
        ("fav", _) => return Err(CommandError::Usage("fav add|rm|toggle <word> | fav list")),

        ("quiz", [] | ["list"]) => AppEvent::QuizList,
        ("quiz", ["add", word]) => AppEvent::QuizAdd(word.to_string()),
        ("quiz", ["rm" | "remove", id]) => match Uuid::parse_str(id) {
            Ok(id) => AppEvent::QuizRemove(id),
            Err(_) => return Err(CommandError::Usage("quiz rm <id> (id as shown by `quiz list`)")),
        },
        ("quiz", _) => return Err(CommandError::Usage("quiz add <word> | quiz rm <id> | quiz list")),

        ("history", []) => AppEvent::HistoryList(HistorySort::TimeDesc),
        ("history", ["clear"]) => AppEvent::HistoryClear { confirmed: false },
        ("history", ["clear", "--yes" | "-y"]) => AppEvent::HistoryClear { confirmed: true },
        ("history", ["replay", n]) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => AppEvent::Replay(n - 1),
            _ => return Err(CommandError::Usage("history replay <n> (n starts at 1)")),
        },
        ("history", [sort]) => match parse_sort(sort) {
            Some(sort) => AppEvent::HistoryList(sort),
            None => {
                return Err(CommandError::Usage(
                    "history [time-desc|time-asc|word-asc|word-desc]",
                ));
            }
        },
        ("history", _) => return Err(CommandError::Usage("history [sort] | history replay <n> | history clear --yes")),

        ("cache", ["clear"]) => AppEvent::CacheClear,
        ("cache", [] | ["stats"]) => AppEvent::CacheStats,
        ("cache", _) => return Err(CommandError::Usage("cache stats | cache clear")),

        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Input::Event(event))
}

fn parse_define(word: &str, rest: &[&str]) -> Result<RequestParams, CommandError> {
    let mut params = RequestParams {
        word: word.to_string(),
        ..RequestParams::default()
    };

    for arg in rest {
        match arg.split_once('=') {
            Some(("tone", value)) => params.tone = Some(value.to_string()),
            Some(("context", value)) => params.context = Some(value.to_string()),
            Some(("lang", value)) => params.lang = Some(value.to_string()),
            Some((key, _)) => return Err(CommandError::UnknownOption(key.to_string())),
            // Validation reports a bad or missing length, not the parser
            None if params.length.is_none() => params.length = parse_length(arg),
            None => return Err(CommandError::Usage("define <word> <length> [tone=..] [context=..] [lang=..]")),
        }
    }

    Ok(params)
}

fn parse_sort(text: &str) -> Option<HistorySort> {
    match text {
        "time-desc" | "newest" => Some(HistorySort::TimeDesc),
        "time-asc" | "oldest" => Some(HistorySort::TimeAsc),
        "word-asc" | "az" => Some(HistorySort::WordAsc),
        "word-desc" | "za" => Some(HistorySort::WordDesc),
        _ => None,
    }
}
