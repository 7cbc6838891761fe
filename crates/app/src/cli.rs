/// 命令行子命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    WhoAmI,
    Watchlist,
    Watch(String),
    Unwatch(String),
    Analyze(String),
    Ask(String),
    Alerts,
    Tape,
    Portfolio,
    Dashboard,
    Help,
}

pub const USAGE: &str = "\
Usage: tradeai [COMMAND]

Commands:
  register <username> <password>   Create an account
  login <username> <password>      Log in and store the session
  logout                           Drop the stored session
  whoami                           Show the logged-in user
  watchlist                        Show the watchlist with analysis
  watch <ticker>                   Add a ticker to the watchlist
  unwatch <ticker>                 Remove a ticker from the watchlist
  analyze <ticker>                 Analyse a single ticker
  ask <question...>                Ask the AI advisor
  alerts                           Show risk alerts
  tape                             Show the ticker tape once
  portfolio                        Show the sample portfolio
  dashboard                        Poll tape, alerts and index until Ctrl-C (default)
  help                             Show this message";

/// # Summary
/// 解析命令行参数（不含程序名）。
///
/// # Returns
/// 参数个数不符或命令未知时返回错误描述。
pub fn parse<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        return Ok(Command::Dashboard);
    };
    let rest: Vec<String> = args.collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("register", [username, password]) => Command::Register {
            username: username.clone(),
            password: password.clone(),
        },
        ("login", [username, password]) => Command::Login {
            username: username.clone(),
            password: password.clone(),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::WhoAmI,
        ("watchlist", []) => Command::Watchlist,
        ("watch", [ticker]) => Command::Watch(ticker.clone()),
        ("unwatch", [ticker]) => Command::Unwatch(ticker.clone()),
        ("analyze", [ticker]) => Command::Analyze(ticker.clone()),
        ("ask", words) if !words.is_empty() => Command::Ask(words.join(" ")),
        ("alerts", []) => Command::Alerts,
        ("tape", []) => Command::Tape,
        ("portfolio", []) => Command::Portfolio,
        ("dashboard", []) => Command::Dashboard,
        ("help" | "-h" | "--help", _) => Command::Help,
        (other, _) => return Err(format!("unknown command or wrong arguments: {}", other)),
    };
    Ok(command)
}
