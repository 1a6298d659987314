//! Shell command parsing.

use chrono::{Datelike, Local, NaiveDate};
use reelboard_core::utils::parse_sheet_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login { email: String, remember: bool },
    Logout,
    WhoAmI,
    Projects,
    Work { project_id: String, date: Option<NaiveDate> },
    Dashboard { email: String, date: NaiveDate },
    Summary { year: i32, month: u32 },
    Member { name: String, year: i32, month: u32 },
    Staffs { term: String },
    UpdateStaff { staff_id: String, column: String, value: String },
    Leaves { date: NaiveDate },
    Profile,
    Rename { name: String },
    Avatar { url: String },
    Tabs,
    Reload,
    Quit,
}

impl Command {
    /// Commands that show backend data and can be refreshed by `reload`.
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            Command::Work { .. }
                | Command::Dashboard { .. }
                | Command::Summary { .. }
                | Command::Member { .. }
                | Command::Staffs { .. }
                | Command::Leaves { .. }
                | Command::Profile
                | Command::Tabs
        )
    }
}

pub const HELP: &str = "\
Commands:
  login <email> [--remember]      sign in
  logout                          sign out and forget the session
  whoami                          show the signed-in user
  projects                        list projects you can open
  work <project> [date]           submissions for a day (default: latest);
                                  the project may be its tab name
  dashboard <email> [date]        KPI cards for an employee (default: today)
  summary [YYYY-MM]               monthly summary of every member
  member <name> [YYYY-MM]         one member's month
  staffs [search]                 staff directory
  staff-set <id> <column> <value> change one cell of a staff row
  leaves [date]                   everyone's status for a day (default: today)
  profile                         show your profile
  rename <new name>               change your display name
  avatar <url>                    change your profile picture
  tabs                            list every spreadsheet tab
  reload                          clear cached data and refresh the last view
  quit                            exit

Dates: YYYY-MM-DD, D/M/YYYY, D/M/YY or 'today'.";

/// Accept ISO dates, sheet-style dates and `today`.
pub fn parse_date_arg(arg: &str) -> Option<NaiveDate> {
    let arg = arg.trim();
    if arg.eq_ignore_ascii_case("today") {
        return Some(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_sheet_date(arg))
}

/// `YYYY-MM` → (year, month)
pub fn parse_month_arg(arg: &str) -> Option<(i32, u32)> {
    let (year, month) = arg.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

fn current_month() -> (i32, u32) {
    let today = Local::now().date_naive();
    (today.year(), today.month())
}

/// Whether `word` was meant as a date rather than part of a name.
fn looks_like_date(word: &str) -> bool {
    word.eq_ignore_ascii_case("today")
        || (word.starts_with(|c: char| c.is_ascii_digit()) && (word.contains('/') || word.contains('-')))
}

/// Split a trailing date off a word list. The first word is never taken.
fn split_date(words: &[&str]) -> Result<(Vec<String>, Option<NaiveDate>), String> {
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() && looks_like_date(last) => {
            let date = parse_date_arg(last).ok_or_else(|| format!("Invalid date '{}'", last))?;
            Ok((rest.iter().map(|w| w.to_string()).collect(), Some(date)))
        }
        _ => Ok((words.iter().map(|w| w.to_string()).collect(), None)),
    }
}

/// Split a trailing `YYYY-MM` off a word list.
fn split_month(words: &[&str]) -> Result<(Vec<String>, (i32, u32)), String> {
    match words.split_last() {
        Some((last, rest)) if last.contains('-') && last.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            let month = parse_month_arg(last).ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", last))?;
            Ok((rest.iter().map(|w| w.to_string()).collect(), month))
        }
        _ => Ok((words.iter().map(|w| w.to_string()).collect(), current_month())),
    }
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "projects" => Command::Projects,
        "reload" => Command::Reload,
        "login" => {
            let remember = args.contains(&"--remember");
            let email = args
                .iter()
                .find(|a| !a.starts_with("--"))
                .ok_or("Usage: login <email> [--remember]")?;
            Command::Login {
                email: email.to_string(),
                remember,
            }
        }
        "work" => {
            let (project_words, date) = split_date(args)?;
            if project_words.is_empty() {
                return Err("Usage: work <project> [date]".to_string());
            }
            Command::Work {
                project_id: project_words.join(" "),
                date,
            }
        }
        "dashboard" => {
            let email = args.first().ok_or("Usage: dashboard <email> [date]")?;
            let date = parse_date_arg(args.get(1).copied().unwrap_or("today"))
                .ok_or_else(|| format!("Invalid date '{}'", args[1]))?;
            Command::Dashboard {
                email: email.to_string(),
                date,
            }
        }
        "summary" => {
            let (year, month) = match args.first() {
                Some(m) => parse_month_arg(m).ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", m))?,
                None => current_month(),
            };
            Command::Summary { year, month }
        }
        "member" => {
            let (name_words, (year, month)) = split_month(args)?;
            if name_words.is_empty() {
                return Err("Usage: member <name> [YYYY-MM]".to_string());
            }
            Command::Member {
                name: name_words.join(" "),
                year,
                month,
            }
        }
        "staffs" => Command::Staffs { term: args.join(" ") },
        "staff-set" => match args {
            [staff_id, column, value @ ..] if !value.is_empty() => Command::UpdateStaff {
                staff_id: staff_id.to_string(),
                column: column.to_string(),
                value: value.join(" "),
            },
            _ => return Err("Usage: staff-set <id> <column> <value>".to_string()),
        },
        "leaves" => {
            let date = match args.first() {
                Some(d) => parse_date_arg(d).ok_or_else(|| format!("Invalid date '{}'", d))?,
                None => Local::now().date_naive(),
            };
            Command::Leaves { date }
        }
        "profile" => Command::Profile,
        "rename" if !args.is_empty() => Command::Rename { name: args.join(" ") },
        "rename" => return Err("Usage: rename <new name>".to_string()),
        "avatar" => match args {
            [url] => Command::Avatar { url: url.to_string() },
            _ => return Err("Usage: avatar <url>".to_string()),
        },
        "tabs" => Command::Tabs,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };

    Ok(Some(command))
}
