use anyhow::Context;
use learnmap::grid::DEFAULT_DAYS_BACK;
use learnmap::journal::{Member, NextTopic, TimelineEntry};
use learnmap::{DateKey, Grid, LearningData, MemberFilter};
use lexopt::{Arg, Parser, ValueExt};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        file: PathBuf,
        today: Option<DateKey>,
        days_back: u32,
        member: MemberFilter,
        log_level: String,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut file = None;
        let mut today = None;
        let mut days_back = DEFAULT_DAYS_BACK;
        let mut member = MemberFilter::All;
        let mut log_level = String::from("warn");
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("days") => days_back = parser.value()?.parse()?,
                Arg::Short('t') | Arg::Long("today") => today = Some(parser.value()?.parse()?),
                Arg::Short('m') | Arg::Long("member") => member = parser.value()?.parse()?,
                Arg::Long("log-level") => log_level = parser.value()?.string()?,
                Arg::Value(value) if file.is_none() => file = Some(PathBuf::from(value)),
                _ => return Err(arg.unexpected()),
            }
        }
        let file = file.ok_or_else(|| lexopt::Error::from("missing <FILE> argument"))?;
        Ok(Command::Run {
            file,
            today,
            days_back,
            member,
            log_level,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                file,
                today,
                days_back,
                member,
                log_level,
            } => {
                let today = match today {
                    Some(d) => d,
                    None => DateKey::new(
                        OffsetDateTime::now_local()
                            .context("failed to determine local date")?
                            .date(),
                    ),
                };
                init_tracing(&log_level);
                tracing::info!(file = %file.display(), %today, days_back, %member, "Building report");
                let data = LearningData::load(&file)?;
                let heatmap = data
                    .heatmap(today, days_back)
                    .context("failed to build heatmap")?;
                let report = Report {
                    today,
                    started: data.started,
                    members: data.members.clone(),
                    member: member.to_string(),
                    heatmap,
                    timeline: data.timeline(&member),
                    next: data.next_topics(&member),
                };
                let mut out = io::stdout().lock();
                serde_json::to_writer_pretty(&mut out, &report)
                    .context("failed to write report")?;
                writeln!(out).context("failed to write report")?;
                Ok(())
            }
            Command::Help => {
                println!("Usage: learnmap [OPTIONS] <FILE>");
                println!();
                println!("Build a learning-activity heatmap, timeline, and suggestion list");
                println!("from a learning.json document and print them as JSON");
                println!();
                println!("Options:");
                println!("  -d, --days <N>            Days of history to cover [default: {DEFAULT_DAYS_BACK}]");
                println!("  -t, --today <YYYY-MM-DD>  Reference date [default: local date]");
                println!("  -m, --member <ID|all>     Only show one member's topics [default: all]");
                println!("      --log-level <LEVEL>   Log level when RUST_LOG is unset [default: warn]");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    today: DateKey,
    started: Option<DateKey>,
    members: Vec<Member>,
    member: String,
    heatmap: Grid,
    timeline: Vec<TimelineEntry>,
    next: Vec<NextTopic>,
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
