//! # roster-flags
//!
//! Evaluate one roster week and report every slot that needs a manager's attention.

#![deny(clippy::undocumented_unsafe_blocks, clippy::missing_safety_doc)]
#![cfg_attr(
    not(test),
    deny(
        clippy::panic,
        clippy::unimplemented,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::unreachable,
        reason = "production code shouldn't panic"
    )
)]

use chrono::{Local, NaiveDate};
use cmdline::{Help, parse_arg, print_help};
use miette::Diagnostic;
use roster::{
    ConflictAnalyzer, Flags, JsonDirStore, RosterConfig, RosterStore,
    algo::{Conflict, FlagSummary},
    data::{Highlight, RosterWeek},
    logging, provision, week_or_blank, week_or_provision,
};
use serde::Serialize;
use std::{io::Write, num::ParseIntError, path::PathBuf};
use thiserror::Error;

/// Error while trying to read command-line arguments.
#[derive(Debug, Error, Diagnostic)]
enum ArgsError {
    /// Error reading arguments
    #[error("argument error")]
    LexoptError(#[from] lexopt::Error),

    /// Error writing help
    #[error("could not print help")]
    IOError(#[from] std::io::Error),

    /// Repetition of argument that should not be repeated
    #[error("--{0} should only be provided once")]
    DuplicateArg(&'static str),

    /// `--week` is not a whole number
    #[error("week offset `{value}` is not a whole number")]
    #[diagnostic(help("weeks are counted from the configured epoch; 0 is the epoch's week, -1 the one before"))]
    BadWeek {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// `--week` lands outside the calendar
    #[error("week offset {0} is out of range")]
    WeekOutOfRange(i64),
}

#[derive(Debug)]
struct CmdLineData {
    data_dir: PathBuf,
    config_path: PathBuf,
    week: Option<i64>,
    dry_run: bool,
    json: bool,
}

fn set_once<T>(slot: &mut Option<T>, name: &'static str, value: T) -> Result<(), ArgsError> {
    if slot.is_some() {
        return Err(ArgsError::DuplicateArg(name));
    }
    *slot = Some(value);
    Ok(())
}

/// Parse command line arguments. [`None`] if help was printed.
fn get_data(mut parser: lexopt::Parser) -> Result<Option<CmdLineData>, ArgsError> {
    let mut data_dir = None;
    let mut config_path = None;
    let mut week = None;
    let mut dry_run = false;
    let mut json = false;

    while let Some(arg) = parser.next()? {
        parse_arg! {
            options = OPTIONS;
            parser = parser;
            match arg {
                #[help = "Directory holding staff.json and weeks/"]
                #[default = "./data"]
                ( -'d', --"data" <DIR> ) => set_once(&mut data_dir, "data", PathBuf::from(DIR?))?,

                #[help = "Roster settings file"]
                #[default = "./roster.toml"]
                ( -'c', --"config" <PATH> ) => set_once(&mut config_path, "config", PathBuf::from(PATH?))?,

                #[help = "Week to evaluate, counted from the epoch"]
                #[default = "the current week"]
                ( -'w', --"week" <OFFSET> ) => {
                    let value = OFFSET?.to_string_lossy().into_owned();
                    let offset = value
                        .parse::<i64>()
                        .map_err(|source| ArgsError::BadWeek { value, source })?;
                    set_once(&mut week, "week", offset)?
                },

                #[help = "Report without saving flags"]
                ( -'n', --"dry-run" ) => dry_run = true,

                #[help = "Print the report as JSON"]
                ( -'j', --"json" ) => json = true,

                #[help = "Print help"]
                ( -'h', --"help" ) => {
                    print_help(&Help {
                        bin_name: "roster-flags",
                        about: "Flag scheduling problems in a roster week",
                        usages: &[&[(false, "[OPTIONS]")]],
                        options: OPTIONS,
                    })?;
                    return Ok(None);
                },

                _ => return Err(arg.unexpected().into()),
            }
        }
    }

    Ok(Some(CmdLineData {
        data_dir: data_dir.unwrap_or_else(|| PathBuf::from("./data")),
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./roster.toml")),
        week,
        dry_run,
        json,
    }))
}

/// What gets printed.
#[derive(Debug, Serialize)]
struct Report {
    week: NaiveDate,
    slots: usize,
    summary: FlagSummary,
    conflicts: Vec<Conflict>,
}

impl Report {
    fn new(week: &RosterWeek, flags: &Flags) -> Self {
        Self {
            week: week.start,
            slots: week.slots().count(),
            summary: flags.summary(),
            conflicts: flags.conflicts(week),
        }
    }

    fn write_json<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut w, self)?;
        writeln!(w)
    }

    fn write_text<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        writeln!(
            w,
            "Week of {}: {} of {} slots flagged",
            self.week,
            self.summary.flagged(),
            self.slots
        )?;
        for c in &self.conflicts {
            writeln!(
                w,
                "  {:<10} {:<10} {:<6} {:<16} {:<14} {}",
                c.day,
                c.date.map(|d| d.to_string()).unwrap_or_default(),
                <&str>::from(c.kind),
                c.staff_name.as_deref().unwrap_or("?"),
                <&str>::from(c.flag),
                c.description,
            )?;
        }
        for &(flag, n) in &self.summary.counts {
            if flag != Highlight::None && n > 0 {
                writeln!(w, "  {flag}: {n}")?;
            }
        }
        Ok(())
    }
}

/// Evaluate the week starting on `start` and write the report to `out`.
///
/// Returns how many flags were saved, or [`None`] on a dry run. A dry run
/// never writes to `store`, not even to provision a missing week.
fn run<S: RosterStore + ?Sized, W: Write>(
    store: &mut S,
    config: &RosterConfig,
    start: NaiveDate,
    dry_run: bool,
    json: bool,
    out: W,
) -> miette::Result<Option<usize>> {
    let mut roster = if dry_run {
        week_or_blank(store, config, start)?
    } else {
        week_or_provision(store, config, start)?
    };
    let staff = store.load_staff()?;
    roster.refresh_staff_names(&staff);

    let flags = ConflictAnalyzer::new(&staff)
        .emit_ideal_met(config.analysis.emit_ideal_met)
        .analyze(&roster);

    let report = Report::new(&roster, &flags);
    let printed = if json {
        report.write_json(out)
    } else {
        report.write_text(out)
    };
    printed.map_err(miette::Error::from_err)?;

    if dry_run {
        tracing::info!("dry run; flags not saved");
        return Ok(None);
    }
    let written = flags.apply(&mut roster);
    store.save_week(&roster)?;
    tracing::info!(week = %roster.start, written, "saved flags");
    Ok(Some(written))
}

fn main() -> miette::Result<()> {
    let Some(CmdLineData {
        data_dir,
        config_path,
        week,
        dry_run,
        json,
    }) = get_data(lexopt::Parser::from_env())?
    else {
        return Ok(());
    };

    let config = RosterConfig::load_or_default(&config_path)?;
    logging::init(&config.log.filter);
    tracing::debug!(config = %config_path.display(), data = %data_dir.display(), "starting");

    let start = match week {
        Some(offset) => provision::week_start(config.epoch, offset)
            .ok_or(ArgsError::WeekOutOfRange(offset))?,
        None => {
            let today = Local::now().date_naive();
            config
                .week_containing(today)
                .ok_or(ArgsError::WeekOutOfRange(provision::week_offset(config.epoch, today)))?
        }
    };

    let mut store = JsonDirStore::new(data_dir);
    run(&mut store, &config, start, dry_run, json, std::io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster::{MemoryStore, data::SlotKind, staff};

    fn args(args: &[&str]) -> Result<Option<CmdLineData>, ArgsError> {
        get_data(lexopt::Parser::from_args(args.iter().copied()))
    }

    /// Week 3 from the default epoch.
    fn start() -> NaiveDate {
        provision::week_start(RosterConfig::default().epoch, 3).unwrap()
    }

    #[test]
    fn test_args_defaults() {
        let data = args(&["-n", "-j"]).unwrap().unwrap();
        assert_eq!(data.data_dir, PathBuf::from("./data"));
        assert_eq!(data.config_path, PathBuf::from("./roster.toml"));
        assert_eq!(data.week, None);
        assert!(data.dry_run);
        assert!(data.json);

        let data = args(&["--week=-1", "--data", "/srv/roster"]).unwrap().unwrap();
        assert_eq!(data.week, Some(-1));
        assert_eq!(data.data_dir, PathBuf::from("/srv/roster"));
        assert!(!data.dry_run && !data.json);
    }

    #[test]
    fn test_args_rejects_repeats() {
        assert!(matches!(
            args(&["-w", "1", "--week", "2"]),
            Err(ArgsError::DuplicateArg("week"))
        ));
        assert!(matches!(
            args(&["-d", "a", "-d", "b"]),
            Err(ArgsError::DuplicateArg("data"))
        ));
    }

    #[test]
    fn test_args_rejects_bad_week() {
        match args(&["-w", "soon"]) {
            Err(ArgsError::BadWeek { value, .. }) => assert_eq!(value, "soon"),
            other => panic!("expected a bad week, got {other:?}"),
        }
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let config = RosterConfig::default();
        let mut store = MemoryStore::default();
        let mut out = Vec::new();

        let saved = run(&mut store, &config, start(), true, true, &mut out).unwrap();
        assert_eq!(saved, None);
        assert!(store.weeks.is_empty());

        // nothing but the report goes to `out`
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["week"], "2019-01-22");
        assert_eq!(report["slots"], 126);
        assert_eq!(report["conflicts"], serde_json::json!([]));
    }

    #[test]
    fn test_run_saves_flags() {
        let config = RosterConfig::default();
        let mut week = RosterWeek::provision(start(), &config);
        let ann = staff! { 1: "Ann" ideal 10 };
        let mut ids = Vec::new();
        for row in 0..2 {
            let id = week.days[0].rows[row].slot(SlotKind::Early).unwrap().id;
            week.assign(id, Some(&ann[0])).unwrap();
            ids.push(id);
        }
        let mut store = MemoryStore {
            staff: ann,
            ..Default::default()
        };
        store.save_week(&week).unwrap();

        let mut out = Vec::new();
        let saved = run(&mut store, &config, start(), false, false, &mut out).unwrap();
        assert_eq!(saved, Some(126));

        let stored = &store.weeks[&start()];
        for id in ids {
            assert_eq!(stored.find_slot(id).unwrap().flag, Highlight::Duplicate);
        }

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Week of 2019-01-22: 2 of 126 slots flagged\n"));
        assert!(text.contains("Ann"));
    }
}
