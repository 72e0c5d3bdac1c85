use schedule_hours::{
    DaySchedule, Hours, ScheduleStore, ScheduleStoreConfig, import_assignments_from_csv,
};
use std::io::{self, Write};
use std::process;

const CONFIG_ENV: &str = "SCHEDULE_HOURS_CONFIG";

fn print_help() {
    println!(
        "Commands:\n  help                                       Show this help\n  set <date> <open> <close> [status]         Set standard hours (status Operating|Closed)\n  special <date> <open> <close> <label...>   Add special hours with a label\n  range <start> <end> <open> <close> [status]\n                                             Set standard hours for every day in range\n  get <date>                                 Show the schedule for a date\n  between <start> <end>                      Show all schedules in a date range\n  import <csv_path>                          Apply assignments from a CSV file\n  config show                                Show formatting configuration\n  quit|exit                                  Exit"
    );
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Failed to render output: {err}"),
    }
}

fn print_schedule(date: &str, schedule: Option<DaySchedule>) {
    match schedule {
        Some(schedule) => print_json(&schedule),
        None => println!("No schedule for {date}."),
    }
}

fn load_config() -> ScheduleStoreConfig {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => match ScheduleStoreConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config from {path}: {err}");
                process::exit(2);
            }
        },
        Err(_) => ScheduleStoreConfig::default(),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let mut store = match ScheduleStore::with_config(load_config()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            process::exit(2);
        }
    };

    println!("Schedule Hours (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["help"] => print_help(),
            ["quit"] | ["exit"] => break,
            ["set", date, open, close, rest @ ..] if rest.len() <= 1 => {
                let hours = match rest.first() {
                    Some(status) => Hours::new(*open, *close).with_schedule_type(*status),
                    None => Hours::new(*open, *close),
                };
                match store.try_set_date(*date, &hours) {
                    Ok(()) => println!("Set hours for {date}."),
                    Err(err) => println!("Rejected hours for {date}: {err}"),
                }
            }
            ["special", date, open, close, label @ ..] if !label.is_empty() => {
                let hours = Hours::special(*open, *close, label.join(" "));
                match store.try_set_date(*date, &hours) {
                    Ok(()) => println!("Added special hours for {date}."),
                    Err(err) => println!("Rejected special hours for {date}: {err}"),
                }
            }
            ["range", start, end, open, close, rest @ ..] if rest.len() <= 1 => {
                let hours = match rest.first() {
                    Some(status) => Hours::new(*open, *close).with_schedule_type(*status),
                    None => Hours::new(*open, *close),
                };
                if store.set_range(*start, *end, &hours) {
                    println!("Set hours for {start} through {end}.");
                } else {
                    println!("Range {start} through {end} was not fully applied.");
                }
            }
            ["get", date] => print_schedule(date, store.get_date(*date)),
            ["between", start, end] => print_json(&store.get_date_range(*start, *end)),
            ["import", path] => match import_assignments_from_csv(&mut store, path) {
                Ok(summary) => println!("Imported assignments: {}", summary.to_cli_summary()),
                Err(err) => println!("Import failed: {err}"),
            },
            ["config", "show"] => print_json(store.config()),
            _ => println!("Unknown command. Type 'help' for the command list."),
        }
    }
}
