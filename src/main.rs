use std::env;
use std::fs;
use std::process;

use track2tabs::playback::{SteppedClock, SyncEvent};
use track2tabs::{
    render_chord_sheet, ChordTimeline, EmitMode, PlaybackSynchronizer, SheetOptions,
};

/// Finer `--play` steps would take practically forever to step through a track.
const MIN_PLAY_STEP: f64 = 0.001;

const USAGE: &str = "Usage: track2tabs <chords.json> [--at SECONDS]... [--play STEP] [--sheet OUT.html] [--title TITLE]";

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let input_path = &args[1];
    let mut positions: Vec<f64> = Vec::new();
    let mut play_step: Option<f64> = None;
    let mut sheet_path: Option<&String> = None;
    let mut title = String::from("Chord Sheet");

    // Parse flags
    let mut i = 2;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--at", Some(v)) => positions.push(parse_seconds(v)),
            ("--play", Some(v)) => match check_play_step(parse_seconds(v)) {
                Ok(step) => play_step = Some(step),
                Err(message) => {
                    eprintln!("{}", message);
                    process::exit(1);
                }
            },
            ("--sheet", Some(v)) => sheet_path = Some(v),
            ("--title", Some(v)) => title = v.clone(),
            (flag, _) => {
                eprintln!("Unknown or incomplete option '{}'", flag);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 2;
    }

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let timeline = match ChordTimeline::from_json(&source) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Invalid chord timeline: {}", e);
            process::exit(1);
        }
    };

    for position in &positions {
        match timeline.active_interval_at(*position) {
            Some(interval) => println!(
                "{:>8.2}s  {:<6} [{:.2}s, {:.2}s)",
                position, interval.label, interval.start_sec, interval.end_sec
            ),
            None => println!("{:>8.2}s  -", position),
        }
    }

    if let Some(step) = play_step {
        let mut sync = PlaybackSynchronizer::new().with_mode(EmitMode::OnChange);
        let clock = SteppedClock::new(0.0, timeline.duration(), step);
        let mut print_event = |event: &SyncEvent| match event.label() {
            Some(label) => println!("{:>8.2}s  {}", event.position(), label),
            None => println!("{:>8.2}s  (no chord)", event.position()),
        };
        let changes = sync.drive(&timeline, clock, &mut print_event);
        eprintln!("{} chord changes", changes);
    }

    if let Some(path) = sheet_path {
        let options = SheetOptions {
            title,
            ..SheetOptions::default()
        };
        let html = render_chord_sheet(&timeline, &options);
        if let Err(e) = fs::write(path, &html) {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        }
        eprintln!("Wrote chord sheet to {}", path);
    }

    if positions.is_empty() && play_step.is_none() && sheet_path.is_none() {
        println!("{}", timeline.to_json());
    }
}

fn parse_seconds(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            eprintln!("Expected a number of seconds, got '{}'", value);
            process::exit(1);
        }
    }
}

fn check_play_step(step: f64) -> Result<f64, String> {
    if step >= MIN_PLAY_STEP {
        Ok(step)
    } else {
        Err(format!(
            "--play step must be at least {}s, got {}s",
            MIN_PLAY_STEP, step
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_step_minimum() {
        assert_eq!(check_play_step(0.25), Ok(0.25));
        assert_eq!(check_play_step(MIN_PLAY_STEP), Ok(MIN_PLAY_STEP));
        assert!(check_play_step(1e-300).is_err());
        assert!(check_play_step(0.0).is_err());
        assert!(check_play_step(-1.0).is_err());
    }
}
