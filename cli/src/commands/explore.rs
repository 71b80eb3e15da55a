use std::{
    io::{self, BufRead, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use districtscope::{Command, DistrictType, Outcome, Session};

const HELP: &str = "\
commands:
  type <us_house|state_house|state_senate>   switch district type
  address <street address>                   zoom to the district containing an address
  district <number|ST-number>                zoom to a district by number, e.g. 7 or TX-10
  reset                                      show the whole district type again
  render                                     redraw the output file
  quit";

/// One line of user input.
#[derive(Debug, PartialEq)]
enum Input {
    Command(Command),
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Option<Input>> {
    let line = line.trim();
    if line.is_empty() { return Ok(None) }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let input = match word.to_ascii_lowercase().as_str() {
        "type" | "t" => Input::Command(Command::SelectType(rest.parse::<DistrictType>()?)),
        "address" | "a" if !rest.is_empty() => Input::Command(Command::SubmitAddress(rest.to_string())),
        "district" | "d" if !rest.is_empty() => Input::Command(Command::FocusDistrict(rest.to_string())),
        "reset" => Input::Command(Command::Reset),
        "render" => Input::Command(Command::Render),
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => bail!("unrecognized command {line:?} (try \"help\")"),
    };
    Ok(Some(input))
}

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ExploreArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let out_path = super::output_path(&args.output);

    let mut session = Session::open(&config, &out_path).context("opening session")?;
    session.handle(Command::Render).context("rendering initial view")?;

    println!("[explore] showing {} in {}", session.explorer().district_type(), out_path.display());
    println!("{HELP}");

    // Stdin is read on its own thread so finished loads are applied while waiting for input.
    let (tx, lines) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() { break }
        }
    });

    prompt();
    loop {
        let line = match lines.recv_timeout(Duration::from_millis(100)) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => {
                match session.poll() {
                    Ok(true) => {
                        println!("\n[explore] showing {}", session.explorer().district_type());
                        prompt();
                    }
                    Ok(false) => {}
                    Err(e) => {
                        eprintln!("\nerror: {e}");
                        prompt();
                    }
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match parse(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => break,
            Ok(Some(Input::Help)) => println!("{HELP}"),
            Ok(Some(Input::Command(Command::SelectType(district_type)))) => {
                session.request_type(district_type);
                println!("[explore] loading {district_type}...");
            }
            // Waits for a pending type switch first, so the command acts on the new type.
            Ok(Some(Input::Command(command))) => match session.handle(command) {
                Ok(outcome) => report(&outcome),
                Err(e) => eprintln!("error: {e}"),
            },
            Err(e) => eprintln!("error: {e}"),
        }
        prompt();
    }

    // Let a load still in flight land before exiting so the output matches the last request.
    if session.is_loading() {
        if let Err(e) = session.finish_loading() {
            eprintln!("error: {e}");
        }
    }
    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Updated => println!("[explore] view updated"),
        Outcome::Unchanged => println!("[explore] nothing changed"),
        Outcome::Located { district, location, .. } => {
            println!("[explore] {:.5}, {:.5} is in district {district}", location.lat, location.lon)
        }
        Outcome::Rendered(path) => println!("[explore] wrote {}", path.display()),
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
