use std::io::{self, BufRead};

use ere_compiler::compile;
use ere_runtime::{find, find_all, Match};

const USAGE: &str = "re [--debug] [--all] PATTERN";

#[derive(Default)]
struct Flags {
    debug: bool,
    all: bool,
}

fn print_match(line_no: usize, found: &Match) {
    let groups = found
        .iter()
        .skip(1)
        .map(|group| match group {
            Some(group) => format!("{:?}", group.as_str()),
            None => "-".to_string(),
        })
        .collect::<Vec<_>>();

    match groups.is_empty() {
        true => println!("{}:{}-{}: {}", line_no, found.start(), found.end(), found.as_str()),
        false => println!(
            "{}:{}-{}: {} ({})",
            line_no,
            found.start(),
            found.end(),
            found.as_str(),
            groups.join(", ")
        ),
    }
}

fn main() -> Result<(), String> {
    env_logger::init();

    let (flags, args) =
        std::env::args()
            .skip(1)
            .fold((Flags::default(), vec![]), |(mut flags, mut args), arg| {
                match arg.as_str() {
                    "--debug" | "-d" => flags.debug = true,
                    "--all" | "-a" => flags.all = true,
                    _ => args.push(arg),
                }
                (flags, args)
            });

    let pattern = match args.as_slice() {
        [pattern] => Ok(pattern.as_str()),
        _ => Err(USAGE.to_string()),
    }?;

    let program = compile(pattern).map_err(|e| e.to_string())?;

    if flags.debug {
        println!(
            "DEBUG
--------
{}--------
",
            program
        )
    }

    for (line_no, line) in io::stdin().lock().lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let line_no = line_no + 1;

        if flags.all {
            let found = find_all(&program, &line).map_err(|e| e.to_string())?;
            for m in found.unwrap_or_default() {
                print_match(line_no, &m);
            }
        } else if let Some(m) = find(&program, &line).map_err(|e| e.to_string())? {
            print_match(line_no, &m);
        }
    }

    Ok(())
}
