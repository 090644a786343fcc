//! Interactive startup questions for options not given on the command line.
//!
//! Both prompts re-ask on invalid input and fail only when the input stream
//! ends.

use std::io::{self, BufRead};

use crate::console::Console;
use crate::llm::InterviewType;

/// Numbered menu over [`InterviewType::CHOICES`].  Accepts the number or
/// the type's name.
pub fn choose_interview_type(
    input: &mut impl BufRead,
    console: &Console,
) -> io::Result<InterviewType> {
    console.headline("What type of interview would you like to practice?");
    for (i, kind) in InterviewType::CHOICES.iter().enumerate() {
        console.info(&format!("  {}. {kind}", i + 1));
    }

    let count = InterviewType::CHOICES.len();
    loop {
        console.prompt(&format!("Choice [1-{count}]:"));
        let answer = read_answer(input)?;
        if let Some(kind) = parse_choice(&answer) {
            return Ok(kind);
        }
        console.error(&format!("Please enter a number between 1 and {count}."));
    }
}

/// Session length in whole minutes; an empty answer takes `default`.
pub fn ask_duration(input: &mut impl BufRead, console: &Console, default: u32) -> io::Result<u32> {
    loop {
        console.prompt(&format!("Duration in minutes? [{default}]:"));
        let answer = read_answer(input)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<u32>() {
            Ok(mins) => return Ok(mins),
            Err(_) => console.error("Please enter a whole number of minutes."),
        }
    }
}

fn parse_choice(answer: &str) -> Option<InterviewType> {
    if let Ok(n) = answer.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| InterviewType::CHOICES.get(i))
            .copied();
    }
    let kind = InterviewType::from_label(answer);
    InterviewType::CHOICES.contains(&kind).then_some(kind)
}

fn read_answer(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before an answer was given",
        ));
    }
    Ok(line.trim().to_string())
}
