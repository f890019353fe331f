//! Line-oriented prompts for ticket selection and comment entry.

use std::io::{BufRead, Write};

use crate::error::{FbError, Result};
use crate::types::Ticket;

pub fn print_numbered<W: Write>(output: &mut W, tickets: &[Ticket]) -> Result<()> {
    for (i, ticket) in tickets.iter().enumerate() {
        writeln!(
            output,
            "{}. [{}] {} ({})",
            i + 1,
            ticket.id,
            ticket.name,
            ticket.status()
        )?;
    }
    Ok(())
}

/// Asks for a 1-based ticket number until a valid one is entered. A blank
/// line or end of input cancels.
pub fn select_ticket<'t, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    tickets: &'t [Ticket],
    prompt: &str,
) -> Result<&'t Ticket> {
    loop {
        write!(output, "\n{prompt}: ")?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) if !line.is_empty() => line,
            _ => return Err(FbError::SelectionCancelled),
        };

        match line.parse::<usize>() {
            Ok(n) if (1..=tickets.len()).contains(&n) => return Ok(&tickets[n - 1]),
            _ => writeln!(
                output,
                "Invalid ticket number. Please enter a number between 1 and {}.",
                tickets.len()
            )?,
        }
    }
}

/// Asks for comment text, re-prompting on blank input. End of input cancels.
pub fn read_comment<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        write!(output, "Enter comment: ")?;
        output.flush()?;

        match read_line(input)? {
            Some(text) if !text.is_empty() => return Ok(text),
            Some(_) => writeln!(output, "Comment cannot be empty. Please enter some text.")?,
            None => return Err(FbError::SelectionCancelled),
        }
    }
}

/// Reads one trimmed line; `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::test_support::ticket;

    fn tickets() -> Vec<Ticket> {
        vec![
            ticket("T1", "Fix login", "bin-doing", "Doing"),
            ticket("T2", "Write docs", "bin-doing", "Doing"),
        ]
    }

    #[test]
    fn test_select_valid_number() {
        let tickets = tickets();
        let mut output = Vec::new();

        let selected =
            select_ticket(&mut Cursor::new("2\n"), &mut output, &tickets, "Pick").unwrap();

        assert_eq!(selected.id, "T2");
    }

    #[test]
    fn test_select_reprompts_on_invalid_input() {
        let tickets = tickets();
        let mut output = Vec::new();

        let selected =
            select_ticket(&mut Cursor::new("abc\n0\n3\n1\n"), &mut output, &tickets, "Pick")
                .unwrap();

        assert_eq!(selected.id, "T1");
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Invalid ticket number").count(), 3);
        assert_eq!(printed.matches("Pick: ").count(), 4);
    }

    #[test]
    fn test_select_blank_line_cancels() {
        let tickets = tickets();

        let err = select_ticket(&mut Cursor::new("\n1\n"), &mut Vec::new(), &tickets, "Pick")
            .unwrap_err();

        assert!(matches!(err, FbError::SelectionCancelled));
    }

    #[test]
    fn test_select_end_of_input_cancels() {
        let tickets = tickets();

        let err =
            select_ticket(&mut Cursor::new("7\n"), &mut Vec::new(), &tickets, "Pick").unwrap_err();

        assert!(matches!(err, FbError::SelectionCancelled));
    }

    #[test]
    fn test_read_comment_reprompts_on_blank() {
        let mut output = Vec::new();

        let text = read_comment(&mut Cursor::new("   \nLooks good\n"), &mut output).unwrap();

        assert_eq!(text, "Looks good");
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Comment cannot be empty"));
    }

    #[test]
    fn test_print_numbered() {
        let mut output = Vec::new();
        print_numbered(&mut output, &tickets()).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "1. [T1] Fix login (Doing)\n2. [T2] Write docs (Doing)\n"
        );
    }
}
