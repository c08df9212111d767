//! Output formatting for query and statistics results

use crate::extract::stats::LabelStats;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print a pattern membership verdict
pub fn print_query_result(pattern: &str, found: bool, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(stdout, "{}", pattern)?;
    stdout.reset()?;
    write!(stdout, ": ")?;

    if found {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(stdout, "found")?;
    } else {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(stdout, "not found")?;
    }
    stdout.reset()?;

    Ok(())
}

/// Print the top label records, most frequent first
pub fn print_stats_table(records: &[LabelStats], top: usize) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let mut sorted: Vec<&LabelStats> = records.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.label.cmp(&b.label)));

    writeln!(
        stdout,
        "{:>10}  {:>6}  {:>6}  label",
        "frequency", "level", "leaves"
    )?;
    for record in sorted.iter().take(top) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{:>10}", record.frequency)?;
        stdout.reset()?;
        write!(stdout, "  {:>6}  {:>6}  ", record.level, record.leaves)?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(stdout, "{}", printable_label(&record.label))?;
        stdout.reset()?;
    }

    if sorted.len() > top {
        writeln!(stdout, "... and {} more", sorted.len() - top)?;
    }

    Ok(())
}

/// Print the distinct edge labels, one per line
pub fn print_labels(labels: &std::collections::BTreeSet<String>) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for label in labels {
        writeln!(stdout, "{}", printable_label(label))?;
    }
    Ok(())
}

/// Replace control characters so labels stay on one terminal line
fn printable_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_label_strips_control_chars() {
        assert_eq!(printable_label("ab$"), "ab$");
        assert_eq!(printable_label("a\nb"), "a\u{FFFD}b");
    }
}
