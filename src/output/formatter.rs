use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::gradebook::GradeBook;
use crate::grading::mark::round2;
use crate::grading::{Aggregate, Status};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a number with two decimals and the given decimal separator
/// e.g. `format_decimal(10.4, ',')` -> "10,40"
pub fn format_decimal(value: f64, separator: char) -> String {
    let formatted = format!("{:.2}", round2(value));
    if separator == '.' {
        formatted
    } else {
        formatted.replace('.', &separator.to_string())
    }
}

/// Format a number with at most two decimals and no trailing zeros
/// ("2", "1.5", and "0.3" for a sum like 0.1 + 0.2)
pub fn format_plain(value: f64, separator: char) -> String {
    let fixed = format!("{:.2}", round2(value));
    let formatted = fixed.trim_end_matches('0').trim_end_matches('.').to_string();
    if separator == '.' {
        formatted
    } else {
        formatted.replace('.', &separator.to_string())
    }
}

/// Format an optional mark, "-" when absent
pub fn format_mark(mark: Option<f64>, separator: char) -> String {
    match mark {
        Some(value) => format_decimal(value, separator),
        None => "-".to_string(),
    }
}

/// Status label, coloured by band when colors are enabled
pub fn format_status(status: Status, use_colors: bool) -> String {
    let label = status.label();
    if !use_colors {
        return label.to_string();
    }
    match status {
        Status::Excellent => label.green().bold().to_string(),
        Status::Good => label.green().to_string(),
        Status::Warning => label.yellow().to_string(),
        Status::Danger => label.red().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate subject to fit available width, accounting for Unicode
pub(crate) fn truncate_subject(subject: &str, max_width: usize) -> String {
    let chars: Vec<char> = subject.chars().collect();
    if chars.len() <= max_width {
        subject.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Format the gradebook as a table with columns:
/// Index, Subject, Coef, CC, TP, Exam, Average, Status
///
/// Index is 1-based, matching `remove <INDEX>`.
/// Subject is truncated to the terminal width; piped output is never truncated.
pub fn format_table(book: &GradeBook, use_colors: bool, separator: char) -> String {
    format_table_with_width(book, use_colors, separator, get_terminal_width())
}

fn format_table_with_width(
    book: &GradeBook,
    use_colors: bool,
    separator: char,
    term_width: Option<usize>,
) -> String {
    if book.is_empty() {
        return "No grades recorded yet.".to_string();
    }

    let index_width = 3;
    let number_width = 7;
    let status_width = 9;
    let gap = "  ";
    // index + 5 numeric columns + status + gaps between 8 columns
    let fixed_width = index_width + number_width * 5 + status_width + gap.len() * 7;

    let longest = book
        .entries()
        .iter()
        .map(|e| e.subject.chars().count())
        .max()
        .unwrap_or(0)
        .max("Subject".len());

    let subject_width = match term_width {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let header = format!(
        "{:>iw$}{gap}{}{gap}{:>nw$}{gap}{:>nw$}{gap}{:>nw$}{gap}{:>nw$}{gap}{:>nw$}{gap}{}",
        "#",
        pad_right("Subject", subject_width),
        "Coef",
        "CC",
        "TP",
        "Exam",
        "Average",
        "Status",
        iw = index_width,
        nw = number_width,
        gap = gap,
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let rows = book.scored().into_iter().enumerate().map(|(idx, (entry, average, status))| {
        let index_str = format!("{:>2}.", idx + 1);
        let subject = pad_right(&truncate_subject(&entry.subject, subject_width), subject_width);
        let average_str = format!(
            "{:>nw$}",
            format_decimal(average, separator),
            nw = number_width
        );

        let (index_str, average_str) = if use_colors {
            (index_str.dimmed().to_string(), average_str.bold().to_string())
        } else {
            (index_str, average_str)
        };

        format!(
            "{}{gap}{}{gap}{:>nw$}{gap}{:>nw$}{gap}{:>nw$}{gap}{:>nw$}{gap}{}{gap}{}",
            index_str,
            subject,
            format_plain(entry.coefficient, separator),
            format_mark(entry.continuous_assessment, separator),
            format_mark(entry.practical_work, separator),
            format_decimal(entry.exam, separator),
            average_str,
            format_status(status, use_colors),
            nw = number_width,
            gap = gap,
        )
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the aggregate as a one-line summary
/// e.g. "General average: 10,90/20 (Good) | 2 validated, 1 in danger, 3 subjects"
pub fn format_summary(
    summary: &Aggregate,
    entry_count: usize,
    use_colors: bool,
    separator: char,
) -> String {
    let average = format!("{}/20", format_decimal(summary.general_average, separator));
    let average = if use_colors {
        average.bold().to_string()
    } else {
        average
    };

    let subjects = if entry_count == 1 { "subject" } else { "subjects" };

    format!(
        "General average: {} ({}) | {} validated, {} in danger, {} {}",
        average,
        format_status(summary.status(), use_colors),
        summary.validated_count,
        summary.danger_count,
        entry_count,
        subjects
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::GradeEntry;

    fn sample_book() -> GradeBook {
        GradeBook::from_entries(vec![
            GradeEntry::new("Maths", 2.0, 10.0)
                .with_continuous_assessment(12.0)
                .with_practical_work(14.0),
            GradeEntry::new("Histoire", 1.0, 16.0),
            GradeEntry::new("Chimie", 1.0, 4.0).with_practical_work(6.0),
        ])
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(10.4, '.'), "10.40");
        assert_eq!(format_decimal(10.4, ','), "10,40");
        assert_eq!(format_decimal(4.800000000000001, '.'), "4.80");
        assert_eq!(format_decimal(0.0, ','), "0,00");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(2.0, '.'), "2");
        assert_eq!(format_plain(1.5, ','), "1,5");
        assert_eq!(format_plain(20.0, '.'), "20");
        assert_eq!(format_plain(0.0, '.'), "0");
    }

    #[test]
    fn test_format_plain_hides_float_noise() {
        assert_eq!(format_plain(0.1 + 0.2, '.'), "0.3");
        assert_eq!(format_plain(0.1 + 0.2, ','), "0,3");
        assert_eq!(format_plain(1.25, '.'), "1.25");
        assert_eq!(format_plain(2.0 / 3.0, '.'), "0.67");
    }

    #[test]
    fn test_format_mark_absent() {
        assert_eq!(format_mark(None, '.'), "-");
        assert_eq!(format_mark(Some(12.5), ','), "12,50");
    }

    #[test]
    fn test_format_status_plain() {
        assert_eq!(format_status(Status::Warning, false), "Warning");
    }

    #[test]
    fn test_format_table_empty() {
        let book = GradeBook::new();
        assert_eq!(format_table(&book, false, '.'), "No grades recorded yet.");
    }

    #[test]
    fn test_format_table_rows() {
        let table = format_table_with_width(&sample_book(), false, '.', None);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Subject"));
        assert!(lines[0].contains("Average"));
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("Maths"));
        assert!(lines[1].contains("11.40"));
        assert!(lines[1].ends_with("Good"));
        assert!(lines[2].contains("16.00"));
        assert!(lines[2].ends_with("Excellent"));
        assert!(lines[3].contains("4.80"));
        assert!(lines[3].ends_with("Danger"));
    }

    #[test]
    fn test_format_table_absent_marks_render_as_dash() {
        let book = GradeBook::from_entries(vec![GradeEntry::new("Histoire", 1.0, 16.0)]);
        let table = format_table_with_width(&book, false, '.', None);
        let row = table.lines().nth(1).unwrap();
        assert_eq!(row.matches(" -").count(), 2);
    }

    #[test]
    fn test_format_table_truncates_long_subject() {
        let long = "Sciences economiques et sociales approfondies";
        let book = GradeBook::from_entries(vec![GradeEntry::new(long, 1.0, 12.0)]);

        let narrow = format_table_with_width(&book, false, '.', Some(80));
        assert!(!narrow.contains(long));
        assert!(narrow.contains("..."));

        let piped = format_table_with_width(&book, false, '.', None);
        assert!(piped.contains(long));
    }

    #[test]
    fn test_format_summary() {
        let book = sample_book();
        let summary = format_summary(&book.summary(), book.len(), false, ',');
        assert_eq!(
            summary,
            "General average: 10,90/20 (Good) | 2 validated, 1 in danger, 3 subjects"
        );
    }

    #[test]
    fn test_format_summary_empty() {
        let summary = format_summary(&Aggregate::default(), 0, false, '.');
        assert!(summary.starts_with("General average: 0.00/20 (Danger)"));
    }
}
