//! Source-to-source rewrite of constraint syntax into the evaluator's grammar.
//!
//! Each physical line is handled on its own:
//! - `&&` becomes `and`
//! - the first `->` splits the line into `((not (left)) or (right))`
//! - blank lines are dropped
//!
//! Only the first `->` of a line is rewritten. `a -> b -> c` leaves `b -> c` on the
//! right-hand side, which the parser then rejects.

use cgad_types::ids;

const IMPLIES: &str = "->";

pub fn translate(expr: &str) -> String {
    // `\r\n` leaves an empty piece between the two breaks; blank pieces are dropped.
    let lines: Vec<String> = expr
        .split(is_line_break)
        .map(translate_line)
        .filter(|line| !line.trim().is_empty())
        .collect();

    match lines.as_slice() {
        [] => ids::DEFAULT_EXPR.to_string(),
        [single] => single.clone(),
        many => many
            .iter()
            .map(|line| format!("({})", line.trim()))
            .collect::<Vec<_>>()
            .join(" and "),
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn translate_line(line: &str) -> String {
    let line = line.replace("&&", " and ");
    match line.split_once(IMPLIES) {
        Some((left, right)) => format!("((not ({})) or ({}))", left.trim(), right.trim()),
        None => line,
    }
}
