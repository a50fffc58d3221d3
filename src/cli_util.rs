use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;
use tracing_subscriber::EnvFilter;

use crate::EngineError;
use crate::theme::catppuccin::Mocha;

/// Install the stderr log subscriber. The filter comes from `BF_LOG`
/// (e.g. `BF_LOG=debug`) and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("BF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Pretty-print an [`EngineError`] with caret positioning.
/// If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_engine_error(program: Option<&str>, code: &[u8], err: &EngineError) {
    let msg = match err {
        EngineError::MemoryRange { ptr, op, .. } => {
            format!("Runtime error: pointer out of bounds (ptr={ptr}, op={op})")
        }
        EngineError::Branch { op, .. } => format!("Runtime error: unmatched bracket '{op}'"),
    };
    let msg = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };
    let color = io::stderr().is_terminal();
    for line in render_error_with_context(&msg, code, err.ip(), color) {
        eprintln!("{line}");
    }
    let _ = io::stderr().flush();
}

/// Lines of a concise error with instruction index and a caret context
/// window. Program bytes are shown one column each; bytes that would not
/// render as a single printable column are replaced.
pub fn render_error_with_context(prefix: &str, code: &[u8], pos: usize, color: bool) -> Vec<String> {
    // Show a short window around the position for context
    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(code.len());
    let slice: String = code
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|&b| match b {
            b' '..=b'~' => b as char,
            b'\t' | b'\n' | b'\r' => ' ',
            _ => '?',
        })
        .collect();
    let underline = format!("{}^", " ".repeat(pos.saturating_sub(start)));

    let header = format!("{prefix} at instruction {pos}");
    if color {
        vec![
            Style::new().bold().fg(Mocha::RED).paint(header).to_string(),
            format!("  {}", Mocha::TEXT.paint(slice)),
            format!("  {}", Mocha::PEACH.paint(underline)),
        ]
    } else {
        vec![header, format!("  {slice}"), format!("  {underline}")]
    }
}

/// Print a one-line failure that has no program context.
pub fn print_failure(program: &str, msg: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}: {}", Mocha::SURFACE2.paint(program), Mocha::RED.paint(msg));
    } else {
        eprintln!("{program}: {msg}");
    }
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_sits_under_failing_instruction() {
        let lines = render_error_with_context("oops", b"++>\n[<]", 5, false);
        assert_eq!(lines[0], "oops at instruction 5");
        assert_eq!(lines[1], "  ++> [<]");
        assert_eq!(lines[2], "       ^");
    }

    #[test]
    fn window_is_clipped_around_position() {
        let code = vec![b'+'; 100];
        let lines = render_error_with_context("e", &code, 80, false);
        // 32 before, the position itself, and up to 32 after (clipped at 100).
        assert_eq!(lines[1].len(), 2 + 32 + 1 + 19);
        assert_eq!(lines[2], format!("  {}^", " ".repeat(32)));
    }

    #[test]
    fn unprintable_bytes_keep_columns_aligned() {
        let lines = render_error_with_context("e", b"\xff\x00]", 2, false);
        assert_eq!(lines[1], "  ??]");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn colored_output_still_contains_message() {
        let lines = render_error_with_context("boom", b"[", 0, true);
        assert!(lines[0].contains("boom at instruction 0"));
        assert!(lines[0].contains('\u{1b}'));
    }
}
