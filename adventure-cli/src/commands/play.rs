//! CLI command for playing a story in the terminal
//!
//! Keys: `1`/`2` pick a choice, `b` goes back, `r` restarts, `q` quits.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use adventure::story::load_story_file_with;
use adventure::{NavigationSession, ParseOptions, Side};

pub fn execute(source: &Path, options: &ParseOptions) -> anyhow::Result<()> {
    let tree = load_story_file_with(source, options)?;
    let session = NavigationSession::new(Arc::new(tree))?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(session, stdin.lock(), stdout.lock())
}

/// Drive `session` from `input` until `q` or end of input
pub fn run<R: BufRead, W: Write>(
    mut session: NavigationSession,
    input: R,
    mut out: W,
) -> anyhow::Result<()> {
    render(&session, &mut out)?;
    for line in input.lines() {
        let line = line?;
        let outcome = match line.trim() {
            "1" => session.choose(Side::Left).map(|_| ()),
            "2" => session.choose(Side::Right).map(|_| ()),
            "b" => session.go_back().map(|_| ()),
            "r" => {
                session.reset();
                Ok(())
            }
            "q" => break,
            "" => Ok(()),
            other => {
                writeln!(out, "Unknown command {other:?}")?;
                Ok(())
            }
        };
        if let Err(e) = outcome {
            writeln!(out, "Can't do that: {e}")?;
        }
        render(&session, &mut out)?;
    }
    Ok(())
}

fn render<W: Write>(session: &NavigationSession, out: &mut W) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", session.text())?;
    if session.is_at_ending() {
        writeln!(out, "  THE END  [r] replay  [q] quit")?;
    } else {
        for choice in session.choices() {
            let key = match choice.side {
                Side::Left => 1,
                Side::Right => 2,
            };
            writeln!(out, "  [{key}] {}", choice.label)?;
        }
        if session.can_go_back() {
            writeln!(out, "  [b] back")?;
        }
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
