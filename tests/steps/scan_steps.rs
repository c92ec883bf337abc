//! Behavioural steps for line scanning.
#![expect(clippy::expect_used, reason = "simplify test failure output")]

use cucumber::{World, given, then, when};
use lineconf::scan::{Flow, Line, LineKind, ScanError, ScannedFile, scan_reader};

#[derive(Debug, Default, World)]
pub struct ScanWorld {
    text: Option<String>,
    seen: Vec<String>,
    result: Option<Result<ScannedFile, ScanError>>,
}

impl ScanWorld {
    fn scan_with<F>(&mut self, prefix: &str, mut decide: F)
    where
        F: FnMut(usize, &Line) -> Result<Flow, String>,
    {
        let text = self.text.clone().expect("text set by a given step");
        let mut seen = Vec::new();
        let result = scan_reader("scenario", text.as_bytes(), prefix, |line| {
            seen.push(line.text().to_owned());
            decide(seen.len(), line)
        });
        self.seen = seen;
        self.result = Some(result);
    }

    fn scanned(&self) -> &ScannedFile {
        match &self.result {
            Some(Ok(file)) => file,
            other => panic!("expected a successful scan, got {other:?}"),
        }
    }
}

#[given(regex = r#"^the text "(.*)"$"#)]
fn the_text(world: &mut ScanWorld, text: String) {
    world.text = Some(text.replace("\\n", "\n"));
}

#[when(regex = r#"^it is scanned with comment prefix "([^"]+)"$"#)]
fn scanned_with_prefix(world: &mut ScanWorld, prefix: String) {
    world.scan_with(&prefix, |_, _| Ok(Flow::Continue));
}

#[when(regex = r#"^it is scanned with comment prefix "([^"]+)" stopping at value line (\d+)$"#)]
fn scanned_stopping(world: &mut ScanWorld, prefix: String, stop_at: usize) {
    world.scan_with(&prefix, |n, _| {
        Ok(if n == stop_at { Flow::Stop } else { Flow::Continue })
    });
}

#[when(regex = r#"^it is scanned with comment prefix "([^"]+)" failing on "([^"]+)"$"#)]
fn scanned_failing(world: &mut ScanWorld, prefix: String, bad: String) {
    world.scan_with(&prefix, |_, line| {
        if line.text() == bad {
            Err(format!("cannot handle {bad}"))
        } else {
            Ok(Flow::Continue)
        }
    });
}

#[then(regex = r#"^the line kinds are "(.+)"$"#)]
fn line_kinds_are(world: &mut ScanWorld, expected: String) {
    let kinds: Vec<&str> = world
        .scanned()
        .lines()
        .iter()
        .map(|l| match l.kind() {
            LineKind::Empty => "Empty",
            LineKind::Comment => "Comment",
            LineKind::Value => "Value",
        })
        .collect();
    assert_eq!(kinds.join(", "), expected);
}

#[then(regex = r#"^the callback saw "(.+)"$"#)]
fn callback_saw(world: &mut ScanWorld, expected: String) {
    assert_eq!(world.seen.join(", "), expected);
}

#[then(regex = r"^the ordinals run from 0 to (\d+)$")]
fn ordinals_run(world: &mut ScanWorld, last: usize) {
    let ordinals: Vec<usize> = world.scanned().lines().iter().map(Line::ordinal).collect();
    assert_eq!(ordinals, (0..=last).collect::<Vec<_>>());
}

#[then(regex = r"^the scan succeeds with (\d+) lines$")]
fn scan_succeeds_with(world: &mut ScanWorld, count: usize) {
    assert_eq!(world.scanned().len(), count);
}

#[then(regex = r"^the scan fails at line (\d+)$")]
fn scan_fails_at(world: &mut ScanWorld, expected: usize) {
    match world.result.take() {
        Some(Err(ScanError::Callback { ordinal, .. })) => assert_eq!(ordinal, expected),
        other => panic!("expected callback failure, got {other:?}"),
    }
}
