//! Plain-text score listing, one line per composed cell.

use std::fmt::Write;

use crate::composition::Composition;

/// Renders a composition as aligned text.
///
/// ```text
/// chorus  chord   route   pitches
///      1  Am      seed    A4 B4 C5 E5
///      1  D7      last    F#4 E4 D4 A4
/// ```
pub fn render_listing(composition: &Composition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<6}  {:<6}  pitches", "chorus", "chord", "route");
    for cell in composition.cells() {
        let _ = writeln!(
            out,
            "{:>6}  {:<6}  {:<6}  {}",
            cell.chorus + 1,
            cell.chord.to_string(),
            cell.route.as_str(),
            cell.cell
        );
    }
    out
}
