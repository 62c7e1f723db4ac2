use crate::models::Game;
use std::io::{self, Write};

const HEADERS: [&str; 7] = ["Date", "Time", "Away", "Home", "Venue", "Result", "Id"];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

/// Header row followed by one line per game.
pub fn write_csv<W: Write>(mut w: W, games: &[Game]) -> io::Result<()> {
    write_row(&mut w, &HEADERS)?;
    for g in games {
        write_row(
            &mut w,
            &[
                g.date.as_str(),
                g.time.as_str(),
                g.away_team.as_str(),
                g.home_team.as_str(),
                g.venue.as_str(),
                g.result.as_str(),
                g.id.as_str(),
            ],
        )?;
    }
    w.flush()
}
