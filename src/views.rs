//! Plain string-built pages. Every interpolated value goes through `escape`.

use crate::models::GameWithVotes;
use crate::voting::VoteSummary;
use std::fmt::Write;

const VOTE_SCRIPT: &str = r#"
function vote(gameId, domId, teamId) {
  fetch('/vote', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ game_id: gameId, team_id: teamId })
  })
  .then(r => r.json())
  .then(data => {
    if (!data.success) { console.error('Vote failed:', data.message); return; }
    document.querySelector('#homePercent-' + CSS.escape(domId)).innerText = data.home_team_percent.toFixed(1) + '%';
    document.querySelector('#awayPercent-' + CSS.escape(domId)).innerText = data.away_team_percent.toFixed(1) + '%';
  })
  .catch(err => console.error('Vote request failed:', err));
}
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes for a single-quoted JS string inside an HTML attribute.
fn js_arg(text: &str) -> String {
    escape(&text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n\
         <div class=\"header\"><a class=\"logo\" href=\"/\">VCL</a> <a href=\"/games\">Games</a> <a href=\"/shop\">Shop</a></div>\n\
         {}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn summary_block(out: &mut String, s: &VoteSummary) {
    let _ = write!(
        out,
        "<div class=\"matchup\"><div class=\"team\">{} <span class=\"votes\">{}</span> <span class=\"vote-percent\">{:.1}%</span></div>\
         <div class=\"team\">{} <span class=\"votes\">{}</span> <span class=\"vote-percent\">{:.1}%</span></div>\
         <div class=\"total\">{} votes</div></div>\n",
        escape(&s.away_team),
        s.votes.get(&s.away_team).copied().unwrap_or(0),
        s.away_team_percent,
        escape(&s.home_team),
        s.votes.get(&s.home_team).copied().unwrap_or(0),
        s.home_team_percent,
        s.total,
    );
}

pub fn home_page(tallies: &[VoteSummary]) -> String {
    let mut body = String::from("<h1>VCL Pick'Em</h1>\n");
    if tallies.is_empty() {
        body.push_str("<p>No votes yet. Pick a winner on the <a href=\"/games\">games</a> page.</p>\n");
    }
    for summary in tallies {
        summary_block(&mut body, summary);
    }
    layout("VCL Pick'Em", &body)
}

pub fn games_page(games: &[GameWithVotes]) -> String {
    let mut body = String::from("<h1>This Week's Games</h1>\n<div id=\"gamesContainer\">\n");
    if games.is_empty() {
        body.push_str("<p>No games scheduled in this window.</p>\n");
    }
    for g in games {
        let game = &g.game;
        let dom = escape(&g.dom_id);
        let id_arg = js_arg(&game.id);
        let dom_arg = js_arg(&g.dom_id);
        let _ = write!(
            body,
            "<div class=\"matchup\" id=\"game-{dom}\">\
             <div class=\"timer\">{} {}</div>\
             <div class=\"team\"><button onclick=\"vote('{id_arg}', '{dom_arg}', '{}')\">{}</button> \
             <span class=\"vote-percent\" id=\"awayPercent-{dom}\">{:.1}%</span></div>\
             <div class=\"team\"><button onclick=\"vote('{id_arg}', '{dom_arg}', '{}')\">{}</button> \
             <span class=\"vote-percent\" id=\"homePercent-{dom}\">{:.1}%</span></div>",
            escape(&game.date),
            escape(&game.time),
            js_arg(&game.away_team),
            escape(&game.away_team),
            g.votes.away_team_percent,
            js_arg(&game.home_team),
            escape(&game.home_team),
            g.votes.home_team_percent,
        );
        if !game.venue.is_empty() {
            let _ = write!(body, "<div class=\"venue\">{}</div>", escape(&game.venue));
        }
        body.push_str("</div>\n");
    }
    body.push_str("</div>\n<script>");
    body.push_str(VOTE_SCRIPT);
    body.push_str("</script>\n");
    layout("VCL Pick'Em - Games", &body)
}

pub fn shop_page() -> String {
    layout(
        "VCL Shop",
        "<h1>Shop</h1>\n<p>Team gear is coming soon.</p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Matchup, Tally};
    use crate::voting::summarize;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn home_page_lists_tallies_escaped() {
        let mut tally = Tally::empty(Matchup::new("g1", "Texas A&M", "<Rice>"));
        tally.counts.insert("Texas A&M".into(), 3);
        tally.counts.insert("<Rice>".into(), 1);
        let html = home_page(&[summarize(&tally)]);
        assert!(html.contains("Texas A&amp;M"));
        assert!(html.contains("&lt;Rice&gt;"));
        assert!(html.contains("75.0%"));
        assert!(html.contains("25.0%"));
        assert!(!html.contains("<Rice>"));
    }

    #[test]
    fn empty_pages_say_so() {
        assert!(home_page(&[]).contains("No votes yet"));
        assert!(games_page(&[]).contains("No games scheduled"));
        assert!(shop_page().contains("<h1>Shop</h1>"));
    }
}
