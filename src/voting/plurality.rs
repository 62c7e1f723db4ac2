use crate::models::Tally;
use crate::voting::VoteSummary;
use std::collections::BTreeMap;

pub fn total(counts: &BTreeMap<String, u64>) -> u64 {
    counts.values().sum()
}

/// Each team's share of the votes, rounded to one decimal. All zero when nobody has voted.
pub fn percentages(counts: &BTreeMap<String, u64>) -> BTreeMap<String, f64> {
    let total = total(counts);
    counts
        .iter()
        .map(|(team, votes)| {
            let pct = if total == 0 {
                0.0
            } else {
                round1(*votes as f64 * 100.0 / total as f64)
            };
            (team.clone(), pct)
        })
        .collect()
}

pub fn summarize(tally: &Tally) -> VoteSummary {
    let matchup = &tally.matchup;
    let percentages = percentages(&tally.counts);
    let pct_of = |team: &str| percentages.get(team).copied().unwrap_or(0.0);

    let home_votes = tally.count_for(&matchup.home_team);
    let away_votes = tally.count_for(&matchup.away_team);
    let leader = match home_votes.cmp(&away_votes) {
        std::cmp::Ordering::Greater => Some(matchup.home_team.clone()),
        std::cmp::Ordering::Less => Some(matchup.away_team.clone()),
        std::cmp::Ordering::Equal => None,
    };

    VoteSummary {
        game_id: matchup.id.clone(),
        home_team: matchup.home_team.clone(),
        away_team: matchup.away_team.clone(),
        home_team_percent: pct_of(&matchup.home_team),
        away_team_percent: pct_of(&matchup.away_team),
        total: total(&tally.counts),
        votes: tally.counts.clone(),
        percentages,
        leader,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Matchup;

    fn tally(home: u64, away: u64) -> Tally {
        let mut t = Tally::empty(Matchup::new("g1", "Georgia Tech", "Clemson"));
        t.counts.insert("Georgia Tech".into(), home);
        t.counts.insert("Clemson".into(), away);
        t
    }

    #[test]
    fn no_votes_means_zero_percent_and_no_leader() {
        let summary = summarize(&tally(0, 0));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.home_team_percent, 0.0);
        assert_eq!(summary.away_team_percent, 0.0);
        assert_eq!(summary.leader, None);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let summary = summarize(&tally(1, 2));
        assert_eq!(summary.home_team_percent, 33.3);
        assert_eq!(summary.away_team_percent, 66.7);
        assert_eq!(summary.leader.as_deref(), Some("Clemson"));
        let sum = summary.home_team_percent + summary.away_team_percent;
        assert!((sum - 100.0).abs() <= 0.1);
    }

    #[test]
    fn matches_the_prototype_split() {
        let summary = summarize(&tally(49, 51));
        assert_eq!(summary.home_team_percent, 49.0);
        assert_eq!(summary.away_team_percent, 51.0);
        assert_eq!(summary.total, 100);
    }
}
