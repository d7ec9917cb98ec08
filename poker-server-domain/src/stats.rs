use std::{cmp::Ordering, str::FromStr};

use serde::Serialize;

use crate::{
    ServiceError,
    game_record::GameRecord,
    player::{Player, PlayerId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    WinRate,
    TotalGames,
    Wins,
    TotalScore,
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win_rate" => Ok(SortField::WinRate),
            "total_games" => Ok(SortField::TotalGames),
            "wins" => Ok(SortField::Wins),
            "total_score" => Ok(SortField::TotalScore),
            _ => Err(ServiceError::BadRequest("Invalid sort field".to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(ServiceError::BadRequest("Invalid sort order".to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_games: i64,
    pub wins: i64,
    pub total_score: i64,
    pub win_rate: f64,
    pub rank: u32,
}

/// Aggregates settled records into per-player statistics.
///
/// Every registered player appears in the output, including players with no
/// settled games. A win is occupancy of slot 1 or 2 in a settled record;
/// the record's result type is not consulted (slots 1/2 are credited even
/// for a DRAW).
pub fn compute_player_stats(
    players: &[Player],
    settled_records: &[GameRecord],
    sort_by: SortField,
    order: SortOrder,
) -> Vec<PlayerStats> {
    // Win rate in basis points; keeps ranking and sorting off float equality.
    let mut rate_bp = Vec::with_capacity(players.len());
    let mut stats: Vec<PlayerStats> = players
        .iter()
        .map(|player| {
            let mut total_games = 0;
            let mut wins = 0;
            let mut total_score = 0;
            for record in settled_records {
                let slots = record.slots();
                let occupied: Vec<usize> = (0..slots.len())
                    .filter(|&i| slots[i].player_id == player.id)
                    .collect();
                if occupied.is_empty() {
                    continue;
                }
                // A record counts once even if the same player fills
                // several slots, but every occupied slot's score counts.
                total_games += 1;
                if occupied.iter().any(|&i| i < 2) {
                    wins += 1;
                }
                total_score += occupied.iter().map(|&i| slots[i].final_score).sum::<i64>();
            }
            let bp = if total_games == 0 {
                0
            } else {
                ((wins as f64) * 10_000.0 / (total_games as f64)).round() as i64
            };
            rate_bp.push(bp);
            PlayerStats {
                player_id: player.id,
                player_name: player.name.clone(),
                total_games,
                wins,
                total_score,
                win_rate: bp as f64 / 100.0,
                rank: 0,
            }
        })
        .collect();

    // Dense rank by win rate, ties share a rank, independent of the
    // requested output order.
    let mut distinct_rates = rate_bp.clone();
    distinct_rates.sort_unstable_by(|a, b| b.cmp(a));
    distinct_rates.dedup();
    for (stat, bp) in stats.iter_mut().zip(&rate_bp) {
        stat.rank = distinct_rates.iter().position(|r| r == bp).unwrap_or(0) as u32 + 1;
    }

    stats.sort_by(|a, b| {
        let ordering = match sort_by {
            SortField::WinRate => a
                .win_rate
                .partial_cmp(&b.win_rate)
                .unwrap_or(Ordering::Equal),
            SortField::TotalGames => a.total_games.cmp(&b.total_games),
            SortField::Wins => a.wins.cmp(&b.wins),
            SortField::TotalScore => a.total_score.cmp(&b.total_score),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    stats
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::game_record::{GameResultType, SettlementStatus};

    fn timestamp() -> NaiveDateTime {
        "2024-03-01T19:30:00".parse().unwrap()
    }

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            avatar: None,
            created_at: timestamp(),
        }
    }

    fn settled_record(
        id: i64,
        players: [PlayerId; 4],
        final_scores: [i64; 4],
        result: GameResultType,
    ) -> GameRecord {
        GameRecord {
            id,
            player1_id: players[0],
            player2_id: players[1],
            player3_id: players[2],
            player4_id: players[3],
            player1_bomb_score: 0,
            player2_bomb_score: 0,
            player3_bomb_score: 0,
            player4_bomb_score: 0,
            player1_final_score: final_scores[0],
            player2_final_score: final_scores[1],
            player3_final_score: final_scores[2],
            player4_final_score: final_scores[3],
            game_result_type: result,
            settlement_status: SettlementStatus::Settled,
            created_at: timestamp(),
            updated_at: timestamp(),
            remarks: None,
        }
    }

    fn stats_for(stats: &[PlayerStats], id: PlayerId) -> &PlayerStats {
        stats.iter().find(|s| s.player_id == id).unwrap()
    }

    #[test]
    fn player_without_games_has_zero_win_rate() {
        let players = vec![player(1, "a"), player(2, "b")];
        let records = vec![settled_record(
            1,
            [2, 2, 2, 2],
            [0, 0, 0, 0],
            GameResultType::DoubleWin,
        )];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        let idle = stats_for(&stats, 1);
        assert_eq!(idle.total_games, 0);
        assert_eq!(idle.win_rate, 0.0);
    }

    #[test]
    fn first_partnership_slots_count_as_wins() {
        let players: Vec<Player> = (1..=4).map(|i| player(i, &format!("p{i}"))).collect();
        let records = vec![settled_record(
            1,
            [1, 2, 3, 4],
            [10, 10, -10, -10],
            GameResultType::DoubleWin,
        )];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        for id in [1, 2] {
            let s = stats_for(&stats, id);
            assert_eq!((s.total_games, s.wins), (1, 1));
            assert_eq!(s.win_rate, 100.0);
            assert_eq!(s.rank, 1);
        }
        for id in [3, 4] {
            let s = stats_for(&stats, id);
            assert_eq!((s.total_games, s.wins), (1, 0));
            assert_eq!(s.win_rate, 0.0);
            assert_eq!(s.rank, 2);
        }
    }

    // The win count never consults the result type, so a DRAW still
    // credits the slot-1/2 pair.
    #[test]
    fn draw_counts_as_win_for_first_partnership() {
        let players: Vec<Player> = (1..=4).map(|i| player(i, &format!("p{i}"))).collect();
        let records = vec![settled_record(
            1,
            [1, 2, 3, 4],
            [0, 0, 0, 0],
            GameResultType::Draw,
        )];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        assert_eq!(stats_for(&stats, 1).wins, 1);
        assert_eq!(stats_for(&stats, 3).wins, 0);
    }

    #[test]
    fn win_rate_rounds_to_two_decimals() {
        let players = vec![player(1, "a")];
        let records = vec![
            settled_record(1, [1, 9, 9, 9], [5, 0, 0, 0], GameResultType::SingleWin),
            settled_record(2, [9, 9, 1, 9], [0, 0, -5, 0], GameResultType::SingleWin),
            settled_record(3, [9, 9, 9, 1], [0, 0, 0, -5], GameResultType::SingleWin),
        ];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        assert_eq!(stats[0].total_games, 3);
        assert_eq!(stats[0].wins, 1);
        assert_eq!(stats[0].win_rate, 33.33);
        assert_eq!(stats[0].total_score, -5);
    }

    #[test]
    fn duplicate_slots_count_one_game_but_sum_all_scores() {
        let players = vec![player(1, "a")];
        let records = vec![settled_record(
            1,
            [1, 1, 2, 2],
            [10, 15, -10, -15],
            GameResultType::DoubleWin,
        )];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        assert_eq!(stats[0].total_games, 1);
        assert_eq!(stats[0].wins, 1);
        assert_eq!(stats[0].total_score, 25);
    }

    #[test]
    fn dense_rank_shares_and_does_not_skip() {
        let players: Vec<Player> = (1..=4).map(|i| player(i, &format!("p{i}"))).collect();
        // Players 1 and 2 win their only game, 3 and 4 lose theirs.
        let records = vec![
            settled_record(1, [1, 2, 3, 4], [8, 8, -8, -8], GameResultType::DoubleWin),
            settled_record(2, [1, 2, 3, 4], [4, 4, -4, -4], GameResultType::SingleWin),
        ];
        let stats =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        let ranks: Vec<u32> = stats.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 1, 2, 2]);
    }

    #[test]
    fn sorting_follows_requested_field_and_order() {
        let players: Vec<Player> = (1..=4).map(|i| player(i, &format!("p{i}"))).collect();
        let records = vec![
            settled_record(1, [1, 2, 3, 4], [6, 6, -6, -6], GameResultType::DoubleWin),
            settled_record(2, [3, 1, 2, 4], [2, 2, -2, -2], GameResultType::SingleWin),
        ];

        let desc =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Descending);
        let rates: Vec<f64> = desc.iter().map(|s| s.win_rate).collect();
        assert!(rates.windows(2).all(|w| w[0] >= w[1]));

        let asc =
            compute_player_stats(&players, &records, SortField::WinRate, SortOrder::Ascending);
        let rates: Vec<f64> = asc.iter().map(|s| s.win_rate).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));

        let by_score =
            compute_player_stats(&players, &records, SortField::TotalScore, SortOrder::Descending);
        let scores: Vec<i64> = by_score.iter().map(|s| s.total_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        // Rank stays pinned to win rate regardless of the sort field.
        assert_eq!(stats_for(&by_score, 1).rank, 1);
    }

    #[test]
    fn sort_parameters_reject_unknown_values() {
        assert!("win_rate".parse::<SortField>().is_ok());
        assert!("winRate".parse::<SortField>().is_err());
        assert!("asc".parse::<SortOrder>().is_ok());
        assert!("descending".parse::<SortOrder>().is_err());
    }
}
