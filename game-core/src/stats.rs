use game_types::User;

/// Default number of entries a leaderboard returns.
pub const LEADERBOARD_LIMIT: usize = 20;

/// End-of-game accounting for a won game. Runs exactly once per game
/// conclusion, atomically with the score record (the persistence layer
/// wraps both in one transaction).
pub fn record_win(user: &mut User, move_count: u32) {
    user.wins += 1;
    user.total_played += 1;
    let move_count = move_count as i32;
    if move_count < user.best_move_count {
        user.best_move_count = move_count;
    }
}

/// End-of-game accounting for a lost (cancelled) game.
pub fn record_loss(user: &mut User) {
    user.total_played += 1;
}

/// Users ranked by wins, descending. The sort is stable, so ties keep their
/// input order.
pub fn top_by_wins(mut users: Vec<User>, limit: usize) -> Vec<User> {
    users.sort_by(|a, b| b.wins.cmp(&a.wins));
    users.truncate(limit);
    users
}

/// Users ranked by best move count, ascending. Users who never won carry the
/// sentinel maximum and therefore sort last.
pub fn top_by_best_move_count(mut users: Vec<User>, limit: usize) -> Vec<User> {
    users.sort_by(|a, b| a.best_move_count.cmp(&b.best_move_count));
    users.truncate(limit);
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::BEST_MOVE_SENTINEL;

    fn user(name: &str, wins: i32, total_played: i32, best_move_count: i32) -> User {
        User {
            wins,
            total_played,
            best_move_count,
            ..User::new(name, None)
        }
    }

    #[test]
    fn test_record_win_updates_all_counters() {
        let mut alice = User::new("alice", None);
        record_win(&mut alice, 40);
        assert_eq!(alice.wins, 1);
        assert_eq!(alice.total_played, 1);
        assert_eq!(alice.best_move_count, 40);

        // A slower win keeps the best count; a faster one lowers it.
        record_win(&mut alice, 60);
        assert_eq!(alice.best_move_count, 40);
        record_win(&mut alice, 25);
        assert_eq!(alice.best_move_count, 25);
        assert_eq!(alice.wins, 3);
        assert_eq!(alice.total_played, 3);
    }

    #[test]
    fn test_record_loss_only_counts_the_game() {
        let mut bob = User::new("bob", None);
        record_loss(&mut bob);
        assert_eq!(bob.total_played, 1);
        assert_eq!(bob.wins, 0);
        assert_eq!(bob.best_move_count, BEST_MOVE_SENTINEL);
    }

    #[test]
    fn test_top_by_wins_orders_and_truncates() {
        let users = vec![
            user("carol", 2, 5, 80),
            user("alice", 7, 9, 30),
            user("bob", 4, 4, 55),
        ];
        let ranked = top_by_wins(users, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "alice");
        assert_eq!(ranked[1].name, "bob");
    }

    #[test]
    fn test_top_by_wins_ties_are_stable() {
        let users = vec![
            user("first", 3, 3, 10),
            user("second", 3, 6, 20),
            user("third", 1, 1, 30),
        ];
        let ranked = top_by_wins(users, LEADERBOARD_LIMIT);
        assert_eq!(ranked[0].name, "first");
        assert_eq!(ranked[1].name, "second");
        assert_eq!(ranked[2].name, "third");
    }

    #[test]
    fn test_top_by_best_move_count_puts_winless_users_last() {
        let users = vec![
            user("never-won", 0, 2, BEST_MOVE_SENTINEL),
            user("fast", 1, 1, 12),
            user("slow", 5, 8, 50),
        ];
        let ranked = top_by_best_move_count(users, LEADERBOARD_LIMIT);
        assert_eq!(ranked[0].name, "fast");
        assert_eq!(ranked[1].name, "slow");
        assert_eq!(ranked[2].name, "never-won");
    }

    #[test]
    fn test_leaderboards_cap_at_limit_for_any_population() {
        let users: Vec<User> = (0..50).map(|i| user(&format!("u{i}"), i, i, 100 - i)).collect();
        assert_eq!(top_by_wins(users.clone(), LEADERBOARD_LIMIT).len(), 20);
        assert_eq!(
            top_by_best_move_count(users, LEADERBOARD_LIMIT).len(),
            20
        );
    }
}
