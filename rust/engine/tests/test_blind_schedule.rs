use rentpoker_engine::blinds::{round_to_top_digit, BlindSchedule, Stakes};

#[test]
fn six_player_default_schedule() {
    let s = BlindSchedule::for_table(300, 2, 6, 2000);
    assert_eq!(s.big_blinds(), &[3, 6, 10, 30, 50, 70, 90, 100, 300, 500]);
    assert_eq!(s.level_step(), 200);
}

#[test]
fn levels_advance_every_tenth_of_the_budget_and_cap_at_ten() {
    let s = BlindSchedule::for_table(300, 2, 6, 2000);
    assert_eq!(s.level_for(0), 1);
    assert_eq!(s.level_for(199), 1);
    assert_eq!(s.level_for(200), 2);
    assert_eq!(s.level_for(1999), 10);
    assert_eq!(s.level_for(50_000), 10);
    assert_eq!(
        s.stakes_for(200),
        Stakes {
            level: 2,
            small_blind: 3,
            big_blind: 6
        }
    );
    assert_eq!(s.stakes_for(9_999).small_blind, 250);
}

#[test]
fn tiny_budgets_advance_every_hand() {
    let s = BlindSchedule::for_table(300, 2, 6, 5);
    assert_eq!(s.level_step(), 1);
    assert_eq!(s.level_for(3), 4);
}

#[test]
fn big_blinds_never_fall_below_one() {
    let s = BlindSchedule::from_total_chips(20, 100);
    assert!(s.big_blinds().iter().all(|&bb| bb >= 1));
    assert_eq!(s.stakes_for(0).small_blind, 1);
}

#[test]
fn rounding_keeps_one_significant_digit() {
    assert_eq!(round_to_top_digit(250), 300);
    assert_eq!(round_to_top_digit(249), 200);
    assert_eq!(round_to_top_digit(10), 10);
}
