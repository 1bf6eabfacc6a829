use pickem::config::Config;
use pickem::mode::WagerMode;
use pickem::props::{Prop, PropBoard};
use pickem::settle::{settle, validate_bet, Outcome, OutcomeSource};
use pickem::slip::{Pick, PickSlip, Side};
use pickem::store::{SlipRecord, UserStore, DEFAULT_BALANCE};
use pickem::Error;

struct Fixed(Outcome);

impl OutcomeSource for Fixed {
    fn decide(&mut self, _slip: &PickSlip) -> Outcome {
        self.0
    }
}

// Helper function to create a pick on its own line.
fn get_pick(index: usize, side: Side) -> Pick {
    Pick::new(
        Prop::new(format!("Player {index}"), "Points", "20.5"),
        side,
    )
}

fn get_full_slip() -> PickSlip {
    let mut slip = PickSlip::new();
    for index in 0..8 {
        slip.add(get_pick(index, Side::Over)).unwrap();
    }
    slip
}

fn get_board() -> PropBoard {
    PropBoard::new(vec![
        Prop::new("Jalen Brunson", "Points", "27.5"),
        Prop::new("Jalen Williams", "Points", "21.5"),
        Prop::new("Jaylen Brown", "Rebounds", "6.5"),
    ])
}

#[test]
fn test_ninth_pick_is_rejected() {
    let mut slip = get_full_slip();

    let result = slip.add(get_pick(8, Side::Over));

    assert!(matches!(result, Err(Error::SlipFull)));
    assert_eq!(slip.len(), 8);
}

#[test]
fn test_duplicate_pick_is_rejected() {
    let mut slip = PickSlip::new();
    slip.add(get_pick(0, Side::Over)).unwrap();

    let result = slip.add(get_pick(0, Side::Over));

    assert!(matches!(result, Err(Error::DuplicatePick { ref player, .. }) if player == "Player 0"));
    assert_eq!(slip.len(), 1);
}

#[test]
fn test_opposite_pick_is_rejected() {
    let mut slip = PickSlip::new();
    slip.add(get_pick(0, Side::Over)).unwrap();

    let result = slip.add(get_pick(0, Side::Under));

    assert!(matches!(result, Err(Error::OppositePick { .. })));
    assert_eq!(slip.picks()[0].side, Side::Over);
}

#[test]
fn test_full_slip_is_checked_before_duplicates() {
    let mut slip = get_full_slip();

    assert!(matches!(
        slip.add(get_pick(0, Side::Over)),
        Err(Error::SlipFull)
    ));
}

#[test]
fn test_remove_out_of_range() {
    let mut slip = PickSlip::new();
    slip.add(get_pick(0, Side::Over)).unwrap();

    assert!(matches!(
        slip.remove(1),
        Err(Error::PickIndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(slip.len(), 1);
}

#[test]
fn test_oversized_slip_fails_to_deserialize() {
    let picks: Vec<Pick> = (0..9).map(|i| get_pick(i, Side::Under)).collect();
    let json = serde_json::to_string(&picks).unwrap();

    assert!(serde_json::from_str::<PickSlip>(&json).is_err());
    assert!(PickSlip::try_from(picks).is_err());
}

#[test]
fn test_flex_needs_three_picks() {
    assert!(matches!(
        WagerMode::PowerPlay.toggled(2),
        Err(Error::FlexUnavailable { picks: 2 })
    ));
    assert!(matches!(
        WagerMode::PowerPlay.toggled(0),
        Err(Error::FlexUnavailable { picks: 0 })
    ));
}

#[test]
fn test_unknown_mode() {
    assert!(matches!(
        "parlay".parse::<WagerMode>(),
        Err(Error::UnknownMode(_))
    ));
}

#[test]
fn test_unknown_side() {
    assert!(matches!("sideways".parse::<Side>(), Err(Error::UnknownSide(_))));
}

#[test]
fn test_invalid_bets() {
    assert!(matches!(validate_bet(0.0, 100.0), Err(Error::InvalidBet(_))));
    assert!(matches!(validate_bet(-5.0, 100.0), Err(Error::InvalidBet(_))));
    assert!(matches!(validate_bet(f64::NAN, 100.0), Err(Error::InvalidBet(_))));
    assert!(matches!(
        validate_bet(f64::INFINITY, 100.0),
        Err(Error::InvalidBet(_))
    ));
    assert!(matches!(
        validate_bet(100.01, 100.0),
        Err(Error::InsufficientBalance { .. })
    ));
    assert!(validate_bet(100.0, 100.0).is_ok());
}

#[test]
fn test_settle_empty_slip() {
    let result = settle(
        &PickSlip::new(),
        WagerMode::PowerPlay,
        10.0,
        100.0,
        &mut Fixed(Outcome::Win),
    );

    assert!(matches!(result, Err(Error::EmptySlip)));
}

#[test]
fn test_settle_flex_below_three_picks() {
    let mut slip = PickSlip::new();
    slip.add(get_pick(0, Side::Over)).unwrap();
    slip.add(get_pick(1, Side::Under)).unwrap();

    let result = settle(
        &slip,
        WagerMode::Flex,
        10.0,
        100.0,
        &mut Fixed(Outcome::Win),
    );

    assert!(matches!(result, Err(Error::FlexUnavailable { picks: 2 })));
}

#[test]
fn test_settle_flex_after_removing_picks() {
    let mut slip = PickSlip::new();
    for index in 0..3 {
        slip.add(get_pick(index, Side::Over)).unwrap();
    }
    let mode = WagerMode::PowerPlay.toggled(slip.len()).unwrap();
    slip.remove(2).unwrap();

    assert!(matches!(
        settle(&slip, mode, 10.0, 100.0, &mut Fixed(Outcome::Loss)),
        Err(Error::FlexUnavailable { picks: 2 })
    ));
}

#[test]
fn test_settle_rejects_bet_over_balance() {
    let result = settle(
        &get_full_slip(),
        WagerMode::PowerPlay,
        500.0,
        100.0,
        &mut Fixed(Outcome::Win),
    );

    assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
}

#[test]
fn test_player_not_found() {
    assert!(matches!(
        get_board().select_player("Giannis"),
        Err(Error::PlayerNotFound(_))
    ));
    assert!(matches!(
        get_board().select_player("99"),
        Err(Error::PlayerNotFound(_))
    ));
}

#[test]
fn test_ambiguous_player() {
    let Err(Error::AmbiguousPlayer { candidates, .. }) = get_board().select_player("jalen") else {
        panic!("expected an ambiguous match");
    };

    assert_eq!(candidates, vec!["Jalen Brunson", "Jalen Williams"]);
}

#[test]
fn test_prop_not_found() {
    assert!(matches!(
        get_board().find_prop("brunson", "Assists"),
        Err(Error::PropNotFound { .. })
    ));
}

#[test]
fn test_malformed_pick() {
    let board = get_board();

    for input in ["brunson", "brunson|points", "brunson|points|27.5|over|extra", ""] {
        assert!(
            matches!(board.parse_pick(input), Err(Error::MalformedPick(ref s)) if s == input),
            "{input:?} should be malformed"
        );
    }
}

#[test]
fn test_pick_with_bad_parts() {
    let board = get_board();

    assert!(matches!(
        board.parse_pick("brunson|points|sideways"),
        Err(Error::UnknownSide(_))
    ));
    assert!(matches!(
        board.parse_pick("giannis|points|over"),
        Err(Error::PlayerNotFound(_))
    ));
    assert!(matches!(
        board.parse_pick("brunson|points|30.5|over"),
        Err(Error::PropNotFound { .. })
    ));
}

#[test]
fn test_invalid_props_csv() {
    let csv = "full_name,stat_name,stat_value\nJalen Brunson,Points\n";

    assert!(matches!(
        PropBoard::from_csv_reader(csv.as_bytes()),
        Err(Error::Csv(_))
    ));
    assert!(matches!(
        PropBoard::from_path("/nonexistent/pickem/props.csv"),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_invalid_props_json() {
    assert!(matches!(
        PropBoard::from_json("{\"player\": \"not a list\"}"),
        Err(Error::Json(_))
    ));
}

#[test]
fn test_missing_props_file() {
    assert!(matches!(
        PropBoard::from_path("/nonexistent/pickem/props.json"),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_invalid_config() {
    assert!(matches!(
        Config::from_yaml("starting_balance: [1, 2]"),
        Err(Error::Yaml(_))
    ));
}

#[test]
fn test_duplicate_username() {
    let path = std::env::temp_dir().join(format!("pickem-{}-duplicate.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut store = UserStore::open(&path).unwrap().with_hash_cost(4);
    store.register("testuser", "hunter2", "test@example.com").unwrap();

    assert!(matches!(
        store.register("TestUser", "hunter2", "other@example.com"),
        Err(Error::UserExists(_))
    ));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_wrong_password() {
    let path = std::env::temp_dir().join(format!("pickem-{}-password.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut store = UserStore::open(&path).unwrap().with_hash_cost(4);
    store.register("testuser", "hunter2", "").unwrap();

    assert!(matches!(
        store.authenticate("testuser", "hunter3"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        store.authenticate("testuser", ""),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        store.authenticate("nobody", "hunter2"),
        Err(Error::InvalidCredentials)
    ));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_account_without_password_cannot_log_in() {
    let path = std::env::temp_dir().join(format!("pickem-{}-nopassword.json", std::process::id()));
    std::fs::write(&path, r#"{"users": {"olduser": {"username": "olduser"}}}"#).unwrap();

    let store = UserStore::open(&path).unwrap();

    assert!(matches!(
        store.authenticate("olduser", ""),
        Err(Error::InvalidCredentials)
    ));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_failed_save_leaves_store_unchanged() {
    let dir = std::env::temp_dir().join(format!("pickem-{}-unwritable", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_file(&dir);

    let mut store = UserStore::open(dir.join("users.json"))
        .unwrap()
        .with_hash_cost(4);
    store.register("bob", "hunter2", "").unwrap();
    let slip = get_full_slip();
    let settlement = settle(
        &slip,
        WagerMode::PowerPlay,
        10.0,
        1000.0,
        &mut Fixed(Outcome::Win),
    )
    .unwrap();

    // the store's directory turns into a file, so every save fails
    std::fs::remove_dir_all(&dir).unwrap();
    std::fs::write(&dir, "").unwrap();

    assert!(matches!(
        store.update_balance("bob", 5.0),
        Err(Error::Io { .. })
    ));
    assert!(store.record_settlement("bob", &slip, &settlement).is_err());
    assert!(store
        .add_to_history("bob", SlipRecord::new(&slip, &settlement))
        .is_err());
    assert!(store.register("carol", "hunter2", "").is_err());

    let bob = store.get("bob").unwrap();
    assert_eq!(bob.balance, DEFAULT_BALANCE);
    assert!(bob.picks_history.is_empty());
    assert!(matches!(store.get("carol"), Err(Error::UserNotFound(_))));

    let _ = std::fs::remove_file(&dir);
}

#[test]
fn test_unknown_user() {
    let path = std::env::temp_dir().join(format!("pickem-{}-unknown.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut store = UserStore::open(&path).unwrap().with_hash_cost(4);

    assert!(matches!(store.get("nonexistent"), Err(Error::UserNotFound(_))));
    assert!(matches!(
        store.update_balance("nonexistent", 10.0),
        Err(Error::UserNotFound(_))
    ));
    assert!(matches!(
        store.history("nonexistent"),
        Err(Error::UserNotFound(_))
    ));
}
