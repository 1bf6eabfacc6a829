use pickem::payout::{self, PayoutSummary};
use pickem::props::{Prop, PropBoard};
use pickem::slip::{Pick, PickSlip, Side};

fn main() {
    divan::main();
}

#[divan::bench(args = [0, 1, 5, 8, 9])]
fn bench_fixed_odds_payout(n: i32) {
    divan::black_box(payout::fixed_odds_payout(divan::black_box(n)));
}

#[divan::bench(args = [0, 1, 2, 3])]
fn bench_flex_payout(misses: i32) {
    divan::black_box(payout::flex_payout(
        divan::black_box(7),
        divan::black_box(misses),
    ));
}

#[divan::bench]
fn bench_payout_summary() {
    divan::black_box(PayoutSummary::for_picks(divan::black_box(6)));
}

#[divan::bench]
fn bench_payout_table() {
    divan::black_box(payout::payout_table());
}

#[divan::bench]
fn bench_fill_slip() {
    let props: Vec<Prop> = (0..8)
        .map(|i| Prop::new(format!("Player {i}"), "Points", "20.5"))
        .collect();

    let mut slip = PickSlip::new();
    for prop in props {
        let _ = slip.add(Pick::new(prop, Side::Over));
    }
    divan::black_box(slip.payouts());
}

#[divan::bench]
fn bench_select_player() {
    let board = PropBoard::new(
        (0..200)
            .map(|i| Prop::new(format!("Player {i:03}"), "Points", "20.5"))
            .collect(),
    );

    divan::black_box(board.select_player(divan::black_box("player 150")).ok());
}
