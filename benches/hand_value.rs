use std::hint::black_box;

use blackjack_table::cards::parse_cards;
use blackjack_table::deck::{Deck, DeckConfig, ShuffleMode};
use blackjack_table::hand::Hand;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_hand_value(c: &mut Criterion) {
    let mut g = c.benchmark_group("hand_value");
    for (name, cards) in [("hard", "10h 7c"), ("soft", "Ah 6c"), ("four_aces", "Ah Ad Ac As 7h")] {
        let hand = Hand::from_cards(parse_cards(cards).unwrap_or_default());
        g.bench_with_input(BenchmarkId::new("value", name), &hand, |b, input| {
            b.iter(|| black_box(input).value())
        });
    }
    g.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let mut g = c.benchmark_group("shuffle");
    for (name, mode) in [("fisher_yates", ShuffleMode::FisherYates), ("legacy", ShuffleMode::Legacy)] {
        let mut deck = Deck::new(&DeckConfig::default().with_decks(6).with_shuffle(mode).with_seed(1));
        g.bench_function(name, |b| b.iter(|| deck.shuffle()));
    }
    g.finish();
}

criterion_group!(benches, bench_hand_value, bench_shuffle);
criterion_main!(benches);
