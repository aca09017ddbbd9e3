use crate::card::*;
use crate::column::Column;
use crate::deck;
use crate::error::{MoveError, RejectReason};
use crate::game::{DrawMode, Game, GameEvent, StockAction};
use crate::layout::{resolve_drop_target, Rect};
use crate::moves::{AutoMove, DropOutcome};
use crate::pile::{Pile, PileId, NUM_COLUMNS};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

pub fn is_valid_game_state(game: &Game) -> bool {
    let mut seen = [false; NUM_CARDS_DECK];
    let all_cards = game
        .snapshot()
        .piles
        .into_iter()
        .flat_map(|pile| pile.cards.into_iter().map(|view| view.card))
        .chain(game.held().iter().copied());
    for card in all_cards {
        let slot = &mut seen[card.index() as usize];
        if *slot {
            return false;
        }
        *slot = true;
    }
    game.card_count() == NUM_CARDS_DECK && seen.iter().all(|&present| present)
}

pub fn assert_invariants(game: &Game) {
    assert!(is_valid_game_state(game), "cards lost or duplicated:{}", game);

    for idx in 0..4 {
        let mut top = None;
        for &card in game.foundation(idx).cards() {
            assert!(
                can_be_built_on_foundation(top, card),
                "foundation {} out of order: {:?}",
                idx + 1,
                game.foundation(idx)
            );
            top = Some(card);
        }
    }

    for idx in 0..NUM_COLUMNS {
        let column = game.column(idx);
        for pair in column.revealed().cards().windows(2) {
            assert!(
                can_be_placed_on_top_of(pair[0], pair[1]),
                "column {} does not alternate: {:?}",
                idx + 1,
                column.revealed()
            );
        }
        if !game.transfer().is_active() {
            assert!(!column.needs_reveal(), "column {} left face down", idx + 1);
        }
    }

    let complete = (0..4).all(|idx| game.foundation(idx).len() == 13);
    assert_eq!(game.is_won(), complete);
}

fn clear_table(game: &mut Game) {
    game.stock.clear();
    game.waste.clear();
    game.foundations.iter_mut().for_each(Pile::clear);
    game.columns.iter_mut().for_each(Column::clear);
}

fn dealt(seed: u64, mode: DrawMode) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new();
    game.new_game_with_deck(mode, deck::shuffled_with(&mut rng));
    game
}

/// Every card on the foundations except the king of hearts, which is on
/// the waste.
fn nearly_won() -> Game {
    let mut game = Game::new();
    game.new_game_with_deck(DrawMode::Three, deck::standard_set());
    clear_table(&mut game);
    for (idx, &suit) in Suit::ALL.iter().enumerate() {
        for rank in ACE..=KING {
            if suit == Suit::Hearts && rank == KING {
                continue;
            }
            game.foundations[idx].push(Card::new(rank, suit));
        }
    }
    game.waste.push(Card::new(KING, Suit::Hearts));
    game
}

#[test]
fn deal_follows_the_diagonal_order() {
    let cards = deck::standard_set();
    let mut game = Game::new();
    game.new_game_with_deck(DrawMode::One, cards.clone());

    assert_invariants(&game);
    assert_eq!(game.column(0).hidden().len(), 0);
    assert_eq!(game.column(0).revealed().cards(), &[cards[51]]);
    assert_eq!(game.column(1).hidden().cards(), &[cards[50]]);
    assert_eq!(game.column(1).revealed().cards(), &[cards[44]]);

    let column = game.column(6);
    assert_eq!(column.hidden().len(), 6);
    assert_eq!(column.revealed().len(), 1);
    let expected: Vec<Card> = [45, 39, 34, 30, 27, 25].iter().map(|&i| cards[i]).collect();
    assert_eq!(column.hidden().cards(), expected.as_slice());
    assert_eq!(column.revealed().top(), Some(cards[24]));

    assert_eq!(game.pile(PileId::Stock).cards(), &cards[..24]);
    assert!(game.pile(PileId::Waste).is_empty());
    for idx in 0..NUM_COLUMNS {
        assert_eq!(game.column(idx).len(), idx + 1);
    }
}

#[test]
fn seeded_shuffles_repeat() {
    let first = deck::shuffled_with(&mut StdRng::seed_from_u64(7));
    let second = deck::shuffled_with(&mut StdRng::seed_from_u64(7));
    assert_eq!(first, second);
    let mut sorted = first.clone();
    sorted.sort_by_key(|card| card.index());
    assert_eq!(sorted, deck::standard_set());
}

#[test]
#[should_panic(expected = "appears twice")]
fn dealing_a_duplicate_card_panics() {
    let mut cards = deck::standard_set();
    cards[0] = cards[1];
    Game::new().new_game_with_deck(DrawMode::One, cards);
}

#[test]
fn draw_three_cycles_through_the_stock() {
    let cards = deck::standard_set();
    let mut game = Game::new();
    game.new_game_with_deck(DrawMode::Three, cards.clone());
    let stock_before = game.pile(PileId::Stock).cards().to_vec();

    assert_eq!(
        game.draw(),
        StockAction::Drawn(vec![cards[23], cards[22], cards[21]])
    );
    assert_eq!(game.pile(PileId::Stock).len(), 21);
    assert_eq!(game.pile(PileId::Waste).len(), 3);
    assert_eq!(game.pile(PileId::Waste).top(), Some(cards[21]));

    for _ in 0..7 {
        assert!(matches!(game.draw(), StockAction::Drawn(drawn) if drawn.len() == 3));
    }
    assert!(game.pile(PileId::Stock).is_empty());
    assert_eq!(game.pile(PileId::Waste).len(), 24);

    assert_eq!(game.draw(), StockAction::Recycled(24));
    assert!(game.pile(PileId::Waste).is_empty());
    assert_eq!(game.pile(PileId::Stock).cards(), stock_before.as_slice());
    assert_invariants(&game);
}

#[test]
fn draw_takes_what_is_left() {
    let mut game = Game::new();
    game.new_game_with_deck(DrawMode::Three, deck::standard_set());
    game.stock.split_off(2);
    assert!(matches!(game.draw(), StockAction::Drawn(drawn) if drawn.len() == 2));
    game.waste.clear();
    assert_eq!(game.draw(), StockAction::NoOp);
}

#[test]
fn ace_goes_to_foundation_once() {
    let mut game = Game::new();
    let ace = Card::new(ACE, Suit::Spades);
    game.waste.push(ace);

    assert_eq!(game.pick_up(PileId::Waste, 0), Ok(&[ace][..]));
    assert_eq!(
        game.drop_on(Some(PileId::Foundation(0))),
        Ok(DropOutcome::Accepted {
            from: PileId::Waste,
            to: PileId::Foundation(0),
            cards: 1,
        })
    );
    assert_eq!(game.foundation(0).cards(), &[ace]);
    assert_eq!(
        game.pick_up(PileId::Waste, 0),
        Err(MoveError::EmptyPile(PileId::Waste))
    );
    assert!(game.held().is_empty());
}

#[test]
fn black_nine_goes_on_red_ten() {
    let mut game = Game::new();
    let nine = Card::new(9, Suit::Spades);
    game.columns[0].revealed.push(Card::new(10, Suit::Diamonds));
    game.columns[0].revealed.push(nine);
    game.columns[1].revealed.push(Card::new(10, Suit::Hearts));

    game.pick_up(PileId::Column(0), 1).unwrap();
    let outcome = game.drop_on(Some(PileId::Column(1))).unwrap();
    assert!(outcome.is_accepted());
    assert_eq!(game.column(1).revealed().top(), Some(nine));
    assert_eq!(game.column(0).revealed().cards(), &[Card::new(10, Suit::Diamonds)]);
}

#[test]
fn red_nine_is_refused_by_red_ten() {
    let mut game = Game::new();
    game.columns[0].revealed.push(Card::new(9, Suit::Hearts));
    game.columns[1].revealed.push(Card::new(10, Suit::Diamonds));

    game.pick_up(PileId::Column(0), 0).unwrap();
    assert_eq!(
        game.drop_on(Some(PileId::Column(1))),
        Ok(DropOutcome::Returned {
            to: PileId::Column(0),
            reason: RejectReason::ColumnOutOfSequence,
        })
    );
    assert_eq!(game.column(0).revealed().len(), 1);
}

#[test]
fn moving_a_run_reveals_the_card_below() {
    let mut game = Game::new();
    let hidden = Card::new(3, Suit::Clubs);
    game.columns[0].hidden.push(hidden);
    game.columns[0].revealed.push(Card::new(KING, Suit::Spades));
    game.columns[0].revealed.push(Card::new(QUEEN, Suit::Hearts));

    let held = game.pick_up(PileId::Column(0), 1).unwrap();
    assert_eq!(held.len(), 2);
    assert!(game.column(0).needs_reveal());
    game.drop_on(Some(PileId::Column(3))).unwrap();

    assert_eq!(game.column(3).revealed().len(), 2);
    assert_eq!(game.column(0).revealed().cards(), &[hidden]);
    assert!(game.column(0).hidden().is_empty());
    assert_eq!(game.drain_events(), vec![GameEvent::CardRevealed(0)]);
    assert!(game.drain_events().is_empty());
}

#[test]
fn rejected_drops_restore_the_table() {
    let mut game = dealt(3, DrawMode::One);
    game.draw();
    let before = game.snapshot();

    let targets = [
        None,
        Some(PileId::Stock),
        Some(PileId::Waste),
        Some(PileId::Column(6)),
    ];
    for target in targets {
        game.pick_up(PileId::Column(6), 6).unwrap();
        assert!(!game.drop_on(target).unwrap().is_accepted());
        assert_eq!(game.snapshot(), before);
    }
}

#[test]
fn drop_reasons() {
    let mut game = Game::new();
    game.columns[0].revealed.push(Card::new(5, Suit::Clubs));
    game.columns[0].revealed.push(Card::new(4, Suit::Hearts));
    game.columns[1].revealed.push(Card::new(2, Suit::Spades));
    game.foundations[1].push(Card::new(ACE, Suit::Diamonds));

    let cases = [
        (PileId::Column(0), 0, None, RejectReason::NoTarget),
        (PileId::Column(0), 0, Some(PileId::Column(0)), RejectReason::SamePile),
        (PileId::Column(0), 0, Some(PileId::Waste), RejectReason::NotADropTarget),
        (
            PileId::Column(0),
            0,
            Some(PileId::Foundation(0)),
            RejectReason::FoundationTakesOneCard,
        ),
        (PileId::Column(1), 0, Some(PileId::Foundation(0)), RejectReason::FoundationNeedsAce),
        (
            PileId::Column(1),
            0,
            Some(PileId::Foundation(1)),
            RejectReason::FoundationOutOfSequence,
        ),
        (PileId::Column(0), 0, Some(PileId::Column(5)), RejectReason::ColumnNeedsKing),
    ];
    for (from, index, target, reason) in cases {
        game.pick_up(from, index).unwrap();
        assert_eq!(
            game.drop_on(target),
            Ok(DropOutcome::Returned { to: from, reason }),
            "dropping {} on {:?}",
            from,
            target
        );
    }
    assert_eq!(game.column(0).revealed().len(), 2);
    assert_eq!(game.drop_on(None), Err(MoveError::NothingHeld));
}

#[test]
fn pick_up_errors() {
    let mut game = dealt(11, DrawMode::Three);
    game.draw();

    assert_eq!(game.pick_up(PileId::Stock, 0), Err(MoveError::StockNotLiftable));
    assert_eq!(
        game.pick_up(PileId::Column(6), 2),
        Err(MoveError::FaceDown {
            pile: PileId::Column(6),
            index: 2
        })
    );
    assert_eq!(
        game.pick_up(PileId::Column(6), 7),
        Err(MoveError::IndexOutOfRange {
            pile: PileId::Column(6),
            index: 7,
            len: 7
        })
    );
    assert_eq!(
        game.pick_up(PileId::Waste, 0),
        Err(MoveError::NotTopCard {
            pile: PileId::Waste,
            index: 0
        })
    );
    assert_eq!(
        game.pick_up(PileId::Foundation(2), 0),
        Err(MoveError::EmptyPile(PileId::Foundation(2)))
    );

    game.pick_up(PileId::Waste, 2).unwrap();
    assert_eq!(
        game.pick_up(PileId::Column(0), 0),
        Err(MoveError::AlreadyHolding(PileId::Waste))
    );
    assert_eq!(game.cancel_transfer(), Some(PileId::Waste));
    assert_eq!(game.cancel_transfer(), None);
    assert_invariants(&game);
}

#[test]
fn drawing_returns_held_cards_first() {
    let mut game = dealt(5, DrawMode::One);
    let top = game.column(2).revealed().top();
    game.pick_up(PileId::Column(2), 2).unwrap();
    game.draw();
    assert!(!game.transfer().is_active());
    assert_eq!(game.column(2).revealed().top(), top);
    assert_invariants(&game);
}

#[test]
fn auto_move_picks_the_first_foundation_that_fits() {
    let mut game = Game::new();
    game.foundations[0].push(Card::new(ACE, Suit::Clubs));
    game.foundations[2].push(Card::new(ACE, Suit::Hearts));
    game.waste.push(Card::new(2, Suit::Hearts));
    game.columns[4].hidden.push(Card::new(7, Suit::Spades));
    game.columns[4].revealed.push(Card::new(ACE, Suit::Diamonds));

    assert_eq!(
        game.auto_move(PileId::Waste),
        AutoMove::Moved {
            from: PileId::Waste,
            to: PileId::Foundation(2),
            card: Card::new(2, Suit::Hearts),
        }
    );
    assert_eq!(
        game.auto_move(PileId::Column(4)),
        AutoMove::Moved {
            from: PileId::Column(4),
            to: PileId::Foundation(1),
            card: Card::new(ACE, Suit::Diamonds),
        }
    );
    assert_eq!(game.column(4).revealed().top(), Some(Card::new(7, Suit::Spades)));
    assert_eq!(game.drain_events(), vec![GameEvent::CardRevealed(4)]);

    assert_eq!(game.auto_move(PileId::Column(4)), AutoMove::NoOp);
    assert_eq!(game.auto_move(PileId::Waste), AutoMove::NoOp);
    assert_eq!(game.auto_move(PileId::Stock), AutoMove::NoOp);
    assert_eq!(game.auto_move(PileId::Foundation(0)), AutoMove::NoOp);
}

#[test]
fn flipping_a_column_reveals_one_card() {
    let mut game = Game::new();
    game.columns[2].hidden.push(Card::new(4, Suit::Clubs));
    game.columns[2].hidden.push(Card::new(8, Suit::Hearts));

    assert!(game.flip_column(2));
    assert_eq!(game.column(2).revealed().cards(), &[Card::new(8, Suit::Hearts)]);
    assert_eq!(game.column(2).hidden().len(), 1);
    assert!(!game.flip_column(2));
    assert!(!game.flip_column(3));
}

#[test]
fn winning_counts_once_and_is_not_a_loss() {
    let mut game = nearly_won();
    assert!(!game.check_win());

    game.pick_up(PileId::Waste, 0).unwrap();
    assert!(game.drop_on(Some(PileId::Foundation(3))).unwrap().is_accepted());
    assert!(game.is_won());
    assert!(game.won_current_hand());
    assert_eq!(game.stats().wins, 1);
    assert_eq!(game.drain_events(), vec![GameEvent::WinDetected]);

    assert_eq!(game.draw(), StockAction::NoOp);
    assert!(game.check_win());
    assert_eq!(game.stats().wins, 1);
    assert!(game.drain_events().is_empty());

    game.new_game(DrawMode::Three);
    assert_eq!((game.stats().wins, game.stats().losses), (1, 0));
    assert!(!game.won_current_hand());
    assert!(game.celebration().is_none());

    game.new_game(DrawMode::Three);
    assert_eq!((game.stats().wins, game.stats().losses), (1, 1));
}

#[test]
fn changing_draw_mode_resets_the_record() {
    let mut game = dealt(1, DrawMode::Three);
    assert_eq!(game.stats().losses, 0);
    game.new_game(DrawMode::Three);
    game.new_game(DrawMode::Three);
    assert_eq!(game.stats().losses, 2);

    game.new_game(DrawMode::One);
    assert_eq!(game.stats().wins, 0);
    assert_eq!(game.stats().losses, 0);
    assert_eq!(game.stats().draw_mode, Some(DrawMode::One));
    assert_eq!(game.draw_count(), 1);
}

#[test]
fn celebration_launches_every_card() {
    let mut game = nearly_won();
    game.pick_up(PileId::Waste, 0).unwrap();
    game.drop_on(Some(PileId::Foundation(3))).unwrap();
    let deal = game.deal_number();
    assert_eq!(game.celebration().map(|c| c.remaining()), Some(NUM_CARDS_DECK));

    let first = game.step_celebration(deal).unwrap();
    assert_eq!(first.card, Card::new(KING, Suit::Clubs));
    assert_eq!((first.x, first.y), (360, 85));
    let second = game.step_celebration(deal).unwrap();
    assert_eq!((second.x, second.y), (370, 72));
    assert_eq!(game.step_celebration(deal + 1), None);

    let mut launched = vec![first.card];
    for _ in 0..100_000 {
        match game.step_celebration(deal) {
            Some(frame) if launched.last() != Some(&frame.card) => launched.push(frame.card),
            Some(_) => {}
            None => break,
        }
    }
    assert_eq!(launched.len(), NUM_CARDS_DECK);
    assert!(game.celebration().map_or(false, |c| c.is_finished()));
    assert_eq!(game.foundation(0).len(), 13);

    game.cancel_celebration();
    assert!(game.celebration().is_none());
}

#[test]
fn overlap_picks_the_largest_area_then_the_first() {
    let left = Rect::new(0, 0, 100, 100);
    let right = Rect::new(100, 0, 100, 100);
    let candidates = [(PileId::Waste, left), (PileId::Column(0), right)];

    assert_eq!(
        resolve_drop_target(&candidates, Rect::new(60, 0, 100, 100)),
        Some(PileId::Column(0))
    );
    assert_eq!(
        resolve_drop_target(&candidates, Rect::new(50, 0, 100, 100)),
        Some(PileId::Waste)
    );
    assert_eq!(resolve_drop_target(&candidates, Rect::new(300, 300, 10, 10)), None);
    assert_eq!(left.intersection(&right), None);
}

#[test]
fn drop_at_uses_the_table_layout() {
    let mut game = Game::new();
    game.waste.push(Card::new(KING, Suit::Diamonds));
    let layout = game.layout().clone();

    game.pick_up(PileId::Waste, 0).unwrap();
    let (x, y) = layout.pile_origin(PileId::Column(2));
    let outcome = game.drop_at(layout.run_bounds(x + 20, y + 10, 1)).unwrap();
    assert_eq!(
        outcome,
        DropOutcome::Accepted {
            from: PileId::Waste,
            to: PileId::Column(2),
            cards: 1
        }
    );
    assert_eq!(game.drop_at(Rect::new(0, 0, 1, 1)), Err(MoveError::NothingHeld));
}

#[test]
fn hit_testing_points() {
    let game = dealt(9, DrawMode::One);
    let layout = game.layout();

    assert_eq!(layout.pile_at(&game, 60, 110), Some(PileId::Stock));
    assert_eq!(layout.pile_at(&game, 660, 260), Some(PileId::Column(6)));
    assert_eq!(layout.pile_at(&game, 10, 10), None);
    assert_eq!(layout.card_at(&game, PileId::Column(6), 660, 260), Some(6));
    assert_eq!(layout.card_at(&game, PileId::Stock, 60, 110), Some(23));
    assert_eq!(layout.card_at(&game, PileId::Waste, 160, 110), None);
}

#[test]
fn snapshots_mark_face_down_cards() {
    let game = dealt(21, DrawMode::One);

    let column = game.pile_snapshot(PileId::Column(6));
    assert_eq!(column.cards.len(), 7);
    assert!(column.cards[..6].iter().all(|view| !view.face_up));
    assert_eq!(column.face_up().count(), 1);
    assert!(game
        .pile_snapshot(PileId::Stock)
        .cards
        .iter()
        .all(|view| !view.face_up));

    let table = game.snapshot();
    assert_eq!(table.piles.len(), 13);
    assert!(table.held.is_none());
    let json = table.to_json().unwrap();
    assert!(json.contains("\"face_up\":true"));
    assert!(json.contains("\"draw_mode\":\"One\""));
}

#[test]
fn pile_names_parse() {
    assert_eq!("c7".parse::<PileId>(), Ok(PileId::Column(6)));
    assert_eq!("F1".parse::<PileId>(), Ok(PileId::Foundation(0)));
    assert_eq!("waste".parse::<PileId>(), Ok(PileId::Waste));
    assert!("c8".parse::<PileId>().is_err());
    assert!("f0".parse::<PileId>().is_err());
    for pile in PileId::all() {
        assert_eq!(pile.to_string().parse::<PileId>(), Ok(pile));
    }
}

#[test]
fn random_play_keeps_the_table_consistent() {
    (0..64u64).into_par_iter().for_each(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mode = if seed % 2 == 0 { DrawMode::One } else { DrawMode::Three };
        let mut game = Game::new();
        game.new_game_with_deck(mode, deck::shuffled_with(&mut rng));
        let piles: Vec<PileId> = PileId::all().collect();

        for _ in 0..400 {
            match rng.gen_range(0..10) {
                0..=1 => {
                    game.draw();
                }
                2..=3 => {
                    let pile = piles[rng.gen_range(0..piles.len())];
                    game.auto_move(pile);
                }
                4 => {
                    game.flip_column(rng.gen_range(0..NUM_COLUMNS as u8));
                }
                _ => {
                    let from = piles[rng.gen_range(0..piles.len())];
                    let len = game.pile_snapshot(from).cards.len();
                    let index = rng.gen_range(0..len.max(1));
                    let before = game.snapshot();
                    if game.pick_up(from, index).is_err() {
                        assert_eq!(game.snapshot(), before);
                        continue;
                    }
                    assert_invariants(&game);
                    let target = piles[rng.gen_range(0..piles.len())];
                    let outcome = game.drop_on(Some(target)).unwrap();
                    if !outcome.is_accepted() {
                        assert_eq!(game.snapshot(), before);
                    }
                }
            }
            assert_invariants(&game);
        }
    });
}
