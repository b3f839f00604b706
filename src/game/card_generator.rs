use std::collections::HashSet;

use log::trace;
use rand::Rng;

use crate::error::{BingoError, Result};
use crate::model::{Card, Cell, CellPosition, BINGO_EVENTS, CELL_COUNT, FREE_POSITION};

/// Unbiased in-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

fn slot_count(include_free: bool) -> usize {
    if include_free {
        CELL_COUNT - 1
    } else {
        CELL_COUNT
    }
}

/// Builds a card from the default event catalog.
///
/// With `fixed_events`, the labels are placed row-major into the non-free cells in the
/// order given; the list must hold exactly one distinct, non-empty label per slot.
/// Without it, labels are drawn at random without replacement.
pub fn generate_card<R: Rng + ?Sized>(
    include_free: bool,
    fixed_events: Option<&[String]>,
    rng: &mut R,
) -> Result<Card> {
    generate_card_from(&BINGO_EVENTS, include_free, fixed_events, rng)
}

pub fn generate_card_from<R: Rng + ?Sized>(
    catalog: &[&str],
    include_free: bool,
    fixed_events: Option<&[String]>,
    rng: &mut R,
) -> Result<Card> {
    let required = slot_count(include_free);
    let events: Vec<String> = match fixed_events {
        Some(events) => {
            validate_fixed_events(events, required)?;
            events.to_vec()
        }
        None => {
            if catalog.len() < required {
                return Err(BingoError::NotEnoughEvents {
                    available: catalog.len(),
                    required,
                });
            }
            let mut shuffled: Vec<&str> = catalog.to_vec();
            shuffle(&mut shuffled, rng);
            let drawn: Vec<String> = shuffled
                .into_iter()
                .take(required)
                .map(str::to_string)
                .collect();
            // duplicates in the catalog itself would leak onto the card
            validate_fixed_events(&drawn, required)?;
            drawn
        }
    };

    let mut remaining = events.into_iter();
    let mut next_cell = |row: usize, col: usize| -> Cell {
        if include_free && CellPosition::new(row, col) == FREE_POSITION {
            Cell::free()
        } else {
            // slot count was checked above
            Cell::new(remaining.next().unwrap_or_default())
        }
    };
    let cells = std::array::from_fn(|row| std::array::from_fn(|col| next_cell(row, col)));
    let card = Card::from_cells(cells);
    trace!(target: "card_generator", "Generated card:\n{}", card);
    Ok(card)
}

fn validate_fixed_events(events: &[String], required: usize) -> Result<()> {
    if events.len() != required {
        return Err(BingoError::InvalidEventList(format!(
            "expected {} events, got {}",
            required,
            events.len()
        )));
    }
    let mut seen = HashSet::new();
    for event in events {
        if event.trim().is_empty() {
            return Err(BingoError::InvalidEventList("empty event label".to_string()));
        }
        if !seen.insert(event.as_str()) {
            return Err(BingoError::DuplicateEvent(event.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CARD_EVENT_COUNT;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn fixed_list() -> Vec<String> {
        BINGO_EVENTS
            .iter()
            .rev()
            .take(CARD_EVENT_COUNT)
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_generated_cards_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let card = generate_card(true, None, &mut rng).unwrap();
            card.validate().unwrap();
            let center = card.cell(FREE_POSITION).unwrap();
            assert!(center.is_free && center.marked);
            assert_eq!(card.iter().filter(|(_, c)| c.is_free).count(), 1);
            let events: HashSet<&str> = card.events().into_iter().collect();
            assert_eq!(events.len(), CARD_EVENT_COUNT);
            assert!(events.iter().all(|e| BINGO_EVENTS.contains(e)));
            assert!(card.iter().all(|(_, c)| c.is_free == c.marked));
        }
    }

    #[test]
    fn test_fixed_events_are_placed_row_major() {
        let mut rng = StdRng::seed_from_u64(1);
        let events = fixed_list();
        let card = generate_card(true, Some(&events), &mut rng).unwrap();
        let placed: Vec<String> = card.events().into_iter().map(str::to_string).collect();
        assert_eq!(placed, events);
        assert_eq!(card.get(0, 0).unwrap().event, events[0]);
        assert_eq!(card.get(2, 3).unwrap().event, events[12]);
    }

    #[test]
    fn test_malformed_fixed_events_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let short: Vec<String> = fixed_list().into_iter().take(23).collect();
        assert!(matches!(
            generate_card(true, Some(&short), &mut rng),
            Err(BingoError::InvalidEventList(_))
        ));

        let mut duplicated = fixed_list();
        duplicated[5] = duplicated[0].clone();
        assert!(matches!(
            generate_card(true, Some(&duplicated), &mut rng),
            Err(BingoError::DuplicateEvent(_))
        ));
    }

    #[test]
    fn test_small_catalog_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = &BINGO_EVENTS[..10];
        assert!(matches!(
            generate_card_from(catalog, true, None, &mut rng),
            Err(BingoError::NotEnoughEvents {
                available: 10,
                required: 24
            })
        ));
    }

    #[test]
    fn test_without_free_space_fills_every_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let card = generate_card(false, None, &mut rng).unwrap();
        assert!(!card.has_free_space());
        assert_eq!(card.events().len(), CELL_COUNT);
        card.validate().unwrap();
    }

    #[test]
    fn test_shuffle_spreads_events_over_first_position() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 9_000;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..trials {
            let card = generate_card(true, None, &mut rng).unwrap();
            let first = card.get(0, 0).unwrap().event.clone();
            let label = BINGO_EVENTS.iter().find(|e| **e == first).unwrap();
            *counts.entry(*label).or_default() += 1;
        }
        let expected = trials / BINGO_EVENTS.len();
        assert_eq!(counts.len(), BINGO_EVENTS.len());
        for (event, count) in counts {
            assert!(
                count > expected / 2 && count < expected * 3 / 2,
                "{} landed first {} times, expected about {}",
                event,
                count,
                expected
            );
        }
    }
}
