use crate::game::zones::{Hand, Library};
use crate::rng::GameRng;
use crate::simulation::deck::Deck;

/// Cards drawn for every opening hand, at every mulligan depth
pub const OPENING_HAND_SIZE: usize = 7;

/// One depth of the mulligan sequence, named by the hand size it keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MulliganStep {
    Seven,
    Six,
    Five,
    Four,
}

impl MulliganStep {
    pub const ALL: [MulliganStep; 4] = [
        MulliganStep::Seven,
        MulliganStep::Six,
        MulliganStep::Five,
        MulliganStep::Four,
    ];

    pub fn hand_size(&self) -> usize {
        match self {
            MulliganStep::Seven => 7,
            MulliganStep::Six => 6,
            MulliganStep::Five => 5,
            MulliganStep::Four => 4,
        }
    }

    pub fn next(&self) -> Option<MulliganStep> {
        match self {
            MulliganStep::Seven => Some(MulliganStep::Six),
            MulliganStep::Six => Some(MulliganStep::Five),
            MulliganStep::Five => Some(MulliganStep::Four),
            MulliganStep::Four => None,
        }
    }
}

/// Cards put on the bottom of the library when mulliganing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bottom {
    pub lands: usize,
    pub spells: usize,
}

impl Bottom {
    const fn new(lands: usize, spells: usize) -> Self {
        Bottom { lands, spells }
    }
}

/// Choose what to bottom from a freshly drawn 7-card hand.
///
/// Aims for roughly 4 lands / 2 spells at six, 3 / 2 at five and
/// 3 / 1 at four: expensive spells go first when there are plenty of
/// them, otherwise excess lands go.
pub fn bottom_for(step: MulliganStep, hand: &Hand) -> Bottom {
    match step {
        MulliganStep::Seven => Bottom::new(0, 0),
        MulliganStep::Six => {
            if hand.spells > 2 {
                Bottom::new(0, 1)
            } else {
                Bottom::new(1, 0)
            }
        }
        MulliganStep::Five => match hand.spells {
            s if s >= 4 => Bottom::new(0, 2),
            3 => Bottom::new(1, 1),
            _ => Bottom::new(2, 0),
        },
        MulliganStep::Four => match hand.spells {
            s if s >= 4 => Bottom::new(0, 3),
            3 => Bottom::new(1, 2),
            2 => Bottom::new(2, 1),
            _ => Bottom::new(3, 0),
        },
    }
}

/// Keep decision, made on the hand after bottoming
pub fn is_keepable(step: MulliganStep, hand: &Hand) -> bool {
    match step {
        MulliganStep::Seven => (2..=5).contains(&hand.lands),
        MulliganStep::Six | MulliganStep::Five => (2..=4).contains(&hand.lands),
        MulliganStep::Four => true,
    }
}

/// The hand the player keeps and the library left over from that attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptHand {
    pub hand: Hand,
    pub step: MulliganStep,
    pub library: Library,
}

impl KeptHand {
    pub fn kept_size(&self) -> usize {
        self.step.hand_size()
    }

    pub fn mulligans(&self) -> usize {
        OPENING_HAND_SIZE - self.kept_size()
    }
}

/// Draw the opening seven. `Deck` guarantees at least seven cards, a short
/// library just yields a short hand.
fn draw_opening_hand(library: &mut Library) -> Hand {
    let mut hand = Hand::default();
    while hand.size() < OPENING_HAND_SIZE {
        if hand.draw_from(library).is_err() {
            break;
        }
    }
    hand
}

/// Run the mulligan sequence over libraries produced by `next_library`.
///
/// Each depth asks for a brand new library and draws a fresh seven from it;
/// a rejected hand and its library are thrown away. Bottomed cards leave the
/// hand and are not put back into the kept library.
pub fn resolve_mulligans_with<F>(mut next_library: F) -> KeptHand
where
    F: FnMut() -> Library,
{
    let mut step = MulliganStep::Seven;
    loop {
        let mut library = next_library();
        let mut hand = draw_opening_hand(&mut library);

        let bottom = bottom_for(step, &hand);
        hand.bottom(bottom.lands, bottom.spells);

        if is_keepable(step, &hand) {
            return KeptHand { hand, step, library };
        }

        // Four always keeps, so `next` is only None after a keep
        match step.next() {
            Some(next) => step = next,
            None => return KeptHand { hand, step, library },
        }
    }
}

/// Resolve mulligans for `deck`, reshuffling the full deck at every depth
pub fn resolve_mulligans(deck: &Deck, rng: &mut GameRng) -> KeptHand {
    resolve_mulligans_with(|| Library::shuffled(deck, rng))
}
