use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::betting::run_betting_round;
use crate::blinds::{BlindSchedule, Stakes};
use crate::config::TableConfig;
use crate::decision::Decider;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::GameState;
use crate::hand::{best_hand, HandStrength};
use crate::logger::{EventSink, HandEvent, PlayerRef, StackLine, Street};
use crate::player::{Persona, Player, PlayerId};

/// Outcome of one finished hand, handed to every decider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub hand_id: u64,
    pub stakes: Stakes,
    /// Street on which the hand was decided
    pub final_street: Street,
    pub showdown: bool,
    /// Stack change of every seated player over the hand
    pub deltas: BTreeMap<PlayerId, i64>,
    /// Players who won chips from a pot
    pub winners: Vec<PlayerId>,
}

impl HandSummary {
    pub fn delta(&self, player: PlayerId) -> i64 {
        self.deltas.get(&player).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub hands_played: u64,
    pub stacks: Vec<StackLine>,
    /// Largest stack at the end; lowest id on ties
    pub leader: Option<PlayerId>,
    pub stopped: bool,
}

/// Drives hands at one table until the budget runs out, fewer than two
/// players remain, or a stop is requested.
///
/// # Examples
///
/// ```
/// use rentpoker_engine::config::TableConfig;
/// use rentpoker_engine::decision::{Decider, PassiveDecider};
/// use rentpoker_engine::engine::Engine;
/// use rentpoker_engine::logger::NullSink;
///
/// let cfg = TableConfig { players: 3, hands: 5, ..TableConfig::default() };
/// let deciders: Vec<Box<dyn Decider>> = (0..3).map(|_| Box::new(PassiveDecider) as Box<dyn Decider>).collect();
/// let mut engine = Engine::new(cfg, deciders, Box::new(NullSink)).unwrap();
/// let total: u32 = engine.state().players().iter().map(|p| p.stack).sum();
/// let summary = engine.play_hand().unwrap().expect("hand played");
/// assert_eq!(summary.hand_id, 1);
/// let after: u32 = engine.state().players().iter().map(|p| p.stack).sum();
/// assert_eq!(total, after);
/// ```
pub struct Engine {
    config: TableConfig,
    state: GameState,
    deck: Deck,
    schedule: BlindSchedule,
    deciders: Vec<Box<dyn Decider>>,
    sink: Box<dyn EventSink>,
    hands_played: u64,
}

impl Engine {
    pub fn new(
        config: TableConfig,
        deciders: Vec<Box<dyn Decider>>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, GameError> {
        let personas = vec![Persona::default(); config.players];
        Self::with_personas(config, personas, deciders, sink)
    }

    /// Like [`Engine::new`] with one persona per seat.
    pub fn with_personas(
        config: TableConfig,
        personas: Vec<Persona>,
        deciders: Vec<Box<dyn Decider>>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if deciders.len() != config.players {
            return Err(GameError::DeciderCountMismatch {
                expected: config.players,
                actual: deciders.len(),
            });
        }
        if personas.len() != config.players {
            return Err(GameError::InvalidConfig(format!(
                "expected {} personas, got {}",
                config.players,
                personas.len()
            )));
        }
        let players = personas
            .into_iter()
            .enumerate()
            .map(|(seat, persona)| Player::new(seat + 1, seat, config.starting_stack, persona))
            .collect();
        let state = GameState::new(players)?;
        let schedule = BlindSchedule::for_table(
            config.starting_stack,
            config.max_rebuys,
            config.players,
            config.hands,
        );
        Ok(Self {
            deck: Deck::new_with_seed(config.seed),
            config,
            state,
            schedule,
            deciders,
            sink,
            hands_played: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct seat access between hands, e.g. to set custom stacks.
    pub fn players_mut(&mut self) -> &mut [Player] {
        self.state.players_mut()
    }

    pub fn schedule(&self) -> &BlindSchedule {
        &self.schedule
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    fn current_stakes(&self) -> Stakes {
        match self.config.fixed_blinds {
            Some(b) => Stakes {
                level: 1,
                small_blind: b.small_blind,
                big_blind: b.big_blind,
            },
            None => self.schedule.stakes_for(self.hands_played),
        }
    }

    /// Rebuys busted players while they have rebuys left, eliminates the rest.
    fn settle_busted(&mut self) {
        let max_rebuys = self.config.max_rebuys;
        let stack = self.config.starting_stack;
        for i in 0..self.state.players().len() {
            let p = &mut self.state.players_mut()[i];
            if p.eliminated || p.stack > 0 {
                continue;
            }
            let event = if p.rebuys_used < max_rebuys {
                p.rebuys_used += 1;
                p.stack = stack;
                tracing::debug!(player = p.id, rebuys_used = p.rebuys_used, "rebuy");
                HandEvent::Rebuy {
                    player: PlayerRef::from(&*p),
                    stack,
                    rebuys_used: p.rebuys_used,
                }
            } else {
                p.eliminated = true;
                tracing::debug!(player = p.id, "eliminated");
                HandEvent::Eliminated {
                    player: PlayerRef::from(&*p),
                }
            };
            self.sink.emit(&event);
        }
    }

    /// Plays one complete hand.
    ///
    /// `Ok(None)` means fewer than two players are left and no hand was
    /// dealt. Errors are fatal for the run.
    pub fn play_hand(&mut self) -> Result<Option<HandSummary>, GameError> {
        self.settle_busted();
        if self.state.alive_count() < 2 {
            return Ok(None);
        }

        let stakes = self.current_stakes();
        let hand_id = self.hands_played + 1;
        self.state.begin_hand(hand_id, stakes);
        let stacks_before: Vec<(PlayerId, u32)> = self
            .state
            .players()
            .iter()
            .filter(|p| !p.eliminated)
            .map(|p| (p.id, p.stack))
            .collect();

        self.sink.emit(&HandEvent::HandStart {
            hand_id,
            button: self.state.button(),
        });
        self.sink.emit(&HandEvent::StreetStart {
            hand_id,
            street: Street::Preflop,
            board: Vec::new(),
            button: self.state.button(),
            stakes,
        });

        self.deal_hole_cards()?;
        let (sb, bb) = self.state.blind_seats();
        for (seat, amount) in [(sb, stakes.small_blind), (bb, stakes.big_blind)] {
            let paid = self.state.post_blind(seat, amount);
            let p = self.state.player(seat);
            self.sink.emit(&HandEvent::BlindPost {
                hand_id,
                player: PlayerRef::from(p),
                amount: paid,
                stack: p.stack,
            });
        }

        let mut street = Street::Preflop;
        let first = self.state.preflop_first_actor();
        run_betting_round(&mut self.state, &mut self.deciders, &mut *self.sink, first)?;
        while self.state.in_hand_count() > 1 {
            let Some(next) = street.next() else {
                break;
            };
            street = next;
            self.deal_street(street)?;
            let first = self.state.postflop_first_actor();
            run_betting_round(&mut self.state, &mut self.deciders, &mut *self.sink, first)?;
        }

        let showdown = self.state.in_hand_count() > 1;
        let winners = if showdown {
            self.showdown()?
        } else {
            self.award_uncontested()?
        };

        let deltas = stacks_before
            .into_iter()
            .map(|(id, before)| {
                let after = self.state.players()[id - 1].stack;
                (id, after as i64 - before as i64)
            })
            .collect();
        let summary = HandSummary {
            hand_id,
            stakes,
            final_street: street,
            showdown,
            deltas,
            winners,
        };
        for d in &mut self.deciders {
            d.hand_complete(&summary);
        }

        self.state.move_button();
        self.hands_played += 1;
        self.sink.emit(&HandEvent::StackSummary {
            hand_id,
            stacks: self.state.players().iter().map(StackLine::from).collect(),
        });
        tracing::debug!(hand_id, showdown, street = %street, "hand complete");
        Ok(Some(summary))
    }

    /// Plays up to `hands` hands, checking `stop` before each one.
    pub fn run(&mut self, hands: u64, stop: &AtomicBool) -> Result<RunSummary, GameError> {
        let mut stopped = false;
        let mut reason = "hand budget reached".to_string();
        for _ in 0..hands {
            if stop.load(Ordering::Relaxed) {
                stopped = true;
                reason = "stop requested".into();
                break;
            }
            if self.play_hand()?.is_none() {
                reason = "fewer than two players remain".into();
                break;
            }
        }
        self.sink.emit(&HandEvent::GameOver { reason });
        let stacks: Vec<StackLine> = self.state.players().iter().map(StackLine::from).collect();
        let leader = stacks
            .iter()
            .filter(|s| !s.eliminated)
            .max_by(|a, b| a.stack.cmp(&b.stack).then(b.id.cmp(&a.id)))
            .map(|s| s.id);
        Ok(RunSummary {
            hands_played: self.hands_played,
            stacks,
            leader,
            stopped,
        })
    }

    /// Two cards per seated player, one at a time, starting left of the button.
    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        self.deck.shuffle();
        let order = self.state.distribution_order();
        let mut first = Vec::with_capacity(order.len());
        for _ in &order {
            first.push(self.deck.deal_card()?);
        }
        for (i, &seat) in order.iter().enumerate() {
            let second = self.deck.deal_card()?;
            self.state.deal_hole(seat, [first[i], second]);
        }
        Ok(())
    }

    fn deal_street(&mut self, street: Street) -> Result<(), GameError> {
        self.deck.burn_card()?;
        let n = street.board_len() - self.state.board().len();
        let cards = self.deck.deal_n(n)?;
        self.state.push_board(&cards);
        self.state.reset_for_street(street);
        self.sink.emit(&HandEvent::StreetStart {
            hand_id: self.state.hand_id(),
            street,
            board: self.state.board().to_vec(),
            button: self.state.button(),
            stakes: self.state.stakes(),
        });
        Ok(())
    }

    fn showdown(&mut self) -> Result<Vec<PlayerId>, GameError> {
        let hand_id = self.state.hand_id();
        let seats = self.state.players().len();
        let mut scores: Vec<Option<HandStrength>> = vec![None; seats];
        if self.config.reveal_showdown {
            self.sink.emit(&HandEvent::ShowdownStart { hand_id });
        }
        for seat in self.state.distribution_order() {
            let p = self.state.player(seat);
            let Some(hole) = p.hole else {
                continue;
            };
            let mut cards = hole.to_vec();
            cards.extend_from_slice(self.state.board());
            let Some(best) = best_hand(&cards) else {
                continue;
            };
            scores[seat] = Some(best.strength);
            if self.config.reveal_showdown {
                self.sink.emit(&HandEvent::ShowdownReveal {
                    hand_id,
                    player: PlayerRef::from(p),
                    hole,
                    category: best.strength.category,
                    best_five: best.cards,
                });
            }
        }

        let folded: Vec<bool> = self.state.players().iter().map(|p| !p.in_hand()).collect();
        let ledger = self.state.ledger().clone();
        let pots = ledger.build_pots(&folded);
        let awards = ledger.distribute(&pots, &scores, &self.state.distribution_order())?;

        let mut winners = Vec::new();
        for award in awards {
            for &(seat, chips) in &award.shares {
                self.state.award(seat, chips)?;
            }
            let refs: Vec<PlayerRef> = award
                .winners()
                .map(|s| PlayerRef::from(self.state.player(s)))
                .collect();
            for r in &refs {
                if !winners.contains(&r.id) {
                    winners.push(r.id);
                }
            }
            self.sink.emit(&HandEvent::PotAward {
                hand_id,
                pot_index: award.pot_index,
                amount: award.amount,
                winners: refs,
            });
        }
        Ok(winners)
    }

    fn award_uncontested(&mut self) -> Result<Vec<PlayerId>, GameError> {
        let Some(seat) = self.state.distribution_order().first().copied() else {
            return Ok(Vec::new());
        };
        let award = self.state.ledger().award_uncontested(seat);
        self.state.award(seat, award.amount)?;
        let p = self.state.player(seat);
        self.sink.emit(&HandEvent::UncontestedWin {
            hand_id: self.state.hand_id(),
            player: PlayerRef::from(p),
            amount: award.amount,
        });
        Ok(vec![p.id])
    }
}
