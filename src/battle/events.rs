//! Typed notifications raised by the battle state.
//!
//! Each kind of event has its own channel. Listeners run synchronously, in
//! subscription order, inside the mutator that raised the event.

use crate::creature::Creature;
use crate::player::{PlayerAction, Side};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A creature hit another one. A `value` of exactly zero means the target dodged.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub side: Side,
    pub attacker: Creature,
    pub target: Creature,
    pub value: f32,
}

impl DamageEvent {
    pub fn is_dodge(&self) -> bool {
        self.value == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeathEvent {
    /// Side the dead creature fought for.
    pub side: Side,
    pub creature: Creature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub side: Side,
    pub index: usize,
    pub creature: Creature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionEvent {
    pub side: Side,
    pub creature: Creature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObligatoryTurnEvent {
    pub side: Side,
    pub action: PlayerAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyPassEvent {
    pub enemy_index: usize,
}

/// Union of all event kinds, in the order they were raised.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    Damage(DamageEvent),
    Death(DeathEvent),
    Selection(SelectionEvent),
    Evolution(EvolutionEvent),
    ObligatoryTurn(ObligatoryTurnEvent),
    EnemyPass(EnemyPassEvent),
}

impl BattleEvent {
    /// Formats the event into the line the console shows for it.
    pub fn format(&self) -> String {
        match self {
            BattleEvent::Damage(damage) if damage.is_dodge() => format!(
                "{} has dodged the attack of {}. (Probability {}%)",
                damage.target.name(),
                damage.attacker.name(),
                damage.target.stage().agility
            ),
            BattleEvent::Damage(damage) => format!(
                "{} has attacked {} for {} HP.",
                damage.attacker.name(),
                damage.target.name(),
                display_amount(damage.value)
            ),
            BattleEvent::Death(death) => format!("{} has died!", death.creature.name()),
            BattleEvent::Selection(selection) => format!(
                "{} has selected {} ({})",
                selection.side,
                selection.creature.name(),
                selection.index
            ),
            BattleEvent::Evolution(evolution) => format!(
                "{} has evolved into {}",
                evolution.creature.name(),
                evolution.creature.stage().name
            ),
            BattleEvent::ObligatoryTurn(_) => "(Obligatory turn)".to_string(),
            BattleEvent::EnemyPass(pass) => format!("ENEMY No.{} DEFEATED!!!", pass.enemy_index),
        }
    }
}

/// Rounds a stat for display: one decimal, and tiny positive values never show as zero.
pub fn display_amount(value: f32) -> f32 {
    if value > 0.0 && value <= 0.1 {
        return 0.1;
    }
    (value * 10.0).round() / 10.0
}

type Listener<E> = Box<dyn FnMut(&E)>;

/// One typed event channel.
pub struct Channel<E> {
    listeners: Vec<Listener<E>>,
}

impl<E> Channel<E> {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn publish(&mut self, event: &E) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({} listeners)", self.listeners.len())
    }
}

/// The six event channels owned by a battle.
#[derive(Debug)]
pub struct EventBus {
    pub damage: Channel<DamageEvent>,
    pub death: Channel<DeathEvent>,
    pub selection: Channel<SelectionEvent>,
    pub evolution: Channel<EvolutionEvent>,
    pub obligatory_turn: Channel<ObligatoryTurnEvent>,
    pub enemy_pass: Channel<EnemyPassEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            damage: Channel::new(),
            death: Channel::new(),
            selection: Channel::new(),
            evolution: Channel::new(),
            obligatory_turn: Channel::new(),
            enemy_pass: Channel::new(),
        }
    }

    /// Routes the event to the listeners of its channel.
    pub fn publish(&mut self, event: BattleEvent) {
        tracing::debug!(?event, "battle event");
        match &event {
            BattleEvent::Damage(e) => self.damage.publish(e),
            BattleEvent::Death(e) => self.death.publish(e),
            BattleEvent::Selection(e) => self.selection.publish(e),
            BattleEvent::Evolution(e) => self.evolution.publish(e),
            BattleEvent::ObligatoryTurn(e) => self.obligatory_turn.publish(e),
            BattleEvent::EnemyPass(e) => self.enemy_pass.publish(e),
        }
    }
}

/// Collects every event from all six channels into one ordered list.
///
/// ```rust,ignore
/// let log = EventLog::attach(battle.events_mut());
/// battle.attack(Side::Player, &mut rng)?;
/// for event in log.drain() {
///     println!("{}", event.format());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<BattleEvent>>>,
}

impl EventLog {
    pub fn attach(bus: &mut EventBus) -> Self {
        let log = EventLog::default();

        let sink = Rc::clone(&log.events);
        bus.damage
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::Damage(e.clone())));
        let sink = Rc::clone(&log.events);
        bus.death
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::Death(e.clone())));
        let sink = Rc::clone(&log.events);
        bus.selection
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::Selection(e.clone())));
        let sink = Rc::clone(&log.events);
        bus.evolution
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::Evolution(e.clone())));
        let sink = Rc::clone(&log.events);
        bus.obligatory_turn
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::ObligatoryTurn(e.clone())));
        let sink = Rc::clone(&log.events);
        bus.enemy_pass
            .subscribe(move |e| sink.borrow_mut().push(BattleEvent::EnemyPass(e.clone())));

        log
    }

    /// Copy of everything collected so far.
    pub fn events(&self) -> Vec<BattleEvent> {
        self.events.borrow().clone()
    }

    /// Take everything collected so far, leaving the log empty.
    pub fn drain(&self) -> Vec<BattleEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
