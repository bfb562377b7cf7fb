//! Given/When/Then harness for reducer unit tests
//!
//! Drives a reducer synchronously, without a store. Each `when` applies one
//! action and records the effects it returned; `then_state` and
//! `then_effects` assert on the outcome. Calls chain, so a multi-step
//! scenario reads top to bottom:
//!
//! ```ignore
//! ReducerTest::new(TicketReducer, TicketState::Idle, env)
//!     .when(TicketAction::HoldRequested { .. })
//!     .then_state(|s| assert!(matches!(s, TicketState::Holding { .. })))
//!     .when(TicketAction::HoldSucceeded { .. })
//!     .then_state(|s| assert!(matches!(s, TicketState::Held { .. })));
//! ```

use bandbooker_core::effect::{Effect, Effects};
use bandbooker_core::reducer::Reducer;
use bandbooker_core::smallvec;

/// Fluent test harness for a single reducer
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    environment: R::Environment,
    state: R::State,
    last_effects: Effects<R::Action>,
}

impl<R: Reducer> ReducerTest<R> {
    /// Create a harness from a reducer, initial state, and environment
    pub fn new(reducer: R, initial_state: R::State, environment: R::Environment) -> Self {
        Self {
            reducer,
            environment,
            state: initial_state,
            last_effects: smallvec![],
        }
    }

    /// Mutate the state before the action under test
    #[must_use]
    pub fn given_state(mut self, f: impl FnOnce(&mut R::State)) -> Self {
        f(&mut self.state);
        self
    }

    /// Apply an action through the reducer, recording its effects
    #[must_use]
    pub fn when(mut self, action: R::Action) -> Self {
        self.last_effects = self
            .reducer
            .reduce(&mut self.state, action, &self.environment);
        self
    }

    /// Assert on the state after the last `when`
    pub fn then_state(self, f: impl FnOnce(&R::State)) -> Self {
        f(&self.state);
        self
    }

    /// Assert on the effects returned by the last `when`
    pub fn then_effects(self, f: impl FnOnce(&Effects<R::Action>)) -> Self {
        f(&self.last_effects);
        self
    }

    /// Consume the harness, returning the final state
    pub fn into_state(self) -> R::State {
        self.state
    }

    /// Consume the harness, returning the effects from the last `when`
    ///
    /// Useful when a test needs to drive an effect's future by hand.
    pub fn into_effects(self) -> Effects<R::Action> {
        self.last_effects
    }
}

/// Assertion helpers for effect descriptions
///
/// Effects are values, so tests assert on their shape rather than running
/// them. These helpers cover the shapes that matter for workflow reducers:
/// which operations start, and which get cancelled.
pub mod assertions {
    use super::{Effect, Effects};
    use bandbooker_core::cancellation::CancellationId;

    /// Assert the reducer returned no effects at all
    pub fn assert_no_effects<A>(effects: &Effects<A>) {
        assert!(
            effects.is_empty(),
            "expected no effects, got {} effect(s)",
            effects.len()
        );
    }

    /// Assert the reducer returned exactly `expected` effects
    pub fn assert_effects_count<A>(effects: &Effects<A>, expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "expected {expected} effect(s), got {}",
            effects.len()
        );
    }

    /// Assert at least one plain `Future` effect is present
    pub fn assert_has_future_effect<A>(effects: &Effects<A>) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "expected a Future effect, found none"
        );
    }

    /// Assert a cancellable operation is started under `id`
    pub fn assert_starts_cancellable<A>(effects: &Effects<A>, id: &CancellationId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancellable { id: eid, .. } if eid == id)),
            "expected a Cancellable effect with id {id}, found none"
        );
    }

    /// Assert a cancellation is issued for `id`
    pub fn assert_cancels<A>(effects: &Effects<A>, id: &CancellationId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancel { id: eid } if eid == id)),
            "expected a Cancel effect for id {id}, found none"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::assertions::{assert_cancels, assert_no_effects, assert_starts_cancellable};
    use super::*;
    use bandbooker_core::cancellation::CancellationId;

    const OP: CancellationId = CancellationId::from_static("op");

    #[derive(Clone, Debug, Default)]
    struct CounterState {
        running: bool,
        count: u32,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Start,
        Stop,
        Tick,
    }

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            (): &Self::Environment,
        ) -> Effects<Self::Action> {
            match action {
                CounterAction::Start => {
                    state.running = true;
                    smallvec![Effect::cancellable(OP, |_token| async {
                        Some(CounterAction::Tick)
                    })]
                },
                CounterAction::Stop => {
                    state.running = false;
                    smallvec![Effect::cancel(OP)]
                },
                CounterAction::Tick => {
                    state.count += 1;
                    smallvec![]
                },
            }
        }
    }

    #[test]
    fn chained_scenario_tracks_state_and_effects() {
        ReducerTest::new(CounterReducer, CounterState::default(), ())
            .when(CounterAction::Start)
            .then_state(|s| assert!(s.running))
            .then_effects(|e| assert_starts_cancellable(e, &OP))
            .when(CounterAction::Stop)
            .then_state(|s| assert!(!s.running))
            .then_effects(|e| assert_cancels(e, &OP))
            .when(CounterAction::Tick)
            .then_state(|s| assert_eq!(s.count, 1))
            .then_effects(|e| assert_no_effects(e));
    }

    #[test]
    fn given_state_seeds_the_scenario() {
        let state = ReducerTest::new(CounterReducer, CounterState::default(), ())
            .given_state(|s| s.count = 41)
            .when(CounterAction::Tick)
            .into_state();

        assert_eq!(state.count, 42);
    }
}
