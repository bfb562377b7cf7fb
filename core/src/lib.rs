//! # Bandbooker Core
//!
//! Core traits and types for the Bandbooker transactional workflow
//! architecture.
//!
//! This crate provides the fundamental abstractions for building cancellable
//! transactional workflows using the Reducer pattern:
//!
//! - **State**: Domain state for a workflow (e.g. the ticket transaction)
//! - **Action**: All possible inputs to a reducer (triggers and effect feedback)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution), including
//!   cancellable operations
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Cooperative Cancellation (operations carry tokens, never get killed)
//!
//! ## Example
//!
//! ```ignore
//! use bandbooker_core::{effect::{Effect, Effects}, reducer::Reducer, smallvec};
//!
//! impl Reducer for TicketReducer {
//!     type State = TicketState;
//!     type Action = TicketAction;
//!     type Environment = TicketEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TicketState,
//!         action: TicketAction,
//!         env: &TicketEnvironment,
//!     ) -> Effects<TicketAction> {
//!         // Business logic goes here
//!         smallvec![]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Cooperative cancellation primitives (`CancellationId`, `CancelToken`)
pub mod cancellation;

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for AuthReducer {
    ///     type State = AuthState;
    ///     type Action = AuthAction;
    ///     type Environment = AuthEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AuthState,
    ///         action: AuthAction,
    ///         env: &AuthEnvironment,
    ///     ) -> Effects<AuthAction> {
    ///         match action {
    ///             AuthAction::SignOut => {
    ///                 state.session = None;
    ///                 smallvec![]
    ///             }
    ///             _ => smallvec![],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use crate::cancellation::{CancelToken, CancellationId};
    use futures::future::BoxFuture;
    use std::future::Future;
    use std::time::Duration;

    /// Boxed future produced by effect descriptions.
    pub type EffectFuture<Action> = BoxFuture<'static, Option<Action>>;

    /// Closure that builds a cancellable operation's future from the token
    /// the runtime minted for it.
    pub type CancellableRun<Action> = Box<dyn FnOnce(CancelToken) -> EffectFuture<Action> + Send>;

    /// The effect list returned by reducers.
    ///
    /// Most reducers emit between zero and four effects per action, so a
    /// `SmallVec` of four avoids heap allocation on the hot path.
    pub type Effects<Action> = smallvec::SmallVec<[Effect<Action>; 4]>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime. Within one reducer invocation, effects are started in list
    /// order; `Cancel` executes synchronously before any later effect in the
    /// same list begins.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer.
        Future(EffectFuture<Action>),

        /// Cancellable async operation
        ///
        /// The runtime mints a [`CancelToken`], registers it under `id`, and
        /// races the produced future against token cancellation. If the token
        /// is triggered first, the future is dropped and any result it would
        /// have produced is discarded - a cancelled operation can never feed
        /// an action back into the reducer.
        Cancellable {
            /// Identity under which the token is registered; a later
            /// `Effect::Cancel` with the same id aborts this operation.
            id: CancellationId,
            /// Builds the operation's future from the minted token, so the
            /// operation itself can observe cancellation mid-flight.
            run: CancellableRun<Action>,
        },

        /// Cancel the operation registered under `id`
        ///
        /// No-op when nothing is registered - cancellation arriving after an
        /// operation already completed is silently ignored.
        Cancel {
            /// Identity of the operation to cancel
            id: CancellationId,
        },
    }

    // Manual Debug implementation since Future/FnOnce don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, .. } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .finish_non_exhaustive(),
                Effect::Cancel { id } => {
                    f.debug_struct("Effect::Cancel").field("id", id).finish()
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Wrap a cancellable async operation as an effect
        ///
        /// The closure receives the [`CancelToken`] the runtime registers
        /// under `id`, so the operation can pass it along to transport layers
        /// that support mid-flight abort.
        pub fn cancellable<F, Fut>(id: CancellationId, run: F) -> Effect<Action>
        where
            F: FnOnce(CancelToken) -> Fut + Send + 'static,
            Fut: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Cancellable {
                id,
                run: Box::new(move |token| Box::pin(run(token))),
            }
        }

        /// Cancel the operation registered under `id`
        #[must_use]
        pub const fn cancel(id: CancellationId) -> Effect<Action> {
            Effect::Cancel { id }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Fixed clock for deterministic tests
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at the given instant
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }
}
