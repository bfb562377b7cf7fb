//! # Bandbooker Testing
//!
//! Test utilities for reducers and effects.
//!
//! Reducers are pure functions, so most behavior is testable without a
//! runtime: build a [`ReducerTest`], feed it actions, and assert on the
//! resulting state and effect descriptions.
//!
//! ## Example
//!
//! ```ignore
//! use bandbooker_testing::ReducerTest;
//! use bandbooker_testing::assertions::assert_no_effects;
//!
//! ReducerTest::new(MyReducer, MyState::default(), env)
//!     .when(MyAction::DoThing)
//!     .then_state(|s| assert!(s.thing_done))
//!     .then_effects(|e| assert_no_effects(e));
//! ```

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};
