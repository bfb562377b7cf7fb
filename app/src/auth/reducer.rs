//! Sign-in reducer
//!
//! The authentication call runs cancellable under [`SIGN_IN_CALL`].
//! Cancelling produces the warning toast immediately and clears the
//! session; if the cancelled call later resolves successfully anyway, the
//! runtime discards the result, so the session stays empty. Cancelling
//! twice, or after the call resolved, is a no-op.

use super::actions::AuthAction;
use super::api::AuthApi;
use super::types::{AuthPhase, AuthState};
use crate::api::ApiError;
use crate::toast::{ToastBus, ToastStatus};
use bandbooker_core::cancellation::CancellationId;
use bandbooker_core::effect::{Effect, Effects};
use bandbooker_core::reducer::Reducer;
use bandbooker_core::smallvec;
use std::sync::Arc;

/// Cancellation id of the in-flight authentication call
pub const SIGN_IN_CALL: CancellationId = CancellationId::from_static("auth-sign-in");

/// Dependencies injected into the sign-in reducer's effects
#[derive(Clone)]
pub struct AuthEnvironment {
    /// Auth server adapter
    pub api: Arc<dyn AuthApi>,
    /// User-facing toast bus
    pub toasts: ToastBus,
}

/// The sign-in reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        state: &mut AuthState,
        action: AuthAction,
        env: &AuthEnvironment,
    ) -> Effects<AuthAction> {
        match action {
            AuthAction::SignInRequested { credentials } => {
                if state.is_signing_in() {
                    return ignored(state, "SignInRequested");
                }
                state.phase = AuthPhase::SigningIn;
                state.session = None;
                let api = Arc::clone(&env.api);
                smallvec![Effect::cancellable(SIGN_IN_CALL, move |_token| async move {
                    match api.authenticate(&credentials).await {
                        Ok(session) => Some(AuthAction::SignInSucceeded { session }),
                        Err(ApiError::Cancelled) => None,
                        Err(err) => {
                            tracing::warn!(error = %err, email = %credentials.email, "authentication failed");
                            Some(AuthAction::SignInFailed {
                                message: err.surface_message(),
                            })
                        },
                    }
                })]
            },

            AuthAction::SignInSucceeded { session } => {
                if !state.is_signing_in() {
                    return ignored(state, "SignInSucceeded");
                }
                tracing::info!(user = %session.user_id, "signed in");
                env.toasts
                    .publish(format!("Signed in as {}", session.email), ToastStatus::Info);
                state.phase = AuthPhase::SignedIn;
                state.session = Some(session);
                smallvec![]
            },

            AuthAction::SignInFailed { message } => {
                if !state.is_signing_in() {
                    return ignored(state, "SignInFailed");
                }
                env.toasts
                    .publish(format!("Sign in failed: {message}"), ToastStatus::Warning);
                *state = AuthState::signed_out();
                smallvec![]
            },

            AuthAction::CancelSignIn => {
                if !state.is_signing_in() {
                    // Nothing in flight: cancellation is a no-op
                    return ignored(state, "CancelSignIn");
                }
                env.toasts.publish("Sign in cancelled", ToastStatus::Warning);
                *state = AuthState::signed_out();
                smallvec![Effect::cancel(SIGN_IN_CALL)]
            },

            AuthAction::SignOut => match state.phase {
                AuthPhase::SignedIn => {
                    tracing::info!("signed out");
                    *state = AuthState::signed_out();
                    smallvec![]
                },
                _ => ignored(state, "SignOut"),
            },
        }
    }
}

fn ignored(state: &AuthState, action: &'static str) -> Effects<AuthAction> {
    tracing::debug!(phase = ?state.phase, action, "auth action ignored in current state");
    metrics::counter!("auth.actions.ignored").increment(1);
    smallvec![]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::types::{AuthIntent, AuthSession, AuthToken, Credentials, UserId};
    use crate::toast::Toast;
    use async_trait::async_trait;
    use bandbooker_testing::ReducerTest;
    use bandbooker_testing::assertions::{
        assert_cancels, assert_effects_count, assert_no_effects, assert_starts_cancellable,
    };
    use tokio::sync::broadcast;

    struct StubApi;

    #[async_trait]
    impl AuthApi for StubApi {
        async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
            Ok(session_for(&credentials.email))
        }
    }

    fn session_for(email: &str) -> AuthSession {
        AuthSession {
            user_id: UserId::new(),
            email: email.to_string(),
            token: AuthToken("token-abc".to_string()),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "booker@bandbooker.com".to_string(),
            password: "abc123".to_string(),
            intent: AuthIntent::SignIn,
        }
    }

    fn test_env() -> (AuthEnvironment, broadcast::Receiver<Toast>) {
        let toasts = ToastBus::new(8);
        let rx = toasts.subscribe();
        (
            AuthEnvironment {
                api: Arc::new(StubApi),
                toasts,
            },
            rx,
        )
    }

    #[test]
    fn sign_in_request_starts_cancellable_call() {
        let (env, _rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .when(AuthAction::SignInRequested {
                credentials: credentials(),
            })
            .then_state(|s| {
                assert!(s.is_signing_in());
                assert!(s.session.is_none());
            })
            .then_effects(|e| {
                assert_effects_count(e, 1);
                assert_starts_cancellable(e, &SIGN_IN_CALL);
            });
    }

    #[test]
    fn success_sets_session_and_toasts_info() {
        let (env, mut rx) = test_env();
        let session = session_for("booker@bandbooker.com");
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .given_state(|s| s.phase = AuthPhase::SigningIn)
            .when(AuthAction::SignInSucceeded {
                session: session.clone(),
            })
            .then_state(|s| {
                assert_eq!(s.phase, AuthPhase::SignedIn);
                assert_eq!(s.session.as_ref(), Some(&session));
            })
            .then_effects(assert_no_effects);

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.title, "Signed in as booker@bandbooker.com");
        assert_eq!(toast.status, ToastStatus::Info);
    }

    #[test]
    fn failure_toasts_warning_and_clears() {
        let (env, mut rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .given_state(|s| s.phase = AuthPhase::SigningIn)
            .when(AuthAction::SignInFailed {
                message: "server is broken".to_string(),
            })
            .then_state(|s| assert_eq!(s, &AuthState::signed_out()))
            .then_effects(assert_no_effects);

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.title, "Sign in failed: server is broken");
        assert_eq!(toast.status, ToastStatus::Warning);
    }

    #[test]
    fn cancel_clears_session_and_cancels_the_call() {
        let (env, mut rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .given_state(|s| s.phase = AuthPhase::SigningIn)
            .when(AuthAction::CancelSignIn)
            .then_state(|s| assert_eq!(s, &AuthState::signed_out()))
            .then_effects(|e| {
                assert_effects_count(e, 1);
                assert_cancels(e, &SIGN_IN_CALL);
            });

        let toast = rx.try_recv().unwrap();
        assert_eq!(toast.title, "Sign in cancelled");
        assert_eq!(toast.status, ToastStatus::Warning);
    }

    #[test]
    fn cancel_with_nothing_in_flight_is_ignored() {
        let (env, mut rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .when(AuthAction::CancelSignIn)
            .then_state(|s| assert_eq!(s, &AuthState::signed_out()))
            .then_effects(assert_no_effects);

        assert!(rx.try_recv().is_err(), "no toast for a no-op cancel");
    }

    #[test]
    fn sign_out_requires_a_session() {
        let (env, _rx) = test_env();

        ReducerTest::new(AuthReducer, AuthState::signed_out(), env.clone())
            .given_state(|s| {
                s.phase = AuthPhase::SignedIn;
                s.session = Some(session_for("booker@bandbooker.com"));
            })
            .when(AuthAction::SignOut)
            .then_state(|s| assert_eq!(s, &AuthState::signed_out()));

        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .when(AuthAction::SignOut)
            .then_state(|s| assert_eq!(s, &AuthState::signed_out()))
            .then_effects(assert_no_effects);
    }

    #[test]
    fn re_arms_after_leaving_signing_in() {
        let (env, _rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .given_state(|s| s.phase = AuthPhase::SigningIn)
            .when(AuthAction::CancelSignIn)
            .when(AuthAction::SignInRequested {
                credentials: credentials(),
            })
            .then_state(|s| assert!(s.is_signing_in()))
            .then_effects(|e| assert_starts_cancellable(e, &SIGN_IN_CALL));
    }

    #[test]
    fn duplicate_sign_in_request_is_ignored() {
        let (env, _rx) = test_env();
        ReducerTest::new(AuthReducer, AuthState::signed_out(), env)
            .given_state(|s| s.phase = AuthPhase::SigningIn)
            .when(AuthAction::SignInRequested {
                credentials: credentials(),
            })
            .then_state(|s| assert!(s.is_signing_in()))
            .then_effects(assert_no_effects);
    }
}
