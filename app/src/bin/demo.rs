//! Bandbooker demo
//!
//! Walks the whole lifecycle against the in-memory box office: sign-in, a
//! successful purchase, a purchase aborted mid-flight, and a cancelled
//! sign-in. Toasts print to stdout as they surface.
//!
//! ```sh
//! BANDBOOKER_LOG=debug cargo run --bin demo
//! ```

use bandbooker::auth::{AuthAction, AuthEnvironment, AuthIntent, Credentials};
use bandbooker::boxoffice::InMemoryBoxOffice;
use bandbooker::tickets::{HoldCriteria, PaymentInfo, ShowId, TicketAction, TicketEnvironment};
use bandbooker::toast::ToastBus;
use bandbooker::{AppTrigger, Config, Dispatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let box_office =
        Arc::new(InMemoryBoxOffice::new(config.simulated_latency).with_show(ShowId(0), 100));
    let toasts = ToastBus::new(config.toast_capacity);

    let dispatcher = Dispatcher::new(
        TicketEnvironment {
            api: box_office.clone(),
            toasts: toasts.clone(),
        },
        AuthEnvironment {
            api: box_office,
            toasts: toasts.clone(),
        },
    );

    // Surface toasts the way a UI would
    let mut toast_rx = toasts.subscribe();
    tokio::spawn(async move {
        while let Ok(toast) = toast_rx.recv().await {
            println!("  [toast:{}] {}", toast.status, toast.title);
        }
    });

    let credentials = Credentials {
        email: "booker@bandbooker.com".to_string(),
        password: "abc123".to_string(),
        intent: AuthIntent::SignIn,
    };

    println!("-- sign in --");
    let mut auth_actions = dispatcher.auth().subscribe_actions();
    dispatcher
        .dispatch(AppTrigger::SignIn {
            credentials: credentials.clone(),
        })
        .await?;
    wait_for(&mut auth_actions, |a| {
        matches!(a, AuthAction::SignInSucceeded { .. })
    })
    .await?;

    println!("-- hold and purchase --");
    let mut ticket_actions = dispatcher.tickets().subscribe_actions();
    dispatcher
        .dispatch(AppTrigger::BuyTickets {
            criteria: HoldCriteria {
                show_id: ShowId(0),
                seat_count: 2,
            },
        })
        .await?;
    wait_for(&mut ticket_actions, |a| {
        matches!(a, TicketAction::HoldSucceeded { .. })
    })
    .await?;
    dispatcher
        .dispatch(AppTrigger::ConfirmPurchase {
            payment: PaymentInfo {
                authorization: "tok-demo".to_string(),
            },
        })
        .await?;
    wait_for(&mut ticket_actions, |a| {
        matches!(a, TicketAction::TransactionEnded)
    })
    .await?;

    println!("-- hold, then abort mid-purchase --");
    dispatcher
        .dispatch(AppTrigger::BuyTickets {
            criteria: HoldCriteria {
                show_id: ShowId(0),
                seat_count: 4,
            },
        })
        .await?;
    wait_for(&mut ticket_actions, |a| {
        matches!(a, TicketAction::HoldSucceeded { .. })
    })
    .await?;
    dispatcher
        .dispatch(AppTrigger::ConfirmPurchase {
            payment: PaymentInfo {
                authorization: "tok-demo".to_string(),
            },
        })
        .await?;
    // Change of heart while the purchase call is still in flight
    tokio::time::sleep(config.simulated_latency / 3).await;
    dispatcher
        .dispatch(AppTrigger::AbortTickets {
            reason: "changed my mind".to_string(),
        })
        .await?;
    wait_for(&mut ticket_actions, |a| {
        matches!(a, TicketAction::TransactionReset)
    })
    .await?;

    println!("-- sign out, then cancel a fresh sign-in --");
    dispatcher.dispatch(AppTrigger::SignOut).await?;
    dispatcher
        .dispatch(AppTrigger::SignIn { credentials })
        .await?;
    dispatcher.dispatch(AppTrigger::CancelSignIn).await?;
    tokio::time::sleep(config.simulated_latency * 2).await;

    let signed_in = dispatcher.auth().state(|s| s.session.is_some()).await;
    println!("session after cancelled sign-in: {signed_in}");

    dispatcher.shutdown(config.shutdown_timeout).await?;
    Ok(())
}

/// Wait for an action matching the predicate, with a hard timeout
async fn wait_for<A: Clone>(
    rx: &mut broadcast::Receiver<A>,
    predicate: impl Fn(&A) -> bool,
) -> Result<A, Box<dyn std::error::Error>> {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match rx.recv().await {
                Ok(action) if predicate(&action) => return Ok(action),
                Ok(_) => {},
                Err(err) => return Err(Box::<dyn std::error::Error>::from(err)),
            }
        }
    })
    .await
    .map_err(|_| "timed out waiting for action")?
}
