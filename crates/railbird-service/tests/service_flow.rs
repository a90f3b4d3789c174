//! Actor-flow integration tests.
//!
//! These drive the service through its public handle exactly as a gateway
//! would: connect, authenticate, create/join, bet, ready, then consume the
//! pushed event stream through countdown, race frames, and the final
//! settlement. The tokio clock starts paused, so the countdown and frame
//! timers run instantly while preserving their ordering.

use ed25519_dalek::SigningKey;
use railbird_service::{Ed25519Verifier, RaceService, ServiceHandle};
use railbird_types::{
    BetSelection, BetSpec, ConnId, Horse, MatchPhase, Profile, RailbirdError, ServerEvent,
    ServiceConfig, SettlementResult,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn spawn_service() -> (ServiceHandle, SigningKey) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let signing = SigningKey::from_bytes(&[42u8; 32]);
    let verifier = Ed25519Verifier::new(signing.verifying_key());
    let handle = RaceService::spawn(ServiceConfig::default(), Box::new(verifier));
    (handle, signing)
}

async fn client(
    handle: &ServiceHandle,
    signing: &SigningKey,
    name: &str,
) -> (ConnId, UnboundedReceiver<ServerEvent>, Profile) {
    let (conn, rx) = handle.connect();
    let token = Ed25519Verifier::issue(signing, name);
    let profile = handle
        .authenticate(conn, &token)
        .await
        .expect("authentication succeeds");
    (conn, rx, profile)
}

fn single(horse: u8, amount: u64) -> BetSpec {
    BetSpec {
        selection: BetSelection::Single(Horse(horse)),
        amount,
    }
}

/// Drain one event stream until the settlement arrives, collecting the
/// countdown ticks and counting race frames along the way.
async fn drain_to_result(
    rx: &mut UnboundedReceiver<ServerEvent>,
) -> (SettlementResult, Vec<u8>, u32) {
    let mut ticks = Vec::new();
    let mut frames = 0u32;
    let drain = async {
        loop {
            match rx.recv().await.expect("event stream stays open") {
                ServerEvent::CountdownTick { seconds_remaining } => ticks.push(seconds_remaining),
                ServerEvent::RaceFrame { .. } => frames += 1,
                ServerEvent::RaceResult(result) => return result,
                ServerEvent::MatchUpdate(_) => {}
            }
        }
    };
    let result = tokio::time::timeout(Duration::from_secs(600), drain)
        .await
        .expect("race must settle within the timeout");
    (result, ticks, frames)
}

#[tokio::test(start_paused = true)]
async fn full_match_lifecycle() {
    let (handle, signing) = spawn_service();
    let (alice_conn, _alice_rx, alice_profile) = client(&handle, &signing, "alice").await;
    let (bob_conn, mut bob_rx, _) = client(&handle, &signing, "bob").await;
    assert_eq!(alice_profile.balance, 100);

    let id = handle.create_match(alice_conn).await.unwrap();
    let view = handle.join_match(bob_conn, id).await.unwrap();
    assert_eq!(view.phase, MatchPhase::Lobby);
    assert_eq!(view.players.len(), 2);

    handle.place_bet(alice_conn, id, single(3, 10)).await.unwrap();
    handle.place_bet(bob_conn, id, single(3, 10)).await.unwrap();
    handle.set_ready(alice_conn, id).await.unwrap();
    handle.set_ready(bob_conn, id).await.unwrap();

    let (result, ticks, frames) = drain_to_result(&mut bob_rx).await;

    assert_eq!(ticks, vec![3, 2, 1, 0], "one tick per countdown second");
    assert!(frames > 0, "at least one live frame");
    assert!(result.winner.in_field(5));
    assert_eq!(result.multipliers.len(), 5);

    // Identical bets, identical outcomes; balances follow the identity
    // prior − stake + payout.
    let alice = railbird_types::PlayerId::new("alice");
    let bob = railbird_types::PlayerId::new("bob");
    let alice_outcome = result.outcomes[&alice];
    let bob_outcome = result.outcomes[&bob];
    assert_eq!(alice_outcome, bob_outcome);
    if result.winner == Horse(3) {
        assert!(alice_outcome.won);
        // Pool 20 on horse 3: multiplier 25/21, payout 12.
        assert_eq!(alice_outcome.balance, 102);
        assert_eq!(alice_outcome.net, 2);
    } else {
        assert!(!alice_outcome.won);
        assert_eq!(alice_outcome.balance, 90);
        assert_eq!(alice_outcome.net, -10);
    }

    // A fresh authentication sees the settled profile.
    let (_, _, profile) = client(&handle, &signing, "alice").await;
    assert_eq!(profile.balance, alice_outcome.balance);
    assert_eq!(profile.wins, u32::from(alice_outcome.won));
    assert_eq!(profile.losses, u32::from(!alice_outcome.won));

    // Late result query: the match stays addressable after FINISHED.
    let view = handle.match_view(id).await.unwrap();
    assert_eq!(view.phase, MatchPhase::Finished);
    assert_eq!(view.winner, Some(result.winner));
    assert_eq!(view.leaderboard[result.winner.index()], 1);
}

#[tokio::test(start_paused = true)]
async fn operations_require_authentication() {
    let (handle, _) = spawn_service();
    let (conn, _rx) = handle.connect();

    let err = handle.create_match(conn).await.unwrap_err();
    assert!(matches!(err, RailbirdError::Unauthenticated { .. }));
}

#[tokio::test(start_paused = true)]
async fn bad_token_is_rejected() {
    let (handle, _) = spawn_service();
    let (conn, _rx) = handle.connect();
    let err = handle.authenticate(conn, "alice.deadbeef").await.unwrap_err();
    assert!(matches!(err, RailbirdError::Unauthenticated { .. }));
}

#[tokio::test(start_paused = true)]
async fn bet_failures_reply_with_structured_errors() {
    let (handle, signing) = spawn_service();
    let (conn, _rx, _) = client(&handle, &signing, "alice").await;
    let id = handle.create_match(conn).await.unwrap();

    let err = handle.place_bet(conn, id, single(3, 2)).await.unwrap_err();
    assert!(matches!(err, RailbirdError::InvalidBet { .. }));

    let err = handle.place_bet(conn, id, single(3, 500)).await.unwrap_err();
    assert!(matches!(err, RailbirdError::InsufficientFunds { .. }));

    let err = handle
        .place_bet(conn, id, single(9, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, RailbirdError::InvalidBet { .. }));

    // None of the failures charged anything.
    let (_, _, profile) = client(&handle, &signing, "alice").await;
    assert_eq!(profile.balance, 100);
}

#[tokio::test(start_paused = true)]
async fn join_unknown_match_fails() {
    let (handle, signing) = spawn_service();
    let (conn, _rx, _) = client(&handle, &signing, "alice").await;
    let err = handle
        .join_match(conn, railbird_types::MatchId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RailbirdError::MatchNotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn join_is_rejected_once_countdown_starts() {
    let (handle, signing) = spawn_service();
    let (alice_conn, _alice_rx, _) = client(&handle, &signing, "alice").await;
    let (bob_conn, _bob_rx, _) = client(&handle, &signing, "bob").await;

    let id = handle.create_match(alice_conn).await.unwrap();
    // Sole participant ready: countdown starts immediately.
    handle.set_ready(alice_conn, id).await.unwrap();

    let err = handle.join_match(bob_conn, id).await.unwrap_err();
    assert!(matches!(
        err,
        RailbirdError::MatchClosed {
            phase: MatchPhase::Countdown
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn disconnect_refunds_and_updates_the_lobby() {
    let (handle, signing) = spawn_service();
    let (alice_conn, mut alice_rx, _) = client(&handle, &signing, "alice").await;
    let (bob_conn, _bob_rx, _) = client(&handle, &signing, "bob").await;

    let id = handle.create_match(alice_conn).await.unwrap();
    handle.join_match(bob_conn, id).await.unwrap();
    handle.place_bet(bob_conn, id, single(2, 10)).await.unwrap();

    handle.disconnect(bob_conn);

    // Alice eventually sees a lobby without bob.
    let bob = railbird_types::PlayerId::new("bob");
    let saw_departure = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let ServerEvent::MatchUpdate(view) =
                alice_rx.recv().await.expect("stream open")
            {
                if !view.players.contains_key(&bob) {
                    return view;
                }
            }
        }
    })
    .await
    .expect("departure broadcast arrives");
    assert_eq!(saw_departure.players.len(), 1);

    // Bob's stake was neutralized, not kept.
    let (_, _, profile) = client(&handle, &signing, "bob").await;
    assert_eq!(profile.balance, 100);
}

#[tokio::test(start_paused = true)]
async fn abandoned_match_timers_are_silent() {
    let (handle, signing) = spawn_service();
    let (conn, mut rx, _) = client(&handle, &signing, "alice").await;

    let id = handle.create_match(conn).await.unwrap();
    handle.set_ready(conn, id).await.unwrap();
    // Abandon the match mid-countdown; pending ticks must no-op.
    handle.leave_match(conn, id);

    // The match is gone for late queries...
    let gone = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if matches!(
                handle.match_view(id).await,
                Err(RailbirdError::MatchNotFound(_))
            ) {
                return;
            }
        }
    })
    .await;
    assert!(gone.is_ok(), "retired match must stop resolving");

    // ...and no countdown tick or frame ever reaches the leaver after the
    // timers fire into the void.
    tokio::time::sleep(Duration::from_secs(10)).await;
    let mut post_leave_race_events = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(
            event,
            ServerEvent::RaceFrame { .. } | ServerEvent::RaceResult(_)
        ) {
            post_leave_race_events += 1;
        }
    }
    assert_eq!(post_leave_race_events, 0);
}
