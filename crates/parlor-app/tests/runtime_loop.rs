//! Integration tests driving the full runtime loop.
//!
//! A [`SimClient`] plays the messaging service and a [`SimHost`] records
//! what the user would have seen; the runtime under test is the same loop a
//! real surface would run.

use std::{sync::Arc, time::Duration};

use parlor_app::{ControllerConfig, HostIntent, MembershipPhase, TimelineRuntime};
use parlor_core::{Membership, RoomId, RoomSnapshot, ScrollProbe, TimelineEvent};
use parlor_harness::{JoinOutcome, SimClient, SimHost, SimHostHandle, render_lines};

const ROOM: &str = "!lounge:example.org";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn room_id() -> RoomId {
    RoomId::from(ROOM)
}

fn invited_snapshot() -> RoomSnapshot {
    RoomSnapshot::new(ROOM, Membership::Invite).with_inviter("@inviter:example.org")
}

fn joined_snapshot(bodies: &[&str]) -> RoomSnapshot {
    RoomSnapshot::new(ROOM, Membership::Join).with_timeline(
        bodies.iter().enumerate().map(|(i, body)| {
            TimelineEvent::new(format!("${i}"), "@peer:example.org", *body, i as u64)
        }),
    )
}

fn event(seq: u64) -> TimelineEvent {
    TimelineEvent::new(format!("$live-{seq}"), "@peer:example.org", format!("live {seq}"), seq)
}

/// Poll `cond` until it holds or a generous deadline passes.
async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    cond()
}

fn spawn_runtime(
    client: &Arc<SimClient>,
    config: ControllerConfig,
) -> (SimHostHandle, tokio::task::JoinHandle<()>) {
    let (host, handle) = SimHost::new();
    let runtime = TimelineRuntime::new(Arc::clone(client), host, config);
    let task = tokio::spawn(async move {
        runtime.run(room_id()).await.expect("runtime");
    });
    (handle, task)
}

#[tokio::test]
async fn join_flow_admits_one_request_while_held() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(invited_snapshot());
    client.script_join(&room_id(), JoinOutcome::Hold);
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());

    assert!(wait_for(|| !handle.renders().is_empty()).await, "initial render");

    handle.send(HostIntent::JoinRequested);
    handle.send(HostIntent::JoinRequested);
    assert!(
        wait_for(|| handle.last_render().is_some_and(|s| s.phase() == MembershipPhase::Joining))
            .await,
        "joining render"
    );
    assert_eq!(client.join_calls(), 1, "duplicate submission must not reach the client");

    client.release_join(&room_id(), Ok(()));
    assert!(
        wait_for(|| handle.last_render().is_some_and(|s| s.phase() == MembershipPhase::Joined))
            .await,
        "joined render"
    );
    let state = handle.last_render().expect("state");
    assert!(!state.joining());
    assert!(state.join_error().is_none());

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn rejected_join_is_displayed_and_retryable() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(invited_snapshot());
    client.script_join(&room_id(), JoinOutcome::Reject("M_FORBIDDEN".into()));
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());

    handle.send(HostIntent::JoinRequested);
    assert!(
        wait_for(|| handle.last_render().is_some_and(|s| s.join_error().is_some())).await,
        "error render"
    );

    let state = handle.last_render().expect("state");
    assert_eq!(state.join_error().map(|e| e.code.as_str()), Some("M_FORBIDDEN"));
    assert_eq!(state.phase(), MembershipPhase::Invited);
    assert!(render_lines(&state).contains(&"Failed to join room!".to_owned()));

    // The user retries and the server relents.
    client.script_join(&room_id(), JoinOutcome::Accept);
    handle.send(HostIntent::JoinRequested);
    assert!(
        wait_for(|| handle.last_render().is_some_and(|s| s.phase() == MembershipPhase::Joined))
            .await,
        "joined render"
    );
    assert_eq!(client.join_calls(), 2);

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn autoscroll_only_while_pinned_to_bottom() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(joined_snapshot(&["hello"]));
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());

    assert!(wait_for(|| handle.scrolls() == 1).await, "initial scroll-to-bottom");

    handle.set_probe(Some(ScrollProbe::new(400, 1000, 600)));
    client.push_event(&room_id(), event(1));
    assert!(wait_for(|| handle.renders().len() == 2).await, "render after event");
    assert_eq!(handle.scrolls(), 2, "pinned viewport follows new messages");

    // Scrolled up: new messages must not yank the viewport.
    handle.set_probe(Some(ScrollProbe::new(0, 1000, 600)));
    client.push_event(&room_id(), event(2));
    assert!(wait_for(|| handle.renders().len() == 3).await, "render after event");
    assert_eq!(handle.scrolls(), 2, "scrolled-up viewport is left alone");
    assert!(!handle.last_render().expect("state").at_bottom());

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn initial_scroll_can_be_disabled() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(joined_snapshot(&["hello"]));
    let (handle, task) =
        spawn_runtime(&client, ControllerConfig { scroll_on_attach: false });

    assert!(wait_for(|| !handle.renders().is_empty()).await, "initial render");
    assert_eq!(handle.scrolls(), 0);

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn foreign_room_events_are_invisible() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(joined_snapshot(&[]));
    client.insert_room(RoomSnapshot::new("!other:example.org", Membership::Join));
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());

    assert!(wait_for(|| !handle.renders().is_empty()).await, "initial render");

    // Feed order is delivery order, so once the bound-room event has
    // rendered we know the foreign one was processed and dropped.
    client.push_event(&RoomId::from("!other:example.org"), event(1));
    client.push_event(&room_id(), event(2));
    assert!(wait_for(|| handle.renders().len() == 2).await, "render after bound event");

    let state = handle.last_render().expect("state");
    let room = state.room().expect("snapshot");
    assert_eq!(room.room_id, room_id());
    assert!(room.timeline.iter().all(|e| e.body != "live 1"));

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn probe_intent_updates_next_scroll_decision() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(joined_snapshot(&["hello"]));
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());
    assert!(wait_for(|| handle.scrolls() == 1).await, "initial scroll-to-bottom");

    // Report a scrolled-up viewport through the intent channel, then give
    // the loop a moment before the next event arrives.
    handle.send(HostIntent::Probe(ScrollProbe::new(0, 1000, 600)));
    tokio::time::sleep(Duration::from_millis(20)).await;

    client.push_event(&room_id(), event(1));
    assert!(wait_for(|| handle.renders().len() == 2).await, "render after event");
    assert_eq!(handle.scrolls(), 1);
    assert!(!handle.last_render().expect("state").at_bottom());

    handle.send(HostIntent::Detach);
    task.await.expect("task");
}

#[tokio::test]
async fn nothing_happens_after_detach() {
    init_tracing();
    let client = Arc::new(SimClient::new());
    client.insert_room(joined_snapshot(&[]));
    let (handle, task) = spawn_runtime(&client, ControllerConfig::default());

    assert!(wait_for(|| !handle.renders().is_empty()).await, "initial render");
    handle.send(HostIntent::Detach);
    task.await.expect("task");

    let renders_at_detach = handle.renders().len();
    client.push_event(&room_id(), event(1));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.renders().len(), renders_at_detach);
    assert_eq!(client.join_calls(), 0);
}
