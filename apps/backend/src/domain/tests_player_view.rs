//! Visibility rules of the per-participant view.

use crate::domain::machine;
use crate::domain::player_view::build_player_view;
use crate::domain::roles::Role;
use crate::domain::state::{Phase, PhaseKind};
use crate::domain::test_state_helpers::{discussion, lobby, roles, voting};
use crate::domain::win::GameOutcome;
use crate::domain::words::MR_WHITE_MARKER;

#[test]
fn lobby_view_hides_words_and_roles() {
    let snap = lobby(3, roles(1, 0));
    let view = build_player_view(&snap, 1).unwrap();
    assert_eq!(view.phase, PhaseKind::Waiting);
    assert_eq!(view.me.word, None);
    assert_eq!(view.me.role, None);
    assert!(view.participants.iter().all(|p| p.role.is_none()));
    assert_eq!(view.participants.len(), 3);
}

#[test]
fn players_see_only_their_own_word() {
    let snap = discussion(
        &[(1, Role::Civilian), (2, Role::Undercover), (3, Role::Civilian), (4, Role::MrWhite)],
        10,
    );

    let civilian = build_player_view(&snap, 1).unwrap();
    assert_eq!(civilian.me.word.as_deref(), Some("coffee"));
    assert_eq!(civilian.me.role, None);

    let undercover = build_player_view(&snap, 2).unwrap();
    assert_eq!(undercover.me.word.as_deref(), Some("tea"));
    assert_eq!(undercover.me.role, None, "undercovers are not told their role");

    let mr_white = build_player_view(&snap, 4).unwrap();
    assert_eq!(mr_white.me.word.as_deref(), Some(MR_WHITE_MARKER));
    assert_eq!(mr_white.me.role, Some(Role::MrWhite));

    assert_eq!(civilian.current_turn, Some(1));
    assert!(civilian.revealed_words.is_none());
    assert!(civilian.participants.iter().all(|p| p.role.is_none()));
}

#[test]
fn eliminated_roles_are_public() {
    let mut snap = voting(
        &[(1, Role::Civilian), (2, Role::Undercover), (3, Role::Civilian), (4, Role::Civilian)],
        10,
    );
    if let Some(p) = snap.participant_mut(3) {
        p.eliminate(1);
    }
    machine::cast_vote(&mut snap, 1, 2).unwrap();

    let view = build_player_view(&snap, 4).unwrap();
    let third = view.participants.iter().find(|p| p.id == 3).unwrap();
    assert_eq!(third.role, Some(Role::Civilian));
    assert_eq!(third.eliminated_round, Some(1));
    let first = view.participants.iter().find(|p| p.id == 1).unwrap();
    assert!(first.has_voted);
    assert_eq!(first.role, None);

    let own = build_player_view(&snap, 1).unwrap();
    assert_eq!(own.me.vote_target, Some(2));
}

#[test]
fn results_reveal_everything() {
    let mut snap = discussion(&[(1, Role::Civilian), (2, Role::Undercover), (3, Role::Civilian)], 10);
    snap.session.phase = Phase::Results {
        outcome: GameOutcome::UndercoversWin,
    };
    let view = build_player_view(&snap, 1).unwrap();
    assert_eq!(view.outcome, Some(GameOutcome::UndercoversWin));
    assert_eq!(view.me.role, Some(Role::Civilian));
    assert!(view.participants.iter().all(|p| p.role.is_some()));
    let words = view.revealed_words.unwrap();
    assert_eq!(words.civilian_word, "coffee");
    assert_eq!(words.undercover_word, "tea");
    assert_eq!(view.current_turn, None);
}

#[test]
fn unknown_viewer_is_not_found() {
    let snap = lobby(3, roles(1, 0));
    assert!(build_player_view(&snap, 99).is_err());
}

#[test]
fn stale_turn_pointer_shows_the_participant_actually_awaited() {
    let mut snap = discussion(
        &[(1, Role::Civilian), (2, Role::Undercover), (3, Role::Civilian)],
        10,
    );
    // Holder's clue landed without the pointer moving.
    if let Some(p) = snap.participant_mut(1) {
        p.clue = Some("bean".into());
    }
    assert_eq!(snap.current_turn_holder(), Some(1));
    assert_eq!(snap.awaiting_turn_holder(), Some(2));

    let view = build_player_view(&snap, 3).unwrap();
    assert_eq!(view.current_turn, Some(2));
    let lifecycle = crate::domain::game_transition::SessionLifecycleView::from_snapshot(&snap);
    assert_eq!(lifecycle.turn, Some(2));

    machine::submit_clue(&mut snap, view.current_turn.unwrap(), "leaf").unwrap();
    assert_eq!(snap.awaiting_turn_holder(), Some(3));
}
