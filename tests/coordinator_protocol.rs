//! Protocol scenarios driven through the coordinator, without a network.

use block_four::{
    BoardMirror, ClientMsg, Coordinator, Envelope, LobbyUser, ParticipantId, RoomId, ServerConfig,
    ServerMsg, Winner,
};
use block_four_rules::{Player, Position};

/// Messages addressed to `id`, in order.
fn sent_to(out: &[Envelope], id: ParticipantId) -> Vec<ServerMsg> {
    out.iter()
        .filter(|e| e.to == id)
        .map(|e| e.msg.clone())
        .collect()
}

fn error_text(out: &[Envelope], id: ParticipantId) -> Option<String> {
    sent_to(out, id).into_iter().find_map(|msg| match msg {
        ServerMsg::Error { message } => Some(message),
        _ => None,
    })
}

fn lobby_member(coordinator: &mut Coordinator, nickname: &str) -> ParticipantId {
    let id = coordinator.connect();
    coordinator.handle(
        id,
        ClientMsg::Login {
            nickname: nickname.to_string(),
        },
    );
    coordinator.handle(id, ClientMsg::EnterLobby);
    id
}

fn place(room_id: &RoomId, index: usize, color: Player) -> ClientMsg {
    let room_id = room_id.clone();
    if index == Position::CENTER.index() {
        ClientMsg::PlaceCentralBlock {
            room_id,
            index,
            color,
        }
    } else {
        ClientMsg::PlaceBlock {
            room_id,
            index,
            color,
        }
    }
}

/// Two anonymous players paired through the queue: (coordinator, red, blue, room).
fn queued_pair() -> (Coordinator, ParticipantId, ParticipantId, RoomId) {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let waiter = coordinator.connect();
    let joiner = coordinator.connect();
    coordinator.handle(waiter, ClientMsg::FindMatch);
    let out = coordinator.handle(joiner, ClientMsg::FindMatch);
    let room = match sent_to(&out, joiner).first() {
        Some(ServerMsg::MatchAccepted { room_id, .. }) => room_id.clone(),
        other => panic!("expected matchAccepted, got {:?}", other),
    };
    (coordinator, joiner, waiter, room)
}

#[test]
fn test_queue_pairs_joiner_as_red() {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let waiter = coordinator.connect();
    let joiner = coordinator.connect();

    let out = coordinator.handle(waiter, ClientMsg::FindMatch);
    assert_eq!(sent_to(&out, waiter), vec![ServerMsg::Waiting]);

    let out = coordinator.handle(joiner, ClientMsg::FindMatch);
    let room_id = RoomId::for_pair(joiner, waiter, 1);
    assert_eq!(
        sent_to(&out, joiner),
        vec![ServerMsg::MatchAccepted {
            room_id: room_id.clone(),
            color: Player::Red,
            opponent_nickname: format!("Guest {}", waiter),
        }]
    );
    assert_eq!(
        sent_to(&out, waiter),
        vec![ServerMsg::MatchAccepted {
            room_id,
            color: Player::Blue,
            opponent_nickname: format!("Guest {}", joiner),
        }]
    );
    assert_eq!(coordinator.registry().room_count(), 1);
}

#[test]
fn test_roster_follows_lobby() {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let ana = coordinator.connect();
    coordinator.handle(
        ana,
        ClientMsg::Login {
            nickname: "  ana ".into(),
        },
    );
    let out = coordinator.handle(ana, ClientMsg::EnterLobby);
    assert_eq!(
        sent_to(&out, ana),
        vec![ServerMsg::UpdateOnlineUsers(vec![LobbyUser {
            id: ana,
            nickname: "ana".into()
        }])]
    );

    let bo = lobby_member(&mut coordinator, "bo");
    let out = coordinator.handle(bo, ClientMsg::LeaveLobby);
    assert_eq!(
        sent_to(&out, ana),
        vec![ServerMsg::UpdateOnlineUsers(vec![LobbyUser {
            id: ana,
            nickname: "ana".into()
        }])]
    );

    coordinator.handle(bo, ClientMsg::EnterLobby);
    let out = coordinator.disconnect(ana);
    assert_eq!(
        sent_to(&out, bo),
        vec![ServerMsg::UpdateOnlineUsers(vec![LobbyUser {
            id: bo,
            nickname: "bo".into()
        }])]
    );
}

#[test]
fn test_invite_and_accept() {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let ana = lobby_member(&mut coordinator, "ana");
    let bo = lobby_member(&mut coordinator, "bo");
    let cy = lobby_member(&mut coordinator, "cy");

    let out = coordinator.handle(ana, ClientMsg::SendMatchRequest { target_id: bo });
    assert_eq!(
        sent_to(&out, bo),
        vec![ServerMsg::MatchRequest {
            requester_id: ana,
            requester_nickname: "ana".into()
        }]
    );

    let out = coordinator.handle(bo, ClientMsg::AcceptMatch { requester_id: ana });
    assert_eq!(
        sent_to(&out, ana),
        vec![ServerMsg::MatchAccepted {
            room_id: RoomId::for_pair(ana, bo, 1),
            color: Player::Red,
            opponent_nickname: "bo".into(),
        }]
    );
    assert!(matches!(
        sent_to(&out, bo).as_slice(),
        [ServerMsg::MatchAccepted {
            color: Player::Blue,
            ..
        }]
    ));
    // The pair left the roster.
    assert_eq!(
        sent_to(&out, cy),
        vec![ServerMsg::UpdateOnlineUsers(vec![LobbyUser {
            id: cy,
            nickname: "cy".into()
        }])]
    );

    // Seated players cannot be invited or re-queue.
    let out = coordinator.handle(cy, ClientMsg::SendMatchRequest { target_id: ana });
    assert!(error_text(&out, cy).is_some());
    let out = coordinator.handle(ana, ClientMsg::FindMatch);
    assert_eq!(error_text(&out, ana).as_deref(), Some("already in a match"));
}

#[test]
fn test_decline_consumes_invite() {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let ana = lobby_member(&mut coordinator, "ana");
    let bo = lobby_member(&mut coordinator, "bo");

    coordinator.handle(ana, ClientMsg::SendMatchRequest { target_id: bo });
    let out = coordinator.handle(bo, ClientMsg::DeclineMatch { requester_id: ana });
    assert_eq!(
        sent_to(&out, ana),
        vec![ServerMsg::MatchDeclined {
            target_nickname: "bo".into()
        }]
    );

    let out = coordinator.handle(bo, ClientMsg::AcceptMatch { requester_id: ana });
    assert!(error_text(&out, bo).is_some());
    assert_eq!(coordinator.registry().room_count(), 0);

    let out = coordinator.handle(ana, ClientMsg::SendMatchRequest { target_id: ana });
    assert_eq!(
        error_text(&out, ana).as_deref(),
        Some("you cannot challenge yourself")
    );
}

#[test]
fn test_chat_broadcast_and_duplicates() {
    let mut coordinator = Coordinator::new(ServerConfig::default());
    let ana = lobby_member(&mut coordinator, "ana");
    let bo = lobby_member(&mut coordinator, "bo");

    let out = coordinator.handle(
        ana,
        ClientMsg::ChatMessage {
            text: " hello ".into(),
        },
    );
    let line = ServerMsg::ChatMessage {
        nickname: "ana".into(),
        text: "hello".into(),
    };
    assert_eq!(sent_to(&out, ana), vec![line.clone()]);
    assert_eq!(sent_to(&out, bo), vec![line]);

    let out = coordinator.handle(
        ana,
        ClientMsg::ChatMessage {
            text: "hello".into(),
        },
    );
    assert_eq!(out.len(), 1);
    assert!(error_text(&out, ana).is_some());

    let out = coordinator.handle(bo, ClientMsg::ChatMessage { text: "   ".into() });
    assert!(out.is_empty());
}

#[test]
fn test_out_of_turn_moves_refused() {
    let (mut coordinator, red, blue, room) = queued_pair();

    let out = coordinator.handle(blue, place(&room, 24, Player::Blue));
    assert_eq!(error_text(&out, blue).as_deref(), Some("not your turn"));
    assert!(sent_to(&out, red).is_empty());

    let out = coordinator.handle(red, place(&room, 23, Player::Red));
    assert_eq!(
        error_text(&out, red).as_deref(),
        Some("must place center first")
    );

    coordinator.handle(red, place(&room, 24, Player::Red));
    let out = coordinator.handle(red, place(&room, 23, Player::Red));
    assert_eq!(error_text(&out, red).as_deref(), Some("not your turn"));

    // Blue claiming red's colour is refused too.
    let out = coordinator.handle(blue, place(&room, 23, Player::Red));
    assert!(error_text(&out, blue).is_some());
    let game = coordinator.registry().room(&room).unwrap().game();
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_win_is_broadcast_and_room_closes() {
    let (mut coordinator, red, blue, room) = queued_pair();
    let mut red_view = BoardMirror::new();
    let mut blue_view = BoardMirror::new();
    red_view.apply(&ServerMsg::MatchAccepted {
        room_id: room.clone(),
        color: Player::Red,
        opponent_nickname: "blue".into(),
    });
    blue_view.apply(&ServerMsg::MatchAccepted {
        room_id: room.clone(),
        color: Player::Blue,
        opponent_nickname: "red".into(),
    });

    let moves = [
        (red, 24, Player::Red),
        (blue, 17, Player::Blue),
        (red, 25, Player::Red),
        (blue, 18, Player::Blue),
        (red, 26, Player::Red),
        (blue, 19, Player::Blue),
        (red, 27, Player::Red),
    ];
    let mut last = Vec::new();
    for (who, index, color) in moves {
        last = coordinator.handle(who, place(&room, index, color));
        for msg in sent_to(&last, red) {
            red_view.apply(&msg);
        }
        for msg in sent_to(&last, blue) {
            blue_view.apply(&msg);
        }
    }

    let expected = vec![
        ServerMsg::BlockPlaced {
            index: 27,
            player: Player::Red,
            red_count: 20,
            blue_count: 21,
        },
        ServerMsg::GameOver {
            winner: Winner::Red,
        },
    ];
    assert_eq!(sent_to(&last, red), expected);
    assert_eq!(sent_to(&last, blue), expected);

    assert_eq!(red_view.winner(), Some(Winner::Red));
    assert_eq!(red_view.board(), blue_view.board());
    assert_eq!(red_view.counts(), (20, 21));
    assert_eq!(coordinator.registry().room_count(), 0);

    // The room is gone, so further moves are dropped silently.
    let out = coordinator.handle(blue, place(&room, 20, Player::Blue));
    assert!(out.is_empty());
}

#[test]
fn test_draw_is_broadcast_and_room_closes() {
    // Fills every cell but 41 without a line; each move obeys the frontier rule.
    const DRAW_GAME: [usize; 48] = [
        24, 23, 17, 10, 18, 12, 5, 6, 13, 20, 19, 26, 32, 33, 27, 34, 40, 39, 45, 44, 36, 30, 29,
        28, 22, 21, 14, 8, 0, 7, 1, 2, 3, 11, 4, 15, 9, 16, 31, 25, 35, 43, 42, 47, 46, 38, 37, 48,
    ];
    let (mut coordinator, red, blue, room) = queued_pair();

    let (last, rest) = DRAW_GAME.split_last().unwrap();
    for (turn, &index) in rest.iter().enumerate() {
        let (who, color) = if turn % 2 == 0 {
            (red, Player::Red)
        } else {
            (blue, Player::Blue)
        };
        let out = coordinator.handle(who, place(&room, index, color));
        assert!(
            error_text(&out, who).is_none(),
            "move {} at {} refused",
            turn,
            index
        );
        assert!(!out
            .iter()
            .any(|e| matches!(e.msg, ServerMsg::GameOver { .. })));
    }

    let out = coordinator.handle(blue, place(&room, *last, Player::Blue));
    let expected = vec![
        ServerMsg::BlockPlaced {
            index: 48,
            player: Player::Blue,
            red_count: 0,
            blue_count: 0,
        },
        ServerMsg::GameOver {
            winner: Winner::Draw,
        },
    ];
    assert_eq!(sent_to(&out, red), expected);
    assert_eq!(sent_to(&out, blue), expected);
    assert_eq!(coordinator.registry().room_count(), 0);
    assert!(coordinator.registry().participant(red).unwrap().room().is_none());
}

#[test]
fn test_undo_round_trip() {
    let (mut coordinator, red, blue, room) = queued_pair();
    coordinator.handle(red, place(&room, 24, Player::Red));

    let out = coordinator.handle(blue, ClientMsg::UndoMove {
        room_id: room.clone(),
    });
    assert_eq!(
        error_text(&out, blue).as_deref(),
        Some("the center block cannot be undone")
    );

    coordinator.handle(blue, place(&room, 23, Player::Blue));
    let out = coordinator.handle(red, ClientMsg::UndoMove {
        room_id: room.clone(),
    });
    let expected = vec![
        ServerMsg::MoveUndone {
            index: 23,
            red_count: 23,
            blue_count: 24,
            current_player: Player::Blue,
        },
        ServerMsg::TurnChange {
            current_player: Player::Blue,
        },
    ];
    assert_eq!(sent_to(&out, red), expected);
    assert_eq!(sent_to(&out, blue), expected);

    // Blue is back on move and may place again.
    let out = coordinator.handle(blue, place(&room, 31, Player::Blue));
    assert!(error_text(&out, blue).is_none());
}

#[test]
fn test_exit_and_disconnect_notify_opponent() {
    let (mut coordinator, red, blue, room) = queued_pair();
    let out = coordinator.handle(red, ClientMsg::ExitGame {
        room_id: room.clone(),
    });
    assert_eq!(
        out,
        vec![Envelope::new(blue, ServerMsg::OpponentDisconnected)]
    );
    assert_eq!(coordinator.registry().room_count(), 0);

    // Both are free to queue again.
    coordinator.handle(red, ClientMsg::FindMatch);
    let out = coordinator.handle(blue, ClientMsg::FindMatch);
    assert_eq!(sent_to(&out, blue).len(), 1);
    assert_eq!(coordinator.registry().room_count(), 1);

    let out = coordinator.disconnect(blue);
    assert_eq!(out, vec![Envelope::new(red, ServerMsg::OpponentDisconnected)]);
    assert_eq!(coordinator.registry().room_count(), 0);
}

#[test]
fn test_emoji_relay() {
    let (mut coordinator, red, blue, room) = queued_pair();
    let out = coordinator.handle(
        blue,
        ClientMsg::SendEmoji {
            room_id: room.clone(),
            symbol: "👍".into(),
        },
    );
    let expected = ServerMsg::ReceiveEmoji {
        symbol: "👍".into(),
    };
    assert_eq!(sent_to(&out, red), vec![expected.clone()]);
    assert_eq!(sent_to(&out, blue), vec![expected]);

    let out = coordinator.handle(
        red,
        ClientMsg::SendEmoji {
            room_id: room,
            symbol: "🦀".into(),
        },
    );
    assert!(error_text(&out, red).is_some());
}
