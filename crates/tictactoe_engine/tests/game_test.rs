//! Tests for game state transitions and notifications.

use tictactoe_engine::rules::{check_winner, is_draw, is_full, winning_line};
use tictactoe_engine::{
    Board, Game, GameEvent, GameMode, GameStatus, MoveError, Player, Position, ResumeError,
    StatusMessage, WinningLine,
};

fn recording(mode: GameMode) -> Game<Vec<GameEvent>> {
    let mut game = Game::with_sink(mode, Vec::new());
    game.sink_mut().clear();
    game
}

fn play(game: &mut Game<Vec<GameEvent>>, moves: &[usize]) {
    for &index in moves {
        assert!(game.attempt_move(index), "move {} should be accepted", index);
    }
}

#[test]
fn test_new_game_announces_first_player() {
    let game = Game::with_sink(GameMode::TwoPlayers, Vec::new());
    assert_eq!(
        game.sink().as_slice(),
        &[
            GameEvent::Redraw {
                board: Board::new()
            },
            GameEvent::Status(StatusMessage::turn(Player::O)),
        ]
    );
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_accepted_move_toggles_turn_and_notifies() {
    let mut game = recording(GameMode::TwoPlayers);
    assert!(game.attempt_move(4));

    assert_eq!(game.to_move(), Player::X);
    let board: Board = "....O....".parse().unwrap();
    assert_eq!(game.board(), &board);
    assert_eq!(
        game.sink().as_slice(),
        &[
            GameEvent::Redraw { board },
            GameEvent::Status(StatusMessage::turn(Player::X)),
        ]
    );
}

#[test]
fn test_occupied_or_out_of_range_never_mutates() {
    let mut game = recording(GameMode::TwoPlayers);
    play(&mut game, &[4]);
    game.sink_mut().clear();
    let before = game.snapshot();

    for index in [4, 9, 10, usize::MAX] {
        assert!(!game.attempt_move(index));
    }

    assert_eq!(game.snapshot(), before);
    assert!(game.sink().is_empty(), "rejected moves must not notify");
}

#[test]
fn test_winning_move_is_terminal() {
    let mut game = recording(GameMode::TwoPlayers);
    // O: 0, 1, 2 (top row); X: 3, 4.
    play(&mut game, &[0, 3, 1, 4]);
    game.sink_mut().clear();
    assert!(game.attempt_move(2));

    let top_row = WinningLine::ALL[0];
    assert_eq!(
        game.status(),
        GameStatus::Won {
            winner: Player::O,
            line: top_row
        }
    );
    assert_eq!(game.winner(), Some(Player::O));
    assert_eq!(game.winning_line(), Some(top_row));
    // The turn pointer stays on the player who just won.
    assert_eq!(game.to_move(), Player::O);

    let events = game.sink().as_slice();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], GameEvent::Redraw { .. }));
    assert_eq!(events[1], GameEvent::Highlight(top_row));
    assert_eq!(events[2], GameEvent::Status(StatusMessage::won(Player::O)));
}

#[test]
fn test_terminal_game_rejects_everything() {
    let mut game = recording(GameMode::TwoPlayers);
    play(&mut game, &[0, 3, 1, 4, 2]);
    game.sink_mut().clear();
    let before = game.snapshot();

    for index in 0..9 {
        assert_eq!(game.try_move(index), Err(MoveError::GameOver));
    }
    assert_eq!(game.snapshot(), before);
    assert!(game.sink().is_empty());
}

#[test]
fn test_draw_leaves_turn_pointer() {
    let mut game = recording(GameMode::TwoPlayers);
    // O X O / O X X / X O O
    play(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6]);
    assert_eq!(game.to_move(), Player::O);
    game.sink_mut().clear();
    assert!(game.attempt_move(8));

    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.winner(), None);
    assert_eq!(
        game.sink().last(),
        Some(&GameEvent::Status(StatusMessage::Draw))
    );
    assert!(!game.sink().iter().any(|e| matches!(e, GameEvent::Highlight(_))));
}

#[test]
fn test_turn_toggles_once_per_non_terminal_move() {
    let sequences: [&[usize]; 4] = [
        &[0, 3, 1, 4, 2],
        &[4, 0, 8, 2, 1, 7, 6, 3, 5],
        &[0, 1, 2, 4, 3, 5, 7, 6, 8],
        &[8, 7, 4, 5, 0],
    ];

    for moves in sequences {
        let mut game = Game::new(GameMode::TwoPlayers);
        for &index in moves {
            let before = game.to_move();
            assert!(game.attempt_move(index));
            if game.is_over() {
                assert_eq!(game.to_move(), before);
            } else {
                assert_eq!(game.to_move(), before.opponent());
            }
        }
        assert!(game.is_over());
    }
}

#[test]
fn test_terminal_evaluation_agrees_with_rules_everywhere() {
    fn walk(game: &Game, visited: &mut usize) {
        for index in game.board().empty_positions().map(Position::to_index).collect::<Vec<_>>() {
            let mut child = game.clone();
            let mark = child.to_move();
            assert!(child.attempt_move(index));
            *visited += 1;

            let board = child.board();
            assert_eq!(child.winner() == Some(mark), check_winner(board, mark));
            assert_eq!(child.winning_line(), winning_line(board, mark));
            assert!(!check_winner(board, mark.opponent()));
            assert_eq!(child.status() == GameStatus::Draw, is_draw(board));
            assert_eq!(child.is_over(), check_winner(board, mark) || is_full(board));

            if !child.is_over() {
                walk(&child, visited);
            }
        }
    }

    let mut visited = 0;
    walk(&Game::new(GameMode::TwoPlayers), &mut visited);
    // Every move sequence of a complete game tree.
    assert_eq!(visited, 549_945);
}

#[test]
fn test_reset_clears_and_switches_mode() {
    let mut game = recording(GameMode::TwoPlayers);
    play(&mut game, &[0, 3, 1, 4, 2]);
    game.sink_mut().clear();

    game.reset(GameMode::VsComputer);

    assert_eq!(game.board(), &Board::new());
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.mode(), GameMode::VsComputer);
    assert_eq!(
        game.sink().as_slice(),
        &[
            GameEvent::Redraw {
                board: Board::new()
            },
            GameEvent::Status(StatusMessage::turn(Player::O)),
        ]
    );
    assert!(game.attempt_move(0));
}

#[test]
fn test_vs_computer_requests_computer_turn() {
    let mut game = Game::with_sink(GameMode::VsComputer, Vec::new())
        .with_computer_delay(std::time::Duration::from_millis(250));
    game.sink_mut().clear();

    assert!(game.attempt_move(4));
    assert!(game.is_computer_turn());
    assert_eq!(
        game.sink().last(),
        Some(&GameEvent::ComputerTurn {
            delay_ms: 250,
            snapshot: game.snapshot(),
        })
    );

    game.sink_mut().clear();
    let reply = game.play_computer_move().unwrap();
    assert_eq!(reply.position, Position::TopLeft);
    assert!(!game.is_computer_turn());
    assert!(
        !game
            .sink()
            .iter()
            .any(|e| matches!(e, GameEvent::ComputerTurn { .. })),
        "no computer turn after the computer moved"
    );
}

#[test]
fn test_two_players_never_requests_computer() {
    let mut game = recording(GameMode::TwoPlayers);
    play(&mut game, &[4, 0, 8]);
    assert!(!game.is_computer_turn());
    assert!(
        !game
            .sink()
            .iter()
            .any(|e| matches!(e, GameEvent::ComputerTurn { .. }))
    );
}

#[test]
fn test_computer_takes_win_and_blocks() {
    // Human O threatens the top row; computer X must block at 2.
    let mut game = Game::new(GameMode::VsComputer);
    assert!(game.attempt_move(0));
    assert_eq!(game.play_computer_move().unwrap().index(), 4);
    assert!(game.attempt_move(1));
    assert_eq!(game.play_computer_move().unwrap().index(), 2);

    // X now threatens 2-4-6; O builds 0-3-6 instead and X completes the diagonal.
    assert!(game.attempt_move(3));
    let finish = game.play_computer_move().unwrap();
    assert_eq!(finish.index(), 6);
    assert_eq!(game.winner(), Some(Player::X));
    assert_eq!(game.play_computer_move(), None);
}

#[test]
fn test_scenario_d_completed_draw_rejects_moves() {
    // X opened on this board, so it cannot be resumed; it still reads as a draw.
    let x_opened: Board = "XOX XOO OXX".parse().unwrap();
    assert_eq!(GameStatus::of_board(&x_opened), GameStatus::Draw);
    assert!(Game::from_position(GameMode::TwoPlayers, x_opened, Vec::new()).is_err());

    // The same draw with O as the opener.
    let board: Board = "OXO OXX XOO".parse().unwrap();
    let mut game = Game::from_position(GameMode::TwoPlayers, board.clone(), Vec::new()).unwrap();
    assert_eq!(game.status(), GameStatus::Draw);
    game.sink_mut().clear();

    for index in 0..9 {
        assert!(!game.attempt_move(index));
    }
    assert_eq!(game.board(), &board);
    assert!(game.sink().is_empty());
}

#[test]
fn test_scenario_c_full_board_without_line_is_draw() {
    let board: Board = "OXO OXX XOO".parse().unwrap();
    assert!(is_full(&board));
    assert_eq!(winning_line(&board, Player::X), None);
    assert_eq!(winning_line(&board, Player::O), None);
    assert_eq!(GameStatus::of_board(&board), GameStatus::Draw);
}

#[test]
fn test_from_position_derives_turn() {
    let board: Board = "O... X....".parse().unwrap();
    let game = Game::from_position(GameMode::TwoPlayers, board, Vec::new()).unwrap();
    assert_eq!(game.to_move(), Player::O);

    let board: Board = "XX. OO. ...".parse().unwrap();
    let game = Game::from_position(GameMode::TwoPlayers, board, Vec::new()).unwrap();
    assert_eq!(game.to_move(), Player::O);

    let board: Board = "OOO XX. ...".parse().unwrap();
    let game = Game::from_position(GameMode::VsComputer, board, Vec::new()).unwrap();
    assert_eq!(game.to_move(), Player::O);
    assert_eq!(game.winner(), Some(Player::O));
    assert!(!game.is_computer_turn());

    let board: Board = "O........".parse().unwrap();
    let game = Game::from_position(GameMode::VsComputer, board, Vec::new()).unwrap();
    assert!(game.is_computer_turn());
    assert!(matches!(
        game.sink().last(),
        Some(GameEvent::ComputerTurn { .. })
    ));
}

#[test]
fn test_from_position_rejects_inconsistent_boards() {
    let unbalanced: Board = "XXX ... ...".parse().unwrap();
    let err = Game::from_position(GameMode::TwoPlayers, unbalanced, Vec::new()).unwrap_err();
    assert!(matches!(err, ResumeError::Inconsistent(_)));

    let two_winners: Board = "XXX OOO O..".parse().unwrap();
    let err = Game::from_position(GameMode::TwoPlayers, two_winners, Vec::new()).unwrap_err();
    assert!(err.to_string().contains("Both players"));
}

#[test]
fn test_from_position_rejects_x_ahead() {
    for text in ["X........", "XX. O.. ...", "XOX XO. X.."] {
        let board: Board = text.parse().unwrap();
        let err = Game::from_position(GameMode::TwoPlayers, board, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("alternating turns"), "{text}: {err}");
    }
}

#[test]
fn test_from_position_rejects_move_after_win() {
    // X answered after O completed the top row.
    let board: Board = "OOO XX. ..X".parse().unwrap();
    let err = Game::from_position(GameMode::TwoPlayers, board, Vec::new()).unwrap_err();
    assert!(err.to_string().contains("placed after the game was won"));

    // O kept playing after X's line.
    let board: Board = "XXX OO. O.O".parse().unwrap();
    assert!(Game::from_position(GameMode::TwoPlayers, board, Vec::new()).is_err());
}
