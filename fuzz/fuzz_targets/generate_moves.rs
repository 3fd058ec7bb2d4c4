#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use shatranj::chess::core::Color;
use shatranj::chess::game::Game;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Some((turn, notation)) = input.split_once(' ') else {
        return;
    };
    let Ok(turn) = Color::try_from(turn) else {
        return;
    };
    let Ok(game) = Game::from_notation(notation, turn) else {
        return;
    };
    let moves = game.legal_moves();
    assert!(moves.iter().all_unique());
    for next_move in moves {
        assert!(game.board().contains(next_move.destination()));
        let mut played = game.clone();
        let report = played
            .process_move(next_move)
            .expect("generated moves should be accepted");
        assert!(!played.board().is_in_check(turn), "{next_move}: {}", report.position);
    }
});
