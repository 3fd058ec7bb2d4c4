#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shatranj::chess::board::Board;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::from_notation(8, 8, input) else {
        return;
    };
    let restored = Board::from_notation(8, 8, &board.to_notation())
        .expect("printed notation should be parsed back");
    assert_eq!(restored, board);
});
