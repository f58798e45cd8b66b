//! Simplified move notation helpers.
//!
//! SAN output here is display-oriented: no disambiguation and no
//! check/mate suffixes. Moves are matched against opening statistics by
//! UCI text, never by SAN, so the simplification is safe.

use cozy_chess::{Board, File, Move, Piece, Rank, Square};

/// Format a square as algebraic text, e.g. "e4".
pub fn format_square(sq: Square) -> String {
    let file = (b'a' + sq.file() as u8) as char;
    let rank = (b'1' + sq.rank() as u8) as char;
    format!("{}{}", file, rank)
}

/// Parse algebraic square text, e.g. "e4".
pub fn parse_square(text: &str) -> Option<Square> {
    let mut chars = text.chars();
    let file_ch = chars.next()?;
    let rank_ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let file = File::try_index((file_ch as usize).checked_sub('a' as usize)?)?;
    let rank = Rank::try_index((rank_ch as usize).checked_sub('1' as usize)?)?;
    Some(Square::new(file, rank))
}

pub fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

pub fn piece_from_char(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'p' => Some(Piece::Pawn),
        'n' => Some(Piece::Knight),
        'b' => Some(Piece::Bishop),
        'r' => Some(Piece::Rook),
        'q' => Some(Piece::Queen),
        'k' => Some(Piece::King),
        _ => None,
    }
}

/// True if `mv` is cozy-chess's king-takes-own-rook castling encoding.
pub fn is_castling(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.piece_on(mv.to) == Some(Piece::Rook)
        && board.color_on(mv.to) == board.color_on(mv.from)
}

/// Generate SAN for a move, evaluated against the board *before* the move.
pub fn generate_san(board: &Board, mv: Move) -> String {
    if is_castling(board, mv) {
        return match mv.to.file() {
            File::A => "O-O-O".to_string(),
            _ => "O-O".to_string(),
        };
    }

    let piece = board.piece_on(mv.from).unwrap_or(Piece::Pawn);
    // Pawn capture detection includes en passant (file change, empty target).
    let is_capture =
        board.piece_on(mv.to).is_some() || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    let mut out = String::new();
    match piece {
        Piece::Pawn => {
            if is_capture {
                out.push((b'a' + mv.from.file() as u8) as char);
            }
        }
        other => out.push(piece_char(other).to_ascii_uppercase()),
    }
    if is_capture {
        out.push('x');
    }
    out.push_str(&format_square(mv.to));
    if let Some(promo) = mv.promotion {
        out.push('=');
        out.push(piece_char(promo).to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse_squares() {
        assert_eq!(format_square(Square::new(File::E, Rank::Fourth)), "e4");
        assert_eq!(parse_square("a1"), Some(Square::new(File::A, Rank::First)));
        assert_eq!(parse_square("h8"), Some(Square::new(File::H, Rank::Eighth)));
        assert_eq!(parse_square("i9"), None);
        assert_eq!(parse_square("e"), None);
        assert_eq!(parse_square("e44"), None);
    }

    #[test]
    fn san_for_quiet_pawn_move() {
        let board = Board::default();
        let mv = Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        };
        assert_eq!(generate_san(&board, mv), "e4");
    }

    #[test]
    fn san_for_knight_move() {
        let board = Board::default();
        let mv = Move {
            from: Square::new(File::G, Rank::First),
            to: Square::new(File::F, Rank::Third),
            promotion: None,
        };
        assert_eq!(generate_san(&board, mv), "Nf3");
    }

    #[test]
    fn san_for_pawn_capture() {
        let board: Board = "rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2"
            .parse()
            .unwrap();
        let mv = Move {
            from: Square::new(File::D, Rank::Fourth),
            to: Square::new(File::E, Rank::Fifth),
            promotion: None,
        };
        assert_eq!(generate_san(&board, mv), "dxe5");
    }
}
