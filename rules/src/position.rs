use cozy_chess::{Board, Color, GameStatus, Move, Piece, Rank, Square};

use crate::san;

/// Board state for one drill, wrapping a cozy-chess `Board`.
///
/// All mutation goes through [`Position::apply_from_to`] or
/// [`Position::apply_uci`]; both validate legality first, so the wrapped
/// board never holds an unreachable position.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
}

/// A move that was applied successfully, in both notations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// Standard UCI text ("e2e4", "e1g1" for castling, "e7e8q").
    pub uci: String,
    /// Simplified SAN text ("e4", "Nf3", "O-O", "exd5").
    pub san: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid move text: {0}")]
    InvalidMove(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Strip the halfmove clock and fullmove number from a FEN string.
///
/// Positions reached via different move orders or clocks collapse onto
/// the same key, which is what the blunder store keys on.
pub fn canonical_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board = fen
            .parse::<Board>()
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        Ok(Self { board })
    }

    pub fn to_fen(&self) -> String {
        self.board.to_string()
    }

    /// FEN with move-counter fields stripped.
    pub fn canonical_key(&self) -> String {
        canonical_fen(&self.to_fen())
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Whether white is to move; lets callers avoid the board library's
    /// color type.
    pub fn white_to_move(&self) -> bool {
        self.board.side_to_move() == Color::White
    }

    pub fn is_game_over(&self) -> bool {
        !matches!(self.board.status(), GameStatus::Ongoing)
    }

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }

    /// Destination squares (algebraic text) for the piece on `from`.
    /// Castling destinations are reported in standard form (g/c file).
    pub fn legal_destinations(&self, from: &str) -> Result<Vec<String>, RulesError> {
        let from_sq = san::parse_square(from)
            .ok_or_else(|| RulesError::InvalidSquare(from.to_string()))?;
        let mut dests: Vec<String> = self
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from_sq)
            .map(|mv| san::format_square(self.standard_to_square(mv)))
            .collect();
        dests.sort();
        dests.dedup();
        Ok(dests)
    }

    /// Apply a move given as separate squares (board-UI input). Pawn moves
    /// reaching the last rank promote to a queen.
    pub fn apply_from_to(&mut self, from: &str, to: &str) -> Result<PlayedMove, RulesError> {
        let from_sq = san::parse_square(from)
            .ok_or_else(|| RulesError::InvalidSquare(from.to_string()))?;
        let to_sq =
            san::parse_square(to).ok_or_else(|| RulesError::InvalidSquare(to.to_string()))?;

        let promotion = self.default_promotion(from_sq, to_sq);
        self.apply_candidate(Move {
            from: from_sq,
            to: to_sq,
            promotion,
        })
    }

    /// Apply a move given as UCI text (book moves, recorded replies).
    pub fn apply_uci(&mut self, uci: &str) -> Result<PlayedMove, RulesError> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(RulesError::InvalidMove(uci.to_string()));
        }
        let from_sq = san::parse_square(&uci[0..2])
            .ok_or_else(|| RulesError::InvalidMove(uci.to_string()))?;
        let to_sq = san::parse_square(&uci[2..4])
            .ok_or_else(|| RulesError::InvalidMove(uci.to_string()))?;
        let promotion = match uci.as_bytes().get(4) {
            Some(&c) => Some(
                san::piece_from_char(c as char)
                    .ok_or_else(|| RulesError::InvalidMove(uci.to_string()))?,
            ),
            None => None,
        };
        self.apply_candidate(Move {
            from: from_sq,
            to: to_sq,
            promotion,
        })
    }

    fn apply_candidate(&mut self, candidate: Move) -> Result<PlayedMove, RulesError> {
        let legal = self.legal_moves();
        let mv = convert_castling_to_cozy(candidate, &legal);
        if !legal.contains(&mv) {
            return Err(RulesError::IllegalMove(format!(
                "{}{}",
                san::format_square(candidate.from),
                san::format_square(candidate.to)
            )));
        }

        let san_text = san::generate_san(&self.board, mv);
        let uci_text = self.standard_uci(mv);
        self.board.play_unchecked(mv);

        Ok(PlayedMove {
            uci: uci_text,
            san: san_text,
        })
    }

    /// Queen is the default promotion when the input carries none.
    fn default_promotion(&self, from: Square, to: Square) -> Option<Piece> {
        let is_pawn = self.board.piece_on(from) == Some(Piece::Pawn);
        let last_rank = matches!(to.rank(), Rank::First | Rank::Eighth);
        (is_pawn && last_rank).then_some(Piece::Queen)
    }

    /// Destination square in standard notation. cozy-chess encodes
    /// castling as king-takes-own-rook; present it as the g/c square.
    fn standard_to_square(&self, mv: Move) -> Square {
        if san::is_castling(&self.board, mv) {
            let file = match mv.to.file() {
                cozy_chess::File::A => cozy_chess::File::C,
                _ => cozy_chess::File::G,
            };
            Square::new(file, mv.to.rank())
        } else {
            mv.to
        }
    }

    fn standard_uci(&self, mv: Move) -> String {
        let mut s = format!(
            "{}{}",
            san::format_square(mv.from),
            san::format_square(self.standard_to_square(mv))
        );
        if let Some(promo) = mv.promotion {
            s.push(san::piece_char(promo));
        }
        s
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Convert standard UCI castling (king moves two squares) to cozy-chess's
/// king-to-rook encoding, when that encoding is the legal one.
fn convert_castling_to_cozy(mv: Move, legal: &[Move]) -> Move {
    use cozy_chess::File;

    let back_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let from_e = mv.from.file() == File::E;
    let to_g_or_c = matches!(mv.to.file(), File::G | File::C);
    if !(back_rank && from_e && to_g_or_c && mv.promotion.is_none()) {
        return mv;
    }

    let rook_file = match mv.to.file() {
        File::G => File::H,
        _ => File::A,
    };
    let converted = Move {
        from: mv.from,
        to: Square::new(rook_file, mv.from.rank()),
        promotion: None,
    };
    if legal.contains(&converted) {
        converted
    } else {
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        let fen = pos.to_fen();
        assert!(fen.starts_with("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"));
        let again = Position::from_fen(&fen).unwrap();
        assert_eq!(again.to_fen(), fen);
    }

    #[test]
    fn canonical_key_strips_counters() {
        assert_eq!(
            canonical_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 3 12"),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
        );
    }

    #[test]
    fn apply_from_to_legal_move() {
        let mut pos = Position::startpos();
        let played = pos.apply_from_to("e2", "e4").unwrap();
        assert_eq!(played.uci, "e2e4");
        assert_eq!(played.san, "e4");
        assert_eq!(pos.side_to_move(), Color::Black);
    }

    #[test]
    fn apply_from_to_rejects_illegal_move() {
        let mut pos = Position::startpos();
        let fen_before = pos.to_fen();
        assert!(matches!(
            pos.apply_from_to("e2", "e5"),
            Err(RulesError::IllegalMove(_))
        ));
        assert_eq!(pos.to_fen(), fen_before);
    }

    #[test]
    fn apply_uci_sequence() {
        let mut pos = Position::startpos();
        pos.apply_uci("e2e4").unwrap();
        let reply = pos.apply_uci("c7c5").unwrap();
        assert_eq!(reply.san, "c5");
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn castling_accepts_standard_uci() {
        // Position with white ready to castle kingside.
        let mut pos = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/5NP1/PPPPPPBP/RNBQK2R w KQkq - 0 1",
        )
        .unwrap();
        let played = pos.apply_from_to("e1", "g1").unwrap();
        assert_eq!(played.san, "O-O");
        assert_eq!(played.uci, "e1g1");
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let played = pos.apply_from_to("a7", "a8").unwrap();
        assert_eq!(played.uci, "a7a8q");
        assert_eq!(played.san, "a8=Q");
    }

    #[test]
    fn legal_destinations_from_start() {
        let pos = Position::startpos();
        let dests = pos.legal_destinations("e2").unwrap();
        assert_eq!(dests, vec!["e3".to_string(), "e4".to_string()]);
        let empty = pos.legal_destinations("e5").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn game_over_detection() {
        let pos = Position::startpos();
        assert!(!pos.is_game_over());
        // Fool's mate final position: white is checkmated.
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(mated.is_game_over());
    }
}
