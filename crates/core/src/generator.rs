//! Row generator module - procedural row construction
//!
//! Every spawned row (apart from uniform challenge rows) hides a "key
//! sequence": a chain of partial matches that resolves to the current
//! target. The base sequence is a pair that converts directly; at higher
//! levels one or both halves may be disguised behind a further partial-match
//! pair, stretching the chain to 3 or 4 tokens and forcing the player to
//! solve through an intermediate conversion first.
//!
//! Challenge rows unlock progressively with the level and are serialized:
//! a new one is only attempted while the board holds more than two rows and
//! no row already carries a challenge tag.

use arrayvec::ArrayVec;

use token_trap_types::{
    Attributes, ChallengeType, Settings, SkillLevel, Token, TokenPair, GRID_SIZE,
};

use crate::rng::SimpleRng;
use crate::row::{Row, TokenMint};

/// How much of the key pair is hidden behind intermediate pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisguiseKind {
    /// One half, chosen at random, expands to a partial-match pair
    Single,
    /// Both halves expand
    Double,
}

/// Builds a random pair that converts to the given token
///
/// The first combination partially matches the token; the second partially
/// matches both the first and the token, which pins the conversion result to
/// the token's attributes.
pub fn partial_match_pair(target: &Token, rng: &mut SimpleRng, mint: &mut TokenMint) -> TokenPair {
    let candidates: Vec<Attributes> = Attributes::all()
        .filter(|a| a.is_partial_match(&target.attributes))
        .collect();
    let first = *rng.pick(&candidates);
    let seconds: Vec<Attributes> = Attributes::all()
        .filter(|a| a.is_partial_match(&first) && a.is_partial_match(&target.attributes))
        .collect();
    let second = *rng.pick(&seconds);
    TokenPair::new(mint.token(first), mint.token(second))
}

/// Procedurally builds new rows for the current target and level
pub struct RowGenerator {
    settings: Settings,
}

impl RowGenerator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Build the next row to insert at the front of the board
    pub fn next_row(
        &self,
        target: &Token,
        level: u32,
        rows: &[Row],
        rng: &mut SimpleRng,
        mint: &mut TokenMint,
    ) -> Row {
        match self.pick_challenge_type(level, rows, rng) {
            Some(ChallengeType::Uniform) => self.uniform_row(rng, mint),
            challenge => self.keyed_row(target, level, challenge, rng, mint),
        }
    }

    /// All 8 cells share one random combination; there is no key sequence
    fn uniform_row(&self, rng: &mut SimpleRng, mint: &mut TokenMint) -> Row {
        let attributes = rng.attributes();
        let tokens: ArrayVec<Token, GRID_SIZE> =
            (0..GRID_SIZE).map(|_| mint.token(attributes)).collect();
        Row::new(mint.row_id(), tokens, Some(ChallengeType::Uniform))
    }

    /// Random padding with a key sequence spliced in at a random position
    fn keyed_row(
        &self,
        target: &Token,
        level: u32,
        challenge: Option<ChallengeType>,
        rng: &mut SimpleRng,
        mint: &mut TokenMint,
    ) -> Row {
        let mut tokens: ArrayVec<Token, GRID_SIZE> =
            (0..GRID_SIZE).map(|_| mint.token(rng.attributes())).collect();

        let mut sequence = self.key_sequence(target, level, rng, mint);
        if self.settings.is_training_mode {
            sequence[0].shows_training_hint = true;
        }
        let start = rng.next_range((GRID_SIZE - sequence.len() + 1) as u32) as usize;
        for (offset, token) in sequence.into_iter().enumerate() {
            tokens[start + offset] = token;
        }

        match challenge {
            Some(ChallengeType::WildcardRow) => {
                for token in &mut tokens {
                    token.is_wildcard = true;
                }
            }
            Some(ChallengeType::WildcardSingle) => {
                let index = rng.next_range(GRID_SIZE as u32) as usize;
                tokens[index].is_wildcard = true;
            }
            _ => {}
        }

        Row::new(mint.row_id(), tokens, challenge)
    }

    /// The chain of tokens the player must solve to produce the target
    fn key_sequence(
        &self,
        target: &Token,
        level: u32,
        rng: &mut SimpleRng,
        mint: &mut TokenMint,
    ) -> Vec<Token> {
        let base = partial_match_pair(target, rng, mint);
        let disguised = match self.disguise_kind(level, rng) {
            None => [false, false],
            Some(DisguiseKind::Single) => {
                if rng.coin_flip() {
                    [true, false]
                } else {
                    [false, true]
                }
            }
            Some(DisguiseKind::Double) => [true, true],
        };

        let mut sequence = Vec::with_capacity(4);
        for (half, disguise) in [base.token1, base.token2].into_iter().zip(disguised) {
            if disguise {
                let expansion = partial_match_pair(&half, rng, mint);
                sequence.push(expansion.token1);
                sequence.push(expansion.token2);
            } else {
                sequence.push(half);
            }
        }
        sequence
    }

    /// Disguises ramp up with the level, keyed off the skill speed cutoff:
    /// singles past half the cutoff, doubles past the cutoff, coin flip each.
    fn disguise_kind(&self, level: u32, rng: &mut SimpleRng) -> Option<DisguiseKind> {
        if self.settings.is_training_mode {
            return None;
        }
        let cutoff = self.settings.skill_level.speed_cutoff();
        if level > cutoff && rng.coin_flip() {
            return Some(DisguiseKind::Double);
        }
        if level > cutoff / 2 && rng.coin_flip() {
            return Some(DisguiseKind::Single);
        }
        None
    }

    /// Decide whether this row is a challenge row, and of which type
    ///
    /// Challenge rows are serialized: none while the board is small or while
    /// another challenge row is still on the board.
    fn pick_challenge_type(
        &self,
        level: u32,
        rows: &[Row],
        rng: &mut SimpleRng,
    ) -> Option<ChallengeType> {
        let unlocked = self.unlocked_challenges(level);
        if unlocked.is_empty() {
            return None;
        }
        if rows.len() <= 2 || rows.iter().any(|r| r.challenge_type.is_some()) {
            return None;
        }
        if !rng.coin_flip() {
            return None;
        }
        Some(*rng.pick(&unlocked))
    }

    /// Challenge types eligible at this level
    ///
    /// Types unlock one tier per level past the first. Basic play sees only
    /// the newest type per tier; expert play keeps the earlier ones too.
    /// From the fourth tier on everything is eligible for everyone.
    fn unlocked_challenges(&self, level: u32) -> Vec<ChallengeType> {
        let expert = self.settings.skill_level == SkillLevel::Expert;
        match level.saturating_sub(1) {
            0 => Vec::new(),
            1 => vec![ChallengeType::Uniform],
            2 => {
                if expert {
                    vec![ChallengeType::WildcardSingle, ChallengeType::Uniform]
                } else {
                    vec![ChallengeType::WildcardSingle]
                }
            }
            3 => {
                if expert {
                    vec![
                        ChallengeType::WildcardRow,
                        ChallengeType::WildcardSingle,
                        ChallengeType::Uniform,
                    ]
                } else {
                    vec![ChallengeType::WildcardRow]
                }
            }
            _ => vec![
                ChallengeType::Uniform,
                ChallengeType::WildcardRow,
                ChallengeType::WildcardSingle,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_trap_types::{TokenColor, TokenIcon, TokenId};

    fn generator(skill_level: SkillLevel, is_training_mode: bool) -> RowGenerator {
        RowGenerator::new(Settings {
            skill_level,
            is_training_mode,
        })
    }

    fn target(mint: &mut TokenMint) -> Token {
        mint.token(Attributes::new(TokenColor::Red, TokenIcon::Star))
    }

    /// Columns of an adjacent pair converting directly to the target
    fn convertible_pair_position(row: &Row, target: &Token) -> Option<usize> {
        (0..row.tokens.len() - 1).find(|&i| {
            TokenPair::new(row.tokens[i], row.tokens[i + 1]).can_convert_to(Some(target))
        })
    }

    #[test]
    fn partial_match_pair_converts_to_its_target() {
        let mut rng = SimpleRng::new(11);
        let mut mint = TokenMint::new();
        for attributes in Attributes::all() {
            let target = mint.token(attributes);
            for _ in 0..50 {
                let pair = partial_match_pair(&target, &mut rng, &mut mint);
                assert!(pair.is_partial_match());
                assert_eq!(pair.converted(), Some(target.attributes));
            }
        }
    }

    #[test]
    fn level_one_rows_always_carry_a_direct_key_pair() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(21);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        for _ in 0..100 {
            let row = generator.next_row(&target, 1, &[], &mut rng, &mut mint);
            assert_eq!(row.tokens.len(), GRID_SIZE);
            assert_eq!(row.challenge_type, None);
            assert!(
                convertible_pair_position(&row, &target).is_some(),
                "row must contain an adjacent pair solving to the target"
            );
        }
    }

    #[test]
    fn row_token_ids_are_unique() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(5);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        let row = generator.next_row(&target, 1, &[], &mut rng, &mut mint);
        let mut ids: Vec<TokenId> = row.tokens.iter().map(|t| t.id).collect();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        assert_eq!(ids.len(), GRID_SIZE);
    }

    #[test]
    fn uniform_rows_are_attribute_identical() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(31);
        let mut mint = TokenMint::new();

        let row = generator.uniform_row(&mut rng, &mut mint);
        assert_eq!(row.challenge_type, Some(ChallengeType::Uniform));
        assert_eq!(row.tokens.len(), GRID_SIZE);
        let first = row.tokens[0].attributes;
        assert!(row.tokens.iter().all(|t| t.attributes == first));
    }

    #[test]
    fn disguised_halves_resolve_to_the_half_they_replace() {
        // Past the basic cutoff both halves may be disguised; whatever the
        // expansion, solving an expansion pair must reproduce a token that
        // partially matches the target.
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(41);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        let mut saw_disguise = false;
        for _ in 0..200 {
            let sequence = generator.key_sequence(&target, 12, &mut rng, &mut mint);
            assert!(sequence.len() >= 2 && sequence.len() <= 4);
            if sequence.len() == 2 {
                let pair = TokenPair::new(sequence[0], sequence[1]);
                assert_eq!(pair.converted(), Some(target.attributes));
                continue;
            }
            saw_disguise = true;
            if sequence.len() == 4 {
                let left = TokenPair::new(sequence[0], sequence[1]).converted().unwrap();
                let right = TokenPair::new(sequence[2], sequence[3]).converted().unwrap();
                let solved = left.converted_with(&right);
                assert_eq!(solved, Some(target.attributes));
            }
        }
        assert!(saw_disguise, "level 12 should disguise at least once");
    }

    #[test]
    fn low_levels_never_disguise() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(51);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        for _ in 0..100 {
            let sequence = generator.key_sequence(&target, 2, &mut rng, &mut mint);
            assert_eq!(sequence.len(), 2);
        }
    }

    #[test]
    fn training_mode_never_disguises_and_hints_the_sequence() {
        let generator = generator(SkillLevel::Basic, true);
        let mut rng = SimpleRng::new(61);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        for _ in 0..50 {
            let row = generator.next_row(&target, 12, &[], &mut rng, &mut mint);
            let hinted: Vec<&Token> =
                row.tokens.iter().filter(|t| t.shows_training_hint).collect();
            assert_eq!(hinted.len(), 1);
            assert!(convertible_pair_position(&row, &target).is_some());
        }
    }

    #[test]
    fn challenge_rows_wait_for_a_busy_board() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(71);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        // Board too small: never a challenge, at any level.
        let two_rows: Vec<Row> = (0..2)
            .map(|_| generator.next_row(&target, 1, &[], &mut rng, &mut mint))
            .collect();
        for _ in 0..100 {
            let row = generator.next_row(&target, 9, &two_rows, &mut rng, &mut mint);
            assert_eq!(row.challenge_type, None);
        }
    }

    #[test]
    fn challenge_rows_are_serialized() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(81);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        let mut rows: Vec<Row> = (0..3)
            .map(|_| generator.next_row(&target, 1, &[], &mut rng, &mut mint))
            .collect();
        rows[1].challenge_type = Some(ChallengeType::Uniform);

        for _ in 0..100 {
            let row = generator.next_row(&target, 9, &rows, &mut rng, &mut mint);
            assert_eq!(row.challenge_type, None);
        }
    }

    #[test]
    fn challenge_types_unlock_by_tier() {
        let basic = generator(SkillLevel::Basic, false);
        let expert = generator(SkillLevel::Expert, false);

        assert!(basic.unlocked_challenges(1).is_empty());
        assert_eq!(
            basic.unlocked_challenges(2),
            vec![ChallengeType::Uniform]
        );
        assert_eq!(
            basic.unlocked_challenges(3),
            vec![ChallengeType::WildcardSingle]
        );
        assert_eq!(
            expert.unlocked_challenges(3),
            vec![ChallengeType::WildcardSingle, ChallengeType::Uniform]
        );
        assert_eq!(
            basic.unlocked_challenges(4),
            vec![ChallengeType::WildcardRow]
        );
        assert_eq!(expert.unlocked_challenges(4).len(), 3);
        assert_eq!(basic.unlocked_challenges(5).len(), 3);
        assert_eq!(expert.unlocked_challenges(9).len(), 3);
    }

    #[test]
    fn eligible_boards_eventually_produce_each_challenge_type() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(91);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);
        let rows: Vec<Row> = (0..3)
            .map(|_| generator.next_row(&target, 1, &[], &mut rng, &mut mint))
            .collect();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            if let Some(challenge) =
                generator.next_row(&target, 9, &rows, &mut rng, &mut mint).challenge_type
            {
                seen.insert(challenge);
            }
        }
        assert!(seen.contains(&ChallengeType::Uniform));
        assert!(seen.contains(&ChallengeType::WildcardRow));
        assert!(seen.contains(&ChallengeType::WildcardSingle));
    }

    #[test]
    fn wildcard_rows_flag_every_cell() {
        let generator = generator(SkillLevel::Basic, false);
        let mut rng = SimpleRng::new(101);
        let mut mint = TokenMint::new();
        let target = target(&mut mint);

        let row = generator.keyed_row(
            &target,
            1,
            Some(ChallengeType::WildcardRow),
            &mut rng,
            &mut mint,
        );
        assert!(row.tokens.iter().all(|t| t.is_wildcard));
        assert!(convertible_pair_position(&row, &target).is_some());

        let row = generator.keyed_row(
            &target,
            1,
            Some(ChallengeType::WildcardSingle),
            &mut rng,
            &mut mint,
        );
        assert_eq!(row.tokens.iter().filter(|t| t.is_wildcard).count(), 1);
    }
}
