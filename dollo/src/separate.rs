//! Separation oracle for the k-Dollo forbidden sub-patterns.
//!
//! Given a tentative, fully concrete completion, this module enumerates
//! every realized instance of the four forbidden shapes. Each shape is
//! defined over an ordered pair of characters `(c, d)` with `c < d`, three
//! roles filled by taxa, and up to four loss-rank parameters. A rank bounds
//! how often a character may be lost and ranges over `1..=k+1`, or
//! `2..=k+1` where a shape requires a rank strictly above the baseline.
//!
//! The enumeration is deliberately exhaustive: for every shape and every
//! valid rank combination, all taxa matching the three role patterns are
//! collected and one violation is reported for every element of the
//! Cartesian product of the three candidate sets. A single separation pass
//! may therefore report many violations at once.
use crate::matrix::Matrix;

/// One required cell value of a violated constraint.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Fact {
    /// Taxon (row) of the cell.
    pub taxon: usize,
    /// Character (column) of the cell.
    pub character: usize,
    /// Value the cell holds in the violating completion.
    pub value: u8,
}

/// A realized forbidden sub-pattern: three taxa on two characters whose
/// values match one of the four shapes.
///
/// The six facts cover the cells `(p, c)`, `(p, d)`, `(q, c)`, `(q, d)`,
/// `(r, c)`, `(r, d)` in that order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Violation {
    /// The shape this instance matched.
    pub shape: Shape,
    /// The participating cells and their current values.
    pub facts: [Fact; 6],
}

impl Violation {
    fn new(
        shape: Shape,
        taxa: [usize; 3],
        columns: [usize; 2],
        patterns: [(u16, u16); 3],
    ) -> Violation {
        let [c, d] = columns;
        let mut facts = [Fact {
            taxon: 0,
            character: 0,
            value: 0,
        }; 6];
        for role in 0..3 {
            // The pattern matched a concrete cell, so both values fit in u8.
            facts[2 * role] = Fact {
                taxon: taxa[role],
                character: c,
                value: patterns[role].0 as u8,
            };
            facts[2 * role + 1] = Fact {
                taxon: taxa[role],
                character: d,
                value: patterns[role].1 as u8,
            };
        }
        Violation { shape, facts }
    }
}

/// The four forbidden sub-pattern shapes.
///
/// All shapes forbid the coexistence of a taxon carrying the first
/// character, a taxon carrying the second, and a third taxon relating the
/// two. They differ in which role cells are forced to exactly zero and in
/// whether the first and third roles are required to carry the *same* loss
/// rank on a character: a shared rank encodes two taxa inheriting one loss
/// event, distinct ranks encode independent losses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Shape {
    /// All four ranks free; both "missing" role cells forced to zero.
    Independent,
    /// First and third roles share their rank on the second character.
    SharedSecond,
    /// First and third roles share their rank on the first character.
    SharedFirst,
    /// Shared ranks on both characters.
    SharedBoth,
}

/// Rank parameters of one shape instance.
///
/// `first`/`first_alt` parameterize the first character (column `c`),
/// `second`/`second_alt` the second (column `d`). Kept as `u16` so the
/// sweep cannot overflow for any `u8` loss bound.
#[derive(Copy, Clone, Debug)]
struct Ranks {
    first: u16,
    first_alt: u16,
    second: u16,
    second_alt: u16,
}

impl Shape {
    /// All shapes, in the order they are separated.
    pub const ALL: [Shape; 4] = [
        Shape::Independent,
        Shape::SharedSecond,
        Shape::SharedFirst,
        Shape::SharedBoth,
    ];

    fn shares_first(self) -> bool {
        matches!(self, Shape::SharedFirst | Shape::SharedBoth)
    }

    fn shares_second(self) -> bool {
        matches!(self, Shape::SharedSecond | Shape::SharedBoth)
    }

    /// Invokes `action` for every valid rank combination of this shape.
    ///
    /// A shared rank must exceed the baseline (start at 2) and its alternate
    /// must differ from it; a free rank ranges over `1..=top`.
    fn for_each_ranks(self, top: u16, mut action: impl FnMut(Ranks)) {
        let first_lo = if self.shares_first() { 2 } else { 1 };
        let second_lo = if self.shares_second() { 2 } else { 1 };

        for first in first_lo..=top {
            for first_alt in 1..=top {
                if self.shares_first() && first_alt == first {
                    continue;
                }
                for second in second_lo..=top {
                    for second_alt in 1..=top {
                        if self.shares_second() && second_alt == second {
                            continue;
                        }
                        action(Ranks {
                            first,
                            first_alt,
                            second,
                            second_alt,
                        });
                    }
                }
            }
        }
    }

    /// The `(value at c, value at d)` pattern each of the three roles must
    /// match.
    ///
    /// The three patterns of a shape are pairwise different, so the taxa
    /// filling the roles are automatically distinct.
    fn role_patterns(self, ranks: Ranks) -> [(u16, u16); 3] {
        let Ranks {
            first: i,
            first_alt: i_alt,
            second: j,
            second_alt: j_alt,
        } = ranks;
        match self {
            Shape::Independent => [(i, 0), (0, j), (i_alt, j_alt)],
            Shape::SharedSecond => [(i, j_alt), (0, j), (i_alt, j)],
            Shape::SharedFirst => [(i, 0), (i_alt, j), (i, j_alt)],
            Shape::SharedBoth => [(i, j_alt), (i_alt, j), (i, j)],
        }
    }
}

/// Enumerates every forbidden sub-pattern instance realized by the given
/// concrete completion.
///
/// The result is deterministic: characters ascend in the outer loops, then
/// shapes in [`Shape::ALL`] order, then ranks, then taxa.
pub fn violations(completion: &Matrix, k: u8) -> Vec<Violation> {
    let taxa = completion.taxa();
    let top = u16::from(k) + 1;
    let mut found = vec![];

    for c in 0..completion.characters() {
        for d in c + 1..completion.characters() {
            // Cache the column pair once per (c, d) instead of re-reading the
            // matrix inside the rank sweep.
            let pairs: Vec<(u16, u16)> = (0..taxa)
                .map(|taxon| {
                    (
                        u16::from(completion.get(taxon, c)),
                        u16::from(completion.get(taxon, d)),
                    )
                })
                .collect();

            for shape in Shape::ALL {
                shape.for_each_ranks(top, |ranks| {
                    let patterns = shape.role_patterns(ranks);
                    let candidates = patterns.map(|pattern| {
                        pairs
                            .iter()
                            .enumerate()
                            .filter(|&(_, &pair)| pair == pattern)
                            .map(|(taxon, _)| taxon)
                            .collect::<Vec<_>>()
                    });

                    for &p in &candidates[0] {
                        for &q in &candidates[1] {
                            for &r in &candidates[2] {
                                found.push(Violation::new(shape, [p, q, r], [c, d], patterns));
                            }
                        }
                    }
                });
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_gamete_instance_is_found() {
        let completion = Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 2]]);
        let found = violations(&completion, 1);

        assert_eq!(found.len(), 1);
        let violation = found[0];
        assert_eq!(violation.shape, Shape::Independent);
        assert_eq!(
            violation.facts,
            [
                Fact { taxon: 0, character: 0, value: 2 },
                Fact { taxon: 0, character: 1, value: 0 },
                Fact { taxon: 1, character: 0, value: 0 },
                Fact { taxon: 1, character: 1, value: 2 },
                Fact { taxon: 2, character: 0, value: 2 },
                Fact { taxon: 2, character: 1, value: 2 },
            ]
        );
    }

    #[test]
    fn compatible_characters_have_no_violations() {
        let completion = Matrix::from_rows(&[&[2, 0], &[0, 2], &[2, 0], &[0, 0]]);
        assert!(violations(&completion, 1).is_empty());
    }

    #[test]
    fn every_role_combination_is_reported() {
        // Two taxa fill the first role, so the Cartesian product yields two
        // violations for the same rank combination.
        let completion = Matrix::from_rows(&[&[2, 0], &[2, 0], &[0, 2], &[2, 2]]);
        let found = violations(&completion, 1);

        assert_eq!(found.len(), 2);
        let first_role_taxa: Vec<usize> =
            found.iter().map(|violation| violation.facts[0].taxon).collect();
        assert_eq!(first_role_taxa, [0, 1]);
    }

    #[test]
    fn violations_are_localized_to_their_column_pair() {
        let completion = Matrix::from_rows(&[&[2, 0, 0], &[0, 2, 0], &[2, 2, 0]]);
        let found = violations(&completion, 1);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].facts[0].character, 0);
        assert_eq!(found[0].facts[1].character, 1);
    }

    #[test]
    fn separation_is_repeatable() {
        let completion = Matrix::from_rows(&[&[2, 0], &[2, 0], &[0, 2], &[2, 2]]);
        assert_eq!(violations(&completion, 1), violations(&completion, 1));
    }

    #[test]
    fn rank_sweep_sizes() {
        fn sweep_len(shape: Shape, k: u8) -> usize {
            let mut count = 0;
            shape.for_each_ranks(u16::from(k) + 1, |_| count += 1);
            count
        }

        // All four ranks free over 1..=2.
        assert_eq!(sweep_len(Shape::Independent, 1), 16);
        // Shared rank pinned to 2, its alternate to 1; the other column free.
        assert_eq!(sweep_len(Shape::SharedFirst, 1), 4);
        assert_eq!(sweep_len(Shape::SharedSecond, 1), 4);
        assert_eq!(sweep_len(Shape::SharedBoth, 1), 1);
        // A loss bound of zero leaves no room for a shared rank.
        assert_eq!(sweep_len(Shape::SharedBoth, 0), 0);
    }

    #[test]
    fn shared_shapes_constrain_their_patterns() {
        Shape::SharedBoth.for_each_ranks(2, |ranks| {
            let [p, q, r] = Shape::SharedBoth.role_patterns(ranks);
            // First and third roles agree on the first character, third and
            // second on the second character.
            assert_eq!(p.0, r.0);
            assert_eq!(q.1, r.1);
            assert_ne!(p.1, r.1);
            assert_ne!(q.0, r.0);
        });
    }
}
