//! One generation of the automaton.

use super::{Boundary, MetaRule, Universe};

/// Compute the next generation of `universe` under `rule`.
///
/// Every cell reads a window of `2 * (n / 2) + 1` neighbors centered on itself,
/// so even neighborhood sizes gather one sample more than the table address
/// width. The gathered bits (first is most significant) are reduced modulo the
/// table size before lookup. All cells read the same prior generation.
pub fn evolve(universe: &Universe, rule: &MetaRule) -> Universe {
    let table = rule.rule_table();
    let radius = (rule.neighborhood_size() / 2) as isize;
    let boundary = rule.boundary();
    let inversion = rule.inversion();
    let cells = universe.cells();
    let len = cells.len() as isize;

    let next = (0..len)
        .map(|i| {
            let pattern = (-radius..=radius).fold(0usize, |acc, offset| {
                let j = i + offset;
                let bit = match boundary {
                    Boundary::Toroidal => cells[j.rem_euclid(len) as usize],
                    Boundary::ZeroPadded if j < 0 || j >= len => false,
                    Boundary::ZeroPadded => cells[j as usize],
                };
                (acc << 1) | bit as usize
            });
            table.lookup(pattern) ^ inversion
        })
        .collect();

    Universe::from_bits(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Universe {
        Universe::from_bits(s.chars().map(|c| c == '1').collect())
    }

    fn show(u: &Universe) -> String {
        u.cells().iter().map(|&c| if c { '1' } else { '0' }).collect()
    }

    /// core_rule in the elementary table, n = 3, the given boundary/inversion bits
    fn elementary(core: u32, zero_padded: bool, inverted: bool) -> MetaRule {
        MetaRule::new((core << 20) | ((zero_padded as u32) << 17) | ((inverted as u32) << 16))
    }

    #[test]
    fn test_table_is_msb_first() {
        // Entry i is bit 7 − i, so core 120 (0b0111_1000) behaves like Wolfram rule 30.
        let u = bits("0001000");
        let next = evolve(&u, &elementary(120, false, false));
        assert_eq!(show(&next), "0011100");
        let next = evolve(&next, &elementary(120, false, false));
        assert_eq!(show(&next), "0110010");

        // Core 30 read MSB-first only fires on patterns 3..=6.
        let next = evolve(&u, &elementary(30, false, false));
        assert_eq!(show(&next), "0000100");
    }

    #[test]
    fn test_toroidal_wraps_edges() {
        // Core 64 sets only entry 1: pattern 001, the right neighbor alone.
        let u = bits("10000000");
        let next = evolve(&u, &elementary(64, false, false));
        assert_eq!(show(&next), "00000001");
    }

    #[test]
    fn test_zero_padded_edges() {
        let u = bits("10000000");
        let next = evolve(&u, &elementary(64, true, false));
        assert_eq!(show(&next), "00000000");
    }

    #[test]
    fn test_inversion_flips_output() {
        let u = bits("0001000");
        let plain = evolve(&u, &elementary(30, false, false));
        let inverted = evolve(&u, &elementary(30, false, true));
        for (a, b) in plain.cells().iter().zip(inverted.cells()) {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_even_neighborhood_uses_wider_window() {
        // n = 4 gathers 5 bits. Core 0x80 with no modulation sets only the
        // entries i where (15 − i) % 8 == 7, i.e. entries 0 and 8.
        let rule = MetaRule::new((0x80 << 20) | (1 << 18));
        let u = bits("00000000100000000");
        let next = evolve(&u, &rule);
        // Around the set cell the patterns are 1, 2, 4, 8 and 16; 16 reduces
        // to entry 0, so cell 10 fires while cells 6, 7 and 8 stay off.
        assert_eq!(show(&next), "11111100011111111");
    }

    #[test]
    fn test_evolve_is_pure() {
        let u = bits("0110100110010110");
        let rule = MetaRule::new(0x0A5C_3D17);
        assert_eq!(evolve(&u, &rule), evolve(&u, &rule));
        assert_eq!(show(&u), "0110100110010110");
    }

    #[test]
    fn test_length_preserved_for_all_sizes() {
        let u = bits("0110100110010110");
        for n_bits in 0..4u32 {
            let rule = MetaRule::new((0x6E << 20) | (n_bits << 18) | (0x91 << 8) | 0x05);
            assert_eq!(evolve(&u, &rule).len(), u.len());
        }
    }
}
