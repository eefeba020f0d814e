//! Translation lattices.

use hexweave_topology::HexPoint;

/// A lattice tiling: copies of the tile sit at every `m * u + n * v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tiling {
    pub u: HexPoint,
    pub v: HexPoint,
}

impl Tiling {
    pub const fn new(u: HexPoint, v: HexPoint) -> Self {
        Self { u, v }
    }

    /// Cells per fundamental domain. Equals the tile size for a valid tiling.
    pub const fn area(&self) -> i64 {
        self.u.cross(self.v).abs()
    }

    /// Offset of copy `(m, n)`.
    pub fn copy_at(&self, m: i64, n: i64) -> HexPoint {
        self.u * m + self.v * n
    }

    /// Offsets of the six copies around the one at the origin.
    pub fn neighbor_offsets(&self) -> [HexPoint; 6] {
        let (u, v) = (self.u, self.v);
        [u, -u, v, -v, v - u, u - v]
    }

    /// Hermite normal form `[a, b, c]` of the lattice: it is spanned by
    /// `(a, b)` and `(0, c)` with `a > 0`, `c > 0` and `0 <= b < c`. Two bases
    /// span the same lattice exactly when their forms are equal.
    pub fn hermite_form(&self) -> [i64; 3] {
        let (mut a, mut b) = (self.u, self.v);
        while b.q != 0 {
            let k = a.q / b.q;
            a = a - b * k;
            std::mem::swap(&mut a, &mut b);
        }
        if a.q < 0 {
            a = -a;
        }
        if b.r < 0 {
            b = -b;
        }
        if b.r == 0 {
            // Degenerate basis; the form is only used for valid tilings.
            return [a.q, a.r, 0];
        }
        [a.q, a.r.rem_euclid(b.r), b.r]
    }
}

impl std::fmt::Display for Tiling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}, {}>", self.u, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(q: i64, r: i64) -> HexPoint {
        HexPoint::new(q, r)
    }

    #[test]
    fn area_is_unsigned() {
        assert_eq!(Tiling::new(p(1, 0), p(0, 1)).area(), 1);
        assert_eq!(Tiling::new(p(0, 1), p(1, 0)).area(), 1);
        assert_eq!(Tiling::new(p(2, 1), p(-1, 3)).area(), 7);
    }

    #[test]
    fn unimodular_changes_keep_the_form() {
        let base = Tiling::new(p(2, 1), p(-1, 3));
        let form = base.hermite_form();
        assert_eq!(form[0] * form[2], 7);

        for other in [
            Tiling::new(p(-1, 3), p(2, 1)),
            Tiling::new(p(2, 1), p(1, 4)),
            Tiling::new(p(-2, -1), p(-1, 3)),
            Tiling::new(p(2, 1) * 3 + p(-1, 3), p(2, 1) * 2 + p(-1, 3)),
        ] {
            assert_eq!(other.hermite_form(), form, "{other}");
        }
    }

    #[test]
    fn different_lattices_have_different_forms() {
        let a = Tiling::new(p(2, 0), p(0, 1));
        let b = Tiling::new(p(1, 0), p(0, 2));
        assert_ne!(a.hermite_form(), b.hermite_form());
        assert_eq!(a.hermite_form(), [2, 0, 1]);
        assert_eq!(b.hermite_form(), [1, 0, 2]);
    }

    #[test]
    fn copies_and_neighbors() {
        let tiling = Tiling::new(p(2, 0), p(1, 1));
        assert_eq!(tiling.copy_at(1, -1), p(1, -1));
        let offsets = tiling.neighbor_offsets();
        assert!(offsets.contains(&p(-1, 1)));
        assert!(offsets.contains(&p(1, -1)));
    }
}
