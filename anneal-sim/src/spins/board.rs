use std::fmt;

use crate::spins::SpinLattice;

/// Text layout for a spin-board dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardLayout {
    /// One row per site, `+1`/`-1` per replica.
    #[default]
    BySite,
    /// One `Trotter t:` row per replica with `+`/`-` glyphs per site, then a
    /// separator line.
    ByReplica,
}

pub fn render(lattice: &SpinLattice, layout: BoardLayout) -> String {
    let mut out = String::new();
    match layout {
        BoardLayout::BySite => {
            for i in 0..lattice.n_sites() {
                let row: Vec<&str> = lattice
                    .site(i)
                    .iter()
                    .map(|&s| if s > 0 { "+1" } else { "-1" })
                    .collect();
                out.push_str(&row.join(" "));
                out.push('\n');
            }
        }
        BoardLayout::ByReplica => {
            for t in 0..lattice.n_replicas() {
                out.push_str(&format!("Trotter {t}:"));
                for i in 0..lattice.n_sites() {
                    out.push(' ');
                    out.push(if lattice.get(i, t) > 0 { '+' } else { '-' });
                }
                out.push('\n');
            }
            out.push_str(&"-".repeat(32));
            out.push('\n');
        }
    }
    out
}

impl fmt::Display for SpinLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, BoardLayout::BySite))
    }
}
