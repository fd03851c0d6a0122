/// Parameters of the duplex-based fitness score.
///
/// Self-structures use `intra_base`/`intra_min_length`, cross-structures use
/// `inter_base`/`inter_min_length`, and the composite score is
/// `W = O * weight_x + N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringParams {
    pub intra_base: u64,
    pub intra_min_length: usize,
    pub inter_base: u64,
    pub inter_min_length: usize,
    pub weight_x: u64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            intra_base: 10,
            intra_min_length: 1,
            inter_base: 10,
            inter_min_length: 1,
            weight_x: 10_000,
        }
    }
}
