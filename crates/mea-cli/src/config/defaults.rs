use meafold::engine::config::{DEFAULT_GAMMA, DEFAULT_MIN_HAIRPIN_SPAN};

pub struct DefaultsConfig {
    pub gamma: f64,
    pub min_hairpin_span: usize,
    pub matrix_precision: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            min_hairpin_span: DEFAULT_MIN_HAIRPIN_SPAN,
            matrix_precision: 3,
        }
    }
}
