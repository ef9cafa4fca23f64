use meafold::engine::config as core_config;

pub struct AppConfig {
    pub core_config: core_config::MeaConfig,
    pub matrix_precision: usize,
}
