use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerError {
    #[error("gateway error: {0}")]
    Gateway(#[from] vp_gateway::GatewayError),

    #[error("aggregation error: {0}")]
    Aggregation(#[from] vp_types::TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
