use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum ValidatorError {
    #[error("cpf validator unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CpfValidator: Send + Sync + 'static {
    /// `Ok(false)` means the cpf is malformed; `Err` means the check itself
    /// could not run.
    async fn validate(&self, cpf: &str) -> Result<bool, ValidatorError>;
}
