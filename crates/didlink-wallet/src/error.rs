/// Errors reported by a wallet connector or provider.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The user dismissed or rejected a wallet prompt.
    #[error("request rejected by user: {0}")]
    Rejected(String),

    /// The provider failed to answer a request.
    #[error("wallet provider error: {0}")]
    Provider(String),

    /// The provider reported a chain id that could not be parsed.
    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    /// No wallet with the given label is connected.
    #[error("wallet {0} is not connected")]
    NotConnected(String),
}
